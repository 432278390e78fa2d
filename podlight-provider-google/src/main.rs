//! podlight-provider-google - Google Calendar provider for podlight
//!
//! This binary implements the podlight provider protocol, communicating
//! with the podlight CLI via JSON over stdin/stdout.
//!
//! The provider manages its own credentials and sessions:
//!   ~/.config/podlight/providers/google/app_config.toml
//!   ~/.config/podlight/providers/google/session/{account}.toml

mod app_config;
mod commands;
mod google_event;
mod remote_config;
mod session;

use anyhow::Result;
use podlight_core::protocol::{Command, Request, Response};
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::error(&format!("Failed to parse request: {}", e)),
        };

        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_request(request: Request) -> String {
    let result = match request.command {
        Command::Authenticate => commands::authenticate::handle().await,
        Command::ListUpcoming => commands::list_upcoming::handle(request.params).await,
        Command::CreateEvent => commands::create_event::handle(request.params).await,
    };

    match result {
        Ok(data) => Response::success(data),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}
