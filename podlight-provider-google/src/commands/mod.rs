pub mod authenticate;
pub mod create_event;
pub mod list_upcoming;
