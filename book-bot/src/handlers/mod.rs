//! Handler implementations: logging, auth, start/help, search and download.

mod download_handler;
mod logging_auth;
mod search_handler;
mod start_handler;

#[cfg(test)]
mod test;

pub use download_handler::{error_text, DownloadHandler};
pub use logging_auth::{AuthHandler, LoggingHandler};
pub use search_handler::{build_choices, SearchHandler, MIN_QUERY_CHARS};
pub use start_handler::StartHandler;
