use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    /// Telegram rejected or failed a request.
    #[error("Telegram request failed: {0}")]
    Transport(String),

    #[error("Not a Telegram message id: {0:?}")]
    InvalidMessageId(String),

    #[error("Button {label:?} has an unusable url {url:?}")]
    InvalidButton { label: String, url: String },

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Search(#[from] book_search::SearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<teloxide::RequestError> for BotError {
    fn from(e: teloxide::RequestError) -> Self {
        BotError::Transport(e.to_string())
    }
}

/// Raised by handlers to abort the whole chain.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("User is not allowed to use this bot")]
    Unauthorized,
}

pub type Result<T> = std::result::Result<T, BotError>;
