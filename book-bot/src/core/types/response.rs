/// What a handler did with an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Nothing done; later handlers still run.
    Continue,
    /// Update consumed without a reply (unknown command).
    Stop,
    /// Update is not meant for this handler.
    Ignore,
    /// Reply already sent; the text is kept for `after()` hooks and logs.
    Reply(String),
}

impl HandlerResponse {
    /// True for responses that end the handle phase.
    pub fn ends_chain(&self) -> bool {
        matches!(self, HandlerResponse::Stop | HandlerResponse::Reply(_))
    }

    pub fn reply_text(&self) -> Option<&str> {
        match self {
            HandlerResponse::Reply(text) => Some(text),
            _ => None,
        }
    }
}
