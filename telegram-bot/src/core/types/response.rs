//! Handler chain result type.

/// Handler result for the chain. `Reply(text)` carries the text that was sent back so later
/// handlers can see it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach the reply or delivered text.
    Reply(String),
}
