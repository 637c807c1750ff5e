use thiserror::Error;

pub type WindowResult<T> = Result<T, WindowError>;

#[derive(Debug, Error)]
pub enum WindowError {
    /// The native layer refused a request (window creation, adoption, queries).
    #[error("native error: {0}")]
    Native(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to spawn window thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The owner thread exited before reporting a creation result.
    #[error("window thread exited before the window was created")]
    CreationAborted,
}
