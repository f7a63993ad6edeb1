pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid markup config: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid markup token `{pattern}`: {reason}")]
    InvalidToken { pattern: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Failed to format markup output")]
    Format(#[from] std::fmt::Error),
}
