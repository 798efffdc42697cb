use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Billy API error: {0}")]
    Accounting(String),

    #[error("Google Sheets API error: {0}")]
    Sheets(String),

    #[error("Service account authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed balance list: {0}")]
    Csv(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
