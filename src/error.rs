//! Error type shared by every pattern module.
//!
//! The demos throw these on purpose to show "what happens when X is
//! missing". The runner binaries wrap them in `anyhow` with extra context.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("unsupported database type: {0}")]
    UnsupportedDatabase(String),

    #[error("invalid connection url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("rate limit exceeded: at most {limit} requests per window")]
    RateLimitExceeded { limit: u32 },

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: i64, requested: i64 },

    #[error("out of stock: {sku} (requested {requested}, available {available})")]
    OutOfStock {
        sku: String,
        requested: u32,
        available: u32,
    },

    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("unknown chat user: {0}")]
    UnknownUser(String),

    #[error("connection pool exhausted ({size} connections in use)")]
    PoolExhausted { size: usize },

    #[error("unknown demo: {0}")]
    UnknownDemo(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = PatternError::UnsupportedDatabase("oracle".into());
        assert_eq!(err.to_string(), "unsupported database type: oracle");

        let err = PatternError::RateLimitExceeded { limit: 3 };
        assert!(err.to_string().contains("at most 3"));
    }

    #[test]
    fn test_from_conversions() {
        let parse = url::Url::parse("not a url").unwrap_err();
        let err: PatternError = parse.into();
        assert!(matches!(err, PatternError::InvalidUrl(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PatternError = json.into();
        assert!(matches!(err, PatternError::Json(_)));
    }
}
