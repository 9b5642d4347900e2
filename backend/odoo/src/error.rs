use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OdooError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Odoo returned an error: {message}")]
    Remote { message: String, data: Value },

    #[error("Malformed response: {0}")]
    Protocol(String),

    #[error("Authentication to Odoo failed for {login}@{db}")]
    Authentication { login: String, db: String },

    #[error("Odoo session expired")]
    SessionExpired,
}

impl OdooError {
    /// Builds the error for a JSON-RPC `error` member.
    ///
    /// Odoo nests the exception class under `error.data.name`, which is how an
    /// expired session is told apart from any other server-side failure.
    pub fn from_rpc_error(error: Value) -> Self {
        let name = error
            .pointer("/data/name")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if name.ends_with("SessionExpiredException") {
            return OdooError::SessionExpired;
        }

        let message = error
            .pointer("/data/message")
            .or_else(|| error.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();

        OdooError::Remote {
            message,
            data: error,
        }
    }
}
