use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use odoo::OdooError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Odoo unavailable: {0}")]
    Remote(#[from] OdooError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Remote { .. } => StatusCode::BAD_GATEWAY,
        };

        error!("{self}");

        (status, self.to_string()).into_response()
    }
}
