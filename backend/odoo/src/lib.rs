//! # Odoo
//!
//! Read-only JSON-RPC access to an Odoo database.
//!
//! Every model method goes through `call_kw`; the typed helpers on
//! [`RemoteClient`] only shape the positional and keyword arguments.
use async_trait::async_trait;
use serde_json::{Value, json};

pub mod client;
pub mod error;
pub mod fields;

pub use client::{OdooClient, Settings};
pub use error::OdooError;
pub use fields::{Reference, lenient};

#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn call_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, OdooError>;

    async fn search_read(
        &self,
        model: &str,
        domain: Value,
        fields: &[&str],
        order: &str,
    ) -> Result<Vec<Value>, OdooError> {
        let result = self
            .call_kw(
                model,
                "search_read",
                json!([domain]),
                json!({ "fields": fields, "order": order }),
            )
            .await?;

        into_records(model, result)
    }

    async fn read(
        &self,
        model: &str,
        ids: &[i64],
        fields: &[&str],
    ) -> Result<Vec<Value>, OdooError> {
        let result = self
            .call_kw(model, "read", json!([ids]), json!({ "fields": fields }))
            .await?;

        into_records(model, result)
    }

    async fn fields_get(
        &self,
        model: &str,
        fields: &[&str],
        attributes: &[&str],
    ) -> Result<Value, OdooError> {
        self.call_kw(
            model,
            "fields_get",
            json!([fields]),
            json!({ "attributes": attributes }),
        )
        .await
    }
}

fn into_records(model: &str, result: Value) -> Result<Vec<Value>, OdooError> {
    match result {
        Value::Array(records) => Ok(records),
        other => Err(OdooError::Protocol(format!(
            "Expected a record list from {model}, got {other}"
        ))),
    }
}
