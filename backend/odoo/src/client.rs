use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{RemoteClient, error::OdooError};

pub struct Settings {
    pub url: String,
    pub db: String,
    pub login: String,
    pub password: String,
    pub timeout: Duration,
}

/// JSON-RPC client bound to one Odoo database.
///
/// The session cookie lives in the client's cookie store. Authentication
/// happens on the first call and is reused until Odoo reports the session
/// as expired.
pub struct OdooClient {
    http: Client,
    settings: Settings,
    uid: Mutex<Option<i64>>,
}

impl OdooClient {
    pub fn new(mut settings: Settings) -> Result<Self, OdooError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(settings.timeout)
            .build()?;

        settings.url = settings.url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            settings,
            uid: Mutex::new(None),
        })
    }

    /// Returns the uid of the live session, authenticating first if there is none.
    async fn ensure_session(&self) -> Result<i64, OdooError> {
        let mut uid = self.uid.lock().await;

        match *uid {
            Some(current) => Ok(current),
            None => {
                let fresh = self.authenticate().await?;
                *uid = Some(fresh);
                Ok(fresh)
            }
        }
    }

    async fn authenticate(&self) -> Result<i64, OdooError> {
        let url = format!("{}/web/session/authenticate", self.settings.url);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "db": self.settings.db,
                "login": self.settings.login,
                "password": self.settings.password,
            },
        });

        let failed = || OdooError::Authentication {
            login: self.settings.login.clone(),
            db: self.settings.db.clone(),
        };

        let result = decode_envelope(self.post(&url, &payload).await?).map_err(|e| {
            warn!("Authentication rejected: {e}");
            failed()
        })?;

        let uid = result
            .get("uid")
            .and_then(Value::as_i64)
            .ok_or_else(failed)?;

        info!("Authenticated to Odoo as uid {uid}");

        Ok(uid)
    }

    /// Drops the session only if it is still the one seen expiring. A caller
    /// that raced us may already have renewed it.
    async fn invalidate_session(&self, expired: i64) {
        let mut uid = self.uid.lock().await;

        if *uid == Some(expired) {
            *uid = None;
        }
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<Value, OdooError> {
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| OdooError::Protocol(format!("Invalid JSON body from {url}: {e}")))
    }

    async fn call_once(
        &self,
        model: &str,
        method: &str,
        args: &Value,
        kwargs: &Value,
    ) -> Result<Value, OdooError> {
        let url = format!(
            "{}/web/dataset/call_kw/{model}/{method}",
            self.settings.url
        );
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "model": model,
                "method": method,
                "args": args,
                "kwargs": kwargs,
            },
        });

        debug!("call_kw {model}.{method}");

        decode_envelope(self.post(&url, &payload).await?)
    }
}

#[async_trait]
impl RemoteClient for OdooClient {
    async fn call_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, OdooError> {
        let uid = self.ensure_session().await?;

        match self.call_once(model, method, &args, &kwargs).await {
            Err(OdooError::SessionExpired) => {
                warn!("Odoo session expired, authenticating again");

                self.invalidate_session(uid).await;
                self.ensure_session().await?;
                self.call_once(model, method, &args, &kwargs).await
            }
            result => result,
        }
    }
}

/// Unwraps a JSON-RPC response body into its `result` member.
pub fn decode_envelope(envelope: Value) -> Result<Value, OdooError> {
    let Value::Object(mut body) = envelope else {
        return Err(OdooError::Protocol(
            "JSON-RPC envelope is not an object".to_string(),
        ));
    };

    match body.remove("error") {
        Some(error) if !error.is_null() => Err(OdooError::from_rpc_error(error)),
        _ => Ok(body.remove("result").unwrap_or(Value::Null)),
    }
}
