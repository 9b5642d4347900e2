use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use odoo::Settings;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub odoo_url: String,
    pub odoo_db: String,
    pub odoo_login: String,
    pub odoo_password: String,
    pub odoo_timeout: Duration,
    pub cache_ttl: Duration,
    pub static_dir: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "5000"),
            odoo_url: try_load::<String>("ODOO_URL", "http://localhost:8069")
                .trim_end_matches('/')
                .to_string(),
            odoo_db: try_load("ODOO_DB", "odoo"),
            odoo_login: try_load("ODOO_LOGIN", "admin"),
            odoo_password: read_secret("ODOO_PASSWORD"),
            odoo_timeout: Duration::from_secs(try_load("ODOO_TIMEOUT", "15")),
            cache_ttl: Duration::from_secs(try_load("CACHE_TTL", "10")),
            static_dir: try_load("STATIC_DIR", "static"),
        }
    }

    pub fn odoo_settings(&self) -> Settings {
        Settings {
            url: self.odoo_url.clone(),
            db: self.odoo_db.clone(),
            login: self.odoo_login.clone(),
            password: self.odoo_password.clone(),
            timeout: self.odoo_timeout,
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Docker secret first, then the plain environment variable.
fn read_secret(secret_name: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .or_else(|_| var(secret_name))
        .expect("Secrets misconfigured!")
}
