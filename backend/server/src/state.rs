use std::sync::Arc;

use odoo::{OdooClient, OdooError, RemoteClient};

use super::{
    cache::{Coalescer, TtlCache},
    config::Config,
    models::Card,
};

pub type Cards = Arc<Vec<Card>>;

pub struct AppState {
    pub config: Config,
    pub client: Arc<dyn RemoteClient>,
    pub cache: TtlCache<Cards>,
    pub coalescer: Coalescer,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, OdooError> {
        let client = Arc::new(OdooClient::new(config.odoo_settings())?);

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: Arc<dyn RemoteClient>) -> Arc<Self> {
        let cache = TtlCache::new(config.cache_ttl);

        Arc::new(Self {
            config,
            client,
            cache,
            coalescer: Coalescer::new(),
        })
    }
}
