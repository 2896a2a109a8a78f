use std::sync::Arc;

use crate::avatar::AvatarResolver;
use crate::config::Config;
use crate::models::Store;
use crate::Result;

pub struct AppState {
    pub resolver: Arc<AvatarResolver>,
    pub store: Store,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Arc<Self>> {
        let resolver = Arc::new(AvatarResolver::new(config.avatar.clone())?);
        let store = Store::open(&config.data_dir)?;

        Ok(Arc::new(Self { resolver, store }))
    }
}
