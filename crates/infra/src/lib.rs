mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, VapiConfig};
pub use repos::{IReminderRepo, ReminderPage, ReminderQuery, Repos};
pub use services::{CallRequest, DispatchError, INotificationDispatcher, VapiDispatcher};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

#[derive(Clone)]
pub struct CallmeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub dispatcher: Arc<dyn INotificationDispatcher>,
}

impl CallmeContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = match &config.database_url {
            Some(connection_string) => Repos::create_postgres(connection_string).await?,
            None => {
                warn!("DATABASE_URL is not set. Reminders are only kept in memory and will be lost on restart.");
                Repos::create_inmemory()
            }
        };
        let dispatcher = Arc::new(VapiDispatcher::new(config.vapi.clone()));
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            dispatcher,
        })
    }

    /// Context backed by the in memory store, used by tests
    pub fn create_inmemory(config: Config) -> Self {
        let dispatcher = Arc::new(VapiDispatcher::new(config.vapi.clone()));
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            dispatcher,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<CallmeContext> {
    CallmeContext::create(Config::new()).await
}
