//! Application wiring and orchestration.

mod commands;
mod watcher;

pub use commands::{CommandService, TrackOutcome, UntrackOutcome};
pub use watcher::Watcher;

use std::sync::Arc;

use teloxide::Bot;
use tracing::info;

use crate::adapter::telegram::{self, TelegramNotifier};
use crate::adapter::wildberries::WbCatalog;
use crate::config::{self, Config};
use crate::error::Result;
use crate::port::{Catalog, LogNotifier, Notifier, NotifierRegistry};
use crate::store::TrackingStore;

/// The assembled application.
pub struct App;

impl App {
    /// Load state, wire the adapters, and run until the dispatcher stops.
    ///
    /// # Errors
    ///
    /// Startup failures only: a missing bot token, a corrupt tracking data
    /// file, or an HTTP client that cannot be built. Runtime failures are
    /// logged and survived.
    pub async fn run(config: Config) -> Result<()> {
        let token = config::bot_token_from_env()?;
        let store = Arc::new(TrackingStore::open(&config.storage.path)?);
        let catalog: Arc<dyn Catalog> = Arc::new(WbCatalog::new(&config.catalog)?);

        let bot = Bot::new(token);
        // Every notification goes to the subscriber's chat and to the logs.
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(LogNotifier));
        registry.register(Box::new(TelegramNotifier::new(bot.clone())));
        let notifier: Arc<dyn Notifier> = Arc::new(registry);

        let watcher = Watcher::new(
            Arc::clone(&store),
            Arc::clone(&catalog),
            notifier,
            &config.watcher,
        );
        tokio::spawn(watcher.run());

        let service = Arc::new(CommandService::new(store, catalog));

        info!("dropwatch ready");
        telegram::run_dispatcher(bot, service).await;

        Ok(())
    }
}
