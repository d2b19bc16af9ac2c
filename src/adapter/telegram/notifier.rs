//! Outbound Telegram notification worker.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::port::{Event, Notifier};

use super::format::event_message;

/// Telegram notifier that delivers events to each subscriber's chat.
///
/// Implements [`Notifier`] by queuing events on an unbounded channel drained
/// by a background worker, so `notify` never blocks the watcher.
pub struct TelegramNotifier {
    sender: mpsc::UnboundedSender<Event>,
}

impl TelegramNotifier {
    /// Create the notifier and spawn its delivery worker.
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(notifier_worker(bot, receiver));
        Self { sender }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("Telegram notifier channel closed");
        }
    }
}

/// Background worker that sends Telegram messages.
///
/// Delivery is fire-and-forget: a failed send is logged and dropped.
async fn notifier_worker(bot: Bot, mut receiver: mpsc::UnboundedReceiver<Event>) {
    info!("Telegram notifier started");

    while let Some(event) = receiver.recv().await {
        let chat_id = ChatId(event.subscriber().as_i64());
        let text = event_message(&event);

        if let Err(e) = bot
            .send_message(chat_id, &text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            error!(error = %e, chat_id = chat_id.0, "Failed to send Telegram notification");
        }
    }

    warn!("Telegram notifier worker shutting down");
}
