//! Telegram transport: inbound command dispatch and outbound notifications.

pub mod command;
pub mod format;

mod notifier;

pub use notifier::TelegramNotifier;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{BotCommand, ParseMode};
use tracing::{error, info, warn};

use crate::app::{CommandService, UntrackOutcome};
use crate::domain::SubscriberId;
use crate::error::Error;

use command::{bot_commands, parse_request, BotRequest, RequestParseError};

/// Run the inbound message loop until the process is stopped.
///
/// Every incoming message is handled in its own task by the underlying
/// dispatcher; there is no ordering guarantee between concurrent commands,
/// which the store is built to tolerate.
pub async fn run_dispatcher(bot: Bot, service: Arc<CommandService>) {
    // Register commands with Telegram so they appear in the "/" menu.
    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!("Telegram command listener started");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let service = Arc::clone(&service);
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };

            let subscriber = SubscriberId::new(msg.chat.id.0);
            let reply = handle_request(&service, subscriber, text).await;

            if let Err(e) = bot
                .send_message(msg.chat.id, reply)
                .parse_mode(ParseMode::MarkdownV2)
                .await
            {
                error!(error = %e, "Failed to send Telegram reply");
            }

            respond(())
        }
    })
    .await;
}

/// Map one inbound message to a ready-to-send `MarkdownV2` reply.
async fn handle_request(
    service: &CommandService,
    subscriber: SubscriberId,
    text: &str,
) -> String {
    match parse_request(text) {
        Ok(BotRequest::Start | BotRequest::Help) => format::help_text(),

        Ok(BotRequest::List) => format::list(&service.list(subscriber)),

        Ok(BotRequest::Track { article, sizes }) => {
            match service.track(subscriber, &article, sizes).await {
                Ok(outcome) => format::track_confirmation(&outcome),
                Err(Error::Domain(e)) => format::escape_markdown(&e.to_string()),
                Err(Error::Catalog(e)) => {
                    format::escape_markdown(&format!("Couldn't fetch product info: {e}"))
                }
                Err(e) => {
                    error!(error = %e, "Track command failed");
                    "Something went wrong, please try again later\\.".to_string()
                }
            }
        }

        Ok(BotRequest::Untrack { article }) => {
            match service.untrack(subscriber, &article).await {
                Ok(UntrackOutcome::Removed {
                    article,
                    persist_warning,
                }) => {
                    let mut reply = format!("No longer tracking article `{article}`\\.");
                    if let Some(warning) = persist_warning {
                        reply.push_str(&format::persist_warning(&warning));
                    }
                    reply
                }
                Ok(UntrackOutcome::NotTracked { article }) => {
                    format!("You weren't tracking article `{article}`\\.")
                }
                Err(Error::Domain(e)) => format::escape_markdown(&e.to_string()),
                Err(e) => {
                    error!(error = %e, "Untrack command failed");
                    "Something went wrong, please try again later\\.".to_string()
                }
            }
        }

        Err(RequestParseError::EmptyMessage) => format::help_text(),

        Err(e) => format!("{}\\. Try /help", format::escape_markdown(&e.to_string())),
    }
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
