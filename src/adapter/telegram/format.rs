//! Message formatting for Telegram replies and notifications.
//!
//! Everything returned here is ready-to-send `MarkdownV2`; dynamic text is
//! escaped at the point it is interpolated.

use std::collections::BTreeMap;

use crate::app::TrackOutcome;
use crate::domain::{ArticleId, StockState, TrackedProduct};
use crate::port::Event;

/// Currency code the card API is queried in.
const CURRENCY: &str = "BYN";

/// Help text returned by `/start` and `/help`.
#[must_use]
pub fn help_text() -> String {
    "Hi\\! I watch Wildberries prices and stock for you\\.\n\n\
    /track `article` `size…` \\- start tracking \\(all sizes when none given\\)\n\
    /untrack `article` \\- stop tracking\n\
    /list \\- show tracked articles\n\n\
    Sending a bare article number also starts tracking\\."
        .to_string()
}

/// Confirmation for a successful track command.
#[must_use]
pub fn track_confirmation(outcome: &TrackOutcome) -> String {
    let item = &outcome.item;
    let scope = if item.requested_sizes.is_empty() {
        "all sizes"
    } else {
        "selected sizes"
    };

    let mut text = format!(
        "Now tracking *{}* of *{}*\nArticle: `{}`\n",
        scope,
        escape_markdown(&item.product_name),
        outcome.article
    );

    for (size_name, state) in &item.last_prices {
        if item.wants_size(size_name) {
            text.push_str(&size_line(size_name, *state));
        }
    }

    text.push_str("\nI'll message you when something changes\\.");

    if let Some(warning) = &outcome.persist_warning {
        text.push_str(&persist_warning(warning));
    }

    text
}

/// Rendering of `/list`.
#[must_use]
pub fn list(items: &BTreeMap<ArticleId, TrackedProduct>) -> String {
    if items.is_empty() {
        return "You are not tracking anything yet\\.".to_string();
    }

    let mut text = String::from("You are tracking:\n");
    for (article, item) in items {
        text.push_str(&format!(
            "\n✅ *{}*\nArticle: `{}`\n",
            escape_markdown(&item.product_name),
            article
        ));
        for (size_name, state) in &item.last_prices {
            if item.wants_size(size_name) {
                text.push_str(&size_line(size_name, *state));
            }
        }
    }
    text
}

/// One notification message per event, mirroring the bot's original shapes.
#[must_use]
pub fn event_message(event: &Event) -> String {
    match event {
        Event::PriceDropped {
            article,
            product_name,
            size,
            old_price,
            new_price,
            ..
        } => format!(
            "❗️*Price drop\\!*\n\n\
            Product: *{}*\n\
            Article: `{}`\n\
            Size: *{}*\n\n\
            Old price: `{:.2} {CURRENCY}`\n\
            New price: `{:.2} {CURRENCY}`",
            escape_markdown(&truncate(product_name, 60)),
            article,
            escape_markdown(size),
            old_price,
            new_price,
        ),
        Event::Restocked {
            article,
            product_name,
            size,
            price,
            ..
        } => format!(
            "*Back in stock\\!* ✅\n\n\
            Product: *{}*\n\
            Article: `{}`\n\
            Size: *{}*\n\n\
            Price: `{:.2} {CURRENCY}`",
            escape_markdown(&truncate(product_name, 60)),
            article,
            escape_markdown(size),
            price,
        ),
        Event::StockedOut {
            article,
            product_name,
            size,
            ..
        } => format!(
            "Sold out 😱\n\n\
            Product: *{}*\n\
            Article: `{}`\n\
            Size: *{}*",
            escape_markdown(&truncate(product_name, 60)),
            article,
            escape_markdown(size),
        ),
    }
}

/// Warning appendix when a mutation could not be written to disk.
#[must_use]
pub fn persist_warning(reason: &str) -> String {
    format!(
        "\n\n⚠️ Saved in memory but not to disk: {}",
        escape_markdown(reason)
    )
}

fn size_line(size_name: &str, state: StockState) -> String {
    match state {
        StockState::InStock(price) => format!(
            " \\- Size *{}*: `{:.2} {CURRENCY}`\n",
            escape_markdown(size_name),
            price
        ),
        StockState::OutOfStock => {
            format!(" \\- Size *{}*: `out of stock`\n", escape_markdown(size_name))
        }
    }
}

/// Truncate a string with ellipsis (Unicode-safe).
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductSnapshot, SizeOffer};
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn outcome(requested: &[&str]) -> TrackOutcome {
        let snapshot = ProductSnapshot {
            name: "Sneaker black".to_string(),
            sizes: vec![
                SizeOffer {
                    name: "M".to_string(),
                    state: StockState::InStock(dec!(50.00)),
                },
                SizeOffer {
                    name: "L".to_string(),
                    state: StockState::OutOfStock,
                },
            ],
        };
        let requested: BTreeSet<String> = requested.iter().map(|s| s.to_string()).collect();
        TrackOutcome {
            article: ArticleId::parse("123456").unwrap(),
            item: TrackedProduct::from_snapshot(&snapshot, requested),
            persist_warning: None,
        }
    }

    #[test]
    fn confirmation_lists_all_sizes_without_filter() {
        let text = track_confirmation(&outcome(&[]));
        assert!(text.contains("all sizes"));
        assert!(text.contains("Size *M*: `50.00 BYN`"));
        assert!(text.contains("Size *L*: `out of stock`"));
    }

    #[test]
    fn confirmation_honors_size_filter() {
        let text = track_confirmation(&outcome(&["M"]));
        assert!(text.contains("selected sizes"));
        assert!(text.contains("Size *M*"));
        assert!(!text.contains("Size *L*"));
    }

    #[test]
    fn confirmation_appends_persist_warning() {
        let mut out = outcome(&[]);
        out.persist_warning = Some("disk full".to_string());
        let text = track_confirmation(&out);
        assert!(text.contains("not to disk"));
    }

    #[test]
    fn list_handles_empty_registry() {
        assert!(list(&BTreeMap::new()).contains("not tracking anything"));
    }

    #[test]
    fn event_messages_are_escaped() {
        let event = Event::PriceDropped {
            subscriber: crate::domain::SubscriberId::new(1),
            article: ArticleId::parse("123").unwrap(),
            product_name: "Jacket (red)".to_string(),
            size: "M".to_string(),
            old_price: dec!(50.00),
            new_price: dec!(45.00),
        };
        let text = event_message(&event);
        assert!(text.contains("Price drop"));
        assert!(text.contains("Jacket \\(red\\)"));
        assert!(text.contains("`50.00 BYN`"));
        assert!(text.contains("`45.00 BYN`"));
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("hello"), "hello");
        assert_eq!(escape_markdown("hello_world"), "hello\\_world");
        assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
        assert_eq!(escape_markdown("size 38.5"), "size 38\\.5");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("юбка женская летняя", 4), "юбка...");
    }
}
