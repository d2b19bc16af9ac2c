//! Telegram message parsing.

/// Requests a subscriber can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotRequest {
    Start,
    Help,
    Track {
        article: String,
        sizes: Vec<String>,
    },
    Untrack {
        article: String,
    },
    List,
}

/// Parse error for inbound messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestParseError {
    EmptyMessage,
    UnknownCommand(String),
    MissingArgument(&'static str),
}

impl std::fmt::Display for RequestParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "message is empty"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            Self::MissingArgument(name) => write!(f, "missing argument `{name}`"),
        }
    }
}

impl std::error::Error for RequestParseError {}

/// Parse a Telegram message into a bot request.
///
/// Commands start with `/`; an optional `@botname` suffix is stripped.
/// Anything else is treated as a bare tracking request - "123456 38 39"
/// tracks article 123456 for sizes 38 and 39, a bare article tracks all
/// sizes. Whether the article is actually numeric is validated by the
/// command service, not here.
pub fn parse_request(text: &str) -> Result<BotRequest, RequestParseError> {
    let mut parts = text.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(RequestParseError::EmptyMessage);
    };

    if !head.starts_with('/') {
        // Bare message: article followed by optional size names.
        return Ok(BotRequest::Track {
            article: head.to_string(),
            sizes: parts.map(str::to_string).collect(),
        });
    }

    let command = head.split_once('@').map_or(head, |(cmd, _)| cmd);

    match command {
        "/start" => Ok(BotRequest::Start),
        "/help" => Ok(BotRequest::Help),
        "/list" => Ok(BotRequest::List),
        "/track" => {
            let article = parts
                .next()
                .ok_or(RequestParseError::MissingArgument("article"))?;
            Ok(BotRequest::Track {
                article: article.to_string(),
                sizes: parts.map(str::to_string).collect(),
            })
        }
        "/untrack" => {
            let article = parts
                .next()
                .ok_or(RequestParseError::MissingArgument("article"))?;
            Ok(BotRequest::Untrack {
                article: article.to_string(),
            })
        }
        other => Err(RequestParseError::UnknownCommand(other.to_string())),
    }
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("track", "Track an article, optionally specific sizes"),
        ("untrack", "Stop tracking an article"),
        ("list", "Show tracked articles"),
        ("help", "Show all commands"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_commands() {
        assert_eq!(parse_request("/start").unwrap(), BotRequest::Start);
        assert_eq!(parse_request("/help").unwrap(), BotRequest::Help);
        assert_eq!(parse_request("/list").unwrap(), BotRequest::List);
    }

    #[test]
    fn parse_track_with_sizes() {
        assert_eq!(
            parse_request("/track 123456 38 39").unwrap(),
            BotRequest::Track {
                article: "123456".to_string(),
                sizes: vec!["38".to_string(), "39".to_string()],
            }
        );
    }

    #[test]
    fn parse_track_without_sizes() {
        assert_eq!(
            parse_request("/track 123456").unwrap(),
            BotRequest::Track {
                article: "123456".to_string(),
                sizes: vec![],
            }
        );
    }

    #[test]
    fn parse_track_requires_article() {
        assert_eq!(
            parse_request("/track"),
            Err(RequestParseError::MissingArgument("article"))
        );
        assert_eq!(
            parse_request("/untrack"),
            Err(RequestParseError::MissingArgument("article"))
        );
    }

    #[test]
    fn parse_untrack() {
        assert_eq!(
            parse_request("/untrack 555").unwrap(),
            BotRequest::Untrack {
                article: "555".to_string(),
            }
        );
    }

    #[test]
    fn parse_bare_numeric_is_track_all_sizes() {
        assert_eq!(
            parse_request("123456").unwrap(),
            BotRequest::Track {
                article: "123456".to_string(),
                sizes: vec![],
            }
        );
    }

    #[test]
    fn parse_bare_text_with_sizes() {
        assert_eq!(
            parse_request("123456 M L").unwrap(),
            BotRequest::Track {
                article: "123456".to_string(),
                sizes: vec!["M".to_string(), "L".to_string()],
            }
        );
    }

    #[test]
    fn parse_strips_bot_mention() {
        assert_eq!(
            parse_request("/list@dropwatch_bot").unwrap(),
            BotRequest::List
        );
        assert_eq!(
            parse_request("/track@dropwatch_bot 42").unwrap(),
            BotRequest::Track {
                article: "42".to_string(),
                sizes: vec![],
            }
        );
    }

    #[test]
    fn parse_unknown_command() {
        assert!(matches!(
            parse_request("/frobnicate"),
            Err(RequestParseError::UnknownCommand(_))
        ));
    }

    #[test]
    fn parse_empty_message() {
        assert_eq!(parse_request("   "), Err(RequestParseError::EmptyMessage));
    }
}
