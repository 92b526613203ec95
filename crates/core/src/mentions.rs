//! Chat mention parsing for team rosters.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::UserId;

static MENTION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn mention_pattern() -> &'static Regex {
    MENTION_PATTERN.get_or_init(|| {
        Regex::new(r"<@!?(?P<id>\d+)>").expect("mention pattern is a valid regex")
    })
}

/// Extracts user ids from a string of `<@123>` / `<@!123>` mentions.
///
/// Anything between mentions is ignored, as are ids that do not fit a
/// [`UserId`]. Order of first appearance is kept and duplicates dropped.
pub fn parse_mentions(input: &str) -> Vec<UserId> {
    let mut ids = Vec::new();
    for caps in mention_pattern().captures_iter(input) {
        if let Ok(id) = caps["id"].parse::<UserId>() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_nickname_mentions() {
        assert_eq!(parse_mentions("<@123> <@!456>"), vec![123, 456]);
    }

    #[test]
    fn test_parse_ignores_noise() {
        assert_eq!(parse_mentions("team: <@1>, and <@2> plus @3"), vec![1, 2]);
        assert!(parse_mentions("").is_empty());
        assert!(parse_mentions("nobody here").is_empty());
    }

    #[test]
    fn test_parse_skips_duplicates_and_overflow() {
        assert_eq!(parse_mentions("<@7><@!7><@8>"), vec![7, 8]);
        assert!(parse_mentions("<@99999999999999999999999>").is_empty());
    }
}
