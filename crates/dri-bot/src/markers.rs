//! State recovered from marker comments
//!
//! The bot keeps no store. Whether a DRI was assigned, when, and whether they
//! were already reminded is read back from comments carrying fixed marker
//! substrings.

use chrono::{DateTime, Utc};
use gh_client::Comment;

/// Whether any comment contains `marker`
pub fn has_marker(comments: &[Comment], marker: &str) -> bool {
    comments.iter().any(|c| c.body.contains(marker))
}

/// First comment containing `marker`, in the order given (oldest first)
pub fn first_with_marker<'a>(comments: &'a [Comment], marker: &str) -> Option<&'a Comment> {
    comments.iter().find(|c| c.body.contains(marker))
}

/// When the current assignment started
///
/// The first assignment comment wins; without one the pull request creation
/// time (`fallback`) is used.
pub fn assignment_started_at(
    comments: &[Comment],
    marker: &str,
    fallback: DateTime<Utc>,
) -> DateTime<Utc> {
    first_with_marker(comments, marker)
        .map(|c| c.created_at)
        .unwrap_or(fallback)
}

/// Whole days from `start` to `now`, truncated and never negative
pub fn whole_days_between(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const ASSIGNED: &str = "<!-- dri-bot:assignment -->";

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn comment(id: u64, body: &str, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id,
            author: "dri-bot".to_string(),
            body: body.to_string(),
            created_at,
        }
    }

    #[test]
    fn test_assignment_start_uses_first_marker_comment() {
        let comments = vec![
            comment(1, "looks good", at(2)),
            comment(2, &format!("{}\n@alice", ASSIGNED), at(4)),
            comment(3, &format!("{}\n@bob", ASSIGNED), at(9)),
        ];

        assert_eq!(assignment_started_at(&comments, ASSIGNED, at(1)), at(4));
    }

    #[test]
    fn test_assignment_start_falls_back_to_creation() {
        let comments = vec![comment(1, "no marker here", at(5))];
        assert_eq!(assignment_started_at(&comments, ASSIGNED, at(1)), at(1));
        assert_eq!(assignment_started_at(&[], ASSIGNED, at(1)), at(1));
    }

    #[test]
    fn test_has_marker() {
        let comments = vec![comment(1, "prefix <!-- dri-bot:reminder --> suffix", at(3))];
        assert!(has_marker(&comments, "<!-- dri-bot:reminder -->"));
        assert!(!has_marker(&comments, ASSIGNED));
    }

    #[test]
    fn test_whole_days_truncate() {
        let start = at(1);
        assert_eq!(whole_days_between(start, start + Duration::hours(23)), 0);
        assert_eq!(whole_days_between(start, start + Duration::hours(24)), 1);
        assert_eq!(whole_days_between(start, start + Duration::hours(21 * 24 - 1)), 20);
        assert_eq!(whole_days_between(start, start - Duration::days(2)), 0);
    }
}
