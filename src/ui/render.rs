//! Plain-text rendering of a recap snapshot.
//!
//! Nothing in the data pipeline depends on this module; it is the thin
//! terminal stand-in for the leaderboard page and only consumes the
//! resolved date plus its snapshot.

use crate::models::{Contributor, Snapshot};
use crate::recap;
use crate::utils::date::DateKey;

/// Print the leaderboard for one day to stdout.
pub fn print_recap(date: &DateKey, snapshot: &Snapshot) {
    let heading = date.display().unwrap_or_else(|_| date.to_string());
    println!("Contributor recap for {}", heading);
    println!("{} contributors", snapshot.total_contributors);
    println!();

    for (rank, contributor) in snapshot.contributors.iter().enumerate() {
        println!("{:>3}. {}", rank + 1, contributor_line(contributor));
    }

    if let Some(top) = snapshot.contributors.first() {
        println!();
        println!("Top contributor avatar: {}", recap::avatar_url(&top.avatar));
    }
}

fn contributor_line(contributor: &Contributor) -> String {
    let admin_tag = if contributor.is_admin { " [admin]" } else { "" };
    let contributions = if contributor.contributions_text.is_empty() {
        format!("{} contributions", contributor.contributions)
    } else {
        contributor.contributions_text.clone()
    };
    format!("{}{} - {}", contributor.user_name, admin_tag, contributions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributor(name: &str, contributions: u64, text: &str, is_admin: bool) -> Contributor {
        Contributor {
            user_id: 1,
            user_name: name.to_string(),
            avatar: String::new(),
            contributions,
            contributions_text: text.to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_contributor_line_prefers_display_text() {
        let line = contributor_line(&contributor("alice", 41, "41 edits", false));
        assert_eq!(line, "alice - 41 edits");
    }

    #[test]
    fn test_contributor_line_falls_back_to_count() {
        let line = contributor_line(&contributor("bob", 3, "", false));
        assert_eq!(line, "bob - 3 contributions");
    }

    #[test]
    fn test_contributor_line_tags_admins() {
        let line = contributor_line(&contributor("carol", 7, "7 edits", true));
        assert_eq!(line, "carol [admin] - 7 edits");
    }
}
