use serde::{Deserialize, Serialize};

use super::ballot::Ballot;
use crate::backend::types::{Pick, Profile};
use crate::catalog::Category;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComparisonRow {
    pub category_id: String,
    pub category: String,
    pub my_will: Option<String>,
    pub their_will: Option<String>,
    pub my_should: Option<String>,
    pub their_should: Option<String>,
    pub will_match: bool,
    pub should_match: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub will_agree: usize,
    pub should_agree: usize,
    /// Categories where both of us picked something
    pub shared: usize,
}

fn matches(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Side-by-side ballots in category order
pub fn compare_ballots(mine: &Ballot, theirs: &Ballot, categories: &[Category]) -> Comparison {
    let mut comparison = Comparison::default();

    for category in categories {
        let me = mine.entry(&category.id).cloned().unwrap_or_default();
        let them = theirs.entry(&category.id).cloned().unwrap_or_default();

        let will_match = matches(me.will_win.as_deref(), them.will_win.as_deref());
        let should_match = matches(me.should_win.as_deref(), them.should_win.as_deref());

        comparison.will_agree += usize::from(will_match);
        comparison.should_agree += usize::from(should_match);
        if me.is_started() && them.is_started() {
            comparison.shared += 1;
        }

        comparison.rows.push(ComparisonRow {
            category_id: category.id.clone(),
            category: category.name.clone(),
            my_will: me.will_win,
            their_will: them.will_win,
            my_should: me.should_win,
            their_should: them.should_win,
            will_match,
            should_match,
        });
    }

    comparison
}

/// Find a user by id, or by display name or email (case-insensitive).
/// Ids seen only in pick rows resolve too.
pub fn resolve_friend(profiles: &[Profile], picks: &[Pick], query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(profile) = profiles.iter().find(|p| p.id == query) {
        return Some(profile.id.clone());
    }
    if picks.iter().any(|p| p.user_id == query) {
        return Some(query.to_string());
    }

    let needle = query.to_lowercase();
    profiles
        .iter()
        .find(|p| {
            [p.display_name.as_deref(), p.email.as_deref()]
                .into_iter()
                .flatten()
                .any(|s| s.to_lowercase() == needle)
        })
        .map(|p| p.id.clone())
}
