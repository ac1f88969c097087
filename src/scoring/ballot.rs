use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::backend::types::Pick;
use crate::catalog::Category;

/// Which of the two choices a pick sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickKind {
    WillWin,
    ShouldWin,
}

impl PickKind {
    pub fn label(self) -> &'static str {
        match self {
            PickKind::WillWin => "Will Win",
            PickKind::ShouldWin => "Should Win",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PickKind::WillWin => "★",
            PickKind::ShouldWin => "♥",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BallotEntry {
    pub will_win: Option<String>,
    pub should_win: Option<String>,
}

impl BallotEntry {
    pub fn get(&self, kind: PickKind) -> Option<&str> {
        match kind {
            PickKind::WillWin => self.will_win.as_deref(),
            PickKind::ShouldWin => self.should_win.as_deref(),
        }
    }

    fn slot(&mut self, kind: PickKind) -> &mut Option<String> {
        match kind {
            PickKind::WillWin => &mut self.will_win,
            PickKind::ShouldWin => &mut self.should_win,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.will_win.is_some() && self.should_win.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.will_win.is_some() || self.should_win.is_some()
    }
}

/// One user's picks for one show, keyed by category id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ballot {
    pub user_id: String,
    pub show_id: String,
    pub entries: BTreeMap<String, BallotEntry>,
}

impl Ballot {
    pub fn new(user_id: &str, show_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            show_id: show_id.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Build a user's ballot from the show's pick rows
    pub fn for_user(picks: &[Pick], user_id: &str, show_id: &str) -> Self {
        let mut ballot = Self::new(user_id, show_id);
        for pick in picks
            .iter()
            .filter(|p| p.user_id == user_id && p.show_id == show_id)
        {
            ballot.entries.insert(
                pick.category_id.clone(),
                BallotEntry {
                    will_win: pick.will().map(str::to_string),
                    should_win: pick.should().map(str::to_string),
                },
            );
        }
        ballot
    }

    pub fn entry(&self, category_id: &str) -> Option<&BallotEntry> {
        self.entries.get(category_id)
    }

    pub fn get(&self, category_id: &str, kind: PickKind) -> Option<&str> {
        self.entry(category_id).and_then(|e| e.get(kind))
    }

    /// Select `nominee`, or clear the choice if it is already selected.
    pub fn toggle(&mut self, category_id: &str, kind: PickKind, nominee: &str) -> &BallotEntry {
        let entry = self.entries.entry(category_id.to_string()).or_default();
        let slot = entry.slot(kind);
        if slot.as_deref() == Some(nominee) {
            *slot = None;
        } else {
            *slot = Some(nominee.to_string());
        }
        entry
    }

    /// Set or clear one choice without toggling
    pub fn set(&mut self, category_id: &str, kind: PickKind, nominee: Option<&str>) {
        let entry = self.entries.entry(category_id.to_string()).or_default();
        *entry.slot(kind) = nominee.map(str::to_string);
    }

    /// The full row to upsert for a category; both choices are always sent
    pub fn to_pick(&self, category_id: &str) -> Pick {
        let entry = self.entry(category_id).cloned().unwrap_or_default();
        Pick {
            user_id: self.user_id.clone(),
            show_id: self.show_id.clone(),
            category_id: category_id.to_string(),
            will_win: entry.will_win,
            should_win: entry.should_win,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BallotProgress {
    pub complete: usize,
    pub started: usize,
    pub total: usize,
}

impl BallotProgress {
    pub fn summary(&self) -> String {
        format!(
            "{} of {} complete · {} started",
            self.complete, self.total, self.started
        )
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.complete == self.total
    }
}

/// Progress over the given categories; entries for other categories are ignored
pub fn ballot_progress(ballot: &Ballot, categories: &[Category]) -> BallotProgress {
    let mut progress = BallotProgress {
        total: categories.len(),
        ..Default::default()
    };
    for category in categories {
        if let Some(entry) = ballot.entry(&category.id) {
            if entry.is_complete() {
                progress.complete += 1;
            }
            if entry.is_started() {
                progress.started += 1;
            }
        }
    }
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(user: &str, category: &str, will: Option<&str>, should: Option<&str>) -> Pick {
        Pick {
            user_id: user.to_string(),
            show_id: "oscars-2026".to_string(),
            category_id: category.to_string(),
            will_win: will.map(str::to_string),
            should_win: should.map(str::to_string),
            updated_at: None,
        }
    }

    fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_string(),
            nominees: vec!["A".to_string(), "B".to_string()],
        }
    }

    #[test]
    fn test_for_user_filters_rows() {
        let picks = vec![
            pick("me", "sound", Some("F1"), None),
            pick("you", "sound", Some("Sinners"), None),
            pick("me", "score", Some(""), Some("Hamnet")),
        ];
        let ballot = Ballot::for_user(&picks, "me", "oscars-2026");
        assert_eq!(ballot.entries.len(), 2);
        assert_eq!(ballot.get("sound", PickKind::WillWin), Some("F1"));
        assert_eq!(ballot.get("score", PickKind::WillWin), None);
        assert_eq!(ballot.get("score", PickKind::ShouldWin), Some("Hamnet"));
    }

    #[test]
    fn test_toggle_selects_replaces_and_clears() {
        let mut ballot = Ballot::new("me", "oscars-2026");

        ballot.toggle("sound", PickKind::WillWin, "F1");
        assert_eq!(ballot.get("sound", PickKind::WillWin), Some("F1"));

        ballot.toggle("sound", PickKind::WillWin, "Sinners");
        assert_eq!(ballot.get("sound", PickKind::WillWin), Some("Sinners"));

        let entry = ballot.toggle("sound", PickKind::WillWin, "Sinners");
        assert_eq!(entry.will_win, None);
    }

    #[test]
    fn test_toggle_leaves_other_dimension() {
        let mut ballot = Ballot::new("me", "oscars-2026");
        ballot.toggle("sound", PickKind::ShouldWin, "F1");
        ballot.toggle("sound", PickKind::WillWin, "F1");
        ballot.toggle("sound", PickKind::WillWin, "F1");
        assert_eq!(ballot.get("sound", PickKind::ShouldWin), Some("F1"));
    }

    #[test]
    fn test_to_pick_carries_both_dimensions() {
        let mut ballot = Ballot::new("me", "oscars-2026");
        ballot.toggle("sound", PickKind::ShouldWin, "F1");
        let row = ballot.to_pick("sound");
        assert_eq!(row.user_id, "me");
        assert_eq!(row.show_id, "oscars-2026");
        assert_eq!(row.will_win, None);
        assert_eq!(row.should_win.as_deref(), Some("F1"));

        let empty = ballot.to_pick("score");
        assert_eq!(empty.will_win, None);
        assert_eq!(empty.should_win, None);
    }

    #[test]
    fn test_progress_counts() {
        let categories = vec![category("a"), category("b"), category("c")];
        let mut ballot = Ballot::new("me", "oscars-2026");
        ballot.set("a", PickKind::WillWin, Some("A"));
        ballot.set("a", PickKind::ShouldWin, Some("B"));
        ballot.set("b", PickKind::ShouldWin, Some("A"));
        ballot.set("zzz", PickKind::WillWin, Some("A"));

        let progress = ballot_progress(&ballot, &categories);
        assert_eq!(progress.complete, 1);
        assert_eq!(progress.started, 2);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.summary(), "1 of 3 complete · 2 started");
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_progress_cleared_entry_is_not_started() {
        let categories = vec![category("a")];
        let mut ballot = Ballot::new("me", "oscars-2026");
        ballot.toggle("a", PickKind::WillWin, "A");
        ballot.toggle("a", PickKind::WillWin, "A");
        assert_eq!(ballot_progress(&ballot, &categories).started, 0);
    }
}
