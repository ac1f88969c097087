use serde::Serialize;

use crate::catalog::Catalog;
use crate::scoring::{ballot_progress, Ballot, BallotProgress, PickKind};

pub const LOGO: &str = "★ WILL WIN · SHOULD WIN ♥";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardLine {
    pub category: String,
    pub will_win: Option<String>,
    pub should_win: Option<String>,
}

/// A ballot laid out for sharing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareCard {
    pub show: String,
    pub headline: String,
    pub name: String,
    pub lines: Vec<CardLine>,
    pub progress: BallotProgress,
}

impl ShareCard {
    /// Only categories with at least one pick are listed
    pub fn new(catalog: &Catalog, ballot: &Ballot, name: &str) -> Self {
        let lines = catalog
            .categories
            .iter()
            .filter_map(|category| {
                let entry = ballot.entry(&category.id).filter(|e| e.is_started())?;
                Some(CardLine {
                    category: category.name.clone(),
                    will_win: entry.will_win.clone(),
                    should_win: entry.should_win.clone(),
                })
            })
            .collect();

        Self {
            show: catalog.id.clone(),
            headline: catalog.headline(),
            name: name.to_string(),
            lines,
            progress: ballot_progress(ballot, &catalog.categories),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = vec![
            LOGO.to_string(),
            self.headline.clone(),
            format!("{}'s picks", self.name),
            String::new(),
        ];

        if self.lines.is_empty() {
            out.push("No picks yet.".to_string());
        }
        for line in &self.lines {
            out.push(line.category.clone());
            for (kind, choice) in [
                (PickKind::WillWin, &line.will_win),
                (PickKind::ShouldWin, &line.should_win),
            ] {
                if let Some(nominee) = choice {
                    out.push(format!("  {} {}", kind.symbol(), nominee));
                }
            }
        }

        out.push(String::new());
        out.push(self.progress.summary());
        out.join("\n")
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
