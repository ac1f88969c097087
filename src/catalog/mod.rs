pub mod oscars;
pub mod validation;

pub use validation::{validate_catalog, validate_pick};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One award category and its nominees, in ballot order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    /// Stable slug, e.g. "best_picture"
    pub id: String,
    pub name: String,
    pub nominees: Vec<String>,
}

impl Category {
    pub fn has_nominee(&self, nominee: &str) -> bool {
        self.nominees.iter().any(|n| n == nominee)
    }
}

/// The ballot for a single show.
///
/// Example YAML:
/// ```yaml
/// ballot:
///   id: globes-2026
///   name: 83rd Golden Globes
///   ceremony: 2026-01-11
///   categories:
///     - id: drama_picture
///       name: Best Motion Picture - Drama
///       nominees: ["Hamnet", "Sinners"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ceremony: Option<NaiveDate>,
    pub categories: Vec<Category>,
}

impl Default for Catalog {
    fn default() -> Self {
        oscars::catalog()
    }
}

impl Catalog {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Categories whose id or name matches a glob pattern (case-insensitive).
    /// `None` returns every category.
    pub fn filter(&self, pattern: Option<&str>) -> Result<Vec<&Category>> {
        let Some(pattern) = pattern else {
            return Ok(self.categories.iter().collect());
        };

        let pattern = glob::Pattern::new(&pattern.to_lowercase())
            .with_context(|| format!("Invalid category filter '{}'", pattern))?;

        Ok(self
            .categories
            .iter()
            .filter(|c| pattern.matches(&c.id) || pattern.matches(&c.name.to_lowercase()))
            .collect())
    }

    /// "98th Academy Awards · March 15, 2026"
    pub fn headline(&self) -> String {
        match self.ceremony {
            Some(date) => format!("{} · {}", self.name, date.format("%B %-d, %Y")),
            None => self.name.clone(),
        }
    }
}
