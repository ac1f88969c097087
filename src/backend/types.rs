use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `picks` table: a user's two choices for one category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pick {
    pub user_id: String,
    pub show_id: String,
    pub category_id: String,
    #[serde(default)]
    pub will_win: Option<String>,
    #[serde(default)]
    pub should_win: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Pick {
    /// Will Win choice; empty strings count as no pick
    pub fn will(&self) -> Option<&str> {
        self.will_win.as_deref().filter(|n| !n.is_empty())
    }

    /// Should Win choice; empty strings count as no pick
    pub fn should(&self) -> Option<&str> {
        self.should_win.as_deref().filter(|n| !n.is_empty())
    }
}

/// One row of the `winners` table. Present only once an admin has set it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Winner {
    pub show_id: String,
    pub category_id: String,
    #[serde(default)]
    pub will_win_winner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub favorite_movie: Option<String>,
}

impl Profile {
    /// Display name, falling back to email. Empty strings are skipped.
    pub fn label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Publication flags for a show. A missing row means both are false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShowStatus {
    #[serde(default)]
    pub ballots_closed: bool,
    #[serde(default)]
    pub results_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub show_id: String,
    #[serde(default)]
    pub invite_code: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Payload for creating a league; the backend assigns id and invite code.
#[derive(Debug, Clone, Serialize)]
pub struct NewLeague {
    pub name: String,
    pub show_id: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeagueMember {
    pub league_id: String,
    pub user_id: String,
}

/// Everything the scoring engine needs for one show, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    pub show_id: String,
    pub picks: Vec<Pick>,
    pub winners: Vec<Winner>,
    pub profiles: Vec<Profile>,
    pub status: ShowStatus,
    pub fetched_at: Option<DateTime<Utc>>,
}
