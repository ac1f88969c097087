//! The single container for everything the views render.
//!
//! `AppState` is plain data: fetch results are applied to it, pick edits go
//! through it, and renderers only read it. Nothing in here does I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::{Pick, ShowStatus, Snapshot};
use crate::catalog::{validate_pick, Catalog};
use crate::scoring::phase::is_contradictory;
use crate::scoring::{
    ballot_progress, compute_aggregates, standings, winner_map, Aggregates, Ballot,
    BallotProgress, PickKind, ShowPhase, Standings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Picks,
    Community,
    Leaderboard,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Picks => View::Community,
            View::Community => View::Leaderboard,
            View::Leaderboard => View::Picks,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Picks => "My Picks",
            View::Community => "Community",
            View::Leaderboard => "Leaderboard",
        }
    }
}

/// Why an edit was refused before anything was sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickRejected {
    #[error("{} - picks can no longer be changed", .0.label())]
    Locked(ShowPhase),
    #[error("no user id configured; picks cannot be saved")]
    NoUser,
    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub catalog: Catalog,
    pub user_id: Option<String>,
    pub view: View,
    pub snapshot: Snapshot,
    pub ballot: Ballot,
    pub aggregates: Aggregates,
    pub standings: Standings,
    pub progress: BallotProgress,
    /// True until the first snapshot has been applied
    pub loading: bool,
    /// Number of saves still in flight
    pub saving: usize,
    /// The snapshot on screen came from the offline cache
    pub from_cache: bool,
}

impl AppState {
    pub fn new(catalog: Catalog, user_id: Option<String>) -> Self {
        let snapshot = Snapshot {
            show_id: catalog.id.clone(),
            ..Default::default()
        };
        let ballot = Ballot::new(user_id.as_deref().unwrap_or_default(), &catalog.id);
        let mut state = Self {
            catalog,
            user_id,
            view: View::default(),
            snapshot,
            ballot,
            aggregates: Aggregates::new(),
            standings: Standings::Pending {
                entrants: Vec::new(),
            },
            progress: BallotProgress::default(),
            loading: true,
            saving: 0,
            from_cache: false,
        };
        state.recompute();
        state
    }

    pub fn status(&self) -> ShowStatus {
        self.snapshot.status
    }

    pub fn phase(&self) -> ShowPhase {
        ShowPhase::from_status(self.snapshot.status)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.fetched_at
    }

    /// Replace everything derived from the backend with a fresh snapshot.
    /// A later snapshot always replaces an earlier one.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot, from_cache: bool) {
        if is_contradictory(snapshot.status) {
            warn!(
                show = %snapshot.show_id,
                "results are published while ballots are still open; treating ballots as closed"
            );
        }
        self.ballot = Ballot::for_user(
            &snapshot.picks,
            self.user_id.as_deref().unwrap_or_default(),
            &self.catalog.id,
        );
        self.snapshot = snapshot;
        self.from_cache = from_cache;
        self.loading = false;
        self.recompute();
    }

    /// Rebuild aggregates, standings and progress from the current snapshot
    fn recompute(&mut self) {
        let show_picks: Vec<Pick> = self
            .snapshot
            .picks
            .iter()
            .filter(|p| p.show_id == self.catalog.id)
            .cloned()
            .collect();
        let winners = winner_map(&self.snapshot.winners);

        self.aggregates = compute_aggregates(&show_picks);
        self.standings = standings(
            self.snapshot.status,
            &show_picks,
            &self.snapshot.profiles,
            &winners,
        );
        self.progress = ballot_progress(&self.ballot, &self.catalog.categories);
    }

    fn check_editable(
        &self,
        category_id: &str,
        kind: PickKind,
        nominee: Option<&str>,
    ) -> Result<(), PickRejected> {
        let phase = self.phase();
        if !phase.accepts_picks() {
            return Err(PickRejected::Locked(phase));
        }
        if !self.user_id.as_deref().is_some_and(|id| !id.is_empty()) {
            return Err(PickRejected::NoUser);
        }
        let (will, should) = match kind {
            PickKind::WillWin => (nominee, None),
            PickKind::ShouldWin => (None, nominee),
        };
        validate_pick(&self.catalog, category_id, will, should).map_err(PickRejected::Invalid)
    }

    /// Toggle a nominee in one dimension. Returns the full row to upsert.
    pub fn toggle_pick(
        &mut self,
        category_id: &str,
        kind: PickKind,
        nominee: &str,
    ) -> Result<Pick, PickRejected> {
        self.check_editable(category_id, kind, Some(nominee))?;
        self.ballot.toggle(category_id, kind, nominee);
        Ok(self.commit_local(category_id))
    }

    /// Set or clear one dimension without toggling. Returns the full row to upsert.
    pub fn set_pick(
        &mut self,
        category_id: &str,
        kind: PickKind,
        nominee: Option<&str>,
    ) -> Result<Pick, PickRejected> {
        self.check_editable(category_id, kind, nominee)?;
        self.ballot.set(category_id, kind, nominee);
        Ok(self.commit_local(category_id))
    }

    /// Mirror a local edit into the snapshot so consensus updates immediately
    fn commit_local(&mut self, category_id: &str) -> Pick {
        let row = self.ballot.to_pick(category_id);
        match self
            .snapshot
            .picks
            .iter_mut()
            .find(|p| p.user_id == row.user_id && p.category_id == row.category_id)
        {
            Some(existing) => *existing = row.clone(),
            None => self.snapshot.picks.push(row.clone()),
        }
        self.recompute();
        row
    }
}
