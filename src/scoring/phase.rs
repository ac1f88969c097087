use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::engine::{compute_leaderboard, display_name, league_leaderboard, ScoreEntry, WinnerMap};
use crate::backend::types::{Pick, Profile, ShowStatus};

/// Where a show is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowPhase {
    BallotsOpen,
    BallotsClosed,
    ResultsPublished,
}

impl ShowPhase {
    /// Published results win over the closed flag.
    pub fn from_status(status: ShowStatus) -> Self {
        if status.results_published {
            ShowPhase::ResultsPublished
        } else if status.ballots_closed {
            ShowPhase::BallotsClosed
        } else {
            ShowPhase::BallotsOpen
        }
    }

    pub fn accepts_picks(self) -> bool {
        self == ShowPhase::BallotsOpen
    }

    pub fn label(self) -> &'static str {
        match self {
            ShowPhase::BallotsOpen => "Ballots open",
            ShowPhase::BallotsClosed => "Ballots closed",
            ShowPhase::ResultsPublished => "Results published",
        }
    }
}

/// `results_published` set while `ballots_closed` is not
pub fn is_contradictory(status: ShowStatus) -> bool {
    status.results_published && !status.ballots_closed
}

/// Someone who has submitted at least one pick, shown before results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entrant {
    pub user_id: String,
    pub name: String,
}

/// What a leaderboard view may show for the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Standings {
    /// Scores are withheld; winner rows may exist but are not surfaced
    Pending { entrants: Vec<Entrant> },
    Final { entries: Vec<ScoreEntry> },
}

impl Standings {
    pub fn is_final(&self) -> bool {
        matches!(self, Standings::Final { .. })
    }

    pub fn len(&self) -> usize {
        match self {
            Standings::Pending { entrants } => entrants.len(),
            Standings::Final { entries } => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Gate the leaderboard on `results_published`.
pub fn standings(
    status: ShowStatus,
    picks: &[Pick],
    profiles: &[Profile],
    winners: &WinnerMap,
) -> Standings {
    if status.results_published {
        return Standings::Final {
            entries: compute_leaderboard(picks, profiles, winners),
        };
    }

    let mut entrants: Vec<Entrant> = Vec::new();
    for pick in picks {
        if entrants.iter().any(|e| e.user_id == pick.user_id) {
            continue;
        }
        entrants.push(Entrant {
            user_id: pick.user_id.clone(),
            name: display_name(profiles, &pick.user_id).to_string(),
        });
    }

    Standings::Pending { entrants }
}

/// `standings` restricted to a league's members
pub fn league_standings(
    status: ShowStatus,
    picks: &[Pick],
    members: &HashSet<String>,
    profiles: &[Profile],
    winners: &WinnerMap,
) -> Standings {
    if status.results_published {
        return Standings::Final {
            entries: league_leaderboard(picks, members, profiles, winners),
        };
    }

    let scoped: Vec<Pick> = picks
        .iter()
        .filter(|p| members.contains(&p.user_id))
        .cloned()
        .collect();
    standings(status, &scoped, profiles, winners)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(closed: bool, published: bool) -> ShowStatus {
        ShowStatus {
            ballots_closed: closed,
            results_published: published,
        }
    }

    fn pick(user: &str, will: &str) -> Pick {
        Pick {
            user_id: user.to_string(),
            show_id: "oscars-2026".to_string(),
            category_id: "best_picture".to_string(),
            will_win: Some(will.to_string()),
            should_win: None,
            updated_at: None,
        }
    }

    fn sinners_won() -> WinnerMap {
        [("best_picture".to_string(), "Sinners".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_phase_from_flags() {
        assert_eq!(ShowPhase::from_status(status(false, false)), ShowPhase::BallotsOpen);
        assert_eq!(ShowPhase::from_status(status(true, false)), ShowPhase::BallotsClosed);
        assert_eq!(ShowPhase::from_status(status(true, true)), ShowPhase::ResultsPublished);
    }

    #[test]
    fn test_contradictory_flags_resolve_to_published() {
        let s = status(false, true);
        assert!(is_contradictory(s));
        assert_eq!(ShowPhase::from_status(s), ShowPhase::ResultsPublished);
        assert!(!ShowPhase::from_status(s).accepts_picks());
    }

    #[test]
    fn test_only_open_accepts_picks() {
        assert!(ShowPhase::BallotsOpen.accepts_picks());
        assert!(!ShowPhase::BallotsClosed.accepts_picks());
        assert!(!ShowPhase::ResultsPublished.accepts_picks());
    }

    #[test]
    fn test_pending_while_unpublished_even_with_winners() {
        let picks = vec![pick("a", "Sinners"), pick("b", "Hamnet"), pick("a", "Sinners")];
        let result = standings(status(true, false), &picks, &[], &sinners_won());

        match result {
            Standings::Pending { entrants } => {
                let ids: Vec<_> = entrants.iter().map(|e| e.user_id.as_str()).collect();
                assert_eq!(ids, vec!["a", "b"]);
                assert_eq!(entrants[0].name, "Anonymous");
            }
            Standings::Final { .. } => panic!("scores must stay hidden until published"),
        }
    }

    #[test]
    fn test_final_once_published() {
        let picks = vec![pick("a", "Sinners"), pick("b", "Hamnet")];
        let result = standings(status(true, true), &picks, &[], &sinners_won());
        assert!(result.is_final());
        match result {
            Standings::Final { entries } => {
                assert_eq!(entries[0].user_id, "a");
                assert_eq!(entries[0].total, 1);
            }
            Standings::Pending { .. } => panic!("expected final standings"),
        }
    }

    #[test]
    fn test_league_standings_scope_both_phases() {
        let picks = vec![pick("a", "Sinners"), pick("b", "Sinners"), pick("c", "Hamnet")];
        let members: HashSet<String> = ["b", "c"].iter().map(|s| s.to_string()).collect();

        match league_standings(status(true, false), &picks, &members, &[], &sinners_won()) {
            Standings::Pending { entrants } => {
                let ids: Vec<_> = entrants.iter().map(|e| e.user_id.as_str()).collect();
                assert_eq!(ids, vec!["b", "c"]);
            }
            Standings::Final { .. } => panic!("expected pending standings"),
        }

        match league_standings(status(true, true), &picks, &members, &[], &sinners_won()) {
            Standings::Final { entries } => {
                let ids: Vec<_> = entries.iter().map(|e| e.user_id.as_str()).collect();
                assert_eq!(ids, vec!["b", "c"]);
                assert_eq!(entries[0].total, 1);
            }
            Standings::Pending { .. } => panic!("expected final standings"),
        }
    }

    #[test]
    fn test_standings_serialize_tagged() {
        let json = serde_json::to_value(Standings::Pending { entrants: vec![] }).unwrap();
        assert_eq!(json["state"], "pending");
        assert!(Standings::Pending { entrants: vec![] }.is_empty());
    }
}
