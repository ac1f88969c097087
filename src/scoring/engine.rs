use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::backend::types::{Pick, Profile, Winner};

pub const ANONYMOUS: &str = "Anonymous";

/// category_id -> announced nominee
pub type WinnerMap = HashMap<String, String>;

/// Winners as a lookup; rows without a nominee are not announced yet.
pub fn winner_map(winners: &[Winner]) -> WinnerMap {
    winners
        .iter()
        .filter_map(|w| {
            let nominee = w.will_win_winner.as_deref().filter(|n| !n.is_empty())?;
            Some((w.category_id.clone(), nominee.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreEntry {
    pub user_id: String,
    pub name: String,
    pub will_win_correct: u32,
    pub should_win_correct: u32,
    pub total: u32,
}

impl ScoreEntry {
    fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: String::new(),
            will_win_correct: 0,
            should_win_correct: 0,
            total: 0,
        }
    }
}

/// Name shown for a user: display name, then email, then "Anonymous"
pub fn display_name<'a>(profiles: &'a [Profile], user_id: &str) -> &'a str {
    profiles
        .iter()
        .find(|p| p.id == user_id)
        .and_then(Profile::label)
        .unwrap_or(ANONYMOUS)
}

/// Score every user with at least one pick against the announced winners.
///
/// Categories without a winner are skipped. Should Win picks are scored
/// against the same announced winner as Will Win picks: a winner row has no
/// separate "should have won" column, so a Should Win point means the
/// preferred nominee actually took the award. Ordering is total
/// descending, then Will Win descending; remaining ties keep the order in
/// which users first appear in `picks`.
pub fn compute_leaderboard(
    picks: &[Pick],
    profiles: &[Profile],
    winners: &WinnerMap,
) -> Vec<ScoreEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<ScoreEntry> = Vec::new();

    for pick in picks {
        let slot = *index.entry(pick.user_id.as_str()).or_insert_with(|| {
            entries.push(ScoreEntry::new(&pick.user_id));
            entries.len() - 1
        });

        let Some(winner) = winners.get(&pick.category_id) else {
            continue;
        };

        let entry = &mut entries[slot];
        if pick.will() == Some(winner.as_str()) {
            entry.will_win_correct += 1;
        }
        if pick.should() == Some(winner.as_str()) {
            entry.should_win_correct += 1;
        }
    }

    for entry in &mut entries {
        entry.total = entry.will_win_correct + entry.should_win_correct;
        entry.name = display_name(profiles, &entry.user_id).to_string();
    }

    // Stable sort preserves first-appearance order for full ties
    entries.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| b.will_win_correct.cmp(&a.will_win_correct))
    });

    entries
}

/// Leaderboard restricted to a league's members; picks are filtered first
pub fn league_leaderboard(
    picks: &[Pick],
    members: &HashSet<String>,
    profiles: &[Profile],
    winners: &WinnerMap,
) -> Vec<ScoreEntry> {
    let scoped: Vec<Pick> = picks
        .iter()
        .filter(|p| members.contains(&p.user_id))
        .cloned()
        .collect();
    compute_leaderboard(&scoped, profiles, winners)
}

/// Competition ranks ("1, 2, 2, 4") for an already sorted leaderboard.
/// Entries share a rank when both total and Will Win count are equal.
pub fn ranks(entries: &[ScoreEntry]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let rank = match i.checked_sub(1).map(|prev| &entries[prev]) {
            Some(prev)
                if prev.total == entry.total
                    && prev.will_win_correct == entry.will_win_correct =>
            {
                ranks[i - 1]
            }
            _ => i + 1,
        };
        ranks.push(rank);
    }
    ranks
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

    fn profile(id: &str, name: Option<&str>, email: Option<&str>) -> Profile {
        Profile {
            id: id.to_string(),
            display_name: name.map(str::to_string),
            email: email.map(str::to_string),
            ..Default::default()
        }
    }

    fn winners(pairs: &[(&str, &str)]) -> WinnerMap {
        pairs
            .iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect()
    }

    #[test]
    fn test_winner_map_skips_unannounced() {
        let rows = vec![
            Winner {
                show_id: "s".to_string(),
                category_id: "sound".to_string(),
                will_win_winner: Some("F1".to_string()),
            },
            Winner {
                show_id: "s".to_string(),
                category_id: "score".to_string(),
                will_win_winner: None,
            },
            Winner {
                show_id: "s".to_string(),
                category_id: "editing".to_string(),
                will_win_winner: Some(String::new()),
            },
        ];
        let map = winner_map(&rows);
        assert_eq!(map.len(), 1);
        assert_eq!(map["sound"], "F1");
    }

    #[test]
    fn test_scoring_correctness() {
        let picks = vec![
            pick("u1", "best_picture", Some("Sinners"), Some("Sinners")),
            pick("u2", "best_picture", Some("Hamnet"), Some("Hamnet")),
        ];
        let board = compute_leaderboard(&picks, &[], &winners(&[("best_picture", "Sinners")]));

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "u1");
        assert_eq!(board[0].will_win_correct, 1);
        assert_eq!(board[0].should_win_correct, 1);
        assert_eq!(board[0].total, 2);
        assert_eq!(board[1].user_id, "u2");
        assert_eq!(board[1].total, 0);
    }

    #[test]
    fn test_should_win_scored_against_actual_winner() {
        // Will and Should split: only the pick naming the actual winner scores
        let picks = vec![
            pick("u1", "best_picture", Some("Hamnet"), Some("Sinners")),
            pick("u2", "best_picture", Some("Sinners"), Some("Hamnet")),
        ];
        let board = compute_leaderboard(&picks, &[], &winners(&[("best_picture", "Sinners")]));

        let u1 = board.iter().find(|e| e.user_id == "u1").unwrap();
        assert_eq!((u1.will_win_correct, u1.should_win_correct), (0, 1));
        let u2 = board.iter().find(|e| e.user_id == "u2").unwrap();
        assert_eq!((u2.will_win_correct, u2.should_win_correct), (1, 0));
        // Equal totals; Will Win breaks the tie
        assert_eq!(board[0].user_id, "u2");
    }

    #[test]
    fn test_unknown_winner_is_skipped() {
        let picks = vec![
            pick("u1", "best_picture", Some("Sinners"), None),
            pick("u1", "sound", Some("F1"), Some("F1")),
        ];
        let board = compute_leaderboard(&picks, &[], &winners(&[("best_picture", "Sinners")]));
        assert_eq!(board[0].will_win_correct, 1);
        assert_eq!(board[0].should_win_correct, 0);
        assert_eq!(board[0].total, 1);
    }

    #[test]
    fn test_no_winners_everyone_at_zero() {
        let picks = vec![
            pick("u1", "best_picture", Some("Sinners"), None),
            pick("u2", "best_picture", Some("Hamnet"), None),
        ];
        let board = compute_leaderboard(&picks, &[], &WinnerMap::new());
        assert_eq!(board.len(), 2);
        assert!(board.iter().all(|e| e.total == 0));
        // First-appearance order survives a full tie
        assert_eq!(board[0].user_id, "u1");
        assert_eq!(board[1].user_id, "u2");
    }

    #[test]
    fn test_end_to_end_leaderboard() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), None),
            pick("b", "best_picture", Some("Sinners"), None),
            pick("c", "best_picture", Some("Hamnet"), None),
        ];
        let board = compute_leaderboard(&picks, &[], &winners(&[("best_picture", "Sinners")]));
        let totals: Vec<_> = board.iter().map(|e| (e.user_id.as_str(), e.total)).collect();
        assert_eq!(totals, vec![("a", 1), ("b", 1), ("c", 0)]);
    }

    #[test]
    fn test_will_win_breaks_total_ties() {
        let picks = vec![
            // u1: should only
            pick("u1", "best_picture", Some("Hamnet"), Some("Sinners")),
            // u2: will only
            pick("u2", "best_picture", Some("Sinners"), Some("Hamnet")),
        ];
        let board = compute_leaderboard(&picks, &[], &winners(&[("best_picture", "Sinners")]));
        assert_eq!(board[0].user_id, "u2");
        assert_eq!(board[1].user_id, "u1");
        assert_eq!(board[0].total, board[1].total);
    }

    #[test]
    fn test_names_fall_back() {
        let picks = vec![
            pick("u1", "sound", Some("F1"), None),
            pick("u2", "sound", Some("F1"), None),
            pick("u3", "sound", Some("F1"), None),
            pick("u4", "sound", Some("F1"), None),
        ];
        let profiles = vec![
            profile("u1", Some("Ana"), Some("ana@example.com")),
            profile("u2", None, Some("ben@example.com")),
            profile("u3", Some(""), None),
        ];
        let board = compute_leaderboard(&picks, &profiles, &WinnerMap::new());
        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Ana", "ben@example.com", ANONYMOUS, ANONYMOUS]
        );
    }

    #[test]
    fn test_user_with_null_picks_still_listed() {
        let picks = vec![pick("u1", "sound", None, None)];
        let board = compute_leaderboard(&picks, &[], &winners(&[("sound", "F1")]));
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].total, 0);
    }

    #[test]
    fn test_league_filter_excludes_non_members() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), None),
            pick("b", "best_picture", Some("Sinners"), Some("Sinners")),
            pick("c", "best_picture", Some("Hamnet"), None),
        ];
        let members: HashSet<String> = ["a", "c"].iter().map(|s| s.to_string()).collect();
        let board = league_leaderboard(
            &picks,
            &members,
            &[],
            &winners(&[("best_picture", "Sinners")]),
        );
        let ids: Vec<_> = board.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_empty_league() {
        let picks = vec![pick("a", "best_picture", Some("Sinners"), None)];
        let board = league_leaderboard(&picks, &HashSet::new(), &[], &WinnerMap::new());
        assert!(board.is_empty());
    }

    #[test]
    fn test_competition_ranks() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), Some("Sinners")),
            pick("b", "best_picture", Some("Sinners"), None),
            pick("c", "best_picture", Some("Sinners"), None),
            pick("d", "best_picture", Some("Hamnet"), None),
        ];
        let board = compute_leaderboard(&picks, &[], &winners(&[("best_picture", "Sinners")]));
        assert_eq!(ranks(&board), vec![1, 2, 2, 4]);
        assert!(ranks(&[]).is_empty());
    }
}
