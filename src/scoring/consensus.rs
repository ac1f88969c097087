use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::backend::types::Pick;
use crate::catalog::Category;

/// How often one nominee was named in each dimension.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NomineeShare {
    pub will_count: u32,
    pub should_count: u32,
    pub will_win_pct: f64,
    pub should_win_pct: f64,
}

/// Consensus for one category. Totals count picks with a non-null value in
/// that dimension, so they can differ between Will Win and Should Win.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CategoryConsensus {
    pub will_total: u32,
    pub should_total: u32,
    pub nominees: BTreeMap<String, NomineeShare>,
}

/// category_id -> consensus
pub type Aggregates = BTreeMap<String, CategoryConsensus>;

/// `100 * count / total`, and 0 when nobody picked in that dimension
pub fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * f64::from(count) / f64::from(total)
    }
}

/// Community consensus from the full current set of picks.
///
/// Unknown categories and off-ballot nominees are aggregated as given.
pub fn compute_aggregates(picks: &[Pick]) -> Aggregates {
    let mut aggregates = Aggregates::new();

    for pick in picks {
        let category = aggregates.entry(pick.category_id.clone()).or_default();

        if let Some(nominee) = pick.will() {
            category
                .nominees
                .entry(nominee.to_string())
                .or_default()
                .will_count += 1;
            category.will_total += 1;
        }

        if let Some(nominee) = pick.should() {
            category
                .nominees
                .entry(nominee.to_string())
                .or_default()
                .should_count += 1;
            category.should_total += 1;
        }
    }

    for category in aggregates.values_mut() {
        let (will_total, should_total) = (category.will_total, category.should_total);
        for share in category.nominees.values_mut() {
            share.will_win_pct = percentage(share.will_count, will_total);
            share.should_win_pct = percentage(share.should_count, should_total);
        }
    }

    aggregates
}

/// A nominee row in a consensus view
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RankedNominee {
    pub nominee: String,
    pub will_win_pct: f64,
    pub should_win_pct: f64,
}

/// Nominees with any support, by descending Will Win share.
///
/// Ties keep ballot order: the category's own nominees first, then any
/// off-ballot names in alphabetical order.
pub fn ranked_nominees(
    consensus: &CategoryConsensus,
    category: Option<&Category>,
) -> Vec<RankedNominee> {
    let mut order: Vec<&str> = Vec::with_capacity(consensus.nominees.len());
    if let Some(category) = category {
        order.extend(category.nominees.iter().map(String::as_str));
    }
    order.extend(
        consensus
            .nominees
            .keys()
            .map(String::as_str)
            .filter(|n| !category.is_some_and(|c| c.has_nominee(n))),
    );

    let mut ranked: Vec<RankedNominee> = order
        .into_iter()
        .filter_map(|nominee| {
            let share = consensus.nominees.get(nominee)?;
            (share.will_win_pct > 0.0 || share.should_win_pct > 0.0).then(|| RankedNominee {
                nominee: nominee.to_string(),
                will_win_pct: share.will_win_pct,
                should_win_pct: share.should_win_pct,
            })
        })
        .collect();

    // Stable sort keeps ballot order among equal shares
    ranked.sort_by(|a, b| b.will_win_pct.total_cmp(&a.will_win_pct));
    ranked
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

    fn best_picture() -> Category {
        Category {
            id: "best_picture".to_string(),
            name: "Best Picture".to_string(),
            nominees: vec![
                "Bugonia".to_string(),
                "Hamnet".to_string(),
                "Sinners".to_string(),
            ],
        }
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_aggregates(&[]).is_empty());
    }

    #[test]
    fn test_end_to_end_consensus() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), None),
            pick("b", "best_picture", Some("Sinners"), None),
            pick("c", "best_picture", Some("Hamnet"), None),
        ];
        let aggregates = compute_aggregates(&picks);
        let bp = &aggregates["best_picture"];

        assert_eq!(bp.will_total, 3);
        assert_eq!(bp.should_total, 0);
        assert!((bp.nominees["Sinners"].will_win_pct - 66.67).abs() < 0.01);
        assert!((bp.nominees["Hamnet"].will_win_pct - 33.33).abs() < 0.01);
        // No Should Win picks at all: every share is exactly zero, never NaN
        assert_eq!(bp.nominees["Sinners"].should_win_pct, 0.0);
        assert_eq!(bp.nominees["Hamnet"].should_win_pct, 0.0);
    }

    #[test]
    fn test_dimensions_are_independent() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), Some("Hamnet")),
            pick("b", "best_picture", None, Some("Hamnet")),
            pick("c", "best_picture", Some("Hamnet"), Some("Hamnet")),
        ];
        let bp = &compute_aggregates(&picks)["best_picture"];

        assert_eq!(bp.will_total, 2);
        assert_eq!(bp.should_total, 3);
        assert_eq!(bp.nominees["Sinners"].will_win_pct, 50.0);
        assert_eq!(bp.nominees["Sinners"].should_win_pct, 0.0);
        assert_eq!(bp.nominees["Hamnet"].will_win_pct, 50.0);
        assert_eq!(bp.nominees["Hamnet"].should_win_pct, 100.0);
    }

    #[test]
    fn test_counts_sum_to_totals_and_shares_to_100() {
        let picks = vec![
            pick("a", "sound", Some("F1"), Some("Sirāt")),
            pick("b", "sound", Some("Sinners"), None),
            pick("c", "sound", Some("F1"), Some("F1")),
            pick("d", "sound", Some("Sirāt"), Some("Sirāt")),
            pick("e", "sound", None, Some("Sinners")),
            pick("f", "sound", Some("Frankenstein"), None),
            pick("g", "sound", Some("F1"), None),
        ];
        let sound = &compute_aggregates(&picks)["sound"];

        let will_counts: u32 = sound.nominees.values().map(|s| s.will_count).sum();
        let should_counts: u32 = sound.nominees.values().map(|s| s.should_count).sum();
        assert_eq!(will_counts, sound.will_total);
        assert_eq!(should_counts, sound.should_total);

        let will_pct: f64 = sound.nominees.values().map(|s| s.will_win_pct).sum();
        let should_pct: f64 = sound.nominees.values().map(|s| s.should_win_pct).sum();
        assert!((will_pct - 100.0).abs() < 1e-9);
        assert!((should_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_categories_are_partitioned() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), None),
            pick("a", "sound", Some("F1"), None),
        ];
        let aggregates = compute_aggregates(&picks);
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates["best_picture"].nominees["Sinners"].will_win_pct, 100.0);
        assert!(!aggregates["best_picture"].nominees.contains_key("F1"));
    }

    #[test]
    fn test_garbage_in_is_reflected() {
        let picks = vec![pick("a", "best_stunts", Some("Top Gun"), None)];
        let aggregates = compute_aggregates(&picks);
        assert_eq!(aggregates["best_stunts"].nominees["Top Gun"].will_win_pct, 100.0);
    }

    #[test]
    fn test_empty_strings_are_not_picks() {
        let picks = vec![pick("a", "sound", Some(""), Some("F1"))];
        let sound = &compute_aggregates(&picks)["sound"];
        assert_eq!(sound.will_total, 0);
        assert!(!sound.nominees.contains_key(""));
    }

    #[test]
    fn test_idempotent() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), Some("Hamnet")),
            pick("b", "best_picture", Some("Hamnet"), None),
        ];
        assert_eq!(compute_aggregates(&picks), compute_aggregates(&picks));
    }

    #[test]
    fn test_ranked_sorts_by_will_share() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), None),
            pick("b", "best_picture", Some("Sinners"), None),
            pick("c", "best_picture", Some("Hamnet"), None),
        ];
        let aggregates = compute_aggregates(&picks);
        let category = best_picture();
        let ranked = ranked_nominees(&aggregates["best_picture"], Some(&category));

        let names: Vec<_> = ranked.iter().map(|r| r.nominee.as_str()).collect();
        assert_eq!(names, vec!["Sinners", "Hamnet"]);
    }

    #[test]
    fn test_ranked_drops_zero_rows_and_keeps_should_only() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), Some("Bugonia")),
        ];
        let aggregates = compute_aggregates(&picks);
        let category = best_picture();
        let ranked = ranked_nominees(&aggregates["best_picture"], Some(&category));

        let names: Vec<_> = ranked.iter().map(|r| r.nominee.as_str()).collect();
        // Bugonia has no Will Win share but 100% Should Win, so it stays (last)
        assert_eq!(names, vec!["Sinners", "Bugonia"]);
        assert!(!names.contains(&"Hamnet"));
    }

    #[test]
    fn test_ranked_ties_keep_ballot_order() {
        let picks = vec![
            pick("a", "best_picture", Some("Sinners"), None),
            pick("b", "best_picture", Some("Bugonia"), None),
        ];
        let aggregates = compute_aggregates(&picks);
        let category = best_picture();
        let ranked = ranked_nominees(&aggregates["best_picture"], Some(&category));

        let names: Vec<_> = ranked.iter().map(|r| r.nominee.as_str()).collect();
        assert_eq!(names, vec!["Bugonia", "Sinners"]);
    }

    #[test]
    fn test_ranked_includes_off_ballot_after_known() {
        let picks = vec![
            pick("a", "best_picture", Some("Barbie"), None),
            pick("b", "best_picture", Some("Hamnet"), None),
        ];
        let aggregates = compute_aggregates(&picks);
        let category = best_picture();
        let ranked = ranked_nominees(&aggregates["best_picture"], Some(&category));

        let names: Vec<_> = ranked.iter().map(|r| r.nominee.as_str()).collect();
        assert_eq!(names, vec!["Hamnet", "Barbie"]);
    }

    #[test]
    fn test_ranked_without_category_uses_name_order() {
        let picks = vec![
            pick("a", "x", Some("Zed"), None),
            pick("b", "x", Some("Abe"), None),
        ];
        let aggregates = compute_aggregates(&picks);
        let ranked = ranked_nominees(&aggregates["x"], None);
        let names: Vec<_> = ranked.iter().map(|r| r.nominee.as_str()).collect();
        assert_eq!(names, vec!["Abe", "Zed"]);
    }
}
