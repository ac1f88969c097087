use std::io::IsTerminal;

use chrono::Duration;
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::backend::League;
use crate::catalog::{Catalog, Category};
use crate::scoring::{
    ranked_nominees, ranks, Aggregates, Ballot, BallotProgress, Comparison, PickKind, Standings,
};

const NO_PICKS: &str = "No picks yet.";
const NONE: &str = "-";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to a display width counted in chars, not bytes
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Whole-number percentage, e.g. 66.67 -> "67%"
pub fn format_pct(pct: f64) -> String {
    format!("{:.0}%", pct)
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

pub fn format_progress(progress: &BallotProgress, use_colors: bool) -> String {
    let summary = progress.summary();
    if use_colors && progress.is_finished() {
        summary.green().to_string()
    } else {
        summary
    }
}

/// Share of the community that made the same choice, e.g. " (67%)"
fn consensus_badge(aggregates: &Aggregates, category_id: &str, kind: PickKind, nominee: &str) -> String {
    let pct = aggregates
        .get(category_id)
        .and_then(|c| c.nominees.get(nominee))
        .map(|share| match kind {
            PickKind::WillWin => share.will_win_pct,
            PickKind::ShouldWin => share.should_win_pct,
        })
        .unwrap_or(0.0);
    format!(" ({})", format_pct(pct))
}

/// A user's ballot, one block per category, with community badges
pub fn format_ballot(
    catalog: &Catalog,
    ballot: &Ballot,
    aggregates: &Aggregates,
    use_colors: bool,
) -> String {
    let mut lines = Vec::with_capacity(catalog.categories.len() * 3);

    for category in &catalog.categories {
        lines.push(if use_colors {
            category.name.bold().to_string()
        } else {
            category.name.clone()
        });

        for kind in [PickKind::WillWin, PickKind::ShouldWin] {
            let choice = match ballot.get(&category.id, kind) {
                Some(nominee) => {
                    let badge = consensus_badge(aggregates, &category.id, kind, nominee);
                    if use_colors {
                        format!("{}{}", nominee.cyan(), badge.dimmed())
                    } else {
                        format!("{}{}", nominee, badge)
                    }
                }
                None if use_colors => NONE.dimmed().to_string(),
                None => NONE.to_string(),
            };
            lines.push(format!("  {} {}: {}", kind.symbol(), kind.label(), choice));
        }
    }

    lines.join("\n")
}

/// Categories and their nominees
pub fn format_categories(categories: &[&Category], use_colors: bool) -> String {
    if categories.is_empty() {
        return "No matching categories.".to_string();
    }

    categories
        .iter()
        .map(|c| {
            let header = if use_colors {
                format!("{} {}", c.name.bold(), format!("({})", c.id).dimmed())
            } else {
                format!("{} ({})", c.name, c.id)
            };
            let nominees: Vec<String> = c.nominees.iter().map(|n| format!("  {}", n)).collect();
            format!("{}\n{}", header, nominees.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Community consensus per category, nominees by descending Will Win share
pub fn format_consensus(categories: &[&Category], aggregates: &Aggregates, use_colors: bool) -> String {
    let term_width = get_terminal_width();
    let mut blocks = Vec::new();

    for category in categories {
        let Some(consensus) = aggregates.get(&category.id) else {
            continue;
        };
        let ranked = ranked_nominees(consensus, Some(*category));
        if ranked.is_empty() {
            continue;
        }

        let name_width = ranked
            .iter()
            .map(|r| r.nominee.chars().count())
            .max()
            .unwrap_or(0);
        // "  " + name + "  ★ 100%  ♥ 100%"
        let name_width = match term_width {
            Some(width) if width > 40 => name_width.min(width - 18),
            Some(_) => name_width.min(20),
            None => name_width,
        };

        let mut lines = vec![if use_colors {
            category.name.bold().to_string()
        } else {
            category.name.clone()
        }];
        for row in ranked {
            let name = pad(&truncate(&row.nominee, name_width), name_width);
            let will = format!("{:>4}", format_pct(row.will_win_pct));
            let should = format!("{:>4}", format_pct(row.should_win_pct));
            lines.push(if use_colors {
                format!("  {}  ★ {}  ♥ {}", name, will.yellow(), should.magenta())
            } else {
                format!("  {}  ★ {}  ♥ {}", name, will, should)
            });
        }
        blocks.push(lines.join("\n"));
    }

    if blocks.is_empty() {
        return NO_PICKS.to_string();
    }
    blocks.join("\n")
}

/// Columns: category_id, nominee, will_win_pct, should_win_pct (no headers, no colors)
pub fn format_consensus_tsv(categories: &[&Category], aggregates: &Aggregates) -> String {
    let mut rows = Vec::new();
    for category in categories {
        let Some(consensus) = aggregates.get(&category.id) else {
            continue;
        };
        for row in ranked_nominees(consensus, Some(*category)) {
            rows.push(format!(
                "{}\t{}\t{:.2}\t{:.2}",
                category.id, row.nominee, row.will_win_pct, row.should_win_pct
            ));
        }
    }
    rows.join("\n")
}

fn you_marker(user_id: &str, me: Option<&str>) -> &'static str {
    if me == Some(user_id) {
        " (you)"
    } else {
        ""
    }
}

/// Leaderboard, or the list of entrants while results are withheld
pub fn format_leaderboard(standings: &Standings, me: Option<&str>, use_colors: bool) -> String {
    if standings.is_empty() {
        return NO_PICKS.to_string();
    }

    match standings {
        Standings::Pending { entrants } => {
            let note = format!(
                "Results pending - scores appear once winners are published ({} entrants)",
                entrants.len()
            );
            let mut lines = vec![if use_colors {
                note.italic().to_string()
            } else {
                note
            }];
            for entrant in entrants {
                lines.push(format!("  {}{}", entrant.name, you_marker(&entrant.user_id, me)));
            }
            lines.join("\n")
        }
        Standings::Final { entries } => {
            let name_width = entries
                .iter()
                .map(|e| e.name.chars().count() + you_marker(&e.user_id, me).len())
                .max()
                .unwrap_or(0);

            entries
                .iter()
                .zip(ranks(entries))
                .map(|(entry, rank)| {
                    let rank_str = format!("{:>2}.", rank);
                    let name = pad(
                        &format!("{}{}", entry.name, you_marker(&entry.user_id, me)),
                        name_width,
                    );
                    let total = format!("{:>3}", entry.total);
                    let detail = format!(
                        "★ {}  ♥ {}",
                        entry.will_win_correct, entry.should_win_correct
                    );
                    if use_colors {
                        format!("{} {}  {}  {}", rank_str.dimmed(), name, total.bold(), detail.dimmed())
                    } else {
                        format!("{} {}  {}  {}", rank_str, name, total, detail)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Final: rank, user_id, name, will, should, total. Pending: user_id, name.
pub fn format_leaderboard_tsv(standings: &Standings) -> String {
    match standings {
        Standings::Pending { entrants } => entrants
            .iter()
            .map(|e| format!("{}\t{}", e.user_id, e.name))
            .collect::<Vec<_>>()
            .join("\n"),
        Standings::Final { entries } => entries
            .iter()
            .zip(ranks(entries))
            .map(|(e, rank)| {
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    rank, e.user_id, e.name, e.will_win_correct, e.should_win_correct, e.total
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn side(mine: Option<&str>, theirs: Option<&str>, matched: bool, use_colors: bool) -> String {
    let text = format!("{} / {}", mine.unwrap_or(NONE), theirs.unwrap_or(NONE));
    match (use_colors, matched) {
        (true, true) => text.green().to_string(),
        (true, false) => text,
        (false, true) => format!("{} =", text),
        (false, false) => text,
    }
}

pub fn format_comparison(comparison: &Comparison, friend: &str, use_colors: bool) -> String {
    let mut lines = vec![format!(
        "You vs {}: agree on {} Will Win and {} Should Win picks ({} categories both picked)",
        friend, comparison.will_agree, comparison.should_agree, comparison.shared
    )];

    for row in &comparison.rows {
        lines.push(if use_colors {
            row.category.bold().to_string()
        } else {
            row.category.clone()
        });
        lines.push(format!(
            "  ★ {}",
            side(row.my_will.as_deref(), row.their_will.as_deref(), row.will_match, use_colors)
        ));
        lines.push(format!(
            "  ♥ {}",
            side(
                row.my_should.as_deref(),
                row.their_should.as_deref(),
                row.should_match,
                use_colors
            )
        ));
    }

    lines.join("\n")
}

pub fn format_leagues(leagues: &[League], use_colors: bool) -> String {
    if leagues.is_empty() {
        return "You are not in any leagues yet. Create one with `will-win league create <name>`."
            .to_string();
    }

    leagues
        .iter()
        .map(|league| {
            let invite = league
                .invite_code
                .as_deref()
                .map(|code| format!("  invite: {}", code))
                .unwrap_or_default();
            if use_colors {
                format!("{}  {}{}", league.name.bold(), league.id.dimmed(), invite)
            } else {
                format!("{}  {}{}", league.name, league.id, invite)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
