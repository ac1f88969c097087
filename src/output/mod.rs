pub mod formatter;

pub use formatter::{
    format_age, format_ballot, format_categories, format_comparison, format_consensus,
    format_consensus_tsv, format_leaderboard, format_leaderboard_tsv, format_leagues, format_pct,
    format_progress, should_use_colors,
};
