pub mod ballot;
pub mod compare;
pub mod consensus;
pub mod engine;
pub mod phase;

pub use ballot::{ballot_progress, Ballot, BallotEntry, BallotProgress, PickKind};
pub use compare::{compare_ballots, resolve_friend, Comparison, ComparisonRow};
pub use consensus::{
    compute_aggregates, percentage, ranked_nominees, Aggregates, CategoryConsensus, NomineeShare,
    RankedNominee,
};
pub use engine::{
    compute_leaderboard, display_name, league_leaderboard, ranks, winner_map, ScoreEntry,
    WinnerMap,
};
pub use phase::{league_standings, standings, Entrant, ShowPhase, Standings};
