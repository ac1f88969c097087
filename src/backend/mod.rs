pub mod cache;
pub mod client;
pub mod error;
pub mod rest;
pub mod types;

pub use client::{create_client, BackendClient};
pub use error::BackendError;
pub use types::{League, LeagueMember, NewLeague, Pick, Profile, ShowStatus, Snapshot, Winner};
