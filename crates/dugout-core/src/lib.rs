// Library root for the leaderboard engine.
//
// Everything in this crate is synchronous and free of I/O: callers hand in a
// fully loaded `LeagueSnapshot` and get ranked, annotated leaderboards back.

pub mod career;
pub mod catalog;
pub mod dataset;
pub mod format;
pub mod franchise;
pub mod leaderboard;
pub mod players;
pub mod qualification;
pub mod stats;
