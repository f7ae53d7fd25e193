// Library root: configuration, dataset loading, export, and the command-line
// front end around the leaderboard engine.

pub mod cli;
pub mod config;
pub mod export;
pub mod loader;
