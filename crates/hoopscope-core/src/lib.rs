// Core domain for team comparisons: the team catalog, season arithmetic,
// per-team analysis windows and configuration.

pub mod config;
pub mod matchup;
pub mod season;
pub mod teams;
