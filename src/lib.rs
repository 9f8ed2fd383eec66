//! Guild price board: tracks player-company sell offers for in-game goods,
//! prices them from the live exchange feed, and republishes JSON snapshots
//! for external consumers.

pub mod app;
pub mod domain;
pub mod infra;
pub mod util;
