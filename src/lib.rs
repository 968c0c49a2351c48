//! Plank timer and training log for the terminal. Times a hold, keeps the
//! last 200 sessions on disk, and turns them into counters, a history list
//! and a per-day chart. Everything lives in one process with no backend.
//!

pub mod aggregate;
pub mod cli;
pub mod storage;
pub mod timer;
pub mod utils;
