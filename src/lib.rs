//! Small command line tracker for projects, their todos and the time spent working on them.
//! The whole state lives in one JSON file that is rewritten on every change, so it can be
//! inspected, exported or edited by hand between runs.
//!

pub mod cli;
pub mod codec;
pub mod model;
pub mod storage;
pub mod update;
pub mod utils;
