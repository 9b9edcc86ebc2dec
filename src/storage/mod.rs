//! Persistence of the [crate::model::Model].
//!  - Everything lives in one JSON file, `state.json`, inside the application directory.
//!  - The file is rewritten completely on every change.
//!  - Writers hold an exclusive lock for the whole read-update-write cycle, readers a shared one.

pub mod state_store;
