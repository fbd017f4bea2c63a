// Public API
pub mod config;
pub mod error;
pub mod export;
pub mod lookup;
pub mod map;
pub mod prefs;
pub mod probe;
pub mod state;
pub mod terminal;
pub mod trace;
