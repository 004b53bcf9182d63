//! liftweek - 21-week strength program tracker
//!
//! Working weights follow a fixed intensity wave; the max weight behind them
//! moves with how the last set went the week before.

pub mod exercises;
pub mod program;
pub mod server;
pub mod session;
pub mod store;
pub mod tui;

pub use session::WorkoutSession;
pub use store::{DocumentStore, FileStore, MemoryStore, WorkoutDocument};
