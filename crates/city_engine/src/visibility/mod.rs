//! Layer and system visibility

pub mod visibility_engine;

pub use visibility_engine::{VisibilityEngine, VisibilityState};
