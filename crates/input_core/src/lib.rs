//! # input_core
//!
//! UI-agnostic value layer for input elements driven by lookup widgets.
//!
//! - [`InputValueStore`]: current value, revision and focus per element
//! - [`ValueChange`]: record of a single value mutation and who caused it
//!
//! ## Design Principles
//!
//! The store knows nothing about menus, chips or the network. Hosts mirror
//! their DOM into it (user typing, focus) and widgets write back through it
//! (programmatic selection), so both sides always read the same value.

mod state;
mod store;
mod text;

pub use state::{ChangeSource, ValueChange};
pub use store::InputValueStore;
pub use text::{filter_single_line, trimmed};
