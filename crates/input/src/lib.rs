//! Input: window-library events reduced to a small platform-neutral set.
//!
//! # Invariants
//! - Hosts push events as they arrive; the frame loop drains them once per frame.
//! - Drain order equals push order.

pub mod event;
pub mod queue;

pub use event::{InputEvent, Key};
pub use queue::EventQueue;
