//! Door state machine
//!
//! Defines what the latch does. The state machine is explicit, finite,
//! and deterministic; the controller feeds it events and acts on the
//! resulting state.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
