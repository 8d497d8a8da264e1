//! Hardware abstraction traits
//!
//! These traits define the interface between the vault logic and the
//! drivers in `tumbler-drivers`.

pub mod buzzer;
pub mod display;
pub mod lock;

pub use buzzer::Buzzer;
pub use display::SegmentDisplay;
pub use lock::DoorLock;
