//! Door latch drivers

pub mod servo;

pub use servo::{ServoLatch, ServoTiming};
