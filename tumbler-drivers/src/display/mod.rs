//! Display output drivers

pub mod shift_register;

pub use shift_register::ShiftRegisterDisplay;
