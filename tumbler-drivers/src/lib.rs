//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tumbler-core for the vault hardware:
//!
//! - 74HC595 shift-register display with decimal point line
//! - Hobby servo latch with door-state switch
//! - PWM buzzer

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod display;
pub mod latch;
