//! Core traits shared by the CPU and machine crates.
//!
//! The CPU core talks to the outside world only through [`Bus`]; the
//! machine crate implements it on top of its memory fabric and device
//! dispatch. [`Observable`] is the debugger surface every component
//! exposes.

mod bus;
mod observable;

pub use bus::Bus;
pub use observable::{Observable, Value};
