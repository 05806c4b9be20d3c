//! Application core — pure domain logic, zero I/O.
//!
//! Business rules for the presence-aware fan: command decoding, fusion,
//! runtime cutoff and status cadence.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
