//! PresenceFan firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  ESP-IDF-specific code is guarded by the `espidf` feature
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod link;
pub mod pins;
pub mod protocol;
pub mod safety;

pub mod adapters;
pub mod drivers;
pub mod sensors;
