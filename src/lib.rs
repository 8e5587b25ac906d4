//! Live monitor for a wearable accelerometer that streams framed packets.
//!
//! [`protocol`] turns arbitrarily chunked bytes into [`protocol::Sample`]s,
//! [`waveform`] keeps them as a bounded multi-channel time series and derives
//! tap rates, and [`gui`] draws the result.
pub mod config;
pub mod engine;
pub mod gui;
pub mod protocol;
pub mod types;
pub mod waveform;
