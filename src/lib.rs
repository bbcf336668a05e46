//! Event-driven simulation of a 2D hard-disk gas.
//!
//! Instead of stepping time uniformly, the engine predicts each particle's next
//! collision, keeps the predictions in a min-heap ordered by time, and jumps straight
//! to the earliest one. Rendering is left to callers: [`core::Simulation::snapshot`]
//! exposes the box and particle positions read-only.

pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::config::SimConfig;
pub use crate::core::{Algorithm, Event, MinHeap, Particle, Simulation, Snapshot};
pub use crate::error::{Error, Result};
