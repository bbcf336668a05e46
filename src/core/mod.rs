#![allow(missing_docs)] // Doc comments live on the public items in each submodule

//! Event-driven hard-disk engine: particles, collision events, the min-heap that
//! orders them, and the simulation driver that owns both.

pub mod event;
pub mod heap;
pub mod particle;
pub mod random;
pub mod sim;

pub use event::Event;
pub use heap::MinHeap;
pub use particle::{Particle, NO_COLLISION};
pub use random::RandomSource;
pub use sim::{Algorithm, Simulation, Snapshot};
