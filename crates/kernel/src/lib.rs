//! Zoo kernel: population state, hunger stepping, timer-driven runner.
//!
//! # Invariants
//! - A decay rate is never zero, so live animals get strictly hungrier every tick.
//! - Dead animals are frozen: no hunger change, no further events.
//! - All state mutations flow through [`Zoo::step`]; events come back to the caller.

pub mod animal;
pub mod rng;
pub mod runner;
pub mod zoo;

pub use animal::{Animal, AnimalId, LifeEvent};
pub use rng::{Draw, Scripted, SplitMix64};
pub use runner::{RunConfig, SimCommand, SimError, SimState, SimulationHandle, TickReport};
pub use zoo::{SpeciesCensus, StockGroup, Zoo};
