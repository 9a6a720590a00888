//! Training rotation simulator core.
//!
//! A fixed population of employees rotates through capacity-bounded
//! training departments, one cycle of the virtual clock at a time.
//! Nothing in this crate performs I/O beyond `SimConfig::load`.

pub mod admission_limit_rule;
pub mod clock;
pub mod config;
pub mod department;
pub mod departure_limit_rule;
pub mod employee;
pub mod engine;
pub mod error;
pub mod event;
pub mod gender_exclusion_rule;
pub mod no_repeat_rule;
pub mod orchestrator;
pub mod population;
pub mod rng;
pub mod rule;
pub mod rule_engine;
pub mod snapshot;
pub mod synthetic;
pub mod types;
