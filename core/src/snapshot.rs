//! Snapshot serialization: full simulation state to/from JSON.
//!
//! A snapshot captures everything the reporting side reads after a
//! cycle: clock, rosters, statuses, histories and change markers.

use crate::{
    clock::SimClock,
    error::SimResult,
    population::Population,
    types::{Cycle, RunId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub run_id:     RunId,
    pub cycle:      Cycle,
    pub now:        DateTime<Utc>,
    pub clock:      SimClock,
    pub population: Population,
}

impl SimSnapshot {
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
