//! The simulation engine. Owns the clock, the population and the rules.
//!
//! CYCLE ORDER (fixed, documented, never reordered):
//!   0. Initial delay        (first cycle only)
//!   1. Clock advance        (cycle_length_months)
//!   2. Orchestrator passes  (reset, removal, assignment, finalization)
//!   3. Cycle report appended to the in-memory log
//!
//! RULES:
//!   - All setup (config validation, rule resolution, seeding) finishes in
//!     build(). A misconfigured run fails before producing any cycle.
//!   - The rotation uses no randomness; identical inputs give identical runs.

use crate::{
    clock::SimClock,
    config::SimConfig,
    error::SimResult,
    event::CycleReport,
    orchestrator,
    population::{DepartmentRecord, EmployeeRecord, Population, StatusSummary},
    rule_engine::RuleEngine,
    snapshot::SimSnapshot,
    types::{Cycle, RunId},
};

pub struct SimEngine {
    pub run_id:     RunId,
    pub clock:      SimClock,
    pub population: Population,
    rules:          RuleEngine,
    config:         SimConfig,
    current_cycle:  Cycle,
    cycle_log:      Vec<CycleReport>,
}

impl SimEngine {
    /// Validate the config, resolve rules, and seed the population.
    pub fn build(
        run_id: RunId,
        config: SimConfig,
        departments: &[DepartmentRecord],
        employees: &[EmployeeRecord],
        clock: SimClock,
    ) -> SimResult<Self> {
        config.validate()?;
        let rules = RuleEngine::from_specs(&config.rules)?;
        let population = Population::seed(departments, employees, &clock)?;
        log::info!(
            "run {run_id}: {} rule(s) active [{}]",
            rules.len(),
            rules.names().join(", ")
        );
        Ok(Self {
            run_id,
            clock,
            population,
            rules,
            config,
            current_cycle: 0,
            cycle_log: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn current_cycle(&self) -> Cycle {
        self.current_cycle
    }

    pub fn cycle_log(&self) -> &[CycleReport] {
        &self.cycle_log
    }

    /// Advance the clock and run one orchestrator cycle.
    pub fn cycle(&mut self) -> SimResult<&CycleReport> {
        if self.current_cycle == 0 && self.config.initial_delay_months > 0.0 {
            self.clock.advance(self.config.initial_delay_months);
            log::info!(
                "run {}: start delayed by {} month(s)",
                self.run_id,
                self.config.initial_delay_months
            );
        }
        let now = self.clock.advance(self.config.cycle_length_months);
        self.current_cycle += 1;

        let events = orchestrator::run_cycle(&mut self.population, &self.rules, &self.clock)?;

        let summary = self.population.summary();
        log::info!(
            "cycle={} {}: {} event(s); {} waiting / {} assigned / {} finished",
            self.current_cycle,
            now.format("%Y-%m"),
            events.len(),
            summary.waiting,
            summary.assigned,
            summary.finished
        );

        self.cycle_log.push(CycleReport {
            cycle: self.current_cycle,
            now,
            events,
        });
        Ok(&self.cycle_log[self.cycle_log.len() - 1])
    }

    /// Run n cycles in a loop.
    pub fn run_cycles(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.cycle()?;
        }
        Ok(())
    }

    /// Run the number of cycles named in the config.
    pub fn run(&mut self) -> SimResult<()> {
        self.run_cycles(u64::from(self.config.cycles))
    }

    pub fn summary(&self) -> StatusSummary {
        self.population.summary()
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            run_id: self.run_id.clone(),
            cycle:  self.current_cycle,
            now:    self.clock.now(),
            clock:  self.clock.clone(),
            population: self.population.clone(),
        }
    }
}
