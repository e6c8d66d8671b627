//! Mission orchestration.
//!
//! The [`Orchestrator`] walks a [`MissionPlan`] phase by phase. Each phase
//! declares its requirements into the [`MissionState`], then runs its steps
//! through the resolver and the primitive tools. The first failing step
//! aborts the mission; nothing is rolled back or retried, and a new run
//! starts again from `INIT`.

use chrono::Utc;
use smithy_types::{ItemId, MissionId, MissionName, MissionPhase, MissionReport};
use tracing::{info, warn};

use crate::error::{MissionError, ToolError};
use crate::mission::{MissionPlan, MissionState, PhasePlan, Step, plan_for};
use crate::quantity;
use crate::report::StepLog;
use crate::resolver::{Resolution, Resolver};
use crate::session::Session;
use crate::tools::{collect, inventory, place, smelt};

/// Runs missions and single resolutions against one session.
#[derive(Debug)]
pub struct Orchestrator<'s, 'a> {
    session: &'s mut Session<'a>,
}

impl<'s, 'a> Orchestrator<'s, 'a> {
    /// Borrow a session for orchestration.
    pub const fn new(session: &'s mut Session<'a>) -> Self {
        Self { session }
    }

    /// Resolve `quantity` of `item` with a fresh resolver.
    pub fn resolve(&mut self, item: ItemId, quantity: u32) -> Resolution {
        Resolver::new(self.session).resolve(item, quantity)
    }

    /// Run a mission by name. Unknown names fail at `INIT`.
    pub fn run_mission(&mut self, name: &str) -> MissionReport {
        if let Some(mission) = MissionName::parse(name) {
            return self.run(mission);
        }
        let now = Utc::now();
        let err = MissionError::UnknownMission(name.to_owned());
        warn!(mission = %name, "Unknown mission");
        MissionReport {
            mission_id: MissionId::new(),
            mission: name.to_owned(),
            succeeded: false,
            failed_phase: Some(MissionPhase::Init),
            report: vec![format!("[{}] failed: {err}", MissionPhase::Init)],
            started_at: now,
            finished_at: now,
        }
    }

    /// Run a known mission.
    pub fn run(&mut self, mission: MissionName) -> MissionReport {
        self.run_plan(plan_for(mission))
    }

    /// Run an arbitrary plan.
    pub fn run_plan(&mut self, plan: &MissionPlan) -> MissionReport {
        let mission_id = MissionId::new();
        let started_at = Utc::now();
        info!(%mission_id, mission = %plan.mission, "Mission started");

        let mut state = MissionState::new();
        let mut report = Vec::new();
        let mut failed_phase = None;

        for phase in plan.phases {
            state.advance(phase.phase);
            info!(%mission_id, phase = %phase.phase, "Phase started");
            let mut log = StepLog::new();
            let outcome = self.run_phase(phase, &mut state, &mut log);
            report.extend(
                log.into_steps()
                    .into_iter()
                    .map(|line| format!("[{}] {line}", phase.phase)),
            );
            if let Err(err) = outcome {
                warn!(%mission_id, phase = %phase.phase, %err, "Mission aborted");
                report.push(format!("[{}] failed: {err}", phase.phase));
                failed_phase = Some(phase.phase);
                break;
            }
        }

        if failed_phase.is_none() {
            let last = state.phase;
            match self.session.catalog().item_id(plan.target) {
                Some(target) if self.session.held(target) > 0 => {
                    report.push(format!("[{last}] mission complete: holding {}", plan.target));
                }
                _ => {
                    report.push(format!("[{last}] failed: {} not held at the end", plan.target));
                    failed_phase = Some(last);
                }
            }
        }

        let succeeded = failed_phase.is_none();
        info!(%mission_id, mission = %plan.mission, succeeded, "Mission finished");
        MissionReport {
            mission_id,
            mission: plan.mission.as_str().to_owned(),
            succeeded,
            failed_phase,
            report,
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn run_phase(
        &mut self,
        phase: &PhasePlan,
        state: &mut MissionState,
        log: &mut StepLog,
    ) -> Result<(), MissionError> {
        if phase.phase == MissionPhase::Init {
            log.push(format!("inventory: {}", inventory::summary(self.session)));
            log.push(format!("at {}", self.session.agent().position()));
        }

        let catalog = self.session.catalog();
        for &(block_name, count) in phase.requirements {
            let block = catalog
                .block_id(block_name)
                .ok_or_else(|| ToolError::UnknownBlock(block_name.to_owned()))?;
            let drop = catalog
                .block(block)
                .and_then(|def| def.drops)
                .ok_or_else(|| MissionError::NoDrop {
                    block: block_name.to_owned(),
                })?;
            state.require(drop, count);
            log.push(format!(
                "requires {count} {} (from {block_name})",
                self.session.item_name(drop)
            ));
        }

        for step in phase.steps {
            self.run_step(step, state, log)?;
        }
        Ok(())
    }

    fn run_step(
        &mut self,
        step: &Step,
        state: &MissionState,
        log: &mut StepLog,
    ) -> Result<(), MissionError> {
        let catalog = self.session.catalog();
        match *step {
            Step::Gather { block } => {
                let block_id = catalog
                    .block_id(block)
                    .ok_or_else(|| ToolError::UnknownBlock(block.to_owned()))?;
                let drop = catalog
                    .block(block_id)
                    .and_then(|def| def.drops)
                    .ok_or_else(|| MissionError::NoDrop {
                        block: block.to_owned(),
                    })?;
                let needed = state.required(drop);
                let wanted = quantity::deficit(needed, self.session.held(drop));
                let drop_name = self.session.item_name(drop);
                if wanted == 0 {
                    log.push(format!("already hold {needed} {drop_name}"));
                    return Ok(());
                }
                collect::collect(self.session, log, block_id, wanted)?;
                let held = self.session.held(drop);
                if held < needed {
                    return Err(MissionError::RequirementUnmet {
                        item: drop_name,
                        needed,
                        held,
                    });
                }
                Ok(())
            }
            Step::Craft { item, count } => {
                let resolution = Resolver::new(self.session).resolve_named(item, count);
                for line in resolution.steps {
                    log.push(line);
                }
                resolution.result?;
                Ok(())
            }
            Step::Place { item } => {
                place::place_named(self.session, log, item)?;
                Ok(())
            }
            Step::Smelt {
                candidates,
                fuel,
                count,
            } => {
                let input = candidates
                    .iter()
                    .filter_map(|name| catalog.item_id(name))
                    .find(|id| self.session.held(*id) > 0)
                    .ok_or_else(|| MissionError::NothingToSmelt {
                        candidates: candidates.join(", "),
                    })?;
                log.push(format!("smeltable input is {}", self.session.item_name(input)));
                let fuel_id = catalog
                    .item_id(fuel)
                    .ok_or_else(|| ToolError::UnknownItem(fuel.to_owned()))?;
                smelt::smelt(self.session, log, input, fuel_id, count)?;
                Ok(())
            }
        }
    }
}
