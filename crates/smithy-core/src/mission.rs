//! Fixed mission plans and per-run mission state.
//!
//! A [`MissionPlan`] is a literal, ordered list of [`PhasePlan`]s. Each phase
//! declares its block requirements up front and then runs its [`Step`]s in
//! order. Plans are data; the [`Orchestrator`](crate::orchestrator::Orchestrator)
//! interprets them.

use std::collections::BTreeMap;

use smithy_types::{ItemId, MissionName, MissionPhase};

/// One primitive operation inside a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Mine `block` until its drop is held in the phase's required quantity.
    Gather {
        /// Block name.
        block: &'static str,
    },
    /// Resolve `count` of `item` through the resolver.
    Craft {
        /// Item name.
        item: &'static str,
        /// Quantity wanted.
        count: u32,
    },
    /// Place a held `item` near the agent.
    Place {
        /// Item name.
        item: &'static str,
    },
    /// Smelt `count` of the first held candidate, burning `fuel`.
    Smelt {
        /// Input names in probing order.
        candidates: &'static [&'static str],
        /// Fuel item name.
        fuel: &'static str,
        /// Items to smelt.
        count: u32,
    },
}

/// One phase of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePlan {
    /// Which phase this is.
    pub phase: MissionPhase,
    /// Blocks to mine in this phase, by name, with counts.
    pub requirements: &'static [(&'static str, u32)],
    /// Operations run in order.
    pub steps: &'static [Step],
}

/// A complete mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionPlan {
    /// The mission this plan realizes.
    pub mission: MissionName,
    /// Item that must be held at the end.
    pub target: &'static str,
    /// Phases in execution order.
    pub phases: &'static [PhasePlan],
}

static IRON_PICKAXE: MissionPlan = MissionPlan {
    mission: MissionName::IronPickaxe,
    target: "iron_pickaxe",
    phases: &[
        PhasePlan {
            phase: MissionPhase::Init,
            requirements: &[],
            steps: &[],
        },
        PhasePlan {
            phase: MissionPhase::Wood,
            requirements: &[("oak_log", 6)],
            steps: &[Step::Gather { block: "oak_log" }],
        },
        PhasePlan {
            phase: MissionPhase::Stone,
            requirements: &[("stone", 11)],
            steps: &[
                Step::Craft {
                    item: "wooden_pickaxe",
                    count: 1,
                },
                Step::Gather { block: "stone" },
                Step::Craft {
                    item: "stone_pickaxe",
                    count: 1,
                },
                Step::Craft {
                    item: "furnace",
                    count: 1,
                },
            ],
        },
        PhasePlan {
            phase: MissionPhase::IronOre,
            requirements: &[("iron_ore", 3), ("coal_ore", 1)],
            steps: &[
                Step::Gather { block: "iron_ore" },
                Step::Gather { block: "coal_ore" },
            ],
        },
        PhasePlan {
            phase: MissionPhase::Smelt,
            requirements: &[],
            steps: &[
                Step::Place { item: "furnace" },
                Step::Smelt {
                    candidates: &["raw_iron", "iron_ore"],
                    fuel: "coal",
                    count: 3,
                },
            ],
        },
        PhasePlan {
            phase: MissionPhase::CraftFinal,
            requirements: &[],
            steps: &[Step::Craft {
                item: "iron_pickaxe",
                count: 1,
            }],
        },
    ],
};

static STONE_PICKAXE: MissionPlan = MissionPlan {
    mission: MissionName::StonePickaxe,
    target: "stone_pickaxe",
    phases: &[
        PhasePlan {
            phase: MissionPhase::Init,
            requirements: &[],
            steps: &[],
        },
        PhasePlan {
            phase: MissionPhase::Wood,
            requirements: &[("oak_log", 4)],
            steps: &[Step::Gather { block: "oak_log" }],
        },
        PhasePlan {
            phase: MissionPhase::Stone,
            requirements: &[("stone", 3)],
            steps: &[
                Step::Craft {
                    item: "wooden_pickaxe",
                    count: 1,
                },
                Step::Gather { block: "stone" },
            ],
        },
        PhasePlan {
            phase: MissionPhase::CraftFinal,
            requirements: &[],
            steps: &[Step::Craft {
                item: "stone_pickaxe",
                count: 1,
            }],
        },
    ],
};

/// The fixed plan for `mission`.
pub const fn plan_for(mission: MissionName) -> &'static MissionPlan {
    match mission {
        MissionName::IronPickaxe => &IRON_PICKAXE,
        MissionName::StonePickaxe => &STONE_PICKAXE,
    }
}

/// Orchestrator-owned state of one mission run. Discarded when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionState {
    /// The phase being executed.
    pub phase: MissionPhase,
    /// Quantities the mission has declared it needs, by item.
    pub required_quantities: BTreeMap<ItemId, u32>,
}

impl MissionState {
    /// Fresh state at [`MissionPhase::Init`].
    pub const fn new() -> Self {
        Self {
            phase: MissionPhase::Init,
            required_quantities: BTreeMap::new(),
        }
    }

    /// Move to `phase`.
    pub const fn advance(&mut self, phase: MissionPhase) {
        self.phase = phase;
    }

    /// Declare that `quantity` of `item` is needed, replacing any earlier value.
    pub fn require(&mut self, item: ItemId, quantity: u32) {
        self.required_quantities.insert(item, quantity);
    }

    /// The declared quantity of `item`, zero if none.
    pub fn required(&self, item: ItemId) -> u32 {
        self.required_quantities.get(&item).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_run_phases_in_order() {
        for mission in MissionName::ALL {
            let plan = plan_for(mission);
            assert_eq!(plan.mission, mission);
            assert_eq!(plan.phases.first().map(|p| p.phase), Some(MissionPhase::Init));
            assert_eq!(
                plan.phases.last().map(|p| p.phase),
                Some(MissionPhase::CraftFinal)
            );
            assert!(plan.phases.windows(2).all(|w| match w {
                [a, b] => a.phase < b.phase,
                _ => false,
            }));
        }
    }

    #[test]
    fn iron_plan_declares_literal_requirements() {
        let plan = plan_for(MissionName::IronPickaxe);
        let requirements: Vec<_> = plan
            .phases
            .iter()
            .flat_map(|p| p.requirements.iter().copied())
            .collect();
        assert_eq!(
            requirements,
            vec![("oak_log", 6), ("stone", 11), ("iron_ore", 3), ("coal_ore", 1)]
        );
    }

    #[test]
    fn state_tracks_requirements() {
        let mut state = MissionState::new();
        assert_eq!(state.phase, MissionPhase::Init);
        state.advance(MissionPhase::Stone);
        state.require(ItemId(3), 11);
        assert_eq!(state.phase, MissionPhase::Stone);
        assert_eq!(state.required(ItemId(3)), 11);
        assert_eq!(state.required(ItemId(4)), 0);
    }
}
