//! Mission names, phases, and the report handed back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MissionId;

/// A named, fixed multi-phase goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionName {
    /// Obtain an iron pickaxe starting from nothing.
    IronPickaxe,
    /// Obtain a stone pickaxe starting from nothing.
    StonePickaxe,
}

impl MissionName {
    /// Every mission the orchestrator knows.
    pub const ALL: [Self; 2] = [Self::IronPickaxe, Self::StonePickaxe];

    /// The wire name of this mission.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IronPickaxe => "iron_pickaxe",
            Self::StonePickaxe => "stone_pickaxe",
        }
    }

    /// Look a mission up by its wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl core::fmt::Display for MissionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phase of the mission state machine, in execution order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionPhase {
    /// Mission setup: landmarks resolved, requirements declared.
    #[default]
    Init,
    /// Wood gathering.
    Wood,
    /// First tool tier and stone gathering.
    Stone,
    /// Ore and fuel gathering.
    IronOre,
    /// Furnace placement and smelting.
    Smelt,
    /// Final assembly of the target item.
    CraftFinal,
}

impl MissionPhase {
    /// Every phase, in execution order.
    pub const ALL: [Self; 6] = [
        Self::Init,
        Self::Wood,
        Self::Stone,
        Self::IronOre,
        Self::Smelt,
        Self::CraftFinal,
    ];

    /// The upper-case label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Wood => "WOOD",
            Self::Stone => "STONE",
            Self::IronOre => "IRON_ORE",
            Self::Smelt => "SMELT",
            Self::CraftFinal => "CRAFT_FINAL",
        }
    }
}

impl core::fmt::Display for MissionPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one mission run.
///
/// `report` is a flat, ordered diagnostic log: enough for a human to see where
/// the chain broke, not a structured error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionReport {
    /// Identifier of this run.
    pub mission_id: MissionId,
    /// The mission name as requested.
    pub mission: String,
    /// Whether every phase completed.
    pub succeeded: bool,
    /// The phase that aborted the mission, if any.
    pub failed_phase: Option<MissionPhase>,
    /// Ordered human-readable steps.
    pub report: Vec<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished (success or abort).
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_names_round_trip() {
        for mission in MissionName::ALL {
            assert_eq!(MissionName::parse(mission.as_str()), Some(mission));
        }
        assert_eq!(MissionName::parse("diamond_pickaxe"), None);
    }

    #[test]
    fn phases_are_ordered() {
        assert!(MissionPhase::Init < MissionPhase::Wood);
        assert!(MissionPhase::Smelt < MissionPhase::CraftFinal);
    }

    #[test]
    fn phase_serde_uses_labels() {
        let json = serde_json::to_string(&MissionPhase::IronOre).unwrap_or_default();
        assert_eq!(json, "\"IRON_ORE\"");
        assert_eq!(MissionPhase::CraftFinal.to_string(), "CRAFT_FINAL");
    }
}
