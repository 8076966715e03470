//! ColonyLevel - ordered evolution stages of a room

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maturity tier, lowest first. `Ord` follows the declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ColonyLevel {
    #[default]
    Seed,
    EarlyExpansion,
    EconomicMaturity,
    Fortification,
    EndGame,
}

impl ColonyLevel {
    /// Stages from lowest to highest
    pub const ASCENDING: [ColonyLevel; 5] = [
        ColonyLevel::Seed,
        ColonyLevel::EarlyExpansion,
        ColonyLevel::EconomicMaturity,
        ColonyLevel::Fortification,
        ColonyLevel::EndGame,
    ];

    pub const LOWEST: ColonyLevel = ColonyLevel::Seed;

    pub fn as_str(self) -> &'static str {
        match self {
            ColonyLevel::Seed => "seed",
            ColonyLevel::EarlyExpansion => "earlyExpansion",
            ColonyLevel::EconomicMaturity => "economicMaturity",
            ColonyLevel::Fortification => "fortification",
            ColonyLevel::EndGame => "endGame",
        }
    }

    /// Zero-based rank in [`ColonyLevel::ASCENDING`]
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ColonyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
