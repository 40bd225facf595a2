//! Archetypes and their fixed ability data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::status::StatusKind;

/// Combat class of a combatant.
///
/// The archetype fixes the names and costs of the special and ultimate
/// abilities, the mana regained per move, and how the special behaves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Heavy hitter; special causes bleeding.
    Warrior,
    /// Caster; special burns or freezes.
    Mage,
    /// Fast striker; special poisons or slows.
    Rogue,
    /// Support; special heals the caster and purifies the target.
    Healer,
}

/// Immutable per-archetype data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    /// Display name of the special ability.
    pub special_name: &'static str,
    /// Display name of the ultimate ability.
    pub ultimate_name: &'static str,
    /// Mana regained per move (defend, and after every successful action).
    pub mana_regen: u32,
    /// Mana consumed by the special.
    pub special_cost: u32,
    /// Mana consumed by the ultimate.
    pub ultimate_cost: u32,
    /// How the special behaves.
    pub special: SpecialProfile,
}

/// Damage and side effects of an archetype's special ability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialProfile {
    /// Multiplier applied to `attack + level`.
    pub multiplier: f64,
    /// Probability that one of `effects` is applied.
    pub effect_chance: f64,
    /// Candidate effects; one is picked uniformly on a successful roll.
    pub effects: &'static [StatusKind],
    /// Fraction of the raw special damage the caster heals for.
    pub self_heal_ratio: f64,
}

const WARRIOR: ArchetypeProfile = ArchetypeProfile {
    special_name: "Berserker Fury",
    ultimate_name: "Devastating Cleave",
    mana_regen: 5,
    special_cost: 30,
    ultimate_cost: 60,
    special: SpecialProfile {
        multiplier: 2.0,
        effect_chance: 0.6,
        effects: &[StatusKind::Bleed],
        self_heal_ratio: 0.0,
    },
};

const MAGE: ArchetypeProfile = ArchetypeProfile {
    special_name: "Fireball",
    ultimate_name: "Arcane Meteor",
    mana_regen: 8,
    special_cost: 25,
    ultimate_cost: 70,
    special: SpecialProfile {
        multiplier: 1.8,
        effect_chance: 0.7,
        effects: &[StatusKind::Burn, StatusKind::Freeze],
        self_heal_ratio: 0.0,
    },
};

const ROGUE: ArchetypeProfile = ArchetypeProfile {
    special_name: "Sneak Attack",
    ultimate_name: "Thousand Cuts",
    mana_regen: 6,
    special_cost: 20,
    ultimate_cost: 50,
    special: SpecialProfile {
        multiplier: 2.2,
        effect_chance: 0.5,
        effects: &[StatusKind::Poison, StatusKind::Slow],
        self_heal_ratio: 0.0,
    },
};

const HEALER: ArchetypeProfile = ArchetypeProfile {
    special_name: "Healing Light",
    ultimate_name: "Divine Blessing",
    mana_regen: 10,
    special_cost: 35,
    ultimate_cost: 80,
    special: SpecialProfile {
        multiplier: 1.3,
        effect_chance: 0.8,
        effects: &[StatusKind::Purify],
        self_heal_ratio: 0.3,
    },
};

impl Archetype {
    /// All archetypes in declaration order.
    pub const ALL: [Self; 4] = [Self::Warrior, Self::Mage, Self::Rogue, Self::Healer];

    /// Returns the fixed ability data for this archetype.
    ///
    /// # Example
    ///
    /// ```
    /// use skirmish_core::Archetype;
    ///
    /// let mage = Archetype::Mage.profile();
    /// assert_eq!(mage.special_cost, 25);
    /// assert_eq!(mage.ultimate_cost, 70);
    /// assert_eq!(mage.mana_regen, 8);
    /// ```
    #[must_use]
    pub fn profile(self) -> &'static ArchetypeProfile {
        match self {
            Self::Warrior => &WARRIOR,
            Self::Mage => &MAGE,
            Self::Rogue => &ROGUE,
            Self::Healer => &HEALER,
        }
    }

    /// Lowercase name, as used in rules files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Mage => "mage",
            Self::Rogue => "rogue",
            Self::Healer => "healer",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownArchetype(s.to_string()))
    }
}
