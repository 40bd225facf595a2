//! Cooldown counters and aggregate battle statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Abilities gated by a cooldown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    /// The archetype special.
    Special,
    /// Self heal.
    Heal,
    /// The archetype ultimate.
    Ultimate,
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Special => f.write_str("special"),
            Self::Heal => f.write_str("heal"),
            Self::Ultimate => f.write_str("ultimate"),
        }
    }
}

/// Remaining turns before each ability is usable again.
///
/// A value of 0 means ready. Counters only move down through
/// [`Cooldowns::tick_except`], once per action the owner performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldowns {
    /// Turns until the special is ready.
    pub special: u32,
    /// Turns until heal is ready.
    pub heal: u32,
    /// Turns until the ultimate is ready.
    pub ultimate: u32,
}

impl Cooldowns {
    /// Remaining turns for `ability`.
    #[must_use]
    pub const fn get(&self, ability: Ability) -> u32 {
        match ability {
            Ability::Special => self.special,
            Ability::Heal => self.heal,
            Ability::Ultimate => self.ultimate,
        }
    }

    /// True when `ability` can be used.
    #[must_use]
    pub const fn is_ready(&self, ability: Ability) -> bool {
        self.get(ability) == 0
    }

    /// Starts the cooldown of `ability` at `turns`.
    pub fn start(&mut self, ability: Ability, turns: u32) {
        *self.slot_mut(ability) = turns;
    }

    /// Decrements every running cooldown except the one just started.
    pub fn tick_except(&mut self, fresh: Option<Ability>) {
        for ability in [Ability::Special, Ability::Heal, Ability::Ultimate] {
            if Some(ability) == fresh {
                continue;
            }
            let slot = self.slot_mut(ability);
            *slot = slot.saturating_sub(1);
        }
    }

    /// Resets every cooldown to ready.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot_mut(&mut self, ability: Ability) -> &mut u32 {
        match ability {
            Ability::Special => &mut self.special,
            Ability::Heal => &mut self.heal,
            Ability::Ultimate => &mut self.ultimate,
        }
    }
}

/// Lifetime battle statistics of a combatant.
///
/// All counters only grow; they are zeroed by
/// [`Combatant::restart`](crate::Combatant::restart) and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    /// Battles won.
    pub wins: u32,
    /// Times defeated.
    pub losses: u32,
    /// Life actually removed from opponents.
    pub damage_dealt: u64,
    /// Life actually lost, from any source.
    pub damage_received: u64,
    /// Specials that went off.
    pub specials_used: u32,
    /// Heals that restored life.
    pub heals_used: u32,
    /// Critical basic attacks.
    pub critical_hits: u32,
}
