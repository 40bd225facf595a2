//! Test helper functions for setting up combatants and scripted randomness.
//!
//! This module provides factory functions and a [`ScriptedDice`] that make
//! writing exact-number tests ergonomic and consistent.

use std::collections::VecDeque;

use crate::combatant::{Archetype, Combatant, CombatantId};
use crate::dice::Dice;

// =============================================================================
// Scripted dice
// =============================================================================

/// Dice that replay queued values.
///
/// When a queue runs dry the defaults apply:
/// - `chance` rolls `0.999_999`, so every probability below 1 fails
/// - `range_inclusive` returns 0 clamped into the range (no variation)
/// - `pick` returns the first candidate
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    ints: VecDeque<i32>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    /// Dice with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues uniform rolls in `[0, 1)` consumed by `chance`.
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queues integers consumed by `range_inclusive` (clamped to the range).
    pub fn with_ints(mut self, ints: impl IntoIterator<Item = i32>) -> Self {
        self.ints.extend(ints);
        self
    }

    /// Queues indices consumed by `pick`.
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl Dice for ScriptedDice {
    fn chance(&mut self, probability: f64) -> bool {
        self.rolls.pop_front().unwrap_or(0.999_999) < probability
    }

    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.ints.pop_front().unwrap_or(0).clamp(low, high)
    }

    fn pick(&mut self, len: usize) -> usize {
        let index = self.picks.pop_front().unwrap_or(0);
        index.min(len.saturating_sub(1))
    }
}

// =============================================================================
// Combatant factories
// =============================================================================

/// Builds a combatant at full life and 100 mana.
pub fn combatant(
    id: u64,
    name: &str,
    archetype: Archetype,
    life: u32,
    attack: u32,
    level: u32,
) -> Combatant {
    Combatant::new(CombatantId::new(id), name, archetype, life, attack, level)
}

/// Warrior, id 1: 100 life, 25 attack, level 10.
pub fn warrior() -> Combatant {
    combatant(1, "Brann", Archetype::Warrior, 100, 25, 10)
}

/// Mage, id 2: 100 life, 25 attack, level 10.
pub fn mage() -> Combatant {
    combatant(2, "Ilsa", Archetype::Mage, 100, 25, 10)
}

/// Rogue, id 3: 100 life, 25 attack, level 10.
pub fn rogue() -> Combatant {
    combatant(3, "Vex", Archetype::Rogue, 100, 25, 10)
}

/// Healer, id 4: 100 life, 25 attack, level 10.
pub fn healer() -> Combatant {
    combatant(4, "Mira", Archetype::Healer, 100, 25, 10)
}

/// Warrior punching bag, id 5: 500 life, 10 attack, level 10.
pub fn tank() -> Combatant {
    combatant(5, "Bulwark", Archetype::Warrior, 500, 10, 10)
}
