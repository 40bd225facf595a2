//! Tunable battle rules.
//!
//! The defaults reproduce the reference numbers exactly; a different rules
//! file only makes sense for experiments run through the batch simulator.

use serde::{Deserialize, Serialize};

/// Numeric rules consulted by the resolver and the session.
///
/// Missing fields fall back to their defaults when deserializing, so a rules
/// file can override a single value.
///
/// # Example
///
/// ```
/// use skirmish_core::CombatRules;
///
/// let rules = CombatRules::default();
/// assert_eq!(rules.combo_window_ms, 3000);
/// assert_eq!(rules.heal_cooldown, 4);
/// assert!(rules.freeze_skips_turn);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Two successful offensive actions closer than this chain a combo.
    pub combo_window_ms: u64,
    /// Combo count from which damage is amplified.
    pub combo_threshold: u32,
    /// Damage multiplier once the threshold is reached.
    pub combo_multiplier: f64,
    /// Turns before a special can be used again.
    pub special_cooldown: u32,
    /// Turns before heal can be used again.
    pub heal_cooldown: u32,
    /// Turns before an ultimate can be used again.
    pub ultimate_cooldown: u32,
    /// Whether a freeze tick costs the frozen side its next turn.
    pub freeze_skips_turn: bool,
    /// Flat experience granted to the winner.
    pub victory_experience_base: u32,
    /// Extra victory experience per level of the loser.
    pub victory_experience_per_level: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            combo_window_ms: 3000,
            combo_threshold: 3,
            combo_multiplier: 1.2,
            special_cooldown: 3,
            heal_cooldown: 4,
            ultimate_cooldown: 6,
            freeze_skips_turn: true,
            victory_experience_base: 50,
            victory_experience_per_level: 10,
        }
    }
}

impl CombatRules {
    /// Experience the winner earns for defeating a loser of `loser_level`.
    #[must_use]
    pub fn victory_experience(&self, loser_level: u32) -> u32 {
        self.victory_experience_base
            .saturating_add(self.victory_experience_per_level.saturating_mul(loser_level))
    }
}
