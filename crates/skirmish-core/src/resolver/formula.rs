//! Combat formulas.
//!
//! Pure functions of combatant stats; all rounding is floor.

use crate::combatant::Combatant;
use crate::numeric::{floor_to_u32, scale};

/// Damage multiplier against a defending target, per action.
pub const ATTACK_DEFENDED: f64 = 0.4;
/// Special damage multiplier against a defending target.
pub const SPECIAL_DEFENDED: f64 = 0.6;
/// Ultimate damage multiplier against a defending target.
pub const ULTIMATE_DEFENDED: f64 = 0.8;

/// Basic attack damage before variation: `attack + floor(level / 2)`.
#[must_use]
pub fn attack_base(actor: &Combatant) -> u32 {
    actor.attack() + actor.level() / 2
}

/// Applies the `[-5, 4]` variation, never going below 1.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn with_variation(base: u32, variation: i32) -> u32 {
    (i64::from(base) + i64::from(variation)).max(1) as u32
}

/// `0.10 + 0.01 × level + 0.02 × combos`.
#[must_use]
pub fn crit_chance(level: u32, combos: u32) -> f64 {
    0.1 + f64::from(level) * 0.01 + f64::from(combos) * 0.02
}

/// `1.5 + 0.1 × combos`.
#[must_use]
pub fn crit_multiplier(combos: u32) -> f64 {
    1.5 + f64::from(combos) * 0.1
}

/// Shield gained by defending: `floor(level × 2 + attack × 0.3)`.
#[must_use]
pub fn defend_shield(actor: &Combatant) -> u32 {
    floor_to_u32(f64::from(actor.level()) * 2.0 + f64::from(actor.attack()) * 0.3)
}

/// Special damage before defend and shield: `floor((attack + level) × mult)`.
#[must_use]
pub fn special_raw(actor: &Combatant) -> u32 {
    scale(
        actor.attack() + actor.level(),
        actor.profile().special.multiplier,
    )
}

/// Ultimate damage before defend: `floor((attack + 2 × level) × 2.5)`.
#[must_use]
pub fn ultimate_raw(actor: &Combatant) -> u32 {
    scale(actor.attack() + actor.level() * 2, 2.5)
}

/// Escape probability: `0.6 + 0.02 × level + 0.3 × (1 − life / max_life)`.
#[must_use]
pub fn flee_chance(actor: &Combatant) -> f64 {
    0.6 + f64::from(actor.level()) * 0.02 + 0.3 * (1.0 - actor.life_ratio())
}

/// Life lost on a failed escape: `floor(max_life × 0.1)`.
#[must_use]
pub fn flee_penalty(actor: &Combatant) -> u32 {
    scale(actor.max_life(), 0.1)
}

/// Life restored by heal: `floor(max_life × 0.3)`.
#[must_use]
pub fn heal_amount(actor: &Combatant) -> u32 {
    scale(actor.max_life(), 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{healer, mage, warrior};

    #[test]
    fn attack_base_halves_level() {
        let c = warrior();
        assert_eq!(attack_base(&c), 30);
    }

    #[test]
    fn variation_floors_at_one() {
        assert_eq!(with_variation(30, -5), 25);
        assert_eq!(with_variation(30, 4), 34);
        assert_eq!(with_variation(3, -5), 1);
    }

    #[test]
    fn crit_scales_with_level_and_combos() {
        assert!((crit_chance(10, 0) - 0.2).abs() < 1e-9);
        assert!((crit_chance(10, 3) - 0.26).abs() < 1e-9);
        assert!((crit_multiplier(2) - 1.7).abs() < 1e-9);
    }

    #[test]
    fn defend_shield_formula() {
        // level 10, attack 25: 20 + 7.5
        assert_eq!(defend_shield(&warrior()), 27);
    }

    #[test]
    fn special_by_archetype() {
        // (25 + 10) * 2.0
        assert_eq!(special_raw(&warrior()), 70);
        // (25 + 10) * 1.8
        assert_eq!(special_raw(&mage()), 63);
        // (25 + 10) * 1.3
        assert_eq!(special_raw(&healer()), 45);
    }

    #[test]
    fn ultimate_formula() {
        // (25 + 20) * 2.5
        assert_eq!(ultimate_raw(&warrior()), 112);
    }

    #[test]
    fn flee_rises_as_life_drops() {
        let full = warrior();
        let hurt = warrior().with_life(5);
        assert!((flee_chance(&full) - 0.8).abs() < 1e-9);
        assert!(flee_chance(&hurt) >= 1.0);
    }

    #[test]
    fn percent_of_max_life() {
        let c = warrior();
        assert_eq!(flee_penalty(&c), 10);
        assert_eq!(heal_amount(&c), 30);
    }
}
