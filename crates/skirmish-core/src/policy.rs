//! Action selection for sides not driven by a player.
//!
//! The session consults an [`OpponentPolicy`] whenever the side holding the
//! turn is not the controlled one. Policies only choose; the session still
//! validates and resolves the choice, and retries a failed choice as a plain
//! attack.

use crate::combatant::{Ability, Combatant};
use crate::dice::Dice;
use crate::resolver::Action;

/// Chooses an action for a combatant.
///
/// Implementations must be deterministic given the dice they are handed.
pub trait OpponentPolicy: Send + Sync {
    /// Picks the next action for `me` facing `opponent`.
    fn choose(&self, me: &Combatant, opponent: &Combatant, dice: &mut dyn Dice) -> Action;
}

/// The stock behaviour: play safe when hurt, otherwise attack.
///
/// | condition            | choice                                  |
/// |----------------------|-----------------------------------------|
/// | life < 20% of max    | 30% flee, else 70% heal, else attack    |
/// | life < 40% of max    | 60% heal, else attack                   |
/// | mana ≥ special cost  | 40% special, else attack                |
/// | otherwise            | attack                                  |
///
/// # Example
///
/// ```
/// use skirmish_core::{Action, Archetype, Combatant, CombatantId, HeuristicPolicy, OpponentPolicy};
///
/// let mut rng = skirmish_core::dice::seeded(1);
/// let me = Combatant::new(CombatantId::new(1), "Ninja", Archetype::Rogue, 85, 32, 9).with_mana(0);
/// let foe = Combatant::new(CombatantId::new(2), "Golem", Archetype::Warrior, 180, 15, 9);
///
/// assert_eq!(HeuristicPolicy.choose(&me, &foe, &mut rng), Action::Attack);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl OpponentPolicy for HeuristicPolicy {
    fn choose(&self, me: &Combatant, _opponent: &Combatant, dice: &mut dyn Dice) -> Action {
        let life = me.life_ratio();

        if life < 0.2 {
            if dice.chance(0.3) {
                Action::Flee
            } else if dice.chance(0.7) {
                Action::Heal
            } else {
                Action::Attack
            }
        } else if life < 0.4 {
            if dice.chance(0.6) {
                Action::Heal
            } else {
                Action::Attack
            }
        } else if me.can_afford(Ability::Special) && dice.chance(0.4) {
            Action::Special
        } else {
            Action::Attack
        }
    }
}
