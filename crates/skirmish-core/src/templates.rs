//! Stock characters.
//!
//! The roster a new game starts from. Spawning a template rolls the level in
//! `8..=17`; everything else comes from the table.

use serde::Serialize;

use crate::combatant::{Archetype, Combatant, CombatantId};
use crate::dice::Dice;

/// Lowest level a spawned template can roll.
pub const MIN_SPAWN_LEVEL: i32 = 8;
/// Highest level a spawned template can roll.
pub const MAX_SPAWN_LEVEL: i32 = 17;

/// A stock character definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterTemplate {
    /// Display name.
    pub name: &'static str,
    /// Sprite glyph used by presentation layers.
    pub glyph: &'static str,
    /// Maximum life.
    pub life: u32,
    /// Base attack.
    pub attack: u32,
    /// Combat class.
    pub archetype: Archetype,
}

/// Every stock character, in roster order.
pub static TEMPLATES: [CharacterTemplate; 8] = [
    template("Akira", "🧙", 100, 25, Archetype::Mage),
    template("Dragão", "🐉", 140, 22, Archetype::Warrior),
    template("Luna", "🔮", 90, 30, Archetype::Mage),
    template("Thor", "⚡", 160, 20, Archetype::Warrior),
    template("Ninja", "🥷", 85, 32, Archetype::Rogue),
    template("Seraphina", "🧝", 95, 18, Archetype::Healer),
    template("Golem", "🗿", 180, 15, Archetype::Warrior),
    template("Assassino", "🔪", 75, 35, Archetype::Rogue),
];

const fn template(
    name: &'static str,
    glyph: &'static str,
    life: u32,
    attack: u32,
    archetype: Archetype,
) -> CharacterTemplate {
    CharacterTemplate {
        name,
        glyph,
        life,
        attack,
        archetype,
    }
}

/// Looks a template up by name, ignoring case.
///
/// # Example
///
/// ```
/// use skirmish_core::{templates, Archetype};
///
/// let ninja = templates::find("ninja").unwrap();
/// assert_eq!(ninja.archetype, Archetype::Rogue);
/// assert!(templates::find("Merlin").is_none());
/// ```
#[must_use]
pub fn find(name: &str) -> Option<&'static CharacterTemplate> {
    let name = name.trim();
    TEMPLATES
        .iter()
        .find(|t| t.name.to_lowercase() == name.to_lowercase())
}

impl CharacterTemplate {
    /// Creates a combatant from this template with a random level.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn spawn(&self, id: CombatantId, dice: &mut dyn Dice) -> Combatant {
        let level = dice.range_inclusive(MIN_SPAWN_LEVEL, MAX_SPAWN_LEVEL) as u32;
        Combatant::new(id, self.name, self.archetype, self.life, self.attack, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::seeded;

    #[test]
    fn names_are_unique() {
        for (i, a) in TEMPLATES.iter().enumerate() {
            for b in &TEMPLATES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn find_handles_non_ascii_names() {
        let dragon = find("DRAGÃO").unwrap();
        assert_eq!(dragon.life, 140);
        assert_eq!(dragon.archetype, Archetype::Warrior);
    }

    #[test]
    fn spawn_rolls_level_in_range() {
        let mut rng = seeded(11);
        let golem = find("Golem").unwrap();
        for id in 0..100 {
            let c = golem.spawn(CombatantId::new(id), &mut rng);
            assert!((8..=17).contains(&c.level()));
            assert_eq!(c.max_life(), 180);
            assert_eq!(c.current_life(), 180);
            assert_eq!(c.attack(), 15);
            assert_eq!(c.mana(), 100);
        }
    }
}
