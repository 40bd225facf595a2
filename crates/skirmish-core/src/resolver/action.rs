//! The six battle actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combatant::Ability;
use crate::error::ParseError;

/// A move a combatant can make on its turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Basic attack; never fails.
    Attack,
    /// Raise shield, regain mana, maybe start regenerating.
    Defend,
    /// Archetype special; costs mana and has a cooldown.
    Special,
    /// Heal 30% of max life; has a cooldown.
    Heal,
    /// Archetype ultimate; costs mana and has a cooldown.
    Ultimate,
    /// Try to leave the battle.
    Flee,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Attack,
        Self::Defend,
        Self::Special,
        Self::Heal,
        Self::Ultimate,
        Self::Flee,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defend => "defend",
            Self::Special => "special",
            Self::Heal => "heal",
            Self::Ultimate => "ultimate",
            Self::Flee => "flee",
        }
    }

    /// True for actions that damage the target and can be combo-amplified.
    #[must_use]
    pub const fn is_offensive(self) -> bool {
        matches!(self, Self::Attack | Self::Special | Self::Ultimate)
    }

    /// The cooldown-gated ability behind this action, if any.
    #[must_use]
    pub const fn ability(self) -> Option<Ability> {
        match self {
            Self::Special => Some(Ability::Special),
            Self::Heal => Some(Ability::Heal),
            Self::Ultimate => Some(Ability::Ultimate),
            Self::Attack | Self::Defend | Self::Flee => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_is_a_parse_error() {
        assert_eq!(
            "dance".parse::<Action>(),
            Err(ParseError::UnknownAction("dance".to_string()))
        );
    }

    #[test]
    fn offensive_actions() {
        let offensive: Vec<_> = Action::ALL.into_iter().filter(|a| a.is_offensive()).collect();
        assert_eq!(offensive, vec![Action::Attack, Action::Special, Action::Ultimate]);
    }

    #[test]
    fn gated_abilities() {
        assert_eq!(Action::Heal.ability(), Some(Ability::Heal));
        assert_eq!(Action::Flee.ability(), None);
    }
}
