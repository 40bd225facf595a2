//! Error types for caller mistakes.
//!
//! Gameplay failures (not enough mana, ability on cooldown, a failed escape)
//! are never errors: they come back as an [`ActionResult`](crate::ActionResult)
//! with `success == false`. The types here signal that the *caller* broke a
//! precondition, such as acting with a defeated combatant or acting out of turn.

use crate::combatant::{Combatant, CombatantId};
use crate::session::Side;

/// Precondition violations raised by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The actor or target is at 0 life.
    #[error("combatant {0} is defeated and cannot take part in an action")]
    CombatantDefeated(CombatantId),

    /// Both sides of a battle refer to the same combatant.
    #[error("combatant {0} cannot battle itself")]
    SameCombatant(CombatantId),

    /// The controlled side tried to act while the other side holds the turn.
    #[error("it is not the {0} side's turn")]
    NotYourTurn(Side),

    /// The session already reached victory or escape.
    #[error("the battle is already over")]
    BattleOver,

    /// A battle operation was requested while exploring.
    #[error("no battle is in progress")]
    NoActiveBattle,

    /// A second battle was requested while one is running.
    #[error("a battle is already in progress")]
    BattleInProgress,

    /// The id is not in the roster.
    #[error("unknown combatant {0}")]
    UnknownCombatant(CombatantId),
}

/// Errors from parsing engine enums out of strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not one of `attack|defend|special|heal|ultimate|flee`.
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    /// Not one of `warrior|mage|rogue|healer`.
    #[error("unknown archetype `{0}`")]
    UnknownArchetype(String),

    /// Not a known status effect name.
    #[error("unknown status effect `{0}`")]
    UnknownStatus(String),
}

/// A battle that was refused at start, handing both combatants back.
///
/// [`BattleSession::start`](crate::BattleSession::start) takes ownership of
/// the two combatants; when they are not eligible this error returns them so
/// the caller does not lose its characters.
#[derive(Debug, thiserror::Error)]
#[error("battle could not start: {error}")]
pub struct RejectedStart {
    /// Why the battle was refused.
    #[source]
    pub error: EngineError,
    /// The combatants, in the order they were passed in.
    pub combatants: Box<[Combatant; 2]>,
}

impl RejectedStart {
    /// Consumes the error and returns the combatants.
    #[must_use]
    pub fn into_combatants(self) -> [Combatant; 2] {
        *self.combatants
    }
}
