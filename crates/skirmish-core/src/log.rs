//! Battle event log.
//!
//! The session appends a [`BattleEvent`] for everything that happens during a
//! battle. The log does not mutate game state; presentation layers drain it
//! with [`BattleLog::take_events`] after each call and render the entries
//! (chat lines, floating numbers, sounds).
//!
//! Events serialize as internally tagged JSON, e.g.
//! `{"event":"turn_skipped","side":"right","combatant":2}`.

use serde::{Deserialize, Serialize};

use crate::combatant::{CombatantId, LevelUp};
use crate::resolver::ActionResult;
use crate::session::{BattleOutcome, Side};
use crate::status::TickReport;

/// Something that happened during a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    /// A session was created.
    BattleStarted {
        /// Initiating combatant.
        left: CombatantId,
        /// Other combatant.
        right: CombatantId,
        /// Player-driven side, if any.
        controlled: Option<Side>,
    },
    /// An action was resolved, successfully or not.
    ActionResolved {
        /// Side that acted.
        side: Side,
        /// Combatant that acted.
        actor: CombatantId,
        /// Full result.
        result: ActionResult,
    },
    /// Status effects ticked on a combatant.
    StatusTicked {
        /// Side that was ticked.
        side: Side,
        /// Combatant that was ticked.
        combatant: CombatantId,
        /// What the tick did.
        report: TickReport,
    },
    /// A frozen side lost its turn.
    TurnSkipped {
        /// Side that lost the turn.
        side: Side,
        /// Frozen combatant.
        combatant: CombatantId,
    },
    /// The winner levelled up.
    LevelUp {
        /// Combatant that levelled up.
        combatant: CombatantId,
        /// Gains.
        level_up: LevelUp,
    },
    /// The battle ended.
    BattleEnded {
        /// How it ended.
        outcome: BattleOutcome,
    },
}

/// Append-only event list, drained by the caller.
///
/// # Example
///
/// ```
/// use skirmish_core::{BattleEvent, BattleLog, CombatantId};
///
/// let mut log = BattleLog::new();
/// log.push(BattleEvent::BattleStarted {
///     left: CombatantId::new(1),
///     right: CombatantId::new(2),
///     controlled: None,
/// });
/// assert_eq!(log.len(), 1);
///
/// let events = log.take_events();
/// assert_eq!(events.len(), 1);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events, oldest first.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Moves every event of `other` to the end of this log.
    pub fn append(&mut self, other: &mut Self) {
        self.events.append(&mut other.events);
    }

    /// Number of events not yet drained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is waiting to be drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates pending events without draining them.
    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    /// Discards every pending event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
