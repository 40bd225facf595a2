//! # Skirmish Core
//!
//! Turn-based duel resolution engine for Skirmish.
//!
//! This crate resolves battles between exactly two combatants: the rules that
//! turn a chosen action plus the state of both sides into damage, healing,
//! status effects, cooldowns, combo scaling, and battle termination. Everything
//! visual (sprites, panels, the exploration grid, keyboard input) lives outside
//! and talks to the engine through the types exported here.
//!
//! ## Architecture
//!
//! - **Combatants**: [`Combatant`] holds all per-character combat state
//! - **Status ledger**: [`status::StatusLedger`] with periodic ticking
//! - **Resolver**: [`ActionResolver`] computes the effect of one action
//! - **Combo tracker**: [`resolver::ComboTracker`] chains rapid offensive actions
//! - **Session**: [`BattleSession`] alternates turns and decides when a battle ends
//! - **Policy**: [`HeuristicPolicy`] picks actions for the non-controlled side
//! - **World**: [`World`] owns the roster and the exploring/battle mode
//!
//! Randomness is always injected through [`Dice`], and time through [`Millis`],
//! so a battle is fully reproducible from a seed.
//!
//! ## Usage
//!
//! ```
//! use skirmish_core::{Action, BattleSession, CombatRules, Side, templates};
//!
//! let mut rng = skirmish_core::dice::seeded(7);
//! let thor = templates::find("Thor").unwrap().spawn(1u64.into(), &mut rng);
//! let luna = templates::find("Luna").unwrap().spawn(2u64.into(), &mut rng);
//!
//! let mut session =
//!     BattleSession::start(thor, luna, Some(Side::Left), CombatRules::default()).unwrap();
//! let report = session
//!     .battle_action(Action::Attack, &mut rng, skirmish_core::Millis::ZERO)
//!     .unwrap();
//! assert!(!report.exchanges.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod error;
pub mod log;
mod numeric;
pub mod policy;
pub mod resolver;
pub mod session;
pub mod status;
pub mod templates;
pub mod world;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use combatant::{Ability, Archetype, BattleStats, Combatant, CombatantId, Cooldowns, LevelUp};
pub use config::CombatRules;
pub use dice::{Dice, DuelRng};
pub use error::{EngineError, ParseError, RejectedStart};
pub use log::{BattleEvent, BattleLog};
pub use policy::{HeuristicPolicy, OpponentPolicy};
pub use resolver::{Action, ActionResolver, ActionResult, EffectTag, FailureReason, HitFlags};
pub use session::{BattleOutcome, BattleSession, EndKind, EndReason, Exchange, Side, TurnReport};
pub use status::{StatusKind, StatusLedger, TickReport};
pub use world::{Mode, World};

#[cfg(test)]
mod tests;
