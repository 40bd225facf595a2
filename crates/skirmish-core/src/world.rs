//! World module: the roster of characters and the current game mode.
//!
//! The World is the caller-owned container for everything outside a single
//! duel. It provides:
//! - Combatant storage with deterministic iteration order (`BTreeMap`)
//! - The exploring/battle mode, with at most one active [`BattleSession`]
//! - The seeded dice and the clock every battle call draws from
//!
//! # Architecture
//!
//! Starting a battle moves both combatants out of the roster and into the
//! session. When the session ends (victory, escape, or an explicit
//! [`World::end_battle`]) it is dissolved: both combatants go back to the
//! roster and the mode returns to [`Mode::Exploring`]. Combatant ids are
//! monotonically increasing, so roster iteration is stable across runs.
//!
//! # Example
//!
//! ```
//! use skirmish_core::{templates, Action, ManualClock, Mode, World};
//!
//! let mut world = World::new(42).with_clock(ManualClock::new());
//! let thor = world.spawn(templates::find("Thor").unwrap());
//! let luna = world.spawn(templates::find("Luna").unwrap());
//!
//! world.start_battle(thor, luna, Some(thor)).unwrap();
//! assert_eq!(world.mode(), Mode::Battle);
//!
//! while world.mode() == Mode::Battle {
//!     world.battle_action(Action::Attack).unwrap();
//! }
//! assert_eq!(world.combatants().count(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::combatant::{Combatant, CombatantId};
use crate::config::CombatRules;
use crate::dice::{self, DuelRng};
use crate::error::EngineError;
use crate::log::{BattleEvent, BattleLog};
use crate::resolver::Action;
use crate::session::{BattleOutcome, BattleSession, EndKind, Side, TurnReport};
use crate::templates::CharacterTemplate;

/// What the world is doing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No battle in progress.
    Exploring,
    /// A battle session is active.
    Battle,
}

/// Roster, mode, dice and clock.
pub struct World {
    /// Monotonically increasing combatant id counter.
    next_id: u64,
    /// Combatants not currently in a battle.
    roster: BTreeMap<CombatantId, Combatant>,
    /// The active battle, if any.
    session: Option<BattleSession>,
    rules: CombatRules,
    rng: DuelRng,
    seed: u64,
    clock: Box<dyn Clock>,
    /// Events of sessions that have been dissolved.
    log: BattleLog,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("next_id", &self.next_id)
            .field("roster", &self.roster)
            .field("session", &self.session)
            .field("rules", &self.rules)
            .field("seed", &self.seed)
            .field("clock", &self.clock.now())
            .field("log", &format!("[{} events]", self.log.len()))
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates an empty world whose dice are seeded with `seed`.
    ///
    /// Uses the wall clock and the default rules.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            next_id: 1,
            roster: BTreeMap::new(),
            session: None,
            rules: CombatRules::default(),
            rng: dice::seeded(seed),
            seed,
            clock: Box::new(SystemClock::new()),
            log: BattleLog::new(),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the rules used by future battles.
    #[must_use]
    pub fn with_rules(mut self, rules: CombatRules) -> Self {
        self.rules = rules;
        self
    }

    /// The seed the dice started from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Rules used by new battles.
    #[must_use]
    pub const fn rules(&self) -> &CombatRules {
        &self.rules
    }

    // -------------------------------------------------------------------------
    // Roster
    // -------------------------------------------------------------------------

    /// Spawns a combatant from a template and returns its id.
    pub fn spawn(&mut self, template: &CharacterTemplate) -> CombatantId {
        let id = CombatantId::new(self.next_id);
        self.next_id += 1;
        let combatant = template.spawn(id, &mut self.rng);
        tracing::debug!(%id, name = template.name, level = combatant.level(), "spawned");
        self.roster.insert(id, combatant);
        id
    }

    /// Adds a prebuilt combatant, replacing any roster entry with the same id.
    ///
    /// Later spawns never reuse the inserted id.
    ///
    /// # Errors
    ///
    /// [`EngineError::BattleInProgress`] if the id belongs to a combatant in
    /// the active battle; the battle's copy would overwrite it on dissolve.
    pub fn insert(&mut self, combatant: Combatant) -> Result<Option<Combatant>, EngineError> {
        let id = combatant.id();
        if self.session.as_ref().and_then(|s| s.side_of(id)).is_some() {
            return Err(EngineError::BattleInProgress);
        }
        self.next_id = self.next_id.max(id.as_u64().saturating_add(1));
        Ok(self.roster.insert(id, combatant))
    }

    /// Looks a combatant up, whether in the roster or in the active battle.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.get(&id).or_else(|| {
            let session = self.session.as_ref()?;
            session.side_of(id).map(|side| session.combatant(side))
        })
    }

    /// Mutable access to a combatant in the roster.
    ///
    /// Combatants inside a battle are owned by the session and only change
    /// through battle operations.
    #[must_use]
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.roster.get_mut(&id)
    }

    /// Combatants in the roster, in id order.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.roster.values()
    }

    // -------------------------------------------------------------------------
    // Mode and battles
    // -------------------------------------------------------------------------

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.session.is_some() {
            Mode::Battle
        } else {
            Mode::Exploring
        }
    }

    /// The active battle, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&BattleSession> {
        self.session.as_ref()
    }

    /// Moves `left` and `right` into a new battle. `left` acts first.
    ///
    /// `controlled` is the player's combatant; `None` lets the policy play
    /// both sides.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BattleInProgress`] while another battle runs
    /// - [`EngineError::SameCombatant`] when both ids are equal
    /// - [`EngineError::UnknownCombatant`] for ids not in the roster, or a
    ///   controlled id that is neither participant
    /// - [`EngineError::CombatantDefeated`] when either is at 0 life
    pub fn start_battle(
        &mut self,
        left: CombatantId,
        right: CombatantId,
        controlled: Option<CombatantId>,
    ) -> Result<(), EngineError> {
        if self.session.is_some() {
            return Err(EngineError::BattleInProgress);
        }
        if left == right {
            return Err(EngineError::SameCombatant(left));
        }
        for id in [left, right] {
            if !self.roster.contains_key(&id) {
                return Err(EngineError::UnknownCombatant(id));
            }
        }
        let controlled = match controlled {
            None => None,
            Some(id) if id == left => Some(Side::Left),
            Some(id) if id == right => Some(Side::Right),
            Some(id) => return Err(EngineError::UnknownCombatant(id)),
        };

        let (Some(a), Some(b)) = (self.roster.remove(&left), self.roster.remove(&right)) else {
            return Err(EngineError::UnknownCombatant(left));
        };
        match BattleSession::start(a, b, controlled, self.rules.clone()) {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(rejected) => {
                let error = rejected.error.clone();
                for combatant in rejected.into_combatants() {
                    self.roster.insert(combatant.id(), combatant);
                }
                Err(error)
            }
        }
    }

    /// Plays the controlled side's action (and the policy's reply).
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveBattle`] while exploring; otherwise whatever
    /// [`BattleSession::battle_action`] reports.
    pub fn battle_action(&mut self, action: Action) -> Result<TurnReport, EngineError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(EngineError::NoActiveBattle)?;
        let report = session.battle_action(action, &mut self.rng, now)?;
        self.dissolve_if_over();
        Ok(report)
    }

    /// Lets the policy play one turn of the active battle.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveBattle`] while exploring.
    pub fn auto_step(&mut self) -> Result<TurnReport, EngineError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(EngineError::NoActiveBattle)?;
        let report = session.auto_step(&mut self.rng, now)?;
        self.dissolve_if_over();
        Ok(report)
    }

    /// Ends the active battle and returns to exploring.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveBattle`] while exploring.
    pub fn end_battle(&mut self, kind: EndKind) -> Result<BattleOutcome, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoActiveBattle)?;
        let outcome = session.end_battle(kind, &mut self.rng)?;
        self.dissolve_if_over();
        Ok(outcome)
    }

    /// Starts a new game: ends any battle and restarts every combatant.
    pub fn restart(&mut self) {
        self.dissolve();
        for combatant in self.roster.values_mut() {
            combatant.restart(&mut self.rng);
        }
        tracing::info!(combatants = self.roster.len(), "world restarted");
    }

    /// Revives a defeated combatant in the roster.
    ///
    /// # Errors
    ///
    /// [`EngineError::BattleInProgress`] if the combatant is in the active
    /// battle, [`EngineError::UnknownCombatant`] if it does not exist.
    pub fn revive(&mut self, id: CombatantId) -> Result<(), EngineError> {
        if let Some(combatant) = self.roster.get_mut(&id) {
            combatant.revive();
            return Ok(());
        }
        if self.session.as_ref().and_then(|s| s.side_of(id)).is_some() {
            Err(EngineError::BattleInProgress)
        } else {
            Err(EngineError::UnknownCombatant(id))
        }
    }

    /// Drains every pending battle event, oldest first.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        let mut events = self.log.take_events();
        if let Some(session) = self.session.as_mut() {
            events.extend(session.take_events());
        }
        events
    }

    fn dissolve_if_over(&mut self) {
        if self.session.as_ref().is_some_and(BattleSession::is_over) {
            self.dissolve();
        }
    }

    fn dissolve(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        for event in session.take_events() {
            self.log.push(event);
        }
        for combatant in session.into_combatants() {
            self.roster.insert(combatant.id(), combatant);
        }
    }
}
