//! Battle session: the turn state machine for one duel.
//!
//! A [`BattleSession`] owns both combatants for the duration of a battle.
//! Exactly one [`Side`] holds the turn at any time; [`BattleSession::act`]
//! resolves an action for that side and then decides what happens next.
//!
//! # Turn flow
//!
//! For each resolved action:
//! 1. A successful flee ends the battle (`Fled`)
//! 2. A failed action other than flee keeps the turn; nothing else happens
//! 3. A defeated combatant ends the battle (`Victory`)
//! 4. A successful action regenerates the actor's archetype mana
//! 5. Unless the action was a flee, the target's status effects tick; a tick
//!    death ends the battle and a freeze tick costs the target its next turn
//! 6. The turn passes; the round advances when it returns to the left side
//! 7. While the side holding the turn is frozen, its turn is skipped
//!
//! # Example
//!
//! ```
//! use skirmish_core::{Action, Archetype, BattleSession, Combatant, CombatantId, CombatRules, Millis, Side};
//!
//! let mut rng = skirmish_core::dice::seeded(5);
//! let hero = Combatant::new(CombatantId::new(1), "Thor", Archetype::Warrior, 160, 20, 10);
//! let foe = Combatant::new(CombatantId::new(2), "Luna", Archetype::Mage, 90, 30, 10);
//!
//! let mut session = BattleSession::start(hero, foe, Some(Side::Left), CombatRules::default()).unwrap();
//! let mut now = Millis::ZERO;
//! while !session.is_over() {
//!     session.battle_action(Action::Attack, &mut rng, now).unwrap();
//!     now = now.plus(1000);
//! }
//! assert!(session.outcome().is_some());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::combatant::{Combatant, CombatantId, LevelUp};
use crate::config::CombatRules;
use crate::dice::Dice;
use crate::error::{EngineError, RejectedStart};
use crate::log::{BattleEvent, BattleLog};
use crate::policy::{HeuristicPolicy, OpponentPolicy};
use crate::resolver::{Action, ActionResolver, ActionResult};
use crate::status::{tick_status_effects, TickReport};

// =============================================================================
// Sides and outcomes
// =============================================================================

/// One of the two positions in a duel. `Left` is the initiator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The combatant that started the battle.
    Left,
    /// The challenged combatant.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Array index: 0 for left, 1 for right.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Why a battle ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EndReason {
    /// The other side was defeated (or the caller declared a victory).
    Victory {
        /// Winning side.
        winner: Side,
    },
    /// A side escaped.
    Fled {
        /// Side that escaped.
        side: Side,
    },
}

/// Ending requested by the caller through [`BattleSession::end_battle`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndKind {
    /// Award the battle to the side still standing (left if both are).
    Victory,
    /// The side holding the turn escapes.
    Fled,
}

/// Final result of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// How it ended.
    pub reason: EndReason,
    /// Experience granted to the winner; 0 unless a victory.
    pub experience_awarded: u32,
    /// Level-up the experience triggered, if any.
    pub level_up: Option<LevelUp>,
    /// Round in which the battle ended.
    pub rounds: u32,
}

impl BattleOutcome {
    /// Winning side, for victories.
    #[must_use]
    pub const fn winner(&self) -> Option<Side> {
        match self.reason {
            EndReason::Victory { winner } => Some(winner),
            EndReason::Fled { .. } => None,
        }
    }
}

/// One step inside a [`TurnReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exchange {
    /// A side acted.
    Resolved {
        /// Side that acted.
        side: Side,
        /// What the action did.
        result: ActionResult,
        /// Status tick on the target, when any effect was active.
        tick: Option<TickReport>,
        /// Whether the turn moved to the other side.
        turn_passed: bool,
    },
    /// A frozen side lost its turn.
    Skipped {
        /// Side that lost the turn.
        side: Side,
    },
}

/// Everything that happened during one session call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Steps in order.
    pub exchanges: Vec<Exchange>,
    /// Set when the battle ended during the call.
    pub outcome: Option<BattleOutcome>,
}

// =============================================================================
// BattleSession
// =============================================================================

/// A duel between exactly two combatants.
pub struct BattleSession {
    combatants: [Combatant; 2],
    current_turn: Side,
    round: u32,
    controlled: Option<Side>,
    frozen: [bool; 2],
    resolver: ActionResolver,
    policy: Box<dyn OpponentPolicy>,
    log: BattleLog,
    outcome: Option<BattleOutcome>,
}

impl fmt::Debug for BattleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleSession")
            .field("combatants", &self.combatants)
            .field("current_turn", &self.current_turn)
            .field("round", &self.round)
            .field("controlled", &self.controlled)
            .field("frozen", &self.frozen)
            .field("resolver", &self.resolver)
            .field("policy", &"<dyn OpponentPolicy>")
            .field("log", &format!("[{} events]", self.log.len()))
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl BattleSession {
    /// Starts a battle with `left` holding the first turn.
    ///
    /// `controlled` names the player-driven side; `None` lets the policy
    /// drive both.
    ///
    /// # Errors
    ///
    /// Hands both combatants back in a [`RejectedStart`] if they share an id
    /// or either is defeated.
    pub fn start(
        left: Combatant,
        right: Combatant,
        controlled: Option<Side>,
        rules: CombatRules,
    ) -> Result<Self, RejectedStart> {
        let refusal = if left.id() == right.id() {
            Some(EngineError::SameCombatant(left.id()))
        } else {
            [&left, &right]
                .into_iter()
                .find(|c| c.is_defeated())
                .map(|c| EngineError::CombatantDefeated(c.id()))
        };
        if let Some(error) = refusal {
            return Err(RejectedStart {
                error,
                combatants: Box::new([left, right]),
            });
        }

        let mut log = BattleLog::new();
        log.push(BattleEvent::BattleStarted {
            left: left.id(),
            right: right.id(),
            controlled,
        });
        tracing::info!(left = %left.id(), right = %right.id(), ?controlled, "battle started");

        Ok(Self {
            combatants: [left, right],
            current_turn: Side::Left,
            round: 1,
            controlled,
            frozen: [false; 2],
            resolver: ActionResolver::new(rules),
            policy: Box::new(HeuristicPolicy),
            log,
            outcome: None,
        })
    }

    /// Replaces the opponent policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl OpponentPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The combatant on `side`.
    #[must_use]
    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    /// Side of the combatant with `id`, if it takes part.
    #[must_use]
    pub fn side_of(&self, id: CombatantId) -> Option<Side> {
        Side::ALL.into_iter().find(|&side| self.combatant(side).id() == id)
    }

    /// Side holding the turn.
    #[must_use]
    pub const fn current_turn(&self) -> Side {
        self.current_turn
    }

    /// Current round, starting at 1.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Player-driven side, if any.
    #[must_use]
    pub const fn controlled(&self) -> Option<Side> {
        self.controlled
    }

    /// True when `side` will lose its next turn to a freeze.
    #[must_use]
    pub const fn is_frozen(&self, side: Side) -> bool {
        self.frozen[side.index()]
    }

    /// Rules in force.
    #[must_use]
    pub const fn rules(&self) -> &CombatRules {
        self.resolver.rules()
    }

    /// How the battle ended, once it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    /// True once the battle has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Pending events.
    #[must_use]
    pub const fn log(&self) -> &BattleLog {
        &self.log
    }

    /// Drains pending events.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.log.take_events()
    }

    /// Dissolves the session, returning `[left, right]`.
    #[must_use]
    pub fn into_combatants(self) -> [Combatant; 2] {
        self.combatants
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Resolves `action` for the side holding the turn.
    ///
    /// # Errors
    ///
    /// [`EngineError::BattleOver`] once the battle has ended.
    pub fn act(
        &mut self,
        action: Action,
        dice: &mut dyn Dice,
        now: Millis,
    ) -> Result<TurnReport, EngineError> {
        self.ensure_ongoing()?;
        let mut report = TurnReport::default();
        self.resolve(action, dice, now, &mut report)?;
        Ok(report)
    }

    /// Resolves the controlled side's action, then plays the policy-driven
    /// side until the turn comes back or the battle ends.
    ///
    /// # Errors
    ///
    /// [`EngineError::BattleOver`] once the battle has ended, and
    /// [`EngineError::NotYourTurn`] when the controlled side does not hold
    /// the turn (or no side is controlled).
    pub fn battle_action(
        &mut self,
        action: Action,
        dice: &mut dyn Dice,
        now: Millis,
    ) -> Result<TurnReport, EngineError> {
        self.ensure_ongoing()?;
        if self.controlled != Some(self.current_turn) {
            return Err(EngineError::NotYourTurn(
                self.controlled.unwrap_or(self.current_turn),
            ));
        }

        let mut report = TurnReport::default();
        self.resolve(action, dice, now, &mut report)?;
        while self.outcome.is_none() && self.controlled != Some(self.current_turn) {
            self.policy_turn(dice, now, &mut report)?;
        }
        Ok(report)
    }

    /// Lets the policy play one turn for the side holding it.
    ///
    /// # Errors
    ///
    /// [`EngineError::BattleOver`] once the battle has ended.
    pub fn auto_step(&mut self, dice: &mut dyn Dice, now: Millis) -> Result<TurnReport, EngineError> {
        self.ensure_ongoing()?;
        let mut report = TurnReport::default();
        self.policy_turn(dice, now, &mut report)?;
        Ok(report)
    }

    /// Ends the battle on the caller's request.
    ///
    /// [`EndKind::Victory`] goes to the side whose opponent is defeated, or
    /// to the left side when both stand. [`EndKind::Fled`] lets the side
    /// holding the turn escape.
    ///
    /// # Errors
    ///
    /// [`EngineError::BattleOver`] if the battle already ended.
    pub fn end_battle(&mut self, kind: EndKind, dice: &mut dyn Dice) -> Result<BattleOutcome, EngineError> {
        self.ensure_ongoing()?;
        let reason = match kind {
            EndKind::Victory => {
                let winner = if self.combatant(Side::Left).is_defeated() {
                    Side::Right
                } else {
                    Side::Left
                };
                EndReason::Victory { winner }
            }
            EndKind::Fled => EndReason::Fled {
                side: self.current_turn,
            },
        };
        Ok(self.finish(reason, dice))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_ongoing(&self) -> Result<(), EngineError> {
        if self.is_over() {
            Err(EngineError::BattleOver)
        } else {
            Ok(())
        }
    }

    /// Runs one policy decision, retrying a failed choice once as an attack.
    fn policy_turn(
        &mut self,
        dice: &mut dyn Dice,
        now: Millis,
        report: &mut TurnReport,
    ) -> Result<(), EngineError> {
        let side = self.current_turn;
        let choice = self.policy.choose(
            self.combatant(side),
            self.combatant(side.opponent()),
            dice,
        );
        let yielded = self.resolve(choice, dice, now, report)?;
        if !yielded {
            tracing::debug!(%side, %choice, "policy action failed, attacking instead");
            self.resolve(Action::Attack, dice, now, report)?;
        }
        Ok(())
    }

    /// Resolves one action for the side holding the turn.
    ///
    /// Returns `false` when the action failed and the side keeps the turn.
    fn resolve(
        &mut self,
        action: Action,
        dice: &mut dyn Dice,
        now: Millis,
        report: &mut TurnReport,
    ) -> Result<bool, EngineError> {
        let side = self.current_turn;
        let target_side = side.opponent();
        let (actor, target) = split(&mut self.combatants, side);
        let result = self.resolver.perform(actor, target, action, dice, now)?;
        let (success, fled) = (result.success, result.fled);

        self.log.push(BattleEvent::ActionResolved {
            side,
            actor: actor.id(),
            result: result.clone(),
        });
        let mut exchange = Exchange::Resolved {
            side,
            result,
            tick: None,
            turn_passed: false,
        };

        if fled {
            report.exchanges.push(exchange);
            self.end_in_report(EndReason::Fled { side }, dice, report);
            return Ok(true);
        }
        if !success && action != Action::Flee {
            report.exchanges.push(exchange);
            return Ok(false);
        }
        if let Some(winner) = self.victor(side) {
            report.exchanges.push(exchange);
            self.end_in_report(EndReason::Victory { winner }, dice, report);
            return Ok(true);
        }

        if success {
            let actor = &mut self.combatants[side.index()];
            actor.regenerate_mana(actor.profile().mana_regen);
        }

        if action != Action::Flee {
            let target = &mut self.combatants[target_side.index()];
            let tick = tick_status_effects(target);
            if !tick.is_empty() {
                self.log.push(BattleEvent::StatusTicked {
                    side: target_side,
                    combatant: target.id(),
                    report: tick.clone(),
                });
                if tick.frozen && self.resolver.rules().freeze_skips_turn {
                    self.frozen[target_side.index()] = true;
                }
                let defeated = tick.defeated;
                if let Exchange::Resolved { tick: slot, .. } = &mut exchange {
                    *slot = Some(tick);
                }
                if defeated {
                    report.exchanges.push(exchange);
                    self.end_in_report(EndReason::Victory { winner: side }, dice, report);
                    return Ok(true);
                }
            }
        }

        if let Exchange::Resolved { turn_passed, .. } = &mut exchange {
            *turn_passed = true;
        }
        report.exchanges.push(exchange);
        self.pass_turn();
        self.skip_frozen(report);
        Ok(true)
    }

    /// Winner after `acting` resolved, checking the target first.
    fn victor(&self, acting: Side) -> Option<Side> {
        if self.combatant(acting.opponent()).is_defeated() {
            Some(acting)
        } else if self.combatant(acting).is_defeated() {
            Some(acting.opponent())
        } else {
            None
        }
    }

    fn pass_turn(&mut self) {
        self.current_turn = self.current_turn.opponent();
        if self.current_turn == Side::Left {
            self.round += 1;
        }
    }

    fn skip_frozen(&mut self, report: &mut TurnReport) {
        while self.frozen[self.current_turn.index()] {
            let side = self.current_turn;
            self.frozen[side.index()] = false;
            let combatant = self.combatant(side).id();
            tracing::debug!(%side, %combatant, "frozen, turn skipped");
            self.log.push(BattleEvent::TurnSkipped { side, combatant });
            report.exchanges.push(Exchange::Skipped { side });
            self.pass_turn();
        }
    }

    fn end_in_report(&mut self, reason: EndReason, dice: &mut dyn Dice, report: &mut TurnReport) {
        report.outcome = Some(self.finish(reason, dice));
    }

    fn finish(&mut self, reason: EndReason, dice: &mut dyn Dice) -> BattleOutcome {
        let mut outcome = BattleOutcome {
            reason,
            experience_awarded: 0,
            level_up: None,
            rounds: self.round,
        };

        if let EndReason::Victory { winner } = reason {
            let loser_level = self.combatant(winner.opponent()).level();
            let experience = self.resolver.rules().victory_experience(loser_level);
            let champion = &mut self.combatants[winner.index()];
            champion.stats_mut().wins += 1;
            outcome.experience_awarded = experience;
            outcome.level_up = champion.gain_experience(experience, dice);
            if let Some(level_up) = outcome.level_up {
                self.log.push(BattleEvent::LevelUp {
                    combatant: champion.id(),
                    level_up,
                });
            }
        }

        for combatant in &mut self.combatants {
            combatant.reset_battle_flags();
        }
        self.frozen = [false; 2];

        tracing::info!(?reason, rounds = self.round, "battle ended");
        self.log.push(BattleEvent::BattleEnded {
            outcome: outcome.clone(),
        });
        self.outcome = Some(outcome.clone());
        outcome
    }
}

/// Borrows `(actor, target)` for the acting side.
fn split(combatants: &mut [Combatant; 2], actor: Side) -> (&mut Combatant, &mut Combatant) {
    let [left, right] = combatants;
    match actor {
        Side::Left => (left, right),
        Side::Right => (right, left),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FailureReason;
    use crate::status::StatusKind;
    use crate::tests::{healer, mage, tank, warrior, ScriptedDice};

    fn duel(left: Combatant, right: Combatant, controlled: Option<Side>) -> BattleSession {
        BattleSession::start(left, right, controlled, CombatRules::default()).unwrap()
    }

    /// Always picks the same action.
    struct Always(Action);

    impl OpponentPolicy for Always {
        fn choose(&self, _me: &Combatant, _opponent: &Combatant, _dice: &mut dyn Dice) -> Action {
            self.0
        }
    }

    mod start_tests {
        use super::*;

        #[test]
        fn rejects_same_combatant_and_returns_it() {
            let err = BattleSession::start(warrior(), warrior(), None, CombatRules::default())
                .unwrap_err();
            assert_eq!(err.error, EngineError::SameCombatant(warrior().id()));
            let [a, b] = err.into_combatants();
            assert_eq!(a.id(), b.id());
        }

        #[test]
        fn rejects_defeated() {
            let err =
                BattleSession::start(warrior(), mage().with_life(0), None, CombatRules::default())
                    .unwrap_err();
            assert_eq!(err.error, EngineError::CombatantDefeated(mage().id()));
        }

        #[test]
        fn left_starts_in_round_one() {
            let mut session = duel(warrior(), mage(), Some(Side::Left));
            assert_eq!(session.current_turn(), Side::Left);
            assert_eq!(session.round(), 1);
            assert!(!session.is_over());
            assert!(matches!(
                &session.take_events()[..],
                [BattleEvent::BattleStarted { .. }]
            ));
        }
    }

    mod act_tests {
        use super::*;

        #[test]
        fn attack_passes_turn_and_ticks_target() {
            let mut target = tank();
            target.statuses_mut().add(StatusKind::Poison, 3);
            let mut session = duel(warrior(), target, None);
            let mut dice = ScriptedDice::new();

            let report = session.act(Action::Attack, &mut dice, Millis::ZERO).unwrap();

            // 30 from the attack, 25 from 5% poison on 500 max life
            assert_eq!(session.combatant(Side::Right).current_life(), 445);
            assert_eq!(session.current_turn(), Side::Right);
            match &report.exchanges[..] {
                [Exchange::Resolved {
                    tick: Some(tick),
                    turn_passed: true,
                    ..
                }] => assert_eq!(tick.damage, 25),
                other => panic!("unexpected exchanges: {other:?}"),
            }
        }

        #[test]
        fn failed_action_keeps_turn() {
            let mut session = duel(healer(), warrior(), None);
            let mut dice = ScriptedDice::new();

            let report = session.act(Action::Heal, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(session.current_turn(), Side::Left);
            assert!(report.outcome.is_none());
            assert!(matches!(
                &report.exchanges[..],
                [Exchange::Resolved { turn_passed: false, result, .. }]
                    if result.failure == Some(FailureReason::AlreadyFullLife)
            ));
        }

        #[test]
        fn insufficient_mana_keeps_turn_without_ticking() {
            let mut target = warrior();
            target.statuses_mut().add(StatusKind::Burn, 2);
            let mut session = duel(mage().with_mana(20), target, None);
            let mut dice = ScriptedDice::new();

            session.act(Action::Special, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(session.current_turn(), Side::Left);
            assert_eq!(session.combatant(Side::Right).current_life(), 100);
            assert_eq!(session.combatant(Side::Left).mana(), 20);
        }

        #[test]
        fn successful_action_regenerates_mana() {
            let mut session = duel(mage().with_mana(50), tank(), None);
            let mut dice = ScriptedDice::new();

            session.act(Action::Attack, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(session.combatant(Side::Left).mana(), 58);
        }

        #[test]
        fn round_advances_when_turn_returns_left() {
            let mut session = duel(warrior(), tank(), None);
            let mut dice = ScriptedDice::new();

            session.act(Action::Attack, &mut dice, Millis::ZERO).unwrap();
            assert_eq!(session.round(), 1);
            session.act(Action::Attack, &mut dice, Millis::new(100)).unwrap();
            assert_eq!(session.round(), 2);
            assert_eq!(session.current_turn(), Side::Left);
        }
    }

    mod ending_tests {
        use super::*;

        #[test]
        fn knockout_is_a_victory_with_experience() {
            let mut session = duel(warrior(), mage().with_life(1), None);
            let mut dice = ScriptedDice::new();

            let report = session.act(Action::Attack, &mut dice, Millis::ZERO).unwrap();

            let outcome = report.outcome.unwrap();
            assert_eq!(outcome.winner(), Some(Side::Left));
            assert_eq!(outcome.experience_awarded, 150);
            assert!(outcome.level_up.is_none());
            let winner = session.combatant(Side::Left);
            assert_eq!(winner.stats().wins, 1);
            assert_eq!(winner.experience(), 150);
            assert_eq!(session.combatant(Side::Right).stats().losses, 1);
            assert_eq!(
                session.act(Action::Attack, &mut dice, Millis::ZERO),
                Err(EngineError::BattleOver)
            );
        }

        #[test]
        fn tick_death_is_a_victory_for_the_actor() {
            let mut target = mage().with_life(3).with_shield(100);
            target.statuses_mut().add(StatusKind::Poison, 2);
            let mut session = duel(warrior(), target, None);
            let mut dice = ScriptedDice::new();

            let report = session.act(Action::Attack, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(report.outcome.unwrap().winner(), Some(Side::Left));
            assert!(session.combatant(Side::Right).is_defeated());
        }

        #[test]
        fn certain_flee_ends_battle() {
            let mut session = duel(warrior().with_life(5), mage(), None);
            let mut dice = ScriptedDice::new();

            let report = session.act(Action::Flee, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(
                report.outcome.unwrap().reason,
                EndReason::Fled { side: Side::Left }
            );
            assert_eq!(session.combatant(Side::Left).stats().wins, 0);
        }

        #[test]
        fn failed_flee_can_be_fatal() {
            let weak = Combatant::new(
                CombatantId::new(7),
                "Frail",
                crate::Archetype::Rogue,
                100,
                10,
                1,
            )
            .with_life(10);
            let mut session = duel(weak, mage(), None);
            let mut dice = ScriptedDice::new();

            let report = session.act(Action::Flee, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(report.outcome.unwrap().winner(), Some(Side::Right));
        }

        #[test]
        fn failed_flee_passes_turn() {
            let mut session = duel(warrior(), mage(), None);
            let mut dice = ScriptedDice::new();

            session.act(Action::Flee, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(session.current_turn(), Side::Right);
            assert_eq!(session.combatant(Side::Left).current_life(), 90);
        }

        #[test]
        fn victory_can_level_up() {
            let mut hero = warrior();
            let mut dice = ScriptedDice::new();
            assert!(hero.gain_experience(900, &mut dice).is_none());
            let mut session = duel(hero, mage().with_life(1), None);

            let report = session.act(Action::Attack, &mut dice, Millis::ZERO).unwrap();

            let level_up = report.outcome.unwrap().level_up.unwrap();
            assert_eq!(level_up.level, 11);
            assert!(session
                .take_events()
                .iter()
                .any(|e| matches!(e, BattleEvent::LevelUp { .. })));
        }

        #[test]
        fn end_resets_battle_flags() {
            let mut session = duel(warrior(), tank(), None);
            let mut dice = ScriptedDice::new();
            session.act(Action::Defend, &mut dice, Millis::ZERO).unwrap();
            assert!(session.combatant(Side::Left).is_defending());

            let outcome = session.end_battle(EndKind::Fled, &mut dice).unwrap();

            assert_eq!(outcome.reason, EndReason::Fled { side: Side::Right });
            assert!(!session.combatant(Side::Left).is_defending());
            assert_eq!(
                session.end_battle(EndKind::Victory, &mut dice),
                Err(EngineError::BattleOver)
            );
        }

        #[test]
        fn forced_victory_favours_standing_side() {
            let mut session = duel(warrior(), tank(), None);
            let mut dice = ScriptedDice::new();
            let outcome = session.end_battle(EndKind::Victory, &mut dice).unwrap();
            assert_eq!(outcome.winner(), Some(Side::Left));
            let [left, _] = session.into_combatants();
            assert_eq!(left.stats().wins, 1);
        }
    }

    mod freeze_tests {
        use super::*;

        fn freezing_dice() -> ScriptedDice {
            ScriptedDice::new().with_rolls([0.0]).with_picks([1])
        }

        #[test]
        fn frozen_side_loses_its_turn() {
            let mut session = duel(mage(), tank(), None);
            let mut dice = freezing_dice();

            let report = session.act(Action::Special, &mut dice, Millis::ZERO).unwrap();

            assert!(matches!(
                &report.exchanges[..],
                [
                    Exchange::Resolved { turn_passed: true, .. },
                    Exchange::Skipped { side: Side::Right }
                ]
            ));
            assert_eq!(session.current_turn(), Side::Left);
            assert_eq!(session.round(), 2);
            assert!(!session.is_frozen(Side::Right));
            assert_eq!(
                session.combatant(Side::Right).statuses().get(StatusKind::Freeze),
                Some(3)
            );
        }

        #[test]
        fn skip_can_be_disabled() {
            let rules = CombatRules {
                freeze_skips_turn: false,
                ..CombatRules::default()
            };
            let mut session = BattleSession::start(mage(), tank(), None, rules).unwrap();
            let mut dice = freezing_dice();

            session.act(Action::Special, &mut dice, Millis::ZERO).unwrap();

            assert_eq!(session.current_turn(), Side::Right);
        }
    }

    mod control_tests {
        use super::*;

        #[test]
        fn controlled_side_must_hold_turn() {
            let mut session = duel(warrior(), mage(), Some(Side::Right));
            let mut dice = ScriptedDice::new();
            assert_eq!(
                session.battle_action(Action::Attack, &mut dice, Millis::ZERO),
                Err(EngineError::NotYourTurn(Side::Right))
            );
        }

        #[test]
        fn policy_answers_in_the_same_call() {
            let mut session = duel(warrior(), tank(), Some(Side::Left));
            let mut dice = ScriptedDice::new();

            let report = session
                .battle_action(Action::Attack, &mut dice, Millis::ZERO)
                .unwrap();

            assert_eq!(report.exchanges.len(), 2);
            assert_eq!(session.current_turn(), Side::Left);
            assert!(session.combatant(Side::Left).current_life() < 100);
        }

        #[test]
        fn failed_policy_choice_becomes_attack() {
            let mut session = duel(warrior(), tank().with_mana(0), Some(Side::Left))
                .with_policy(Always(Action::Special));
            let mut dice = ScriptedDice::new();

            let report = session
                .battle_action(Action::Attack, &mut dice, Millis::ZERO)
                .unwrap();

            let actions: Vec<_> = report
                .exchanges
                .iter()
                .filter_map(|e| match e {
                    Exchange::Resolved { result, .. } => Some((result.action, result.success)),
                    Exchange::Skipped { .. } => None,
                })
                .collect();
            assert_eq!(
                actions,
                vec![
                    (Action::Attack, true),
                    (Action::Special, false),
                    (Action::Attack, true),
                ]
            );
            assert_eq!(session.current_turn(), Side::Left);
            assert_eq!(session.combatant(Side::Right).mana(), 5);
        }

        #[test]
        fn auto_step_plays_one_turn() {
            let mut session = duel(warrior(), tank(), None);
            let mut dice = ScriptedDice::new();

            let report = session.auto_step(&mut dice, Millis::ZERO).unwrap();

            assert_eq!(report.exchanges.len(), 1);
            assert_eq!(session.current_turn(), Side::Right);
        }
    }
}
