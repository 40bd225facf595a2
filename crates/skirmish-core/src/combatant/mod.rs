//! Combatant module: the per-character combat state.
//!
//! This module provides:
//! - [`CombatantId`]: Stable identifier of a character
//! - [`Archetype`]: Combat class with its fixed ability data
//! - [`Combatant`]: Life, mana, shield, cooldowns, statuses, and statistics
//!
//! # Invariants
//!
//! For every combatant, after every operation:
//! - `0 <= current_life <= max_life`
//! - `0 <= mana <= max_mana`
//! - every stored status effect has a duration above 0
//!
//! Fields are private and only change through the methods below, which clamp
//! and keep the statistics in step.
//!
//! # Example
//!
//! ```
//! use skirmish_core::{Archetype, Combatant, CombatantId};
//!
//! let mut golem = Combatant::new(CombatantId::new(1), "Golem", Archetype::Warrior, 180, 15, 9);
//! assert_eq!(golem.apply_damage(50), 50);
//! assert_eq!(golem.heal(80), 50);
//! assert_eq!(golem.current_life(), 180);
//! ```

mod archetype;
mod stats;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::dice::Dice;
use crate::numeric::scale;
use crate::status::StatusLedger;

pub use archetype::{Archetype, ArchetypeProfile, SpecialProfile};
pub use stats::{Ability, BattleStats, Cooldowns};

/// Mana every new combatant starts with (and its initial maximum).
pub const STARTING_MANA: u32 = 100;

/// Unique identifier for a combatant.
///
/// Ids order numerically, which the roster uses for deterministic iteration.
///
/// # Example
///
/// ```
/// use skirmish_core::CombatantId;
///
/// let a = CombatantId::new(1);
/// let b: CombatantId = 2u64.into();
/// assert!(a < b);
/// assert_eq!(b.as_u64(), 2);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(u64);

impl CombatantId {
    /// Creates an id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({})", self.0)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CombatantId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Stat increases granted by one level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    /// Level reached.
    pub level: u32,
    /// Added to max life.
    pub life_gain: u32,
    /// Added to attack.
    pub attack_gain: u32,
    /// Added to max mana.
    pub mana_gain: u32,
}

/// A character taking part in duels.
///
/// Deserialized values are clamped back into the invariants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredCombatant")]
pub struct Combatant {
    id: CombatantId,
    name: String,
    archetype: Archetype,
    level: u32,
    experience: u32,
    attack: u32,
    current_life: u32,
    max_life: u32,
    mana: u32,
    max_mana: u32,
    shield: u32,
    is_defending: bool,
    combos: u32,
    last_action_at: Option<Millis>,
    last_offense_at: Option<Millis>,
    cooldowns: Cooldowns,
    statuses: StatusLedger,
    stats: BattleStats,
}

/// Wire form of [`Combatant`], checked on the way in.
#[derive(Deserialize)]
struct StoredCombatant {
    id: CombatantId,
    name: String,
    archetype: Archetype,
    level: u32,
    experience: u32,
    attack: u32,
    current_life: u32,
    max_life: u32,
    mana: u32,
    max_mana: u32,
    shield: u32,
    is_defending: bool,
    combos: u32,
    last_action_at: Option<Millis>,
    last_offense_at: Option<Millis>,
    cooldowns: Cooldowns,
    statuses: StatusLedger,
    stats: BattleStats,
}

impl From<StoredCombatant> for Combatant {
    fn from(stored: StoredCombatant) -> Self {
        let max_life = stored.max_life.max(1);
        let mut statuses = stored.statuses;
        statuses.normalize();
        Self {
            id: stored.id,
            name: stored.name,
            archetype: stored.archetype,
            level: stored.level.max(1),
            experience: stored.experience,
            attack: stored.attack,
            current_life: stored.current_life.min(max_life),
            max_life,
            mana: stored.mana.min(stored.max_mana),
            max_mana: stored.max_mana,
            shield: stored.shield,
            is_defending: stored.is_defending,
            combos: stored.combos,
            last_action_at: stored.last_action_at,
            last_offense_at: stored.last_offense_at,
            cooldowns: stored.cooldowns,
            statuses,
            stats: stored.stats,
        }
    }
}

impl Combatant {
    /// Creates a combatant at full life with [`STARTING_MANA`].
    ///
    /// `max_life` and `level` are raised to at least 1.
    #[must_use]
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        archetype: Archetype,
        max_life: u32,
        attack: u32,
        level: u32,
    ) -> Self {
        let max_life = max_life.max(1);
        Self {
            id,
            name: name.into(),
            archetype,
            level: level.max(1),
            experience: 0,
            attack,
            current_life: max_life,
            max_life,
            mana: STARTING_MANA,
            max_mana: STARTING_MANA,
            shield: 0,
            is_defending: false,
            combos: 0,
            last_action_at: None,
            last_offense_at: None,
            cooldowns: Cooldowns::default(),
            statuses: StatusLedger::new(),
            stats: BattleStats::default(),
        }
    }

    /// Sets current life, clamped to `max_life`.
    #[must_use]
    pub fn with_life(mut self, life: u32) -> Self {
        self.current_life = life.min(self.max_life);
        self
    }

    /// Sets current mana, clamped to `max_mana`.
    #[must_use]
    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana.min(self.max_mana);
        self
    }

    /// Sets the shield.
    #[must_use]
    pub fn with_shield(mut self, shield: u32) -> Self {
        self.shield = shield;
        self
    }

    /// Sets the cooldown counters.
    #[must_use]
    pub fn with_cooldowns(mut self, cooldowns: Cooldowns) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> CombatantId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Combat class.
    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Fixed ability data of the archetype.
    #[must_use]
    pub fn profile(&self) -> &'static ArchetypeProfile {
        self.archetype.profile()
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated towards the next level.
    #[must_use]
    pub const fn experience(&self) -> u32 {
        self.experience
    }

    /// Base attack.
    #[must_use]
    pub const fn attack(&self) -> u32 {
        self.attack
    }

    /// Current life.
    #[must_use]
    pub const fn current_life(&self) -> u32 {
        self.current_life
    }

    /// Maximum life.
    #[must_use]
    pub const fn max_life(&self) -> u32 {
        self.max_life
    }

    /// Current mana.
    #[must_use]
    pub const fn mana(&self) -> u32 {
        self.mana
    }

    /// Maximum mana.
    #[must_use]
    pub const fn max_mana(&self) -> u32 {
        self.max_mana
    }

    /// Damage absorbed before life is touched.
    #[must_use]
    pub const fn shield(&self) -> u32 {
        self.shield
    }

    /// Whether the last defend stance is still up.
    #[must_use]
    pub const fn is_defending(&self) -> bool {
        self.is_defending
    }

    /// Consecutive successful offensive actions inside the combo window.
    #[must_use]
    pub const fn combos(&self) -> u32 {
        self.combos
    }

    /// When this combatant last performed any action.
    #[must_use]
    pub const fn last_action_at(&self) -> Option<Millis> {
        self.last_action_at
    }

    /// When this combatant last performed a successful non-defend action.
    #[must_use]
    pub const fn last_offense_at(&self) -> Option<Millis> {
        self.last_offense_at
    }

    /// Cooldown counters.
    #[must_use]
    pub const fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    /// Active status effects.
    #[must_use]
    pub const fn statuses(&self) -> &StatusLedger {
        &self.statuses
    }

    /// Lifetime statistics.
    #[must_use]
    pub const fn stats(&self) -> &BattleStats {
        &self.stats
    }

    /// True at 0 life.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.current_life == 0
    }

    /// `current_life / max_life` in `[0, 1]`.
    #[must_use]
    pub fn life_ratio(&self) -> f64 {
        f64::from(self.current_life) / f64::from(self.max_life)
    }

    /// True when `ability` is off cooldown.
    #[must_use]
    pub const fn ability_ready(&self, ability: Ability) -> bool {
        self.cooldowns.is_ready(ability)
    }

    /// True when there is enough mana for `ability`. Heal costs nothing.
    #[must_use]
    pub fn can_afford(&self, ability: Ability) -> bool {
        self.mana >= self.mana_cost(ability)
    }

    /// Mana needed for `ability`.
    #[must_use]
    pub fn mana_cost(&self, ability: Ability) -> u32 {
        let profile = self.profile();
        match ability {
            Ability::Special => profile.special_cost,
            Ability::Heal => 0,
            Ability::Ultimate => profile.ultimate_cost,
        }
    }

    // -------------------------------------------------------------------------
    // Resource primitives
    // -------------------------------------------------------------------------

    /// Removes up to `amount` life and returns what was actually lost.
    ///
    /// The loss is added to `damage_received`. Reaching 0 life marks the
    /// combatant defeated and counts a loss, once per defeat.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        if self.is_defeated() {
            return 0;
        }
        let loss = amount.min(self.current_life);
        self.current_life -= loss;
        self.stats.damage_received += u64::from(loss);
        if self.current_life == 0 {
            self.stats.losses += 1;
            tracing::info!(combatant = %self.id, name = %self.name, "combatant defeated");
        }
        loss
    }

    /// Restores up to `amount` life and returns what was actually gained.
    ///
    /// Defeated combatants cannot be healed; use [`Combatant::revive`].
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_defeated() {
            return 0;
        }
        let gain = amount.min(self.max_life - self.current_life);
        self.current_life += gain;
        gain
    }

    /// Restores up to `amount` mana and returns what was actually gained.
    pub fn regenerate_mana(&mut self, amount: u32) -> u32 {
        let gain = amount.min(self.max_mana - self.mana);
        self.mana += gain;
        gain
    }

    /// Brings the combatant back at 30% of max life (at least 1).
    pub fn revive(&mut self) {
        self.current_life = scale(self.max_life, 0.3).clamp(1, self.max_life);
        tracing::info!(combatant = %self.id, life = self.current_life, "combatant revived");
    }

    /// Adds experience, levelling up once the threshold `level * 100` is met.
    ///
    /// A level-up raises level by one, resets experience to 0, grants
    /// +10..=29 max life, +2..=6 attack and +5..=19 max mana, and refills
    /// life and mana.
    pub fn gain_experience(&mut self, amount: u32, dice: &mut dyn Dice) -> Option<LevelUp> {
        self.experience = self.experience.saturating_add(amount);
        if self.experience < self.level.saturating_mul(100) {
            return None;
        }

        let life_gain = roll_gain(dice, 10, 29);
        let attack_gain = roll_gain(dice, 2, 6);
        let mana_gain = roll_gain(dice, 5, 19);

        self.level += 1;
        self.experience = 0;
        self.max_life += life_gain;
        self.current_life = self.max_life;
        self.attack += attack_gain;
        self.max_mana += mana_gain;
        self.mana = self.max_mana;

        tracing::info!(combatant = %self.id, level = self.level, "level up");
        Some(LevelUp {
            level: self.level,
            life_gain,
            attack_gain,
            mana_gain,
        })
    }

    /// Resets the combatant for a new game.
    ///
    /// Life and mana refill, the level is re-rolled in `8..=17`, and every
    /// transient state and statistic is cleared.
    pub fn restart(&mut self, dice: &mut dyn Dice) {
        self.current_life = self.max_life;
        self.mana = self.max_mana;
        self.level = roll_gain(dice, 8, 17);
        self.experience = 0;
        self.shield = 0;
        self.combos = 0;
        self.is_defending = false;
        self.last_action_at = None;
        self.last_offense_at = None;
        self.cooldowns.clear();
        self.statuses.clear();
        self.stats = BattleStats::default();
    }

    /// Drops the defend stance and the combo chain.
    pub fn reset_battle_flags(&mut self) {
        self.is_defending = false;
        self.combos = 0;
    }

    // -------------------------------------------------------------------------
    // Engine-internal mutators
    // -------------------------------------------------------------------------

    pub(crate) fn spend_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_sub(amount);
    }

    pub(crate) fn add_shield(&mut self, amount: u32) {
        self.shield = self.shield.saturating_add(amount);
    }

    /// Soaks up to `damage` with the shield and returns the absorbed amount.
    pub(crate) fn absorb_with_shield(&mut self, damage: u32) -> u32 {
        let absorbed = damage.min(self.shield);
        self.shield -= absorbed;
        absorbed
    }

    pub(crate) fn set_defending(&mut self, defending: bool) {
        self.is_defending = defending;
    }

    pub(crate) fn set_combo_state(
        &mut self,
        combos: u32,
        last_action_at: Millis,
        last_offense_at: Option<Millis>,
    ) {
        self.combos = combos;
        self.last_action_at = Some(last_action_at);
        self.last_offense_at = last_offense_at;
    }

    pub(crate) fn cooldowns_mut(&mut self) -> &mut Cooldowns {
        &mut self.cooldowns
    }

    pub(crate) fn statuses_mut(&mut self) -> &mut StatusLedger {
        &mut self.statuses
    }

    pub(crate) fn stats_mut(&mut self) -> &mut BattleStats {
        &mut self.stats
    }
}

#[allow(clippy::cast_sign_loss)]
fn roll_gain(dice: &mut dyn Dice, low: i32, high: i32) -> u32 {
    dice.range_inclusive(low, high).max(0) as u32
}
