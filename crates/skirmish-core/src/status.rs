//! Status effects and their periodic ticking.
//!
//! A [`StatusLedger`] is an ordered map from [`StatusKind`] to the number of
//! ticks left. Order is insertion order; overwriting an existing effect keeps
//! its position, so ticks always apply effects in a stable order.
//!
//! # Tick semantics
//!
//! [`tick_status_effects`] applies every stored effect once, in storage order:
//!
//! | kind     | effect                           |
//! |----------|----------------------------------|
//! | `poison` | damage `floor(max_life × 0.05)`  |
//! | `burn`   | damage `floor(max_life × 0.07)`  |
//! | `regen`  | heal `floor(max_life × 0.08)`    |
//! | `freeze` | next turn is lost                |
//! | `bleed`  | none                             |
//! | `slow`   | none                             |
//!
//! and then decrements each duration, dropping effects that reach 0.
//! `purify` is instantaneous and never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::error::ParseError;
use crate::numeric::{scale, signed};

/// Kinds of status effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Damage over time (5% of max life).
    Poison,
    /// Damage over time (7% of max life).
    Burn,
    /// Costs the affected side its next turn.
    Freeze,
    /// Heal over time (8% of max life).
    Regen,
    /// No numeric effect.
    Bleed,
    /// No numeric effect.
    Slow,
    /// Clears every effect on the target; never stored.
    Purify,
}

impl StatusKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Poison,
        Self::Burn,
        Self::Freeze,
        Self::Regen,
        Self::Bleed,
        Self::Slow,
        Self::Purify,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poison => "poison",
            Self::Burn => "burn",
            Self::Freeze => "freeze",
            Self::Regen => "regen",
            Self::Bleed => "bleed",
            Self::Slow => "slow",
            Self::Purify => "purify",
        }
    }

    /// True for kinds that act immediately instead of being stored.
    #[must_use]
    pub const fn is_instant(self) -> bool {
        matches!(self, Self::Purify)
    }

    /// `(heals, fraction of max life)` for kinds that change life each tick.
    const fn life_ratio(self) -> Option<(bool, f64)> {
        match self {
            Self::Poison => Some((false, 0.05)),
            Self::Burn => Some((false, 0.07)),
            Self::Regen => Some((true, 0.08)),
            Self::Freeze | Self::Bleed | Self::Slow | Self::Purify => None,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// One stored effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Effect kind.
    pub kind: StatusKind,
    /// Ticks left; always above 0 while stored.
    pub remaining: u32,
}

/// Ordered collection of active effects on one combatant.
///
/// # Example
///
/// ```
/// use skirmish_core::{StatusKind, StatusLedger};
///
/// let mut ledger = StatusLedger::new();
/// ledger.add(StatusKind::Burn, 4);
/// ledger.add(StatusKind::Poison, 3);
/// ledger.add(StatusKind::Burn, 2);
///
/// let order: Vec<_> = ledger.iter().map(|e| (e.kind, e.remaining)).collect();
/// assert_eq!(order, vec![(StatusKind::Burn, 2), (StatusKind::Poison, 3)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLedger {
    entries: Vec<StatusEntry>,
}

impl StatusLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `kind` or overwrites its duration in place.
    ///
    /// Instant kinds and zero durations are ignored.
    pub fn add(&mut self, kind: StatusKind, duration: u32) {
        if kind.is_instant() || duration == 0 {
            return;
        }
        match self.entries.iter_mut().find(|e| e.kind == kind) {
            Some(entry) => entry.remaining = duration,
            None => self.entries.push(StatusEntry {
                kind,
                remaining: duration,
            }),
        }
    }

    /// Drops entries that could never have been stored: instant kinds, zero
    /// durations, and repeats of a kind already present.
    pub(crate) fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.entries.len());
        self.entries.retain(|e| {
            let keep = !e.kind.is_instant() && e.remaining > 0 && !seen.contains(&e.kind);
            if keep {
                seen.push(e.kind);
            }
            keep
        });
    }

    /// Remaining duration of `kind`, if active.
    #[must_use]
    pub fn get(&self, kind: StatusKind) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.remaining)
    }

    /// True when `kind` is active.
    #[must_use]
    pub fn contains(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Removes `kind`, returning its remaining duration.
    pub fn remove(&mut self, kind: StatusKind) -> Option<u32> {
        let index = self.entries.iter().position(|e| e.kind == kind)?;
        Some(self.entries.remove(index).remaining)
    }

    /// Removes every effect.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates effects in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter()
    }

    /// Number of active effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no effect is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One effect applied during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickedEffect {
    /// Effect kind.
    pub kind: StatusKind,
    /// Life removed (negative) or restored (positive); 0 for non-numeric kinds.
    pub amount: i32,
    /// Ticks left after this one; 0 means the effect expired.
    pub remaining: u32,
}

/// What a status tick did to a combatant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Applied effects in storage order.
    pub effects: Vec<TickedEffect>,
    /// A freeze ticked: the combatant loses its next turn.
    pub frozen: bool,
    /// Life lost to damage-over-time effects.
    pub damage: u32,
    /// Life restored by regeneration.
    pub healing: u32,
    /// The tick reduced the combatant to 0 life.
    pub defeated: bool,
}

impl TickReport {
    /// True when no effect was active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Clears every effect on `target`.
pub fn purify(target: &mut Combatant) {
    target.statuses_mut().clear();
}

/// Applies and decrements every effect on `combatant` once.
///
/// Life changes go through [`Combatant::apply_damage`] and
/// [`Combatant::heal`], so statistics and the defeat marker stay consistent.
/// Once the combatant is defeated, remaining numeric effects have no effect.
pub fn tick_status_effects(combatant: &mut Combatant) -> TickReport {
    let mut report = TickReport::default();
    let was_defeated = combatant.is_defeated();
    let entries = std::mem::take(&mut combatant.statuses_mut().entries);
    let mut kept = Vec::with_capacity(entries.len());

    for mut entry in entries {
        let amount = match entry.kind.life_ratio() {
            Some((true, ratio)) => {
                let gained = combatant.heal(scale(combatant.max_life(), ratio));
                report.healing += gained;
                signed(gained)
            }
            Some((false, ratio)) => {
                let lost = combatant.apply_damage(scale(combatant.max_life(), ratio));
                report.damage += lost;
                -signed(lost)
            }
            None => {
                if entry.kind == StatusKind::Freeze {
                    report.frozen = true;
                }
                0
            }
        };

        entry.remaining -= 1;
        report.effects.push(TickedEffect {
            kind: entry.kind,
            amount,
            remaining: entry.remaining,
        });
        if entry.remaining > 0 {
            kept.push(entry);
        }
    }

    combatant.statuses_mut().entries = kept;
    report.defeated = !was_defeated && combatant.is_defeated();

    if !report.is_empty() {
        tracing::debug!(
            combatant = %combatant.id(),
            damage = report.damage,
            healing = report.healing,
            frozen = report.frozen,
            "status effects ticked"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::warrior;

    mod ledger_tests {
        use super::*;

        #[test]
        fn overwrite_keeps_position() {
            let mut ledger = StatusLedger::new();
            ledger.add(StatusKind::Poison, 3);
            ledger.add(StatusKind::Burn, 4);
            ledger.add(StatusKind::Poison, 1);
            let kinds: Vec<_> = ledger.iter().map(|e| e.kind).collect();
            assert_eq!(kinds, vec![StatusKind::Poison, StatusKind::Burn]);
            assert_eq!(ledger.get(StatusKind::Poison), Some(1));
        }

        #[test]
        fn purify_and_zero_are_never_stored() {
            let mut ledger = StatusLedger::new();
            ledger.add(StatusKind::Purify, 4);
            ledger.add(StatusKind::Slow, 0);
            assert!(ledger.is_empty());
        }

        #[test]
        fn remove_returns_duration() {
            let mut ledger = StatusLedger::new();
            ledger.add(StatusKind::Bleed, 4);
            assert_eq!(ledger.remove(StatusKind::Bleed), Some(4));
            assert_eq!(ledger.remove(StatusKind::Bleed), None);
        }

        #[test]
        fn parses_and_displays_lowercase() {
            assert_eq!("freeze".parse::<StatusKind>().unwrap(), StatusKind::Freeze);
            assert_eq!(StatusKind::Regen.to_string(), "regen");
            assert!("stun".parse::<StatusKind>().is_err());
        }
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn poison_and_burn_damage_by_max_life() {
            let mut c = warrior();
            c.statuses_mut().add(StatusKind::Poison, 3);
            c.statuses_mut().add(StatusKind::Burn, 4);

            let report = tick_status_effects(&mut c);

            assert_eq!(report.damage, 12);
            assert_eq!(c.current_life(), 88);
            assert_eq!(report.effects[0].amount, -5);
            assert_eq!(report.effects[1].amount, -7);
            assert_eq!(c.statuses().get(StatusKind::Poison), Some(2));
            assert_eq!(c.statuses().get(StatusKind::Burn), Some(3));
            assert_eq!(c.stats().damage_received, 12);
        }

        #[test]
        fn regen_heals_and_expires() {
            let mut c = warrior().with_life(50);
            c.statuses_mut().add(StatusKind::Regen, 1);

            let report = tick_status_effects(&mut c);

            assert_eq!(report.healing, 8);
            assert_eq!(c.current_life(), 58);
            assert!(c.statuses().is_empty());
            assert_eq!(report.effects[0].remaining, 0);
        }

        #[test]
        fn freeze_is_reported() {
            let mut c = warrior();
            c.statuses_mut().add(StatusKind::Freeze, 2);
            let report = tick_status_effects(&mut c);
            assert!(report.frozen);
            assert_eq!(c.current_life(), 100);
        }

        #[test]
        fn bleed_and_slow_only_count_down() {
            let mut c = warrior();
            c.statuses_mut().add(StatusKind::Bleed, 2);
            c.statuses_mut().add(StatusKind::Slow, 1);
            let report = tick_status_effects(&mut c);
            assert_eq!(report.damage, 0);
            assert!(!report.frozen);
            assert_eq!(c.statuses().len(), 1);
        }

        #[test]
        fn tick_can_defeat() {
            let mut c = warrior().with_life(4);
            c.statuses_mut().add(StatusKind::Poison, 3);
            c.statuses_mut().add(StatusKind::Regen, 3);

            let report = tick_status_effects(&mut c);

            assert!(report.defeated);
            assert!(c.is_defeated());
            assert_eq!(report.damage, 4);
            assert_eq!(report.healing, 0);
            assert_eq!(c.stats().losses, 1);
        }

        #[test]
        fn empty_ledger_reports_nothing() {
            let mut c = warrior();
            assert!(tick_status_effects(&mut c).is_empty());
        }
    }

    #[test]
    fn purify_clears_target() {
        let mut c = warrior();
        c.statuses_mut().add(StatusKind::Poison, 3);
        c.statuses_mut().add(StatusKind::Freeze, 4);
        purify(&mut c);
        assert!(c.statuses().is_empty());
    }
}
