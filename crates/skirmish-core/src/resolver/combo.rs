//! Combo chaining.
//!
//! A combatant chains a combo by acting again within the window of its last
//! successful non-defend action. Once the chain reaches the threshold, the
//! damage of offensive actions is amplified.

use crate::clock::Millis;
use crate::combatant::Combatant;
use crate::config::CombatRules;
use crate::numeric::scale;

use super::Action;

/// Where an action falls relative to the actor's combo chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboWindow {
    /// The action comes less than the window after the last offense.
    pub in_window: bool,
    /// Combo count the actor will have if the action succeeds.
    pub next: u32,
}

/// Reads and commits combo state on a combatant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboTracker {
    window_ms: u64,
    threshold: u32,
    multiplier: f64,
}

impl ComboTracker {
    /// Creates a tracker from the battle rules.
    #[must_use]
    pub fn new(rules: &CombatRules) -> Self {
        Self {
            window_ms: rules.combo_window_ms,
            threshold: rules.combo_threshold,
            multiplier: rules.combo_multiplier,
        }
    }

    /// Evaluates `action` performed by `actor` at `now`.
    #[must_use]
    pub fn window(&self, actor: &Combatant, action: Action, now: Millis) -> ComboWindow {
        let in_window = actor
            .last_offense_at()
            .is_some_and(|at| now.since(at) < self.window_ms);
        let next = if in_window && action != Action::Defend {
            actor.combos() + 1
        } else {
            0
        };
        ComboWindow { in_window, next }
    }

    /// True when a successful `action` in `window` gets amplified damage.
    #[must_use]
    pub fn amplifies(&self, action: Action, window: ComboWindow) -> bool {
        action.is_offensive() && window.next >= self.threshold
    }

    /// Applies the combo multiplier to `damage`.
    #[must_use]
    pub fn amplify(&self, damage: u32) -> u32 {
        scale(damage, self.multiplier)
    }

    /// Commits the chain after the action resolved. Returns the new count.
    pub fn record(
        &self,
        actor: &mut Combatant,
        action: Action,
        window: ComboWindow,
        success: bool,
        now: Millis,
    ) -> u32 {
        let combos = if success { window.next } else { 0 };
        let last_offense = if success && action != Action::Defend {
            Some(now)
        } else {
            actor.last_offense_at()
        };
        actor.set_combo_state(combos, now, last_offense);
        combos
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(&CombatRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::warrior;

    fn chain(tracker: &ComboTracker, actor: &mut Combatant, times: &[u64]) -> u32 {
        let mut combos = 0;
        for &t in times {
            let now = Millis::new(t);
            let window = tracker.window(actor, Action::Attack, now);
            combos = tracker.record(actor, Action::Attack, window, true, now);
        }
        combos
    }

    #[test]
    fn first_offense_starts_at_zero() {
        let tracker = ComboTracker::default();
        let mut c = warrior();
        assert_eq!(chain(&tracker, &mut c, &[0]), 0);
        assert_eq!(c.last_offense_at(), Some(Millis::ZERO));
    }

    #[test]
    fn rapid_offenses_chain() {
        let tracker = ComboTracker::default();
        let mut c = warrior();
        assert_eq!(chain(&tracker, &mut c, &[0, 1000, 2000, 2999]), 3);
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let tracker = ComboTracker::default();
        let mut c = warrior();
        chain(&tracker, &mut c, &[0, 1000]);
        let window = tracker.window(&c, Action::Attack, Millis::new(4000));
        assert!(!window.in_window);
        assert_eq!(window.next, 0);

        let window = tracker.window(&c, Action::Attack, Millis::new(3999));
        assert!(window.in_window);
        assert_eq!(window.next, 2);
    }

    #[test]
    fn late_action_resets_chain() {
        let tracker = ComboTracker::default();
        let mut c = warrior();
        chain(&tracker, &mut c, &[0, 500, 1000]);
        assert_eq!(c.combos(), 2);
        assert_eq!(chain(&tracker, &mut c, &[4001]), 0);
    }

    #[test]
    fn defend_resets_but_keeps_offense_timestamp() {
        let tracker = ComboTracker::default();
        let mut c = warrior();
        chain(&tracker, &mut c, &[0, 500]);
        let now = Millis::new(800);
        let window = tracker.window(&c, Action::Defend, now);
        tracker.record(&mut c, Action::Defend, window, true, now);
        assert_eq!(c.combos(), 0);
        assert_eq!(c.last_offense_at(), Some(Millis::new(500)));
        assert_eq!(c.last_action_at(), Some(now));
    }

    #[test]
    fn failure_resets() {
        let tracker = ComboTracker::default();
        let mut c = warrior();
        chain(&tracker, &mut c, &[0, 500]);
        let now = Millis::new(900);
        let window = tracker.window(&c, Action::Special, now);
        assert_eq!(tracker.record(&mut c, Action::Special, window, false, now), 0);
    }

    #[test]
    fn amplification_threshold() {
        let tracker = ComboTracker::default();
        let hot = ComboWindow {
            in_window: true,
            next: 3,
        };
        let warm = ComboWindow {
            in_window: true,
            next: 2,
        };
        assert!(tracker.amplifies(Action::Attack, hot));
        assert!(!tracker.amplifies(Action::Attack, warm));
        assert!(!tracker.amplifies(Action::Heal, hot));
        assert_eq!(tracker.amplify(25), 30);
        assert_eq!(tracker.amplify(7), 8);
    }
}
