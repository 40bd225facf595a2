//! Action resolution.
//!
//! The resolver turns one chosen [`Action`] plus the state of both
//! combatants into damage, healing, status effects, cooldowns and combo
//! updates. It is a pure function of its inputs: randomness comes from the
//! injected [`Dice`] and time from the `now` argument.
//!
//! # Architecture
//!
//! Every action runs through the same pipeline:
//! 1. Reject defeated participants ([`EngineError::CombatantDefeated`])
//! 2. Check mana; a shortfall is a failure that changes nothing
//! 3. Evaluate the combo window before anything moves
//! 4. Run the action-specific handler
//! 5. Commit the combo chain and decrement the actor's cooldowns
//!
//! Damage from offensive actions lands in a single step (`land`), which is
//! where combo amplification is applied and statistics are recorded.
//!
//! # Invariants
//!
//! - Reported damage is the life the target actually lost
//! - A cooldown started by an action is not decremented by that same action
//! - The insufficient-mana failure touches no state at all

mod action;
mod combo;
mod formula;
mod outcome;

pub use action::Action;
pub use combo::{ComboTracker, ComboWindow};
pub use outcome::{ActionResult, EffectApplication, EffectTag, FailureReason, HitFlags, Recipient};

use crate::clock::Millis;
use crate::combatant::{Ability, Combatant};
use crate::config::CombatRules;
use crate::dice::Dice;
use crate::error::EngineError;
use crate::numeric::{scale, signed};
use crate::status::{self, StatusKind};

/// Duration of a status applied by a special.
pub const SPECIAL_EFFECT_DURATION: u32 = 4;
/// Burn applied by every ultimate.
pub const ULTIMATE_BURN: u32 = 4;
/// Poison applied by every ultimate.
pub const ULTIMATE_POISON: u32 = 3;
/// Regen granted by a successful heal.
pub const HEAL_REGEN: u32 = 2;
/// Regen a defend may grant.
pub const DEFEND_REGEN: u32 = 3;
/// Probability that defending also grants regen.
pub const DEFEND_REGEN_CHANCE: f64 = 0.4;

/// Computes the effect of single actions.
///
/// # Example
///
/// ```
/// use skirmish_core::{Action, ActionResolver, Archetype, Combatant, CombatantId, Millis};
///
/// let mut rng = skirmish_core::dice::seeded(3);
/// let mut thor = Combatant::new(CombatantId::new(1), "Thor", Archetype::Warrior, 160, 20, 10);
/// let mut luna = Combatant::new(CombatantId::new(2), "Luna", Archetype::Mage, 90, 30, 10);
///
/// let resolver = ActionResolver::default();
/// let result = resolver
///     .perform(&mut thor, &mut luna, Action::Attack, &mut rng, Millis::ZERO)
///     .unwrap();
/// assert!(result.success);
/// assert_eq!(luna.current_life(), 90 - result.damage as u32);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActionResolver {
    rules: CombatRules,
    combo: ComboTracker,
}

/// What an action handler produced, before combo and cooldown bookkeeping.
struct Resolved {
    result: ActionResult,
    fresh_cooldown: Option<Ability>,
}

impl Resolved {
    fn new(result: ActionResult) -> Self {
        Self {
            result,
            fresh_cooldown: None,
        }
    }

    fn started(mut self, ability: Ability) -> Self {
        self.fresh_cooldown = Some(ability);
        self
    }
}

impl ActionResolver {
    /// Creates a resolver for the given rules.
    #[must_use]
    pub fn new(rules: CombatRules) -> Self {
        let combo = ComboTracker::new(&rules);
        Self { rules, combo }
    }

    /// The rules in force.
    #[must_use]
    pub const fn rules(&self) -> &CombatRules {
        &self.rules
    }

    /// The combo tracker derived from the rules.
    #[must_use]
    pub const fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    /// Resolves `action` by `actor` against `target` at time `now`.
    ///
    /// Gameplay failures come back as `Ok` with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CombatantDefeated`] if either participant is at
    /// 0 life.
    pub fn perform(
        &self,
        actor: &mut Combatant,
        target: &mut Combatant,
        action: Action,
        dice: &mut dyn Dice,
        now: Millis,
    ) -> Result<ActionResult, EngineError> {
        for participant in [&*actor, &*target] {
            if participant.is_defeated() {
                return Err(EngineError::CombatantDefeated(participant.id()));
            }
        }

        if let Some(ability) = action.ability() {
            if !actor.can_afford(ability) {
                let required = actor.mana_cost(ability);
                let available = actor.mana();
                tracing::debug!(actor = %actor.id(), %action, required, available, "not enough mana");
                return Ok(ActionResult::failure(
                    action,
                    FailureReason::InsufficientMana {
                        required,
                        available,
                    },
                    format!("{} needs {required} mana but has {available}.", actor.name()),
                ));
            }
        }

        let window = self.combo.window(actor, action, now);
        let cooling = action
            .ability()
            .filter(|&ability| !actor.ability_ready(ability));
        let Resolved {
            mut result,
            fresh_cooldown,
        } = match cooling {
            Some(ability) => Self::on_cooldown(actor, action, ability),
            None => match action {
                Action::Attack => self.attack(actor, target, window, dice),
                Action::Defend => Self::defend(actor, dice),
                Action::Special => self.special(actor, target, window, dice),
                Action::Heal => self.heal(actor),
                Action::Ultimate => self.ultimate(actor, target, window),
                Action::Flee => Self::flee(actor, dice),
            },
        };

        result.combo = self.combo.record(actor, action, window, result.success, now);
        actor.cooldowns_mut().tick_except(fresh_cooldown);

        tracing::debug!(
            actor = %actor.id(),
            target = %target.id(),
            %action,
            success = result.success,
            damage = result.damage,
            combo = result.combo,
            "action resolved"
        );
        Ok(result)
    }

    // =========================================================================
    // Action handlers
    // =========================================================================

    fn on_cooldown(actor: &Combatant, action: Action, ability: Ability) -> Resolved {
        let turns = actor.cooldowns().get(ability);
        let name = match ability {
            Ability::Special => actor.profile().special_name,
            Ability::Heal => "Heal",
            Ability::Ultimate => actor.profile().ultimate_name,
        };
        Resolved::new(ActionResult::failure(
            action,
            FailureReason::OnCooldown { ability, turns },
            format!("{name} is not ready yet! ({turns} turns)"),
        ))
    }

    fn attack(
        &self,
        actor: &mut Combatant,
        target: &mut Combatant,
        window: ComboWindow,
        dice: &mut dyn Dice,
    ) -> Resolved {
        let mut flags = HitFlags::empty();
        let variation = dice.range_inclusive(-5, 4);
        let mut damage = formula::with_variation(formula::attack_base(actor), variation);

        let combos = actor.combos();
        if dice.chance(formula::crit_chance(actor.level(), combos)) {
            damage = scale(damage, formula::crit_multiplier(combos));
            actor.stats_mut().critical_hits += 1;
            flags |= HitFlags::CRITICAL;
        }
        if target.is_defending() {
            damage = scale(damage, formula::ATTACK_DEFENDED);
            flags |= HitFlags::DEFENDED;
        }
        let damage = Self::absorb(target, damage, &mut flags);
        let dealt = self.land(actor, target, Action::Attack, window, damage, &mut flags);

        let mut message = format!("{} attacks {}!", actor.name(), target.name());
        if flags.contains(HitFlags::CRITICAL) {
            message.push_str(" CRITICAL!");
        }
        message.push_str(&hit_summary(dealt, window, flags));

        let mut result = ActionResult::success(Action::Attack, EffectTag::Attack, signed(dealt), message);
        result.flags = flags;
        Resolved::new(result)
    }

    fn defend(actor: &mut Combatant, dice: &mut dyn Dice) -> Resolved {
        actor.set_defending(true);
        let shield = formula::defend_shield(actor);
        actor.add_shield(shield);
        actor.regenerate_mana(actor.profile().mana_regen);

        let mut result = ActionResult::success(
            Action::Defend,
            EffectTag::Defend,
            0,
            format!("{} takes a defensive stance! Shield +{shield}", actor.name()),
        );
        if dice.chance(DEFEND_REGEN_CHANCE) {
            actor.statuses_mut().add(StatusKind::Regen, DEFEND_REGEN);
            result.applied_effects.push(EffectApplication {
                recipient: Recipient::Actor,
                kind: StatusKind::Regen,
                duration: DEFEND_REGEN,
            });
        }
        Resolved::new(result)
    }

    fn special(
        &self,
        actor: &mut Combatant,
        target: &mut Combatant,
        window: ComboWindow,
        dice: &mut dyn Dice,
    ) -> Resolved {
        let profile = actor.profile();
        let raw = formula::special_raw(actor);
        let self_healed = if profile.special.self_heal_ratio > 0.0 {
            actor.heal(scale(raw, profile.special.self_heal_ratio))
        } else {
            0
        };

        let mut flags = HitFlags::empty();
        let mut damage = raw;
        if target.is_defending() {
            damage = scale(damage, formula::SPECIAL_DEFENDED);
            flags |= HitFlags::DEFENDED;
        }
        let damage = Self::absorb(target, damage, &mut flags);
        let dealt = self.land(actor, target, Action::Special, window, damage, &mut flags);

        actor
            .cooldowns_mut()
            .start(Ability::Special, self.rules.special_cooldown);
        actor.spend_mana(profile.special_cost);
        actor.stats_mut().specials_used += 1;

        let mut message = format!("{} uses {}!", actor.name(), profile.special_name);
        if self_healed > 0 {
            message.push_str(&format!(" +{self_healed} life!"));
        }
        message.push_str(&hit_summary(dealt, window, flags));

        let mut result = ActionResult::success(Action::Special, EffectTag::Special, signed(dealt), message);
        result.flags = flags;

        let candidates = profile.special.effects;
        if !candidates.is_empty() && dice.chance(profile.special.effect_chance) {
            let kind = candidates[dice.pick(candidates.len())];
            let duration = if kind == StatusKind::Purify {
                status::purify(target);
                result.message.push_str(" Effects cleansed!");
                0
            } else {
                target.statuses_mut().add(kind, SPECIAL_EFFECT_DURATION);
                result.message.push_str(&format!(" {} is afflicted with {kind}!", target.name()));
                SPECIAL_EFFECT_DURATION
            };
            result.applied_effects.push(EffectApplication {
                recipient: Recipient::Target,
                kind,
                duration,
            });
        }
        Resolved::new(result).started(Ability::Special)
    }

    fn heal(&self, actor: &mut Combatant) -> Resolved {
        let gained = actor.heal(formula::heal_amount(actor));
        actor
            .cooldowns_mut()
            .start(Ability::Heal, self.rules.heal_cooldown);

        let result = if gained > 0 {
            actor.statuses_mut().add(StatusKind::Regen, HEAL_REGEN);
            actor.stats_mut().heals_used += 1;
            let mut result = ActionResult::success(
                Action::Heal,
                EffectTag::Heal,
                -signed(gained),
                format!("{} heals! +{gained} life!", actor.name()),
            );
            result.applied_effects.push(EffectApplication {
                recipient: Recipient::Actor,
                kind: StatusKind::Regen,
                duration: HEAL_REGEN,
            });
            result
        } else {
            ActionResult::failure(
                Action::Heal,
                FailureReason::AlreadyFullLife,
                format!("{} is already at full life!", actor.name()),
            )
        };
        Resolved::new(result).started(Ability::Heal)
    }

    fn ultimate(&self, actor: &mut Combatant, target: &mut Combatant, window: ComboWindow) -> Resolved {
        let profile = actor.profile();
        let mut flags = HitFlags::empty();
        let mut damage = formula::ultimate_raw(actor);
        if target.is_defending() {
            damage = scale(damage, formula::ULTIMATE_DEFENDED);
            flags |= HitFlags::DEFENDED;
        }
        let dealt = self.land(actor, target, Action::Ultimate, window, damage, &mut flags);

        actor
            .cooldowns_mut()
            .start(Ability::Ultimate, self.rules.ultimate_cooldown);
        actor.spend_mana(profile.ultimate_cost);

        let mut result = ActionResult::success(
            Action::Ultimate,
            EffectTag::Ultimate,
            signed(dealt),
            format!(
                "{} unleashes {}!{}",
                actor.name(),
                profile.ultimate_name,
                hit_summary(dealt, window, flags)
            ),
        );
        result.flags = flags;
        for (kind, duration) in [(StatusKind::Burn, ULTIMATE_BURN), (StatusKind::Poison, ULTIMATE_POISON)] {
            target.statuses_mut().add(kind, duration);
            result.applied_effects.push(EffectApplication {
                recipient: Recipient::Target,
                kind,
                duration,
            });
        }
        Resolved::new(result).started(Ability::Ultimate)
    }

    fn flee(actor: &mut Combatant, dice: &mut dyn Dice) -> Resolved {
        let chance = formula::flee_chance(actor);
        if chance >= 1.0 || dice.chance(chance) {
            let mut result = ActionResult::success(
                Action::Flee,
                EffectTag::Flee,
                0,
                format!("{} escaped the battle!", actor.name()),
            );
            result.fled = true;
            return Resolved::new(result);
        }

        let self_damage = actor.apply_damage(formula::flee_penalty(actor));
        let mut result = ActionResult::failure(
            Action::Flee,
            FailureReason::FleeFailed { self_damage },
            format!("{} tried to flee but failed! Lost {self_damage} life!", actor.name()),
        );
        result.effect_tag = Some(EffectTag::FleeFailed);
        result.damage = signed(self_damage);
        Resolved::new(result)
    }

    // =========================================================================
    // Damage application
    // =========================================================================

    /// Soaks `damage` with the target's shield and returns what is left.
    fn absorb(target: &mut Combatant, damage: u32, flags: &mut HitFlags) -> u32 {
        let absorbed = target.absorb_with_shield(damage);
        if absorbed > 0 {
            *flags |= HitFlags::SHIELDED;
            if absorbed == damage {
                *flags |= HitFlags::BLOCKED;
            }
        }
        damage - absorbed
    }

    /// Applies combo amplification, then removes life from the target.
    ///
    /// Returns the life actually lost, which is also what `damage_dealt`
    /// records.
    fn land(
        &self,
        actor: &mut Combatant,
        target: &mut Combatant,
        action: Action,
        window: ComboWindow,
        damage: u32,
        flags: &mut HitFlags,
    ) -> u32 {
        let damage = if self.combo.amplifies(action, window) {
            *flags |= HitFlags::COMBO;
            self.combo.amplify(damage)
        } else {
            damage
        };
        let lost = target.apply_damage(damage);
        actor.stats_mut().damage_dealt += u64::from(lost);
        lost
    }
}

fn hit_summary(dealt: u32, window: ComboWindow, flags: HitFlags) -> String {
    let mut summary = if dealt > 0 {
        format!(" {dealt} damage!")
    } else if flags.contains(HitFlags::BLOCKED) {
        " Blocked!".to_string()
    } else {
        " No damage.".to_string()
    };
    if flags.contains(HitFlags::COMBO) {
        summary.push_str(&format!(" COMBO x{}!", window.next));
    }
    summary
}
