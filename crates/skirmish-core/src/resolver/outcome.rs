//! What an action did.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::combatant::Ability;
use crate::status::StatusKind;

use super::Action;

bitflags! {
    /// Qualifiers of how a hit landed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct HitFlags: u8 {
        /// Critical basic attack.
        const CRITICAL = 1 << 0;
        /// Target was defending.
        const DEFENDED = 1 << 1;
        /// Target's shield absorbed part of the damage.
        const SHIELDED = 1 << 2;
        /// The shield absorbed all of it.
        const BLOCKED  = 1 << 3;
        /// Combo amplification applied.
        const COMBO    = 1 << 4;
    }
}

/// Presentation hint for an action result.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectTag {
    /// Basic attack.
    Attack,
    /// Defend stance.
    Defend,
    /// Archetype special.
    Special,
    /// Self heal.
    Heal,
    /// Archetype ultimate.
    Ultimate,
    /// Successful escape.
    Flee,
    /// Failed escape.
    FleeFailed,
}

impl EffectTag {
    /// Kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defend => "defend",
            Self::Special => "special",
            Self::Heal => "heal",
            Self::Ultimate => "ultimate",
            Self::Flee => "flee",
            Self::FleeFailed => "flee-failed",
        }
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an action did not go off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum FailureReason {
    /// Not enough mana; nothing changed.
    InsufficientMana {
        /// Cost of the ability.
        required: u32,
        /// Mana the actor had.
        available: u32,
    },
    /// The ability is still cooling down.
    OnCooldown {
        /// The gated ability.
        ability: Ability,
        /// Turns left before the attempt.
        turns: u32,
    },
    /// Heal at full life.
    AlreadyFullLife,
    /// The escape roll failed.
    FleeFailed {
        /// Life the actor lost stumbling.
        self_damage: u32,
    },
}

/// Which side of an action received an effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipient {
    /// The combatant that acted.
    Actor,
    /// The combatant acted upon.
    Target,
}

/// A status effect an action applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectApplication {
    /// Who received it.
    pub recipient: Recipient,
    /// Effect kind; `purify` means the recipient's ledger was cleared.
    pub kind: StatusKind,
    /// Duration given; 0 for purify.
    pub duration: u32,
}

/// Outcome of one [`ActionResolver::perform`](super::ActionResolver::perform).
///
/// `damage` is the life actually removed from the target; heals report the
/// life gained as a negative number, and a failed escape reports the life the
/// actor lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// The action attempted.
    pub action: Action,
    /// Whether it went off.
    pub success: bool,
    /// Life removed from the target (negative: healed on the actor; failed
    /// escape: the actor's own loss).
    pub damage: i32,
    /// Human-readable summary.
    pub message: String,
    /// Presentation hint; `None` for failures other than a failed escape.
    pub effect_tag: Option<EffectTag>,
    /// The actor left the battle.
    pub fled: bool,
    /// How the hit landed.
    pub flags: HitFlags,
    /// Actor's combo count after the action.
    pub combo: u32,
    /// Why it failed, when `success` is false.
    pub failure: Option<FailureReason>,
    /// Status effects applied, in order.
    pub applied_effects: Vec<EffectApplication>,
}

impl ActionResult {
    pub(crate) fn success(action: Action, tag: EffectTag, damage: i32, message: String) -> Self {
        Self {
            action,
            success: true,
            damage,
            message,
            effect_tag: Some(tag),
            fled: false,
            flags: HitFlags::empty(),
            combo: 0,
            failure: None,
            applied_effects: Vec::new(),
        }
    }

    pub(crate) fn failure(action: Action, reason: FailureReason, message: String) -> Self {
        Self {
            action,
            success: false,
            damage: 0,
            message,
            effect_tag: None,
            fled: false,
            flags: HitFlags::empty(),
            combo: 0,
            failure: Some(reason),
            applied_effects: Vec::new(),
        }
    }

    /// True for a critical hit.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.flags.contains(HitFlags::CRITICAL)
    }

    /// True when combo amplification applied.
    #[must_use]
    pub fn is_combo(&self) -> bool {
        self.flags.contains(HitFlags::COMBO)
    }

    /// Effects applied to the target.
    pub fn target_effects(&self) -> impl Iterator<Item = &EffectApplication> {
        self.applied_effects
            .iter()
            .filter(|e| e.recipient == Recipient::Target)
    }
}
