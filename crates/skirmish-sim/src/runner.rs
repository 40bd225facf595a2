//! Parallel duel execution.
//!
//! Each duel is independent: it owns its two combatants and a [`DuelRng`]
//! seeded from the master seed and the duel index, so the batch produces the
//! same records whatever order rayon schedules the duels in.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use anyhow::{anyhow, Result};
use rayon::prelude::*;
use serde::Serialize;
use skirmish_core::dice::{seeded, Dice, DuelRng};
use skirmish_core::templates::{self, CharacterTemplate, TEMPLATES};
use skirmish_core::{BattleSession, CombatRules, CombatantId, EndReason, Millis, Side};

/// Simulated time between two consecutive turns.
const TURN_GAP_MS: u64 = 800;

// =============================================================================
// Configuration
// =============================================================================

/// Which templates meet; `None` draws a random template per duel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matchup {
    pub left: Option<&'static CharacterTemplate>,
    pub right: Option<&'static CharacterTemplate>,
}

impl Matchup {
    /// Looks both template names up.
    pub fn resolve(left: Option<&str>, right: Option<&str>) -> Result<Self> {
        Ok(Self {
            left: left.map(lookup).transpose()?,
            right: right.map(lookup).transpose()?,
        })
    }

    fn draw(slot: Option<&'static CharacterTemplate>, dice: &mut dyn Dice) -> &'static CharacterTemplate {
        slot.unwrap_or_else(|| &TEMPLATES[dice.pick(TEMPLATES.len())])
    }
}

fn lookup(name: &str) -> Result<&'static CharacterTemplate> {
    templates::find(name).ok_or_else(|| {
        let known: Vec<_> = TEMPLATES.iter().map(|t| t.name).collect();
        anyhow!("unknown template `{name}` (expected one of {})", known.join(", "))
    })
}

/// Everything a batch needs.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub master_seed: u64,
    pub duels: u64,
    pub max_rounds: u32,
    pub rules: CombatRules,
    pub matchup: Matchup,
}

// =============================================================================
// Records
// =============================================================================

/// How a single duel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DuelResult {
    Won { side: Side },
    Fled { side: Side },
    Stalemate,
}

/// One played duel.
#[derive(Debug, Clone, Serialize)]
pub struct DuelRecord {
    pub index: u64,
    pub seed: u64,
    pub left: &'static str,
    pub right: &'static str,
    pub result: DuelResult,
    pub rounds: u32,
}

// =============================================================================
// Execution
// =============================================================================

/// Seed of duel `index`, derived from the master seed.
pub fn duel_seed(master_seed: u64, index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    master_seed.hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

/// Plays duel `index` to completion or stalemate.
pub fn run_duel(config: &BatchConfig, index: u64) -> Result<DuelRecord> {
    let seed = duel_seed(config.master_seed, index);
    let mut rng: DuelRng = seeded(seed);

    let left = Matchup::draw(config.matchup.left, &mut rng);
    let right = Matchup::draw(config.matchup.right, &mut rng);
    let session = BattleSession::start(
        left.spawn(CombatantId::new(1), &mut rng),
        right.spawn(CombatantId::new(2), &mut rng),
        None,
        config.rules.clone(),
    )?;

    let (result, rounds) = play(session, &mut rng, config.max_rounds)?;
    tracing::debug!(index, seed, left = left.name, right = right.name, ?result, rounds, "duel finished");

    Ok(DuelRecord {
        index,
        seed,
        left: left.name,
        right: right.name,
        result,
        rounds,
    })
}

fn play(mut session: BattleSession, rng: &mut DuelRng, max_rounds: u32) -> Result<(DuelResult, u32)> {
    let mut now = Millis::ZERO;
    while !session.is_over() {
        if session.round() > max_rounds {
            return Ok((DuelResult::Stalemate, max_rounds));
        }
        session.auto_step(rng, now)?;
        now = now.plus(TURN_GAP_MS);
    }

    let outcome = session
        .outcome()
        .ok_or_else(|| anyhow!("finished duel has no outcome"))?;
    let result = match outcome.reason {
        EndReason::Victory { winner } => DuelResult::Won { side: winner },
        EndReason::Fled { side } => DuelResult::Fled { side },
    };
    Ok((result, outcome.rounds))
}

/// Plays every duel of the batch in parallel, returned in index order.
pub fn run_batch(config: &BatchConfig) -> Result<Vec<DuelRecord>> {
    (0..config.duels)
        .into_par_iter()
        .map(|index| run_duel(config, index))
        .collect()
}
