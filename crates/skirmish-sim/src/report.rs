//! Aggregate results of a batch.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use skirmish_core::Side;

use crate::runner::{DuelRecord, DuelResult};

/// Wins and losses of one template across the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TemplateTally {
    pub duels: u64,
    pub wins: u64,
    pub fled: u64,
}

/// Batch summary, printed as text or JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub duels: u64,
    pub left_wins: u64,
    pub right_wins: u64,
    pub fled: u64,
    pub stalemates: u64,
    pub average_rounds: f64,
    pub templates: BTreeMap<&'static str, TemplateTally>,
}

impl Summary {
    pub fn from_records(records: &[DuelRecord]) -> Self {
        let mut summary = Self::default();
        let mut total_rounds = 0u64;

        for record in records {
            summary.duels += 1;
            total_rounds += u64::from(record.rounds);
            summary.templates.entry(record.left).or_default().duels += 1;
            summary.templates.entry(record.right).or_default().duels += 1;

            let name = |side: Side| match side {
                Side::Left => record.left,
                Side::Right => record.right,
            };
            match record.result {
                DuelResult::Won { side } => {
                    match side {
                        Side::Left => summary.left_wins += 1,
                        Side::Right => summary.right_wins += 1,
                    }
                    summary.templates.entry(name(side)).or_default().wins += 1;
                }
                DuelResult::Fled { side } => {
                    summary.fled += 1;
                    summary.templates.entry(name(side)).or_default().fled += 1;
                }
                DuelResult::Stalemate => summary.stalemates += 1,
            }
        }

        if summary.duels > 0 {
            #[allow(clippy::cast_precision_loss)]
            let average = total_rounds as f64 / summary.duels as f64;
            summary.average_rounds = average;
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "duels:          {}", self.duels)?;
        writeln!(f, "left wins:      {}", self.left_wins)?;
        writeln!(f, "right wins:     {}", self.right_wins)?;
        writeln!(f, "fled:           {}", self.fled)?;
        writeln!(f, "stalemates:     {}", self.stalemates)?;
        writeln!(f, "average rounds: {:.2}", self.average_rounds)?;
        writeln!(f)?;
        writeln!(f, "{:<12} {:>7} {:>7} {:>7}", "template", "duels", "wins", "fled")?;
        for (name, tally) in &self.templates {
            writeln!(f, "{name:<12} {:>7} {:>7} {:>7}", tally.duels, tally.wins, tally.fled)?;
        }
        Ok(())
    }
}
