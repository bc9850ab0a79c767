use serde::{Deserialize, Serialize};

use super::types::ResolutionEvent;
use crate::config::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub points_per_piece: u32,
    pub creation_bonus: u32,
    pub activation_base: u32,
    pub activation_bonus_per_piece: u32,
    pub combination_base: u32,
    /// Completing level `n` of a campaign adds `n * level_bonus` to the total.
    pub level_bonus: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            points_per_piece: 10,
            creation_bonus: 50,
            activation_base: 100,
            activation_bonus_per_piece: 5,
            combination_base: 200,
            level_bonus: 100,
        }
    }
}

impl ScoringPolicy {
    /// Points for one event; bookkeeping events (drops, refills, rejections) score nothing.
    pub fn score(&self, event: &ResolutionEvent) -> u32 {
        match event {
            ResolutionEvent::Matched { pieces } => {
                self.points_per_piece.saturating_mul(count(pieces.len()))
            }
            ResolutionEvent::SpecialCreated { .. } => self.creation_bonus,
            ResolutionEvent::SpecialActivated { affected, .. } => {
                let bonus = self.activation_bonus_per_piece.saturating_mul(count(affected.len()));
                self.activation_base.saturating_add(bonus)
            }
            ResolutionEvent::Combo { .. } => self.combination_base,
            ResolutionEvent::Rejected { .. }
            | ResolutionEvent::Dropped { .. }
            | ResolutionEvent::Refilled { .. }
            | ResolutionEvent::BoardSettled { .. } => 0,
        }
    }

    pub fn level_completion_bonus(&self, level: u32) -> u32 {
        self.level_bonus.saturating_mul(level)
    }

    /// Sum of event scores, capped at `u32::MAX`.
    pub fn total<'a>(&self, events: impl IntoIterator<Item = &'a ResolutionEvent>) -> u32 {
        events
            .into_iter()
            .fold(0, |sum: u32, event| sum.saturating_add(self.score(event)))
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl Validate for ScoringPolicy {
    fn validate(&self) -> Result<(), String> {
        if self.points_per_piece == 0 {
            return Err("Points per piece must be positive".to_string());
        }
        if self.combination_base <= self.activation_base {
            return Err(format!(
                "Combination base ({}) must be higher than activation base ({})",
                self.combination_base, self.activation_base
            ));
        }
        Ok(())
    }
}
