use serde::{Deserialize, Serialize};

use super::validate::{check_range, Validate};
use crate::games::match3::{
    Color, Difficulty, DifficultySettings, ScoringPolicy, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE,
    MIN_BOARD_SIZE, MIN_PALETTE_SIZE, PALETTE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Crossing horizontal and vertical runs of three create an area-burst piece.
    pub area_burst_on_cross: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            area_burst_on_cross: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultySettings,
    pub moderate: DifficultySettings,
    pub hard: DifficultySettings,
}

impl DifficultyTable {
    pub fn settings(&self, difficulty: Difficulty) -> DifficultySettings {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Moderate => self.moderate,
            Difficulty::Hard => self.hard,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultySettings::new(50, 300),
            moderate: DifficultySettings::new(30, 500),
            hard: DifficultySettings::new(20, 700),
        }
    }
}

impl Validate for DifficultyTable {
    fn validate(&self) -> Result<(), String> {
        for (name, settings) in [
            ("easy", self.easy),
            ("moderate", self.moderate),
            ("hard", self.hard),
        ] {
            if settings.moves_allowed == 0 {
                return Err(format!("Difficulty {} must allow at least one move", name));
            }
            if settings.target_score == 0 {
                return Err(format!("Difficulty {} must have a positive target score", name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    pub palette_size: usize,
    pub rules: MatchRules,
    pub scoring: ScoringPolicy,
    pub difficulties: DifficultyTable,
}

impl GameConfig {
    /// Leading slice of the palette; out-of-range sizes are clamped.
    pub fn palette(&self) -> &'static [Color] {
        let size = self.palette_size.clamp(MIN_PALETTE_SIZE, PALETTE.len());
        &PALETTE[..size]
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            palette_size: PALETTE.len(),
            rules: MatchRules::default(),
            scoring: ScoringPolicy::default(),
            difficulties: DifficultyTable::default(),
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        check_range("Board size", self.board_size, MIN_BOARD_SIZE, MAX_BOARD_SIZE)?;
        check_range("Palette size", self.palette_size, MIN_PALETTE_SIZE, PALETTE.len())?;
        self.scoring.validate()?;
        self.difficulties.validate()
    }
}
