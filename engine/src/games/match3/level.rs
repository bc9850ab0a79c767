use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::cascade::{CascadeEngine, Resolution};
use super::hint::{find_valid_swap, has_moves};
use super::piece_factory::generate;
use super::types::{Color, Position};
use crate::config::{GameConfig, Validate};
use crate::games::SessionRng;
use crate::log;

const MAX_RESHUFFLE_ATTEMPTS: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" => Ok(Difficulty::Moderate),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub moves_allowed: u32,
    pub target_score: u32,
}

impl DifficultySettings {
    pub const fn new(moves_allowed: u32, target_score: u32) -> Self {
        Self {
            moves_allowed,
            target_score,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LevelEvent {
    BoardReshuffled,
    /// No playable board could be generated; the level ends as lost.
    ReshuffleFailed { attempts: u32 },
    StatusChanged { status: GameStatus, score: u32 },
}

/// One level of play: a board, the engine that resolves it and the move budget
/// of the chosen difficulty.
pub struct LevelSession {
    board: Board,
    engine: CascadeEngine,
    rng: SessionRng,
    palette: &'static [Color],
    difficulty: Difficulty,
    settings: DifficultySettings,
    score: u32,
    moves_left: u32,
    moves_made: u32,
    status: GameStatus,
    max_reshuffles: u32,
    pending_events: Vec<LevelEvent>,
}

impl LevelSession {
    pub fn new(difficulty: Difficulty, config: &GameConfig, seed: Option<u64>) -> Result<Self, String> {
        config.validate()?;
        let mut rng = SessionRng::from_optional_seed(seed);
        let board = generate(config.board_size, config.palette(), &mut rng);
        Self::with_board(difficulty, config, board, rng)
    }

    fn with_board(
        difficulty: Difficulty,
        config: &GameConfig,
        board: Board,
        rng: SessionRng,
    ) -> Result<Self, String> {
        let settings = config.difficulties.settings(difficulty);
        let mut session = Self {
            board,
            engine: CascadeEngine::from_config(config),
            rng,
            palette: config.palette(),
            difficulty,
            settings,
            score: 0,
            moves_left: settings.moves_allowed,
            moves_made: 0,
            status: GameStatus::InProgress,
            max_reshuffles: MAX_RESHUFFLE_ATTEMPTS,
            pending_events: Vec::new(),
        };
        session.ensure_playable()?;
        log!(
            "Level started: difficulty={}, seed={}, moves={}, target={}",
            difficulty,
            session.rng.seed(),
            settings.moves_allowed,
            settings.target_score
        );
        Ok(session)
    }

    pub fn swap(&mut self, a: Position, b: Position) -> Result<Resolution, String> {
        self.check_in_progress()?;
        let resolution = self.engine.request_swap(&mut self.board, a, b, &mut self.rng)?;
        self.record(&resolution);
        Ok(resolution)
    }

    pub fn activate(&mut self, pos: Position) -> Result<Resolution, String> {
        self.check_in_progress()?;
        let resolution = self.engine.request_activate(&mut self.board, pos, &mut self.rng)?;
        self.record(&resolution);
        Ok(resolution)
    }

    pub fn hint(&self) -> Option<(Position, Position)> {
        find_valid_swap(&self.board)
    }

    pub fn take_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> DifficultySettings {
        self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    fn check_in_progress(&self) -> Result<(), String> {
        if self.status != GameStatus::InProgress {
            return Err(format!("Level is over ({:?}), no further actions accepted", self.status));
        }
        Ok(())
    }

    /// Applies an accepted resolution to the move budget and score. The
    /// resolution has already changed the board, so a failed reshuffle ends
    /// the level instead of failing the action.
    fn record(&mut self, resolution: &Resolution) {
        if !resolution.accepted {
            return;
        }
        self.moves_left = self.moves_left.saturating_sub(1);
        self.moves_made += 1;
        self.score = self.score.saturating_add(resolution.score_delta);
        self.update_status();
        if self.status == GameStatus::InProgress {
            self.keep_playable();
        }
    }

    fn keep_playable(&mut self) {
        if let Err(e) = self.ensure_playable() {
            log!("{}", e);
            self.pending_events.push(LevelEvent::ReshuffleFailed {
                attempts: self.max_reshuffles,
            });
            self.set_status(GameStatus::Lost);
        }
    }

    fn update_status(&mut self) {
        let status = if self.score >= self.settings.target_score {
            GameStatus::Won
        } else if self.moves_left == 0 {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        };
        self.set_status(status);
    }

    fn set_status(&mut self, status: GameStatus) {
        if status == self.status {
            return;
        }
        self.status = status;
        self.pending_events.push(LevelEvent::StatusChanged {
            status,
            score: self.score,
        });
        log!(
            "Level finished: {:?} with score {}/{} after {} moves",
            status,
            self.score,
            self.settings.target_score,
            self.moves_made
        );
    }

    /// Regenerates a board that offers neither a swap nor a special to trigger.
    fn ensure_playable(&mut self) -> Result<(), String> {
        let mut attempts = 0;
        while !has_moves(&self.board) {
            if attempts == self.max_reshuffles {
                return Err(format!("No playable board after {} reshuffles", attempts));
            }
            attempts += 1;
            self.board = generate(self.board.size(), self.palette, &mut self.rng);
            self.pending_events.push(LevelEvent::BoardReshuffled);
        }
        if attempts > 0 {
            log!("Board reshuffled after {} attempt(s)", attempts);
        }
        Ok(())
    }
}
