mod board;
mod campaign;
mod cascade;
mod hint;
mod level;
mod match_detector;
mod piece_factory;
mod scoring;
mod special_effects;
mod types;

pub use board::{Board, CellSet};
pub use campaign::{Campaign, CampaignEvent};
pub use cascade::{CascadeEngine, EnginePhase, Resolution};
pub use hint::{find_activatable, find_valid_swap, has_moves, swap_is_accepted};
pub use level::{Difficulty, DifficultySettings, GameStatus, LevelEvent, LevelSession};
pub use match_detector::{creation_for_run, find_cross_creations, find_matches, MatchScan};
pub use piece_factory::{generate, new_board, next_color, refill};
pub use scoring::ScoringPolicy;
pub use special_effects::{activate, combine, combo_effect, Combination};
pub use types::{
    Axis, Color, ComboEffect, Match, Piece, PieceId, PieceMove, Position, RejectReason,
    ResolutionEvent, SpecialCreationRequest, SpecialKind, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE,
    MIN_BOARD_SIZE, MIN_PALETTE_SIZE, MIN_RUN_LENGTH, PALETTE,
};
