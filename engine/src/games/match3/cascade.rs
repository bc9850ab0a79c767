use super::board::{Board, CellSet};
use super::match_detector::{find_cross_creations, find_matches, MatchScan};
use super::piece_factory::refill;
use super::scoring::ScoringPolicy;
use super::special_effects::{activate, combine};
use super::types::{
    Color, Position, RejectReason, ResolutionEvent, SpecialCreationRequest, PALETTE,
};
use crate::config::{GameConfig, MatchRules};
use crate::games::SessionRng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnginePhase {
    Idle,
    Validating,
    Resolving,
    Dropping,
    Refilling,
}

/// Outcome of a request or of a single cascade step.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub accepted: bool,
    pub events: Vec<ResolutionEvent>,
    pub score_delta: u32,
}

impl Resolution {
    fn rejected(reason: RejectReason) -> Self {
        Self {
            accepted: false,
            events: vec![ResolutionEvent::Rejected { reason }],
            score_delta: 0,
        }
    }

    fn started() -> Self {
        Self {
            accepted: true,
            events: Vec::new(),
            score_delta: 0,
        }
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        self.events.iter().find_map(|event| match event {
            ResolutionEvent::Rejected { reason } => Some(*reason),
            _ => None,
        })
    }

    pub fn cascades(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|event| match event {
            ResolutionEvent::BoardSettled { cascades } => Some(*cascades),
            _ => None,
        })
    }

    fn absorb(&mut self, step: Resolution) {
        self.events.extend(step.events);
        self.score_delta = self.score_delta.saturating_add(step.score_delta);
    }
}

/// Cells to clear in the next Resolving phase, plus the events that explain them.
struct PendingClear {
    cleared: CellSet,
    creations: Vec<SpecialCreationRequest>,
    events: Vec<ResolutionEvent>,
}

/// Runs resolution cycles against a caller-owned board. A cycle may be driven
/// to completion with `request_*`, or started with `begin_*` and advanced one
/// cascade at a time with [`CascadeEngine::step`]; new requests are rejected
/// until the board settles.
pub struct CascadeEngine {
    palette: Vec<Color>,
    scoring: ScoringPolicy,
    rules: MatchRules,
    phase: EnginePhase,
    pending: Option<PendingClear>,
    cascades: u32,
}

impl Default for CascadeEngine {
    fn default() -> Self {
        Self::new(&PALETTE, ScoringPolicy::default(), MatchRules::default())
    }
}

impl CascadeEngine {
    pub fn new(palette: &[Color], scoring: ScoringPolicy, rules: MatchRules) -> Self {
        Self {
            palette: palette.to_vec(),
            scoring,
            rules,
            phase: EnginePhase::Idle,
            pending: None,
            cascades: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.palette(), config.scoring, config.rules)
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != EnginePhase::Idle
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn request_swap(
        &mut self,
        board: &mut Board,
        a: Position,
        b: Position,
        rng: &mut SessionRng,
    ) -> Result<Resolution, String> {
        let mut resolution = self.begin_swap(board, a, b)?;
        if resolution.accepted {
            self.settle(board, rng, &mut resolution)?;
        }
        Ok(resolution)
    }

    pub fn request_activate(
        &mut self,
        board: &mut Board,
        pos: Position,
        rng: &mut SessionRng,
    ) -> Result<Resolution, String> {
        let mut resolution = self.begin_activate(board, pos)?;
        if resolution.accepted {
            self.settle(board, rng, &mut resolution)?;
        }
        Ok(resolution)
    }

    /// Validates and commits a swap of `a` (the selected piece) into `b`.
    /// Out-of-bounds positions are a caller error; every other refusal is a
    /// normal rejected resolution that leaves the board untouched.
    pub fn begin_swap(
        &mut self,
        board: &mut Board,
        a: Position,
        b: Position,
    ) -> Result<Resolution, String> {
        board.check_position(a)?;
        board.check_position(b)?;
        if self.is_busy() {
            return Ok(Resolution::rejected(RejectReason::Busy));
        }
        if !a.is_adjacent(b) {
            return Ok(Resolution::rejected(RejectReason::NotAdjacent));
        }

        self.phase = EnginePhase::Validating;
        let mut scratch = board.clone();
        scratch.swap(a, b);

        let scan = find_matches(&scratch);
        if !scan.is_empty() {
            *board = scratch;
            let pending = self.clear_matches(board, &scan);
            self.start(pending);
            return Ok(Resolution::started());
        }

        let combination = match (scratch.get(b), scratch.get(a)) {
            (Some(moved), Some(other)) => combine(moved, other, &scratch),
            _ => None,
        };
        let Some(combination) = combination else {
            self.phase = EnginePhase::Idle;
            return Ok(Resolution::rejected(RejectReason::NoMatch));
        };

        *board = scratch;
        let mut cleared = CellSet::new(board.size());
        cleared.extend(combination.cleared.iter().copied());
        self.start(PendingClear {
            cleared,
            creations: Vec::new(),
            events: vec![ResolutionEvent::Combo {
                first: b,
                second: a,
                effect: combination.effect,
                affected: combination.cleared,
            }],
        });
        Ok(Resolution::started())
    }

    pub fn begin_activate(&mut self, board: &mut Board, pos: Position) -> Result<Resolution, String> {
        board.check_position(pos)?;
        if self.is_busy() {
            return Ok(Resolution::rejected(RejectReason::Busy));
        }

        let piece = match board.get(pos) {
            Some(piece) if piece.is_special() => *piece,
            _ => return Ok(Resolution::rejected(RejectReason::NotSpecial)),
        };

        let affected = activate(&piece, board);
        let mut cleared = CellSet::new(board.size());
        cleared.extend(affected.iter().copied());
        self.start(PendingClear {
            cleared,
            creations: Vec::new(),
            events: vec![ResolutionEvent::SpecialActivated {
                position: pos,
                kind: piece.special,
                affected,
            }],
        });
        Ok(Resolution::started())
    }

    /// Runs one Resolving → Dropping → Refilling pass and re-scans the board.
    pub fn step(&mut self, board: &mut Board, rng: &mut SessionRng) -> Result<Resolution, String> {
        if self.phase != EnginePhase::Resolving {
            return Err(format!("No resolution in progress (phase {:?})", self.phase));
        }
        let Some(pending) = self.pending.take() else {
            self.phase = EnginePhase::Idle;
            return Err("Resolution state lost between steps".to_string());
        };

        let mut events = pending.events;

        let upgrades = claim_creations(board, &pending.creations);
        let mut cleared = pending.cleared;
        for request in &upgrades {
            cleared.remove(request.position);
        }
        for pos in cleared.to_positions() {
            board.take(pos);
        }
        for request in &upgrades {
            board.set_special(request.position, request.kind);
            events.push(ResolutionEvent::SpecialCreated {
                position: request.position,
                kind: request.kind,
            });
        }

        self.phase = EnginePhase::Dropping;
        let moves = board.collapse_columns();
        if !moves.is_empty() {
            events.push(ResolutionEvent::Dropped { moves });
        }

        self.phase = EnginePhase::Refilling;
        let spawned = refill(board, &self.palette, rng);
        if !spawned.is_empty() {
            events.push(ResolutionEvent::Refilled { pieces: spawned });
        }

        self.cascades += 1;
        let scan = find_matches(board);
        if scan.is_empty() {
            self.phase = EnginePhase::Idle;
            events.push(ResolutionEvent::BoardSettled {
                cascades: self.cascades,
            });
        } else {
            let pending = self.clear_matches(board, &scan);
            self.pending = Some(pending);
            self.phase = EnginePhase::Resolving;
        }

        let score_delta = self.scoring.total(&events);
        Ok(Resolution {
            accepted: true,
            events,
            score_delta,
        })
    }

    fn settle(
        &mut self,
        board: &mut Board,
        rng: &mut SessionRng,
        resolution: &mut Resolution,
    ) -> Result<(), String> {
        while self.is_busy() {
            let step = self.step(board, rng)?;
            resolution.absorb(step);
        }
        Ok(())
    }

    fn start(&mut self, pending: PendingClear) {
        self.pending = Some(pending);
        self.cascades = 0;
        self.phase = EnginePhase::Resolving;
    }

    fn clear_matches(&self, board: &Board, scan: &MatchScan) -> PendingClear {
        let cleared = scan.cleared_positions(board.size());
        let pieces = cleared
            .to_positions()
            .into_iter()
            .filter_map(|pos| board.get(pos).copied())
            .collect();

        let mut creations = scan.creations.clone();
        if self.rules.area_burst_on_cross {
            creations.extend(find_cross_creations(scan));
        }

        PendingClear {
            cleared,
            creations,
            events: vec![ResolutionEvent::Matched { pieces }],
        }
    }
}

/// Requests whose anchor still holds a piece of the run's colour; the first
/// request for a cell wins and later ones are dropped.
fn claim_creations(board: &Board, requests: &[SpecialCreationRequest]) -> Vec<SpecialCreationRequest> {
    let mut claimed: Vec<SpecialCreationRequest> = Vec::new();
    for request in requests {
        let holds_run_color = board
            .get(request.position)
            .is_some_and(|piece| piece.color == request.color);
        if !holds_run_color || claimed.iter().any(|c| c.position == request.position) {
            continue;
        }
        claimed.push(*request);
    }
    claimed
}
