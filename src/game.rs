use itertools::Itertools;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, ItemKind};
use crate::grid::MazeGrid;
use crate::units::{Height, Width};

/// State of a maze run. `Won` is terminal - every move after it is a no-op.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum RunState {
    Active,
    Won,
}

/// Outcome of a single move request. Move acceptance and item pickup are
/// atomic: a request either applies both effects or neither.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct MoveResult {
    pub accepted: bool,
    pub picked_up_item: Option<ItemKind>,
    pub won: bool,
}

impl MoveResult {
    fn rejected(won: bool) -> MoveResult {
        MoveResult {
            accepted: false,
            picked_up_item: None,
            won,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    position: Cartesian2DCoordinate,
    moves_count: u32,
    collected: Vec<ItemKind>,
}

impl Player {
    fn at(position: Cartesian2DCoordinate) -> Player {
        Player {
            position,
            moves_count: 0,
            collected: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> Cartesian2DCoordinate {
        self.position
    }

    #[inline]
    pub fn moves_count(&self) -> u32 {
        self.moves_count
    }

    #[inline]
    pub fn items_collected(&self) -> u32 {
        self.collected.len() as u32
    }

    #[inline]
    pub fn collected(&self) -> &[ItemKind] {
        &self.collected
    }
}

/// Difficulty banding by the longest maze side. The score multiplier is a
/// strictly increasing step function of the tier.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
    Giant,
}

impl SizeTier {
    pub fn for_dimensions(width: Width, height: Height) -> SizeTier {
        match width.0.max(height.0) {
            0..=11 => SizeTier::Small,
            12..=21 => SizeTier::Medium,
            22..=31 => SizeTier::Large,
            _ => SizeTier::Giant,
        }
    }

    pub fn for_grid(grid: &MazeGrid) -> SizeTier {
        SizeTier::for_dimensions(grid.width(), grid.height())
    }

    pub fn multiplier(self) -> u32 {
        match self {
            SizeTier::Small => 1,
            SizeTier::Medium => 2,
            SizeTier::Large => 3,
            SizeTier::Giant => 4,
        }
    }
}

/// Scoring table for a finished run:
///
/// `score = (time_bonus + move_bonus + coin_bonus) * tier multiplier`
///
/// The time and move bonuses start from a ceiling and shed a fixed penalty
/// per second and per move, clamped at zero, so faster and tighter runs
/// always score at least as well. Both the table values and the formula shape
/// are gameplay tuning; swap in a different table rather than editing call
/// sites.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ScoreConfig {
    pub time_bonus_ceiling: u32,
    pub time_penalty_per_second: u32,
    pub move_bonus_ceiling: u32,
    pub penalty_per_move: u32,
    pub per_coin_value: u32,
}

impl Default for ScoreConfig {
    fn default() -> ScoreConfig {
        ScoreConfig {
            time_bonus_ceiling: 1000,
            time_penalty_per_second: 5,
            move_bonus_ceiling: 600,
            penalty_per_move: 2,
            per_coin_value: 25,
        }
    }
}

impl ScoreConfig {
    pub fn time_bonus(&self, elapsed_ms: u64) -> u32 {
        let whole_seconds = (elapsed_ms / 1000).min(u64::from(u32::max_value())) as u32;
        self.time_bonus_ceiling
            .saturating_sub(whole_seconds.saturating_mul(self.time_penalty_per_second))
    }

    pub fn move_bonus(&self, moves_count: u32) -> u32 {
        self.move_bonus_ceiling
            .saturating_sub(moves_count.saturating_mul(self.penalty_per_move))
    }

    pub fn coin_bonus(&self, items_collected: u32) -> u32 {
        items_collected.saturating_mul(self.per_coin_value)
    }

    pub fn compute_score(&self,
                         elapsed_ms: u64,
                         moves_count: u32,
                         items_collected: u32,
                         tier: SizeTier)
                         -> u32 {
        self.time_bonus(elapsed_ms)
            .saturating_add(self.move_bonus(moves_count))
            .saturating_add(self.coin_bonus(items_collected))
            .saturating_mul(tier.multiplier())
    }
}

/// Terminal statistics of a run, handed to the host's `StatsSink`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RunStats {
    pub score: u32,
    pub elapsed_ms: u64,
    pub moves_count: u32,
    pub items_collected: u32,
}

/// Host-side sink for terminal run statistics - a scoreboard, a save file,
/// a network reporter. The engine only pushes, it never reads back.
pub trait StatsSink {
    fn report(&mut self, stats: &RunStats);
}

/// Drives one player run over a generated maze.
///
/// Owns the grid and the reference solution for the lifetime of the run;
/// request a new maze (and a new `Navigator`) rather than resetting one.
/// Move requests arrive one at a time from the host's input handling - the
/// engine is single threaded and never suspends mid-operation.
#[derive(Debug)]
pub struct Navigator {
    grid: MazeGrid,
    solution: Vec<Cartesian2DCoordinate>,
    player: Player,
    state: RunState,
    score_config: ScoreConfig,
}

impl Navigator {
    pub fn new(grid: MazeGrid, solution: Vec<Cartesian2DCoordinate>) -> Navigator {
        Navigator::with_score_config(grid, solution, ScoreConfig::default())
    }

    pub fn with_score_config(grid: MazeGrid,
                             solution: Vec<Cartesian2DCoordinate>,
                             score_config: ScoreConfig)
                             -> Navigator {
        let player = Player::at(grid.entrance());
        // A trivial single cell maze is won before the first move.
        let state = if grid.entrance() == grid.exit() {
            RunState::Won
        } else {
            RunState::Active
        };
        Navigator {
            grid,
            solution,
            player,
            state,
            score_config,
        }
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_won(&self) -> bool {
        self.state == RunState::Won
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    #[inline]
    pub fn solution(&self) -> &[Cartesian2DCoordinate] {
        &self.solution
    }

    /// Try to move the player one corridor cell in the given direction.
    ///
    /// A move is legal iff the wall on the matching face of the player's cell
    /// is absent. Illegal requests are bump-into-wall no-ops: nothing about
    /// the run changes and no error surfaces, only `accepted: false`. A legal
    /// move advances the position, bumps the move counter and collects any
    /// item on the destination in one step; landing on the exit transitions
    /// the run to `Won` exactly once.
    pub fn request_move(&mut self, direction: CompassPrimary) -> MoveResult {
        if self.state == RunState::Won {
            return MoveResult::rejected(true);
        }

        let position = self.player.position;
        if self.grid.has_wall(position, direction) {
            return MoveResult::rejected(false);
        }
        let destination = match self.grid.corridor_neighbour_at(position, direction) {
            Some(coord) => coord,
            // has_wall already reports boundary faces as walled.
            None => return MoveResult::rejected(false),
        };

        self.player.position = destination;
        self.player.moves_count += 1;

        let picked_up_item = self.grid.take_item(destination);
        if let Some(kind) = picked_up_item {
            self.player.collected.push(kind);
        }

        let won = destination == self.grid.exit();
        if won {
            self.state = RunState::Won;
        }

        MoveResult {
            accepted: true,
            picked_up_item,
            won,
        }
    }

    /// Score the run against the host's clock reading.
    pub fn compute_score(&self, elapsed_ms: u64) -> u32 {
        self.score_config.compute_score(elapsed_ms,
                                        self.player.moves_count,
                                        self.player.items_collected(),
                                        SizeTier::for_grid(&self.grid))
    }

    /// Bundle up terminal statistics and push them to the host's sink.
    pub fn report_run(&self, elapsed_ms: u64, sink: &mut dyn StatsSink) -> RunStats {
        let stats = RunStats {
            score: self.compute_score(elapsed_ms),
            elapsed_ms,
            moves_count: self.player.moves_count,
            items_collected: self.player.items_collected(),
        };
        sink.report(&stats);
        stats
    }
}

/// The compass moves that walk `path` cell by cell, or None if any
/// consecutive pair is not a corridor-adjacent step.
pub fn directions_along(path: &[Cartesian2DCoordinate]) -> Option<Vec<CompassPrimary>> {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| direction_between(*a, *b))
        .collect()
}

/// The direction of travel from one corridor cell to an adjacent one.
pub fn direction_between(a: Cartesian2DCoordinate,
                         b: Cartesian2DCoordinate)
                         -> Option<CompassPrimary> {
    CompassPrimary::ALL
        .iter()
        .cloned()
        .find(|&dir| crate::cells::offset_coordinate(a, dir, crate::grid::CORRIDOR_STEP) ==
                     Some(b))
}
