use rand::XorShiftRng;

use crate::cells::{Cartesian2DCoordinate, ItemKind};
use crate::grid::MazeGrid;
use crate::utils;

/// Fraction of eligible corridor cells that receive a coin by default.
/// Gameplay tuning, not a structural constant.
pub const DEFAULT_COIN_DENSITY: f64 = 0.1;

/// Scatter collectible markers of one kind over the maze.
///
/// Eligible cells are corridor cells with at least one open wall (part of the
/// connected maze, which is every corridor cell after generation) that are
/// not on the reference solution path. Keeping items off the canonical route
/// discourages walking the shortest path straight to the exit while keeping
/// every item reachable.
///
/// Places `floor(|eligible| * density)` items by uniform sampling without
/// replacement. Returns the number of items placed.
pub fn scatter_items(grid: &mut MazeGrid,
                     solution_path: &[Cartesian2DCoordinate],
                     kind: ItemKind,
                     density: f64,
                     rng: &mut XorShiftRng)
                     -> usize {
    let mut on_solution = utils::fnv_hashset(solution_path.len());
    on_solution.extend(solution_path.iter().cloned());

    let eligible: Vec<Cartesian2DCoordinate> = grid.iter_corridors()
        .filter(|&coord| grid.walls(coord).any_open() && !on_solution.contains(&coord))
        .collect();

    // Negative densities floor to zero through the saturating float cast;
    // rand::sample caps the amount at the eligible count for density > 1.
    let amount = (eligible.len() as f64 * density).floor() as usize;
    let chosen = rand::sample(rng, eligible, amount);

    for coord in &chosen {
        grid.set_item(*coord, kind);
    }
    chosen.len()
}
