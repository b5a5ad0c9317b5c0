use bit_set::BitSet;
use rand::{Rng, XorShiftRng};

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec};
use crate::grid::MazeGrid;
use crate::pathing;
use crate::units::{Height, Width};

/// Apply the randomized recursive backtracker algorithm to a grid.
///
/// This is a randomized depth-first spanning tree construction over the
/// corridor sublattice, run with an explicit stack so that large mazes cannot
/// exhaust the call stack. Starting from the entrance, the walk repeatedly
/// carves into a uniformly chosen unvisited corridor neighbour two lattice
/// units away, marking the wall position in between as carved through, and
/// pops the stack to backtrack when boxed in.
///
/// Every wall removal connects a previously unvisited cell, so each removal
/// adds exactly one tree edge and can never close a cycle: the finished maze
/// is perfect - connected, acyclic, exactly one route between any two cells.
pub fn recursive_backtracker(grid: &mut MazeGrid, rng: &mut XorShiftRng) {
    let mut visited = BitSet::with_capacity(grid.size());

    let mut current = grid.entrance();
    mark_visited(&mut visited, grid, current);
    let mut stack: Vec<Cartesian2DCoordinate> = Vec::with_capacity(grid.corridor_count());

    loop {
        let unvisited_neighbours: CoordinateSmallVec = grid.corridor_neighbours(current)
            .iter()
            .cloned()
            .filter(|&neighbour| {
                grid.grid_coordinate_to_index(neighbour)
                    .map_or(false, |index| !visited.contains(index))
            })
            .collect();

        if unvisited_neighbours.is_empty() {
            match stack.pop() {
                Some(previous) => current = previous,
                None => break,
            }
        } else {
            let chosen = unvisited_neighbours[rng.gen::<usize>() % unvisited_neighbours.len()];

            grid.remove_wall_between(current, chosen)
                .expect("corridor neighbours are always valid to link");
            mark_visited(&mut visited, grid, wall_position_between(current, chosen));
            mark_visited(&mut visited, grid, chosen);

            stack.push(current);
            current = chosen;
        }
    }
}

/// Build a perfect maze of the given size and solve it once.
///
/// Dimensions are normalised up to the next odd size by the grid itself.
/// Returns the maze and the reference solution from entrance to exit; the
/// spanning tree guarantee means the solve step cannot come back empty.
pub fn generate_maze(width: Width,
                     height: Height,
                     rng: &mut XorShiftRng)
                     -> (MazeGrid, Vec<Cartesian2DCoordinate>) {
    let mut grid = MazeGrid::new(width, height);
    recursive_backtracker(&mut grid, rng);

    let solution = pathing::find_path(&grid, grid.entrance(), grid.exit());
    debug_assert!(!solution.is_empty(),
                  "a freshly generated maze always connects entrance to exit");
    (grid, solution)
}

#[inline]
fn mark_visited(visited: &mut BitSet, grid: &MazeGrid, coord: Cartesian2DCoordinate) {
    if let Some(index) = grid.grid_coordinate_to_index(coord) {
        visited.insert(index);
    }
}

/// The odd-coordinate wall position midway between two corridor cells.
fn wall_position_between(a: Cartesian2DCoordinate,
                         b: Cartesian2DCoordinate)
                         -> Cartesian2DCoordinate {
    Cartesian2DCoordinate::new((a.x + b.x) / 2, (a.y + b.y) / 2)
}

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;
    use rand::{SeedableRng, XorShiftRng};

    use super::*;
    use crate::pathing::Distances;
    use crate::units::{Height, Width};

    fn test_rng(seed: u32) -> XorShiftRng {
        XorShiftRng::from_seed([seed | 1, seed ^ 0xdead_beef, seed ^ 0x1234_5678, 0x9abc_def0])
    }

    fn generated(w: usize, h: usize, seed: u32) -> MazeGrid {
        let mut rng = test_rng(seed);
        let mut grid = MazeGrid::new(Width(w), Height(h));
        recursive_backtracker(&mut grid, &mut rng);
        grid
    }

    #[test]
    fn every_corridor_cell_is_reachable_from_the_entrance() {
        let grid = generated(21, 21, 7);
        let distances = Distances::new(&grid, grid.entrance()).unwrap();
        assert_eq!(distances.reached_count(), grid.corridor_count());
    }

    #[test]
    fn spanning_tree_edge_count() {
        // Acyclic and connected: open wall pairs == corridor cells - 1.
        let grid = generated(21, 21, 8);
        assert_eq!(grid.passages_count(), grid.corridor_count() - 1);
    }

    #[test]
    fn walls_are_mirrored_after_generation() {
        let grid = generated(11, 11, 9);
        for coord in grid.iter_corridors() {
            for &dir in &crate::cells::CompassPrimary::ALL {
                if let Some(neighbour) = grid.corridor_neighbour_at(coord, dir) {
                    assert_eq!(grid.has_wall(coord, dir),
                               grid.has_wall(neighbour, dir.opposite()));
                }
            }
        }
    }

    #[test]
    fn single_cell_maze_degrades_trivially() {
        let grid = generated(1, 1, 10);
        assert_eq!(grid.passages_count(), 0);
        assert_eq!(grid.entrance(), grid.exit());
    }

    #[test]
    fn generate_maze_returns_the_entrance_to_exit_solution() {
        let mut rng = test_rng(11);
        let (grid, solution) = generate_maze(Width(11), Height(11), &mut rng);
        assert_eq!(solution.first().cloned(), Some(grid.entrance()));
        assert_eq!(solution.last().cloned(), Some(grid.exit()));
        // Consecutive solution cells are joined by open passages.
        for pair in solution.windows(2) {
            assert!(grid.is_passage_open(pair[0], pair[1]));
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generated(11, 11, 99);
        let b = generated(11, 11, 99);
        for coord in a.iter_corridors() {
            assert_eq!(a.walls(coord), b.walls(coord));
        }
    }

    #[test]
    fn quickcheck_generated_mazes_are_perfect() {
        fn prop(seed: u32, w: u8, h: u8) -> bool {
            let mut rng = test_rng(seed);
            let mut grid = MazeGrid::new(Width(w as usize % 24), Height(h as usize % 24));
            recursive_backtracker(&mut grid, &mut rng);

            let distances = Distances::new(&grid, grid.entrance()).unwrap();
            let connected = distances.reached_count() == grid.corridor_count();
            let tree_edges = grid.passages_count() == grid.corridor_count() - 1;
            connected && tree_edges
        }
        quickcheck(prop as fn(u32, u8, u8) -> bool);
    }
}
