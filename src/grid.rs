use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};
use std::fmt;
use std::rc::Rc;
use std::slice;

use crate::cells::{offset_coordinate, Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec,
                   ItemKind, Walls};
use crate::grid_displays::GridDisplay;
use crate::units::{EdgesCount, Height, NodesCount, Width};

/// Lattice distance between two adjacent corridor cells. Corridor cells sit at
/// even coordinates, the odd coordinates between them are the wall positions
/// that `remove_wall_between` carves through.
pub const CORRIDOR_STEP: u32 = 2;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
}

/// A rectangular maze on a skip-2 lattice.
///
/// The grid is backed by an undirected graph with one node per lattice cell.
/// An edge between two corridor cells means the mirrored wall pair between
/// them is open, so the wall-mirroring invariant holds by construction: both
/// cells' facing wall flags are derived from the same edge.
///
/// Requested dimensions are normalised up to the next odd size (minimum 1)
/// rather than rejected - the engine always produces a playable maze.
pub struct MazeGrid {
    graph: Graph<(), (), Undirected>,
    width: Width,
    height: Height,
    items: Vec<Option<ItemKind>>,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

impl fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "MazeGrid :: width: {:?}, height: {:?}, open passages: {:?}",
               self.width,
               self.height,
               self.graph.edge_count())
    }
}

impl MazeGrid {
    pub fn new(width: Width, height: Height) -> MazeGrid {
        let width = Width(next_odd(width.0));
        let height = Height(next_odd(height.0));
        let (NodesCount(nodes), EdgesCount(edges)) = graph_size(width, height);

        let mut grid = MazeGrid {
            graph: Graph::with_capacity(nodes, edges),
            width,
            height,
            items: vec![None; nodes],
            grid_display: None,
        };
        for _ in 0..nodes {
            let _ = grid.graph.add_node(());
        }

        grid
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    /// Total lattice cell count, corridor and wall positions included.
    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0
    }

    /// Number of corridor cells - the traversable rooms of the maze.
    #[inline]
    pub fn corridor_count(&self) -> usize {
        ((self.width.0 + 1) / 2) * ((self.height.0 + 1) / 2)
    }

    #[inline]
    pub fn entrance(&self) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(0, 0)
    }

    #[inline]
    pub fn exit(&self) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(self.width.0 as u32 - 1, self.height.0 as u32 - 1)
    }

    /// Number of open wall pairs. A perfect maze has `corridor_count() - 1`.
    #[inline]
    pub fn passages_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    /// Is the grid coordinate within the grid's dimensions?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Is the coordinate a corridor cell - in bounds and on the even sublattice?
    #[inline]
    pub fn is_corridor(&self, coord: Cartesian2DCoordinate) -> bool {
        self.is_valid_coordinate(coord) && coord.x % 2 == 0 && coord.y % 2 == 0
    }

    /// Open the mirrored wall pair between two corridor cells.
    ///
    /// The cells must be exactly `CORRIDOR_STEP` apart on one axis. That is a
    /// precondition of the skip-2 lattice, not a runtime condition - breaking
    /// it is a caller bug.
    pub fn remove_wall_between(&mut self,
                               a: Cartesian2DCoordinate,
                               b: Cartesian2DCoordinate)
                               -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        if !self.is_corridor(a) || !self.is_corridor(b) {
            return Err(CellLinkError::InvalidGridCoordinate);
        }
        debug_assert!(is_corridor_pair(a, b),
                      "remove_wall_between requires corridor cells exactly {} apart on one axis: {:?} {:?}",
                      CORRIDOR_STEP,
                      a,
                      b);

        let a_index = self.graph_index(a).ok_or(CellLinkError::InvalidGridCoordinate)?;
        let b_index = self.graph_index(b).ok_or(CellLinkError::InvalidGridCoordinate)?;
        let _ = self.graph.update_edge(a_index, b_index, ());
        Ok(())
    }

    /// Are two corridor cells joined by an open passage?
    pub fn is_passage_open(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.graph_index(a);
        let b_index_opt = self.graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    /// Is there a wall on the given face of this cell?
    ///
    /// The maze boundary always counts as walled.
    pub fn has_wall(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        match self.corridor_neighbour_at(coord, direction) {
            Some(neighbour) => !self.is_passage_open(coord, neighbour),
            None => true,
        }
    }

    /// Snapshot of all four wall faces of a corridor cell.
    pub fn walls(&self, coord: Cartesian2DCoordinate) -> Walls {
        Walls {
            north: self.has_wall(coord, CompassPrimary::North),
            south: self.has_wall(coord, CompassPrimary::South),
            east: self.has_wall(coord, CompassPrimary::East),
            west: self.has_wall(coord, CompassPrimary::West),
        }
    }

    /// Corridor cells joined to `coord` by an open passage.
    pub fn passages(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        if let Some(graph_node_index) = self.graph_index(coord) {
            self.graph
                .neighbors(graph_node_index)
                .map(|node_index| self.coordinate_from_index(node_index.index()))
                .collect()
        } else {
            CoordinateSmallVec::new()
        }
    }

    /// The in-bounds corridor cell `CORRIDOR_STEP` away in the given direction,
    /// whether or not a wall separates them.
    pub fn corridor_neighbour_at(&self,
                                 coord: Cartesian2DCoordinate,
                                 direction: CompassPrimary)
                                 -> Option<Cartesian2DCoordinate> {
        offset_coordinate(coord, direction, CORRIDOR_STEP)
            .filter(|&neighbour| self.is_valid_coordinate(neighbour))
    }

    /// Up to four in-bounds corridor neighbours of a corridor cell.
    pub fn corridor_neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|&dir| self.corridor_neighbour_at(coord, dir))
            .collect()
    }

    /// Convert a grid coordinate to a one dimensional row-major index in the
    /// range 0..grid.size(). Returns None if the coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    fn coordinate_from_index(&self, index: usize) -> Cartesian2DCoordinate {
        let x = index % self.width.0;
        let y = index / self.width.0;
        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    /// The item tag on a cell, if any.
    pub fn item_at(&self, coord: Cartesian2DCoordinate) -> Option<ItemKind> {
        self.grid_coordinate_to_index(coord).and_then(|i| self.items[i])
    }

    /// Tag a corridor cell with an item. Returns false if the coordinate is
    /// not a corridor cell.
    pub fn set_item(&mut self, coord: Cartesian2DCoordinate, kind: ItemKind) -> bool {
        if !self.is_corridor(coord) {
            return false;
        }
        if let Some(i) = self.grid_coordinate_to_index(coord) {
            self.items[i] = Some(kind);
            true
        } else {
            false
        }
    }

    /// Remove and return the item tag on a cell - collecting it.
    pub fn take_item(&mut self, coord: Cartesian2DCoordinate) -> Option<ItemKind> {
        self.grid_coordinate_to_index(coord).and_then(|i| self.items[i].take())
    }

    pub fn items_count(&self) -> usize {
        self.items.iter().filter(|tag| tag.is_some()).count()
    }

    /// Row-major iterator over the corridor cells only.
    pub fn iter_corridors(&self) -> CorridorIter {
        CorridorIter {
            corridor_columns: (self.width.0 + 1) / 2,
            corridor_count: self.corridor_count(),
            current: 0,
        }
    }

    /// Iterator over every open wall pair as `(cell, cell)` coordinates.
    pub fn iter_passages(&self) -> PassagesIter {
        PassagesIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            row_width: self.width.0,
        }
    }

    /// Convert a grid coordinate into a petgraph node index.
    #[inline]
    fn graph_index(&self, coord: Cartesian2DCoordinate) -> Option<NodeIndex> {
        self.grid_coordinate_to_index(coord).map(NodeIndex::new)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CorridorIter {
    corridor_columns: usize,
    corridor_count: usize,
    current: usize,
}

impl Iterator for CorridorIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current < self.corridor_count {
            let x = (self.current % self.corridor_columns) * CORRIDOR_STEP as usize;
            let y = (self.current / self.corridor_columns) * CORRIDOR_STEP as usize;
            self.current += 1;
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.corridor_count - self.current;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for CorridorIter {} // default impl using size_hint()

pub struct PassagesIter<'a> {
    graph_edge_iter: slice::Iter<'a, petgraph::graph::Edge<()>>,
    row_width: usize,
}

impl<'a> Iterator for PassagesIter<'a> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        let row_width = self.row_width;
        let to_coord = |index: usize| {
            Cartesian2DCoordinate::new((index % row_width) as u32, (index / row_width) as u32)
        };
        self.graph_edge_iter
            .next()
            .map(|edge| (to_coord(edge.source().index()), to_coord(edge.target().index())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a> ExactSizeIterator for PassagesIter<'a> {} // default impl using size_hint()

#[inline]
fn next_odd(n: usize) -> usize {
    if n == 0 {
        1
    } else if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

fn graph_size(width: Width, height: Height) -> (NodesCount, EdgesCount) {
    let nodes = NodesCount(width.0 * height.0);
    // Edge capacity for a spanning tree over the corridor sublattice.
    let edges = EdgesCount(((width.0 + 1) / 2) * ((height.0 + 1) / 2));
    (nodes, edges)
}

fn is_corridor_pair(a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
    let dx = if a.x > b.x { a.x - b.x } else { b.x - a.x };
    let dy = if a.y > b.y { a.y - b.y } else { b.y - a.y };
    (dx == CORRIDOR_STEP && dy == 0) || (dx == 0 && dy == CORRIDOR_STEP)
}
