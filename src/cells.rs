use smallvec::SmallVec;
use std::convert::From;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [
        CompassPrimary::North,
        CompassPrimary::South,
        CompassPrimary::East,
        CompassPrimary::West,
    ];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Direction from a single compass letter, case insensitive.
    pub fn from_char(c: char) -> Option<CompassPrimary> {
        match c {
            'n' | 'N' => Some(CompassPrimary::North),
            's' | 'S' => Some(CompassPrimary::South),
            'e' | 'E' => Some(CompassPrimary::East),
            'w' | 'W' => Some(CompassPrimary::West),
            _ => None,
        }
    }
}

/// Creates a new `Cartesian2DCoordinate` offset `steps` lattice units away in
/// the given direction.
/// Returns None if the coordinate is not representable (off the negative edge).
/// North is up the page towards row zero.
pub fn offset_coordinate(coord: Cartesian2DCoordinate,
                         dir: CompassPrimary,
                         steps: u32)
                         -> Option<Cartesian2DCoordinate> {
    let (x, y) = (coord.x, coord.y);
    match dir {
        CompassPrimary::North => {
            if y >= steps {
                Some(Cartesian2DCoordinate { x, y: y - steps })
            } else {
                None
            }
        }
        CompassPrimary::South => Some(Cartesian2DCoordinate { x, y: y + steps }),
        CompassPrimary::East => Some(Cartesian2DCoordinate { x: x + steps, y }),
        CompassPrimary::West => {
            if x >= steps {
                Some(Cartesian2DCoordinate { x: x - steps, y })
            } else {
                None
            }
        }
    }
}

/// Collectible marker kinds a corridor cell may carry.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum ItemKind {
    Coin,
    Key,
    Power,
    Trap,
}

impl ItemKind {
    pub fn glyph(self) -> char {
        match self {
            ItemKind::Coin => 'c',
            ItemKind::Key => 'k',
            ItemKind::Power => 'p',
            ItemKind::Trap => 't',
        }
    }
}

/// Snapshot of the four wall faces of a corridor cell.
///
/// The underlying storage is the grid's passage graph, so the flags seen from
/// two adjacent cells are two views of the same undirected edge and can never
/// disagree.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Walls {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Walls {
    pub fn fully_walled() -> Walls {
        Walls {
            north: true,
            south: true,
            east: true,
            west: true,
        }
    }

    pub fn wall_at(&self, dir: CompassPrimary) -> bool {
        match dir {
            CompassPrimary::North => self.north,
            CompassPrimary::South => self.south,
            CompassPrimary::East => self.east,
            CompassPrimary::West => self.west,
        }
    }

    pub fn any_open(&self) -> bool {
        !(self.north && self.south && self.east && self.west)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn offsets_move_one_step_in_each_direction() {
        let c = Cartesian2DCoordinate::new(2, 2);
        assert_eq!(offset_coordinate(c, CompassPrimary::North, 2),
                   Some(Cartesian2DCoordinate::new(2, 0)));
        assert_eq!(offset_coordinate(c, CompassPrimary::South, 2),
                   Some(Cartesian2DCoordinate::new(2, 4)));
        assert_eq!(offset_coordinate(c, CompassPrimary::East, 2),
                   Some(Cartesian2DCoordinate::new(4, 2)));
        assert_eq!(offset_coordinate(c, CompassPrimary::West, 2),
                   Some(Cartesian2DCoordinate::new(0, 2)));
    }

    #[test]
    fn offsets_off_the_negative_edges_are_not_representable() {
        let origin = Cartesian2DCoordinate::new(0, 0);
        assert_eq!(offset_coordinate(origin, CompassPrimary::North, 2), None);
        assert_eq!(offset_coordinate(origin, CompassPrimary::West, 2), None);
        assert!(offset_coordinate(origin, CompassPrimary::South, 2).is_some());
        assert!(offset_coordinate(origin, CompassPrimary::East, 2).is_some());
    }

    #[test]
    fn opposites() {
        for &dir in &CompassPrimary::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(CompassPrimary::North.opposite(), CompassPrimary::South);
        assert_eq!(CompassPrimary::East.opposite(), CompassPrimary::West);
    }

    #[test]
    fn fully_walled_has_no_open_face() {
        let walls = Walls::fully_walled();
        assert!(!walls.any_open());
        for &dir in &CompassPrimary::ALL {
            assert!(walls.wall_at(dir));
        }
    }
}
