use std::fmt;
use std::rc::Rc;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, ItemKind};
use crate::grid::{MazeGrid, CORRIDOR_STEP};
use crate::utils::{FnvHashMap, FnvHashSet};

pub trait GridDisplay {
    /// Render the contents of a corridor cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}

/// Marks the cells of a route, e.g. the entrance to exit solution.
#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinate: Cartesian2DCoordinate,
    end_coordinate: Cartesian2DCoordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: Cartesian2DCoordinate, end: Cartesian2DCoordinate) -> Self {
        StartEndPointsDisplay {
            start_coordinate: start,
            end_coordinate: end,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if coord == self.start_coordinate {
            String::from(" S ")
        } else if coord == self.end_coordinate {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// Marks item-carrying cells with the item kind glyph. Holds a snapshot of
/// the grid's item tags at construction time so the display stays borrowable
/// alongside grid mutation.
#[derive(Debug)]
pub struct ItemDisplay {
    items: FnvHashMap<Cartesian2DCoordinate, ItemKind>,
}
impl ItemDisplay {
    pub fn snapshot(grid: &MazeGrid) -> Self {
        ItemDisplay {
            items: grid.iter_corridors()
                .filter_map(|coord| grid.item_at(coord).map(|kind| (coord, kind)))
                .collect(),
        }
    }
}
impl GridDisplay for ItemDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        match self.items.get(&coord) {
            Some(kind) => format!(" {} ", kind.glyph()),
            None => String::from("   "),
        }
    }
}

/// Stacks displays: the first layer with a non-blank body for a cell wins.
pub struct LayeredDisplay {
    layers: Vec<Rc<dyn GridDisplay>>,
}
impl LayeredDisplay {
    pub fn new(layers: Vec<Rc<dyn GridDisplay>>) -> Self {
        LayeredDisplay { layers }
    }
}
impl GridDisplay for LayeredDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        self.layers
            .iter()
            .map(|layer| layer.render_cell_body(coord))
            .find(|body| body != "   ")
            .unwrap_or_else(|| String::from("   "))
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";
        let default_cell_body = String::from("   ");

        // Render the corridor rooms; the wall positions between them become
        // the drawn boundaries.
        let columns_count = (self.width().0 + 1) / 2;
        let rows_count = (self.height().0 + 1) / 2;
        let room = |rx: usize, ry: usize| {
            Cartesian2DCoordinate::new((rx * CORRIDOR_STEP as usize) as u32,
                                       (ry * CORRIDOR_STEP as usize) as u32)
        };

        // Special case rendering for the north most boundary.
        let mut output = String::from(WALL_RD);
        for rx in 0..columns_count {
            output.push_str(WALL_LR_3);
            let is_east_open = !self.has_wall(room(rx, 0), CompassPrimary::East);
            if is_east_open {
                output.push_str(WALL_LR);
            } else if rx == columns_count - 1 {
                output.push_str(WALL_LD);
            } else {
                output.push_str(WALL_LRD);
            }
        }
        output.push('\n');

        for ry in 0..rows_count {
            let is_last_row = ry == rows_count - 1;

            // The west most boundary of the row; each cell then only renders
            // its body, its east boundary and its south boundary - the cell
            // above already drew the north side.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for rx in 0..columns_count {
                let cell_coord = room(rx, ry);
                let walls = self.walls(cell_coord);
                let east_open = !walls.east;
                let south_open = !walls.south;
                let is_first_column = rx == 0;
                let is_last_column = rx == columns_count - 1;

                if let Some(ref displayer) = *self.grid_display() {
                    row_middle_section_render.push_str(&displayer.render_cell_body(cell_coord));
                } else {
                    row_middle_section_render.push_str(&default_cell_body);
                }
                row_middle_section_render.push_str(if east_open { " " } else { WALL_UD });

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                row_bottom_section_render.push_str(if south_open { "   " } else { WALL_LR_3 });

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east =
                            self.corridor_neighbour_at(cell_coord, CompassPrimary::East)
                                .map_or(false, |c| !self.has_wall(c, CompassPrimary::South));
                        let access_se_from_south =
                            self.corridor_neighbour_at(cell_coord, CompassPrimary::South)
                                .map_or(false, |c| !self.has_wall(c, CompassPrimary::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

#[cfg(test)]
mod tests {

    use std::rc::Rc;

    use super::*;
    use crate::cells::{Cartesian2DCoordinate, ItemKind};
    use crate::grid::MazeGrid;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn single_room_renders_as_a_closed_box() {
        let g = MazeGrid::new(Width(1), Height(1));
        assert_eq!(format!("{}", g), "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn two_by_two_rooms_with_one_inner_wall() {
        let mut g = MazeGrid::new(Width(3), Height(3));
        g.remove_wall_between(gc(0, 0), gc(2, 0)).expect("wall removal failed");
        g.remove_wall_between(gc(2, 0), gc(2, 2)).expect("wall removal failed");
        g.remove_wall_between(gc(0, 0), gc(0, 2)).expect("wall removal failed");

        let expected = "┌───────┐\n\
                        │       │\n\
                        │   ╷   │\n\
                        │   │   │\n\
                        └───┴───┘\n";
        assert_eq!(format!("{}", g), expected);
    }

    #[test]
    fn path_display_marks_only_path_cells() {
        let display = PathDisplay::new(&[gc(0, 0), gc(2, 0)]);
        assert_eq!(display.render_cell_body(gc(0, 0)), " . ");
        assert_eq!(display.render_cell_body(gc(2, 2)), "   ");
    }

    #[test]
    fn start_end_display() {
        let display = StartEndPointsDisplay::new(gc(0, 0), gc(4, 4));
        assert_eq!(display.render_cell_body(gc(0, 0)), " S ");
        assert_eq!(display.render_cell_body(gc(4, 4)), " E ");
        assert_eq!(display.render_cell_body(gc(2, 2)), "   ");
    }

    #[test]
    fn item_display_uses_kind_glyphs() {
        let mut g = MazeGrid::new(Width(5), Height(5));
        g.set_item(gc(2, 2), ItemKind::Coin);
        g.set_item(gc(4, 0), ItemKind::Trap);
        let display = ItemDisplay::snapshot(&g);
        assert_eq!(display.render_cell_body(gc(2, 2)), " c ");
        assert_eq!(display.render_cell_body(gc(4, 0)), " t ");
        assert_eq!(display.render_cell_body(gc(0, 0)), "   ");
    }

    #[test]
    fn layered_display_first_non_blank_wins() {
        let start_end = Rc::new(StartEndPointsDisplay::new(gc(0, 0), gc(4, 4)));
        let path = Rc::new(PathDisplay::new(&[gc(0, 0), gc(2, 0)]));
        let layered = LayeredDisplay::new(vec![start_end, path]);
        assert_eq!(layered.render_cell_body(gc(0, 0)), " S "); // start over path dot
        assert_eq!(layered.render_cell_body(gc(2, 0)), " . ");
        assert_eq!(layered.render_cell_body(gc(2, 2)), "   ");
    }

    #[test]
    fn grid_display_injection_changes_cell_bodies() {
        let mut g = MazeGrid::new(Width(1), Height(1));
        g.set_grid_display(Some(Rc::new(StartEndPointsDisplay::new(gc(0, 0), gc(0, 0)))));
        assert_eq!(format!("{}", g), "┌───┐\n│ S │\n└───┘\n");
    }
}
