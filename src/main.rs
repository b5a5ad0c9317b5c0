use docopt::Docopt;
use error_chain::bail;
use labyrinth::{
    cells::{Cartesian2DCoordinate, CompassPrimary, ItemKind},
    game::{self, Navigator, RunStats, StatsSink},
    generators,
    grid_displays::{GridDisplay, ItemDisplay, LayeredDisplay, PathDisplay, StartEndPointsDisplay},
    items,
    units::{Height, Width},
};
use rand::{SeedableRng, XorShiftRng};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    rc::Rc,
};

const USAGE: &str = "Labyrinth

Usage:
    labyrinth_driver -h | --help
    labyrinth_driver generate [--width=<w>] [--height=<h>] [--seed=<n>] [--coin-density=<d>] [--show-path] [--show-items] [--text-out=<path>]
    labyrinth_driver walk --moves=<dirs> [--width=<w>] [--height=<h>] [--seed=<n>] [--coin-density=<d>] [--elapsed-ms=<t>]

Options:
    -h --help             Show this screen.
    --width=<w>           The lattice width, normalised up to the next odd number [default: 21].
    --height=<h>          The lattice height, normalised up to the next odd number [default: 21].
    --seed=<n>            Fixed generator seed. The same seed, width and height always rebuild the same maze. Random if not given.
    --coin-density=<d>    Fraction of off-solution corridor cells that receive a coin [default: 0.1].
    --show-path           Mark the entrance to exit solution route in the textual rendering.
    --show-items          Mark item carrying cells in the textual rendering.
    --text-out=<path>     Output file path for the textual rendering instead of stdout.
    --moves=<dirs>        Moves to play as a string of N/S/E/W glyphs, or the word 'solution' to walk the generated solution route.
    --elapsed-ms=<t>      Wall clock time to score the run against, in milliseconds [default: 60000].
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_generate: bool,
    cmd_walk: bool,
    flag_width: usize,
    flag_height: usize,
    flag_seed: Option<u32>,
    flag_coin_density: f64,
    flag_show_path: bool,
    flag_show_items: bool,
    flag_text_out: String,
    flag_moves: String,
    flag_elapsed_ms: u64,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let mut rng = maze_rng(args.flag_seed);
    let (mut maze_grid, solution) =
        generators::generate_maze(Width(args.flag_width), Height(args.flag_height), &mut rng);

    let coins_placed = items::scatter_items(&mut maze_grid,
                                            &solution,
                                            ItemKind::Coin,
                                            args.flag_coin_density,
                                            &mut rng);

    if args.cmd_walk {

        let moves = parse_moves(&args.flag_moves, &solution)?;
        let mut navigator = Navigator::new(maze_grid, solution);
        for direction in moves {
            let move_result = navigator.request_move(direction);
            if move_result.won {
                break;
            }
        }

        let position = navigator.player().position();
        println!("position: ({}, {})", position.x, position.y);
        println!("state: {:?}", navigator.state());
        navigator.report_run(args.flag_elapsed_ms, &mut StdoutStats);

    } else if args.cmd_generate {

        println!("coins placed: {}", coins_placed);

        let mut layers: Vec<Rc<dyn GridDisplay>> =
            vec![Rc::new(StartEndPointsDisplay::new(maze_grid.entrance(), maze_grid.exit()))];
        if args.flag_show_items {
            layers.push(Rc::new(ItemDisplay::snapshot(&maze_grid)));
        }
        if args.flag_show_path {
            layers.push(Rc::new(PathDisplay::new(&solution)));
        }
        maze_grid.set_grid_display(Some(Rc::new(LayeredDisplay::new(layers))));

        if args.flag_text_out.is_empty() {
            println!("{}", maze_grid);
        } else {
            write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    Ok(())
}

/// A fixed seed gives a reproducible maze; otherwise take a weakly random rng.
fn maze_rng(seed: Option<u32>) -> XorShiftRng {
    match seed {
        // XorShift cannot hold an all zero state, hence the low bit pin.
        Some(s) => {
            XorShiftRng::from_seed([s | 1, s ^ 0xdead_beef, s ^ 0x1234_5678, 0x9abc_def0])
        }
        None => rand::weak_rng(),
    }
}

fn parse_moves(moves_spec: &str,
               solution: &[Cartesian2DCoordinate])
               -> Result<Vec<CompassPrimary>> {

    if moves_spec == "solution" {
        return game::directions_along(solution)
            .ok_or("Generated solution route is not walkable cell by cell.".into());
    }

    let mut moves = Vec::with_capacity(moves_spec.len());
    for glyph in moves_spec.chars() {
        match CompassPrimary::from_char(glyph) {
            Some(direction) => moves.push(direction),
            None => bail!("Unrecognised move glyph {:?}, expected one of N S E W.", glyph),
        }
    }
    Ok(moves)
}

struct StdoutStats;

impl StatsSink for StdoutStats {
    fn report(&mut self, stats: &RunStats) {
        println!("score: {}", stats.score);
        println!("moves: {}", stats.moves_count);
        println!("items collected: {}", stats.items_collected);
        println!("elapsed: {}ms", stats.elapsed_ms);
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
