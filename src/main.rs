//! Command line front end for the sliding puzzle solver.
//!
//! Usage:
//!   slider --rows 3 --columns 3 --from "0 8 1 2 4 7 3 6 5" [options]
//!   slider --rows 4 --columns 4 --shuffle --strategy fast
//!
//! Set `RUST_LOG=debug` to see what the search is doing.

use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use sliding_puzzle::{
    canonical_goal, Progress, Puzzle, Route, Solver, SolverConfig, Strategy,
};

#[derive(Parser)]
#[command(name = "slider")]
#[command(about = "Solve sliding tile puzzles on N x M boards")]
#[command(version)]
struct Cli {
    /// Number of rows
    #[arg(short, long, default_value = "3")]
    rows: usize,

    /// Number of columns
    #[arg(short, long, default_value = "3")]
    columns: usize,

    /// Start board as a whitespace separated list, 0 is the blank
    #[arg(long, value_name = "TILES", required_unless_present = "shuffle")]
    from: Option<String>,

    /// Goal board (default: 1 2 ... N-1 0)
    #[arg(long, value_name = "TILES")]
    to: Option<String>,

    /// Start from a random solvable board instead of --from
    #[arg(long, conflicts_with_all = ["from", "to"])]
    shuffle: bool,

    /// Search algorithm
    #[arg(long, value_enum, default_value = "optimal")]
    strategy: Algorithm,

    /// Give up after generating this many distinct boards
    #[arg(long)]
    max_states: Option<usize>,

    /// Print every board of the route
    #[arg(long)]
    boards: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Hide the progress line
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Breadth first search, shortest route
    Optimal,
    /// Heuristic best first search, fast but not always shortest
    Fast,
}

impl From<Algorithm> for Strategy {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Optimal => Strategy::Optimal,
            Algorithm::Fast => Strategy::Fast,
        }
    }
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput<'a> {
    solvable: bool,
    strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<&'a Route>,
    stats: Progress,
    time_elapsed_ms: u64,
}

// Redrawing the spinner on every comparison would dominate the search.
const PROGRESS_EVERY: usize = 4096;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let puzzle = build_puzzle(&cli)?;
    let strategy = Strategy::from(cli.strategy);
    let solver = Solver::new(SolverConfig {
        max_states: cli.max_states,
    });

    let spinner = (!cli.quiet && !cli.json).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | {msg}")
                .unwrap()
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    });

    let mut stats = Progress::default();
    let started = Instant::now();
    let route = solver.solve(&puzzle, strategy, |progress| {
        stats = progress;
        if let Some(pb) = &spinner {
            if progress.compared % PROGRESS_EVERY == 0 {
                pb.set_message(format!(
                    "Checking state {}/{} on level {}",
                    progress.compared, progress.discovered, progress.depth
                ));
            }
        }
    })?;
    let elapsed = started.elapsed();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if cli.json {
        let output = SolveOutput {
            solvable: route.is_some(),
            strategy,
            moves: route.as_ref().map(Route::moves_string),
            route: route.as_ref(),
            stats,
            time_elapsed_ms: elapsed.as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match route {
        None => println!("Puzzle not solvable!"),
        Some(route) => {
            println!(
                "Solved in {:.4} seconds, route has {} moves:\n{}\n",
                elapsed.as_secs_f64(),
                route.moves().len(),
                route.moves_string()
            );
            println!(
                "States: {} compared / {} discovered",
                stats.compared, stats.discovered
            );
            if cli.boards {
                println!();
                print_boards(&puzzle, &route);
            }
        }
    }

    Ok(())
}

fn build_puzzle(cli: &Cli) -> anyhow::Result<Puzzle> {
    if cli.shuffle {
        let mut rng = rand::thread_rng();
        return Puzzle::scramble(cli.rows, cli.columns, &mut rng)
            .context("failed to build a random puzzle");
    }

    let Some(from) = &cli.from else {
        bail!("either --from or --shuffle is required");
    };
    let from = parse_tiles(from).context("invalid --from board")?;
    let to = match &cli.to {
        Some(to) => parse_tiles(to).context("invalid --to board")?,
        None => canonical_goal(cli.rows.saturating_mul(cli.columns)),
    };

    Ok(Puzzle::new(cli.rows, cli.columns, &from, &to)?)
}

fn parse_tiles(input: &str) -> anyhow::Result<Vec<u8>> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u8>()
                .with_context(|| format!("'{}' is not a tile number", token))
        })
        .collect()
}

/// Draws the route as framed grids, as many side by side as the terminal
/// allows. The tile that slides next is shown in red.
fn print_boards(puzzle: &Puzzle, route: &Route) {
    let width = (puzzle.size().saturating_sub(1)).max(1).to_string().len();
    let board_width = (width + 3) * puzzle.columns() + 2;
    let terminal_width = crossterm::terminal::size()
        .map(|(columns, _)| usize::from(columns))
        .unwrap_or(80);
    let per_line = (terminal_width / board_width).max(1);

    let boards = route.boards();
    for (chunk_index, chunk) in boards.chunks(per_line).enumerate() {
        let first = chunk_index * per_line;

        let border = |l: &str, m: &str, r: &str| {
            let mut line = String::from(l);
            for column in 0..puzzle.columns() {
                line.push_str(&"─".repeat(width + 2));
                line.push_str(if column + 1 == puzzle.columns() { r } else { m });
            }
            line
        };
        let join = |lines: Vec<String>| lines.join(" ");

        println!("{}", join(chunk.iter().map(|_| border("┌", "┬", "┐")).collect()));
        for row in 0..puzzle.rows() {
            let mut lines = Vec::with_capacity(chunk.len());
            for (offset, board) in chunk.iter().enumerate() {
                // The blank of the next board marks the tile that moves.
                let moving = boards.get(first + offset + 1).map(|next| next.blank());
                let mut line = String::from("│");
                for column in 0..puzzle.columns() {
                    let position = row * puzzle.columns() + column;
                    let tile = board[position];
                    let cell = if tile == 0 {
                        " ".repeat(width)
                    } else if Some(position) == moving {
                        format!("{:>width$}", tile).red().to_string()
                    } else {
                        format!("{:>width$}", tile)
                    };
                    line.push(' ');
                    line.push_str(&cell);
                    line.push_str(" │");
                }
                lines.push(line);
            }
            println!("{}", join(lines));

            let (l, m, r) = if row + 1 == puzzle.rows() {
                ("└", "┴", "┘")
            } else {
                ("├", "┼", "┤")
            };
            println!("{}", join(chunk.iter().map(|_| border(l, m, r)).collect()));
        }
    }
}
