use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use emu2048::engine::{compact, Board, Cursor, Memory, Move, Tile, CELLS};
use emu2048::fixtures::CASES;
use emu2048::oracle::{self, VariantStore};
use emu2048::score::Score;

#[derive(Debug, Parser)]
#[command(name = "variants", about = "Check the move table and search for new lane shapes")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Replay every move case through the engine and the reference oracle
    Check {
        /// Print a JSON report instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Try random boards and print those that hit a lane shape not covered yet
    Search {
        /// Number of random boards
        #[arg(long, default_value_t = 100_000)]
        limit: u64,
        /// RNG seed (defaults to OS entropy)
        #[arg(long)]
        seed: Option<u64>,
        /// Start from no known shapes instead of those in the move table
        #[arg(long)]
        fresh: bool,
        /// Suppress the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Debug, Serialize)]
struct CaseReport {
    index: usize,
    board: &'static str,
    dir: Move,
    expected: &'static str,
    engine: Board,
    oracle: Board,
    moved: bool,
    steps: u64,
    iterations: u64,
    ok: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    cases: Vec<CaseReport>,
    failures: usize,
    steps: u64,
    iterations: u64,
    variants: usize,
}

fn check(json: bool) -> anyhow::Result<()> {
    let mut cases = Vec::with_capacity(CASES.len());
    for (index, case) in CASES.iter().enumerate() {
        let start: Board = case.board.parse()?;
        let reference = oracle::shift(start, case.dir);

        let mut board = start;
        let mut cursor = Cursor::new();
        let mut score = Score::ZERO;
        let outcome = compact(&mut Memory::new(&mut board, &mut cursor), &mut score, case.dir);

        let ok = board.to_symbols() == case.result
            && board == reference.board
            && outcome.moved == case.moved
            && outcome == reference.outcome();
        if !ok {
            warn!(index, board = case.board, dir = %case.dir, "case failed");
        }
        cases.push(CaseReport {
            index,
            board: case.board,
            dir: case.dir,
            expected: case.result,
            engine: board,
            oracle: reference.board,
            moved: outcome.moved,
            steps: cursor.steps(),
            iterations: cursor.iterations(),
            ok,
        });
    }

    let report = CheckReport {
        failures: cases.iter().filter(|c| !c.ok).count(),
        steps: cases.iter().map(|c| c.steps).sum(),
        iterations: cases.iter().map(|c| c.iterations).sum(),
        variants: VariantStore::from_fixtures().len(),
        cases,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(" [ #] mv field              result             ok  St  Itr");
        for c in &report.cases {
            println!(
                " [{:2}] {} '{}' '{}' {:>3} {:3} {:4}",
                c.index,
                c.dir.label(),
                c.board,
                c.engine.to_symbols(),
                if c.ok { "ok" } else { "ERR" },
                c.steps,
                c.iterations
            );
        }
        println!(
            "\n cases: {} failures: {} steps: {} iterations: {} variants: {}",
            report.cases.len(),
            report.failures,
            report.steps,
            report.iterations,
            report.variants
        );
    }

    if report.failures > 0 {
        anyhow::bail!("{} of {} cases failed", report.failures, report.cases.len());
    }
    Ok(())
}

fn random_board(rng: &mut impl Rng) -> Board {
    let mut board = Board::EMPTY;
    for i in 0..CELLS {
        board.set(i, Tile::new(rng.gen_range(0..=Tile::MAX_RANK)));
    }
    board
}

fn search(limit: u64, seed: Option<u64>, fresh: bool, quiet: bool) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut store = if fresh { VariantStore::new() } else { VariantStore::from_fixtures() };
    info!(limit, known = store.len(), "searching for new lane shapes");

    let pb = if quiet { ProgressBar::hidden() } else { ProgressBar::new(limit) };
    pb.set_style(
        ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} | {msg}")?
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let mut found = 0usize;
    for _ in 0..limit {
        let board = random_board(&mut rng);
        for dir in Move::ALL {
            if store.record_board(&board, dir) == 0 {
                continue;
            }
            found += 1;
            let reference = oracle::shift(board, dir);
            let shapes: Vec<String> = oracle::variants(&board, dir).iter().map(|v| v.to_string()).collect();
            pb.println(format!(
                "    case(\"{}\", Move::{:?}, \"{}\", {}), // {}",
                board.to_symbols(),
                dir,
                reference.board.to_symbols(),
                reference.moved,
                shapes.join(" ")
            ));
        }
        pb.set_message(format!("new: {found} known: {}", store.len()));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("new variants: {found}, known: {}", store.len());
    let missing = store.missing();
    if !missing.is_empty() {
        let codes: Vec<String> = missing.iter().map(|v| v.to_string()).collect();
        println!("never seen: {}", codes.join(" "));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Args::parse().cmd {
        Cmd::Check { json } => check(json),
        Cmd::Search { limit, seed, fresh, quiet } => search(limit, seed, fresh, quiet),
    }
}
