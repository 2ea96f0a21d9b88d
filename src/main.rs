use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use emu2048::config::{GameConfig, SpawnPolicy};
use emu2048::engine::{parse_moves, Board, CursorStats, Move, MoveOutcome};
use emu2048::game::Game;
use emu2048::score::Score;
use emu2048::spawn::Spawner;

#[derive(Debug, Parser)]
#[command(name = "emu2048", about = "Play 2048 moves on the shift-register emulator")]
struct Args {
    /// Moves to play (u/d/l/r or arrows). Read line by line from stdin when omitted
    moves: Option<String>,

    /// JSON file with a game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spawn policy: random, lfsr or scripted
    #[arg(long)]
    spawn: Option<SpawnPolicy>,

    /// Seed for the random spawner
    #[arg(long)]
    seed: Option<u64>,

    /// Initial LFSR register, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_u16)]
    lfsr_seed: Option<u16>,

    /// Placement letters for the scripted spawner (a-p: 2, A-P: 4)
    #[arg(long)]
    script: Option<String>,

    /// Tiles placed before the first move
    #[arg(long)]
    start_tiles: Option<usize>,

    /// Starting board, 16 symbols from the bottom-right cell
    #[arg(long)]
    board: Option<Board>,

    /// Starting score, 7 characters
    #[arg(long)]
    score: Option<Score>,

    /// Print only the final summary
    #[arg(long)]
    quiet: bool,

    /// One JSON record per move instead of the board drawing
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct MoveRecord<'a> {
    dir: Move,
    #[serde(flatten)]
    outcome: MoveOutcome,
    board: &'a Board,
    score: &'a Score,
    cursor: CursorStats,
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid 16-bit value {s:?}: {e}"))
}

fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(spawn) = args.spawn { cfg.spawn = spawn; }
    if args.seed.is_some() { cfg.seed = args.seed; }
    if let Some(seed) = args.lfsr_seed { cfg.lfsr_seed = seed; }
    if args.script.is_some() { cfg.script = args.script.clone(); }
    if let Some(n) = args.start_tiles { cfg.start_tiles = n; }
    // A script implies scripted spawning unless a policy was chosen explicitly.
    if args.spawn.is_none() && args.script.is_some() { cfg.spawn = SpawnPolicy::Scripted; }
    Ok(cfg)
}

fn report(game: &Game, dir: Move, outcome: MoveOutcome, args: &Args) -> anyhow::Result<()> {
    if args.quiet { return Ok(()); }
    if args.json {
        let record = MoveRecord { dir, outcome, board: game.board(), score: game.score(), cursor: game.stats() };
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("{}", game.status_line());
        println!("{}", game.board());
    }
    Ok(())
}

fn play(game: &mut Game, spawner: &mut dyn Spawner, moves: &[Move], args: &Args) -> anyhow::Result<()> {
    for &dir in moves {
        let outcome = game.make_move(dir, spawner);
        report(game, dir, outcome, args)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    info!(spawn = %cfg.spawn, start_tiles = cfg.start_tiles, "starting session");

    let mut spawner = cfg.spawner()?;
    let mut game = match args.board {
        Some(board) => Game::from_board(board),
        None => Game::new(),
    };
    if let Some(score) = args.score {
        game = game.with_score(score);
    }
    // A given board is played as is.
    if args.board.is_none() {
        game.start(&mut spawner, cfg.start_tiles);
    }
    if !args.quiet && !args.json {
        println!("{}", game.status_line());
        println!("{}", game.board());
    }

    match &args.moves {
        Some(script) => play(&mut game, &mut spawner, &parse_moves(script)?, &args)?,
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("reading moves from stdin")?;
                match parse_moves(&line) {
                    Ok(moves) => play(&mut game, &mut spawner, &moves, &args)?,
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    }

    let stats = game.stats();
    info!(
        moves = game.moves(),
        score = game.score().value(),
        iterations = stats.iterations,
        steps = stats.steps,
        "session finished"
    );
    println!(
        "final: '{}' score: {} moves: {} iterations: {} steps: {}",
        game.board().to_symbols(),
        game.score().grouped(),
        game.moves(),
        stats.iterations,
        stats.steps
    );
    Ok(())
}
