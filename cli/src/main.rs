use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use sweeper_core as game;

mod clock;
mod command;
mod render;
mod session;
mod store;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset: beginner, intermediate or expert
    #[arg(short, long, default_value_t = game::Difficulty::default())]
    difficulty: game::Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// File holding the best times
    #[arg(long, default_value = "sweeper-best-times.json")]
    store: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let store = store::FileStore::open(&args.store);
    log::debug!("best times at {}", store.path().display());

    let game = game::Game::new(args.difficulty, store, seed);
    let mut session = session::Session::new(game);

    println!("{}", command::HELP);
    session
        .run(io::stdin().lock(), io::stdout().lock())
        .context("terminal session failed")?;

    log::debug!("best times: {:?}", session.game().best_times().times());
    Ok(())
}
