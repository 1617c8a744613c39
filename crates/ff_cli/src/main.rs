//! Squad engine CLI
//!
//! Demo and planning tool around `ff_core`: walk a full transfer session,
//! auto-pick a squad from a seeded catalog sample, or inspect the gameweek
//! deadline.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use ff_core::rules::gameweek;
use ff_core::{data, Formation, Player, Position, TransferSession};

#[derive(Parser)]
#[command(name = "ff_cli")]
#[command(about = "Fantasy football squad engine demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a full session: auto-pick, one transfer, confirm, cancel
    Demo {
        /// Starting formation code (e.g. "4-3-3")
        #[arg(long, default_value = "4-3-3")]
        formation: String,
    },

    /// Auto-pick a squad from a seeded random sample of the catalog
    Plan {
        /// RNG seed; the same seed always produces the same pool
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of catalog players in the sampled pool
        #[arg(long, default_value = "60")]
        pool_size: usize,

        /// Starting formation code
        #[arg(long, default_value = "4-3-3")]
        formation: String,
    },

    /// Show the current gameweek window and lineup deadline
    Deadline,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo { formation } => run_demo(&formation),
        Commands::Plan { seed, pool_size, formation } => run_plan(seed, pool_size, &formation),
        Commands::Deadline => run_deadline(),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ff_core=info,ff_cli=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn parse_formation(code: &str) -> Result<Formation> {
    code.parse::<Formation>().with_context(|| format!("unknown formation code: {code}"))
}

fn run_demo(formation: &str) -> Result<()> {
    let mut session = TransferSession::new(parse_formation(formation)?);

    println!("Auto-picking a squad from the embedded catalog...");
    session.auto_pick(data::players());
    print_squad(&session);

    // One transfer round, covered by the free allowance.
    let out = session
        .roster()
        .players()
        .iter()
        .find(|p| p.position() == Position::GK)
        .context("auto-picked squad has no goalkeeper")?
        .clone();
    let incoming = data::players()
        .iter()
        .find(|p| {
            p.position == Position::GK
                && !session.roster().contains(&p.id)
                && p.price <= session.roster().budget_remaining() + out.price()
                && session.roster().club_count(&p.team) < ff_core::MAX_FROM_SAME_CLUB
                && (p.league == out.league() || session.roster().league_count(out.league()) > 1)
        })
        .context("no eligible replacement goalkeeper in the catalog")?
        .clone();

    println!("\nTransfer: {} out, {} in", out.player.name, incoming.name);
    session.transfer_player(out.id(), incoming)?;
    println!(
        "Pending changes: {} (cost {} pts, {} free transfer(s) held)",
        session.changes_count(),
        session.transfer_cost(),
        session.free_transfers()
    );

    session.confirm_transfers();
    println!("Confirmed. Free transfers left: {}", session.free_transfers());

    // A second round, abandoned.
    let out2 = session
        .roster()
        .players()
        .iter()
        .find(|p| p.position() == Position::FWD)
        .context("squad has no forward")?
        .clone();
    let incoming2 = data::players()
        .iter()
        .find(|p| {
            p.position == Position::FWD
                && !session.roster().contains(&p.id)
                && p.price <= session.roster().budget_remaining() + out2.price()
                && session.roster().club_count(&p.team) < ff_core::MAX_FROM_SAME_CLUB
                && (p.league == out2.league() || session.roster().league_count(out2.league()) > 1)
        })
        .context("no eligible replacement forward in the catalog")?
        .clone();
    session.transfer_player(out2.id(), incoming2)?;
    println!(
        "\nSecond round: {} pending change(s) would cost {} pts. Cancelling.",
        session.changes_count(),
        session.transfer_cost()
    );
    session.cancel_transfers();
    print_squad(&session);
    Ok(())
}

fn run_plan(seed: u64, pool_size: usize, formation: &str) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pool: Vec<Player> = data::players().to_vec();
    pool.shuffle(&mut rng);
    pool.truncate(pool_size);
    info!(seed, pool = pool.len(), "sampled candidate pool");

    let mut session = TransferSession::new(parse_formation(formation)?);
    session.auto_pick(&pool);

    if session.roster().len() < ff_core::MAX_SQUAD_SIZE {
        println!(
            "Pool of {} could only fill {} of {} slots.",
            pool.len(),
            session.roster().len(),
            ff_core::MAX_SQUAD_SIZE
        );
    }
    print_squad(&session);
    Ok(())
}

fn run_deadline() -> Result<()> {
    let now = Utc::now();
    println!("Now:              {}", now.format("%Y-%m-%d %H:%M UTC"));
    println!("Gameweek start:   {}", gameweek::gameweek_start(now).format("%Y-%m-%d %H:%M UTC"));
    println!(
        "Lineup deadline:  {}",
        gameweek::gameweek_deadline(now).format("%Y-%m-%d %H:%M UTC")
    );
    println!("Next deadline:    {}", gameweek::next_deadline(now).format("%Y-%m-%d %H:%M UTC"));
    println!(
        "Lineup changes:   {}",
        if gameweek::is_lineup_locked(now) { "locked" } else { "open" }
    );
    Ok(())
}

fn print_squad(session: &TransferSession) {
    let roster = session.roster();
    println!(
        "\nSquad: {}/{} players, formation {}, budget remaining: {:.1}",
        roster.len(),
        ff_core::MAX_SQUAD_SIZE,
        roster.formation(),
        roster.budget_remaining()
    );

    let mut members: Vec<_> = roster.players().iter().collect();
    members.sort_by_key(|p| (!p.is_starter, p.bench_order, p.position() as u8));
    for member in members {
        let role = if member.is_starter {
            "XI ".to_string()
        } else {
            format!("B{} ", member.bench_order.unwrap_or(0))
        };
        let armband = if member.is_captain {
            " (C)"
        } else if member.is_vice_captain {
            " (VC)"
        } else {
            ""
        };
        println!(
            "  {role}{:<4} {:<26} {:<18} {:<4} {:>5.1}{armband}",
            member.position().as_str(),
            member.player.name,
            member.player.team,
            member.league().as_str(),
            member.price()
        );
    }
}
