use clap::Parser;
use flexi_logger::Logger;
use gassim2d::{Algorithm, Error, SimConfig, Simulation};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gassim2d")]
#[command(about = "Event-driven 2D hard-disk gas simulation", long_about = None)]
struct Cli {
    /// TOML configuration file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of particles
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// Box width
    #[arg(long)]
    width: Option<f64>,

    /// Box height
    #[arg(long)]
    height: Option<f64>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Collisions to resolve before printing the snapshot
    #[arg(long)]
    collisions: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let mut cfg = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(n) = cli.particles {
        cfg.num_particles = n;
    }
    if let Some(w) = cli.width {
        cfg.box_width = w;
    }
    if let Some(h) = cli.height {
        cfg.box_height = h;
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    if let Some(c) = cli.collisions {
        cfg.collisions = c;
    }

    let mut sim = cfg.build_simulation()?;
    log::info!("{}", sim.description());
    log::info!(
        "{} particles in a {} x {} box, {} events scheduled",
        sim.num_particles(),
        cfg.box_width,
        cfg.box_height,
        sim.queued_events()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match sim.time_at_next_collision() {
        Ok(t) => writeln!(out, "time at next collision: {t}")?,
        Err(Error::EmptyQueue) => writeln!(out, "no collision scheduled")?,
        Err(e) => return Err(e.into()),
    }

    let mut resolved = 0usize;
    while resolved < cfg.collisions {
        match sim.advance_to_next_collision()? {
            Some(ev) => {
                log::info!(
                    "collision {} between {} and {} at t={}",
                    resolved + 1,
                    ev.first,
                    ev.second,
                    ev.time_f64()
                );
                resolved += 1;
            }
            None => {
                log::info!("event queue drained after {resolved} collisions");
                break;
            }
        }
    }

    write_snapshot(&mut out, &sim)?;
    Ok(())
}

fn write_snapshot(out: &mut impl Write, sim: &Simulation) -> io::Result<()> {
    let snap = sim.snapshot();
    writeln!(out, "t {}", sim.time())?;
    writeln!(out, "box {} {}", snap.width, snap.height)?;
    for (i, [x, y]) in snap.positions.iter().enumerate() {
        writeln!(out, "{i} {x} {y}")?;
    }
    Ok(())
}
