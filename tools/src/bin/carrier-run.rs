use anyhow::Context;
use carrier_simulator::command::Script;
use carrier_simulator::simulation::Simulation;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap()]
struct Arguments {
    /// Command script, one command per line.
    script: PathBuf,

    /// Simulated seconds to run after the script has been queued.
    #[clap(short, long, default_value = "300")]
    max_time: f64,

    /// Print a snapshot every N simulated seconds.
    #[clap(short, long)]
    snapshots: Option<f64>,

    /// Stop early once the script is done and every aircraft is back aboard.
    #[clap(long)]
    until_idle: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Arguments::parse();
    let src = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading {}", args.script.display()))?;
    let mut script =
        Script::parse(&src).with_context(|| format!("parsing {}", args.script.display()))?;

    let mut sim = Simulation::new();
    let mut nonce = 0;
    let mut late_landings = 0;
    let mut next_snapshot = 0.0;
    while sim.time() < args.max_time {
        script.tick(&mut sim);
        sim.step();

        late_landings += sim.events().late_landings.len();

        if let Some(interval) = args.snapshots {
            if sim.time() >= next_snapshot {
                println!("{}", serde_json::to_string(&sim.snapshot(nonce))?);
                nonce += 1;
                next_snapshot += interval;
            }
        }

        if args.until_idle && script.is_done() && sim.carrier.is_idle() {
            break;
        }
    }

    log::info!(
        "stopped at t={:.2}s with {} late landings, hash={:x}",
        sim.time(),
        late_landings,
        sim.hash()
    );
    println!("{}", serde_json::to_string(&sim.snapshot(nonce))?);
    Ok(())
}
