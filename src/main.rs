use anyhow::Result;
use clap::Parser;
use serpens_lib::app::{load_config, render_config, App, RunOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Neuro-evolution of snakes in a 2D arena", long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the population size
    #[arg(short, long)]
    population: Option<usize>,

    /// Stop after this many ticks (0 = run until 'q')
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Ticks between status reports (0 = off)
    #[arg(long, default_value_t = 1000)]
    report_every: u64,

    /// Print status reports as JSON lines
    #[arg(long)]
    json: bool,

    /// Ignore stdin key commands
    #[arg(long)]
    no_input: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    serpens_core::init_logging();

    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(population) = args.population {
        config.evolution.population_size = population;
    }
    if args.print_config {
        print!("{}", render_config(&config)?);
        return Ok(());
    }

    let options = RunOptions {
        max_ticks: args.ticks,
        report_every: args.report_every,
        json: args.json,
        read_stdin: !args.no_input,
    };
    let mut app = App::new(config, options)?;
    app.shutdown().install_ctrl_c_handler()?;
    match app.run() {
        Ok(_) => {
            tracing::info!("Exited clean.");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Application error");
            Err(e)
        }
    }
}
