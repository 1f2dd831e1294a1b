use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rustpod::config::PodConfig;
use rustpod::output::{output_dir, read_spectrum, write_results};
use rustpod::pod::{cumulative_energy, energy_percent};
use rustpod::time_dirs::TimeDir;
use rustpod::{run, ExecutionContext, Progress};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rustpod", about = "Proper orthogonal decomposition of OpenFOAM snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write pod modes and singular values to postProcessing/POD.
    /// Modes are ordered by decreasing singular value.
    Modes {
        /// The config file
        #[arg(short, long)]
        config: PathBuf,
        /// Case directory
        #[arg(long, default_value = ".")]
        case: PathBuf,
        /// Number of worker threads
        #[arg(long)]
        threads: Option<usize>,
        /// Read snapshots one after another
        #[arg(long)]
        serial: bool,
    },
    /// Print energy of each mode from the written spectrum
    Energy {
        /// The config file
        #[arg(short, long)]
        config: PathBuf,
        /// Case directory
        #[arg(long, default_value = ".")]
        case: PathBuf,
        /// Count the first (mean flow) mode as well
        #[arg(long)]
        include_mean: bool,
    },
}

/// Progress bar over snapshots
struct BarProgress(ProgressBar);

impl Progress for BarProgress {
    fn start(&self, total: usize) {
        self.0.set_length(total as u64);
    }

    fn advance(&self, time: &TimeDir) {
        self.0.set_message(time.name.clone());
        self.0.inc(1);
    }

    fn finish(&self) {
        self.0.finish_and_clear();
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn write_modes(
    config: PathBuf,
    case: PathBuf,
    threads: Option<usize>,
    serial: bool,
) -> rustpod::Result<()> {
    let config = PodConfig::from_file(config)?;
    let mut ctx = ExecutionContext::new(&case);
    if let Some(n) = threads {
        ctx = ctx.with_threads(n);
    }
    if serial {
        ctx = ctx.serial();
    }

    let bar = ProgressBar::new(config.n_snaps as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let result = run(&config, &ctx, &BarProgress(bar))?;

    tracing::info!("writing pod modes");
    let written = write_results(output_dir(&case), &config, &result)?;
    tracing::info!(
        "wrote {} modes of {} points to {} files",
        result.modes.n_modes(),
        result.modes.n_points(),
        written.len()
    );
    Ok(())
}

fn print_energy(config: PathBuf, case: PathBuf, include_mean: bool) -> rustpod::Result<()> {
    let config = PodConfig::from_file(config)?;
    // Shares refer to the full spectrum, not only the kept modes
    let singular_values = read_spectrum(output_dir(&case), &config)?;
    let skip_mean = !include_mean;
    let energy = energy_percent(&singular_values, skip_mean)?;
    let cumulative = cumulative_energy(&singular_values, skip_mean)?;
    let first = usize::from(skip_mean);

    println!("{:>6} {:>12} {:>10} {:>12}", "mode", "sing. value", "energy %", "cumulative %");
    for (i, (e, c)) in energy.iter().zip(cumulative.iter()).enumerate() {
        let mode = i + first;
        println!(
            "{:>6} {:>12.4e} {:>10.3} {:>12.3}",
            mode + 1,
            singular_values[mode],
            e,
            c
        );
    }
    Ok(())
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Modes {
            config,
            case,
            threads,
            serial,
        } => write_modes(config, case, threads, serial),
        Commands::Energy {
            config,
            case,
            include_mean,
        } => print_energy(config, case, include_mean),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
