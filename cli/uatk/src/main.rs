//! uatk CLI — micro-architectural compliance test generator.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "uatk", version, about = "RISC-V Micro-Architectural Test Kit")]
struct Cli {
    /// Log filter level (error, warn, info, debug, trace)
    #[arg(long, short = 'v', global = true, default_value = "info")]
    verbose: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate assembly tests (and optionally covergroups) for the DUT
    Generate {
        /// Path to the TOML file with the DUT configuration
        #[arg(long)]
        dut_config: PathBuf,
        /// Working directory for generated files
        #[arg(long)]
        work_dir: PathBuf,
        /// Comma-separated module list, or 'all'
        #[arg(long, default_value = "all")]
        modules: String,
        /// Also emit the test manifest consumed by the runner
        #[arg(long)]
        test_list: bool,
        /// Emit SystemVerilog covergroups (requires --alias-file)
        #[arg(long)]
        gen_cvg: bool,
        /// Path to the signal alias map for covergroup emission
        #[arg(long)]
        alias_file: Option<PathBuf>,
        /// Directory with a pre-existing link.ld / model_test.h
        #[arg(long)]
        linker_dir: Option<PathBuf>,
    },
    /// Validate runner logs against the generated tests
    Validate {
        /// Path to the TOML file with the DUT configuration
        #[arg(long)]
        dut_config: PathBuf,
        /// Working directory holding tests and logs
        #[arg(long)]
        work_dir: PathBuf,
        /// Comma-separated module list, or 'all'
        #[arg(long, default_value = "all")]
        modules: String,
    },
    /// Remove generated files from the work directory
    Clean {
        /// Working directory to clean
        #[arg(long)]
        work_dir: PathBuf,
    },
    /// List the registered generator modules
    ListModules,
    /// Run clean/generate/coverage/validate as directed by a run-config file
    FromConfig {
        /// Path to a uatk.toml run-config file
        config: PathBuf,
    },
}

/// Initialize the global tracing subscriber. `RUST_LOG` wins over the
/// command-line level when set.
pub(crate) fn init_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        // from-config picks its log level from the file, so it initializes
        // tracing itself.
        Commands::FromConfig { config } => commands::from_config::run(&config),

        command => {
            init_tracing(&cli.verbose);
            match command {
                Commands::Generate {
                    dut_config,
                    work_dir,
                    modules,
                    test_list,
                    gen_cvg,
                    alias_file,
                    linker_dir,
                } => commands::generate::run(
                    &dut_config,
                    &work_dir,
                    &modules,
                    test_list,
                    gen_cvg,
                    alias_file.as_deref(),
                    linker_dir.as_deref(),
                ),

                Commands::Validate {
                    dut_config,
                    work_dir,
                    modules,
                } => commands::validate::run(&dut_config, &work_dir, &modules),

                Commands::Clean { work_dir } => commands::clean::run(&work_dir),

                Commands::ListModules => commands::modules::run(),

                Commands::FromConfig { .. } => unreachable!("handled above"),
            }
        }
    }
}
