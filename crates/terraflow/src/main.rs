mod commands;
mod utils;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tflow")]
#[command(about = "Queue terraform commands and run them in order, resuming where they stopped", long_about = None)]
struct Cli {
    /// Show debug logs (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct PlanArgs {
    /// Plan file (discovered from the current directory when omitted)
    #[arg(short, long)]
    plan: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the queued actions, resuming at the last failed one
    Run {
        #[command(flatten)]
        plan: PlanArgs,
        /// Terraform configuration directory (overrides code_path)
        #[arg(short, long)]
        code_path: Option<PathBuf>,
        /// Terraform executable (overrides binary)
        #[arg(short, long, env = "TERRAFLOW_BIN")]
        bin: Option<String>,
        /// Ignore saved state and start from the first action
        #[arg(long, conflicts_with = "from")]
        reset: bool,
        /// Start from this action index
        #[arg(long)]
        from: Option<usize>,
    },
    /// Print the command line of every queued action
    Args {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Show which actions are done, next and pending
    Status {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Forget saved progress
    Reset {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Version => {
            println!("terraflow {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Run {
            plan,
            code_path,
            bin,
            reset,
            from,
        } => {
            let loaded = terraflow_config::load_plan_or_discover(plan.plan.as_deref())?;
            let start = if let Some(index) = from {
                commands::run::Start::At(index)
            } else if reset {
                commands::run::Start::Fresh
            } else {
                commands::run::Start::Resume
            };
            commands::run::handle(&loaded, code_path, bin, start).await?;
        }
        Commands::Args { plan } => {
            let loaded = terraflow_config::load_plan_or_discover(plan.plan.as_deref())?;
            commands::args::handle(&loaded)?;
        }
        Commands::Status { plan } => {
            let loaded = terraflow_config::load_plan_or_discover(plan.plan.as_deref())?;
            commands::status::handle(&loaded).await?;
        }
        Commands::Reset { plan } => {
            let loaded = terraflow_config::load_plan_or_discover(plan.plan.as_deref())?;
            commands::reset::handle(&loaded).await?;
        }
    }

    Ok(())
}
