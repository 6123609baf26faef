//! Command-line interface for db2-cdc-harness
//!
//! # Usage Examples
//!
//! ## Capture service
//! ```bash
//! # Start the capture service and wait until it reports running
//! db2-cdc-harness capture start --container db2server
//!
//! # Print the observed service state
//! db2-cdc-harness capture status
//!
//! # Re-initialize after registration changes and sit out the
//! # propagation delay
//! db2-cdc-harness capture refresh --wait
//! ```
//!
//! ## Table registration
//! ```bash
//! # Register a table for capture and mark it active
//! db2-cdc-harness table enable --schema DB2INST1 --table ORDERS --wait
//!
//! # Flip an already-registered table off and on (each includes the
//! # propagation delay)
//! db2-cdc-harness table deactivate --schema DB2INST1 --table ORDERS
//! db2-cdc-harness table activate --schema DB2INST1 --table ORDERS
//! ```
//!
//! All timing knobs (poll interval, retry budgets, propagation delay) are
//! flags; see `--help`. Connection settings default to the containerized
//! test profile and can also come from `DB2_CDC_*` environment variables.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use db2_cdc_harness::capture::{CaptureService, CaptureTimings, DockerChannel, TableRegistry};
use db2_cdc_harness::convergence::{Outcome, Pause, PropagationDelay, TokioSleeper};
use db2_cdc_harness::{Db2Opts, TimingOpts};

#[derive(Parser)]
#[command(name = "db2-cdc-harness")]
#[command(about = "Drive Db2 ASN change data capture into known states")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Control the whole-database capture service
    Capture {
        #[command(subcommand)]
        command: CaptureCommand,

        #[command(flatten)]
        db2: Db2Opts,

        #[command(flatten)]
        timings: TimingOpts,
    },

    /// Manage per-table capture registrations
    Table {
        #[command(subcommand)]
        command: TableCommand,

        #[command(flatten)]
        db2: Db2Opts,

        #[command(flatten)]
        timings: TimingOpts,
    },
}

#[derive(Subcommand)]
enum CaptureCommand {
    /// Start the capture service and poll until it reports running
    Start,
    /// Stop the capture service (fire-and-forget)
    Stop,
    /// Print the observed capture service state
    Status,
    /// Re-initialize the capture service
    Refresh {
        /// Also sit out the propagation delay afterwards
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum TableCommand {
    /// Register a table for capture and mark it active
    Enable {
        /// Schema the table lives in
        #[arg(long)]
        schema: String,

        /// Table to register
        #[arg(long)]
        table: String,

        /// Also sit out the propagation delay afterwards
        #[arg(long)]
        wait: bool,
    },

    /// Remove a table from capture
    Disable {
        /// Schema the table lives in
        #[arg(long)]
        schema: String,

        /// Table to remove
        #[arg(long)]
        table: String,

        /// Also sit out the propagation delay afterwards
        #[arg(long)]
        wait: bool,
    },

    /// Mark a registered table active (includes the propagation delay)
    Activate {
        /// Schema the table lives in
        #[arg(long)]
        schema: String,

        /// Table to activate
        #[arg(long)]
        table: String,
    },

    /// Mark a registered table inactive (includes the propagation delay)
    Deactivate {
        /// Schema the table lives in
        #[arg(long)]
        schema: String,

        /// Table to deactivate
        #[arg(long)]
        table: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture {
            command,
            db2,
            timings,
        } => {
            let timings = timings.to_timings()?;
            let service = new_service(&db2, timings);

            match command {
                CaptureCommand::Start => match service.start().await? {
                    Outcome::Converged { attempts } => {
                        tracing::info!("Capture service running after {attempts} status checks");
                    }
                    Outcome::Interrupted => {
                        anyhow::bail!("interrupted before the capture service reported running")
                    }
                },
                CaptureCommand::Stop => service.stop().await?,
                CaptureCommand::Status => {
                    let state = service.status().await?;
                    println!("{state}");
                }
                CaptureCommand::Refresh { wait } => {
                    if wait {
                        propagated(service.refresh_and_wait().await?)?;
                    } else {
                        service.refresh().await?;
                    }
                }
            }
        }
        Commands::Table {
            command,
            db2,
            timings,
        } => {
            let timings = timings.to_timings()?;
            let registry = TableRegistry::new(new_service(&db2, timings));

            match command {
                TableCommand::Enable {
                    schema,
                    table,
                    wait,
                } => {
                    registry.enable_table(&schema, &table).await?;
                    if wait {
                        propagated(
                            PropagationDelay::new(timings.propagation_delay)
                                .wait(&TokioSleeper)
                                .await,
                        )?;
                    }
                }
                TableCommand::Disable {
                    schema,
                    table,
                    wait,
                } => {
                    registry.disable_table(&schema, &table).await?;
                    if wait {
                        propagated(
                            PropagationDelay::new(timings.propagation_delay)
                                .wait(&TokioSleeper)
                                .await,
                        )?;
                    }
                }
                TableCommand::Activate { schema, table } => {
                    propagated(registry.set_table_active(&schema, &table, true).await?)?;
                }
                TableCommand::Deactivate { schema, table } => {
                    propagated(registry.set_table_active(&schema, &table, false).await?)?;
                }
            }
        }
    }

    Ok(())
}

fn new_service(db2: &Db2Opts, timings: CaptureTimings) -> CaptureService<DockerChannel> {
    CaptureService::new(Arc::new(db2.channel()), timings, Arc::new(TokioSleeper))
}

fn propagated(pause: Pause) -> anyhow::Result<()> {
    match pause {
        Pause::Elapsed => Ok(()),
        Pause::Interrupted => anyhow::bail!("interrupted during the propagation delay"),
    }
}
