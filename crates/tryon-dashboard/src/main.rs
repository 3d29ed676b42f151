//! `tryon` binary: submit try-on requests and follow their results.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use tryon_client::{ImageUpload, ListParams, TryOnApi, TryOnClient};
use tryon_dashboard::render::{render_history, render_state};
use tryon_dashboard::{logging, Dashboard, DashboardConfig, PollState, UploadForm};
use tryon_models::{Pose, RequestId};

/// Virtual try-on dashboard.
#[derive(Debug, Parser)]
#[command(author, version, about = "Upload a person photo and a garment to preview a virtual try-on")]
struct Cli {
    /// API base URL (overrides TRYON_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a person image and a garment image
    Submit {
        /// Photo of the person
        #[arg(long)]
        person: PathBuf,
        /// Photo of the garment
        #[arg(long)]
        garment: PathBuf,
        /// front, side or three-quarter
        #[arg(long)]
        pose: Option<Pose>,
        /// Print the request id and exit instead of following the result
        #[arg(long)]
        no_watch: bool,
    },
    /// Show the status of a request
    Status {
        id: RequestId,
        /// Keep polling until the request finishes
        #[arg(long)]
        watch: bool,
    },
    /// List recent requests
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Check that the service is up
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = DashboardConfig::from_env();
    if let Some(url) = cli.api_url {
        config.client.base_url = url;
    }

    let client = TryOnClient::new(&config.client).context("invalid client configuration")?;
    info!(base_url = client.base_url(), "Using try-on service");
    let api = Arc::new(client);

    match cli.command {
        Command::Submit {
            person,
            garment,
            pose,
            no_watch,
        } => {
            let form = UploadForm::new(pose.unwrap_or(config.default_pose))
                .with_person(load_image(&person).await?)
                .with_garment(load_image(&garment).await?);

            let mut dashboard = Dashboard::new(api, &config)?;
            let request_id = match dashboard.submit(&form).await {
                Ok(id) => id,
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    return Ok(ExitCode::FAILURE);
                }
            };
            println!("Created try-on request #{}", request_id);

            if no_watch {
                dashboard.clear();
                return Ok(ExitCode::SUCCESS);
            }
            follow(&dashboard).await
        }
        Command::Status { id, watch } => {
            let mut dashboard = Dashboard::new(api, &config)?;
            dashboard.show(id);
            if watch {
                return follow(&dashboard).await;
            }

            // One snapshot: wait for the first fetch only
            let mut rx = dashboard
                .current()
                .context("no request is being displayed")?
                .subscribe();
            while matches!(*rx.borrow_and_update(), PollState::Loading) {
                if rx.changed().await.is_err() {
                    break;
                }
            }
            let state = rx.borrow().clone();
            dashboard.clear();
            println!("{}", render_state(&state, dashboard.static_base()));
            Ok(exit_code(&state))
        }
        Command::List { skip, limit } => {
            let static_base = config.client.static_base()?;
            let requests = api.list(ListParams { skip, limit }).await?;
            println!("{}", render_history(&requests, &static_base));
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let health = api.health().await?;
            println!(
                "{} (version {}, poses: {})",
                health.status,
                health.version,
                health.supported_poses.join(", ")
            );
            Ok(if health.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

async fn load_image(path: &Path) -> Result<ImageUpload> {
    ImageUpload::from_path(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Re-render the panel on every snapshot until the displayed request ends.
async fn follow(dashboard: &Dashboard<TryOnClient>) -> Result<ExitCode> {
    let handle = dashboard
        .current()
        .context("no request is being displayed")?;
    let static_base = dashboard.static_base();

    let mut last_rendered = None;
    let state = handle
        .follow(|state| {
            let panel = render_state(state, static_base);
            if last_rendered.as_ref() != Some(&panel) {
                println!("{}\n", panel);
                last_rendered = Some(panel);
            }
        })
        .await;

    Ok(exit_code(&state))
}

fn exit_code(state: &PollState) -> ExitCode {
    match state {
        PollState::Failed(_) | PollState::Errored(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
