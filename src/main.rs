use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roomify::auth::{AuthContext, Identity, LocalAuth};
use roomify::common::config::{load_config, ConfigOverrides};
use roomify::common::UploadStage;
use roomify::handoff::Handoff;
use roomify::ingest::{DragEvent, FileHandle, PickerEvent, PickerFilter, Uploader};
use roomify::output::{self, Selection};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomify")]
#[command(about = "Upload a floor-plan image for visualization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one image and print the visualizer route when done
    Upload(UploadArgs),
}

#[derive(clap::Args)]
struct UploadArgs {
    #[arg(help = "Floor-plan image (.jpg, .jpeg, .png)")]
    file: PathBuf,

    /// Sign in as this user before uploading
    #[arg(long)]
    user: Option<String>,

    /// Deliver the file as a drag-and-drop instead of through the picker
    #[arg(long)]
    drop: bool,

    /// Write the encoded data URI here
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    step: Option<u8>,

    #[arg(long)]
    interval_ms: Option<u64>,

    #[arg(long)]
    redirect_delay_ms: Option<u64>,

    #[arg(long)]
    max_size_mb: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Upload(args) => upload(args).await,
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn upload(args: UploadArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        progress_step: args.step,
        progress_interval_ms: args.interval_ms,
        redirect_delay_ms: args.redirect_delay_ms,
        max_file_size_mb: args.max_size_mb,
    };
    let config = load_config(&overrides)?;
    init_tracing(&config.log.level);

    let auth = match args.user {
        Some(name) => {
            let auth = LocalAuth::signed_out(Identity::named(name));
            auth.sign_in().await.context("Sign in failed")?;
            auth
        }
        None => LocalAuth::anonymous(),
    };
    if let Some(greeting) = auth.greeting() {
        println!("{greeting}");
    }
    println!("{}", output::dropzone_prompt(auth.is_signed_in()));
    println!("{}", output::size_help(&config.upload));

    let file = FileHandle::open(&args.file)?;
    let file_name = file.name().to_string();

    let (done_tx, mut done_rx) = oneshot::channel();
    let uploader = Uploader::new(Arc::new(auth), config.upload.clone(), move |payload| {
        let _ = done_tx.send(Handoff::new(payload));
    });

    if args.drop {
        let mut hover = DragEvent::hover();
        uploader.on_drag_over(&mut hover);
        uploader.on_drop(DragEvent::new(vec![file]))?;
    } else {
        let filter = PickerFilter::from_settings(uploader.settings());
        if !filter.accepts(&file) {
            bail!("{file_name} is not one of {}", filter.accept_attr());
        }
        uploader.select_via_picker(PickerEvent::single(file))?;
    }

    match output::selection(&uploader.snapshot()) {
        Selection::Started => {}
        Selection::Ignored => {
            println!("Nothing uploaded. Pass --user to sign in.");
            return Ok(());
        }
        Selection::Failed(reason) => bail!(reason),
    }

    let pb = output::progress_bar(&file_name);
    let mut snapshots = uploader.subscribe();

    loop {
        tokio::select! {
            handoff = &mut done_rx => {
                let handoff = handoff.context("Uploader stopped before completing")?;
                output::finish_success(&pb, output::REDIRECTING);
                if let Some(out) = &args.out {
                    tokio::fs::write(out, handoff.payload().as_str())
                        .await
                        .with_context(|| format!("Failed to write payload to {}", out.display()))?;
                }
                println!("{}", handoff.route());
                return Ok(());
            }
            changed = snapshots.changed() => {
                changed.context("Uploader stopped publishing progress")?;
                let snapshot = snapshots.borrow_and_update().clone();
                output::render(&pb, &snapshot);
                if snapshot.stage == UploadStage::Failed {
                    let reason = snapshot.failure.unwrap_or_else(|| "read failed".to_string());
                    output::finish_error(&pb, &reason);
                    bail!(reason);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                uploader.cancel_handle().cancel();
                output::finish_error(&pb, "Cancelled");
                return Ok(());
            }
        }
    }
}
