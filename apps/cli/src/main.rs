//! sideload CLI entry point.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use sideload_client::{EngineOptions, Outcome, PushEngine};
use sideload_protocol::Dialect;
use sideload_protocol::constants::DEFAULT_PORT;
use sideload_transfer::TransferRequest;

#[derive(Parser)]
#[command(name = "sideload")]
#[command(about = "Push an application package to a listening device peer")]
#[command(version)]
struct Cli {
    /// Peer host name or IP address
    host: String,

    /// Package file to push
    file: PathBuf,

    /// Peer port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Outbound message framing
    #[arg(long, value_enum, default_value_t = DialectArg::Json)]
    dialect: DialectArg,

    /// Skip content digest computation
    #[arg(long)]
    no_hash: bool,

    /// Per-receive timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Json,
    Legacy,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Json => Dialect::Json,
            DialectArg::Legacy => Dialect::Legacy,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(cli).await {
        Ok(Outcome::Succeeded) => {
            println!("transfer and install succeeded");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Failed(e)) => {
            eprintln!("upload failed: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Outcome> {
    if cli.file.extension().and_then(|e| e.to_str()) != Some("apk") {
        tracing::warn!(file = %cli.file.display(), "file does not look like an APK, pushing anyway");
    }

    let request = TransferRequest::from_path(&cli.file, !cli.no_hash)?;
    if let Some(digest) = &request.digest {
        tracing::info!(name = %request.name, size = request.size, %digest, "prepared transfer");
    }

    let options = EngineOptions {
        dialect: cli.dialect.into(),
        response_timeout: Duration::from_secs(cli.timeout),
    };
    let mut engine = PushEngine::connect(&cli.host, cli.port, options).await?;

    // Ctrl-C closes the session from whatever state the engine is in.
    let cancel = engine.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling transfer");
            cancel.cancel();
        }
    });

    // Drain progress events into a carriage-return status line.
    let printer = match engine.take_events() {
        Some(mut events) => tokio::spawn(async move {
            let mut printed = false;
            while let Some(ev) = events.recv().await {
                print!(
                    "\rtransfer: {:.1}% ({}/{} bytes)",
                    ev.percent, ev.sent, ev.total
                );
                let _ = std::io::stdout().flush();
                printed = true;
            }
            if printed {
                println!();
            }
        }),
        None => tokio::spawn(async {}),
    };

    let outcome = engine.upload(&request).await;
    engine.close().await;
    drop(engine);
    let _ = printer.await;

    Ok(outcome)
}
