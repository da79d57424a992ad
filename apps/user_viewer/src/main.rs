use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod avatar;
mod config;
mod view;

use app::{build_runtime, run_card, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "user-viewer", about = "Fetch one user and show their card")]
struct Args {
    /// Base URL of the users API, e.g. https://reqres.in/api
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Drop results of fetches superseded by a newer one.
    #[arg(long)]
    discard_stale: bool,
    #[arg(long)]
    skip_avatar: bool,
    /// Print delivered payloads as JSON instead of the card.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, mut settings: config::Settings) -> config::Settings {
        if let Some(v) = &self.base_url {
            settings.base_url = config::normalize_base_url(v);
        }
        if let Some(v) = self.user_id {
            settings.user_id = v;
        }
        if let Some(v) = &self.api_key {
            settings.api_key = Some(v.clone());
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = v;
        }
        settings
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let settings = args.apply(config::load_settings());

    let runtime = build_runtime()?;
    let run = run_card(
        &runtime,
        &settings,
        RunOptions {
            discard_stale: args.discard_stale,
            skip_avatar: args.skip_avatar,
        },
    );

    tracing::debug!(
        report = ?run.report,
        view_updates = run.view.updates(),
        "user card run finished"
    );

    if args.json {
        for payload in &run.payloads {
            println!("{}", serde_json::to_string(payload)?);
        }
    } else {
        println!("{}", run.view.render());
    }

    Ok(())
}
