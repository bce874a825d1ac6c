use anyhow::{Context, Result};
use clap::Parser;
use glimpse_common::observability::{init_logging, install_panic_hook};
use glimpse_config::{GlimpseConfig, GlimpseConfigLoader};
use tokio::net::TcpListener;

mod wiring;

#[derive(Parser, Debug)]
#[command(version, about = "HTTP façade over a user's posts and stories")]
struct Args {
    /// YAML configuration; skipped when the file does not exist.
    #[arg(short, long, env = "GLIMPSE_CONFIG", default_value = "glimpse.yaml")]
    config: String,

    /// Listen address, overriding `server.bind`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Environment wins over the file.
    let mut cfg: GlimpseConfig = GlimpseConfigLoader::new()
        .with_optional_file(&args.config)
        .load()
        .with_context(|| format!("loading {}", args.config))?;
    if let Some(bind) = args.bind {
        cfg.server.bind = bind;
    }

    let log_path = init_logging(cfg.logging.to_log_config("glimpse"))?;
    install_panic_hook();
    tracing::info!(log = %log_path.display(), config = %args.config, "glimpse.starting");

    let state = wiring::build_state(&cfg)?;

    let listener = TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("binding {}", cfg.server.bind))?;
    glimpse_server::serve(listener, state).await
}
