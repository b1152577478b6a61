use std::env;

use flotilla_server::ServerBuilder;
use flotilla_server::config::loader::load_config;
use flotilla_server::observability;

#[tokio::main]
async fn main() {
    // .env is optional; only complain when it exists but cannot be read.
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("warning: could not load .env: {e}");
    }

    observability::init_tracing();

    let (config_path, source) = resolve_config_path();
    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!(path = %config_path, source, "configuration loaded");

    observability::apply_logging_level(&cfg.logging.level);

    let server = match ServerBuilder::new().with_config(cfg).build().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("startup failed: {e}");
            std::process::exit(2);
        }
    };

    if let Err(err) = server.run().await {
        eprintln!("server error: {err}");
    }
}

/// `--config <path>` beats `FLOTILLA_CONFIG` beats `flotilla.toml`.
/// The second element says where the path came from, for the startup log.
fn resolve_config_path() -> (String, &'static str) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config"
            && let Some(path) = args.next()
        {
            return (path, "--config");
        }
    }

    if let Ok(path) = env::var("FLOTILLA_CONFIG")
        && !path.is_empty()
    {
        return (path, "FLOTILLA_CONFIG");
    }

    ("flotilla.toml".to_string(), "default")
}
