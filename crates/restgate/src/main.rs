//! The restgate binary.

use std::path::PathBuf;

use anyhow::Context;
use restgate::config::ConfigLoader;
use restgate::telemetry::init_telemetry;
use restgate::Gateway;

/// Default configuration file, read when present.
const DEFAULT_CONFIG_FILE: &str = "restgate.toml";

/// Prefix of environment overrides.
const ENV_PREFIX: &str = "RESTGATE";

struct Args {
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => config = args.next().map(PathBuf::from),
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("restgate {}", restgate::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config }
    }
}

fn print_help() {
    println!(
        r"restgate - verb-based REST gateway

USAGE:
    restgate [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Configuration file (TOML or JSON); defaults to ./restgate.toml if present
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    RESTGATE__SERVER__HTTP_ADDR              Listen address (default: 0.0.0.0:8080)
    RESTGATE__SERVER__REST_PREFIX            URL prefix of REST routes (default: /rest)
    RESTGATE__DISPATCH__DEFAULT_FORMAT       json or xml (default: json)
    RESTGATE__DISPATCH__TUNNELING_ENABLED    Allow POST verb tunneling (default: true)
    RESTGATE__TELEMETRY__LOGGING__LEVEL      Log filter (default: info)
    RESTGATE__TELEMETRY__METRICS__ENABLED    Serve Prometheus metrics (default: false)

EXAMPLES:
    restgate --config /etc/restgate/restgate.toml
    RESTGATE__SERVER__HTTP_ADDR=127.0.0.1:3000 restgate
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loader = ConfigLoader::new().with_dotenv();
    let loader = match &args.config {
        Some(path) => loader
            .with_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE)?,
    };
    let config = loader
        .with_env_prefix(ENV_PREFIX)
        .load()
        .context("invalid configuration")?;

    init_telemetry(&config.telemetry.to_telemetry_config())
        .context("initializing telemetry")?;

    tracing::info!(
        version = restgate::VERSION,
        addr = %config.server.http_addr,
        prefix = %config.server.rest_prefix,
        "starting restgate"
    );

    Gateway::demo(config)
        .into_server()
        .run()
        .await
        .context("server failed")?;

    Ok(())
}
