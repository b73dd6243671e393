mod cmd;
mod config;
mod dns;
mod repository;

use clap::Parser;

fn init_logs(debug_level: u8) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, registry, EnvFilter};

    let default_directive = match debug_level {
        0 => "error",
        1 => "info",
        _ => "debug",
    };

    let _ = registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("{}={default_directive}", env!("CARGO_PKG_NAME")).into()
        }))
        .with(fmt::layer().with_ansi(cfg!(debug_assertions)))
        .try_init();
}

#[tokio::main]
async fn main() {
    let args = cmd::Args::parse();
    let config = config::Config::load(args.config_path());
    init_logs(config.debug_level);
    dns::run(config).await;
}
