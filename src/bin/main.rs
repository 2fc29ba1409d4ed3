use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moviweb-server")]
#[command(about = "Per-user movie list web service", long_about = None)]
struct Args {
    /// YAML config file; defaults to moviweb.yaml when present
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // A missing .env file is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();

    let default_filter = if args.debug {
        "moviweb_rs=debug,tower_http=debug"
    } else {
        "moviweb_rs=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = moviweb_rs::run(args.config.as_deref(), args.debug).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
