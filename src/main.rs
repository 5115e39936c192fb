use clap::Parser;
use mouserec_api::{ApiConfig, RestApi};
use mouserec_similarity::{RankerConfig, Recommender, RecommenderConfig, WeightBandScope};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Content-based mouse recommender
#[derive(Parser, Debug)]
#[command(name = "mouserec")]
#[command(about = "Recommends computer mice by cosine similarity", long_about = None)]
struct Args {
    /// Path to the catalog CSV
    #[arg(short, long, default_value = "Data_Mouse.csv")]
    catalog: PathBuf,

    /// Image folder the catalog references are checked against
    #[arg(long, default_value = "img")]
    image_dir: PathBuf,

    /// Additional folders searched when serving images
    #[arg(long, default_value = "static/img")]
    extra_image_dir: Vec<PathBuf>,

    /// Front-end folder
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// HTTP API port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    http_port: u16,

    /// Number of recommendations per request
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Compute weight bands over the whole catalog instead of the filtered subset
    #[arg(long)]
    weight_bands_over_catalog: bool,

    /// Deployment environment reported by /health
    #[arg(long, env = "APP_ENV", default_value = "development")]
    environment: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting MouseRec v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.catalog);
    info!("Image directory: {:?}", args.image_dir);
    info!("HTTP API port: {}", args.http_port);

    let weight_band_scope = if args.weight_bands_over_catalog {
        WeightBandScope::Catalog
    } else {
        WeightBandScope::Filtered
    };
    let recommender = Arc::new(Recommender::open(RecommenderConfig {
        catalog_path: args.catalog.clone(),
        image_dir: args.image_dir.clone(),
        ranker: RankerConfig { weight_band_scope },
    }));

    let mut image_dirs = vec![args.image_dir.clone()];
    image_dirs.extend(args.extra_image_dir.iter().cloned());
    let api_config = ApiConfig {
        port: args.http_port,
        static_dir: args.static_dir.clone(),
        image_dirs,
        top_n: args.top_n,
        environment: args.environment.clone(),
    };

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(recommender, api_config).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("MouseRec started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
