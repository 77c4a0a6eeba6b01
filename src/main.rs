use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use video_insight::api::ApiServer;
use video_insight::colors::KMeansClusterer;
use video_insight::config::Config;
use video_insight::models::providers::{BlipCaptioner, DetrDetector};
use video_insight::pipeline::VideoAnalyzer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("video_insight=info,warn")
        .init();

    let matches = Command::new("video-insight")
        .version("0.1.0")
        .about("AI-assisted video scene analysis and caption synthesis")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("HTTP listen port (overrides config)"),
        )
        .arg(
            Arg::new("video")
                .value_name("VIDEO")
                .help("Analyze a single video file and print the result as JSON"),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(path)?,
        None => {
            let config = Config::default();
            warn!("No config file given, using defaults");
            config
        }
    };

    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }

    let config = Arc::new(config);

    // Collaborators are constructed once and injected everywhere
    let captioner = Arc::new(BlipCaptioner::new(&config.models)?);
    let detector = Arc::new(DetrDetector::new(&config.models)?);
    let clusterer = Arc::new(KMeansClusterer::new(&config.colors));

    if let Some(video) = matches.get_one::<String>("video") {
        let path = PathBuf::from(video);
        info!("🎬 Analyzing {}", path.display());

        let analyzer = VideoAnalyzer::new(captioner, detector, config);
        let result = analyzer.analyze_file(&path).await;

        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    info!("🚀 video-insight starting on port {}", config.server.port);
    let server = ApiServer::new(captioner, detector, clusterer, config);
    server.start().await
}
