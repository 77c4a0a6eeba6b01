//! REST API for the video analysis service.
//!
//! Accepts video and image uploads, runs them through the analysis pipeline
//! and returns structured results.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::models::{Captioner, ColorClusterer, Detector};

pub mod handlers;
pub mod models;
pub mod server;

/// API server owning the shared collaborator handles.
pub struct ApiServer {
    captioner: Arc<dyn Captioner>,
    detector: Arc<dyn Detector>,
    clusterer: Arc<dyn ColorClusterer>,
    config: Arc<Config>,
}

impl ApiServer {
    pub fn new(
        captioner: Arc<dyn Captioner>,
        detector: Arc<dyn Detector>,
        clusterer: Arc<dyn ColorClusterer>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            captioner,
            detector,
            clusterer,
            config,
        }
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        let port = self.config.server.port;
        info!("🚀 Starting API server on port {}", port);

        server::start_http_server(
            self.captioner,
            self.detector,
            self.clusterer,
            self.config,
        )
        .await
    }
}
