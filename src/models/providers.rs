//! HTTP providers for the caption and detection model sidecars.
//!
//! The models themselves run out of process (BLIP-style captioner, DETR-style
//! detector) behind a small inference server; these providers speak its wire
//! protocol: a multipart POST carrying the raw RGB24 frame plus dimensions,
//! JSON back.

use super::{Captioner, Detection, Detector};
use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::frame::Frame;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: String,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    detections: Vec<Detection>,
}

fn frame_form(frame: &Frame) -> Form {
    Form::new()
        .part("pixels", Part::bytes(frame.pixels.clone()))
        .text("width", frame.width.to_string())
        .text("height", frame.height.to_string())
        .text("format", "rgb24")
}

fn map_request_error(err: reqwest::Error) -> ModelError {
    if err.is_connect() {
        ModelError::Unavailable(err.to_string())
    } else {
        ModelError::Transient(err.to_string())
    }
}

/// BLIP-style caption sidecar client
pub struct BlipCaptioner {
    endpoint: String,
    client: reqwest::Client,
}

impl BlipCaptioner {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            endpoint: config.caption_endpoint.clone(),
            client,
        })
    }
}

#[async_trait]
impl Captioner for BlipCaptioner {
    async fn describe(&self, frame: &Frame) -> Result<String, ModelError> {
        let url = format!("{}/describe", self.endpoint);
        debug!("Requesting caption from {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(frame_form(frame))
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Transient(format!(
                "caption sidecar error {}: {}",
                status, text
            )));
        }

        let body: CaptionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Transient(e.to_string()))?;

        Ok(body.caption)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.endpoint);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// DETR-style detection sidecar client
pub struct DetrDetector {
    endpoint: String,
    client: reqwest::Client,
}

impl DetrDetector {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            endpoint: config.detection_endpoint.clone(),
            client,
        })
    }
}

#[async_trait]
impl Detector for DetrDetector {
    async fn detect(
        &self,
        frame: &Frame,
        recall_threshold: f64,
    ) -> Result<Vec<Detection>, ModelError> {
        let url = format!("{}/detect", self.endpoint);
        debug!("Requesting detections from {}", url);

        let form = frame_form(frame).text("threshold", recall_threshold.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Transient(format!(
                "detection sidecar error {}: {}",
                status, text
            )));
        }

        let body: DetectResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Transient(e.to_string()))?;

        Ok(body.detections)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.endpoint);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
