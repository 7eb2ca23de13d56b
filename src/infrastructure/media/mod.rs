use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub mod ffprobe;

pub use ffprobe::FfprobeProber;

/// One stream as reported by the prober.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub display_aspect_ratio: Option<String>,
}

impl StreamDescriptor {
    pub fn with_aspect_ratio(ratio: &str) -> Self {
        Self {
            codec_type: Some("video".to_string()),
            display_aspect_ratio: Some(ratio.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    #[error("Couldn't run prober: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prober exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Malformed prober output: {0}")]
    MalformedOutput(#[from] serde_json::Error),
}

/// Inspects a local media file. Callers must only hand over fully written,
/// synced files.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>, ProbeError>;
}
