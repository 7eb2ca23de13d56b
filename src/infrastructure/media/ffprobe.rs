//! `ffprobe` wrapper.

use super::{MediaProber, ProbeError, StreamDescriptor};
use async_trait::async_trait;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<StreamDescriptor>,
}

#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: String,
}

impl FfprobeProber {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>, ProbeError> {
        debug!("Probing {} with {}", path.display(), self.binary);

        // v:0 makes the first reported stream the first video stream
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-print_format",
                "json",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ProbeError::ToolNotFound(self.binary.clone()),
                _ => ProbeError::Io(e),
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_streams(&output.stdout)
    }
}

fn parse_streams(stdout: &[u8]) -> Result<Vec<StreamDescriptor>, ProbeError> {
    let parsed: FfprobeOutput = serde_json::from_slice(stdout)?;
    Ok(parsed.streams)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stream_list() {
        let json = br#"{
            "streams": [
                {
                    "index": 0,
                    "codec_name": "h264",
                    "codec_type": "video",
                    "width": 1280,
                    "height": 720,
                    "display_aspect_ratio": "16:9"
                }
            ]
        }"#;

        let streams = parse_streams(json).unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].display_aspect_ratio.as_deref(), Some("16:9"));
        assert_eq!(streams[0].width, Some(1280));
    }

    #[test]
    fn missing_streams_is_empty() {
        assert!(parse_streams(b"{}").unwrap().is_empty());
    }

    #[test]
    fn garbage_output_is_malformed() {
        assert!(matches!(
            parse_streams(b"not json"),
            Err(ProbeError::MalformedOutput(_))
        ));
    }

    #[tokio::test]
    async fn missing_binary_is_tool_not_found() {
        let prober = FfprobeProber::new("tubely-no-such-ffprobe");
        let err = prober.probe(Path::new("whatever.mp4")).await.unwrap_err();
        assert!(matches!(err, ProbeError::ToolNotFound(_)));
    }
}
