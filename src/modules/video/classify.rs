use crate::infrastructure::media::StreamDescriptor;
use serde::Serialize;
use std::fmt;

/// Coarse shape of a video, used to namespace its storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Landscape,
    Portrait,
    Other,
}

impl AspectClass {
    /// Exact match only: "16:9" and "9:16". Everything else, including an
    /// empty string, is `Other`.
    pub fn from_ratio(ratio: &str) -> Self {
        match ratio {
            "16:9" => AspectClass::Landscape,
            "9:16" => AspectClass::Portrait,
            _ => AspectClass::Other,
        }
    }

    /// Classifies by the first stream only; later streams are ignored.
    pub fn from_streams(streams: &[StreamDescriptor]) -> Self {
        streams
            .first()
            .and_then(|s| s.display_aspect_ratio.as_deref())
            .map(Self::from_ratio)
            .unwrap_or(AspectClass::Other)
    }

    pub fn key_prefix(self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        }
    }
}

impl fmt::Display for AspectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_ratios() {
        assert_eq!(AspectClass::from_ratio("16:9"), AspectClass::Landscape);
        assert_eq!(AspectClass::from_ratio("9:16"), AspectClass::Portrait);
    }

    #[test]
    fn anything_else_is_other() {
        for ratio in ["", "4:3", "1:1", "16:10", " 16:9", "16:9 ", "32:18", "9:16:1", "other"] {
            assert_eq!(AspectClass::from_ratio(ratio), AspectClass::Other, "{:?}", ratio);
        }
    }

    #[test]
    fn only_first_stream_counts() {
        let streams = vec![
            StreamDescriptor::with_aspect_ratio("4:3"),
            StreamDescriptor::with_aspect_ratio("16:9"),
        ];
        assert_eq!(AspectClass::from_streams(&streams), AspectClass::Other);

        let streams = vec![
            StreamDescriptor::with_aspect_ratio("9:16"),
            StreamDescriptor::with_aspect_ratio("16:9"),
        ];
        assert_eq!(AspectClass::from_streams(&streams), AspectClass::Portrait);
    }

    #[test]
    fn no_streams_or_no_ratio_is_other() {
        assert_eq!(AspectClass::from_streams(&[]), AspectClass::Other);
        assert_eq!(
            AspectClass::from_streams(&[StreamDescriptor::default()]),
            AspectClass::Other
        );
    }

    #[test]
    fn prefixes() {
        assert_eq!(AspectClass::Landscape.to_string(), "landscape");
        assert_eq!(AspectClass::Portrait.key_prefix(), "portrait");
        assert_eq!(AspectClass::Other.key_prefix(), "other");
    }
}
