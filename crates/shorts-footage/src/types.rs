//! Footage search response types.

use serde::{Deserialize, Serialize};

/// A search hit as seen by the selector, independent of the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderVideo {
    pub id: String,
    /// Reported duration in seconds
    pub duration_seconds: f64,
    /// Reported frame rate, if the provider knows it
    pub frame_rate: Option<f64>,
    /// Downloadable renditions
    pub files: Vec<VideoFile>,
}

/// One downloadable rendition of a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    /// Quality label ("hd", "sd", "uhd")
    pub quality: Option<String>,
    pub width: u32,
    pub height: u32,
    pub link: String,
}

/// Pexels `/videos/search` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub videos: Option<Vec<PexelsVideo>>,
}

/// Pexels video object (only the fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct PexelsVideo {
    pub id: serde_json::Value,
    pub duration: f64,
    #[serde(default)]
    pub video_files: Vec<PexelsVideoFile>,
}

/// Pexels video file object.
#[derive(Debug, Clone, Deserialize)]
pub struct PexelsVideoFile {
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    pub link: String,
}

impl From<PexelsVideo> for ProviderVideo {
    fn from(video: PexelsVideo) -> Self {
        // Pexels reports frame rate per file; the first file stands for the clip.
        let frame_rate = video.video_files.first().and_then(|f| f.fps);

        let id = match video.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        Self {
            id,
            duration_seconds: video.duration,
            frame_rate,
            files: video
                .video_files
                .into_iter()
                .map(|f| VideoFile {
                    quality: f.quality,
                    width: f.width.unwrap_or(0),
                    height: f.height.unwrap_or(0),
                    link: f.link,
                })
                .collect(),
        }
    }
}
