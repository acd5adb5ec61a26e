use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::image::EncodedImage;

// --- Aspect Ratio ---

/// Output frame shape. `16:9` unless the user picks otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    #[default]
    Landscape,
    Square,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Landscape,
        AspectRatio::Square,
        AspectRatio::Portrait,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "9:16",
        }
    }

    /// The following preset, wrapping around after `9:16`.
    pub fn next(self) -> Self {
        match self {
            AspectRatio::Landscape => AspectRatio::Square,
            AspectRatio::Square => AspectRatio::Portrait,
            AspectRatio::Portrait => AspectRatio::Landscape,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported aspect ratio {0:?} (expected 16:9, 1:1 or 9:16)")]
pub struct ParseAspectRatioError(String);

impl FromStr for AspectRatio {
    type Err = ParseAspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| ParseAspectRatioError(s.to_owned()))
    }
}

// --- Generation Request ---

/// One submission. Built fresh per attempt and consumed by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    image: Option<EncodedImage>,
    aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    pub fn new(
        prompt: impl Into<String>,
        image: Option<EncodedImage>,
        aspect_ratio: AspectRatio,
    ) -> Result<Self, GenerationError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        Ok(Self {
            prompt,
            image,
            aspect_ratio,
        })
    }

    pub fn with_image(mut self, image: EncodedImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        self.image.as_ref()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    /// The `predictLongRunning` body for this request.
    pub fn to_wire<'a>(&'a self, person_generation: Option<&'a str>) -> VeoRequest<'a> {
        VeoRequest {
            instances: vec![Instance {
                prompt: &self.prompt,
                image: self.image.as_ref(),
            }],
            parameters: Parameters {
                person_generation,
                aspect_ratio: self.aspect_ratio.as_str(),
                sample_count: 1,
            },
        }
    }
}

// --- Veo API Structures ---

#[derive(Serialize, Debug)]
pub struct VeoRequest<'a> {
    instances: Vec<Instance<'a>>,
    parameters: Parameters<'a>,
}

#[derive(Serialize, Debug)]
struct Instance<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a EncodedImage>,
}

#[derive(Serialize, Debug)]
struct Parameters<'a> {
    #[serde(rename = "personGeneration", skip_serializing_if = "Option::is_none")]
    person_generation: Option<&'a str>,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: &'a str,
    #[serde(rename = "sampleCount")]
    sample_count: u32,
}

/// Long-running operation handle, as returned by submit and by each status check.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub response: Option<VeoResponse>,
    #[serde(default)]
    pub error: Option<OperationError>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }

    /// URI of the first generated video, if the operation produced one.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .as_ref()?
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct VeoResponse {
    #[serde(rename = "generateVideoResponse", default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GenerateVideoResponse {
    #[serde(rename = "generatedSamples", default)]
    pub generated_samples: Option<Vec<GeneratedSample>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<Video>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Video {
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}
