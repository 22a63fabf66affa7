//! Wire types for the Gemini `generateContent` API.
//!
//! Only the fields this tool sends and reads are modeled; everything else in
//! the API's JSON is ignored on the way in and omitted on the way out.

use serde::{Deserialize, Serialize};

use crate::config::Coordinates;

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far (a single user message here).
    pub contents: Vec<Content>,
    /// Instructions that frame how the model answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Tools the model may use while answering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    /// Configuration for tool use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

/// An ordered sequence of parts forming one message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// The message parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A content block holding a single text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

/// One piece of a message: text or inline binary data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Plain text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary data (an uploaded photo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    /// A text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline data part.
    #[must_use]
    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded binary data with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type of the data.
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// A tool made available to the model.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// The Google Maps grounding tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps: Option<GoogleMapsTool>,
}

impl Tool {
    /// The Google Maps grounding tool, enabled with its defaults.
    #[must_use]
    pub fn google_maps() -> Self {
        Self {
            google_maps: Some(GoogleMapsTool {}),
        }
    }
}

/// Marker for the Google Maps grounding tool (serializes as `{}`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleMapsTool {}

/// Configuration for tool use.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// Retrieval grounding configuration.
    pub retrieval_config: RetrievalConfig,
}

/// Retrieval grounding configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    /// Coordinates the retrieval is grounded to.
    pub lat_lng: Coordinates,
}

/// Response body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate answers; the first is the one we use.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    ///
    /// Empty when there are no candidates or no text parts.
    #[must_use]
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Maps grounding chunks of the first candidate, skipping untitled ones.
    pub fn maps_chunks(&self) -> impl Iterator<Item = &MapsChunk> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.grounding_metadata.as_ref())
            .map(|metadata| metadata.grounding_chunks.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|chunk| chunk.maps.as_ref())
            .filter(|maps| !maps.title.is_empty())
    }
}

/// One candidate answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The answer content.
    #[serde(default)]
    pub content: Content,
    /// Grounding metadata attached when retrieval tools ran.
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Metadata about how an answer was grounded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Sources the answer was grounded in.
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One grounding source. Non-maps chunk kinds are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    /// A Google Maps place, when this chunk is one.
    #[serde(default)]
    pub maps: Option<MapsChunk>,
}

/// A Google Maps place reference.
#[derive(Debug, Clone, Deserialize)]
pub struct MapsChunk {
    /// Place title (business name).
    #[serde(default)]
    pub title: String,
    /// Link to the place on Google Maps.
    #[serde(default)]
    pub uri: String,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// The error detail.
    pub error: ErrorDetail,
}

/// Detail of an API error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    /// Numeric code, mirroring the HTTP status.
    #[serde(default)]
    pub code: u16,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Symbolic status such as `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: String,
}
