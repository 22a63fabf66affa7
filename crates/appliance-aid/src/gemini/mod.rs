//! Gemini API client.
//!
//! A thin adapter over the `models/{model}:generateContent` endpoint: one
//! request per user action, no retries, no caching. The two operations the
//! assistant needs are a multimodal diagnosis and a Maps-grounded technician
//! search.

pub mod prompt;
pub mod wire;

use std::time::Duration;

use tracing::{debug, info};

use crate::config::{ApiConfig, Coordinates};
use crate::error::{Error, Result};
use crate::report::IssueReport;
use crate::technician::{self, PlaceRef, Technician};

use wire::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, Part,
    RetrievalConfig, Tool, ToolConfig,
};

/// Client for the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiKeyMissing`] for a blank key, or an HTTP error if
    /// the underlying client cannot be constructed.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::ApiKeyMissing);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_key,
            model: model.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Create a client from API configuration, resolving the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiKeyMissing`] when no key is configured.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(
            api.resolved_key()?,
            api.model.clone(),
            api.endpoint.clone(),
            api.timeout(),
        )
    }

    /// Request a diagnosis for an issue report.
    ///
    /// Returns the model's Markdown diagnosis text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it, or the
    /// model replies with no text.
    pub async fn diagnose(&self, report: &IssueReport) -> Result<String> {
        info!(
            appliance = report.appliance.id,
            has_photo = report.photo.is_some(),
            "requesting diagnosis"
        );

        let request = diagnosis_request(report);
        let response = self.generate(&request).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }
        debug!(chars = text.len(), "diagnosis received");
        Ok(text)
    }

    /// Find repair technicians near the given coordinates.
    ///
    /// Parses the model's JSON listing and attaches grounded Maps links.
    /// An empty list is a valid result; deciding what to tell the user about
    /// it is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it, or the
    /// reply cannot be parsed as a technician listing.
    pub async fn find_technicians(
        &self,
        appliance_name: &str,
        location: Coordinates,
    ) -> Result<Vec<Technician>> {
        let (raw, places) = self.raw_listings(appliance_name, location).await?;

        let mut technicians = technician::parse_listings(&raw)?;
        technician::attach_place_links(&mut technicians, &places);

        info!(
            count = technicians.len(),
            grounded = places.len(),
            "technician search finished"
        );
        Ok(technicians)
    }

    /// Run the grounded search and return the raw reply text plus the Maps
    /// places it was grounded in.
    async fn raw_listings(
        &self,
        appliance_name: &str,
        location: Coordinates,
    ) -> Result<(String, Vec<PlaceRef>)> {
        info!(appliance = appliance_name, "searching for technicians");

        let request = listing_request(appliance_name, location);
        let response = self.generate(&request).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }

        let places: Vec<PlaceRef> = response
            .maps_chunks()
            .map(|maps| PlaceRef {
                title: maps.title.clone(),
                uri: maps.uri.clone(),
            })
            .collect();
        debug!(places = places.len(), "grounding places received");

        Ok((text, places))
    }

    /// POST a request to the generate endpoint and deserialize the reply.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the API's own message; fall back to the bare status
            let message = match response.json::<ErrorResponse>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => status.to_string(),
            };
            return Err(Error::api(status.as_u16(), message));
        }

        Ok(response.json().await?)
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Build the multimodal diagnosis request. The photo part, when present,
/// precedes the description text.
fn diagnosis_request(report: &IssueReport) -> GenerateContentRequest {
    let mut parts = Vec::new();
    if let Some(photo) = &report.photo {
        parts.push(Part::inline(photo.mime_type.clone(), photo.data.clone()));
    }
    parts.push(Part::text(prompt::issue_text(
        report.appliance.name,
        &report.description,
    )));

    GenerateContentRequest {
        contents: vec![Content { parts }],
        system_instruction: Some(Content::text(prompt::diagnosis_system())),
        tools: None,
        tool_config: None,
    }
}

/// Build the Maps-grounded technician search request.
fn listing_request(appliance_name: &str, location: Coordinates) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::text(prompt::technician_search(appliance_name))],
        system_instruction: None,
        tools: Some(vec![Tool::google_maps()]),
        tool_config: Some(ToolConfig {
            retrieval_config: RetrievalConfig { lat_lng: location },
        }),
    }
}
