use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::{
    assets::encoded::EncodedImage,
    foundation::{
        error::{AlbumError, AlbumResult},
        math::truncate_identifier,
    },
    service::{RestyleRequest, StyleService},
};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an error body quoted back in a service error.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    /// Defaults, with `GEMINI_API_BASE` and `GEMINI_API_KEY` / `GOOGLE_API_KEY` from the
    /// environment.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(base) = non_empty_env("GEMINI_API_BASE") {
            cfg.api_base = base.trim_end_matches('/').to_string();
        }
        cfg.api_key = non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("GOOGLE_API_KEY"));
        cfg
    }

    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!(
            "{}/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model_path
        )
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Restyles portraits through the Gemini `generateContent` image API.
#[derive(Clone, Debug)]
pub struct GeminiStyleService {
    config: GeminiConfig,
    http: reqwest::blocking::Client,
}

impl GeminiStyleService {
    pub fn new(config: GeminiConfig) -> AlbumResult<Self> {
        if config.model.trim().is_empty() {
            return Err(AlbumError::validation("gemini model name is empty"));
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AlbumError::service(format!("build http client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// POST to the model endpoint. The key travels in a sensitive header, never in the URL.
    fn request(
        &self,
        api_key: &str,
        payload: &GenerateRequest,
    ) -> AlbumResult<reqwest::blocking::RequestBuilder> {
        let mut key = reqwest::header::HeaderValue::from_str(api_key)
            .map_err(|_| AlbumError::service("gemini api key is not a valid header value"))?;
        key.set_sensitive(true);
        Ok(self
            .http
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, key)
            .json(payload))
    }
}

/// Service error for a transport failure, with the request URL stripped.
fn transport_error(what: &str, err: reqwest::Error) -> AlbumError {
    AlbumError::service(format!("gemini {what} failed: {}", err.without_url()))
}

impl StyleService for GeminiStyleService {
    fn name(&self) -> &str {
        "gemini"
    }

    fn restyle(&self, request: &RestyleRequest<'_>) -> AlbumResult<EncodedImage> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AlbumError::service("GEMINI_API_KEY or GOOGLE_API_KEY not set"))?;
        let payload = build_payload(request);

        tracing::debug!(
            style = %request.style.name,
            variation = request.variation,
            model = %self.config.model,
            "gemini request"
        );
        let response = self
            .request(api_key, &payload)?
            .send()
            .map_err(|e| transport_error("request", e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| transport_error("read response body", e))?;
        if !status.is_success() {
            return Err(AlbumError::service(format!(
                "gemini returned {}: {}",
                status.as_u16(),
                truncate_identifier(&body.replace(api_key, "[redacted]"), MAX_ERROR_BODY_CHARS)
            )));
        }
        parse_response(&body)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        default,
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Request body: the portrait as inline data followed by the prompt text.
pub(crate) fn build_payload(request: &RestyleRequest<'_>) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: Some(request.portrait.mime().to_string()),
                        data: BASE64.encode(request.portrait.bytes()),
                    }),
                },
                Part {
                    text: Some(request.prompt()),
                    inline_data: None,
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE".to_string()],
        },
    }
}

/// First inline image across all candidates.
pub(crate) fn parse_response(body: &str) -> AlbumResult<EncodedImage> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| AlbumError::service(format!("invalid gemini response: {e}")))?;

    let inline = response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.inline_data.as_ref())
        .find(|d| !d.data.is_empty())
        .ok_or_else(|| AlbumError::service("gemini returned no image"))?;

    let bytes = BASE64
        .decode(inline.data.as_bytes())
        .map_err(|e| AlbumError::service(format!("gemini image base64 decode failed: {e}")))?;

    match inline.mime_type.as_deref().map(str::trim) {
        Some(mime) if mime.starts_with("image/") => Ok(EncodedImage::from_bytes(mime, bytes)),
        _ => EncodedImage::from_bytes_sniffed(bytes)
            .map_err(|e| AlbumError::service(format!("gemini returned an unknown image: {e}"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/gemini.rs"]
mod tests;
