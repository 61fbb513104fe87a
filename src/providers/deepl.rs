use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use log::{debug, error};

use crate::errors::ProviderError;
use crate::glossary::GlossaryEntries;
use crate::language_utils;
use super::{RemoteGlossary, TranslationBackend, Usage};

/// Endpoint for paid DeepL API accounts
pub const PRO_ENDPOINT: &str = "https://api.deepl.com";

/// Endpoint for free DeepL API accounts (keys ending in `:fx`)
pub const FREE_ENDPOINT: &str = "https://api-free.deepl.com";

/// DeepL client for interacting with the DeepL API
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
}

/// Translate request body
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Texts to translate
    text: Vec<&'a str>,

    /// Source language; omitted for detection
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,

    /// Target language
    target_lang: String,

    /// Glossary to apply
    #[serde(skip_serializing_if = "Option::is_none")]
    glossary_id: Option<&'a str>,
}

/// Translate response body
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    /// One translation per input text
    pub translations: Vec<TextResult>,
}

/// A single translated text
#[derive(Debug, Deserialize)]
pub struct TextResult {
    /// Language DeepL detected in the input
    #[serde(default)]
    pub detected_source_language: Option<String>,

    /// The translated text
    pub text: String,
}

/// Glossary listing body
#[derive(Debug, Deserialize)]
struct GlossaryList {
    glossaries: Vec<RemoteGlossary>,
}

/// Glossary creation body
#[derive(Debug, Serialize)]
struct CreateGlossaryRequest<'a> {
    name: &'a str,
    source_lang: String,
    target_lang: String,
    entries: String,
    entries_format: &'static str,
}

impl DeepL {
    /// Create a new DeepL client
    ///
    /// An empty `endpoint` picks the free or paid API from the shape of the key.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        let endpoint = endpoint.into();
        let endpoint = if endpoint.trim().is_empty() {
            Self::default_endpoint(&api_key).to_string()
        } else {
            endpoint.trim().trim_end_matches('/').to_string()
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    /// API base URL for a key
    pub fn default_endpoint(api_key: &str) -> &'static str {
        if api_key.trim().ends_with(":fx") {
            FREE_ENDPOINT
        } else {
            PRO_ENDPOINT
        }
    }

    /// API base URL in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/{}", self.endpoint, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
    }

    /// Send a request and return the successful response
    async fn send(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let response = self.authorized(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(map_status(status, error_text));
        }

        Ok(response)
    }

    /// Send a request and decode its JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let response = self.send(request).await?;
        response.json::<T>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse DeepL API response: {}", e)))
    }
}

impl fmt::Debug for DeepL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepL")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TranslationBackend for DeepL {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        glossary: Option<&RemoteGlossary>,
    ) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            text: vec![text],
            source_lang: language_utils::deepl_source_code(source_lang),
            target_lang: language_utils::deepl_target_code(target_lang),
            glossary_id: glossary.map(|g| g.glossary_id.as_str()),
        };

        let response: TranslateResponse = self
            .send_json(self.client.post(self.url("translate")).json(&request))
            .await?;

        let translation = response.translations.into_iter().next()
            .ok_or_else(|| ProviderError::ParseError("DeepL returned no translations".to_string()))?;
        if let Some(detected) = &translation.detected_source_language {
            debug!("DeepL detected source language {}", detected);
        }
        Ok(translation.text)
    }

    async fn list_glossaries(&self) -> Result<Vec<RemoteGlossary>, ProviderError> {
        let list: GlossaryList = self
            .send_json(self.client.get(self.url("glossaries")))
            .await?;
        Ok(list.glossaries)
    }

    async fn create_glossary(
        &self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: &GlossaryEntries,
    ) -> Result<RemoteGlossary, ProviderError> {
        let request = CreateGlossaryRequest {
            name,
            source_lang: language_utils::glossary_code(source_lang),
            target_lang: language_utils::glossary_code(target_lang),
            entries: entries_to_tsv(entries),
            entries_format: "tsv",
        };

        self.send_json(self.client.post(self.url("glossaries")).json(&request))
            .await
    }

    async fn delete_glossary(&self, glossary: &RemoteGlossary) -> Result<(), ProviderError> {
        let path = format!("glossaries/{}", glossary.glossary_id);
        self.send(self.client.delete(self.url(&path))).await?;
        Ok(())
    }

    async fn get_usage(&self) -> Result<Usage, ProviderError> {
        self.send_json(self.client.get(self.url("usage"))).await
    }
}

/// Serialize entries in DeepL's TSV glossary format, one `source\ttarget` per line
pub fn entries_to_tsv(entries: &GlossaryEntries) -> String {
    entries.iter()
        .map(|(source, target)| format!("{}\t{}", tsv_field(source), tsv_field(target)))
        .collect::<Vec<_>>()
        .join("\n")
}

// Tabs and line breaks would split an entry
fn tsv_field(term: &str) -> String {
    term.replace(['\t', '\r', '\n'], " ")
}

/// Map a non-success HTTP status to a provider error
pub fn map_status(status: StatusCode, message: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(message),
        429 => ProviderError::RateLimitExceeded(message),
        456 => ProviderError::QuotaExceeded(message),
        code => ProviderError::ApiError { status_code: code, message },
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_connect() || e.is_timeout() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(format!("Failed to send request to DeepL API: {}", e))
    }
}
