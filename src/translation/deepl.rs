use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::provider::{ProviderFailure, ProviderOptions, TranslationProvider};

/// DeepL Pro API host.
pub const PRO_ENDPOINT: &str = "https://api.deepl.com";

/// DeepL Free API host.
pub const FREE_ENDPOINT: &str = "https://api-free.deepl.com";

/// DeepL-specific "Quota Exceeded" status.
const QUOTA_EXCEEDED: u16 = 456;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a [String],
    source_lang: &'a str,
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    formality: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    #[serde(default)]
    text: String,
}

/// Character usage of the current billing period.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    pub character_count: u64,
    pub character_limit: u64,
}

/// HTTP client for the DeepL v2 API.
pub struct DeepLClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DeepLClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint.trim_end_matches('/'))
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Fetches account usage. Used to validate the key before any work.
    pub async fn usage(&self) -> Result<Usage, ProviderFailure> {
        let url = self.url("/v2/usage");
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| ProviderFailure::Other(format!("Failed to connect to {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status, &body));
        }

        response
            .json::<Usage>()
            .await
            .map_err(|e| ProviderFailure::Other(format!("Invalid usage response: {e}")))
    }
}

impl TranslationProvider for DeepLClient {
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        options: &ProviderOptions,
    ) -> Result<Vec<String>, ProviderFailure> {
        let url = self.url("/v2/translate");
        let request = TranslateRequest {
            text: texts,
            source_lang: source_language,
            target_lang: target_language,
            formality: options.formality.map(super::Formality::as_str),
            context: options.context.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderFailure::Other(format!("Failed to connect to {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status, &body));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::Other(format!("Invalid translate response: {e}")))?;

        Ok(body.translations.into_iter().map(|t| t.text).collect())
    }
}

/// Maps a non-success HTTP status to a failure class.
fn classify(status: StatusCode, body: &str) -> ProviderFailure {
    match status.as_u16() {
        401 | 403 => ProviderFailure::Unauthorized,
        QUOTA_EXCEEDED => ProviderFailure::QuotaExceeded,
        429 => ProviderFailure::RateLimited,
        _ if body.trim().is_empty() => {
            ProviderFailure::Other(format!("API request failed with status {status}"))
        }
        _ => ProviderFailure::Other(format!(
            "API request failed with status {status}: {}",
            body.trim()
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::Formality;

    #[test]
    fn test_classify_auth_failures() {
        assert_eq!(classify(StatusCode::FORBIDDEN, ""), ProviderFailure::Unauthorized);
        assert_eq!(classify(StatusCode::UNAUTHORIZED, ""), ProviderFailure::Unauthorized);
    }

    #[test]
    fn test_classify_quota_and_rate_limit() {
        let quota = StatusCode::from_u16(456).unwrap();
        assert_eq!(classify(quota, ""), ProviderFailure::QuotaExceeded);
        assert_eq!(
            classify(StatusCode::TOO_MANY_REQUESTS, ""),
            ProviderFailure::RateLimited
        );
    }

    #[test]
    fn test_classify_other_includes_body() {
        let failure = classify(StatusCode::BAD_GATEWAY, " upstream down \n");
        let ProviderFailure::Other(message) = failure else {
            panic!("expected Other");
        };
        assert!(message.contains("502"));
        assert!(message.ends_with("upstream down"));
    }

    #[test]
    fn test_request_serialization_omits_unset_options() {
        let texts = vec!["Hello".to_string()];
        let request = TranslateRequest {
            text: &texts,
            source_lang: "EN",
            target_lang: "DE",
            formality: None,
            context: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": ["Hello"], "source_lang": "EN", "target_lang": "DE"})
        );
    }

    #[test]
    fn test_request_serialization_with_options() {
        let texts = vec!["Hello".to_string(), "Bye".to_string()];
        let request = TranslateRequest {
            text: &texts,
            source_lang: "EN",
            target_lang: "DE",
            formality: Some(Formality::Less.as_str()),
            context: Some("Greeting"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["formality"], "less");
        assert_eq!(json["context"], "Greeting");
        assert_eq!(json["text"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_response_parsing_keeps_order() {
        let body: TranslateResponse = serde_json::from_str(
            r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"},{"text":""}]}"#,
        )
        .unwrap();
        let texts: Vec<_> = body.translations.into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Hallo", ""]);
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = DeepLClient::new("https://api-free.deepl.com/".to_string(), "k".to_string());
        assert_eq!(client.url("/v2/usage"), "https://api-free.deepl.com/v2/usage");
        assert_eq!(client.auth_header(), "DeepL-Auth-Key k");
    }
}
