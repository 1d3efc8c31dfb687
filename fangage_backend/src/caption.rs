use crate::config::CaptionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The tone the composer uses when the caller does not pick one.
pub const DEFAULT_TONE: &str = "exciting and engaging";

#[derive(Clone)]
pub struct CaptionClient {
    config: CaptionConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Error)]
enum CaptionError {
    #[error("caption request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl CaptionClient {
    pub fn new(config: CaptionConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Always produces a usable string. Without an API key the caption is a
    /// deterministic mock; with one, any failure degrades to a fixed error
    /// sentence. Callers never see what went wrong, only the trace does.
    pub async fn generate(&self, topic: &str, tone: &str) -> String {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::warn!("no Gemini API key configured, returning mock caption");
            return mock_caption(topic, tone);
        };

        match self.request_caption(api_key, topic, tone).await {
            Ok(Some(text)) => text,
            Ok(None) => "Could not generate content.".to_string(),
            Err(err) => {
                tracing::error!(error = %err, "Gemini caption request failed");
                "Error generating caption. Please check your API configuration.".to_string()
            }
        }
    }

    async fn request_caption(
        &self,
        api_key: &str,
        topic: &str,
        tone: &str,
    ) -> Result<Option<String>, CaptionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: caption_prompt(topic, tone),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read body".to_string());
            return Err(CaptionError::Status { status, body });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(first_text(parsed))
    }
}

fn caption_prompt(topic: &str, tone: &str) -> String {
    format!(
        "Write a social media caption for a post about: \"{topic}\". \
         The tone should be {tone}. Include 3 relevant hashtags. \
         Keep it under 280 characters."
    )
}

fn mock_caption(topic: &str, tone: &str) -> String {
    format!(
        "[Mock AI Output]: Here is a catchy caption about \"{topic}\" written in a {tone} tone. \
         Don't forget to like and subscribe! #fangage #content"
    )
}

fn first_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_yields_the_mock_caption() {
        let client = CaptionClient::new(CaptionConfig::default(), reqwest::Client::new());
        let caption = client.generate("Launch", DEFAULT_TONE).await;
        assert!(caption.starts_with("[Mock AI Output]"));
        assert!(caption.contains("Launch"));
        assert!(caption.contains(DEFAULT_TONE));
    }

    #[test]
    fn prompt_carries_topic_tone_and_limit() {
        let prompt = caption_prompt("Summer Sale", "playful");
        assert!(prompt.contains("\"Summer Sale\""));
        assert!(prompt.contains("playful"));
        assert!(prompt.contains("280 characters"));
    }

    #[test]
    fn blank_responses_count_as_no_text() {
        assert!(first_text(GenerateContentResponse { candidates: vec![] }).is_none());

        let blank = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![CandidatePart {
                        text: Some("   ".into()),
                    }],
                }),
            }],
        };
        assert!(first_text(blank).is_none());

        let real = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![CandidatePart {
                        text: Some("A caption".into()),
                    }],
                }),
            }],
        };
        assert_eq!(first_text(real).as_deref(), Some("A caption"));
    }
}
