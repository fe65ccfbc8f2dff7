use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Provider;

/// Maximum characters sent per text to the embedding API.
/// text-embedding-3-small accepts 8 191 tokens; dense code (minified JS,
/// JSON blobs) can run past 2 tokens per char, so 3 000 chars stays clear.
pub const MAX_EMBED_CHARS: usize = 3_000;

/// Truncate `text` to at most `MAX_EMBED_CHARS` bytes, on a UTF-8 char boundary.
pub fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl Provider {
    /// Embed a single text with the configured embedding model.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);
        let req = EmbedRequest {
            model: &self.config.embedding_model,
            input: truncate_for_embedding(text),
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&req)
            .send()
            .await
            .context("Failed to call embeddings API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Embeddings API returned {status}: {body}");
        }

        let body: EmbedResponse = resp
            .json()
            .await
            .context("Failed to parse embeddings response")?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("No embedding returned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> Provider {
        let mut config = ProviderConfig::with_api_key("sk-test");
        config.base_url = server.uri();
        Provider::new(config).unwrap()
    }

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_for_embedding("fn main() {}"), "fn main() {}");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 'é' is two bytes, so byte 3000 falls inside a character
        let text = format!("a{}", "é".repeat(2000));
        let truncated = truncate_for_embedding(&text);
        assert!(truncated.len() <= MAX_EMBED_CHARS);
        assert_eq!(truncated.len(), 2999);
    }

    #[tokio::test]
    async fn test_embed_posts_model_and_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "text-embedding-3-small",
                "input": "fn login() {}"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "embedding": [0.25, 0.5, 0.75] }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let embedding = provider(&server).embed("fn login() {}").await.unwrap();
        assert_eq!(embedding, vec![0.25, 0.5, 0.75]);
    }

    #[tokio::test]
    async fn test_embed_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = provider(&server).embed("x").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("401"), "{message}");
        assert!(message.contains("invalid api key"), "{message}");
    }

    #[tokio::test]
    async fn test_embed_empty_data_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        assert!(provider(&server).embed("x").await.is_err());
    }
}
