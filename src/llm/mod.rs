//! Client for an OpenAI-compatible provider: embeddings, chat completions
//! and a model listing used as a liveness probe.

pub mod completion;
pub mod embeddings;

use std::fmt;
use std::time::Duration;

use crate::config::ProviderConfig;

pub use completion::ChatMessage;

#[derive(Clone)]
pub struct Provider {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl Provider {
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { http, config })
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("config", &self.config).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_hides_api_key() {
        let provider = Provider::new(ProviderConfig::with_api_key("sk-live-secret")).unwrap();
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("sk-live-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("gpt-4o-mini"));
    }
}
