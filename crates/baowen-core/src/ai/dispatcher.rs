use std::sync::Arc;

use tracing::{info, warn};

use super::providers::{DeepseekProvider, OpenAiProvider, TextProvider};
use super::GenerationRequest;
use crate::config::AiConfig;
use crate::{Error, Result};

/// Provider selection mode, from the `API_PROVIDER` environment variable
/// or the `[ai] provider` config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    /// Try DeepSeek first, fall back to OpenAI
    Auto,
    /// DeepSeek only, no fallback
    Deepseek,
    /// OpenAI only, no fallback
    OpenAi,
}

impl ProviderMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "deepseek" => Self::Deepseek,
            "openai" => Self::OpenAi,
            "auto" | "" => Self::Auto,
            other => {
                warn!("Unknown provider mode '{}', using auto", other);
                Self::Auto
            }
        }
    }
}

/// Tries providers in a fixed order, stopping at the first success.
///
/// Each attempt is atomic from the dispatcher's point of view: the
/// provider either yields raw text or fails within its own timeout.
pub struct Dispatcher {
    attempts: Vec<Arc<dyn TextProvider>>,
}

impl Dispatcher {
    /// Build the attempt list for the configured mode. Fails when no API
    /// key is present, before any network call is made.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("API密钥未配置".to_string()))?;

        let mode = ProviderMode::parse(&config.provider);
        info!("API provider configured as: {:?}", mode);

        let deepseek =
            || Arc::new(DeepseekProvider::new(api_key, config)) as Arc<dyn TextProvider>;
        let openai = || Arc::new(OpenAiProvider::new(api_key, config)) as Arc<dyn TextProvider>;

        let attempts = match mode {
            ProviderMode::Deepseek => vec![deepseek()],
            ProviderMode::OpenAi => vec![openai()],
            ProviderMode::Auto => vec![deepseek(), openai()],
        };

        Ok(Self { attempts })
    }

    /// Build a dispatcher from an explicit attempt list.
    pub fn new(attempts: Vec<Arc<dyn TextProvider>>) -> Self {
        Self { attempts }
    }

    /// Return the first successful provider's raw text. When every
    /// attempt fails, the combined error names each provider's reason.
    pub async fn dispatch(&self, request: &GenerationRequest) -> Result<String> {
        let mut reasons = Vec::new();

        for provider in &self.attempts {
            info!("Calling {} provider", provider.name());
            match provider.complete(request).await {
                Ok(text) => {
                    info!(
                        "{} provider returned {} chars",
                        provider.name(),
                        text.chars().count()
                    );
                    return Ok(text);
                }
                Err(e) => {
                    warn!("{} provider failed: {}", provider.name(), e);
                    reasons.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        Err(Error::AiProvider(reasons.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticProvider {
        name: &'static str,
        response: std::result::Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn ok(name: &'static str, text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                response: Ok(text),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str, reason: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                response: Err(reason),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TextProvider for StaticProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn complete(&self, _request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Ok(text) => Ok(text.to_string()),
                Err(reason) => Err(Error::AiProvider(reason.to_string())),
            }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "system".to_string(),
            user_prompt: "user".to_string(),
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(ProviderMode::parse("auto"), ProviderMode::Auto);
        assert_eq!(ProviderMode::parse("DeepSeek"), ProviderMode::Deepseek);
        assert_eq!(ProviderMode::parse("OPENAI"), ProviderMode::OpenAi);
        assert_eq!(ProviderMode::parse("unknown"), ProviderMode::Auto);
        assert_eq!(ProviderMode::parse(""), ProviderMode::Auto);
    }

    #[test]
    fn test_forced_mode_builds_single_attempt() {
        let mut config = AiConfig::default();
        config.api_key = Some("sk-test".to_string());

        config.provider = "openai".to_string();
        assert_eq!(Dispatcher::from_config(&config).unwrap().attempts.len(), 1);

        config.provider = "auto".to_string();
        assert_eq!(Dispatcher::from_config(&config).unwrap().attempts.len(), 2);
    }

    #[test]
    fn test_missing_api_key_fails_before_network() {
        let config = AiConfig::default();
        let result = Dispatcher::from_config(&config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let first = StaticProvider::ok("deepseek", "first");
        let second = StaticProvider::ok("openai", "second");
        let dispatcher =
            Dispatcher::new(vec![first.clone() as Arc<dyn TextProvider>, second.clone()]);

        let text = dispatcher.dispatch(&request()).await.unwrap();
        assert_eq!(text, "first");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_to_second_provider() {
        let first = StaticProvider::failing("deepseek", "timeout");
        let second = StaticProvider::ok("openai", "rescued");
        let dispatcher =
            Dispatcher::new(vec![first.clone() as Arc<dyn TextProvider>, second.clone()]);

        let text = dispatcher.dispatch(&request()).await.unwrap();
        assert_eq!(text, "rescued");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn test_combined_failure_keeps_both_reasons() {
        let first = StaticProvider::failing("deepseek", "timeout");
        let second = StaticProvider::failing("openai", "status 401");
        let dispatcher = Dispatcher::new(vec![first as Arc<dyn TextProvider>, second]);

        let err = dispatcher.dispatch(&request()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("deepseek"));
        assert!(message.contains("timeout"));
        assert!(message.contains("openai"));
        assert!(message.contains("status 401"));
    }

    #[tokio::test]
    async fn test_single_attempt_has_no_fallback() {
        let only = StaticProvider::failing("deepseek", "connection refused");
        let dispatcher = Dispatcher::new(vec![only.clone() as Arc<dyn TextProvider>]);

        let err = dispatcher.dispatch(&request()).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(only.call_count(), 1);
    }
}
