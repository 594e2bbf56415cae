use tracing::{error, info};

use super::{normalize, truncate_chars, Article, Dispatcher, GenerationRequest};
use crate::config::AppConfig;
use crate::{Error, Result};

/// Title of the sentinel article returned when generation fails. The HTTP
/// boundary detects failure by comparing against this, not by status code.
pub const FAILURE_TITLE: &str = "生成失败";

/// How much of an upstream failure reason makes it into the user-visible
/// message.
const REASON_DISPLAY_CHARS: usize = 500;

const SYSTEM_PROMPT: &str = r#"# 角色
你是一位专业的情感类公众号爆文创作专家，在自媒体内容创作领域经验丰富。你擅长情感类故事创作、人物塑造、叙事结构设计以及打造爆款标题，能精准捕捉读者心理需求，将日常情感故事转化为极具吸引力的爆款内容，把情感冲突与共鸣点完美融合。

## 目标
创作高质量的情感类爆款文章。确保文章情节跌宕起伏，人物形象生动立体，文案精准戳中读者痛点，引发强烈情感共鸣，进而提升文章阅读量、转发量，推动公众号粉丝增长。

## 技能
### 技能 1: 构建冲突情节
精通情感类爆款文章创作技巧，能迅速构建充满冲突感的故事情节。

### 技能 2: 引发读者共鸣
深入了解读者心理，知晓如何通过文章内容激发目标读者的共鸣。

### 技能 3: 制作爆款标题
具备出色的标题制作能力，可撰写极具吸引力、能吸引眼球的爆款标题。

### 技能 4: 选择叙事手法
熟悉多种不同风格的叙事手法，能依据文章主题挑选合适的表达方式。

## 工作流
### 工作流 1: 确定主题与受众
明确文章的核心主题和目标受众，详细确定情感冲突点、人物设定、故事背景等关键要素。

### 工作流 2: 创作标题
创作富有吸引力的标题，保证标题具有强烈的冲突感和好奇心驱动力。

### 工作流 3: 构建情节
构建完整的故事情节，做到开头引人入胜，中间冲突明显，结尾有反转或情感升华。

### 工作流 4: 优化文章
对文章进行全面优化，调整叙事节奏、人物对话和情感描写，使文章符合公众号爆款风格要求，且篇幅达到 1500 - 2000 字。

### 工作流 5: 挑选段落
创作完成后每隔1个段落，在这个段落中挑选一个表达段落重点的文字或词语，用strong来修饰。

## 输出格式
文章需包含引人入胜的开头、冲突感强的正文内容、情感升华的结尾，以及合理的排版与分段。正文中不要包含标题。
以JSON格式返回，含title和content两个字段，不要包含json代码块那种字符，strong要保留。

## 限制
- 文章创作必须遵守微信平台内容规范，确保内容积极健康、符合主流价值观。
- 叙事要自然流畅，语言应口语化、亲民，避免过于文艺或学术化的表述。
- 文章整体风格要契合目标读者群体的阅读习惯。
- 去掉引人入胜的开头、有冲突感的正文内容、情感升华的结尾"#;

/// Single entry point for article generation. Owns the prompt template,
/// drives the dispatcher, and always returns an article: every failure
/// is collapsed into a sentinel-titled article carrying the reason.
pub struct Generator {
    dispatcher: Option<Dispatcher>,
}

impl Generator {
    /// Resolve providers once from configuration. A missing API key does
    /// not fail construction; it surfaces per-call as the sentinel article.
    pub fn new(config: &AppConfig) -> Self {
        let dispatcher = match Dispatcher::from_config(&config.ai) {
            Ok(dispatcher) => Some(dispatcher),
            Err(e) => {
                error!("Article generation unavailable: {}", e);
                None
            }
        };

        Self { dispatcher }
    }

    /// Generate an article for the topic. Never fails; check the title
    /// against [`FAILURE_TITLE`] to detect an unsuccessful result.
    pub async fn generate(&self, topic: &str) -> Article {
        info!("Generating article for topic: {}", topic);

        match self.try_generate(topic).await {
            Ok(article) => article,
            Err(e) => {
                error!("Article generation failed: {}", e);
                failure_article(&e.to_string())
            }
        }
    }

    async fn try_generate(&self, topic: &str) -> Result<Article> {
        let dispatcher = self
            .dispatcher
            .as_ref()
            .ok_or_else(|| Error::Config("API密钥未配置".to_string()))?;

        let request = build_request(topic);
        let raw = dispatcher.dispatch(&request).await?;
        Ok(normalize(&raw))
    }
}

fn build_request(topic: &str) -> GenerationRequest {
    GenerationRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: format!("请根据主题\"{}\"创作一篇爆款文章。", topic),
    }
}

fn failure_article(reason: &str) -> Article {
    Article {
        title: FAILURE_TITLE.to_string(),
        content: format!(
            "生成文章时出错，请确保API密钥有效并重试。 错误信息: {}",
            truncate_chars(reason, REASON_DISPLAY_CHARS)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::providers::TextProvider;
    use std::sync::Arc;

    struct StaticProvider {
        name: &'static str,
        response: std::result::Result<&'static str, &'static str>,
    }

    #[async_trait::async_trait]
    impl TextProvider for StaticProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn complete(&self, _request: &GenerationRequest) -> Result<String> {
            match self.response {
                Ok(text) => Ok(text.to_string()),
                Err(reason) => Err(Error::AiProvider(reason.to_string())),
            }
        }
    }

    fn generator_with(attempts: Vec<Arc<dyn TextProvider>>) -> Generator {
        Generator {
            dispatcher: Some(Dispatcher::new(attempts)),
        }
    }

    #[test]
    fn test_user_prompt_interpolates_topic() {
        let request = build_request("婆媳关系");
        assert_eq!(request.user_prompt, "请根据主题\"婆媳关系\"创作一篇爆款文章。");
        assert!(request.system_prompt.contains("情感类公众号爆文创作专家"));
    }

    #[tokio::test]
    async fn test_generate_is_total() {
        let generator = Generator { dispatcher: None };
        let article = generator.generate("任何主题").await;
        assert!(!article.title.is_empty());
        assert!(!article.content.is_empty());
        assert_eq!(article.title, FAILURE_TITLE);
        assert!(article.content.contains("API密钥未配置"));
    }

    #[tokio::test]
    async fn test_fallback_result_comes_from_second_provider() {
        let generator = generator_with(vec![
            Arc::new(StaticProvider {
                name: "deepseek",
                response: Err("timeout"),
            }),
            Arc::new(StaticProvider {
                name: "openai",
                response: Ok(r#"{"title":"备用标题","content":"备用正文"}"#),
            }),
        ]);

        let article = generator.generate("主题").await;
        assert_eq!(article.title, "备用标题");
        assert_eq!(article.content, "备用正文");
    }

    #[tokio::test]
    async fn test_forced_mode_failure_embeds_reason() {
        // Single-attempt list models a forced provider: no fallback happens.
        let generator = generator_with(vec![Arc::new(StaticProvider {
            name: "deepseek",
            response: Err("simulated timeout"),
        })]);

        let article = generator.generate("主题").await;
        assert_eq!(article.title, FAILURE_TITLE);
        assert!(article.content.contains("simulated timeout"));
    }

    #[tokio::test]
    async fn test_malformed_output_is_recovered_not_failed() {
        let generator = generator_with(vec![Arc::new(StaticProvider {
            name: "deepseek",
            response: Ok("这不是JSON 《抢救回来的标题》 但有内容"),
        })]);

        let article = generator.generate("主题").await;
        assert_eq!(article.title, "抢救回来的标题");
        assert_ne!(article.title, FAILURE_TITLE);
    }
}
