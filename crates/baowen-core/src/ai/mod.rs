pub mod providers;

mod dispatcher;
mod generator;
mod normalizer;

pub use dispatcher::{Dispatcher, ProviderMode};
pub use generator::{Generator, FAILURE_TITLE};
pub use normalizer::normalize;

use serde::{Deserialize, Serialize};

/// A generated article. Paragraphs in `content` are separated by blank
/// lines; inline emphasis uses `**text**` markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// Prompt pair sent to a provider, built fresh for every call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Truncate on a char boundary without allocating.
pub(crate) fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}
