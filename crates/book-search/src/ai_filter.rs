//! Optional LLM pass that drops search hits which are not the requested book.
//!
//! The model sees the numbered list of downloadable candidates and answers with a JSON array
//! of the indices to keep. Any failure leaves the list untouched.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::{info, instrument, warn};

use crate::error::{Result, SearchError};
use crate::models::BookCandidate;

const SYSTEM_PROMPT: &str = "You filter book search results. Reply with a JSON array of the \
numbers of the results that are the requested book itself (any edition or language), most \
relevant first. Reply with the array only, for example [0, 2].";

/// Masks an API key for logs: first 7 + "***" + last 4; short keys become "***".
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// OpenAI-compatible relevance filter.
#[derive(Clone)]
pub struct AiFilter {
    client: Client<OpenAIConfig>,
    model: String,
    masked_key: String,
}

impl AiFilter {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Client::with_config(config),
            model,
            masked_key,
        }
    }

    /// Filters `candidates`; external links are always kept and never sent to the model.
    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    pub async fn apply(&self, query: &str, candidates: Vec<BookCandidate>) -> Vec<BookCandidate> {
        let (downloadable, external): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(BookCandidate::is_downloadable);

        if downloadable.len() < 2 {
            return downloadable.into_iter().chain(external).collect();
        }

        let prompt = build_prompt(query, &downloadable);
        let answer = match self.ask(prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "AI filter failed, keeping all results");
                return downloadable.into_iter().chain(external).collect();
            }
        };

        let kept = apply_selection(downloadable, &answer);
        info!(kept = kept.len(), "AI filter applied");
        kept.into_iter().chain(external).collect()
    }

    async fn ask(&self, prompt: String) -> Result<String> {
        info!(model = %self.model, api_key = %self.masked_key, "AI filter request");

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .temperature(0.0)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT.to_string())
                    .build()
                    .map_err(|e| SearchError::Filter(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| SearchError::Filter(e.to_string()))?
                    .into(),
            ])
            .build()
            .map_err(|e| SearchError::Filter(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SearchError::Filter(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| SearchError::Filter("Empty completion".to_string()))
    }
}

/// Numbered list of candidates for the user message.
pub fn build_prompt(query: &str, candidates: &[BookCandidate]) -> String {
    let mut prompt = format!("Requested book: {}\n\nResults:\n", query.trim());
    for (i, c) in candidates.iter().enumerate() {
        let _ = write!(prompt, "{}. {} ({})", i, c.title, c.url);
        if let Some(snippet) = &c.snippet {
            let _ = write!(prompt, " - {}", snippet);
        }
        prompt.push('\n');
    }
    prompt
}

/// Parses the first `[...]` in the answer as indices; out-of-range and repeated indices are dropped.
pub fn parse_selection(answer: &str, len: usize) -> Vec<usize> {
    let (Some(start), Some(end)) = (answer.find('['), answer.rfind(']')) else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }
    let Ok(raw) = serde_json::from_str::<Vec<i64>>(&answer[start..=end]) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|i| usize::try_from(i).ok())
        .filter(|i| *i < len && seen.insert(*i))
        .collect()
}

/// Keeps the selected candidates in the model's order; an empty selection keeps everything.
pub fn apply_selection(candidates: Vec<BookCandidate>, answer: &str) -> Vec<BookCandidate> {
    let selection = parse_selection(answer, candidates.len());
    if selection.is_empty() {
        warn!(answer = %answer, "AI filter answer had no usable indices, keeping all results");
        return candidates;
    }
    let mut slots: Vec<Option<BookCandidate>> = candidates.into_iter().map(Some).collect();
    selection
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
