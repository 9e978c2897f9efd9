use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use lectern::provider::{CompletionProvider, Message, Role};
use lectern::{LecternConfig, ProviderError};

/// Provider stub that replays a scripted sequence of outcomes and records
/// the user prompt of every call.
pub struct StubProvider {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(
        &self,
        messages: &[Message],
        _temperature: f32,
        _max_output_tokens: u32,
    ) -> Result<String, ProviderError> {
        let user_prompt = messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(user_prompt);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Other("stub script exhausted".into())))
    }
}

/// Config with retries disabled so scripted failures surface immediately.
pub fn test_config() -> LecternConfig {
    let mut config = LecternConfig::default();
    config.retry.max_retries = 0;
    config.retry.rate_limit_delay_secs = 0;
    config.retry.network_delay_secs = 0;
    config.retry.timeout_delay_secs = 0;
    config
}

/// A planner response with two equal-duration topics.
pub const TWO_TOPIC_STRUCTURE: &str = r#"{
    "title": "Distributed Caching",
    "learning_objectives": ["Understand cache invalidation", "Apply eviction policies"],
    "topics": [
        {
            "title": "Invalidation",
            "key_concepts": ["staleness", "write-through"],
            "subtopics": ["TTL", "Purge"],
            "duration_minutes": 10,
            "objective_links": [1]
        },
        {
            "title": "Eviction",
            "key_concepts": ["LRU", "LFU"],
            "subtopics": ["Policies"],
            "duration_minutes": 10,
            "objective_links": [2]
        }
    ],
    "practical_applications": ["Size a cache tier"],
    "key_terms": ["staleness", "LRU"]
}"#;
