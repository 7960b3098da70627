//! In-character reasoning text from the LLM.

use async_trait::async_trait;
use std::sync::Arc;

use crate::infrastructure::ports::{
    ChatMessage, LlmError, LlmPort, LlmRequest, NarrativePort, ReasoningRequest,
};

const NARRATIVE_TEMPERATURE: f32 = 0.8;
const NARRATIVE_MAX_TOKENS: u32 = 100;

/// [`NarrativePort`] over any [`LlmPort`].
pub struct LlmNarrator {
    llm: Arc<dyn LlmPort>,
}

impl LlmNarrator {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }
}

fn build_prompt(request: &ReasoningRequest) -> String {
    format!(
        "You are {name}. Generate a 1-2 sentence in-character reason why you want to spend \
         money on \"{subject}\".\n\n\
         Category: {category}\n\
         Your personality: {traits}\n\
         Your money beliefs: {beliefs}\n\n\
         Speak naturally as {name}. Be direct and in character. Don't start with \"I\" - vary \
         your sentence structure.",
        name = request.character_name,
        subject = request.subject_description,
        category = request.category,
        traits = request.personality_traits.join(", "),
        beliefs = request.money_beliefs.join(", "),
    )
}

#[async_trait]
impl NarrativePort for LlmNarrator {
    async fn reasoning(&self, request: &ReasoningRequest) -> Result<String, LlmError> {
        let llm_request = LlmRequest::new(vec![ChatMessage::user(build_prompt(request))])
            .with_temperature(NARRATIVE_TEMPERATURE)
            .with_max_tokens(Some(NARRATIVE_MAX_TOKENS));

        let response = self.llm.generate(llm_request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse(
                "Empty reasoning from LLM".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}
