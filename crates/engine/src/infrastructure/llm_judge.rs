//! Judge adjudication through the LLM.
//!
//! The judge must answer with a JSON object `{"choice": "A".."E", "ruling": "..."}`.
//! Every deviation is an error; there is no retry and no default grade.

use async_trait::async_trait;
use blankwars_domain::{JudgeGrade, JudgeProfile};
use serde::Deserialize;
use std::sync::Arc;

use crate::infrastructure::ports::{
    ChatMessage, JudgeError, JudgeInput, JudgePort, JudgeVerdict, LlmPort, LlmRequest,
};

const JUDGE_TEMPERATURE: f32 = 0.7;

/// [`JudgePort`] over any [`LlmPort`].
pub struct LlmJudge {
    llm: Arc<dyn LlmPort>,
}

impl LlmJudge {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    choice: Option<String>,
    ruling: Option<String>,
}

fn build_prompt(judge: &JudgeProfile, input: &JudgeInput) -> String {
    let consequences = input
        .grade_consequences
        .iter()
        .map(|(grade, line)| format!("{}: {}", grade, line))
        .collect::<Vec<_>>()
        .join("\n");
    let fp = &input.personality;

    format!(
        "You are {judge_name}, presiding judge of the BlankWars financial court.\n\
         Your personality: {judge_traits}\n\
         Your background: {backstory}\n\n\
         Evaluate this financial decision by {name} ({traits}).\n\n\
         DECISION\n\
         - Category: {category}\n\
         - Subject: {subject}\n\
         - Amount: ${amount}\n\
         - Risky: {risky}\n\
         - {name}'s reasoning: \"{reasoning}\"\n\n\
         WHAT HAPPENED\n\
         - The coach chose to {coach}.\n\
         - {name} chose to {character}.\n\
         - Result: the decision was {outcome}.\n\n\
         FINANCES BEFORE THE DECISION\n\
         - Wallet: ${wallet}\n\
         - Debt: ${debt}\n\
         - Financial stress: {stress}/100\n\
         - Spending style: {style}, wisdom {wisdom}, risk tolerance {risk}, \
         luxury desire {luxury}, generosity {generosity}\n\n\
         Choose one grade. Each grade has these consequences:\n\
         {consequences}\n\n\
         Respond ONLY with a JSON object: {{\"choice\": \"<A-E>\", \"ruling\": \"<1-3 sentences in your voice>\"}}",
        judge_name = judge.name,
        judge_traits = judge.personality_traits.join(", "),
        backstory = judge.backstory,
        name = input.character_name,
        traits = input.personality_traits.join(", "),
        category = input.category,
        subject = input.subject_description,
        amount = input.amount,
        risky = if input.is_risky { "yes" } else { "no" },
        reasoning = input.character_reasoning,
        coach = input.coach_response.as_str().replace('_', " "),
        character = input.character_response,
        outcome = input.outcome,
        wallet = input.wallet_before,
        debt = input.debt_before,
        stress = input.financial_stress,
        style = fp.spending_style,
        wisdom = fp.financial_wisdom,
        risk = fp.risk_tolerance,
        luxury = fp.luxury_desire,
        generosity = fp.generosity,
        consequences = consequences,
    )
}

/// Strict parse of the judge's reply.
fn parse_verdict(content: &str) -> Result<JudgeVerdict, JudgeError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(JudgeError::EmptyResponse);
    }

    let raw: RawVerdict =
        serde_json::from_str(content).map_err(|e| JudgeError::Malformed(e.to_string()))?;

    let choice = raw.choice.unwrap_or_default();
    let grade = choice
        .parse::<JudgeGrade>()
        .map_err(|_| JudgeError::InvalidGrade(choice.clone()))?;

    let ruling = raw
        .ruling
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or(JudgeError::MissingRuling)?;

    Ok(JudgeVerdict { grade, ruling })
}

#[async_trait]
impl JudgePort for LlmJudge {
    async fn adjudicate(
        &self,
        judge: &JudgeProfile,
        input: &JudgeInput,
    ) -> Result<JudgeVerdict, JudgeError> {
        let request = LlmRequest::new(vec![ChatMessage::user(build_prompt(judge, input))])
            .with_temperature(JUDGE_TEMPERATURE)
            .with_json_output();

        let response = self.llm.generate(request).await?;
        parse_verdict(&response.content)
    }
}
