//! AI veterinary answer assistant.

use std::sync::Arc;

use petbook_common::AppResult;
use petbook_core::{AnswerDraft, QaService};
use petbook_db::documents::{Answer, Question};
use serde::Deserialize;

use crate::client::{GenerationRequest, TextGenerator, strip_code_fence};

const ANSWER_SYSTEM_INSTRUCTION: &str = r#"You are an AI Veterinary Assistant named "Petora AI".
Your goal is to provide helpful, safe, and context-aware advice for pet owners.

You will be given the pet's details (species, breed, birth date, name) and the
owner's question.

Guidelines:
- Use the pet's name and specifics in the answer.
- Include a disclaimer to see a veterinarian whenever the issue sounds serious.
- Give actionable advice in an empathetic, professional, friendly tone.

Output format: a JSON object with a single key "answer" (string, may contain
markdown)."#;

fn answer_prompt(question: &Question) -> String {
    format!(
        "Pet Name: {}\n\
         Species: {}\n\
         Breed: {}\n\
         Age/BirthDate: {}\n\
         \n\
         Question Title: {}\n\
         Question Content: {}\n",
        question.pet.name,
        question.pet.species,
        question.pet.breed.as_deref().unwrap_or("Unknown"),
        question.pet.birth_date.as_deref().unwrap_or("Unknown"),
        question.title,
        question.content,
    )
}

#[derive(Deserialize)]
struct AnswerPayload {
    answer: String,
}

/// Pull the answer text out of the model output.
///
/// The model is asked for `{"answer": "..."}` but occasionally returns raw
/// text anyway; raw text is accepted as the answer itself.
fn parse_answer(text: &str) -> String {
    let stripped = strip_code_fence(text);
    serde_json::from_str::<AnswerPayload>(stripped)
        .map_or_else(|_| text.trim().to_string(), |payload| payload.answer)
}

/// Generates AI answers and files them through the Q&A service.
#[derive(Clone)]
pub struct AnswerAssistant {
    generator: Arc<dyn TextGenerator>,
    qa: QaService,
}

impl AnswerAssistant {
    /// Create a new assistant.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, qa: QaService) -> Self {
        Self { generator, qa }
    }

    /// Generate and store an AI answer for a question.
    pub async fn answer_question(&self, question_id: &str) -> AppResult<Answer> {
        let question = self.qa.get_question(question_id).await?;

        let text = self
            .generator
            .generate(GenerationRequest {
                system_instruction: ANSWER_SYSTEM_INSTRUCTION.to_string(),
                prompt: answer_prompt(&question),
                attachment: None,
            })
            .await?;

        self.qa
            .add_ai_answer(AnswerDraft {
                question_id: question.id,
                content: parse_answer(&text),
            })
            .await
    }

    /// Answer a question in the background.
    ///
    /// Generation latency must not block question creation; failures are
    /// logged and the question simply stays unanswered.
    pub fn spawn_answer(&self, question_id: String) -> tokio::task::JoinHandle<()> {
        let assistant = self.clone();
        tokio::spawn(async move {
            if let Err(error) = assistant.answer_question(&question_id).await {
                tracing::error!(question_id, %error, "AI answer generation failed");
            }
        })
    }
}
