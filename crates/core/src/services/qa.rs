//! Q&A service.

use std::sync::Arc;

use chrono::Utc;
use petbook_common::storage::MediaStorage;
use petbook_common::{AppError, AppResult};
use petbook_db::documents::{Account, Answer, PetContext, Question};
use petbook_db::repositories::{AccountRepository, AnswerRepository, QuestionRepository};
use petbook_db::QueryCursor;

use crate::generate_id;
use crate::pagination::{decode_cursor, encode_cursor};

/// Account id answers authored by the AI assistant are filed under.
pub const AI_ACCOUNT_ID: &str = "petora-ai";

/// Display name for AI-authored answers.
pub const AI_AUTHOR_NAME: &str = "Petora AI";

/// Input for question creation.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    /// Pet the question is about.
    pub pet: PetContext,
    /// Question title.
    pub title: String,
    /// Question body.
    pub content: String,
    /// Optional attached image URL.
    pub image_url: Option<String>,
}

/// Input for answer creation.
#[derive(Debug, Clone)]
pub struct AnswerDraft {
    /// Question being answered.
    pub question_id: String,
    /// Answer text.
    pub content: String,
}

/// One page of the question list.
#[derive(Debug, Clone)]
pub struct QuestionPage {
    /// Questions, newest first.
    pub questions: Vec<Question>,
    /// Token for the next page, absent when this page was short.
    pub next_cursor: Option<String>,
}

fn author_name(account: &Account) -> String {
    account
        .display_name
        .clone()
        .or_else(|| account.username.clone())
        .unwrap_or_else(|| "Anonymous".to_string())
}

/// Q&A service for business logic.
#[derive(Clone)]
pub struct QaService {
    question_repo: QuestionRepository,
    answer_repo: AnswerRepository,
    account_repo: AccountRepository,
    storage: Arc<dyn MediaStorage>,
    page_size: usize,
}

impl QaService {
    /// Create a new Q&A service.
    #[must_use]
    pub fn new(
        question_repo: QuestionRepository,
        answer_repo: AnswerRepository,
        account_repo: AccountRepository,
        storage: Arc<dyn MediaStorage>,
        page_size: usize,
    ) -> Self {
        Self {
            question_repo,
            answer_repo,
            account_repo,
            storage,
            page_size,
        }
    }

    /// Create a question.
    pub async fn create_question(
        &self,
        author_id: &str,
        draft: QuestionDraft,
    ) -> AppResult<Question> {
        if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Question title and content cannot be empty".to_string(),
            ));
        }

        let account = self.account_repo.get_by_id(author_id).await?;

        let question = Question {
            id: generate_id(),
            user_id: account.id.clone(),
            author_name: author_name(&account),
            pet: draft.pet,
            title: draft.title,
            content: draft.content,
            image_url: draft.image_url,
            upvotes: Vec::new(),
            answer_count: 0,
            created_at: Utc::now(),
        };
        self.question_repo.create(&question).await?;

        tracing::info!(question_id = %question.id, author_id, "Created question");
        Ok(question)
    }

    /// Get a question by id.
    pub async fn get_question(&self, id: &str) -> AppResult<Question> {
        self.question_repo.get_by_id(id).await
    }

    /// One page of questions, newest first.
    pub async fn list_questions(&self, cursor: Option<&str>) -> AppResult<QuestionPage> {
        let start_after = cursor.map(decode_cursor).transpose()?;
        let questions = self.question_repo.list(start_after, self.page_size).await?;

        let next_cursor = if questions.len() == self.page_size {
            questions.last().map(|last| {
                encode_cursor(&QueryCursor {
                    order_value: serde_json::json!(last.created_at),
                    doc_id: last.id.clone(),
                })
            })
        } else {
            None
        };

        Ok(QuestionPage {
            questions,
            next_cursor,
        })
    }

    /// Add an answer from a human account.
    ///
    /// The answer insert and the question's `answerCount` bump commit as one
    /// batch; a question can never report more answers than it has.
    pub async fn add_answer(&self, author_id: &str, draft: AnswerDraft) -> AppResult<Answer> {
        let account = self.account_repo.get_by_id(author_id).await?;
        self.insert_answer(&account.id, &author_name(&account), draft, false)
            .await
    }

    /// Add an answer authored by the AI assistant.
    pub async fn add_ai_answer(&self, draft: AnswerDraft) -> AppResult<Answer> {
        self.insert_answer(AI_ACCOUNT_ID, AI_AUTHOR_NAME, draft, true)
            .await
    }

    async fn insert_answer(
        &self,
        author_id: &str,
        name: &str,
        draft: AnswerDraft,
        is_ai_generated: bool,
    ) -> AppResult<Answer> {
        if draft.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Answer content cannot be empty".to_string(),
            ));
        }

        // Surface a question-shaped error before the batch runs.
        self.question_repo.get_by_id(&draft.question_id).await?;

        let answer = Answer {
            id: generate_id(),
            question_id: draft.question_id,
            user_id: author_id.to_string(),
            author_name: name.to_string(),
            content: draft.content,
            is_ai_generated,
            upvotes: Vec::new(),
            created_at: Utc::now(),
        };
        self.answer_repo.create_with_count(&answer).await?;

        tracing::info!(
            answer_id = %answer.id,
            question_id = %answer.question_id,
            is_ai_generated,
            "Added answer"
        );
        Ok(answer)
    }

    /// Answers of a question, oldest first.
    pub async fn list_answers(&self, question_id: &str) -> AppResult<Vec<Answer>> {
        self.answer_repo.list_for_question(question_id).await
    }

    /// Toggle an account's upvote on a question. Returns the new state.
    pub async fn toggle_question_upvote(
        &self,
        question_id: &str,
        account_id: &str,
    ) -> AppResult<bool> {
        let question = self.question_repo.get_by_id(question_id).await?;

        if question.upvotes.iter().any(|id| id == account_id) {
            self.question_repo
                .remove_upvote(question_id, account_id)
                .await?;
            Ok(false)
        } else {
            self.question_repo
                .add_upvote(question_id, account_id)
                .await?;
            Ok(true)
        }
    }

    /// Toggle an account's upvote on an answer. Returns the new state.
    pub async fn toggle_answer_upvote(
        &self,
        answer_id: &str,
        account_id: &str,
    ) -> AppResult<bool> {
        let answer = self.answer_repo.get_by_id(answer_id).await?;

        if answer.upvotes.iter().any(|id| id == account_id) {
            self.answer_repo.remove_upvote(answer_id, account_id).await?;
            Ok(false)
        } else {
            self.answer_repo.add_upvote(answer_id, account_id).await?;
            Ok(true)
        }
    }

    /// Delete a question. Only the owner may delete.
    ///
    /// The document delete is authoritative; blob deletion of the attached
    /// image is best-effort and logged on failure.
    pub async fn delete_question(&self, question_id: &str, actor_id: &str) -> AppResult<()> {
        let question = self.question_repo.get_by_id(question_id).await?;
        if question.user_id != actor_id {
            return Err(AppError::Forbidden(
                "Only the question owner can delete it".to_string(),
            ));
        }

        self.question_repo.delete(question_id).await?;

        if let Some(url) = &question.image_url {
            if let Err(error) = self.storage.delete(url).await {
                tracing::warn!(question_id, url, %error, "Failed to delete question image");
            }
        }

        tracing::info!(question_id, actor_id, "Deleted question");
        Ok(())
    }
}
