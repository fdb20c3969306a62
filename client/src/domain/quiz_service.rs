//! Quiz authoring with local validation of questions.

use super::call_state::CallTracker;
use super::curriculum::{NewQuiz, QuestionType, Quiz, QuizPayload, QuizQuestionInput, QuizUpdate};
use super::error::{ClassifiedError, ServiceError};
use super::ids::QuizId;
use super::operations::Acknowledgement;
use super::operations::quizzes::{
    CreateQuiz, DeleteQuiz, GetQuiz, QuizRef, UpdateQuiz, UpdateQuizVariables,
};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Problems found in a quiz before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizValidationError {
    #[error("Quiz title is required")]
    MissingTitle,
    #[error("Question {index} needs text")]
    MissingQuestionText { index: usize },
    #[error("Question {index} needs a correct answer")]
    MissingAnswer { index: usize },
    #[error("Question {index} needs at least two options")]
    TooFewOptions { index: usize },
    #[error("Question {index}: the correct answer must be one of the options")]
    AnswerNotAnOption { index: usize },
    #[error("Passing score must be between 0 and 100")]
    PassingScoreOutOfRange,
}

impl From<QuizValidationError> for ServiceError {
    fn from(value: QuizValidationError) -> Self {
        Self::validation(value.to_string())
    }
}

/// Check a question list. Indices in errors are 1-based.
pub fn validate_questions(questions: &[QuizQuestionInput]) -> Result<(), QuizValidationError> {
    for (position, question) in questions.iter().enumerate() {
        let index = position + 1;
        if question.text.trim().is_empty() {
            return Err(QuizValidationError::MissingQuestionText { index });
        }
        let answer = question.correct_answer.trim();
        if answer.is_empty() {
            return Err(QuizValidationError::MissingAnswer { index });
        }
        if question.question_type == QuestionType::MultipleChoice {
            if question.options.len() < 2 {
                return Err(QuizValidationError::TooFewOptions { index });
            }
            if !question.options.iter().any(|option| option.trim() == answer) {
                return Err(QuizValidationError::AnswerNotAnOption { index });
            }
        }
    }
    Ok(())
}

fn validate_passing_score(score: Option<i32>) -> Result<(), QuizValidationError> {
    match score {
        Some(score) if !(0..=100).contains(&score) => {
            Err(QuizValidationError::PassingScoreOutOfRange)
        }
        _ => Ok(()),
    }
}

/// Check a new quiz.
pub fn validate_new_quiz(quiz: &NewQuiz) -> Result<(), QuizValidationError> {
    if quiz.title.trim().is_empty() {
        return Err(QuizValidationError::MissingTitle);
    }
    validate_passing_score(quiz.passing_score)?;
    validate_questions(&quiz.questions)
}

/// Check the fields present in a quiz update.
pub fn validate_quiz_update(update: &QuizUpdate) -> Result<(), QuizValidationError> {
    if update.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        return Err(QuizValidationError::MissingTitle);
    }
    validate_passing_score(update.passing_score)?;
    update
        .questions
        .as_deref()
        .map_or(Ok(()), validate_questions)
}

/// Reads and edits quizzes.
#[derive(Clone)]
pub struct QuizService {
    hook: ServiceHook,
}

impl QuizService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Quiz with its questions, `None` when it does not exist.
    pub async fn quiz(&self, quiz_id: QuizId) -> Result<Option<Quiz>, ClassifiedError> {
        self.hook
            .query::<GetQuiz>(&QuizRef { quiz_id }, CallSpec::new("load quiz"))
            .await
    }

    pub async fn create_quiz(&self, quiz: NewQuiz) -> Result<QuizPayload, ClassifiedError> {
        let spec = CallSpec::new("create quiz")
            .requires_credential()
            .notify_success("Quiz created");
        if let Err(invalid) = validate_new_quiz(&quiz) {
            return Err(self.hook.reject(invalid.into(), &spec));
        }
        self.hook.mutate::<CreateQuiz>(&quiz, spec).await
    }

    pub async fn update_quiz(
        &self,
        quiz_id: QuizId,
        changes: QuizUpdate,
    ) -> Result<QuizPayload, ClassifiedError> {
        let spec = CallSpec::new("update quiz")
            .requires_credential()
            .notify_success("Quiz updated");
        if let Err(invalid) = validate_quiz_update(&changes) {
            return Err(self.hook.reject(invalid.into(), &spec));
        }
        self.hook
            .mutate::<UpdateQuiz>(&UpdateQuizVariables { quiz_id, changes }, spec)
            .await
    }

    pub async fn delete_quiz(&self, quiz_id: QuizId) -> Result<Acknowledgement, ClassifiedError> {
        self.hook
            .mutate::<DeleteQuiz>(
                &QuizRef { quiz_id },
                CallSpec::new("delete quiz")
                    .requires_credential()
                    .notify_success("Quiz deleted"),
            )
            .await
    }
}
