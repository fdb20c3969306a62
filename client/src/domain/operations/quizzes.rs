//! Quiz operations.

use serde::Serialize;

use super::{Acknowledgement, define_operation};
use crate::domain::curriculum::{NewQuiz, Quiz, QuizPayload, QuizUpdate};
use crate::domain::ids::QuizId;

/// Variables naming one quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRef {
    pub quiz_id: QuizId,
}

/// Variables for `updateQuiz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizVariables {
    pub quiz_id: QuizId,
    #[serde(flatten)]
    pub changes: QuizUpdate,
}

define_operation! {
    /// Quiz with its questions. Resolves to `null` when the quiz is gone.
    query GetQuiz {
        variables: QuizRef,
        output: Option<Quiz>,
        root: "getQuiz",
        declare: ["quizId": "Int!"],
        selection: "(quizId: $quizId) { id sectionId title description order timeLimit passingScore questions { id text type options correctAnswer points order } }",
    }
}

define_operation! {
    /// Add a quiz with its questions to a section.
    mutation CreateQuiz {
        variables: NewQuiz,
        output: QuizPayload,
        root: "createQuiz",
        declare: [
            "sectionId": "Int!",
            "title": "String!",
            "description": "String",
            "order": "Int!",
            "timeLimit": "Int",
            "passingScore": "Int" = "70",
            "questions": "[QuizQuestionInput!]" = "[]",
        ],
        selection: "(sectionId: $sectionId, title: $title, description: $description, order: $order, timeLimit: $timeLimit, passingScore: $passingScore, questions: $questions) { success message quiz { id sectionId title description order timeLimit passingScore questions { id text type options correctAnswer points order } } }",
    }
}

define_operation! {
    /// Edit a quiz; `questions`, when sent, replaces the whole set.
    mutation UpdateQuiz {
        variables: UpdateQuizVariables,
        output: QuizPayload,
        root: "updateQuiz",
        declare: [
            "quizId": "Int!",
            "title": "String",
            "description": "String",
            "order": "Int",
            "timeLimit": "Int",
            "passingScore": "Int",
            "questions": "[QuizQuestionInput!]",
        ],
        selection: "(quizId: $quizId, title: $title, description: $description, order: $order, timeLimit: $timeLimit, passingScore: $passingScore, questions: $questions) { success message quiz { id sectionId title description order timeLimit passingScore questions { id text type options correctAnswer points order } } }",
    }
}

define_operation! {
    /// Remove a quiz.
    mutation DeleteQuiz {
        variables: QuizRef,
        output: Acknowledgement,
        root: "deleteQuiz",
        declare: ["quizId": "Int!"],
        selection: "(quizId: $quizId) { success message }",
    }
}
