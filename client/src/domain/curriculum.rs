//! Course curriculum: sections and the lectures, quizzes and assignments
//! they contain.
//!
//! Entities mirror the server's camelCase JSON. Inputs serialise directly as
//! operation variables; optional fields are omitted rather than sent as
//! `null` so partial updates leave untouched fields alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssignmentId, CourseId, LectureId, QuizId, SectionId};
use super::operations::impl_mutation_outcome;

/// Course section with its nested curriculum items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub course_id: Option<CourseId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: i32,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// Video or text lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: LectureId,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: i32,
    #[serde(default)]
    pub video_url: Option<String>,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub content: Option<String>,
}

/// Question formats understood by the quiz engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// Stored quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub points: Option<i32>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Quiz attached to a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: i32,
    /// Time limit in minutes.
    #[serde(default)]
    pub time_limit: Option<i32>,
    /// Pass mark as a percentage.
    #[serde(default)]
    pub passing_score: Option<i32>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

/// Graded assignment attached to a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: i32,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_score: Option<i32>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Variables for `createSection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub order: i32,
}

/// Variables for `updateSection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Variables for `createLecture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLecture {
    pub section_id: SectionId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    pub is_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Variables for `updateLecture`, excluding the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Question as submitted when creating or updating a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionInput {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub points: i32,
}

/// Variables for `createQuiz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuiz {
    pub section_id: SectionId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<i32>,
    pub questions: Vec<QuizQuestionInput>,
}

/// Variables for `updateQuiz`, excluding the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestionInput>>,
}

/// Variables for `createAssignment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub section_id: SectionId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Variables for `updateAssignment`, excluding the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Response of section create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionPayload {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub section: Option<Section>,
}

/// Response of lecture create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LecturePayload {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lecture: Option<Lecture>,
}

/// Response of quiz create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizPayload {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub quiz: Option<Quiz>,
}

/// Response of assignment create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignmentPayload {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub assignment: Option<Assignment>,
}

impl_mutation_outcome!(SectionPayload, LecturePayload, QuizPayload, AssignmentPayload);
