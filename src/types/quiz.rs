// Copyright 2026 The coursedesk Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::types::ids::QuestionId;

/// Quiz payload of a curriculum item.
///
/// A quiz that fails validation at ingestion (no questions, a question
/// without exactly one correct option, and so on) has no definition and
/// carries the list of defects instead. Such a quiz renders as having no
/// data and can never be started.
#[derive(Debug, Clone)]
pub struct QuizDetail {
    pub definition: Option<QuizDefinition>,
    pub defects: Vec<String>,
}

/// A validated quiz definition.
#[derive(Debug, Clone)]
pub struct QuizDefinition {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    /// Time limit in minutes. `None` means the quiz is untimed.
    pub time_limit_minutes: Option<u32>,
    /// Minimum score, as a percentage, required to pass.
    pub passing_score: f64,
    pub order_mode: OrderMode,
    pub feedback_mode: FeedbackMode,
}

#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub id: QuestionId,
    /// Markdown text of the question.
    pub text: String,
    pub image_url: Option<String>,
    pub options: Vec<QuizOption>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuizOption {
    pub text: String,
    pub correct: bool,
    pub explanation: Option<String>,
}

/// Presentation order of questions within an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    /// Questions appear in authored order.
    Sequential,
    /// Questions are shuffled once when the attempt starts.
    Randomized,
}

/// When correctness and explanations are revealed to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackMode {
    /// Revealed as soon as the question is answered.
    Immediate,
    /// Revealed only in the post-submission review.
    Deferred,
}

impl QuizQuestion {
    /// The single option flagged as correct. Validation guarantees
    /// exactly one exists in any question that reaches an attempt.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.correct)
    }
}

impl QuizDefinition {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
