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

/// What gets posted to the item progress endpoint.
///
/// The endpoint takes one optional-field object; which fields are present
/// decides the meaning. This enum fixes the three legal combinations so a
/// payload cannot be half-built. Serialization back to the wire shape
/// happens at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPayload {
    /// Empty body: marks a lecture as completed.
    LectureComplete,
    /// A full set of quiz answers, one per question.
    QuizAnswers {
        answers: Vec<QuizAnswer>,
        time_taken_minutes: u32,
    },
    /// Free-text assignment submission.
    AssignmentText { text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizAnswer {
    pub question_id: QuestionId,
    /// The text of the chosen option. Empty if the question was never
    /// answered, which happens on timer expiry.
    pub chosen_option_text: String,
    pub correct: bool,
}

/// The LMS's acknowledgement of a progress submission.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub id: String,
    pub completed: bool,
    /// The authoritative score for quiz submissions. Pass or fail is
    /// decided against this value, never the locally computed one.
    pub score: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}
