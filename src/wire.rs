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

//! Wire documents for the LMS API, and their conversion into domain
//! types. Conversion happens once, at ingestion: an item's type tag and
//! optional payload blocks are resolved into `ItemDetail` here, and quiz
//! definitions are validated here, so the rest of the program never sees
//! a raw document.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::api::ApiError;
use crate::types::course::AssignmentDetail;
use crate::types::course::CourseOutline;
use crate::types::course::CurriculumItem;
use crate::types::course::ItemDetail;
use crate::types::course::LectureDetail;
use crate::types::ids::CourseId;
use crate::types::ids::ItemId;
use crate::types::ids::QuestionId;
use crate::types::ids::SectionId;
use crate::types::progress::CourseProgress;
use crate::types::progress::ProgressRecord;
use crate::types::quiz::FeedbackMode;
use crate::types::quiz::OrderMode;
use crate::types::quiz::QuizDefinition;
use crate::types::quiz::QuizDetail;
use crate::types::quiz::QuizOption;
use crate::types::quiz::QuizQuestion;
use crate::types::submission::SubmissionPayload;
use crate::types::submission::SubmissionReceipt;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub position: u32,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub item_type: String,
    #[serde(default)]
    pub lecture: Option<Lecture>,
    #[serde(default)]
    pub quiz: Option<Quiz>,
    #[serde(default)]
    pub assignment: Option<Assignment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(default)]
    pub passing_score: f64,
    #[serde(default)]
    pub randomize_questions: bool,
    #[serde(default)]
    pub immediate_feedback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub due: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub items: Vec<ProgressItem>,
    #[serde(default)]
    pub completed_items: u32,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub progress_percentage: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressItem {
    pub item_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Receipt {
    pub id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Body of a progress submission. All fields are optional on the wire;
/// which ones are present decides the meaning of the request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnswerBody>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBody {
    pub question_id: String,
    pub chosen_option_text: String,
    pub correct: bool,
}

#[derive(Debug, Serialize)]
pub struct AssignmentBody {
    pub text: String,
}

impl Course {
    /// Resolve the document into a course outline. Sections are ordered
    /// by their position field. Items with an unknown type tag are
    /// dropped; a duplicate item id makes the whole course malformed,
    /// since navigation identifies items by id.
    pub fn into_outline(self) -> Result<CourseOutline, ApiError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());
        for section in self.sections {
            let mut items = Vec::with_capacity(section.items.len());
            for item in section.items {
                if !seen.insert(item.id.clone()) {
                    return Err(ApiError::Decode(format!(
                        "duplicate item id {:?} in course {:?}",
                        item.id, self.id
                    )));
                }
                let detail = match item.item_type.as_str() {
                    "lecture" => {
                        ItemDetail::Lecture(item.lecture.map(Lecture::into_detail).unwrap_or_default())
                    }
                    "quiz" => ItemDetail::Quiz(match item.quiz {
                        Some(quiz) => quiz.into_detail(),
                        None => QuizDetail {
                            definition: None,
                            defects: vec!["quiz payload is missing".to_string()],
                        },
                    }),
                    "assignment" => ItemDetail::Assignment(
                        item.assignment
                            .map(Assignment::into_detail)
                            .unwrap_or_default(),
                    ),
                    other => {
                        log::warn!("skipping item {:?}: unknown item type {other:?}", item.id);
                        continue;
                    }
                };
                items.push(CurriculumItem {
                    id: ItemId::new(item.id),
                    title: item.title,
                    detail,
                });
            }
            sections.push(crate::types::course::Section {
                id: SectionId::new(section.id),
                title: section.title,
                position: section.position,
                items,
            });
        }
        sections.sort_by_key(|section| section.position);
        Ok(CourseOutline {
            id: CourseId::new(self.id),
            title: self.title,
            sections,
        })
    }
}

impl Lecture {
    fn into_detail(self) -> LectureDetail {
        LectureDetail {
            body: self.body,
            video_url: self.video_url,
            duration_minutes: self.duration_minutes,
        }
    }
}

impl Assignment {
    fn into_detail(self) -> AssignmentDetail {
        AssignmentDetail {
            instructions: self.instructions,
            due: self.due,
        }
    }
}

impl Quiz {
    /// Validate the quiz document. A valid quiz yields a definition; any
    /// defect withholds the definition entirely, so a broken quiz can be
    /// displayed as having no data but never started.
    pub fn into_detail(self) -> QuizDetail {
        let mut defects = Vec::new();
        if self.questions.is_empty() {
            defects.push("quiz has no questions".to_string());
        }
        if !(0.0..=100.0).contains(&self.passing_score) {
            defects.push(format!(
                "passing score {} is outside the 0-100 range",
                self.passing_score
            ));
        }
        let mut questions = Vec::with_capacity(self.questions.len());
        for (index, question) in self.questions.into_iter().enumerate() {
            let ordinal = index + 1;
            if question.id.trim().is_empty() {
                defects.push(format!("question {ordinal} has no id"));
            }
            if question.text.trim().is_empty() {
                defects.push(format!("question {ordinal} has no text"));
            }
            if question.options.is_empty() {
                defects.push(format!("question {ordinal} has no options"));
            } else {
                let correct = question
                    .options
                    .iter()
                    .filter(|option| option.is_correct)
                    .count();
                if correct == 0 {
                    defects.push(format!("question {ordinal} has no correct option"));
                } else if correct > 1 {
                    defects.push(format!("question {ordinal} has multiple correct options"));
                }
                let mut texts: HashSet<&str> = HashSet::new();
                for option in &question.options {
                    if option.text.trim().is_empty() {
                        defects.push(format!("question {ordinal} has an option with empty text"));
                    } else if !texts.insert(option.text.as_str()) {
                        defects.push(format!(
                            "question {ordinal} has duplicate option text {:?}",
                            option.text
                        ));
                    }
                }
            }
            questions.push(QuizQuestion {
                id: QuestionId::new(question.id),
                text: question.text,
                image_url: question.image_url,
                options: question
                    .options
                    .into_iter()
                    .map(|option| QuizOption {
                        text: option.text,
                        correct: option.is_correct,
                        explanation: option.explanation,
                    })
                    .collect(),
                explanation: question.explanation,
            });
        }
        if !defects.is_empty() {
            return QuizDetail {
                definition: None,
                defects,
            };
        }
        QuizDetail {
            definition: Some(QuizDefinition {
                title: self.title,
                questions,
                // A zero time limit means the quiz is untimed.
                time_limit_minutes: self.time_limit_minutes.filter(|minutes| *minutes > 0),
                passing_score: self.passing_score,
                order_mode: if self.randomize_questions {
                    OrderMode::Randomized
                } else {
                    OrderMode::Sequential
                },
                feedback_mode: if self.immediate_feedback {
                    FeedbackMode::Immediate
                } else {
                    FeedbackMode::Deferred
                },
            }),
            defects,
        }
    }
}

impl Progress {
    pub fn into_progress(self) -> CourseProgress {
        let records = self
            .items
            .into_iter()
            .map(|item| {
                (
                    ItemId::new(item.item_id),
                    ProgressRecord {
                        completed: item.completed,
                        score: item.score,
                    },
                )
            })
            .collect();
        CourseProgress {
            records,
            completed_items: self.completed_items,
            total_items: self.total_items,
            progress_percentage: self.progress_percentage,
        }
    }
}

impl Receipt {
    pub fn into_receipt(self) -> SubmissionReceipt {
        SubmissionReceipt {
            id: self.id,
            completed: self.completed,
            score: self.score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl SubmissionBody {
    pub fn from_payload(payload: &SubmissionPayload) -> Self {
        match payload {
            SubmissionPayload::LectureComplete => Self {
                answers: None,
                time_taken_minutes: None,
                assignment: None,
            },
            SubmissionPayload::QuizAnswers {
                answers,
                time_taken_minutes,
            } => Self {
                answers: Some(
                    answers
                        .iter()
                        .map(|answer| AnswerBody {
                            question_id: answer.question_id.to_string(),
                            chosen_option_text: answer.chosen_option_text.clone(),
                            correct: answer.correct,
                        })
                        .collect(),
                ),
                time_taken_minutes: Some(*time_taken_minutes),
                assignment: None,
            },
            SubmissionPayload::AssignmentText { text } => Self {
                answers: None,
                time_taken_minutes: None,
                assignment: Some(AssignmentBody { text: text.clone() }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::ids::QuestionId;
    use crate::types::submission::QuizAnswer;

    fn sample_course() -> serde_json::Value {
        json!({
            "id": "course-1",
            "title": "Rust Basics",
            "sections": [
                {
                    "id": "s2",
                    "title": "Closures",
                    "position": 2,
                    "items": [
                        {
                            "id": "l2",
                            "title": "Capture Modes",
                            "itemType": "lecture",
                            "lecture": {"body": "Closures *capture*.", "durationMinutes": 7}
                        }
                    ]
                },
                {
                    "id": "s1",
                    "title": "Ownership",
                    "position": 1,
                    "items": [
                        {
                            "id": "l1",
                            "title": "Moves",
                            "itemType": "lecture",
                            "lecture": {"body": "Values move."}
                        },
                        {
                            "id": "q1",
                            "title": "Ownership Quiz",
                            "itemType": "quiz",
                            "quiz": {
                                "title": "Ownership Quiz",
                                "passingScore": 70.0,
                                "timeLimitMinutes": 10,
                                "questions": [
                                    {
                                        "id": "qq1",
                                        "text": "What happens on assignment?",
                                        "options": [
                                            {"text": "The value moves", "isCorrect": true},
                                            {"text": "The value is copied", "isCorrect": false}
                                        ]
                                    }
                                ]
                            }
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_sections_ordered_by_position() {
        let doc: Course = serde_json::from_value(sample_course()).unwrap();
        let outline = doc.into_outline().unwrap();
        assert_eq!(outline.sections[0].title, "Ownership");
        assert_eq!(outline.sections[1].title, "Closures");
        assert_eq!(outline.item_count(), 3);
    }

    #[test]
    fn test_quiz_item_is_validated() {
        let doc: Course = serde_json::from_value(sample_course()).unwrap();
        let outline = doc.into_outline().unwrap();
        let quiz_item = &outline.sections[0].items[1];
        match &quiz_item.detail {
            ItemDetail::Quiz(detail) => {
                let definition = detail.definition.as_ref().unwrap();
                assert_eq!(definition.question_count(), 1);
                assert_eq!(definition.time_limit_minutes, Some(10));
                assert_eq!(definition.order_mode, OrderMode::Sequential);
                assert_eq!(definition.feedback_mode, FeedbackMode::Deferred);
            }
            other => panic!("expected a quiz, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_item_id_is_rejected() {
        let doc: Course = serde_json::from_value(json!({
            "id": "c",
            "title": "t",
            "sections": [{
                "id": "s", "title": "s", "position": 1,
                "items": [
                    {"id": "x", "title": "a", "itemType": "lecture"},
                    {"id": "x", "title": "b", "itemType": "lecture"}
                ]
            }]
        }))
        .unwrap();
        assert!(doc.into_outline().is_err());
    }

    #[test]
    fn test_unknown_item_type_is_dropped() {
        let doc: Course = serde_json::from_value(json!({
            "id": "c",
            "title": "t",
            "sections": [{
                "id": "s", "title": "s", "position": 1,
                "items": [
                    {"id": "a", "title": "a", "itemType": "survey"},
                    {"id": "b", "title": "b", "itemType": "lecture"}
                ]
            }]
        }))
        .unwrap();
        let outline = doc.into_outline().unwrap();
        assert_eq!(outline.item_count(), 1);
        assert_eq!(outline.sections[0].items[0].id, ItemId::new("b"));
    }

    #[test]
    fn test_quiz_without_correct_option_has_no_definition() {
        let doc: Quiz = serde_json::from_value(json!({
            "title": "Broken",
            "passingScore": 70.0,
            "questions": [{
                "id": "q",
                "text": "Pick one",
                "options": [
                    {"text": "A", "isCorrect": false},
                    {"text": "B", "isCorrect": false}
                ]
            }]
        }))
        .unwrap();
        let detail = doc.into_detail();
        assert!(detail.definition.is_none());
        assert_eq!(detail.defects, vec!["question 1 has no correct option"]);
    }

    #[test]
    fn test_quiz_with_several_correct_options_has_no_definition() {
        let doc: Quiz = serde_json::from_value(json!({
            "title": "Broken",
            "passingScore": 70.0,
            "questions": [{
                "id": "q",
                "text": "Pick one",
                "options": [
                    {"text": "A", "isCorrect": true},
                    {"text": "B", "isCorrect": true}
                ]
            }]
        }))
        .unwrap();
        let detail = doc.into_detail();
        assert!(detail.definition.is_none());
        assert_eq!(
            detail.defects,
            vec!["question 1 has multiple correct options"]
        );
    }

    #[test]
    fn test_zero_time_limit_means_untimed() {
        let doc: Quiz = serde_json::from_value(json!({
            "title": "Untimed",
            "passingScore": 50.0,
            "timeLimitMinutes": 0,
            "questions": [{
                "id": "q",
                "text": "Pick one",
                "options": [
                    {"text": "A", "isCorrect": true},
                    {"text": "B", "isCorrect": false}
                ]
            }]
        }))
        .unwrap();
        let detail = doc.into_detail();
        assert_eq!(detail.definition.unwrap().time_limit_minutes, None);
    }

    #[test]
    fn test_progress_document_conversion() {
        let doc: Progress = serde_json::from_value(json!({
            "items": [
                {"itemId": "l1", "completed": true},
                {"itemId": "q1", "completed": true, "score": 87.5}
            ],
            "completedItems": 2,
            "totalItems": 3,
            "progressPercentage": 66.7
        }))
        .unwrap();
        let progress = doc.into_progress();
        assert_eq!(progress.records.len(), 2);
        assert_eq!(progress.records[&ItemId::new("q1")].score, Some(87.5));
        assert_eq!(progress.completed_items, 2);
    }

    #[test]
    fn test_lecture_completion_serializes_to_empty_object() {
        let body = SubmissionBody::from_payload(&SubmissionPayload::LectureComplete);
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_quiz_answers_serialize_with_wire_casing() {
        let payload = SubmissionPayload::QuizAnswers {
            answers: vec![QuizAnswer {
                question_id: QuestionId::new("qq1"),
                chosen_option_text: "The value moves".to_string(),
                correct: true,
            }],
            time_taken_minutes: 3,
        };
        let body = SubmissionBody::from_payload(&payload);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            json!({
                "answers": [{
                    "questionId": "qq1",
                    "chosenOptionText": "The value moves",
                    "correct": true
                }],
                "timeTakenMinutes": 3
            })
        );
    }
}
