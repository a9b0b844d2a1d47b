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

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::utf8_percent_encode;
use thiserror::Error;

use crate::types::course::CourseOutline;
use crate::types::ids::CourseId;
use crate::types::ids::ItemId;
use crate::types::progress::CourseProgress;
use crate::types::progress::ProgressRecord;
use crate::types::submission::SubmissionPayload;
use crate::types::submission::SubmissionReceipt;
use crate::wire;

/// Errors surfaced by the LMS API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No token is configured. Raised before any request is sent.
    #[error("no API token is configured")]
    MissingToken,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Read access to a course outline.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn get_course(&self, course_id: &CourseId) -> Result<CourseOutline, ApiError>;
}

/// Read and write access to per-item progress.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    async fn get_progress(&self, course_id: &CourseId) -> Result<CourseProgress, ApiError>;

    /// Post a completion, quiz result, or assignment submission for one
    /// item. The payload decides which; an empty payload marks a lecture
    /// as completed.
    async fn submit_progress(
        &self,
        course_id: &CourseId,
        item_id: &ItemId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, ApiError>;
}

// ── HTTP client ────────────────────────────────────────────────

// Everything beyond unreserved characters gets encoded when an id is
// spliced into a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// LMS API client over HTTP. All endpoints require a bearer token; a
/// missing token short-circuits before any request is sent.
pub struct HttpApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.is_empty()),
            client: reqwest::Client::new(),
        }
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::MissingToken)
    }

    fn course_url(&self, course_id: &CourseId) -> String {
        format!(
            "{}/courses/{}",
            self.base_url,
            encode_segment(course_id.as_str())
        )
    }
}

#[async_trait]
impl CourseApi for HttpApi {
    async fn get_course(&self, course_id: &CourseId) -> Result<CourseOutline, ApiError> {
        let token = self.token()?;
        let url = self.course_url(course_id);
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let doc: wire::Course = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        doc.into_outline()
    }
}

#[async_trait]
impl ProgressApi for HttpApi {
    async fn get_progress(&self, course_id: &CourseId) -> Result<CourseProgress, ApiError> {
        let token = self.token()?;
        let url = format!("{}/progress", self.course_url(course_id));
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let doc: wire::Progress = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(doc.into_progress())
    }

    async fn submit_progress(
        &self,
        course_id: &CourseId,
        item_id: &ItemId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, ApiError> {
        let token = self.token()?;
        let url = format!(
            "{}/items/{}/progress",
            self.course_url(course_id),
            encode_segment(item_id.as_str())
        );
        log::debug!("POST {url}");
        let body = wire::SubmissionBody::from_payload(payload);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let doc: wire::Receipt = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(doc.into_receipt())
    }
}

// ── In-memory client ───────────────────────────────────────────

/// In-memory API implementation for tests and offline experiments.
///
/// Submissions are applied to the stored progress state the way the LMS
/// would apply them: the item is marked completed, and quiz submissions
/// are scored server-side from the reported per-answer correctness.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    courses: Arc<Mutex<HashMap<CourseId, CourseOutline>>>,
    progress: Arc<Mutex<HashMap<CourseId, CourseProgress>>>,
    submissions: Arc<Mutex<Vec<(ItemId, SubmissionPayload)>>>,
    fail_submissions: Arc<AtomicBool>,
    next_receipt: Arc<AtomicU64>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_course(&self, outline: CourseOutline) {
        let total = outline.item_count() as u32;
        let mut progress = self.progress.lock().unwrap();
        progress
            .entry(outline.id.clone())
            .or_insert_with(|| CourseProgress {
                records: HashMap::new(),
                completed_items: 0,
                total_items: total,
                progress_percentage: 0.0,
            });
        drop(progress);
        let mut courses = self.courses.lock().unwrap();
        courses.insert(outline.id.clone(), outline);
    }

    pub fn seed_progress(&self, course_id: &CourseId, item_id: &ItemId, record: ProgressRecord) {
        let mut progress = self.progress.lock().unwrap();
        if let Some(state) = progress.get_mut(course_id) {
            state.records.insert(item_id.clone(), record);
            recompute(state);
        }
    }

    /// When set, `submit_progress` fails with a network error. Used to
    /// exercise submission failure handling.
    pub fn set_submit_failure(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<(ItemId, SubmissionPayload)> {
        self.submissions.lock().unwrap().clone()
    }
}

fn recompute(state: &mut CourseProgress) {
    state.completed_items = state
        .records
        .values()
        .filter(|record| record.completed)
        .count() as u32;
    state.progress_percentage = if state.total_items == 0 {
        0.0
    } else {
        (state.completed_items as f64 / state.total_items as f64) * 100.0
    };
}

fn score_payload(payload: &SubmissionPayload) -> Option<f64> {
    match payload {
        SubmissionPayload::QuizAnswers { answers, .. } => {
            if answers.is_empty() {
                return Some(0.0);
            }
            let correct = answers.iter().filter(|answer| answer.correct).count();
            Some((correct as f64 / answers.len() as f64) * 100.0)
        }
        _ => None,
    }
}

#[async_trait]
impl CourseApi for InMemoryApi {
    async fn get_course(&self, course_id: &CourseId) -> Result<CourseOutline, ApiError> {
        let courses = self.courses.lock().unwrap();
        courses.get(course_id).cloned().ok_or(ApiError::Status(404))
    }
}

#[async_trait]
impl ProgressApi for InMemoryApi {
    async fn get_progress(&self, course_id: &CourseId) -> Result<CourseProgress, ApiError> {
        let progress = self.progress.lock().unwrap();
        progress
            .get(course_id)
            .cloned()
            .ok_or(ApiError::Status(404))
    }

    async fn submit_progress(
        &self,
        course_id: &CourseId,
        item_id: &ItemId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, ApiError> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(ApiError::Network("injected submission failure".to_string()));
        }
        let score = score_payload(payload);
        {
            let mut progress = self.progress.lock().unwrap();
            let state = progress
                .get_mut(course_id)
                .ok_or(ApiError::Status(404))?;
            state.records.insert(
                item_id.clone(),
                ProgressRecord {
                    completed: true,
                    score,
                },
            );
            recompute(state);
        }
        self.submissions
            .lock()
            .unwrap()
            .push((item_id.clone(), payload.clone()));
        let serial = self.next_receipt.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SubmissionReceipt {
            id: format!("submission-{serial}"),
            completed: true,
            score,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ids::QuestionId;
    use crate::types::submission::QuizAnswer;

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        // Port 9 is discard; nothing listens there. The call must fail
        // before any connection is attempted.
        let api = HttpApi::new("http://127.0.0.1:9", None);
        let result = api.get_course(&CourseId::new("course-1")).await;
        assert!(matches!(result, Err(ApiError::MissingToken)));
        let result = api
            .submit_progress(
                &CourseId::new("course-1"),
                &ItemId::new("item-1"),
                &SubmissionPayload::LectureComplete,
            )
            .await;
        assert!(matches!(result, Err(ApiError::MissingToken)));
    }

    #[test]
    fn test_ids_are_percent_encoded_into_paths() {
        let api = HttpApi::new("http://localhost:8000/", Some("tok".to_string()));
        let url = api.course_url(&CourseId::new("course one/two"));
        assert_eq!(url, "http://localhost:8000/courses/course%20one%2Ftwo");
    }

    #[tokio::test]
    async fn test_in_memory_submit_scores_quiz_answers() {
        let api = InMemoryApi::new();
        let course_id = CourseId::new("c");
        api.insert_course(CourseOutline {
            id: course_id.clone(),
            title: "t".to_string(),
            sections: Vec::new(),
        });
        let payload = SubmissionPayload::QuizAnswers {
            answers: vec![
                QuizAnswer {
                    question_id: QuestionId::new("q1"),
                    chosen_option_text: "right".to_string(),
                    correct: true,
                },
                QuizAnswer {
                    question_id: QuestionId::new("q2"),
                    chosen_option_text: "wrong".to_string(),
                    correct: false,
                },
            ],
            time_taken_minutes: 1,
        };
        let receipt = api
            .submit_progress(&course_id, &ItemId::new("quiz-1"), &payload)
            .await
            .unwrap();
        assert!(receipt.completed);
        assert_eq!(receipt.score, Some(50.0));

        let progress = api.get_progress(&course_id).await.unwrap();
        let record = &progress.records[&ItemId::new("quiz-1")];
        assert!(record.completed);
        assert_eq!(record.score, Some(50.0));
    }

    #[tokio::test]
    async fn test_in_memory_submit_failure_injection() {
        let api = InMemoryApi::new();
        let course_id = CourseId::new("c");
        api.insert_course(CourseOutline {
            id: course_id.clone(),
            title: "t".to_string(),
            sections: Vec::new(),
        });
        api.set_submit_failure(true);
        let result = api
            .submit_progress(
                &course_id,
                &ItemId::new("l1"),
                &SubmissionPayload::LectureComplete,
            )
            .await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert!(api.submissions().is_empty());
    }
}
