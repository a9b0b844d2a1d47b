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

use std::sync::Arc;

use crate::api::ProgressApi;
use crate::outline::Outline;
use crate::store::ProgressStore;
use crate::types::ids::CourseId;
use crate::types::ids::ItemId;
use crate::types::submission::SubmissionPayload;

/// Moves the learner through the flattened course order.
///
/// Advancing away from an unfinished lecture first posts its completion
/// to the LMS and waits for the acknowledgement, so the progress panel
/// can never show the next item while the previous one's completion is
/// still unsent. A failed completion post is logged and dropped; it
/// never blocks navigation.
#[derive(Clone)]
pub struct Navigator {
    course_id: CourseId,
    outline: Arc<Outline>,
    api: Arc<dyn ProgressApi>,
    store: ProgressStore,
}

impl Navigator {
    pub fn new(
        course_id: CourseId,
        outline: Arc<Outline>,
        api: Arc<dyn ProgressApi>,
        store: ProgressStore,
    ) -> Self {
        Self {
            course_id,
            outline,
            api,
            store,
        }
    }

    /// Move forward from `current`. Returns the next item's id, or
    /// `None` at the end of the course. The departure side effect runs
    /// either way.
    pub async fn advance(&self, current: &ItemId) -> Option<ItemId> {
        self.record_departure(current).await;
        self.outline
            .next_after(current)
            .map(|item| item.id.clone())
    }

    /// Move backward from `current`. Going back never submits anything.
    pub fn previous(&self, current: &ItemId) -> Option<ItemId> {
        self.outline
            .previous_before(current)
            .map(|item| item.id.clone())
    }

    /// Post a lecture completion when leaving an unfinished lecture.
    /// Quizzes and assignments complete through their own submissions,
    /// and a lecture already marked completed is left alone.
    async fn record_departure(&self, current: &ItemId) {
        let item = match self.outline.get(current) {
            Some(item) => item,
            None => return,
        };
        if !item.is_lecture() {
            return;
        }
        if self.store.is_completed(current) {
            return;
        }
        match self
            .api
            .submit_progress(&self.course_id, current, &SubmissionPayload::LectureComplete)
            .await
        {
            Ok(receipt) => {
                log::debug!("lecture {current} completed ({})", receipt.id);
                if let Err(e) = self.store.refresh().await {
                    log::error!("error: {e}");
                }
            }
            Err(e) => {
                log::error!("error: {e}");
            }
        }
    }
}
