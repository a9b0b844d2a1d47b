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

use crate::api::ProgressApi;
use crate::error::Fallible;
use crate::types::ids::CourseId;
use crate::types::ids::ItemId;
use crate::types::progress::ProgressRecord;
use crate::types::progress::ProgressSummary;

/// In-memory copy of one course's progress state.
///
/// The LMS is the source of truth; this store holds the last fetched
/// snapshot and answers lookups from it. `refresh` replaces the snapshot
/// wholesale, never merges. Before the first successful refresh, and
/// after a failed one, every item reads as not completed with no score.
#[derive(Clone)]
pub struct ProgressStore {
    api: Arc<dyn ProgressApi>,
    course_id: CourseId,
    inner: Arc<Mutex<StoreState>>,
}

struct StoreState {
    records: HashMap<ItemId, ProgressRecord>,
    summary: ProgressSummary,
    loaded: bool,
}

impl ProgressStore {
    pub fn new(api: Arc<dyn ProgressApi>, course_id: CourseId) -> Self {
        Self {
            api,
            course_id,
            inner: Arc::new(Mutex::new(StoreState {
                records: HashMap::new(),
                summary: ProgressSummary::unknown(),
                loaded: false,
            })),
        }
    }

    /// Fetch the full progress state and replace the snapshot with it.
    ///
    /// The fetch happens without the store lock held; the result is
    /// applied in one step afterwards. On failure the store degrades to
    /// the unknown state and the error is returned to the caller, which
    /// owns the retry policy.
    pub async fn refresh(&self) -> Fallible<()> {
        match self.api.get_progress(&self.course_id).await {
            Ok(progress) => {
                let mut inner = self.inner.lock().unwrap();
                inner.records = progress.records;
                inner.summary = ProgressSummary {
                    completed_items: progress.completed_items,
                    total_items: progress.total_items,
                    progress_percentage: progress.progress_percentage,
                };
                inner.loaded = true;
                Ok(())
            }
            Err(e) => {
                self.invalidate();
                Err(e.into())
            }
        }
    }

    /// Drop the snapshot and return to the unknown state.
    pub fn invalidate(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.clear();
        inner.summary = ProgressSummary::unknown();
        inner.loaded = false;
    }

    pub fn is_completed(&self, item_id: &ItemId) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .records
            .get(item_id)
            .map(|record| record.completed)
            .unwrap_or(false)
    }

    pub fn score_of(&self, item_id: &ItemId) -> Option<f64> {
        let inner = self.inner.lock().unwrap();
        inner.records.get(item_id).and_then(|record| record.score)
    }

    pub fn record_of(&self, item_id: &ItemId) -> Option<ProgressRecord> {
        let inner = self.inner.lock().unwrap();
        inner.records.get(item_id).cloned()
    }

    pub fn summary(&self) -> ProgressSummary {
        let inner = self.inner.lock().unwrap();
        inner.summary
    }

    /// Whether any snapshot has been loaded since startup or the last
    /// failed refresh.
    pub fn loaded(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.loaded
    }
}
