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

use crate::types::ids::ItemId;

/// Per-item completion state, as reported by the LMS.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub completed: bool,
    /// Latest quiz score as a percentage, if the item has one.
    pub score: Option<f64>,
}

/// The full progress state of one course, fetched in a single call.
#[derive(Debug, Clone)]
pub struct CourseProgress {
    pub records: HashMap<ItemId, ProgressRecord>,
    pub completed_items: u32,
    pub total_items: u32,
    pub progress_percentage: f64,
}

/// Course-level aggregates, as last reported by the LMS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSummary {
    pub completed_items: u32,
    pub total_items: u32,
    pub progress_percentage: f64,
}

impl ProgressSummary {
    /// The summary before any progress state has been loaded.
    pub fn unknown() -> Self {
        Self {
            completed_items: 0,
            total_items: 0,
            progress_percentage: 0.0,
        }
    }
}
