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

use crate::types::ids::CourseId;
use crate::types::ids::ItemId;
use crate::types::ids::SectionId;
use crate::types::quiz::QuizDetail;

/// A course as served by the LMS: ordered sections of ordered items.
#[derive(Debug, Clone)]
pub struct CourseOutline {
    pub id: CourseId,
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    /// 1-based position within the course, as assigned by the LMS.
    pub position: u32,
    pub items: Vec<CurriculumItem>,
}

#[derive(Debug, Clone)]
pub struct CurriculumItem {
    pub id: ItemId,
    pub title: String,
    pub detail: ItemDetail,
}

/// Per-type payload of a curriculum item. The wire format carries a type
/// tag plus optional payload blocks; ingestion resolves that into this
/// enum so nothing downstream has to branch on raw shapes.
#[derive(Debug, Clone)]
pub enum ItemDetail {
    Lecture(LectureDetail),
    Quiz(QuizDetail),
    Assignment(AssignmentDetail),
}

#[derive(Debug, Clone, Default)]
pub struct LectureDetail {
    /// Markdown body of the lecture, possibly empty.
    pub body: String,
    pub video_url: Option<String>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentDetail {
    /// Markdown instructions for the assignment.
    pub instructions: String,
    pub due: Option<String>,
}

impl CurriculumItem {
    pub fn is_lecture(&self) -> bool {
        matches!(self.detail, ItemDetail::Lecture(_))
    }

    /// Human-readable label for the item kind, used in listings.
    pub fn kind_label(&self) -> &'static str {
        match self.detail {
            ItemDetail::Lecture(_) => "Lecture",
            ItemDetail::Quiz(_) => "Quiz",
            ItemDetail::Assignment(_) => "Assignment",
        }
    }
}

impl CourseOutline {
    /// Total number of curriculum items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
