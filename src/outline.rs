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

use crate::types::course::CourseOutline;
use crate::types::course::CurriculumItem;
use crate::types::ids::ItemId;
use crate::types::ids::SectionId;

/// The course flattened into a single ordered list: sections in position
/// order, items in their order within each section. All navigation runs
/// over this list; lookups are linear scans, since courses have at most
/// a few hundred items.
pub struct Outline {
    entries: Vec<Entry>,
}

struct Entry {
    section_id: SectionId,
    item: CurriculumItem,
}

impl Outline {
    pub fn from_course(course: &CourseOutline) -> Self {
        let mut entries = Vec::with_capacity(course.item_count());
        for section in &course.sections {
            for item in &section.items {
                entries.push(Entry {
                    section_id: section.id.clone(),
                    item: item.clone(),
                });
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &CurriculumItem> {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn first(&self) -> Option<&CurriculumItem> {
        self.entries.first().map(|entry| &entry.item)
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&CurriculumItem> {
        self.position_of(item_id).map(|index| &self.entries[index].item)
    }

    /// 0-based position of an item in the flattened order.
    pub fn position_of(&self, item_id: &ItemId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.item.id == *item_id)
    }

    /// The item after the given one, or `None` at the end of the course
    /// and for unknown ids.
    pub fn next_after(&self, item_id: &ItemId) -> Option<&CurriculumItem> {
        let index = self.position_of(item_id)?;
        self.entries.get(index + 1).map(|entry| &entry.item)
    }

    /// The item before the given one, or `None` at the start of the
    /// course and for unknown ids.
    pub fn previous_before(&self, item_id: &ItemId) -> Option<&CurriculumItem> {
        let index = self.position_of(item_id)?;
        if index == 0 {
            return None;
        }
        self.entries.get(index - 1).map(|entry| &entry.item)
    }

    pub fn section_of(&self, item_id: &ItemId) -> Option<&SectionId> {
        let index = self.position_of(item_id)?;
        Some(&self.entries[index].section_id)
    }
}
