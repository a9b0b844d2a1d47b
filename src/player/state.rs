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
use std::sync::Mutex;

use crate::api::ProgressApi;
use crate::navigator::Navigator;
use crate::outline::Outline;
use crate::quiz::QuizSession;
use crate::store::ProgressStore;
use crate::types::clock::Clock;
use crate::types::course::CourseOutline;
use crate::types::ids::ItemId;
use crate::types::ids::SectionId;

#[derive(Clone)]
pub struct PlayerState {
    pub course: Arc<CourseOutline>,
    pub outline: Arc<Outline>,
    pub api: Arc<dyn ProgressApi>,
    pub store: ProgressStore,
    pub navigator: Navigator,
    pub clock: Clock,
    pub mutable: Arc<Mutex<MutableState>>,
}

#[derive(Default)]
pub struct MutableState {
    /// The item the learner is looking at.
    pub current: Option<ItemId>,
    /// The one expanded sidebar section, if any.
    pub expanded: Option<SectionId>,
    /// The live quiz attempt. At most one exists at a time, and it is
    /// only meaningful for the item it was created on.
    pub session: Option<QuizSession>,
}

impl MutableState {
    pub fn session_for(&self, item_id: &ItemId) -> Option<&QuizSession> {
        self.session
            .as_ref()
            .filter(|session| session.item_id() == item_id)
    }

    pub fn session_for_mut(&mut self, item_id: &ItemId) -> Option<&mut QuizSession> {
        self.session
            .as_mut()
            .filter(|session| session.item_id() == item_id)
    }
}
