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

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;

use crate::player::state::PlayerState;
use crate::player::template::page_template;
use crate::player::view;
use crate::types::ids::ItemId;

/// Resume where the learner left off, or start at the first item.
pub async fn root_handler(State(state): State<PlayerState>) -> Redirect {
    let current = {
        let mutable = state.mutable.lock().unwrap();
        mutable.current.clone()
    };
    let target = current.or_else(|| state.outline.first().map(|item| item.id.clone()));
    match target {
        Some(item_id) => Redirect::to(&view::item_url(&item_id)),
        None => Redirect::to("/complete"),
    }
}

pub async fn item_handler(
    State(state): State<PlayerState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    let item_id = ItemId::new(id);
    let item = match state.outline.get(&item_id) {
        Some(item) => item.clone(),
        None => {
            let html = page_template("Not Found", view::not_found());
            return (StatusCode::NOT_FOUND, Html(html.into_string()));
        }
    };
    let mut mutable = state.mutable.lock().unwrap();
    // The sidebar follows navigation: landing on an item expands its
    // section, but reloading the same item leaves manual toggles alone.
    let changed = mutable.current.as_ref() != Some(&item_id);
    mutable.current = Some(item_id.clone());
    if changed {
        mutable.expanded = state.outline.section_of(&item_id).cloned();
        // Moving to another item abandons any quiz attempt left behind.
        // A submission already in flight keeps running; only the local
        // attempt state is dropped.
        if mutable
            .session
            .as_ref()
            .is_some_and(|session| session.item_id() != &item_id)
        {
            mutable.session = None;
        }
    }
    let body = view::page(&state, &mutable, &item);
    drop(mutable);
    let html = page_template(&state.course.title, body);
    (StatusCode::OK, Html(html.into_string()))
}

pub async fn complete_handler(State(state): State<PlayerState>) -> (StatusCode, Html<String>) {
    let html = page_template(&state.course.title, view::course_complete(&state));
    (StatusCode::OK, Html(html.into_string()))
}
