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

use axum::Form;
use axum::extract::Path;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::error::Fallible;
use crate::player::state::PlayerState;
use crate::player::view::item_url;
use crate::quiz::QuizSession;
use crate::types::course::ItemDetail;
use crate::types::ids::ItemId;
use crate::types::ids::SectionId;
use crate::types::quiz::QuizDefinition;
use crate::types::submission::SubmissionPayload;

#[derive(Debug, Deserialize)]
enum Action {
    Start,
    Select,
    PreviousQuestion,
    NextQuestion,
    Submit,
    Retry,
    Retake,
    Advance,
    GoBack,
    ToggleSection,
    SubmitAssignment,
    RefreshProgress,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    option: Option<usize>,
    section: Option<String>,
    text: Option<String>,
}

pub async fn post_handler(
    State(state): State<PlayerState>,
    Path(id): Path<String>,
    Form(form): Form<FormData>,
) -> Redirect {
    let item_id = ItemId::new(id);
    match action_handler(state, item_id.clone(), form).await {
        Ok(redirect) => redirect,
        Err(e) => {
            log::error!("error: {e}");
            Redirect::to(&item_url(&item_id))
        }
    }
}

async fn action_handler(
    state: PlayerState,
    item_id: ItemId,
    form: FormData,
) -> Fallible<Redirect> {
    let back = Redirect::to(&item_url(&item_id));
    match form.action {
        Action::ToggleSection => {
            if let Some(section) = form.section {
                let section_id = SectionId::new(section);
                let mut mutable = state.mutable.lock().unwrap();
                if mutable.expanded.as_ref() == Some(&section_id) {
                    mutable.expanded = None;
                } else {
                    mutable.expanded = Some(section_id);
                }
            }
            Ok(back)
        }
        Action::RefreshProgress => {
            if let Err(e) = state.store.refresh().await {
                log::error!("error: {e}");
            }
            Ok(back)
        }
        Action::Advance => match state.navigator.advance(&item_id).await {
            Some(next) => Ok(Redirect::to(&item_url(&next))),
            None => Ok(Redirect::to("/complete")),
        },
        Action::GoBack => match state.navigator.previous(&item_id) {
            Some(previous) => Ok(Redirect::to(&item_url(&previous))),
            None => Ok(back),
        },
        Action::Start => {
            let prior = state.store.record_of(&item_id);
            let mut mutable = state.mutable.lock().unwrap();
            if mutable.session_for(&item_id).is_none() {
                if let Some(definition) = quiz_definition(&state, &item_id) {
                    mutable.session = Some(QuizSession::new(
                        item_id.clone(),
                        definition.clone(),
                        state.clock,
                        prior,
                    ));
                }
            }
            if let Some(session) = mutable.session_for_mut(&item_id) {
                session.start(&mut rand::thread_rng());
            }
            Ok(back)
        }
        Action::Select => {
            let option = form.option;
            let handoff = with_live_session(&state, &item_id, |session| {
                if let Some(option) = option {
                    if !session.select_option(option) {
                        log::warn!("rejected selection of option {option} for {item_id}");
                    }
                }
            });
            if let Some((attempt, payload)) = handoff {
                dispatch_submission(&state, item_id.clone(), attempt, payload);
            }
            Ok(back)
        }
        Action::NextQuestion => {
            let handoff = with_live_session(&state, &item_id, |session| session.go_next());
            if let Some((attempt, payload)) = handoff {
                dispatch_submission(&state, item_id.clone(), attempt, payload);
            }
            Ok(back)
        }
        Action::PreviousQuestion => {
            let handoff = with_live_session(&state, &item_id, |session| session.go_previous());
            if let Some((attempt, payload)) = handoff {
                dispatch_submission(&state, item_id.clone(), attempt, payload);
            }
            Ok(back)
        }
        Action::Submit => {
            let handoff = {
                let mut mutable = state.mutable.lock().unwrap();
                mutable
                    .session_for_mut(&item_id)
                    .and_then(|session| session.begin_submission())
            };
            if let Some((attempt, payload)) = handoff {
                dispatch_submission(&state, item_id.clone(), attempt, payload);
            }
            Ok(back)
        }
        Action::Retry => {
            let handoff = {
                let mut mutable = state.mutable.lock().unwrap();
                mutable
                    .session_for_mut(&item_id)
                    .and_then(|session| session.retry())
            };
            if let Some((attempt, payload)) = handoff {
                dispatch_submission(&state, item_id.clone(), attempt, payload);
            }
            Ok(back)
        }
        Action::Retake => {
            let mut mutable = state.mutable.lock().unwrap();
            if mutable.session_for(&item_id).is_some() {
                if let Some(session) = mutable.session_for_mut(&item_id) {
                    session.retake();
                }
            } else if let Some(definition) = quiz_definition(&state, &item_id) {
                // Completed in an earlier session: set up a fresh attempt
                // that ignores the recorded completion.
                mutable.session = Some(QuizSession::new(
                    item_id.clone(),
                    definition.clone(),
                    state.clock,
                    None,
                ));
            }
            Ok(back)
        }
        Action::SubmitAssignment => {
            submit_assignment(&state, &item_id, form.text).await;
            Ok(back)
        }
    }
}

fn quiz_definition<'a>(state: &'a PlayerState, item_id: &ItemId) -> Option<&'a QuizDefinition> {
    match state.outline.get(item_id) {
        Some(item) => match &item.detail {
            ItemDetail::Quiz(detail) => detail.definition.as_ref(),
            _ => None,
        },
        None => None,
    }
}

/// Run an operation against the live session for this item, unless its
/// time limit has run out, in which case the operation is skipped and
/// the forced submission hand-off is returned instead.
fn with_live_session<F>(
    state: &PlayerState,
    item_id: &ItemId,
    operation: F,
) -> Option<(u64, SubmissionPayload)>
where
    F: FnOnce(&mut QuizSession),
{
    let mut mutable = state.mutable.lock().unwrap();
    let session = mutable.session_for_mut(item_id)?;
    if session.expired() {
        return session.begin_submission();
    }
    operation(session);
    None
}

/// Post a claimed quiz submission from a background task, so it keeps
/// going even if the learner navigates away mid-flight. The session
/// lock is never held across the network call.
fn dispatch_submission(
    state: &PlayerState,
    item_id: ItemId,
    attempt: u64,
    payload: SubmissionPayload,
) {
    let api = state.api.clone();
    let store = state.store.clone();
    let mutable = state.mutable.clone();
    let course_id = state.course.id.clone();
    tokio::spawn(async move {
        match api.submit_progress(&course_id, &item_id, &payload).await {
            Ok(receipt) => {
                log::debug!("submission for {item_id} acknowledged ({})", receipt.id);
                {
                    let mut mutable = mutable.lock().unwrap();
                    if let Some(session) = mutable.session_for_mut(&item_id) {
                        session.complete_submission(attempt, &receipt);
                    }
                }
                if let Err(e) = store.refresh().await {
                    log::error!("error: {e}");
                }
            }
            Err(e) => {
                log::error!("error: {e}");
                let mut mutable = mutable.lock().unwrap();
                if let Some(session) = mutable.session_for_mut(&item_id) {
                    session.fail_submission(attempt, e.to_string());
                }
            }
        }
    });
}

async fn submit_assignment(state: &PlayerState, item_id: &ItemId, text: Option<String>) {
    let is_assignment = match state.outline.get(item_id) {
        Some(item) => matches!(item.detail, ItemDetail::Assignment(_)),
        None => false,
    };
    let text = text.unwrap_or_default();
    let text = text.trim();
    if !is_assignment || text.is_empty() || state.store.is_completed(item_id) {
        return;
    }
    let payload = SubmissionPayload::AssignmentText {
        text: text.to_string(),
    };
    match state
        .api
        .submit_progress(&state.course.id, item_id, &payload)
        .await
    {
        Ok(receipt) => {
            log::debug!("assignment {item_id} submitted ({})", receipt.id);
            if let Err(e) = state.store.refresh().await {
                log::error!("error: {e}");
            }
        }
        Err(e) => {
            log::error!("error: {e}");
        }
    }
}
