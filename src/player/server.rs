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

use std::net::TcpStream;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::time::sleep;

use crate::api::CourseApi;
use crate::api::ProgressApi;
use crate::error::Fallible;
use crate::navigator::Navigator;
use crate::outline::Outline;
use crate::player::get::complete_handler;
use crate::player::get::item_handler;
use crate::player::get::root_handler;
use crate::player::post::post_handler;
use crate::player::state::MutableState;
use crate::player::state::PlayerState;
use crate::player::template::page_template;
use crate::store::ProgressStore;
use crate::types::clock::Clock;
use crate::types::ids::CourseId;

pub async fn start_server(
    course_api: Arc<dyn CourseApi>,
    progress_api: Arc<dyn ProgressApi>,
    course_id: CourseId,
    port: u16,
    open_browser: bool,
) -> Fallible<()> {
    let course = course_api.get_course(&course_id).await?;
    let outline = Outline::from_course(&course);
    if outline.is_empty() {
        println!("Course has no content.");
        return Ok(());
    }
    let store = ProgressStore::new(progress_api.clone(), course_id.clone());
    if let Err(e) = store.refresh().await {
        // The sidebar shows unknown progress until a refresh succeeds.
        log::error!("error: {e}");
    }
    let outline = Arc::new(outline);
    let navigator = Navigator::new(
        course_id,
        outline.clone(),
        progress_api.clone(),
        store.clone(),
    );
    let state = PlayerState {
        course: Arc::new(course),
        outline,
        api: progress_api,
        store,
        navigator,
        clock: Clock::Default,
        mutable: Arc::new(Mutex::new(MutableState::default())),
    };
    let app = Router::new();
    let app = app.route("/", get(root_handler));
    let app = app.route("/item/{id}", get(item_handler).post(post_handler));
    let app = app.route("/complete", get(complete_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(stylesheet_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    if open_browser {
        tokio::spawn(async move {
            let url = format!("http://localhost:{port}/");
            loop {
                if TcpStream::connect(("localhost", port)).is_ok() {
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(url) {
                log::error!("error: {e}");
            }
        });
    }
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn script_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/javascript"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        include_str!("script.js"),
    )
}

async fn stylesheet_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        include_str!("style.css"),
    )
}

async fn not_found_handler() -> impl IntoResponse {
    let markup = page_template(
        "Not Found",
        maud::html! {
            h1 { "Not Found" }
            p { "The page you requested does not exist." }
        },
    );
    (StatusCode::NOT_FOUND, Html(markup.into_string()))
}
