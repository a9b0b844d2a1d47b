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

use std::path::Path;
use std::sync::Arc;

use crate::api::HttpApi;
use crate::config::Config;
use crate::error::Fallible;
use crate::player::server::start_server;
use crate::types::ids::CourseId;

pub async fn learn(course_id: &str, config: Option<&Path>, port: Option<u16>) -> Fallible<()> {
    let config = Config::load(config)?;
    let api = Arc::new(HttpApi::new(config.api_url()?, config.token.clone()));
    let course_id = CourseId::new(course_id);
    let port = port.unwrap_or_else(|| config.port());
    println!("Opening course {course_id} at http://localhost:{port}/.");
    start_server(api.clone(), api, course_id, port, true).await
}
