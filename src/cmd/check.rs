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

use crate::api::CourseApi;
use crate::api::HttpApi;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::course::CourseOutline;
use crate::types::course::ItemDetail;
use crate::types::ids::CourseId;

/// Fetch a course and report quizzes the player cannot run.
pub async fn check_course(course_id: &str, config: Option<&Path>) -> Fallible<()> {
    let config = Config::load(config)?;
    let api = HttpApi::new(config.api_url()?, config.token.clone());
    let course = api.get_course(&CourseId::new(course_id)).await?;
    let defects = course_defects(&course);
    if defects.is_empty() {
        println!("ok");
        return Ok(());
    }
    for defect in &defects {
        println!("{defect}");
    }
    fail(&format!("{} problems found.", defects.len()))
}

fn course_defects(course: &CourseOutline) -> Vec<String> {
    let mut defects = Vec::new();
    for section in &course.sections {
        for item in &section.items {
            if let ItemDetail::Quiz(detail) = &item.detail {
                for defect in &detail.defects {
                    defects.push(format!("{}: {defect}", item.title));
                }
            }
        }
    }
    defects
}
