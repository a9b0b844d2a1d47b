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
use crate::api::ProgressApi;
use crate::config::Config;
use crate::error::Fallible;
use crate::types::course::CourseOutline;
use crate::types::ids::CourseId;
use crate::types::progress::CourseProgress;

pub async fn print_progress(course_id: &str, config: Option<&Path>) -> Fallible<()> {
    let config = Config::load(config)?;
    let api = HttpApi::new(config.api_url()?, config.token.clone());
    let course_id = CourseId::new(course_id);
    let course = api.get_course(&course_id).await?;
    let progress = api.get_progress(&course_id).await?;
    for line in progress_lines(&course, &progress) {
        println!("{line}");
    }
    Ok(())
}

fn progress_lines(course: &CourseOutline, progress: &CourseProgress) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Course: {}", course.title));
    lines.push(format!(
        "Progress: {} / {} ({:.0}%)",
        progress.completed_items, progress.total_items, progress.progress_percentage
    ));
    for section in &course.sections {
        lines.push(String::new());
        lines.push(section.title.clone());
        for item in &section.items {
            let record = progress.records.get(&item.id);
            let mark = if record.is_some_and(|record| record.completed) {
                "x"
            } else {
                " "
            };
            let line = match record.and_then(|record| record.score) {
                Some(score) => format!(
                    "  [{mark}] {} {} ({score:.0}%)",
                    item.kind_label(),
                    item.title
                ),
                None => format!("  [{mark}] {} {}", item.kind_label(), item.title),
            };
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::course::CurriculumItem;
    use crate::types::course::ItemDetail;
    use crate::types::course::LectureDetail;
    use crate::types::course::Section;
    use crate::types::ids::ItemId;
    use crate::types::ids::SectionId;
    use crate::types::progress::ProgressRecord;
    use crate::types::quiz::QuizDetail;

    #[test]
    fn test_progress_lines() {
        let course = CourseOutline {
            id: CourseId::new("course-1"),
            title: "Test Course".to_string(),
            sections: vec![Section {
                id: SectionId::new("s1"),
                title: "Basics".to_string(),
                position: 1,
                items: vec![
                    CurriculumItem {
                        id: ItemId::new("lec-1"),
                        title: "Intro".to_string(),
                        detail: ItemDetail::Lecture(LectureDetail::default()),
                    },
                    CurriculumItem {
                        id: ItemId::new("quiz-1"),
                        title: "Check".to_string(),
                        detail: ItemDetail::Quiz(QuizDetail {
                            definition: None,
                            defects: Vec::new(),
                        }),
                    },
                ],
            }],
        };
        let mut records = HashMap::new();
        records.insert(
            ItemId::new("quiz-1"),
            ProgressRecord {
                completed: true,
                score: Some(80.0),
            },
        );
        let progress = CourseProgress {
            records,
            completed_items: 1,
            total_items: 2,
            progress_percentage: 50.0,
        };
        let lines = progress_lines(&course, &progress);
        assert_eq!(lines[0], "Course: Test Course");
        assert_eq!(lines[1], "Progress: 1 / 2 (50%)");
        assert_eq!(lines[3], "Basics");
        assert_eq!(lines[4], "  [ ] Lecture Intro");
        assert_eq!(lines[5], "  [x] Quiz Check (80%)");
    }
}
