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

use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::api::encode_segment;
use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;
use crate::player::state::MutableState;
use crate::player::state::PlayerState;
use crate::quiz::QuizPhase;
use crate::quiz::QuizSession;
use crate::types::course::AssignmentDetail;
use crate::types::course::CurriculumItem;
use crate::types::course::ItemDetail;
use crate::types::course::LectureDetail;
use crate::types::course::Section;
use crate::types::ids::ItemId;
use crate::types::ids::SectionId;
use crate::types::quiz::FeedbackMode;
use crate::types::quiz::QuizDefinition;
use crate::types::quiz::QuizDetail;
use crate::types::quiz::QuizQuestion;

pub fn item_url(item_id: &ItemId) -> String {
    format!("/item/{}", encode_segment(item_id.as_str()))
}

pub fn page(state: &PlayerState, mutable: &MutableState, item: &CurriculumItem) -> Markup {
    html! {
        div.root {
            (sidebar(state, mutable.expanded.as_ref(), &item.id))
            div.content-pane {
                (content(state, mutable, item))
            }
        }
    }
}

pub fn not_found() -> Markup {
    html! {
        div.finished {
            h1 { "Not Found" }
            p { a href="/" { "Back to the course" } }
        }
    }
}

pub fn course_complete(state: &PlayerState) -> Markup {
    let summary = state.store.summary();
    html! {
        div.finished {
            h1 { "Course Completed" }
            div.summary {
                (summary.completed_items) " of " (summary.total_items) " items completed."
            }
            p { a href="/" { "Back to the course" } }
        }
    }
}

// ── Sidebar ────────────────────────────────────────────────────

fn sidebar(state: &PlayerState, expanded: Option<&SectionId>, current: &ItemId) -> Markup {
    let summary = state.store.summary();
    let fill = format!("width: {:.0}%;", summary.progress_percentage);
    html! {
        div.sidebar {
            div.course-header {
                h2 { (state.course.title) }
                div.progress-bar {
                    div.progress-fill style=(fill) {}
                }
                @if state.store.loaded() {
                    div.progress-label {
                        (summary.completed_items) " / " (summary.total_items) " completed"
                    }
                } @else {
                    div.progress-label.progress-stale { "Progress unavailable" }
                    form action=(item_url(current)) method="post" {
                        input type="hidden" name="action" value="RefreshProgress";
                        button.refresh type="submit" { "Reload progress" }
                    }
                }
            }
            div.sections {
                @for section in &state.course.sections {
                    (section_block(state, section, expanded, current))
                }
            }
        }
    }
}

fn section_block(
    state: &PlayerState,
    section: &Section,
    expanded: Option<&SectionId>,
    current: &ItemId,
) -> Markup {
    let open = expanded == Some(&section.id);
    html! {
        div.section {
            form action=(item_url(current)) method="post" {
                input type="hidden" name="action" value="ToggleSection";
                input type="hidden" name="section" value=(section.id);
                button.section-header type="submit" {
                    span.section-marker {
                        @if open { "▾" } @else { "▸" }
                    }
                    (section.title)
                }
            }
            @if open {
                ul.items {
                    @for item in &section.items {
                        (item_row(state, item, current))
                    }
                }
            }
        }
    }
}

fn item_row(state: &PlayerState, item: &CurriculumItem, current: &ItemId) -> Markup {
    let completed = state.store.is_completed(&item.id);
    let class = if item.id == *current {
        "item item-current"
    } else {
        "item"
    };
    html! {
        li class=(class) {
            a href=(item_url(&item.id)) {
                span.item-mark {
                    @if completed { "✓" } @else { "○" }
                }
                span.item-kind { (item.kind_label()) }
                span.item-title { (item.title) }
            }
        }
    }
}

// ── Content panes ──────────────────────────────────────────────

fn content(state: &PlayerState, mutable: &MutableState, item: &CurriculumItem) -> Markup {
    match &item.detail {
        ItemDetail::Lecture(detail) => lecture_pane(state, item, detail),
        ItemDetail::Quiz(detail) => quiz_pane(state, mutable, item, detail),
        ItemDetail::Assignment(detail) => assignment_pane(state, item, detail),
    }
}

fn lecture_pane(state: &PlayerState, item: &CurriculumItem, detail: &LectureDetail) -> Markup {
    let completed = state.store.is_completed(&item.id);
    html! {
        div.lecture {
            div.item-heading {
                h1 { (item.title) }
                @if completed {
                    span.completed-badge { "Completed" }
                }
            }
            @if let Some(minutes) = detail.duration_minutes {
                div.duration { (minutes) " min" }
            }
            @if let Some(url) = &detail.video_url {
                video.lecture-video controls src=(url) {}
            }
            @if !detail.body.is_empty() {
                div.rich-text {
                    (PreEscaped(markdown_to_html(&detail.body)))
                }
            }
            (course_controls(state, &item.id))
        }
    }
}

fn assignment_pane(state: &PlayerState, item: &CurriculumItem, detail: &AssignmentDetail) -> Markup {
    let completed = state.store.is_completed(&item.id);
    html! {
        div.assignment {
            div.item-heading {
                h1 { (item.title) }
                @if completed {
                    span.completed-badge { "Submitted" }
                }
            }
            @if let Some(due) = &detail.due {
                div.due { "Due: " (due) }
            }
            @if !detail.instructions.is_empty() {
                div.rich-text {
                    (PreEscaped(markdown_to_html(&detail.instructions)))
                }
            }
            @if completed {
                @if let Some(score) = state.store.score_of(&item.id) {
                    div.grade { "Grade: " (format!("{score:.0}%")) }
                }
            } @else {
                form.assignment-form action=(item_url(&item.id)) method="post" {
                    input type="hidden" name="action" value="SubmitAssignment";
                    textarea name="text" rows="10" placeholder="Write your submission" {}
                    button.primary type="submit" { "Submit Assignment" }
                }
            }
            (course_controls(state, &item.id))
        }
    }
}

// ── Quiz panes ─────────────────────────────────────────────────

fn quiz_pane(
    state: &PlayerState,
    mutable: &MutableState,
    item: &CurriculumItem,
    detail: &QuizDetail,
) -> Markup {
    let definition = match &detail.definition {
        Some(definition) => definition,
        None => {
            return html! {
                div.quiz {
                    div.item-heading {
                        h1 { (item.title) }
                    }
                    p.quiz-unavailable { "This quiz has no data." }
                    (course_controls(state, &item.id))
                }
            };
        }
    };
    match mutable.session_for(&item.id) {
        None => {
            if state.store.is_completed(&item.id) {
                history_pane(state, item, definition)
            } else {
                start_pane(state, item, definition)
            }
        }
        Some(session) => match session.phase() {
            QuizPhase::Configuring => start_pane(state, item, definition),
            QuizPhase::Active => question_pane(session, item),
            QuizPhase::AwaitingSubmission => submit_pane(session, item),
            QuizPhase::Submitting => submitting_pane(),
            QuizPhase::SubmissionFailed => failure_pane(session, item),
            QuizPhase::Completed => results_pane(state, session, item),
        },
    }
}

fn start_pane(state: &PlayerState, item: &CurriculumItem, definition: &QuizDefinition) -> Markup {
    html! {
        div.quiz {
            div.item-heading {
                h1 { (definition.title) }
            }
            table.quiz-info {
                tbody {
                    tr {
                        td.key { "Questions" }
                        td.val { (definition.question_count()) }
                    }
                    tr {
                        td.key { "Time limit" }
                        td.val {
                            @if let Some(minutes) = definition.time_limit_minutes {
                                (minutes) " minutes"
                            } @else {
                                "None"
                            }
                        }
                    }
                    tr {
                        td.key { "Passing score" }
                        td.val { (format!("{:.0}%", definition.passing_score)) }
                    }
                }
            }
            form action=(item_url(&item.id)) method="post" {
                input type="hidden" name="action" value="Start";
                button.primary type="submit" { "Start Quiz" }
            }
            (course_controls(state, &item.id))
        }
    }
}

fn history_pane(state: &PlayerState, item: &CurriculumItem, definition: &QuizDefinition) -> Markup {
    let score = state.store.score_of(&item.id);
    let passed = score.map(|score| score >= definition.passing_score);
    html! {
        div.quiz {
            div.item-heading {
                h1 { (definition.title) }
                span.completed-badge { "Completed" }
            }
            (result_banner(passed, score, definition))
            p { "You completed this quiz in an earlier session." }
            form action=(item_url(&item.id)) method="post" {
                button type="submit" name="action" value="Retake" { "Retake Quiz" }
            }
            (course_controls(state, &item.id))
        }
    }
}

fn question_pane(session: &QuizSession, item: &CurriculumItem) -> Markup {
    let definition = session.definition();
    let position = session.current_index();
    let total = session.question_count();
    let question = match session.current_question() {
        Some(question) => question,
        None => return html! { div.quiz {} },
    };
    let answered = session.current_answer().is_some();
    html! {
        div.quiz {
            div.quiz-header {
                h1 { (definition.title) }
                div.quiz-progress {
                    "Question " (position + 1) " of " (total)
                    " (" (session.answered_count()) " answered)"
                }
                @if let Some(remaining) = session.remaining_seconds() {
                    div #countdown data-remaining=(remaining) {
                        (format_remaining(remaining))
                    }
                }
            }
            div.question {
                h2.question-text {
                    (PreEscaped(markdown_to_html_inline(&question.text)))
                }
                @if let Some(url) = &question.image_url {
                    img.question-image src=(url) alt="";
                }
                @if answered {
                    (answered_options(session, question))
                } @else {
                    form action=(item_url(&item.id)) method="post" {
                        input type="hidden" name="action" value="Select";
                        div.options {
                            @for (index, option) in question.options.iter().enumerate() {
                                button.option type="submit" name="option" value=(index) {
                                    (option.text)
                                }
                            }
                        }
                    }
                }
            }
            div.quiz-controls {
                form action=(item_url(&item.id)) method="post" {
                    @if position == 0 {
                        button type="submit" name="action" value="PreviousQuestion" disabled { "Previous" }
                    } @else {
                        button type="submit" name="action" value="PreviousQuestion" { "Previous" }
                    }
                    div.spacer {}
                    // On the last question "Next" leads to the submit screen.
                    button type="submit" name="action" value="NextQuestion" { "Next" }
                }
            }
            @if session.remaining_seconds().is_some() {
                form #timeout-form action=(item_url(&item.id)) method="post" {
                    input type="hidden" name="action" value="Submit";
                }
            }
        }
    }
}

/// Shown once the learner moves past the last question. Questions can
/// no longer be revisited; the only way forward is to submit.
fn submit_pane(session: &QuizSession, item: &CurriculumItem) -> Markup {
    let definition = session.definition();
    let total = session.question_count();
    let answered = session.answered_count();
    html! {
        div.quiz {
            div.quiz-header {
                h1 { (definition.title) }
                div.quiz-progress {
                    "End of quiz (" (answered) " of " (total) " answered)"
                }
                @if let Some(remaining) = session.remaining_seconds() {
                    div #countdown data-remaining=(remaining) {
                        (format_remaining(remaining))
                    }
                }
            }
            div.submit-screen {
                p { "You have reached the end of the quiz." }
                @if answered < total {
                    p.submit-warning { "Unanswered questions are scored as incorrect." }
                }
                form action=(item_url(&item.id)) method="post" {
                    button.primary type="submit" name="action" value="Submit" { "Submit Quiz" }
                }
            }
            @if session.remaining_seconds().is_some() {
                form #timeout-form action=(item_url(&item.id)) method="post" {
                    input type="hidden" name="action" value="Submit";
                }
            }
        }
    }
}

/// Options after the current question has been answered. In immediate
/// feedback mode this reveals correctness; in deferred mode it only
/// marks the locked-in choice.
fn answered_options(session: &QuizSession, question: &QuizQuestion) -> Markup {
    let immediate = session.definition().feedback_mode == FeedbackMode::Immediate;
    let chosen_index = session.current_answer().map(|answer| answer.option_index);
    if immediate {
        revealed_options(question, chosen_index)
    } else {
        html! {
            div.options {
                @for (index, option) in question.options.iter().enumerate() {
                    @let class = if chosen_index == Some(index) {
                        "option option-chosen"
                    } else {
                        "option option-neutral"
                    };
                    div class=(class) {
                        span.option-text { (option.text) }
                    }
                }
            }
        }
    }
}

/// Options with correctness revealed, used for immediate feedback and
/// for the post-submission review.
fn revealed_options(question: &QuizQuestion, chosen_index: Option<usize>) -> Markup {
    html! {
        div.options {
            @for (index, option) in question.options.iter().enumerate() {
                @let chosen = chosen_index == Some(index);
                @let class = if option.correct {
                    "option option-correct"
                } else if chosen {
                    "option option-incorrect"
                } else {
                    "option option-neutral"
                };
                div class=(class) {
                    span.option-text { (option.text) }
                    @if option.correct {
                        span.badge-correct { "Correct" }
                    } @else if chosen {
                        span.badge-incorrect { "Incorrect" }
                    }
                    @if let Some(explanation) = &option.explanation {
                        div.explanation { (explanation) }
                    }
                }
            }
        }
        @if let Some(explanation) = &question.explanation {
            div.explanation.question-explanation {
                (PreEscaped(markdown_to_html_inline(explanation)))
            }
        }
    }
}

fn submitting_pane() -> Markup {
    html! {
        div.quiz {
            div.submitting {
                h1 { "Submitting" }
                p { "Sending your answers to the course provider." }
            }
        }
    }
}

fn failure_pane(session: &QuizSession, item: &CurriculumItem) -> Markup {
    html! {
        div.quiz {
            div.submission-failed {
                h1 { "Submission failed" }
                @if let Some(message) = session.failure() {
                    p.failure-message { (message) }
                }
                p { "Your answers are saved. You can try again." }
                form action=(item_url(&item.id)) method="post" {
                    button.primary type="submit" name="action" value="Retry" { "Try Again" }
                }
            }
        }
    }
}

fn results_pane(state: &PlayerState, session: &QuizSession, item: &CurriculumItem) -> Markup {
    let definition = session.definition();
    let outcome = match session.outcome() {
        Some(outcome) => *outcome,
        None => return html! { div.quiz {} },
    };
    html! {
        div.quiz {
            div.item-heading {
                h1 { (definition.title) }
            }
            (result_banner(outcome.passed, outcome.score, definition))
            @if outcome.from_history {
                p { "You completed this quiz in an earlier session." }
            } @else {
                div.result-summary {
                    (outcome.correct_count) " of " (session.question_count()) " correct"
                }
                div.review {
                    @for position in 0..session.question_count() {
                        @if let Some(question) = session.question_at(position) {
                            div.review-question {
                                h3.question-text {
                                    (PreEscaped(markdown_to_html_inline(&question.text)))
                                }
                                (revealed_options(
                                    question,
                                    session.answer_at(position).map(|answer| answer.option_index),
                                ))
                            }
                        }
                    }
                }
            }
            form action=(item_url(&item.id)) method="post" {
                button type="submit" name="action" value="Retake" { "Retake Quiz" }
            }
            (course_controls(state, &item.id))
        }
    }
}

/// A score-less completion renders without a pass or fail verdict; the
/// completed badge is all the record supports.
fn result_banner(passed: Option<bool>, score: Option<f64>, definition: &QuizDefinition) -> Markup {
    html! {
        @if let Some(passed) = passed {
            @if passed {
                div.result-banner.result-passed { "Passed" }
            } @else {
                div.result-banner.result-failed { "Not passed" }
            }
        }
        @if let Some(score) = score {
            div.score { (format!("{score:.0}%")) }
        }
        p.passing-note { "Passing score: " (format!("{:.0}%", definition.passing_score)) }
    }
}

// ── Course navigation ──────────────────────────────────────────

fn course_controls(state: &PlayerState, item_id: &ItemId) -> Markup {
    let has_previous = state.outline.previous_before(item_id).is_some();
    let at_end = state.outline.next_after(item_id).is_none();
    html! {
        div.controls {
            form action=(item_url(item_id)) method="post" {
                @if has_previous {
                    button type="submit" name="action" value="GoBack" { "Previous" }
                } @else {
                    button type="submit" name="action" value="GoBack" disabled { "Previous" }
                }
                div.spacer {}
                @if at_end {
                    button.primary type="submit" name="action" value="Advance" { "Finish Course" }
                } @else {
                    button.primary type="submit" name="action" value="Advance" { "Next" }
                }
            }
        }
    }
}

fn format_remaining(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
