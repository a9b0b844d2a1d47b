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

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::clock::Clock;
use crate::types::ids::ItemId;
use crate::types::progress::ProgressRecord;
use crate::types::quiz::OrderMode;
use crate::types::quiz::QuizDefinition;
use crate::types::quiz::QuizQuestion;
use crate::types::submission::QuizAnswer;
use crate::types::submission::SubmissionPayload;
use crate::types::submission::SubmissionReceipt;

/// Lifecycle phase of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Start screen: title, question count, time limit, passing score.
    Configuring,
    /// Questions are being presented.
    Active,
    /// The learner moved past the last question. The question index is
    /// frozen; only submission remains.
    AwaitingSubmission,
    /// The answer set has been handed off to the LMS. Exactly one
    /// submission can be in flight at a time.
    Submitting,
    /// The hand-off failed. The answer set is intact and can be retried.
    SubmissionFailed,
    /// The LMS acknowledged the attempt, or an earlier session already
    /// completed this quiz.
    Completed,
}

/// Submission serials come from a process-wide counter, so a receipt
/// posted by a session that has since been dropped can never match a
/// serial issued by the session that replaced it.
static NEXT_ATTEMPT: AtomicU64 = AtomicU64::new(1);

fn next_attempt_serial() -> u64 {
    NEXT_ATTEMPT.fetch_add(1, Ordering::Relaxed)
}

/// The learner's choice for one question, keyed by presentation position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChosenAnswer {
    pub option_index: usize,
    pub correct: bool,
}

/// How an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizOutcome {
    pub score: Option<f64>,
    /// Whether the score cleared the passing bar. `None` when no score
    /// is known, as for a score-less completion from an earlier
    /// session; completion without a score carries no verdict.
    pub passed: Option<bool>,
    pub correct_count: usize,
    /// True when the quiz was completed in an earlier session and this
    /// attempt never ran locally.
    pub from_history: bool,
}

/// State machine for a single quiz attempt.
///
/// Questions are presented in an order fixed once at `start`: authored
/// order, or a single shuffle for randomized quizzes. Answers lock on
/// first selection regardless of feedback mode. Submission is a
/// two-step hand-off: `begin_submission` claims the in-flight slot and
/// yields the payload, and the eventual `complete_submission` or
/// `fail_submission` must present the same attempt serial, so a result
/// from a superseded attempt is discarded.
///
/// Invalid operations for the current phase are ignored.
pub struct QuizSession {
    item_id: ItemId,
    definition: QuizDefinition,
    clock: Clock,
    phase: QuizPhase,
    /// Presentation order: indices into `definition.questions`.
    order: Vec<usize>,
    /// One slot per presentation position.
    answers: Vec<Option<ChosenAnswer>>,
    current: usize,
    started_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    attempt: u64,
    outcome: Option<QuizOutcome>,
    failure: Option<String>,
}

impl QuizSession {
    /// Create a session for a quiz item. If the progress record already
    /// marks the item completed, the session starts in `Completed` with
    /// the recorded score and no questions are ever presented.
    pub fn new(
        item_id: ItemId,
        definition: QuizDefinition,
        clock: Clock,
        prior: Option<ProgressRecord>,
    ) -> Self {
        let mut session = Self {
            item_id,
            started_at: clock.now(),
            definition,
            clock,
            phase: QuizPhase::Configuring,
            order: Vec::new(),
            answers: Vec::new(),
            current: 0,
            deadline: None,
            attempt: 0,
            outcome: None,
            failure: None,
        };
        if let Some(record) = prior {
            if record.completed {
                let passed = record
                    .score
                    .map(|score| score >= session.definition.passing_score);
                session.phase = QuizPhase::Completed;
                session.outcome = Some(QuizOutcome {
                    score: record.score,
                    passed,
                    correct_count: 0,
                    from_history: true,
                });
            }
        }
        session
    }

    /// Begin the attempt: fix the presentation order and start the timer
    /// if the quiz has a time limit.
    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        if self.phase != QuizPhase::Configuring {
            return;
        }
        let count = self.definition.question_count();
        let mut order: Vec<usize> = (0..count).collect();
        if self.definition.order_mode == OrderMode::Randomized {
            order.shuffle(rng);
        }
        self.order = order;
        self.answers = vec![None; count];
        self.current = 0;
        self.started_at = self.clock.now();
        self.deadline = self
            .definition
            .time_limit_minutes
            .map(|minutes| self.started_at + Duration::minutes(i64::from(minutes)));
        self.phase = QuizPhase::Active;
    }

    /// Record an answer for the current question. The first selection
    /// wins: once a question has an answer it cannot be changed, in
    /// either feedback mode, and a re-selection is rejected with `false`
    /// so the caller can report it. Correctness is decided by comparing
    /// the chosen option's text with the correct option's text.
    pub fn select_option(&mut self, option_index: usize) -> bool {
        if self.phase != QuizPhase::Active {
            return false;
        }
        let question_index = match self.order.get(self.current) {
            Some(index) => *index,
            None => return false,
        };
        if self.answers[self.current].is_some() {
            return false;
        }
        let question = &self.definition.questions[question_index];
        let chosen = match question.options.get(option_index) {
            Some(option) => option,
            None => return false,
        };
        let correct = question
            .correct_option()
            .is_some_and(|option| option.text == chosen.text);
        self.answers[self.current] = Some(ChosenAnswer {
            option_index,
            correct,
        });
        true
    }

    /// Advance to the next question, or to the submit screen when the
    /// last question is already showing. Unanswered questions stay
    /// unanswered; the submit screen warns about them.
    pub fn go_next(&mut self) {
        if self.phase != QuizPhase::Active {
            return;
        }
        if self.current + 1 < self.order.len() {
            self.current += 1;
        } else {
            self.phase = QuizPhase::AwaitingSubmission;
        }
    }

    /// Step back one question. Not possible from the submit screen: the
    /// question index is frozen there.
    pub fn go_previous(&mut self) {
        if self.phase != QuizPhase::Active {
            return;
        }
        if self.current > 0 {
            self.current -= 1;
        }
    }

    fn live(&self) -> bool {
        matches!(
            self.phase,
            QuizPhase::Active | QuizPhase::AwaitingSubmission
        )
    }

    /// Whether the time limit has run out on a live attempt. An expired
    /// attempt must be submitted; unanswered questions go in as
    /// incorrect with an empty choice.
    pub fn expired(&self) -> bool {
        if !self.live() {
            return false;
        }
        match self.deadline {
            Some(deadline) => self.clock.now() >= deadline,
            None => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        match self.phase {
            QuizPhase::AwaitingSubmission => true,
            QuizPhase::Active => self.expired(),
            _ => false,
        }
    }

    /// Claim the in-flight submission slot. Returns the attempt serial
    /// and the payload to post, or `None` if submission is not possible
    /// right now, including when an earlier submission is still in
    /// flight.
    pub fn begin_submission(&mut self) -> Option<(u64, SubmissionPayload)> {
        if !self.can_submit() {
            return None;
        }
        self.phase = QuizPhase::Submitting;
        self.attempt = next_attempt_serial();
        Some((self.attempt, self.build_payload()))
    }

    /// Record the LMS acknowledgement for an in-flight submission. The
    /// receipt's score is authoritative for pass or fail; the local
    /// tally is only a fallback when the receipt carries no score.
    pub fn complete_submission(&mut self, attempt: u64, receipt: &SubmissionReceipt) {
        if self.phase != QuizPhase::Submitting || attempt != self.attempt {
            return;
        }
        let (correct_count, local_score) = self.tally();
        let score = receipt.score.or(Some(local_score));
        let passed = score.map(|s| s >= self.definition.passing_score);
        self.phase = QuizPhase::Completed;
        self.outcome = Some(QuizOutcome {
            score,
            passed,
            correct_count,
            from_history: false,
        });
        self.failure = None;
    }

    /// Record a failed hand-off. The answers stay locked and the attempt
    /// can be retried.
    pub fn fail_submission(&mut self, attempt: u64, message: String) {
        if self.phase != QuizPhase::Submitting || attempt != self.attempt {
            return;
        }
        self.phase = QuizPhase::SubmissionFailed;
        self.failure = Some(message);
    }

    /// Re-submit the same answer set after a failed hand-off.
    pub fn retry(&mut self) -> Option<(u64, SubmissionPayload)> {
        if self.phase != QuizPhase::SubmissionFailed {
            return None;
        }
        self.phase = QuizPhase::Submitting;
        self.attempt = next_attempt_serial();
        self.failure = None;
        Some((self.attempt, self.build_payload()))
    }

    /// Throw away a completed attempt and return to the start screen.
    /// The next submission draws a fresh serial, so nothing from the
    /// old attempt can ever be mistaken for the new one.
    pub fn retake(&mut self) {
        if self.phase != QuizPhase::Completed {
            return;
        }
        self.phase = QuizPhase::Configuring;
        self.order = Vec::new();
        self.answers = Vec::new();
        self.current = 0;
        self.deadline = None;
        self.outcome = None;
        self.failure = None;
    }

    fn build_payload(&self) -> SubmissionPayload {
        let mut answers = Vec::with_capacity(self.order.len());
        for (position, &question_index) in self.order.iter().enumerate() {
            let question = &self.definition.questions[question_index];
            let chosen = self.answers.get(position).and_then(|a| a.as_ref());
            let (chosen_option_text, correct) = match chosen {
                Some(answer) => {
                    let text = question
                        .options
                        .get(answer.option_index)
                        .map(|option| option.text.clone())
                        .unwrap_or_default();
                    (text, answer.correct)
                }
                None => (String::new(), false),
            };
            answers.push(QuizAnswer {
                question_id: question.id.clone(),
                chosen_option_text,
                correct,
            });
        }
        SubmissionPayload::QuizAnswers {
            answers,
            time_taken_minutes: self.time_taken_minutes(),
        }
    }

    /// Elapsed time rounded up to whole minutes, never less than one.
    fn time_taken_minutes(&self) -> u32 {
        let seconds = (self.clock.now() - self.started_at).num_seconds().max(0) as u64;
        seconds.div_ceil(60).max(1) as u32
    }

    fn tally(&self) -> (usize, f64) {
        let correct = self
            .answers
            .iter()
            .flatten()
            .filter(|answer| answer.correct)
            .count();
        let total = self.definition.question_count().max(1);
        (correct, (correct as f64 / total as f64) * 100.0)
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn question_count(&self) -> usize {
        self.definition.question_count()
    }

    /// 0-based presentation position of the question being shown.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn question_at(&self, position: usize) -> Option<&QuizQuestion> {
        let question_index = *self.order.get(position)?;
        self.definition.questions.get(question_index)
    }

    pub fn answer_at(&self, position: usize) -> Option<&ChosenAnswer> {
        self.answers.get(position)?.as_ref()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.question_at(self.current)
    }

    pub fn current_answer(&self) -> Option<&ChosenAnswer> {
        self.answer_at(self.current)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    /// Seconds left on the timer, clamped at zero. `None` for untimed
    /// quizzes and before the attempt starts.
    pub fn remaining_seconds(&self) -> Option<i64> {
        let deadline = self.deadline?;
        Some((deadline - self.clock.now()).num_seconds().max(0))
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    #[cfg(test)]
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::clock::fixed_now;
    use crate::types::ids::QuestionId;
    use crate::types::quiz::FeedbackMode;
    use crate::types::quiz::QuizOption;

    fn question(id: &str) -> QuizQuestion {
        QuizQuestion {
            id: QuestionId::new(id),
            text: format!("What about {id}?"),
            image_url: None,
            options: vec![
                QuizOption {
                    text: format!("{id} right"),
                    correct: true,
                    explanation: None,
                },
                QuizOption {
                    text: format!("{id} wrong"),
                    correct: false,
                    explanation: Some("Not this one.".to_string()),
                },
            ],
            explanation: None,
        }
    }

    fn definition(count: usize, order_mode: OrderMode) -> QuizDefinition {
        QuizDefinition {
            title: "Checkpoint".to_string(),
            questions: (1..=count).map(|n| question(&format!("q{n}"))).collect(),
            time_limit_minutes: None,
            passing_score: 70.0,
            order_mode,
            feedback_mode: FeedbackMode::Immediate,
        }
    }

    fn session(definition: QuizDefinition) -> QuizSession {
        QuizSession::new(
            ItemId::new("item-1"),
            definition,
            Clock::fixed(fixed_now()),
            None,
        )
    }

    fn receipt(score: Option<f64>) -> SubmissionReceipt {
        SubmissionReceipt {
            id: "submission-1".to_string(),
            completed: true,
            score,
            created_at: "2026-01-10T12:00:00Z".to_string(),
            updated_at: "2026-01-10T12:00:00Z".to_string(),
        }
    }

    fn presented_ids(session: &QuizSession) -> Vec<String> {
        (0..session.question_count())
            .map(|position| session.question_at(position).unwrap().id.to_string())
            .collect()
    }

    #[test]
    fn test_randomized_order_is_a_seeded_permutation_fixed_at_start() {
        let mut a = session(definition(8, OrderMode::Randomized));
        a.start(&mut StdRng::seed_from_u64(7));
        let mut b = session(definition(8, OrderMode::Randomized));
        b.start(&mut StdRng::seed_from_u64(7));
        assert_eq!(presented_ids(&a), presented_ids(&b));

        let mut sorted = presented_ids(&a);
        sorted.sort();
        let expected: Vec<String> = (1..=8).map(|n| format!("q{n}")).collect();
        assert_eq!(sorted, expected);

        // Navigating and answering must not reshuffle.
        let before = presented_ids(&a);
        a.go_next();
        a.go_next();
        a.select_option(0);
        a.go_previous();
        assert_eq!(presented_ids(&a), before);
    }

    #[test]
    fn test_sequential_order_is_authored_order() {
        let mut s = session(definition(4, OrderMode::Sequential));
        s.start(&mut StdRng::seed_from_u64(7));
        assert_eq!(presented_ids(&s), vec!["q1", "q2", "q3", "q4"]);
    }

    #[test]
    fn test_next_on_last_question_reaches_submit_screen() {
        let mut s = session(definition(3, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.go_previous();
        assert_eq!(s.current_index(), 0);
        s.go_next();
        s.go_next();
        assert_eq!(s.current_index(), 2);
        s.go_next();
        assert_eq!(s.phase(), QuizPhase::AwaitingSubmission);
        assert!(s.can_submit());

        // The question index is frozen on the submit screen.
        s.go_next();
        s.go_previous();
        assert_eq!(s.current_index(), 2);
        s.select_option(0);
        assert_eq!(s.answered_count(), 0);
    }

    #[test]
    fn test_single_question_next_skips_straight_to_submit_screen() {
        let mut s = session(definition(1, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.go_next();
        assert_eq!(s.phase(), QuizPhase::AwaitingSubmission);
    }

    #[test]
    fn test_single_question_quiz_runs_to_completion() {
        let mut s = session(definition(1, OrderMode::Randomized));
        s.start(&mut rand::thread_rng());
        assert_eq!(s.phase(), QuizPhase::Active);
        s.select_option(0);
        assert_eq!(s.phase(), QuizPhase::Active);
        s.go_next();
        assert_eq!(s.phase(), QuizPhase::AwaitingSubmission);
        let (attempt, payload) = s.begin_submission().unwrap();
        match payload {
            SubmissionPayload::QuizAnswers { answers, .. } => assert_eq!(answers.len(), 1),
            other => panic!("unexpected payload: {other:?}"),
        }
        s.complete_submission(attempt, &receipt(Some(100.0)));
        assert_eq!(s.phase(), QuizPhase::Completed);
        assert_eq!(s.outcome().unwrap().passed, Some(true));
    }

    #[test]
    fn test_first_answer_locks_in_both_feedback_modes() {
        for mode in [FeedbackMode::Immediate, FeedbackMode::Deferred] {
            let mut def = definition(2, OrderMode::Sequential);
            def.feedback_mode = mode;
            let mut s = session(def);
            s.start(&mut rand::thread_rng());
            assert!(s.select_option(1));
            assert!(!s.current_answer().unwrap().correct);
            assert!(!s.select_option(0));
            let answer = s.current_answer().unwrap();
            assert_eq!(answer.option_index, 1);
            assert!(!answer.correct);
        }
    }

    #[test]
    fn test_payload_scores_by_option_text_and_fills_unanswered() {
        let mut def = definition(3, OrderMode::Sequential);
        def.time_limit_minutes = Some(10);
        let mut s = session(def);
        s.start(&mut rand::thread_rng());
        s.select_option(0);
        s.go_next();
        s.select_option(1);
        // Third question left unanswered; force submission via expiry.
        s.clock_mut().advance(Duration::minutes(11));
        assert!(s.expired());
        let (_, payload) = s.begin_submission().unwrap();
        match payload {
            SubmissionPayload::QuizAnswers {
                answers,
                time_taken_minutes,
            } => {
                assert_eq!(answers.len(), 3);
                assert_eq!(answers[0].chosen_option_text, "q1 right");
                assert!(answers[0].correct);
                assert_eq!(answers[1].chosen_option_text, "q2 wrong");
                assert!(!answers[1].correct);
                assert_eq!(answers[2].chosen_option_text, "");
                assert!(!answers[2].correct);
                assert_eq!(time_taken_minutes, 11);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_untimed_quiz_never_expires() {
        let mut s = session(definition(2, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        assert_eq!(s.remaining_seconds(), None);
        s.clock_mut().advance(Duration::days(2));
        assert!(!s.expired());
        assert!(!s.can_submit());
    }

    #[test]
    fn test_timer_expiry_allows_forced_submission() {
        let mut def = definition(2, OrderMode::Sequential);
        def.time_limit_minutes = Some(30);
        let mut s = session(def);
        s.start(&mut rand::thread_rng());
        assert_eq!(s.remaining_seconds(), Some(30 * 60));
        assert!(!s.can_submit());
        s.clock_mut().advance(Duration::minutes(30));
        assert_eq!(s.remaining_seconds(), Some(0));
        assert!(s.expired());
        assert!(s.can_submit());
        assert!(s.begin_submission().is_some());
        assert_eq!(s.phase(), QuizPhase::Submitting);
    }

    #[test]
    fn test_time_taken_rounds_up_to_at_least_one_minute() {
        let mut s = session(definition(1, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.select_option(0);
        s.go_next();
        s.clock_mut().advance(Duration::seconds(61));
        let (_, payload) = s.begin_submission().unwrap();
        match payload {
            SubmissionPayload::QuizAnswers {
                time_taken_minutes, ..
            } => assert_eq!(time_taken_minutes, 2),
            other => panic!("unexpected payload: {other:?}"),
        }

        let mut quick = session(definition(1, OrderMode::Sequential));
        quick.start(&mut rand::thread_rng());
        quick.select_option(0);
        quick.go_next();
        let (_, payload) = quick.begin_submission().unwrap();
        match payload {
            SubmissionPayload::QuizAnswers {
                time_taken_minutes, ..
            } => assert_eq!(time_taken_minutes, 1),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_only_one_submission_can_be_in_flight() {
        let mut s = session(definition(1, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.select_option(0);
        s.go_next();
        let (attempt, _) = s.begin_submission().unwrap();
        assert!(s.begin_submission().is_none());

        // A result carrying the wrong serial is discarded.
        s.complete_submission(attempt + 41, &receipt(Some(100.0)));
        assert_eq!(s.phase(), QuizPhase::Submitting);
        s.complete_submission(attempt, &receipt(Some(100.0)));
        assert_eq!(s.phase(), QuizPhase::Completed);
    }

    #[test]
    fn test_failed_submission_can_be_retried() {
        let mut s = session(definition(1, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.select_option(0);
        s.go_next();
        let (first, _) = s.begin_submission().unwrap();
        s.fail_submission(first, "connection refused".to_string());
        assert_eq!(s.phase(), QuizPhase::SubmissionFailed);
        assert_eq!(s.failure(), Some("connection refused"));

        let (second, payload) = s.retry().unwrap();
        assert!(second > first);
        match payload {
            SubmissionPayload::QuizAnswers { answers, .. } => {
                assert_eq!(answers[0].chosen_option_text, "q1 right");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
        s.complete_submission(second, &receipt(Some(100.0)));
        assert_eq!(s.phase(), QuizPhase::Completed);
        assert_eq!(s.failure(), None);
    }

    #[test]
    fn test_receipt_score_overrides_local_tally() {
        let mut s = session(definition(1, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.select_option(0);
        s.go_next();
        let (attempt, _) = s.begin_submission().unwrap();
        // Locally perfect, but the LMS says 50.
        s.complete_submission(attempt, &receipt(Some(50.0)));
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.score, Some(50.0));
        assert_eq!(outcome.correct_count, 1);
        assert_eq!(outcome.passed, Some(false));
    }

    #[test]
    fn test_local_tally_used_when_receipt_has_no_score() {
        let mut s = session(definition(2, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.select_option(0);
        s.go_next();
        s.select_option(1);
        s.go_next();
        let (attempt, _) = s.begin_submission().unwrap();
        s.complete_submission(attempt, &receipt(None));
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.score, Some(50.0));
        assert_eq!(outcome.passed, Some(false));
    }

    #[test]
    fn test_previously_completed_quiz_short_circuits() {
        let prior = ProgressRecord {
            completed: true,
            score: Some(80.0),
        };
        let s = QuizSession::new(
            ItemId::new("item-1"),
            definition(3, OrderMode::Randomized),
            Clock::fixed(fixed_now()),
            Some(prior),
        );
        assert_eq!(s.phase(), QuizPhase::Completed);
        let outcome = s.outcome().unwrap();
        assert!(outcome.from_history);
        assert_eq!(outcome.score, Some(80.0));
        assert_eq!(outcome.passed, Some(true));

        let fresh = QuizSession::new(
            ItemId::new("item-1"),
            definition(3, OrderMode::Randomized),
            Clock::fixed(fixed_now()),
            Some(ProgressRecord {
                completed: false,
                score: None,
            }),
        );
        assert_eq!(fresh.phase(), QuizPhase::Configuring);
    }

    #[test]
    fn test_scoreless_completion_carries_no_verdict() {
        let s = QuizSession::new(
            ItemId::new("item-1"),
            definition(3, OrderMode::Sequential),
            Clock::fixed(fixed_now()),
            Some(ProgressRecord {
                completed: true,
                score: None,
            }),
        );
        assert_eq!(s.phase(), QuizPhase::Completed);
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.score, None);
        assert_eq!(outcome.passed, None);
    }

    #[test]
    fn test_receipt_for_a_dropped_session_is_ignored_by_its_replacement() {
        // First attempt: answered wrong, submission left in flight when
        // the session is dropped.
        let mut old = session(definition(1, OrderMode::Sequential));
        old.start(&mut rand::thread_rng());
        old.select_option(1);
        old.go_next();
        let (stale, _) = old.begin_submission().unwrap();
        drop(old);

        // Replacement session on the same item, also mid-submission.
        let mut fresh = session(definition(1, OrderMode::Sequential));
        fresh.start(&mut rand::thread_rng());
        fresh.select_option(0);
        fresh.go_next();
        let (current, _) = fresh.begin_submission().unwrap();
        assert_ne!(stale, current);

        // The dropped session's receipt must not complete the new one.
        fresh.complete_submission(stale, &receipt(Some(0.0)));
        assert_eq!(fresh.phase(), QuizPhase::Submitting);
        fresh.complete_submission(current, &receipt(Some(100.0)));
        let outcome = fresh.outcome().unwrap();
        assert_eq!(outcome.score, Some(100.0));
        assert_eq!(outcome.passed, Some(true));
    }

    #[test]
    fn test_retake_returns_to_start_screen() {
        let mut s = session(definition(1, OrderMode::Sequential));
        s.start(&mut rand::thread_rng());
        s.select_option(0);
        s.go_next();
        let (attempt, _) = s.begin_submission().unwrap();
        s.complete_submission(attempt, &receipt(Some(100.0)));

        s.retake();
        assert_eq!(s.phase(), QuizPhase::Configuring);
        assert!(s.outcome().is_none());
        assert_eq!(s.answered_count(), 0);

        s.start(&mut rand::thread_rng());
        assert_eq!(s.phase(), QuizPhase::Active);
        assert!(s.current_answer().is_none());
    }

    #[test]
    fn test_out_of_phase_operations_are_ignored() {
        let mut s = session(definition(2, OrderMode::Sequential));
        // Nothing before start.
        assert!(!s.select_option(0));
        s.go_next();
        assert!(s.begin_submission().is_none());
        assert_eq!(s.phase(), QuizPhase::Configuring);

        s.start(&mut rand::thread_rng());
        // Out-of-range option index.
        assert!(!s.select_option(9));
        assert!(s.current_answer().is_none());
        // Submission has to go through the submit screen on an untimed quiz.
        assert!(s.begin_submission().is_none());
        // Retake only applies to a completed attempt.
        s.retake();
        assert_eq!(s.phase(), QuizPhase::Active);
    }
}
