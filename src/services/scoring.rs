//! Quiz scoring and domain recommendation.
//!
//! Pure functions only; persistence lives in the quiz handler.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{attempt::SubmittedResponse, question::Domain};

/// The part of a canonical question needed to grade a response.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct AnswerKey {
    pub id: Uuid,
    pub correct_answer: i32,
    pub domain: Domain,
}

/// Per-domain count of correct responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainScores {
    pub programmer: i32,
    pub analytics: i32,
    pub tester: i32,
}

impl DomainScores {
    pub fn get(&self, domain: Domain) -> i32 {
        match domain {
            Domain::Programmer => self.programmer,
            Domain::Analytics => self.analytics,
            Domain::Tester => self.tester,
        }
    }

    fn credit(&mut self, domain: Domain) {
        match domain {
            Domain::Programmer => self.programmer += 1,
            Domain::Analytics => self.analytics += 1,
            Domain::Tester => self.tester += 1,
        }
    }

    pub fn total(&self) -> i32 {
        self.programmer + self.analytics + self.tester
    }

    /// Domain with the highest score.
    ///
    /// Single pass in declaration order, replacing only on a strictly greater
    /// score: ties go to programmer, then analytics, then tester.
    pub fn recommended(&self) -> Domain {
        let mut best = Domain::ALL[0];
        for domain in Domain::ALL.into_iter().skip(1) {
            if self.get(domain) > self.get(best) {
                best = domain;
            }
        }
        best
    }
}

/// A submitted response that matched a known question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredResponse {
    pub question_id: Uuid,
    pub selected_answer: i32,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAttempt {
    pub scores: DomainScores,
    pub total_score: i32,
    pub recommended_domain: Domain,
    /// Validated responses in submission order. Unknown question ids are absent.
    pub responses: Vec<ScoredResponse>,
}

/// Grades a submission against the answer bank.
///
/// Responses whose question id is not in `bank` are dropped without error and
/// contribute nothing. An empty or fully unknown submission yields an all-zero
/// attempt recommending programmer.
pub fn score(submission: &[SubmittedResponse], bank: &HashMap<Uuid, AnswerKey>) -> ScoredAttempt {
    let mut scores = DomainScores::default();
    let mut responses = Vec::with_capacity(submission.len());

    for response in submission {
        let Some(key) = bank.get(&response.question_id) else {
            continue;
        };

        let is_correct = response.selected_answer == key.correct_answer;
        if is_correct {
            scores.credit(key.domain);
        }

        responses.push(ScoredResponse {
            question_id: response.question_id,
            selected_answer: response.selected_answer,
            is_correct,
        });
    }

    ScoredAttempt {
        total_score: scores.total(),
        recommended_domain: scores.recommended(),
        scores,
        responses,
    }
}
