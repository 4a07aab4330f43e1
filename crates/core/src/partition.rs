//! Derives the fixed set of tests for a subject from its bank size.

use crate::model::{TestDefinition, TestId, TestKind};

/// Questions per main test (and per random attempt).
pub const QUESTIONS_PER_TEST: usize = 30;
/// Number of sequential main tests.
pub const MAIN_TESTS_COUNT: usize = 10;
/// Id of the random test appended after the main tests.
pub const RANDOM_TEST_ID: u32 = 11;
/// Upper bound on the random test's pool.
pub const RANDOM_POOL_LIMIT: usize = QUESTIONS_PER_TEST * MAIN_TESTS_COUNT;

/// Split a bank of `question_count` questions into main tests plus one random test.
///
/// Main tests take consecutive slices of `QUESTIONS_PER_TEST`, except the last one
/// which runs from `9 * 30` to the end of the bank and absorbs any overflow. Slices
/// that would start past the bank are skipped. The random test pools the first
/// `min(300, question_count)` questions and is omitted for an empty bank.
#[must_use]
pub fn partition(question_count: usize) -> Vec<TestDefinition> {
    let mut tests = Vec::with_capacity(MAIN_TESTS_COUNT + 1);

    for i in 0..MAIN_TESTS_COUNT {
        let is_last = i == MAIN_TESTS_COUNT - 1;
        let start = i * QUESTIONS_PER_TEST;
        let end = if is_last {
            question_count
        } else {
            ((i + 1) * QUESTIONS_PER_TEST).min(question_count)
        };

        if start >= question_count || end <= start {
            continue;
        }

        let number = i + 1;
        tests.push(TestDefinition {
            id: TestId::new(u32::try_from(number).unwrap_or(u32::MAX)),
            title: format!("Test {number}"),
            kind: TestKind::Main,
            question_indexes: (start..end).collect(),
        });
    }

    let pool = question_count.min(RANDOM_POOL_LIMIT);
    if pool > 0 {
        tests.push(TestDefinition {
            id: TestId::new(RANDOM_TEST_ID),
            title: format!("Test {RANDOM_TEST_ID} (random)"),
            kind: TestKind::Random,
            question_indexes: (0..pool).collect(),
        });
    }

    tests
}
