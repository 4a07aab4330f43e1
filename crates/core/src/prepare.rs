//! Turns a test definition plus its subject bank into an ordered attempt.

use rand::Rng;
use thiserror::Error;

use crate::model::{PreparedQuestion, Question, TestDefinition, TestKind};
use crate::partition::QUESTIONS_PER_TEST;
use crate::shuffle::shuffle;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PrepareError {
    #[error("question index {index} is outside a bank of {bank_len}")]
    IndexOutOfRange { index: usize, bank_len: usize },
}

/// Build the question sequence for one attempt of `test`.
///
/// Random tests draw `min(QUESTIONS_PER_TEST, pool)` questions from a shuffled pool;
/// main tests use their slice as-is. Each question gets its own shuffled option
/// order and the resulting sequence is shuffled once more.
///
/// # Errors
///
/// Returns `PrepareError::IndexOutOfRange` if the test refers to a question the
/// bank does not have.
pub fn prepare_attempt<R: Rng + ?Sized>(
    bank: &[Question],
    test: &TestDefinition,
    rng: &mut R,
) -> Result<Vec<PreparedQuestion>, PrepareError> {
    let indexes = match test.kind {
        TestKind::Random => {
            let take = QUESTIONS_PER_TEST.min(test.question_indexes.len());
            let mut drawn = shuffle(&test.question_indexes, rng);
            drawn.truncate(take);
            drawn
        }
        TestKind::Main => test.question_indexes.clone(),
    };

    let mut ordered = Vec::with_capacity(indexes.len());
    for index in indexes {
        let source = bank.get(index).ok_or(PrepareError::IndexOutOfRange {
            index,
            bank_len: bank.len(),
        })?;
        let options = shuffle(source.options(), rng);
        ordered.push(PreparedQuestion::from_source(index, source, options));
    }

    Ok(shuffle(&ordered, rng))
}

/// Build the retry sequence from the questions missed in a main pass.
///
/// The order is reshuffled and every question's options are reshuffled.
#[must_use]
pub fn prepare_retry<R: Rng + ?Sized>(
    mistakes: &[PreparedQuestion],
    rng: &mut R,
) -> Vec<PreparedQuestion> {
    shuffle(mistakes, rng)
        .into_iter()
        .map(|question| {
            let options = shuffle(&question.options, rng);
            PreparedQuestion { options, ..question }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestId;
    use crate::partition::partition;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn bank(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(
                    format!("Q{i}"),
                    format!("right{i}"),
                    [format!("right{i}"), format!("wrong{i}a"), format!("wrong{i}b")],
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn main_attempt_covers_the_slice_once() {
        let bank = bank(60);
        let tests = partition(bank.len());
        let mut rng = StdRng::seed_from_u64(42);

        let prepared = prepare_attempt(&bank, &tests[1], &mut rng).unwrap();
        let indexes: HashSet<usize> = prepared.iter().map(|q| q.original_index).collect();
        assert_eq!(prepared.len(), 30);
        assert_eq!(indexes, (30..60).collect());
    }

    #[test]
    fn prepared_question_copies_source_and_keeps_options() {
        let bank = bank(3);
        let tests = partition(bank.len());
        let mut rng = StdRng::seed_from_u64(5);

        for q in prepare_attempt(&bank, &tests[0], &mut rng).unwrap() {
            let source = &bank[q.original_index];
            assert_eq!(q.question, source.text());
            assert_eq!(q.correct_answer, source.correct_answer());
            let mut opts = q.options.clone();
            opts.sort();
            let mut expected = source.options().to_vec();
            expected.sort();
            assert_eq!(opts, expected);
        }
    }

    #[test]
    fn random_attempt_draws_thirty_unique_questions() {
        let bank = bank(300);
        let random = partition(bank.len()).pop().unwrap();
        assert!(random.is_random());
        let mut rng = StdRng::seed_from_u64(9);

        let prepared = prepare_attempt(&bank, &random, &mut rng).unwrap();
        let unique: HashSet<usize> = prepared.iter().map(|q| q.original_index).collect();
        assert_eq!(prepared.len(), 30);
        assert_eq!(unique.len(), 30);
    }

    #[test]
    fn random_attempt_with_small_pool_uses_whole_pool() {
        let bank = bank(12);
        let random = partition(bank.len()).pop().unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let prepared = prepare_attempt(&bank, &random, &mut rng).unwrap();
        assert_eq!(prepared.len(), 12);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let bank = bank(2);
        let test = TestDefinition {
            id: TestId::new(1),
            title: "Broken".into(),
            kind: TestKind::Main,
            question_indexes: vec![0, 5],
        };
        let mut rng = StdRng::seed_from_u64(0);
        let err = prepare_attempt(&bank, &test, &mut rng).unwrap_err();
        assert_eq!(err, PrepareError::IndexOutOfRange { index: 5, bank_len: 2 });
    }

    #[test]
    fn retry_keeps_the_same_questions() {
        let bank = bank(5);
        let tests = partition(bank.len());
        let mut rng = StdRng::seed_from_u64(8);
        let prepared = prepare_attempt(&bank, &tests[0], &mut rng).unwrap();
        let mistakes = prepared[..3].to_vec();

        let retry = prepare_retry(&mistakes, &mut rng);
        let before: HashSet<usize> = mistakes.iter().map(|q| q.original_index).collect();
        let after: HashSet<usize> = retry.iter().map(|q| q.original_index).collect();
        assert_eq!(before, after);
        assert!(retry.iter().all(|q| q.has_option(&q.correct_answer)));
    }
}
