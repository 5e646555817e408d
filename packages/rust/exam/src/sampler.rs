//! Bounded random sampling and option shuffling for served exams.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use examdeck_shared::{AnswerOption, Question};

/// Default maximum number of questions drawn per exam.
pub const DEFAULT_QUESTION_CAP: usize = 50;

/// One question as served to an exam taker.
///
/// `original_id` keeps the mapping back to the source-declared ordinal so a
/// later result review can reference the document. Option order is the
/// served (shuffled) order; correctness flags are kept here and stripped at
/// the HTTP boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ExamQuestion {
    pub original_id: u32,
    pub text: String,
    pub options: Vec<AnswerOption>,
}

/// Draw `min(cap, len)` questions uniformly without replacement and shuffle
/// each drawn question's options independently.
///
/// The caller supplies the rng so exams are reproducible under a seed.
pub fn draw<R: Rng + ?Sized>(questions: &[Question], cap: usize, rng: &mut R) -> Vec<ExamQuestion> {
    let count = cap.min(questions.len());

    let mut drawn: Vec<ExamQuestion> = questions
        .choose_multiple(rng, count)
        .map(|q| ExamQuestion {
            original_id: q.id,
            text: q.text.clone(),
            options: q.options.clone(),
        })
        .collect();

    for question in &mut drawn {
        question.options.shuffle(rng);
    }

    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank(n: usize) -> Vec<Question> {
        (1..=n as u32)
            .map(|id| Question {
                id,
                text: format!("Question {id}"),
                options: vec![
                    AnswerOption::new("A", false),
                    AnswerOption::new("B", true),
                    AnswerOption::new("C", false),
                ],
            })
            .collect()
    }

    #[test]
    fn cap_bounds_the_draw() {
        let questions = bank(80);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw(&questions, 50, &mut rng).len(), 50);
    }

    #[test]
    fn small_banks_are_served_whole() {
        let questions = bank(7);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw(&questions, 50, &mut rng).len(), 7);
    }

    #[test]
    fn no_duplicate_questions_in_a_draw() {
        let questions = bank(30);
        let mut rng = StdRng::seed_from_u64(42);
        let exam = draw(&questions, 20, &mut rng);
        let mut ids: Vec<u32> = exam.iter().map(|q| q.original_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn shuffle_permutes_but_preserves_options() {
        let questions = bank(5);
        let mut rng = StdRng::seed_from_u64(7);
        let exam = draw(&questions, 5, &mut rng);
        for q in &exam {
            assert_eq!(q.options.len(), 3);
            assert_eq!(q.options.iter().filter(|o| o.is_correct).count(), 1);
            let mut texts: Vec<&str> = q.options.iter().map(|o| o.text.as_str()).collect();
            texts.sort_unstable();
            assert_eq!(texts, vec!["A", "B", "C"]);
        }
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let questions = bank(40);
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let a = draw(&questions, 10, &mut rng_a);
        let b = draw(&questions, 10, &mut rng_b);
        let ids_a: Vec<u32> = a.iter().map(|q| q.original_id).collect();
        let ids_b: Vec<u32> = b.iter().map(|q| q.original_id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn empty_bank_draws_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw(&[], 50, &mut rng).is_empty());
    }
}
