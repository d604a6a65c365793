use std::collections::HashSet;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::db::Question;

/// Category picked on the quiz screen. Id 0 stands for "all categories".
#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    All,
    Category(i64),
}

impl From<&QuizCategory> for QuizScope {
    fn from(category: &QuizCategory) -> Self {
        match category.id {
            0 => QuizScope::All,
            id => QuizScope::Category(id),
        }
    }
}

/// Uniformly picks a question from `pool` that is not in `previous`.
///
/// `None` means the quiz is over: every question of the pool was already asked, or the
/// pool is empty. Ids in `previous` that are not in the pool are ignored.
pub fn next_question<'a, R>(
    pool: &'a [Question],
    previous: &[i64],
    rng: &mut R,
) -> Option<&'a Question>
where
    R: Rng + ?Sized,
{
    let asked: HashSet<i64> = previous.iter().copied().collect();
    let remaining = pool
        .iter()
        .filter(|question| !asked.contains(&question.id))
        .collect_vec();
    remaining.choose(rng).copied()
}
