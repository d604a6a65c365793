//! Question catalog: paginated listing, search, category filtering and quiz selection.
//!
//! Every operation that changes the catalog answers with a freshly computed page rather
//! than the touched row, so clients can redraw their list from a single response.

mod error;
mod paging;
mod quiz;

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::db::queries::{categories, questions};
use crate::db::Question;
use crate::telemetry::{QUIZZES_COMPLETED, QUIZ_QUESTIONS_SERVED};

pub use error::CatalogError;
pub use paging::Window;
pub use quiz::{next_question, QuizCategory, QuizScope};

const UNKNOWN_CATEGORY_LABEL: &str = "unknown";

/// One page of the catalog.
#[derive(Debug, Serialize)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub categories: BTreeMap<i64, String>,
    /// Category of each listed question, in list order.
    pub current_category: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub questions: Vec<Question>,
    /// Size of the whole catalog, not the number of matches.
    pub total_questions: i64,
    pub current_category: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CategoryQuestions {
    pub questions: Vec<Question>,
    pub total_questions: i64,
    pub current_category: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryMap {
    pub categories: BTreeMap<i64, String>,
}

/// Next quiz question; absent once the pool is used up.
#[derive(Debug, Serialize)]
pub struct QuizTurn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

/// Fields of a question to be created, as submitted. Any of them may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub difficulty: Option<i64>,
}

async fn category_map(pool: &SqlitePool) -> sqlx::Result<BTreeMap<i64, String>> {
    Ok(categories::get_all_categories(pool)
        .await?
        .into_iter()
        .map(|category| (category.id, category.kind))
        .collect())
}

pub async fn list_categories(pool: &SqlitePool) -> Result<CategoryMap, CatalogError> {
    Ok(CategoryMap {
        categories: category_map(pool).await?,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn list_questions(
    pool: &SqlitePool,
    page: usize,
    page_size: usize,
) -> Result<QuestionPage, CatalogError> {
    // count and window come from one snapshot so the total matches the page
    let mut tx = pool.begin().await?;
    let total = questions::count_questions(&mut *tx).await?;
    if total == 0 {
        tracing::debug!("Catalog is empty");
        return Err(CatalogError::NotFound);
    }

    let window = Window::for_page(page, page_size, total as usize);
    if window.is_empty() {
        tracing::debug!(total, "Page is out of range");
        return Err(CatalogError::NotFound);
    }

    let questions =
        questions::get_questions_window(&mut *tx, window.offset as i64, window.len as i64)
            .await?;
    tx.commit().await?;
    if questions.is_empty() {
        return Err(CatalogError::NotFound);
    }

    let current_category = questions.iter().map(|q| q.category).collect_vec();
    Ok(QuestionPage {
        questions,
        total_questions: total,
        categories: category_map(pool).await?,
        current_category,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn delete_question(
    pool: &SqlitePool,
    id: i64,
    page: usize,
    page_size: usize,
) -> Result<QuestionPage, CatalogError> {
    let removed = questions::delete_question(pool, id).await.map_err(|err| {
        tracing::error!("Failed to delete question {id}: {err}");
        CatalogError::Unprocessable
    })?;
    if !removed {
        return Err(CatalogError::NotFound);
    }
    tracing::info!("Deleted question {id}");

    list_questions(pool, page, page_size).await.map_err(|err| {
        tracing::warn!("Question {id} deleted but the listing failed: {err}");
        CatalogError::Unprocessable
    })
}

#[tracing::instrument(skip(pool))]
pub async fn create_question(
    pool: &SqlitePool,
    draft: QuestionDraft,
    page: usize,
    page_size: usize,
) -> Result<QuestionPage, CatalogError> {
    let QuestionDraft {
        question: Some(question),
        answer: Some(answer),
        category: Some(category),
        difficulty: Some(difficulty),
    } = draft
    else {
        tracing::debug!("Question draft is incomplete");
        return Err(CatalogError::MethodNotAllowed);
    };

    let id = questions::create_question(pool, &question, &answer, category, difficulty)
        .await
        .map_err(|err| {
            tracing::warn!("Failed to insert question: {err}");
            CatalogError::MethodNotAllowed
        })?;
    tracing::info!("Created question {id}");

    list_questions(pool, page, page_size).await.map_err(|err| {
        tracing::warn!("Question {id} created but the listing failed: {err}");
        CatalogError::MethodNotAllowed
    })
}

#[tracing::instrument(skip(pool))]
pub async fn search_questions(
    pool: &SqlitePool,
    search_term: Option<&str>,
) -> Result<SearchResults, CatalogError> {
    let term = search_term
        .filter(|term| !term.is_empty())
        .ok_or(CatalogError::BadRequest)?;

    let all = questions::get_all_questions(pool).await.map_err(|err| {
        tracing::error!("Failed to load questions for search: {err}");
        CatalogError::BadRequest
    })?;
    let total_questions = all.len() as i64;

    let needle = term.to_lowercase();
    let questions = all
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect_vec();
    let current_category = questions.iter().map(|q| q.category).collect_vec();

    Ok(SearchResults {
        questions,
        total_questions,
        current_category,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn list_questions_by_category(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<CategoryQuestions, CatalogError> {
    let unprocessable = |err: sqlx::Error| {
        tracing::error!("Failed to list questions of category {category_id}: {err}");
        CatalogError::Unprocessable
    };

    let category = categories::get_category(pool, category_id)
        .await
        .map_err(unprocessable)?
        .ok_or(CatalogError::NotFound)?;
    let total_questions = questions::count_questions(pool)
        .await
        .map_err(unprocessable)?;
    let questions = questions::get_questions_for_category(pool, category.id)
        .await
        .map_err(unprocessable)?;

    Ok(CategoryQuestions {
        questions,
        total_questions,
        current_category: category.id,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn play_quiz(
    pool: &SqlitePool,
    quiz_category: Option<QuizCategory>,
    previous_questions: Option<Vec<i64>>,
) -> Result<QuizTurn, CatalogError> {
    let (Some(quiz_category), Some(previous)) = (quiz_category, previous_questions) else {
        return Err(CatalogError::BadRequest);
    };

    let (label, pool_questions) = match QuizScope::from(&quiz_category) {
        QuizScope::All => ("all".to_owned(), questions::get_all_questions(pool).await?),
        QuizScope::Category(id) => {
            // metric labels only ever name stored categories
            let label = match categories::get_category(pool, id).await? {
                Some(category) => category.id.to_string(),
                None => UNKNOWN_CATEGORY_LABEL.to_owned(),
            };
            (label, questions::get_questions_for_category(pool, id).await?)
        }
    };

    let question = next_question(&pool_questions, &previous, &mut rand::thread_rng()).cloned();
    match &question {
        Some(q) => {
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!("Serving question {} for category {label}", q.id);
        }
        None => {
            QUIZZES_COMPLETED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!("Quiz over for category {label} after {} questions", previous.len());
        }
    }

    Ok(QuizTurn { question })
}
