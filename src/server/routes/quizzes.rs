use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    catalog::{self, CatalogError, QuizCategory, QuizTurn},
    server::app::AppState,
};

use super::{ApiResponse, Reply};

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<QuizTurn> {
    let Json(request) = payload.map_err(|err| {
        tracing::debug!("Malformed quiz body: {err}");
        CatalogError::BadRequest
    })?;
    let turn =
        catalog::play_quiz(&pool, request.quiz_category, request.previous_questions).await?;
    Ok(Reply(turn))
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(next_quiz_question))
}
