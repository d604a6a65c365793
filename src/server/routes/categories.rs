use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Router,
};
use sqlx::SqlitePool;

use crate::{
    catalog::{self, CatalogError, CategoryMap, CategoryQuestions},
    server::app::AppState,
};

use super::{ApiResponse, Reply};

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoryMap> {
    Ok(Reply(catalog::list_categories(&pool).await?))
}

async fn category_questions(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<CategoryQuestions> {
    let Path(id) = id.map_err(|_| CatalogError::NotFound)?;
    Ok(Reply(catalog::list_questions_by_category(&pool, id).await?))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
}
