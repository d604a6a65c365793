use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    catalog::{self, CatalogError, QuestionDraft, QuestionPage, SearchResults},
    server::{app::AppState, deserializers::PageQuery},
    settings::CatalogSettings,
};

use super::{ApiResponse, Reply};

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    State(settings): State<CatalogSettings>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<QuestionPage> {
    let page = catalog::list_questions(&pool, query.page, settings.questions_per_page).await?;
    Ok(Reply(page))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    State(settings): State<CatalogSettings>,
    Query(query): Query<PageQuery>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<QuestionPage> {
    let Path(id) = id.map_err(|_| CatalogError::NotFound)?;
    let page =
        catalog::delete_question(&pool, id, query.page, settings.questions_per_page).await?;
    Ok(Reply(page))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    State(settings): State<CatalogSettings>,
    Query(query): Query<PageQuery>,
    payload: Result<Json<QuestionDraft>, JsonRejection>,
) -> ApiResponse<QuestionPage> {
    let draft = match payload {
        Ok(Json(draft)) => draft,
        // well-formed JSON with unusable field values fails like a rejected insert
        Err(JsonRejection::JsonDataError(err)) => {
            tracing::debug!("Unusable question fields: {err}");
            return Err(CatalogError::MethodNotAllowed);
        }
        Err(err) => {
            tracing::debug!("Malformed question body: {err}");
            return Err(CatalogError::BadRequest);
        }
    };
    let page =
        catalog::create_question(&pool, draft, query.page, settings.questions_per_page).await?;
    Ok(Reply(page))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResponse<SearchResults> {
    let Json(request) = payload.map_err(|err| {
        tracing::debug!("Malformed search body: {err}");
        CatalogError::BadRequest
    })?;
    let results = catalog::search_questions(&pool, request.search_term.as_deref()).await?;
    Ok(Reply(results))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
}
