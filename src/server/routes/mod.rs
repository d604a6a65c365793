mod categories;
mod questions;
mod quizzes;


use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::catalog::CatalogError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<Reply<T>, CatalogError>;

/// Successful payload; serialized next to `"success": true`.
pub struct Reply<T>(pub T);

#[derive(Serialize)]
struct Envelope<'a, T> {
    success: bool,
    #[serde(flatten)]
    body: &'a T,
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        Json(Envelope {
            success: true,
            body: &self.0,
        })
        .into_response()
    }
}
