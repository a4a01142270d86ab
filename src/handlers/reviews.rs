use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::review::{ReviewInput, ReviewView};
use crate::errors::AppError;
use crate::handlers::identity::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    /// 1 to 5.
    pub rating: i32,
    /// At most 255 characters.
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub rating: i32,
    pub comment: String,
    pub updated_at: String,
}

impl From<ReviewView> for ReviewResponse {
    fn from(r: ReviewView) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            product_id: r.product_id,
            rating: r.rating,
            comment: r.comment,
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// GET /products/{id}/reviews
#[utoipa::path(
    get,
    path = "/products/{id}/reviews",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Reviews, most recently updated first", body = [ReviewResponse]),
        (status = 404, description = "Product not found"),
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let reviews = web::block(move || state.catalog.list_reviews(product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ReviewResponse> = reviews.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /products/{id}/reviews
///
/// One review per user and product; a second submission replaces the first.
#[utoipa::path(
    post,
    path = "/products/{id}/reviews",
    params(("id" = i32, Path, description = "Product id")),
    request_body = SubmitReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = ReviewResponse),
        (status = 400, description = "Rating or comment out of range"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Product not found"),
    ),
    tag = "reviews"
)]
pub async fn submit_review(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
    body: web::Json<SubmitReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let product_id = path.into_inner();
    let body = body.into_inner();
    let input = ReviewInput {
        rating: body.rating,
        comment: body.comment,
    };

    let review = web::block(move || state.catalog.submit_review(&identity, product_id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReviewResponse::from(review)))
}
