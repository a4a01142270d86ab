use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cart::CheckoutPreview;
use crate::domain::order::PlaceOrderOutcome;
use crate::errors::AppError;
use crate::handlers::cart::{CartItemResponse, StockProblemResponse};
use crate::handlers::identity::CurrentUser;
use crate::handlers::orders::OrderResponse;
use crate::state::AppState;

/// Where an empty cart is sent instead of the confirmation page.
pub const CATALOG_PATH: &str = "/products";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutPreviewResponse {
    pub items: Vec<CartItemResponse>,
    pub total_price: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockProblemsResponse {
    pub error: String,
    pub stock_problems: Vec<StockProblemResponse>,
}

fn redirect_to_catalog() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, CATALOG_PATH))
        .finish()
}

/// GET /checkout
///
/// Confirmation step. Nothing is locked or written.
#[utoipa::path(
    get,
    path = "/checkout",
    responses(
        (status = 200, description = "Cart can be checked out", body = CheckoutPreviewResponse),
        (status = 303, description = "Cart is empty; redirect to the catalog"),
        (status = 401, description = "Not logged in"),
        (status = 409, description = "Some lines exceed current stock", body = StockProblemsResponse),
    ),
    tag = "checkout"
)]
pub async fn checkout_preview(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let preview = web::block(move || state.carts.checkout_preview(&identity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(match preview {
        CheckoutPreview::EmptyCart => redirect_to_catalog(),
        CheckoutPreview::StockProblems(snapshot) => {
            HttpResponse::Conflict().json(StockProblemsResponse {
                error: "Not enough stock for some items in the cart".to_string(),
                stock_problems: snapshot.stock_problems.into_iter().map(Into::into).collect(),
            })
        }
        CheckoutPreview::Ready(snapshot) => HttpResponse::Ok().json(CheckoutPreviewResponse {
            items: snapshot.items.into_iter().map(Into::into).collect(),
            total_price: snapshot.total_price,
        }),
    })
}

/// POST /checkout
///
/// Places one order row per cart line, decrements stock and clears the cart
/// in a single transaction. Any stock shortfall rolls the whole thing back.
#[utoipa::path(
    post,
    path = "/checkout",
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 303, description = "Cart is empty; redirect to the catalog"),
        (status = 401, description = "Not logged in"),
        (status = 409, description = "Stock exhausted; nothing was written"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let outcome = web::block(move || state.orders.place_order(&identity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(match outcome {
        PlaceOrderOutcome::EmptyCart => redirect_to_catalog(),
        PlaceOrderOutcome::Placed(order) => HttpResponse::Created().json(OrderResponse::from(order)),
    })
}
