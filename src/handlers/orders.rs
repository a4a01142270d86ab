use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{OrderLineView, OrderRecord, PlacedOrder};
use crate::errors::AppError;
use crate::handlers::identity::CurrentUser;
use crate::handlers::{default_limit, default_page, normalize_page};
use crate::state::AppState;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    /// Price per unit captured when the order was placed.
    pub unit_price: i32,
    pub line_price: i64,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        Self {
            line_price: l.line_price(),
            id: l.id,
            product_id: l.product_id,
            product_name: l.product_name,
            quantity: l.quantity,
            unit_price: l.unit_price,
        }
    }
}

/// All order rows written by one checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub checkout_id: Uuid,
    pub user_id: i32,
    pub placed_at: String,
    pub lines: Vec<OrderLineResponse>,
    pub total_price: i64,
}

impl From<PlacedOrder> for OrderResponse {
    fn from(o: PlacedOrder) -> Self {
        Self {
            checkout_id: o.checkout_id,
            user_id: o.user_id,
            placed_at: o.placed_at.to_rfc3339(),
            lines: o.lines.into_iter().map(Into::into).collect(),
            total_price: o.total_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminOrderResponse {
    pub id: i32,
    pub checkout_id: Uuid,
    pub user_id: i32,
    pub user_email: String,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: i32,
    pub placed_at: String,
}

impl From<OrderRecord> for AdminOrderResponse {
    fn from(r: OrderRecord) -> Self {
        Self {
            id: r.id,
            checkout_id: r.checkout_id,
            user_id: r.user_id,
            user_email: r.user_email,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
            placed_at: r.placed_at.to_rfc3339(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<AdminOrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// The caller's purchases grouped by checkout, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Order history", body = [OrderResponse]),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn order_history(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let history = web::block(move || state.orders.order_history(&identity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = history.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /admin/orders
///
/// Every order row, newest first. Use `page` (1-based) and `limit` to
/// control pagination.
#[utoipa::path(
    get,
    path = "/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let params = query.into_inner();
    let (page, limit) = normalize_page(params.page, params.limit);

    let result = web::block(move || state.orders.list_orders(&identity, page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}
