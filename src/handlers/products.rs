use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::product::{Connector, Product, ProductDetail, ProductFilter};
use crate::errors::AppError;
use crate::handlers::reviews::ReviewResponse;
use crate::handlers::{default_limit, default_page, normalize_page};
use crate::state::AppState;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Price in minor currency units (cents).
    pub price: i32,
    pub stock: i32,
    pub standard: String,
    pub length_cm: i32,
    pub color: String,
    pub connector_id: Option<i32>,
    pub connector_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            standard: p.standard,
            length_cm: p.length_cm,
            color: p.color,
            connector_id: p.connector_id,
            connector_name: p.connector_name,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailResponse {
    pub product: ProductResponse,
    pub review_count: usize,
    pub average_rating: Option<f64>,
    pub reviews: Vec<ReviewResponse>,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(detail: ProductDetail) -> Self {
        Self {
            product: detail.product.into(),
            review_count: detail.reviews.len(),
            average_rating: detail.average_rating,
            reviews: detail.reviews.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectorResponse {
    pub id: i32,
    pub name: String,
}

impl From<Connector> for ConnectorResponse {
    fn from(c: Connector) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListProductsParams {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub standard: Option<String>,
    pub color: Option<String>,
    pub connector_id: Option<i32>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListProductsResponse {
    pub items: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
///
/// Catalog listing, newest first. Blank filter values are ignored.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("search" = Option<String>, Query, description = "Name substring"),
        ("standard" = Option<String>, Query, description = "USB standard, e.g. \"USB 3.2\""),
        ("color" = Option<String>, Query, description = "Cable color"),
        ("connector_id" = Option<i32>, Query, description = "Connector id"),
        ("in_stock" = Option<bool>, Query, description = "Only products with stock > 0"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of products", body = ListProductsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let (page, limit) = normalize_page(params.page, params.limit);
    let filter = ProductFilter {
        search: non_blank(params.search),
        standard: non_blank(params.standard),
        color: non_blank(params.color),
        connector_id: params.connector_id,
        in_stock_only: params.in_stock,
    };

    let result = web::block(move || state.catalog.list_products(&filter, page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListProductsResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with reviews", body = ProductDetailResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let detail = web::block(move || state.catalog.get_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductDetailResponse::from(detail)))
}

/// GET /connectors
#[utoipa::path(
    get,
    path = "/connectors",
    responses(
        (status = 200, description = "All connector kinds", body = [ConnectorResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_connectors(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let connectors = web::block(move || state.catalog.list_connectors())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ConnectorResponse> = connectors.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}
