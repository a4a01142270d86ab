use actix_web::{web, HttpResponse};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::domain::product::{NewProduct, ProductChanges};
use crate::errors::AppError;
use crate::handlers::identity::CurrentUser;
use crate::handlers::products::{ConnectorResponse, ProductResponse};
use crate::state::AppState;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in minor currency units (cents).
    pub price: i32,
    pub stock: i32,
    pub standard: String,
    pub length_cm: i32,
    pub color: String,
    pub connector_id: Option<i32>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(r: CreateProductRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            stock: r.stock,
            standard: r.standard,
            length_cm: r.length_cm,
            color: r.color,
            connector_id: r.connector_id,
        }
    }
}

/// Partial update. Absent fields are left alone; `"connector_id": null`
/// detaches the connector.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub stock: Option<i32>,
    pub standard: Option<String>,
    pub length_cm: Option<i32>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub connector_id: Option<Option<i32>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(r: UpdateProductRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            stock: r.stock,
            standard: r.standard,
            length_cm: r.length_cm,
            color: r.color,
            connector_id: r.connector_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConnectorRequest {
    pub name: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /admin/products
#[utoipa::path(
    post,
    path = "/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Connector not found"),
    ),
    tag = "admin"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let product = NewProduct::from(body.into_inner());
    let created = web::block(move || state.catalog.create_product(&identity, product))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

/// PATCH /admin/products/{id}
#[utoipa::path(
    patch,
    path = "/admin/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid or empty update"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Product or connector not found"),
    ),
    tag = "admin"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let id = path.into_inner();
    let changes = ProductChanges::from(body.into_inner());
    let updated = web::block(move || state.catalog.update_product(&identity, id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(updated)))
}

/// DELETE /admin/products/{id}
///
/// Refused while any cart line, order or review still references the product.
#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is still referenced"),
    ),
    tag = "admin"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let id = path.into_inner();
    web::block(move || state.catalog.delete_product(&identity, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /admin/connectors
#[utoipa::path(
    post,
    path = "/admin/connectors",
    request_body = CreateConnectorRequest,
    responses(
        (status = 201, description = "Connector created", body = ConnectorResponse),
        (status = 400, description = "Empty name"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Connector name already exists"),
    ),
    tag = "admin"
)]
pub async fn create_connector(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreateConnectorRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let name = body.into_inner().name;
    let connector = web::block(move || state.catalog.create_connector(&identity, &name))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ConnectorResponse::from(connector)))
}
