use axum::{extract::{Path, State}, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use service::product::domain::NewProduct;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{errors::ApiError, hypermedia::ProductView, routes::ServerState};

/// Longest accepted name or description, in characters. Matches the `varchar(255)` columns.
pub const MAX_FIELD_LEN: usize = 255;

/// Body of POST /products and PUT /products/{id}.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "description must be at most 255 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "price_from_number_or_string")]
    #[validate(required(message = "price must not be null"))]
    pub price: Option<Decimal>,
}

/// 价格既可以是 JSON 数字也可以是字符串；数字按原始文本解析，不经过 f64
fn price_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => return Err(de::Error::custom(format!("price must be a number or a string, got {other}"))),
    };
    let text = raw.trim();
    // from_str_exact 在超出精度时报错而不是舍入
    let parsed = if text.contains(|c| c == 'e' || c == 'E') {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str_exact(text)
    };
    parsed
        .map(Some)
        .map_err(|e| de::Error::custom(format!("invalid price '{text}': {e}")))
}

impl ProductInput {
    /// Validate and turn into service input; a blank name or missing price is a 400.
    pub fn into_candidate(self) -> Result<NewProduct, ApiError> {
        self.validate()?;
        let price = self
            .price
            .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "price must not be null"))?;
        Ok(NewProduct::new(self.name, self.description.as_deref(), price))
    }
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Duplicate name and description", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<ProductInput>) -> Result<(StatusCode, Json<ProductView>), ApiError> {
    let candidate = input.into_candidate()?;
    info!(name = %candidate.name, description = %candidate.description, "product_create_request");
    let created = state.products.create_product(candidate).await?;
    Ok((StatusCode::CREATED, Json(state.links.plain(created))))
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::ProductDoc]),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProductView>>, ApiError> {
    let products = state.products.get_all_products().await?;
    info!(count = products.len(), "list products");
    let views = products.into_iter().map(|p| state.links.with_self_link(p)).collect();
    Ok(Json(views))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<ProductView>, ApiError> {
    match state.products.get_product_by_id(id).await? {
        Some(p) => Ok(Json(state.links.with_collection_link(p))),
        None => Err(ApiError::product_not_found()),
    }
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Duplicate name and description", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(input): Json<ProductInput>) -> Result<Json<ProductView>, ApiError> {
    let changes = input.into_candidate()?;
    let existing = state
        .products
        .get_product_by_id(id)
        .await?
        .ok_or_else(ApiError::product_not_found)?;
    let updated = state.products.update_product(existing, changes).await?;
    Ok(Json(state.links.plain(updated)))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    let existing = state
        .products
        .get_product_by_id(id)
        .await?
        .ok_or_else(ApiError::product_not_found)?;
    state.products.delete_product(&existing).await?;
    Ok(StatusCode::NO_CONTENT)
}
