use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::rules;
use crate::domain::models::product::{to_cents, NewProduct, Product, ProductChanges};
use crate::domain::repositories::product_repository::SortOrder;
use crate::error::AppError;
use crate::middleware::validate::{handle_input_errors, JsonBody};
use crate::server::AppState;
use crate::validation::checks::{as_bool, as_text};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(list_products).post(
                create_product.layer(from_fn_with_state(Arc::new(rules::create_product()), handle_input_errors)),
            ),
        )
        .route(
            "/{id}",
            get(get_product.layer(from_fn_with_state(Arc::new(rules::product_id()), handle_input_errors)))
                .put(update_product.layer(from_fn_with_state(Arc::new(rules::update_product()), handle_input_errors)))
                .patch(update_availability.layer(from_fn_with_state(
                    Arc::new(rules::update_availability()),
                    handle_input_errors,
                )))
                .delete(delete_product.layer(from_fn_with_state(Arc::new(rules::product_id()), handle_input_errors))),
        )
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub data: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub data: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product deleted successfully")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Product not found")]
    pub error: String,
}

// 以下请求体仅用于生成文档，实际校验见 rules 模块
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Monitor Curvo 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
    pub availability: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[schema(example = "Monitor Curvo 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAvailabilityRequest {
    #[schema(example = false)]
    pub availability: bool,
}

/// Parses a validated price, rounded to cents.
pub fn parse_price(value: Option<&Value>) -> Option<Decimal> {
    let text = as_text(value);
    let unsigned = text.strip_prefix('+').unwrap_or(&text);
    let normalized = match unsigned.strip_prefix('.') {
        Some(fraction) => format!("0.{}", fraction),
        None => match unsigned.strip_prefix("-.") {
            Some(fraction) => format!("-0.{}", fraction),
            None => unsigned.to_string(),
        },
    };

    Decimal::from_str(&normalized).ok().map(to_cents)
}

// 小于一分的价格会被舍入为 0.00
fn price_from(body: &Value) -> Result<Decimal, AppError> {
    let price = parse_price(body.get("price"))
        .ok_or_else(|| AppError::BadRequest(rules::PRICE_NOT_NUMBER.to_string()))?;

    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest(rules::PRICE_NOT_POSITIVE.to_string()));
    }

    Ok(price)
}

fn availability_from(body: &Value) -> Result<bool, AppError> {
    as_bool(body.get("availability"))
        .ok_or_else(|| AppError::BadRequest(rules::AVAILABILITY_NOT_BOOLEAN.to_string()))
}

fn not_found() -> AppError {
    AppError::NotFound(PRODUCT_NOT_FOUND.to_string())
}

async fn find_product(state: &AppState, id: i64) -> Result<Product, AppError> {
    state.products.find_by_id(id).await?.ok_or_else(not_found)
}

/// Get a list of products
///
/// Return a list of products, newest first
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Successful response", body = ProductListResponse)
    )
)]
pub async fn list_products(State(state): State<Arc<AppState>>) -> Result<Json<ProductListResponse>, AppError> {
    let products = state.products.find_all(SortOrder::Desc).await?;

    Ok(Json(ProductListResponse { data: products }))
}

/// Get a product by ID
///
/// Return a product based on its unique ID
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "The ID of the product to retrieve")
    ),
    responses(
        (status = 200, description = "Successful response", body = ProductResponse),
        (status = 400, description = "Bad Request - Invalid ID"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = find_product(&state, id).await?;

    Ok(Json(ProductResponse { data: product }))
}

/// Create a new product
///
/// Returns a new record in the database
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Successful response", body = ProductResponse),
        (status = 400, description = "Bad Request - Invalid input")
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(JsonBody(body)): Extension<JsonBody>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let availability = match body.get("availability") {
        None | Some(Value::Null) => None,
        Some(_) => Some(availability_from(&body)?),
    };
    let product = NewProduct::new(as_text(body.get("name")), price_from(&body)?, availability);

    let product = state.products.insert(product).await?;
    tracing::info!(id = product.id, "product created");

    Ok((StatusCode::CREATED, Json(ProductResponse { data: product })))
}

/// Updates a product with user input
///
/// Update a product by its unique ID; name, price and availability are all replaced
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "The ID of the product to update")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Successful response", body = ProductResponse),
        (status = 400, description = "Bad Request - Invalid ID or invalid input data"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Extension(JsonBody(body)): Extension<JsonBody>,
) -> Result<Json<ProductResponse>, AppError> {
    find_product(&state, id).await?;

    let changes = ProductChanges::replace(as_text(body.get("name")), price_from(&body)?, availability_from(&body)?);
    let product = state.products.update_fields(id, changes).await?.ok_or_else(not_found)?;

    Ok(Json(ProductResponse { data: product }))
}

/// Updates product availability
///
/// Returns the product with its updated availability
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "The ID of the product to update")
    ),
    request_body = UpdateAvailabilityRequest,
    responses(
        (status = 200, description = "Successful response", body = ProductResponse),
        (status = 400, description = "Bad Request - Invalid ID"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Extension(JsonBody(body)): Extension<JsonBody>,
) -> Result<Json<ProductResponse>, AppError> {
    find_product(&state, id).await?;

    let changes = ProductChanges::availability(availability_from(&body)?);
    let product = state.products.update_fields(id, changes).await?.ok_or_else(not_found)?;

    Ok(Json(ProductResponse { data: product }))
}

/// Delete product by a given ID
///
/// Returns a confirmation message
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "The ID of the product to delete")
    ),
    responses(
        (status = 200, description = "Successful response", body = MessageResponse),
        (status = 400, description = "Bad Request - Invalid ID"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    find_product(&state, id).await?;

    if !state.products.delete(id).await? {
        return Err(not_found());
    }
    tracing::info!(id, "product deleted");

    Ok(Json(MessageResponse { message: PRODUCT_DELETED.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn price(value: Value) -> Option<String> {
        parse_price(Some(&value)).map(|p| p.to_string())
    }

    #[test]
    fn prices_are_kept_to_two_places() {
        assert_eq!(price(json!(50)), Some("50.00".to_string()));
        assert_eq!(price(json!("300")), Some("300.00".to_string()));
        assert_eq!(price(json!(19.999)), Some("20.00".to_string()));
        assert_eq!(price(json!("+1.5")), Some("1.50".to_string()));
        assert_eq!(price(json!(".5")), Some("0.50".to_string()));
    }

    #[test]
    fn unparseable_prices_are_rejected() {
        assert_eq!(price(json!("Hola")), None);
        assert!(matches!(price_from(&json!({})), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn sub_cent_prices_are_not_positive() {
        assert_eq!(price(json!(0.004)), Some("0.00".to_string()));
        assert!(matches!(
            price_from(&json!({ "price": 0.001 })),
            Err(AppError::BadRequest(message)) if message == rules::PRICE_NOT_POSITIVE
        ));
        assert_eq!(price_from(&json!({ "price": 0.005 })).unwrap().to_string(), "0.01");
    }

    #[test]
    fn availability_accepts_text_forms() {
        assert!(availability_from(&json!({ "availability": "true" })).unwrap());
        assert!(!availability_from(&json!({ "availability": false })).unwrap());
        assert!(availability_from(&json!({ "availability": "nope" })).is_err());
    }
}
