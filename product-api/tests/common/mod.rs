#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use product_api::domain::models::product::{NewProduct, Product, ProductChanges};
use product_api::domain::repositories::product_repository::{ProductRepository, SortOrder};
use product_api::error::AppError;
use product_api::server::{create_app, AppState};

/// Repository backed by a map, ids assigned from a counter and never reused.
#[derive(Default)]
pub struct InMemoryProductRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self, order: SortOrder) -> Result<Vec<Product>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut products: Vec<Product> = inner.rows.values().cloned().collect();
        if order == SortOrder::Desc {
            products.reverse();
        }
        Ok(products)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.inner.lock().unwrap().rows.get(&id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.last_id += 1;

        let now = Utc::now();
        let product = Product {
            id: inner.last_id,
            name: product.name,
            price: product.price,
            availability: product.availability,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(product.id, product.clone());

        Ok(product)
    }

    async fn update_fields(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.rows.get_mut(&id).map(|product| {
            changes.apply(product, Utc::now());
            product.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.inner.lock().unwrap().rows.remove(&id).is_some())
    }
}

/// Repository whose store is always unreachable.
pub struct UnavailableRepository;

#[async_trait]
impl ProductRepository for UnavailableRepository {
    async fn find_all(&self, _order: SortOrder) -> Result<Vec<Product>, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Product>, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _product: NewProduct) -> Result<Product, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn update_fields(&self, _id: i64, _changes: ProductChanges) -> Result<Option<Product>, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i64) -> Result<bool, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryProductRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryProductRepository::default());
        let router = create_app(AppState { products: repository.clone() });

        Self { router, repository }
    }

    pub async fn seed(&self, name: &str, price: i64) -> Product {
        self.repository
            .insert(NewProduct::new(name, Decimal::from(price), None))
            .await
            .unwrap()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    send_request(router, builder.body(body).unwrap()).await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse { status, content_type, body }
}

pub fn error_messages(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|error| error["msg"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
