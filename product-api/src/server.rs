use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::{docs, products};
use crate::domain::repositories::product_repository::ProductRepository;
use crate::middleware::log_errors::log_errors;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
}

pub fn create_app(state: AppState) -> Router {
    let app_state = Arc::new(state);

    // API 路由
    let api_routes = Router::new()
        .nest("/products", products::routes());

    // 组合所有路由
    Router::new()
        .nest("/api", api_routes)
        .merge(docs::routes())
        .layer(middleware::from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
