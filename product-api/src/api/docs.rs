use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api::products;
use crate::domain::models::product::Product;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product REST API",
        version = "1.0.0",
        description = "API Docs for Products"
    ),
    paths(
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::update_availability,
        products::delete_product,
    ),
    components(schemas(
        Product,
        products::ProductResponse,
        products::ProductListResponse,
        products::MessageResponse,
        products::ErrorResponse,
        products::CreateProductRequest,
        products::UpdateProductRequest,
        products::UpdateAvailabilityRequest,
    )),
    tags(
        (name = "Products", description = "API operations related to products")
    )
)]
pub struct ApiDoc;

/// `/docs` 交互式文档, `/docs/openapi.json` 原始文档
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();

        let collection = doc.paths.paths.get("/api/products").unwrap();
        assert!(collection.get.is_some());
        assert!(collection.post.is_some());

        let item = doc.paths.paths.get("/api/products/{id}").unwrap();
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.patch.is_some());
        assert!(item.delete.is_some());

        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("Product"));
    }
}
