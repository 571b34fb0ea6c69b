//! OpenAPI documentation.

use crate::controllers::health_controller::{ComponentHealth, HealthResponse};
use catalog_core::{ErrorResponse, FieldError, ProductId, UserId};
use catalog_service::{
    AuthResponse, CreateProductRequest, LoginRequest, ProductListItem, ProductResponse,
    RegisterRequest, RegisteredUser, UpdateProductRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Catalog Cloud API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog Cloud API",
        version = "1.0.0",
        description = "Product catalog with cached listing",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::product_controller::list_products,
        crate::controllers::product_controller::get_product,
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::update_product,
        crate::controllers::product_controller::delete_product,
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ProductId,
            UserId,
            ErrorResponse,
            FieldError,
            CreateProductRequest,
            UpdateProductRequest,
            ProductResponse,
            ProductListItem,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            RegisteredUser,
            HealthResponse,
            ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "products", description = "Product catalog"),
        (name = "auth", description = "Registration and login"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme referenced by write endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token authentication"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_product_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/products"));
        assert!(doc.paths.paths.contains_key("/products/{id}"));
        assert!(doc.paths.paths.contains_key("/auth/login"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
