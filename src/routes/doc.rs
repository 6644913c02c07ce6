use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        MessageResponse,
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, ExpandedCartLine, UpdateCartLineRequest},
        categories::CreateCategoryRequest,
        sweets::{CreateSweetRequest, RestockRequest, UpdateSweetRequest},
    },
    models::{CartLine, Category, Sweet, User},
    routes::{auth, cart, categories, health, sweets},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        categories::list_categories,
        categories::create_category,
        categories::delete_category,
        sweets::list_sweets,
        sweets::search_sweets,
        sweets::create_sweet,
        sweets::update_sweet,
        sweets::delete_sweet,
        sweets::purchase_sweet,
        sweets::restock_sweet,
        cart::add_to_cart,
        cart::get_cart,
        cart::update_cart_line,
        cart::remove_from_cart,
        cart::purchase_cart,
    ),
    components(
        schemas(
            User,
            Sweet,
            Category,
            CartLine,
            ExpandedCartLine,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateSweetRequest,
            UpdateSweetRequest,
            RestockRequest,
            AddToCartRequest,
            UpdateCartLineRequest,
            CreateCategoryRequest,
            MessageResponse,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Sweets", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart and checkout endpoints"),
        (name = "Categories", description = "Category endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
