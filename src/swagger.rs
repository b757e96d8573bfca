use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{OrderStatus, Role};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::order::create_order,
        handlers::order::list_orders,
        handlers::order::get_order,
        handlers::order::update_order_status,
        handlers::order::get_my_orders,
        handlers::profile::get_my_profile,
    ),
    components(
        schemas(
            OrderStatus,
            Role,
            OrderItemRequest,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderLineResponse,
            OrderResponse,
            ProfileResponse,
            HealthResponse,
            ApiError,
            OrderApiResponse,
            ProfileApiResponse,
            PaginatedOrderResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service health API"),
        (name = "order", description = "Order placement and management API"),
        (name = "profile", description = "Guardian profile API"),
    ),
    info(
        title = "Cantina Backend API",
        version = "1.0.0",
        description = "Cantina order service REST API documentation"
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
