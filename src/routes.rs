// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::organization_guard};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas de negócio: todas exigem token + x-organization-id + vínculo
    let business_routes = Router::new()
        .route(
            "/po-suggestions",
            get(handlers::po_suggestions::list_suggestions)
                .post(handlers::po_suggestions::generate_suggestions)
                .put(handlers::po_suggestions::update_suggestion),
        )
        .route(
            "/purchase-orders",
            get(handlers::purchase_orders::list_purchase_orders)
                .post(handlers::purchase_orders::create_purchase_order),
        )
        .route(
            "/purchase-orders/{id}",
            get(handlers::purchase_orders::get_purchase_order),
        )
        .route(
            "/reorder-rules",
            get(handlers::reorder_rules::list_reorder_rules)
                .post(handlers::reorder_rules::create_reorder_rule),
        )
        .route(
            "/reorder-rules/{id}",
            put(handlers::reorder_rules::update_reorder_rule),
        )
        .route(
            "/supplier-quotations",
            get(handlers::supplier_quotations::list_quotations)
                .put(handlers::supplier_quotations::review_quotation),
        )
        .route("/purchasing/analytics", get(handlers::analytics::purchasing_analytics))
        .route("/sales/analytics", get(handlers::analytics::sales_analytics))
        .route("/inventory/analytics", get(handlers::analytics::inventory_analytics))
        .route(
            "/settings/procurement",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/permissions", get(handlers::rbac::list_permissions))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            organization_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", business_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
