use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers;
use crate::source::traits::InspectionSource;

pub fn create_router<S: InspectionSource + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Agent connectivity probe
        .route(
            "/backend/resources/connected",
            get(handlers::get_agent_connected::<S>),
        )
        // Full resource tree, with attributes for the expanded leaves
        .route(
            "/backend/resources/tree",
            get(handlers::get_resource_tree::<S>),
        )
        // Attribute map for a single resource
        .route(
            "/backend/resources/attributes",
            get(handlers::get_attribute_map::<S>),
        )
}
