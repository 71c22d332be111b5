use axum::{
    Router,
    routing::{get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::trace::TraceLayer;

use hackreg_core::health::healthz;
use hackreg_core::middleware::{REQUEST_ID_HEADER, cors_layer, request_id_layer};

use crate::handlers::{
    health::readyz,
    otp::{send_otp, verify_otp},
    registration::{
        create_registration, export_registrations, list_registrations, update_registration,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState, cors_origin: Option<&str>) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registrations
        .route("/registrations", get(list_registrations))
        .route("/registrations", post(create_registration))
        .route("/registrations/export", get(export_registrations))
        .route("/registrations/{id}", patch(update_registration))
        // Email verification
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(
                    axum::http::HeaderName::from_static(REQUEST_ID_HEADER),
                ))
                .layer(cors_layer(cors_origin)),
        )
        .with_state(state)
}
