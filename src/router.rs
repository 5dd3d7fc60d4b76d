// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::{config::AppState, docs, handlers, middleware::auth::auth_guard};

pub fn create_router(app_state: AppState) -> Router {
    let customer_routes = Router::new()
        .route("/api/customers"
               ,post(handlers::customers::create_customer)
        )
        .route("/api/customers/overview"
               ,get(handlers::customers::list_overview)
        )
        .route("/api/customers/{customer_id}"
               ,get(handlers::customers::get_customer)
               .put(handlers::customers::update_customer)
               .delete(handlers::customers::delete_customer)
        )
        .route("/api/customers/{customer_id}/thread"
               ,get(handlers::customers::get_thread)
        );

    let lead_routes = Router::new()
        .route("/api/leads"
               ,get(handlers::leads::list_leads)
               .post(handlers::leads::create_lead)
        )
        .route("/api/leads/{lead_id}"
               ,get(handlers::leads::get_lead)
               .put(handlers::leads::update_lead)
               .delete(handlers::leads::delete_lead)
        );

    let inbox_routes = Router::new()
        .route("/api/inbox"
               ,get(handlers::inbox::list_messages)
               .post(handlers::inbox::ingest_message)
        )
        .route("/api/inbox/{inbox_id}"
               ,get(handlers::inbox::get_message)
               .put(handlers::inbox::update_message)
               .delete(handlers::inbox::delete_message)
        );

    // Tudo aqui exige o token
    let protected_routes = Router::new()
        .merge(customer_routes)
        .merge(lead_routes)
        .merge(inbox_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/", get(handlers::health::root))
        .route("/api/openapi.json", get(docs::openapi_json))
        .merge(protected_routes)
        .with_state(app_state)
}
