// src/docs.rs

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "CRM API", description = "Clientes, leads e inbox"),
    paths(
        // --- Health ---
        handlers::health::root,

        // --- Customers ---
        handlers::customers::list_overview,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::get_thread,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,

        // --- Inbox ---
        handlers::inbox::list_messages,
        handlers::inbox::get_message,
        handlers::inbox::ingest_message,
        handlers::inbox::update_message,
        handlers::inbox::delete_message,
    ),
    components(
        schemas(
            handlers::health::MessageResponse,
            handlers::health::ErrorResponse,

            // --- Customers ---
            models::customer::Customer,
            models::customer::CustomerOverview,
            models::customer::CustomerThreadEntry,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Urgency,
            models::lead::Lead,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,

            // --- Inbox ---
            models::inbox::InboxMessage,
            models::inbox::CreateInboxPayload,
            models::inbox::UpdateInboxPayload,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Customers", description = "Clientes, visão geral e linha do tempo"),
        (name = "Leads", description = "Oportunidades de venda"),
        (name = "Inbox", description = "Mensagens recebidas pelos canais de contato")
    ),
    modifiers(&ApiTokenScheme)
)]
pub struct ApiDoc;

/// Token fixo da instalação (variável `API_TOKEN`), enviado como
/// `Authorization: Bearer <token>`. Não é um JWT: não expira nem carrega claims.
struct ApiTokenScheme;

impl utoipa::Modify for ApiTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .description(Some("Token estático configurado em API_TOKEN"))
            .build();

        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme("api_token", SecurityScheme::Http(scheme));
    }
}

// GET /api/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_with_bearer_security() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/",
            "/api/customers/overview",
            "/api/customers/{customer_id}",
            "/api/customers/{customer_id}/thread",
            "/api/customers",
            "/api/leads",
            "/api/leads/{lead_id}",
            "/api/inbox",
            "/api/inbox/{inbox_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente: {}", path);
        }

        let components = doc.components.expect("components");
        match components.security_schemes.get("api_token") {
            Some(SecurityScheme::Http(http)) => {
                assert!(http.scheme == HttpAuthScheme::Bearer);
                assert!(http.bearer_format.is_none());
                assert!(http.description.as_deref().unwrap().contains("API_TOKEN"));
            }
            _ => panic!("esquema api_token ausente"),
        }
    }
}
