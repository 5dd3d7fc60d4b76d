// src/models/inbox.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value; // ai_json fica em JSONB
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{patch::present, query::{blank_as_false, blank_as_none}},
    models::lead::Urgency,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct InboxMessage {
    pub inbox_id: Uuid,
    #[schema(example = "website_form")]
    pub source: Option<String>,
    pub channel: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_type: Option<String>,
    pub message_raw: Option<String>,

    // Classificação feita pela IA, sempre como objeto estruturado
    #[schema(value_type = Option<Object>, example = json!({"vehicle_type": "caravan"}))]
    pub ai_json: Option<Value>,

    pub dedupe_key: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    #[schema(example = "unread")]
    pub status: Option<String>,
    pub urgency_score: Option<i32>,
    pub urgency_level: Option<Urgency>,
    pub customer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- FILTROS ---

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InboxListParams {
    /// Ignorado quando `unlinked_only=true`
    #[serde(default, deserialize_with = "blank_as_none")]
    pub customer_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "blank_as_false")]
    pub unlinked_only: bool,
    /// `received_at|created_at` + `asc|desc`
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub offset: Option<i64>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInboxPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "website_form")]
    pub source: String,
    pub channel: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub service_type: Option<String>,
    pub message_raw: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub ai_json: Option<Value>,

    pub dedupe_key: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub status: Option<String>,

    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    pub urgency_score: Option<i32>,

    pub urgency_level: Option<Urgency>,
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateInboxPayload {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", rename = "type")]
    #[schema(value_type = Option<String>)]
    pub kind: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub service_type: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Object>)]
    pub ai_json: Option<Option<Value>>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
    #[schema(value_type = Option<i32>)]
    pub urgency_score: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Urgency>)]
    pub urgency_level: Option<Option<Urgency>>,

    /// `null` desvincula a mensagem do cliente
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Uuid>)]
    pub customer_id: Option<Option<Uuid>>,
}

impl UpdateInboxPayload {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.kind.is_none()
            && self.service_type.is_none()
            && self.ai_json.is_none()
            && self.urgency_score.is_none()
            && self.urgency_level.is_none()
            && self.customer_id.is_none()
    }
}
