use crate::entities::{Role, user_entity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    /// 预付余额
    pub credits: Decimal,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_entity::Model> for ProfileResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            credits: m.credits,
            role: m.role,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
