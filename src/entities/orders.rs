use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PREPARING")]
    Preparing,
    #[sea_orm(string_value = "READY")]
    Ready,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

impl OrderStatus {
    /// 员工视图中可见的状态（未完结的订单）
    pub const STAFF_VISIBLE: [OrderStatus; 3] =
        [OrderStatus::Pending, OrderStatus::Preparing, OrderStatus::Ready];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "READY" => Ok(OrderStatus::Ready),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELED" => Ok(OrderStatus::Canceled),
            _ => Err(format!("Invalid order status '{}'", s.trim())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub student_id: Option<Uuid>,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_case_insensitive() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("Preparing".parse::<OrderStatus>(), Ok(OrderStatus::Preparing));
        assert_eq!(" READY ".parse::<OrderStatus>(), Ok(OrderStatus::Ready));
        assert_eq!("completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!("canceled".parse::<OrderStatus>(), Ok(OrderStatus::Canceled));
    }

    #[test]
    fn test_parse_status_rejects_unknown() {
        assert!("DELIVERED".parse::<OrderStatus>().is_err());
        assert!("cancelled".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_staff_visible_statuses() {
        assert!(OrderStatus::STAFF_VISIBLE.contains(&OrderStatus::Ready));
        assert!(!OrderStatus::STAFF_VISIBLE.contains(&OrderStatus::Completed));
        assert!(!OrderStatus::STAFF_VISIBLE.contains(&OrderStatus::Canceled));
    }
}
