use crate::entities::{OrderStatus, order_entity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 下单请求中的单个菜品
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    #[serde(default)]
    #[schema(example = "1b4e28ba-2fa1-11d2-883f-0016d3cca427")]
    pub menu_item_id: String,
    #[serde(default)]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    /// 就餐学生ID（必须属于当前监护人）
    #[serde(default)]
    #[schema(example = "6ecd8c99-4036-403d-bf84-cf8400f67836")]
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[serde(default)]
    #[schema(example = "PREPARING")]
    pub status: String,
}

/// 员工/管理员订单列表查询参数
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyOrdersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// 订单明细；menu_item_name 通过关联 menu_items 查询得到
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sea_orm::FromQueryResult)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_name: String,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    /// 下单（付款）的监护人
    pub user_id: Uuid,
    pub student_id: Option<Uuid>,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderLineResponse>,
}

impl OrderResponse {
    pub fn from_model(m: order_entity::Model, items: Vec<OrderLineResponse>) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            student_id: m.student_id,
            order_date: m.order_date,
            total_amount: m.total_amount,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
            items,
        }
    }
}
