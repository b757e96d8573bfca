#![allow(dead_code)]

use cantina_backend::config::DatabaseConfig;
use cantina_backend::database::{DbPool, create_pool, run_migrations};
use cantina_backend::entities::{
    OrderStatus, Role, menu_item_entity as menu_items, order_entity as orders,
    order_item_entity as order_items, student_entity as students, user_entity as users,
};
use cantina_backend::utils::JwtService;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_AUDIENCE: &str = "authenticated";

/// 内存 SQLite，单连接保证所有查询共享同一个库
pub async fn setup_db() -> DbPool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        sqlx_logging: false,
    };
    let pool = create_pool(&config).await.expect("connect sqlite");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

pub fn jwt_service() -> JwtService {
    JwtService::new(TEST_JWT_SECRET, Some(TEST_AUDIENCE.to_string()))
}

pub fn token_for(user_id: Uuid) -> String {
    jwt_service()
        .issue_access_token(user_id, 3600)
        .expect("issue token")
}

pub async fn seed_user(pool: &DbPool, credits: Decimal, role: Role) -> users::Model {
    let now = Utc::now();
    users::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(Some("Test Guardian".to_string())),
        email: Set(Some(format!("{}@example.com", Uuid::new_v4()))),
        credits: Set(credits),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(pool)
    .await
    .expect("insert user")
}

pub async fn seed_student(pool: &DbPool, parent_user_id: Uuid) -> students::Model {
    let now = Utc::now();
    students::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Test Student".to_string()),
        class_id: Set(None),
        parent_user_id: Set(parent_user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(pool)
    .await
    .expect("insert student")
}

pub async fn seed_menu_item(
    pool: &DbPool,
    name: &str,
    price: Decimal,
    is_available: bool,
) -> menu_items::Model {
    let now = Utc::now();
    menu_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        category: Set(Some("lunch".to_string())),
        image_url: Set(None),
        is_available: Set(is_available),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(pool)
    .await
    .expect("insert menu item")
}

pub async fn set_menu_price(pool: &DbPool, item: &menu_items::Model, price: Decimal) {
    let mut active: menu_items::ActiveModel = item.clone().into();
    active.price = Set(price);
    active.update(pool).await.expect("update menu price");
}

pub async fn credits_of(pool: &DbPool, user_id: Uuid) -> Decimal {
    users::Entity::find_by_id(user_id)
        .one(pool)
        .await
        .expect("query user")
        .expect("user exists")
        .credits
}

pub async fn order_count(pool: &DbPool, user_id: Uuid) -> u64 {
    orders::Entity::find()
        .filter(orders::Column::UserId.eq(user_id))
        .count(pool)
        .await
        .expect("count orders")
}

pub async fn order_item_count(pool: &DbPool) -> u64 {
    order_items::Entity::find()
        .count(pool)
        .await
        .expect("count order items")
}

/// 直接写入指定状态的订单（无明细），用于列表过滤测试
pub async fn seed_order(pool: &DbPool, user_id: Uuid, status: OrderStatus) -> orders::Model {
    let now = Utc::now();
    orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        student_id: Set(None),
        order_date: Set(now),
        total_amount: Set(Decimal::ZERO),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(pool)
    .await
    .expect("insert order")
}
