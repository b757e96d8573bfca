mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use cantina_backend::entities::{OrderStatus, Role};
use cantina_backend::handlers;
use cantina_backend::middlewares::AuthMiddleware;
use cantina_backend::services::{OrderService, ProfileService};
use common::*;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use uuid::Uuid;

macro_rules! init_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt_service()))
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(OrderService::new($pool.clone())))
                .app_data(web::Data::new(ProfileService::new($pool.clone())))
                .configure(handlers::routes),
        )
        .await
    };
}

fn bearer(user_id: Uuid) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user_id)))
}

#[actix_web::test]
async fn test_health_is_public() {
    let pool = setup_db().await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], "connected");
}

#[actix_web::test]
async fn test_create_order_returns_201() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(20.00), Role::Client).await;
    let student = seed_student(&pool, guardian.id).await;
    let item_a = seed_menu_item(&pool, "Pasta", dec!(3.50), true).await;
    let item_b = seed_menu_item(&pool, "Soup", dec!(6.50), true).await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(guardian.id))
        .set_json(json!({
            "student_id": student.id,
            "items": [
                { "menu_item_id": item_a.id, "quantity": 2 },
                { "menu_item_id": item_b.id, "quantity": 1 }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["total_amount"].as_f64(), Some(13.5));
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(2));

    assert_eq!(credits_of(&pool, guardian.id).await, dec!(6.50));
}

#[actix_web::test]
async fn test_missing_token_is_401() {
    let pool = setup_db().await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/me/orders").to_request();
    let err = match test::try_call_service(&app, req).await {
        Ok(resp) => panic!("expected auth failure, got {}", resp.status()),
        Err(e) => e,
    };
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/me/profile")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let err = match test::try_call_service(&app, req).await {
        Ok(resp) => panic!("expected auth failure, got {}", resp.status()),
        Err(e) => e,
    };
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_malformed_body_is_400() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(20.00), Role::Client).await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(guardian.id))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(guardian.id))
        .set_json(json!({ "student_id": Uuid::new_v4(), "items": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_insufficient_funds_is_402() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(5.00), Role::Client).await;
    let student = seed_student(&pool, guardian.id).await;
    let item = seed_menu_item(&pool, "Pasta", dec!(6.00), true).await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(guardian.id))
        .set_json(json!({
            "student_id": student.id,
            "items": [{ "menu_item_id": item.id, "quantity": 1 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INSUFFICIENT_FUNDS");
}

#[actix_web::test]
async fn test_foreign_student_is_403() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(20.00), Role::Client).await;
    let other = seed_user(&pool, dec!(20.00), Role::Client).await;
    let student = seed_student(&pool, other.id).await;
    let item = seed_menu_item(&pool, "Pasta", dec!(3.50), true).await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(guardian.id))
        .set_json(json!({
            "student_id": student.id,
            "items": [{ "menu_item_id": item.id, "quantity": 1 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "OWNERSHIP_VIOLATION");
}

#[actix_web::test]
async fn test_unavailable_item_is_400() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(20.00), Role::Client).await;
    let student = seed_student(&pool, guardian.id).await;
    let item = seed_menu_item(&pool, "Soup", dec!(6.50), false).await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(guardian.id))
        .set_json(json!({
            "student_id": student.id,
            "items": [{ "menu_item_id": item.id, "quantity": 1 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "ITEM_UNAVAILABLE");
}

#[actix_web::test]
async fn test_order_status_update_requires_staff() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(20.00), Role::Client).await;
    let staff = seed_user(&pool, dec!(0), Role::Staff).await;
    let order = seed_order(&pool, guardian.id, OrderStatus::Pending).await;
    let app = init_app!(pool);
    let uri = format!("/orders/{}", order.id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(guardian.id))
        .set_json(json!({ "status": "READY" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(staff.id))
        .set_json(json!({ "status": "ready" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "READY");
}

#[actix_web::test]
async fn test_unknown_order_is_404() {
    let pool = setup_db().await;
    let staff = seed_user(&pool, dec!(0), Role::Staff).await;
    let app = init_app!(pool);

    let req = test::TestRequest::get()
        .uri(&format!("/orders/{}", Uuid::new_v4()))
        .insert_header(bearer(staff.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_client_cannot_list_all_orders() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(20.00), Role::Client).await;
    let app = init_app!(pool);

    let req = test::TestRequest::get()
        .uri("/orders")
        .insert_header(bearer(guardian.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/me/orders?page=1&per_page=10")
        .insert_header(bearer(guardian.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["page_size"], 10);
}

#[actix_web::test]
async fn test_profile_endpoint() {
    let pool = setup_db().await;
    let guardian = seed_user(&pool, dec!(12.50), Role::Client).await;
    let app = init_app!(pool);

    let req = test::TestRequest::get()
        .uri("/me/profile")
        .insert_header(bearer(guardian.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "client");
    assert_eq!(body["data"]["credits"].as_f64(), Some(12.5));

    let req = test::TestRequest::get()
        .uri("/me/profile")
        .insert_header(bearer(Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
