use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::{OrderService, ProfileService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "下单成功", body = OrderApiResponse),
        (status = 400, description = "请求参数错误 / 菜品不存在或不可售"),
        (status = 401, description = "未授权"),
        (status = 402, description = "余额不足"),
        (status = 403, description = "学生不属于当前监护人"),
        (status = 500, description = "服务器错误")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match order_service.place_order(user_id, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Created().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("status" = Option<String>, Query, description = "订单状态（不区分大小写）"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取订单列表成功", body = PaginatedOrderResponse),
        (status = 400, description = "状态值无效"),
        (status = 401, description = "未授权"),
        (status = 403, description = "无权限")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    let role = profile_service.get_role(user_id).await?;
    log::info!("User {user_id} ({role}) listing orders");

    match order_service.list_orders(role, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(
        ("id" = String, Path, description = "订单ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取订单成功", body = OrderApiResponse),
        (status = 401, description = "未授权"),
        (status = 403, description = "无权查看该订单"),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    let role = profile_service.get_role(user_id).await?;

    match order_service.get_order(&path, user_id, role).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "order",
    params(
        ("id" = String, Path, description = "订单ID")
    ),
    request_body = UpdateOrderStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新订单状态成功", body = OrderApiResponse),
        (status = 400, description = "状态值无效"),
        (status = 401, description = "未授权"),
        (status = 403, description = "无权限"),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    let role = profile_service.get_role(user_id).await?;

    match order_service
        .update_status(&path, request.into_inner(), role)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/me/orders",
    tag = "order",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取我的订单成功", body = PaginatedOrderResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_my_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<MyOrdersQuery>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match order_service.list_my_orders(user_id, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(list_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::put().to(update_order_status)),
    )
    .service(web::resource("/me/orders").route(web::get().to(get_my_orders)));
}
