use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::ProfileService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/me/profile",
    tag = "profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取用户资料成功", body = ProfileApiResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_my_profile(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match profile_service.get_profile(user_id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(profile))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn profile_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/me/profile").route(web::get().to(get_my_profile)));
}
