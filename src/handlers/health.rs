use crate::database::DbPool;
use crate::models::{ApiResponse, HealthResponse};
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "服务状态", body = HealthResponse)
    )
)]
pub async fn health(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let database = match pool.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => {
            log::warn!("Database ping failed: {e}");
            "unavailable".to_string()
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(HealthResponse {
        service: "cantina".to_string(),
        database,
    })))
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health));
}
