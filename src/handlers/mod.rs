pub mod health;
pub mod order;
pub mod profile;

pub use health::health_config;
pub use order::order_config;
pub use profile::profile_config;

use crate::error::AppError;
use actix_web::web;

/// JSON 解析失败时返回统一的 VALIDATION_ERROR 响应
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid request body: {err}")).into()
    })
}

/// 注册全部业务路由
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(health_config)
        .configure(order_config)
        .configure(profile_config);
}
