use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        // 生产环境应限制为前端域名
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::ACCEPT,
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
        ])
        .allowed_header("X-CSRF-Token")
        .max_age(3600)
}
