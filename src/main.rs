use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use cantina_backend::{
    config::Config,
    database::{close_pool, create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logger();

    // 加载配置
    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    // 创建数据库连接池
    let pool = create_pool(&config.database).await.map_err(|e| {
        log::error!("Failed to create database connection pool: {e}");
        std::io::Error::other(e.to_string())
    })?;

    // 运行数据库迁移
    run_migrations(&pool).await.map_err(|e| {
        log::error!("Failed to run database migrations: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let jwt_service = JwtService::from_config(&config.jwt);

    // 创建服务
    let order_service = OrderService::new(pool.clone());
    let profile_service = ProfileService::new(pool.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let server_pool = pool.clone();
    let result = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .configure(swagger_config)
            .configure(handlers::routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await;

    log::info!("HTTP server stopped, closing database pool");
    if let Err(e) = close_pool(pool).await {
        log::error!("Failed to close database pool: {e}");
    }

    result
}
