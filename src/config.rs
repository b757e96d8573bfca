use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default)]
    pub sqlx_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Expected `aud` claim; `None` disables audience validation
    #[serde(default)]
    pub audience: Option<String>,
}

/// 由 DB_HOST / DB_PORT / DB_USER / DB_PASSWORD / DB_NAME 拼接 PostgreSQL 连接串
pub fn database_url_from_parts(
    host: &str,
    port: &str,
    user: &str,
    password: &str,
    name: &str,
    ssl_mode: Option<&str>,
) -> String {
    let ssl_mode = ssl_mode.filter(|m| !m.is_empty()).unwrap_or("require");
    format!("postgresql://{user}:{password}@{host}:{port}/{name}?sslmode={ssl_mode}")
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// DATABASE_URL 优先，否则尝试由分段变量拼接
fn database_url_from_env() -> Option<String> {
    if let Some(url) = get_env("DATABASE_URL") {
        return Some(url);
    }
    let host = get_env("DB_HOST")?;
    let port = get_env("DB_PORT")?;
    let user = get_env("DB_USER")?;
    let password = get_env("DB_PASSWORD")?;
    let name = get_env("DB_NAME")?;
    let ssl_mode = get_env("DB_SSLMODE");
    Some(database_url_from_parts(
        &host,
        &port,
        &user,
        &password,
        &name,
        ssl_mode.as_deref(),
    ))
}

fn jwt_secret_from_env() -> Option<String> {
    get_env("JWT_SECRET").or_else(|| get_env("SUPABASE_JWT_SECRET"))
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse {config_path}: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let database_url = database_url_from_env().ok_or(
                    "DATABASE_URL (or DB_HOST/DB_PORT/DB_USER/DB_PASSWORD/DB_NAME) is not set and no config.toml was found",
                )?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", get_env_parse("PORT", 8080u16)),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                        sqlx_logging: get_env_parse("DB_SQLX_LOGGING", false),
                    },
                    jwt: JwtConfig {
                        secret: jwt_secret_from_env().unwrap_or_default(),
                        audience: Some(
                            get_env("JWT_AUDIENCE").unwrap_or_else(|| "authenticated".to_string()),
                        ),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Cannot read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Some(v) = get_env("SERVER_HOST") {
            config.server.host = v;
        }
        if let Some(v) = get_env("SERVER_PORT").or_else(|| get_env("PORT"))
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Some(v) = database_url_from_env() {
            config.database.url = v;
        }
        if let Some(v) = get_env("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Some(v) = get_env("DB_SQLX_LOGGING")
            && let Ok(flag) = v.parse()
        {
            config.database.sqlx_logging = flag;
        }
        if let Some(v) = jwt_secret_from_env() {
            config.jwt.secret = v;
        }
        if let Some(v) = get_env("JWT_AUDIENCE") {
            config.jwt.audience = Some(v);
        }

        if config.jwt.secret.is_empty() {
            return Err("JWT secret is not configured (JWT_SECRET or SUPABASE_JWT_SECRET)".into());
        }

        Ok(config)
    }
}
