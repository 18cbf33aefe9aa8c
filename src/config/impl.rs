use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("ACADEMIQ")
                    .separator("_")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("stripe.secret_key", std::env::var("STRIPE_SECRET_KEY").ok())?
            .set_override_option(
                "stripe.webhook_secret",
                std::env::var("STRIPE_WEBHOOK_SECRET").ok(),
            )?
            .set_override_option("ai.api_key", std::env::var("ANTHROPIC_API_KEY").ok())?
            .set_override_option("validation.secret", std::env::var("VALIDATION_SECRET").ok())?
            .set_override_option(
                "validation.public_base_url",
                std::env::var("PUBLIC_BASE_URL").ok(),
            )?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        validate_spei_prefix(&app_config.spei.prefix)?;

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }

    /// 收据目录（public/recibos）
    pub fn receipts_path(&self) -> PathBuf {
        PathBuf::from(&self.documents.public_dir).join(&self.documents.receipts_dir)
    }

    /// 报告目录（public/informes）
    pub fn reports_path(&self) -> PathBuf {
        PathBuf::from(&self.documents.public_dir).join(&self.documents.reports_dir)
    }
}

/// 参考号按 '-' 切分，前缀不能为空也不能含 '-'
fn validate_spei_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || prefix.contains('-') || prefix.trim() != prefix {
        return Err(ConfigError::Message(format!(
            "Invalid spei.prefix {prefix:?}: must be non-empty without '-' or surrounding spaces"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable_without_config_file() {
        let config = AppConfig::default();
        assert_eq!(config.spei.prefix, "ACQ");
        assert_eq!(config.spei.expiration_days, 3);
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
        assert!(config.is_development());
        assert_eq!(
            config.receipts_path(),
            PathBuf::from("public").join("recibos")
        );
    }

    #[test]
    fn test_spei_prefix_validation() {
        assert!(validate_spei_prefix("ACQ").is_ok());
        assert!(validate_spei_prefix("acq").is_ok());
        assert!(validate_spei_prefix("").is_err());
        assert!(validate_spei_prefix("AC-Q").is_err());
        assert!(validate_spei_prefix(" ACQ").is_err());
    }
}
