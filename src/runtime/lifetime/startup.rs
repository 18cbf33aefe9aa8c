use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{AcademiqError, Result};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::jobs::spawn_sweeper;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 依次尝试配置的缓存后端与内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let configured = AppConfig::get().cache.cache_type.as_str();
    let mut candidates = vec![configured];
    if configured != "moka" {
        candidates.push("moka");
    }

    for name in candidates {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' is not registered", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                if name != configured {
                    warn!("Using '{}' cache instead of '{}'", name, configured);
                }
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Cache backend '{}' unavailable: {}", name, e),
        }
    }

    Err(AcademiqError::cache_plugin_not_found(format!(
        "no usable cache backend (configured: {configured})"
    )))
}

fn random_password(length: usize) -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789#%+=";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// 平台管理员：不属于任何学校，负责开通学校与学校管理员
fn platform_admin_request(password_hash: String) -> CreateUserRequest {
    CreateUserRequest {
        username: "superadmin".to_string(),
        email: "superadmin@localhost".to_string(),
        password: password_hash,
        role: UserRole::SuperAdmin,
        display_name: Some("Administrador de plataforma".to_string()),
        school_id: None,
    }
}

/// 空库时创建平台管理员
async fn seed_platform_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let existing = storage.count_users().await?;
    if existing > 0 {
        debug!("{} user(s) present, no seeding needed", existing);
        return Ok(());
    }

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            let generated = random_password(16);
            warn!("ADMIN_PASSWORD not set, generated password for 'superadmin': {generated}");
            warn!("Store it now, it will not be shown again");
            generated
        }
    };
    let password_hash = hash_password(&password)?;

    let admin = storage
        .create_user(platform_admin_request(password_hash))
        .await?;
    info!("Platform admin '{}' created (ID: {})", admin.username, admin.id);
    Ok(())
}

/// 收据与报告的静态目录
async fn ensure_public_dirs() -> Result<()> {
    let config = AppConfig::get();
    for dir in [config.receipts_path(), config.reports_path()] {
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Public directory ready: {}", dir.display());
    }
    Ok(())
}

/// 存储、缓存、初始账号与后台任务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    info!("Storage ready, migrations applied");

    if let Err(e) = seed_platform_admin(&storage).await {
        warn!("Platform admin seeding skipped: {}", e);
    }

    ensure_public_dirs().await?;

    let cache = create_cache().await?;
    info!("Cache ready");

    let interval = AppConfig::get().jobs.sweep_interval_secs;
    if interval > 0 {
        spawn_sweeper(storage.clone(), interval);
    } else {
        warn!("Background sweeper disabled (jobs.sweep_interval_secs = 0)");
    }

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::empty_storage;

    #[test]
    fn test_random_password_alphabet() {
        let password = random_password(24);
        assert_eq!(password.chars().count(), 24);
        // 易混淆字符已排除
        assert!(!password.contains(['0', 'O', 'l', '1', 'I']));
    }

    #[tokio::test]
    async fn test_seed_only_on_empty_database() {
        let (storage, _dir) = empty_storage().await;
        let storage: Arc<dyn Storage> = storage;
        unsafe { std::env::set_var("ADMIN_PASSWORD", "cambiar-esta-clave") };

        seed_platform_admin(&storage).await.unwrap();
        assert_eq!(storage.count_users().await.unwrap(), 1);
        let admin = storage
            .get_user_by_username_or_email("superadmin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::SuperAdmin);
        assert!(admin.school_id.is_none());

        // 再次调用不会重复创建
        seed_platform_admin(&storage).await.unwrap();
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}
