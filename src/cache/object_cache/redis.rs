//! Redis 缓存后端
//!
//! 所有键加上配置的前缀，多个实例可以共用一个 Redis。
//! 读写出错只记日志，不影响请求。

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::OnceCell;
use tracing::{debug, error};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

const SCAN_BATCH: usize = 500;

pub struct RedisObjectCache {
    client: redis::Client,
    // 多路复用连接可克隆，首次使用时建立
    conn: OnceCell<MultiplexedConnection>,
    prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let settings = &config.cache.redis;

        let client = redis::Client::open(settings.url.as_str())
            .map_err(|e| format!("Invalid Redis URL {}: {e}", settings.url))?;

        // 启动时同步探测一次，不可用时由启动流程换成内存缓存
        let mut probe = client
            .get_connection()
            .map_err(|e| format!("Redis unreachable at {}: {e}", settings.url))?;
        redis::cmd("PING")
            .query::<String>(&mut probe)
            .map_err(|e| format!("Redis PING failed: {e}"))?;
        debug!("Redis cache ready (prefix '{}')", settings.key_prefix);

        Ok(Self {
            client,
            conn: OnceCell::new(),
            prefix: settings.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let conn = self
            .conn
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await;
        match conn {
            Ok(conn) => Some(conn.clone()),
            Err(e) => {
                error!("Redis connection failed: {}", e);
                None
            }
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };
        match conn.get::<_, Option<String>>(self.key(key)).await {
            Ok(Some(value)) => CacheResult::Found(value),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Redis GET {} failed: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn.set_ex::<_, _, ()>(self.key(&key), value, ttl).await {
            error!("Redis SETEX {} failed: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, i64>(self.key(key)).await {
            error!("Redis DEL {} failed: {}", key, e);
        }
    }

    /// 用 SCAN 分批删除本前缀下的键
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let pattern = format!("{}*", self.prefix);
        let mut cursor: u64 = 0;
        loop {
            let batch: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;
            let (next, keys) = match batch {
                Ok(batch) => batch,
                Err(e) => {
                    error!("Redis SCAN failed: {}", e);
                    return;
                }
            };
            if !keys.is_empty()
                && let Err(e) = conn.del::<_, i64>(keys).await
            {
                error!("Redis DEL batch failed: {}", e);
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
    }
}
