//! 对象缓存
//!
//! 目前只有 moka 内存实现，主要用于缓存 JWT 对应的用户信息。

pub mod memory;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub use memory::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 以 JSON 存取任意可序列化对象
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("缓存反序列化失败，移除 {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        CacheResult::NotFound => None,
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json).await;
    }
}
