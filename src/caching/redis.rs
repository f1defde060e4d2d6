//! JSON cache on top of Redis.
//!
//! Values are stored as serialized JSON strings. Cache operations are
//! best-effort from the caller's point of view: repositories read through
//! [`RedisClient::cached`] and write through [`RedisClient::store`], which log
//! a failing Redis and let the caller fall back to MongoDB.

use std::env;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::errors::{AppError, AppResult};

fn json_error(context: &'static str, error: serde_json::Error) -> AppError {
    AppError::RedisError(format!("{}: {}", context, error))
}

fn unreachable_server(error: redis::RedisError) -> AppError {
    AppError::ExternalServiceError(format!("Redis is unreachable: {}", error))
}

/// Cheaply cloneable Redis handle backed by a reconnecting connection manager.
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Connects to `REDIS_URL` (default `redis://localhost:6379`).
    pub async fn new() -> AppResult<Self> {
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        Self::connect(&redis_url).await
    }

    /// Opens a connection manager for `redis_url` and checks the server with `PING`.
    ///
    /// # Errors
    ///
    /// [`AppError::ExternalServiceError`] when the URL is malformed or the
    /// server does not answer.
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = Client::open(redis_url).map_err(unreachable_server)?;
        let mut manager = ConnectionManager::new(client)
            .await
            .map_err(unreachable_server)?;

        redis::cmd("PING")
            .query_async::<()>(&mut manager)
            .await
            .map_err(unreachable_server)?;
        log::info!("✅ Redis connected");

        Ok(Self { manager })
    }

    /// Best-effort read: a failing Redis is logged and reported as a miss.
    pub async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("cache read of {} failed: {}", key, e);
                None
            }
        }
    }

    /// Best-effort write with a TTL; failures are logged.
    pub async fn store<T: Serialize>(&self, key: &str, value: &T, seconds: u64) {
        if let Err(e) = self.set_with_expiry(key, value, seconds).await {
            log::warn!("cache write of {} failed: {}", key, e);
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(|e| json_error("Deserialization failed", e)))
            .transpose()
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value).map_err(|e| json_error("Serialization failed", e))?;
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, json, seconds).await?;
        Ok(())
    }

    pub async fn del(&self, key: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    pub async fn del_multiple(&self, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(keys).await?;
        Ok(())
    }

    pub async fn keys(&self, pattern: &str) -> AppResult<Vec<String>> {
        let mut conn = self.manager.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    /// Deletes every key matching `pattern`, returning how many were removed.
    pub async fn del_pattern(&self, pattern: &str) -> AppResult<usize> {
        let keys = self.keys(pattern).await?;
        self.del_multiple(&keys).await?;
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_with_malformed_url_is_external_failure() {
        match RedisClient::connect("not a redis url").await {
            Err(AppError::ExternalServiceError(msg)) => assert!(msg.contains("Redis is unreachable")),
            Err(other) => panic!("Expected ExternalServiceError, got {:?}", other),
            Ok(_) => panic!("malformed URL must not connect"),
        }
    }

    #[test]
    fn test_json_failure_is_redis_error() {
        let parse_failure = serde_json::from_str::<u32>("nope").unwrap_err();

        let error = json_error("Deserialization failed", parse_failure);

        assert!(matches!(error, AppError::RedisError(ref msg) if msg.starts_with("Deserialization failed")));
    }
}
