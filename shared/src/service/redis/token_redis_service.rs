use crate::config::redis_config::RedisConfig;
use crate::security::TokenPair;
use crate::service::redis::core::redis_get_key::KeyType;
use crate::tool::error::AppError;
use crate::traits::TokenSaver;
use async_trait::async_trait;
use redis::Value;
use std::time::Duration;
use tracing::debug;

/// Redis mirror of the latest token pair per user. Each key expires with its token.
#[derive(Clone)]
pub struct TokenRedisService {
    redis_config: RedisConfig,
}

impl TokenRedisService {
    pub fn new(redis_config: RedisConfig) -> Self {
        Self { redis_config }
    }
}

/// Builds the `SET key value EX ttl` pipeline for one pair, both writes applied atomically.
pub(crate) fn token_pair_pipeline(
    user_id: i64,
    pair: &TokenPair,
    access_ttl: Duration,
    refresh_ttl: Duration,
) -> redis::Pipeline {
    let mut p = redis::pipe();
    p.atomic();
    p.cmd("SET")
        .arg(KeyType::AccessToken.get_key(user_id))
        .arg(&pair.access_token)
        .arg("EX")
        .arg(access_ttl.as_secs().max(1));
    p.cmd("SET")
        .arg(KeyType::RefreshToken.get_key(user_id))
        .arg(&pair.refresh_token)
        .arg("EX")
        .arg(refresh_ttl.as_secs().max(1));
    p
}

#[async_trait]
impl TokenSaver for TokenRedisService {
    async fn save_token_pair(
        &self,
        user_id: i64,
        pair: &TokenPair,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<(), AppError> {
        let mut conn = self.redis_config.get_connection();
        let p = token_pair_pipeline(user_id, pair, access_ttl, refresh_ttl);

        let _resp: Vec<Value> = p.query_async(&mut conn).await?;
        debug!(user_id, "token pair cached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_writes_both_tokens_with_ttl() {
        let pair = TokenPair {
            subject: 12,
            access_token: "acc".to_string(),
            refresh_token: "ref".to_string(),
        };
        let p = token_pair_pipeline(12, &pair, Duration::from_secs(900), Duration::from_secs(604_800));
        let packed = String::from_utf8_lossy(&p.get_packed_pipeline()).to_string();

        assert!(packed.contains("MULTI"));
        assert!(packed.contains("auth:access_token:12"));
        assert!(packed.contains("auth:refresh_token:12"));
        assert!(packed.contains("900"));
        assert!(packed.contains("604800"));
        assert!(packed.contains("EXEC"));
    }
}
