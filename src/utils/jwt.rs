use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // 用户角色
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::encode_with_secret(
            user_id,
            role,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
            &Self::get_secret(),
        )
    }

    // 使用指定密钥与有效期签发 Token
    fn encode_with_secret(
        user_id: i64,
        role: &str,
        expiry_duration: chrono::Duration,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(token, &Self::get_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token =
            JwtUtils::encode_with_secret(42, "teacher", chrono::Duration::minutes(5), "s3cret")
                .unwrap();
        let claims = JwtUtils::decode_with_secret(&token, "s3cret").unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            JwtUtils::encode_with_secret(1, "student", chrono::Duration::minutes(5), "a").unwrap();
        assert!(JwtUtils::decode_with_secret(&token, "b").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 超过默认 60 秒的时钟容差
        let token =
            JwtUtils::encode_with_secret(1, "student", chrono::Duration::minutes(-5), "a").unwrap();
        assert!(JwtUtils::decode_with_secret(&token, "a").is_err());
    }
}
