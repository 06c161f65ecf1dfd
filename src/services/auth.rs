// src/services/auth.rs

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

// Só valida tokens. A emissão (login) fica com o provedor de identidade.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        // HS256 + checagem de `exp`
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub async fn load_user(&self, claims: &Claims) -> Result<User, AppError> {
        // Token válido de um usuário que não existe mais também é 401
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");
        AuthService::new(UserRepository::new(pool), secret.to_string())
    }

    fn token(secret: &str, exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
    }

    #[tokio::test]
    async fn accepts_tokens_signed_with_the_secret() {
        let claims = service("segredo").decode_claims(&token("segredo", 3600));
        assert!(claims.is_ok());
    }

    #[tokio::test]
    async fn rejects_foreign_signatures_and_expired_tokens() {
        let auth = service("segredo");
        assert!(matches!(auth.decode_claims(&token("outro", 3600)), Err(AppError::InvalidToken)));
        assert!(matches!(auth.decode_claims(&token("segredo", -3600)), Err(AppError::InvalidToken)));
        assert!(matches!(auth.decode_claims("not-a-jwt"), Err(AppError::InvalidToken)));
    }
}
