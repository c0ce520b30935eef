use std::{env, path::PathBuf, sync::Arc, time::Duration};

use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::entity::{sea_orm_active_enums::Gender, user};
use crate::error::ApiError;
use crate::mail::{Notifier, create_mail_client};

pub type AppState = Arc<State>;

/// Issued tokens are also stored server-side (user_tokens); the JWT payload
/// exists for client convenience, authorization is the row lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub fullname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub contact_number: String,
    pub gender: Gender,
    pub role: String,
    pub first_login_at: Option<chrono::NaiveDateTime>,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn for_user(user: &user::Model) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            fullname: user.full_name(),
            username: user.username.clone(),
            email: user.email.clone(),
            contact_number: user.contact(),
            gender: user.gender,
            role: user.role.clone(),
            first_login_at: user.first_login_at,
            iat: now,
            exp: now + 24 * 60 * 60,
        }
    }
}

pub struct State {
    pub db: DatabaseConnection,
    pub notifier: Notifier,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    jwt_secret: String,
    /// Auth token cache: blake3(token) -> user id. Short TTL so revoked
    /// tokens and status changes propagate quickly.
    /// Entries are keyed by token hash to avoid storing raw tokens.
    pub auth_cache: moka::sync::Cache<String, i32>,
}

impl State {
    pub async fn new() -> Self {
        let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let mut opt = ConnectOptions::new(db_url.to_owned());
        opt.max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8));

        let db = Database::connect(opt)
            .await
            .expect("Failed to connect to database");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let upload_dir = PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "upload".to_string()));

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4040".to_string())
            .trim_end_matches('/')
            .to_string();

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| public_base_url.clone())
            .trim_end_matches('/')
            .to_string();

        let mail_client = match create_mail_client().await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Failed to initialize mail client: {}", e);
                None
            }
        };

        Self {
            db,
            notifier: Notifier::new(mail_client, frontend_url),
            upload_dir,
            public_base_url,
            jwt_secret,
            auth_cache: moka::sync::Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(240))
                .build(),
        }
    }

    pub fn sign_token(&self, user: &user::Model) -> Result<String, ApiError> {
        let claims = TokenClaims::for_user(user);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn hash_token(token: &str) -> String {
        blake3::hash(token.as_bytes()).to_hex().to_string().to_lowercase()
    }

    pub fn public_file_url(&self, file_type: &str, file_name: &str) -> String {
        format!("{}/upload/{}/{}", self.public_base_url, file_type, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::sea_orm_active_enums::UserStatus;

    #[test]
    fn claims_carry_identity_and_expiry() {
        let user = user::Model {
            id: 7,
            first_name: Some("Omar".into()),
            middle_name: None,
            last_name: Some("Nasser".into()),
            username: Some("omar".into()),
            email: "omar@example.com".into(),
            country_code: Some("+20".into()),
            contact_number: Some("1001001000".into()),
            password: "hash".into(),
            gender: Gender::Male,
            role: "admin".into(),
            status: UserStatus::Active,
            first_login_at: None,
            last_login_at: None,
            forgot_password_code: None,
            email_verify_code: None,
            created_at: chrono::NaiveDateTime::default(),
            deleted_at: None,
        };

        let claims = TokenClaims::for_user(&user);
        assert_eq!(claims.fullname, "Omar Nasser");
        assert_eq!(claims.contact_number, "+20 1001001000");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn token_hashes_are_stable_and_distinct() {
        let a = State::hash_token("token-a");
        assert_eq!(a, State::hash_token("token-a"));
        assert_ne!(a, State::hash_token("token-b"));
        assert_eq!(a.len(), 64);
    }
}
