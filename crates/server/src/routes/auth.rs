//! Authentication routes: Google ID token sign-in plus local
//! username/password signup and login.

use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::post,
};
use db::models::user::{User, UserInfo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;
use ts_rs::TS;
use utils::jwt::{self, Claims};

use crate::{error::ApiError, state::AppState};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Deserialize, TS)]
pub struct GoogleAuthRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    fn ok(jwt: String, user: UserInfo) -> Self {
        Self {
            success: true,
            jwt: Some(jwt),
            user: Some(user),
            message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            jwt: None,
            user: None,
            message: Some(message.into()),
        }
    }
}

/// Claims Google's tokeninfo endpoint returns for a valid ID token.
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    sub: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    aud: Option<String>,
}

fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{digest:x}")
}

fn issue_jwt(state: &AppState, user: &User) -> Result<String, ApiError> {
    let claims = Claims::new(user.id.to_string(), user.name.clone(), user.email.clone());
    jwt::issue(&state.config.jwt_secret, &claims)
        .map_err(|e| ApiError::Other(anyhow::anyhow!("failed to issue token: {e}")))
}

/// Verify a Google ID token against the tokeninfo endpoint and sign the
/// user in, creating their row on first contact.
pub async fn google_auth(
    State(state): State<AppState>,
    Json(payload): Json<GoogleAuthRequest>,
) -> Result<ResponseJson<AuthResponse>, ApiError> {
    let response = state
        .http
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", payload.token.as_str())])
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "tokeninfo request failed");
            ApiError::Unauthorized("could not verify Google token".into())
        })?;

    if !response.status().is_success() {
        return Ok(ResponseJson(AuthResponse::failed("Invalid Google token")));
    }

    let info: GoogleTokenInfo = response
        .json()
        .await
        .map_err(|e| ApiError::Unauthorized(format!("malformed tokeninfo response: {e}")))?;

    if let Some(expected) = &state.config.google_client_id {
        if info.aud.as_deref() != Some(expected.as_str()) {
            return Ok(ResponseJson(AuthResponse::failed(
                "Token was issued for a different application",
            )));
        }
    }

    let name = info.name.unwrap_or_else(|| info.email.clone());
    let user = User::upsert_google(
        &state.db.pool,
        &info.sub,
        &name,
        &info.email,
        info.picture.as_deref(),
    )
    .await?;

    let jwt = issue_jwt(&state, &user)?;
    Ok(ResponseJson(AuthResponse::ok(jwt, UserInfo::from(&user))))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<ResponseJson<AuthResponse>, ApiError> {
    let username = payload.username.trim();
    let email = payload.email.trim();
    if username.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Ok(ResponseJson(AuthResponse::failed(
            "Username, email and password are required",
        )));
    }

    if User::find_by_username(&state.db.pool, username).await?.is_some() {
        return Ok(ResponseJson(AuthResponse::failed("Username already taken")));
    }
    if User::find_by_email(&state.db.pool, email).await?.is_some() {
        return Ok(ResponseJson(AuthResponse::failed("Email already registered")));
    }

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(username);
    let password_hash = hash_password(&payload.password);
    let user = User::create_local(&state.db.pool, username, email, &password_hash, name).await?;

    let jwt = issue_jwt(&state, &user)?;
    Ok(ResponseJson(AuthResponse::ok(jwt, UserInfo::from(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<AuthResponse>, ApiError> {
    let Some(user) = User::find_by_username(&state.db.pool, payload.username.trim()).await? else {
        return Ok(ResponseJson(AuthResponse::failed(
            "Invalid username or password",
        )));
    };

    let matches = user
        .password_hash
        .as_deref()
        .is_some_and(|stored| stored == hash_password(&payload.password));
    if !matches {
        return Ok(ResponseJson(AuthResponse::failed(
            "Invalid username or password",
        )));
    }

    let jwt = issue_jwt(&state, &user)?;
    Ok(ResponseJson(AuthResponse::ok(jwt, UserInfo::from(&user))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/google", post(google_auth))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_stable_hex_sha256() {
        let hash = hash_password("hunter2");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_password("hunter2"));
        assert_ne!(hash, hash_password("hunter3"));
    }

    #[test]
    fn failed_response_has_no_token() {
        let response = AuthResponse::failed("nope");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("jwt").is_none());
        assert!(json.get("user").is_none());
        assert_eq!(json["message"], "nope");
    }
}
