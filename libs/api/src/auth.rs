use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{self, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use hkdf::Hkdf;
use josekit::{jwe::Dir, jwt};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use tracing::debug;

use crate::{ApiError, ApiState, AuthConfig};

const SESSION_COOKIE: &str = "authjs.session-token";
const SECURE_SESSION_COOKIE: &str = "__Secure-authjs.session-token";

const ENCRYPTION_INFO: &str = "Auth.js Generated Encryption Key";
/// Seconds of `exp` leeway, as the auth framework allows when decoding.
const CLOCK_TOLERANCE: i64 = 15;

/// Claims issued by the auth framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub exp: usize,
}

/// A verified session: the token as received plus its decoded claims.
#[derive(Debug, Clone)]
pub struct Session {
    pub raw: String,
    pub claims: Claims,
}

impl AuthConfig {
    fn cookie_name(&self) -> &'static str {
        if self.secure_cookie {
            SECURE_SESSION_COOKIE
        } else {
            SESSION_COOKIE
        }
    }

    /// Session tokens issued by the auth framework are compact JWEs; a
    /// three-part token is taken as an HS256 JWS.
    fn verify(&self, token: &str) -> Option<Claims> {
        match token.split('.').count() {
            5 => self.decrypt(token),
            _ => self.verify_signed(token),
        }
    }

    fn decrypt(&self, token: &str) -> Option<Claims> {
        let key = encryption_key(&self.secret, self.cookie_name())?;

        let decoded = Dir
            .decrypter_from_bytes(key)
            .and_then(|decrypter| jwt::decode_with_decrypter(token, &decrypter));
        let payload = match decoded {
            Ok((payload, _header)) => payload,
            Err(e) => {
                debug!("rejected encrypted session token: {}", e);
                return None;
            }
        };

        let claims: Claims =
            match serde_json::from_value(Value::Object(payload.claims_set().clone()))
            {
                Ok(claims) => claims,
                Err(e) => {
                    debug!("session token has unexpected claims: {}", e);
                    return None;
                }
            };

        let exp = i64::try_from(claims.exp).ok()?;
        if exp + CLOCK_TOLERANCE <= chrono::Utc::now().timestamp() {
            debug!(sub = ?claims.sub, "session token expired");
            return None;
        }

        Some(claims)
    }

    fn verify_signed(&self, token: &str) -> Option<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        match decode::<Claims>(token, &key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("rejected session token: {}", e);
                None
            }
        }
    }
}

/// A256CBC-HS512 key the auth framework derives from its secret, salted
/// with the session cookie name.
pub(crate) fn encryption_key(secret: &str, salt: &str) -> Option<[u8; 64]> {
    let hkdf = Hkdf::<Sha256>::new(Some(salt.as_bytes()), secret.as_bytes());
    let mut key = [0u8; 64];
    hkdf.expand(format!("{ENCRYPTION_INFO} ({salt})").as_bytes(), &mut key)
        .ok()?;

    Some(key)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// The session cookie, reassembled when it was split into `name.0`,
/// `name.1`, ... chunks.
fn cookie_token(headers: &HeaderMap, name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);

    if let Some(cookie) = jar.get(name) {
        return Some(cookie.value().to_string());
    }

    let chunks: Vec<_> = (0..)
        .map_while(|i| jar.get(&format!("{name}.{i}")))
        .map(|cookie| cookie.value().to_string())
        .collect();

    (!chunks.is_empty()).then(|| chunks.concat())
}

/// Verifies the session carried by `headers`, from the session cookie or
/// else the `Authorization` bearer token.
pub fn authenticate(config: &AuthConfig, headers: &HeaderMap) -> Option<Session> {
    let raw = cookie_token(headers, config.cookie_name())
        .or_else(|| bearer_token(headers))?;
    let claims = config.verify(&raw)?;

    Some(Session { raw, claims })
}

/// Lets the request through only for admins. A missing or invalid session
/// is 401, a valid one outside the allow-list is 403.
pub async fn require_admin(
    State(state): State<Arc<ApiState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(session) = authenticate(&state.config.auth, req.headers()) else {
        return Err(ApiError::AuthError("Unauthorized".to_string()));
    };

    if !state.config.auth.is_admin(session.claims.email.as_deref()) {
        debug!(sub = ?session.claims.sub, "non-admin session refused");
        return Err(ApiError::ForbiddenError("Forbidden".to_string()));
    }

    req.extensions_mut().insert(session.claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod test {
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::*;
    use crate::test_support::{config, session_token, token, ADMIN, SECRET};

    /// Session cookie for ADMIN encrypted outside this crate the way the
    /// auth framework does it, with `AUTH_SECRET = "test-secret"` and an
    /// `exp` in 2100.
    const ISSUED_SESSION: &str = "eyJhbGciOiJkaXIiLCJlbmMiOiJBMjU2Q0JDLUhTNTEyIiwia2lkIjoidHN1a2ltYXJ1LWZpeHR1cmUifQ..AAECAwQFBgcICQoLDA0ODw.j7sjGBsu3vqferqjO-OngaJpv3u5qLgskWY_T5wFuovjsOThuY4vK13LoeDE5IBC1VmDIKgcrR8WSWhM22VWaCO2e0ehs7Gv8iUVZcPwCu211VZNyItyQ9EJ4VQ3oltuhzxXqoXSH9d_fciADr1qmLX_AczWAZZmzziPMMDHt5v218CfTUj6xzP6GGYJguoQ.Aqj4jE-rgsSckcys3E560MUfrzaaL6LI0e4H0V0UEsc";

    fn headers(name: http::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_bearer() {
        let config = config();
        let raw = token(ADMIN);

        let session = authenticate(
            &config.auth,
            &headers(http::header::AUTHORIZATION, &format!("Bearer {raw}")),
        )
        .unwrap();

        assert_eq!(session.raw, raw);
        assert_eq!(session.claims.email.as_deref(), Some(ADMIN));
        assert_eq!(session.claims.sub.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_authenticate_cookie_and_chunks() {
        let config = config();
        let raw = token(ADMIN);

        let whole = headers(
            http::header::COOKIE,
            &format!("theme=dark; authjs.session-token={raw}"),
        );
        assert!(authenticate(&config.auth, &whole).is_some());

        let (head, tail) = raw.split_at(raw.len() / 2);
        let chunked = headers(
            http::header::COOKIE,
            &format!(
                "authjs.session-token.0={head}; authjs.session-token.1={tail}"
            ),
        );
        assert_eq!(authenticate(&config.auth, &chunked).unwrap().raw, raw);

        let secure_name = headers(
            http::header::COOKIE,
            &format!("__Secure-authjs.session-token={raw}"),
        );
        assert!(authenticate(&config.auth, &secure_name).is_none());
    }

    #[test]
    fn test_authenticate_rejects_bad_tokens() {
        let config = config();
        let forged = encode(
            &Header::default(),
            &json!({"email": ADMIN, "exp": chrono::Utc::now().timestamp() + 60}),
            &EncodingKey::from_secret(b"another-secret"),
        )
        .unwrap();
        let expired = encode(
            &Header::default(),
            &json!({"email": ADMIN, "exp": 1_000_000_000}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        for raw in [forged, expired, "not-a-jwt".to_string()] {
            let headers = headers(
                http::header::AUTHORIZATION,
                &format!("Bearer {raw}"),
            );
            assert!(authenticate(&config.auth, &headers).is_none());
        }
        assert!(authenticate(&config.auth, &HeaderMap::new()).is_none());
    }

    #[test]
    fn test_encryption_key_derivation() {
        let key = encryption_key(SECRET, "authjs.session-token").unwrap();

        let hex: String = key.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "6d5bdbc76176d481ebca315e456c6c942c864e4346d78c6e49db4d8eca7aaefd\
             d68fd9a47eea1cb70c322d6664192987fc893c0524834d6aabd6252bebde01c6"
        );
    }

    #[test]
    fn test_authenticate_issued_session_cookie() {
        let config = config();

        let session = authenticate(
            &config.auth,
            &headers(
                http::header::COOKIE,
                &format!("authjs.session-token={ISSUED_SESSION}"),
            ),
        )
        .unwrap();

        assert_eq!(session.raw, ISSUED_SESSION);
        assert_eq!(session.claims.email.as_deref(), Some(ADMIN));
        assert_eq!(session.claims.sub.as_deref(), Some("user-1"));
        assert_eq!(session.claims.name.as_deref(), Some("月丸"));

        let bearer = headers(
            http::header::AUTHORIZATION,
            &format!("Bearer {ISSUED_SESSION}"),
        );
        assert!(authenticate(&config.auth, &bearer).is_some());
    }

    #[test]
    fn test_authenticate_rejects_bad_encrypted_tokens() {
        let config = config();
        let other_secret =
            AuthConfig::new("another-secret".into(), None, ADMIN).unwrap();
        let secure = AuthConfig::new(
            SECRET.into(),
            Some("https://tsukimaru.jp"),
            ADMIN,
        )
        .unwrap();
        let cookie = |name: &str, raw: &str| {
            headers(http::header::COOKIE, &format!("{name}={raw}"))
        };

        // wrong secret, and a key salted for the other cookie name
        assert!(authenticate(
            &other_secret,
            &cookie("authjs.session-token", ISSUED_SESSION)
        )
        .is_none());
        assert!(authenticate(
            &secure,
            &cookie("__Secure-authjs.session-token", ISSUED_SESSION)
        )
        .is_none());

        let expired = session_token(
            "authjs.session-token",
            json!({"email": ADMIN, "exp": chrono::Utc::now().timestamp() - 60}),
        );
        assert!(authenticate(
            &config.auth,
            &cookie("authjs.session-token", &expired)
        )
        .is_none());

        let mut tampered = ISSUED_SESSION.to_string();
        tampered.pop();
        tampered.push('A');
        assert!(authenticate(
            &config.auth,
            &cookie("authjs.session-token", &tampered)
        )
        .is_none());
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let config = config();
        let mut both = headers(
            http::header::COOKIE,
            &format!("authjs.session-token={ISSUED_SESSION}"),
        );
        both.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token("x@example.com")))
                .unwrap(),
        );

        let session = authenticate(&config.auth, &both).unwrap();

        assert_eq!(session.claims.email.as_deref(), Some(ADMIN));
    }
}
