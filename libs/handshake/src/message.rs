use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Payload exchanged between the auth callback page and its opener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthMessage {
    #[serde(rename = "AUTH_SUCCESS")]
    Success(AuthSuccess),
    #[serde(rename = "AUTH_ERROR")]
    Error(AuthFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSuccess {
    pub jwt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: AuthUser,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthFailure {
    pub error: String,
}

fn null_as_default<'de, D>(deserializer: D) -> Result<AuthUser, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<AuthUser>::deserialize(deserializer)?.unwrap_or_default())
}

impl AuthMessage {
    pub fn success(jwt: impl Into<String>, user: AuthUser) -> Self {
        AuthMessage::Success(AuthSuccess {
            jwt: jwt.into(),
            user,
        })
    }

    pub fn unauthorized() -> Self {
        AuthMessage::Error(AuthFailure {
            error: "Unauthorized".to_string(),
        })
    }

    /// Validates an untyped payload. Anything that is not an object with a
    /// known `type` and correctly typed fields yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        AuthMessage::deserialize(value).ok()
    }
}
