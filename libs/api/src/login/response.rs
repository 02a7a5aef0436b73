use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Claims;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResp {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl From<Claims> for UserResp {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TokenResp {
    pub jwt: String,
    pub user: UserResp,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResp {
    pub authenticated: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResp>,
}
