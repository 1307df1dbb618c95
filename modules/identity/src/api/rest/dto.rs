use factura_auth::Identity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::model::{PendingCredential, SellerOfDay};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub display_name: String,
}

impl From<Identity> for UserDto {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            username: identity.username,
            role: identity.role.to_string(),
            display_name: identity.display_name,
        }
    }
}

/// `{ user }` envelope returned by login and `/me`, matching what the
/// frontend consumes.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserDto,
}

/// Serializes to `{}` when no seller account exists yet.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SellerOfDayDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<SellerOfDay> for SellerOfDayDto {
    fn from(seller: SellerOfDay) -> Self {
        Self {
            username: Some(seller.username),
            display_name: Some(seller.display_name),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DisclosedCredentialDto {
    pub username: String,
    pub password: String,
}

impl From<PendingCredential> for DisclosedCredentialDto {
    fn from(credential: PendingCredential) -> Self {
        Self {
            username: credential.username,
            password: credential.password,
        }
    }
}
