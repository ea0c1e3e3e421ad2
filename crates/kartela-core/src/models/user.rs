use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Staff member identified by a personnel badge (`kullanicilar`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kullanicilar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Personnel code printed on the badge (e.g. `USER-0001`)
    #[sea_orm(unique)]
    pub code: String,

    pub name: String,

    /// Payload of the badge's QR code
    #[sea_orm(unique)]
    pub qr_code: String,

    /// One of `operator`, `supervisor`, `manager`
    pub role: String,

    pub is_active: bool,
    pub is_admin: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn staff_role(&self) -> Role {
        Role::from_db(&self.role)
    }
}

/// Staff roles, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Operator,
    Supervisor,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Supervisor => "supervisor",
            Role::Manager => "manager",
        }
    }

    /// Whether this role satisfies a requirement of `required`.
    pub fn has_permission(&self, required: &Role) -> bool {
        self >= required
    }

    /// Read a stored role, treating unknown values as the least privileged.
    pub fn from_db(value: &str) -> Role {
        value.parse().unwrap_or(Role::Operator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "operator" | "operatör" => Ok(Role::Operator),
            "supervisor" | "sorumlu" => Ok(Role::Supervisor),
            "manager" | "yonetici" | "yönetici" => Ok(Role::Manager),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Public user data (safe to return in API responses).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<Model> for UserResponse {
    fn from(user: Model) -> Self {
        UserResponse {
            id: user.id,
            role: user.staff_role(),
            code: user.code,
            name: user.name,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
