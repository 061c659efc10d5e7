//! User model, permissions and JWT claims

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Named permissions a staff account may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Set book as returned
    CanMarkReturned,
    ChangeBookinstance,
    AddAuthor,
    ChangeAuthor,
    DeleteAuthor,
}

impl Permission {
    pub fn codename(&self) -> &'static str {
        match self {
            Permission::CanMarkReturned => "can_mark_returned",
            Permission::ChangeBookinstance => "change_bookinstance",
            Permission::AddAuthor => "add_author",
            Permission::ChangeAuthor => "change_author",
            Permission::DeleteAuthor => "delete_author",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            Permission::CanMarkReturned => "Set book as returned",
            Permission::ChangeBookinstance => "Can change book instance",
            Permission::AddAuthor => "Can add author",
            Permission::ChangeAuthor => "Can change author",
            Permission::DeleteAuthor => "Can delete author",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.codename())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "can_mark_returned" => Ok(Permission::CanMarkReturned),
            "change_bookinstance" => Ok(Permission::ChangeBookinstance),
            "add_author" => Ok(Permission::AddAuthor),
            "change_author" => Ok(Permission::ChangeAuthor),
            "delete_author" => Ok(Permission::DeleteAuthor),
            _ => Err(format!("Unknown permission: {}", s)),
        }
    }
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    id: i32,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    permissions: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let permissions = row
            .permissions
            .iter()
            .filter_map(|p| match p.parse() {
                Ok(permission) => Some(permission),
                Err(e) => {
                    tracing::warn!("Ignoring permission of user {}: {}", row.id, e);
                    None
                }
            })
            .collect();
        User {
            id: row.id,
            username: row.username,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            permissions,
        }
    }
}

/// Full user model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub permissions: Vec<Permission>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub permissions: Vec<Permission>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    // Authorization checks
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission required: {} ({})",
                permission.label(),
                permission.codename()
            )))
        }
    }

    /// Pass if the caller holds at least one of `permissions`
    pub fn require_any(&self, permissions: &[Permission]) -> Result<(), AppError> {
        if permissions.iter().any(|p| self.has_permission(*p)) {
            Ok(())
        } else {
            let names: Vec<&str> = permissions.iter().map(|p| p.codename()).collect();
            Err(AppError::Authorization(format!(
                "One of these permissions is required: {}",
                names.join(", ")
            )))
        }
    }
}
