//! Caller identity taken from gateway headers.

use std::{fmt, str::FromStr};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::error::ApiError;

/// Header carrying the authenticated username.
pub const USERNAME_HEADER: &str = "x-username";

/// Header carrying the authenticated user's role.
pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Tourist,
    Guide,
    Admin,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tourist" => Ok(Role::Tourist),
            "guide" => Ok(Role::Guide),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Tourist => "tourist",
            Role::Guide => "guide",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// The authenticated caller. Extraction fails with 401 when either header
/// is missing or the role is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub username: String,
    pub role: Role,
}

impl Caller {
    /// Fails with 403 unless the caller has `role`.
    pub fn require(&self, role: Role) -> Result<&str, ApiError> {
        if self.role == role {
            Ok(&self.username)
        } else {
            Err(ApiError::forbidden(format!(
                "{role} role required, caller is {}",
                self.role
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let username = header(USERNAME_HEADER)
            .ok_or_else(|| ApiError::unauthenticated("missing x-username header"))?
            .to_string();
        let role = header(ROLE_HEADER)
            .ok_or_else(|| ApiError::unauthenticated("missing x-user-role header"))?
            .parse::<Role>()
            .map_err(ApiError::unauthenticated)?;

        Ok(Self { username, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Guide".parse::<Role>().unwrap(), Role::Guide);
        assert_eq!("tourist".parse::<Role>().unwrap(), Role::Tourist);
        assert!("visitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_require_role() {
        let caller = Caller {
            username: "ana".to_string(),
            role: Role::Tourist,
        };
        assert_eq!(caller.require(Role::Tourist).unwrap(), "ana");
        assert_eq!(
            caller.require(Role::Guide).unwrap_err().status(),
            axum::http::StatusCode::FORBIDDEN
        );
    }
}
