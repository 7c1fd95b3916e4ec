//! Session identity carried in a single cookie.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::Display;
use uuid::Uuid;

pub const COOKIE_NAME: &str = "app_session_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i32,
    pub open_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Resolves and revokes session tokens.
pub trait SessionStore: Send + Sync {
    fn resolve(&self, token: &str) -> Option<SessionUser>;

    /// Returns whether a live session was removed.
    fn revoke(&self, token: &str) -> bool;
}

#[derive(Default)]
pub struct MemorySessions {
    sessions: RwLock<HashMap<String, SessionUser>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `user` and returns its token.
    pub fn issue(&self, user: SessionUser) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().insert(token.clone(), user);
        token
    }
}

impl SessionStore for MemorySessions {
    fn resolve(&self, token: &str) -> Option<SessionUser> {
        self.sessions.read().get(token).cloned()
    }

    fn revoke(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Attributes applied whenever the session cookie is written or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub domain: Option<String>,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            domain: None,
            path: "/".to_string(),
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
        }
    }
}

impl CookiePolicy {
    fn attributes(&self) -> String {
        let mut attrs = format!("Path={}", self.path);
        if let Some(domain) = &self.domain {
            attrs.push_str(&format!("; Domain={domain}"));
        }
        if self.http_only {
            attrs.push_str("; HttpOnly");
        }
        // Browsers reject SameSite=None without Secure.
        if self.secure || self.same_site == SameSite::None {
            attrs.push_str("; Secure");
        }
        attrs.push_str(&format!("; SameSite={}", self.same_site));
        attrs
    }

    /// `Set-Cookie` value that stores `token`.
    pub fn set_cookie(&self, token: &str) -> String {
        format!("{COOKIE_NAME}={token}; {}", self.attributes())
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn clear_cookie(&self) -> String {
        format!("{COOKIE_NAME}=; Max-Age=0; {}", self.attributes())
    }
}

/// Picks the session token out of a `Cookie` request header.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Accounts available to the demo deployment.
pub fn demo_users() -> Vec<SessionUser> {
    vec![
        SessionUser {
            id: 1,
            open_id: "admin-0001".into(),
            name: "Console Admin".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
        },
        SessionUser {
            id: 2,
            open_id: "dealer-0001".into(),
            name: "Sharma Electronics".into(),
            email: "orders@sharma.example.com".into(),
            role: Role::User,
        },
    ]
}
