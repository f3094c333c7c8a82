// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session identity from a hosted identity provider.
//!
//! Only two facts cross into the rest of the crate: whether a valid session
//! exists and which identity string to show.

use crate::config::Settings;
use crate::store::{RecordStore, keys};
use crate::utils::http_client;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("An account with this email already exists")]
    AlreadyRegistered,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Password must be at least 6 characters long")]
    WeakPassword,
    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),
    #[error("Authentication is not configured; set PLANIFY_AUTH_URL and PLANIFY_AUTH_KEY")]
    NotConfigured,
    #[error("{0}")]
    Provider(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Maps the provider's two well-known failure messages to friendly ones;
/// anything else passes through verbatim.
pub fn normalize_provider_message(message: &str) -> AuthError {
    match message.trim() {
        "User already registered" => AuthError::AlreadyRegistered,
        "Invalid login credentials" => AuthError::InvalidCredentials,
        other => AuthError::Provider(other.to_string()),
    }
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(AuthError::InvalidEmail(email.trim().to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub email: String,
    /// Unix seconds.
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn is_valid(&self, now_secs: i64) -> bool {
        !self.access_token.is_empty() && self.expires_at.is_none_or(|t| t > now_secs)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ProviderError {
    fn into_message(self, status: StatusCode) -> String {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| format!("Authentication failed ({})", status))
    }
}

pub struct AuthClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match (&settings.auth_url, &settings.auth_key) {
            (Some(url), Some(key)) => Self::new(url, key),
            _ => Err(AuthError::NotConfigured.into()),
        }
    }

    fn post(&self, path: &str, bearer: &str, body: serde_json::Value) -> Result<reqwest::blocking::Response, AuthError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .json(&body)
            .send()?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let err: ProviderError = resp.json().unwrap_or_default();
        let message = err.into_message(status);
        warn!(%status, %message, path, "auth request rejected");
        Err(normalize_provider_message(&message))
    }

    /// Registers a new account. Providers that require email confirmation
    /// return no session; `Ok(None)` in that case.
    pub fn sign_up(&self, email: &str, password: &str, now_secs: i64) -> Result<Option<Session>, AuthError> {
        validate_email(email)?;
        validate_password(password)?;
        let resp = self.post(
            "/auth/v1/signup",
            &self.api_key,
            json!({ "email": email.trim(), "password": password }),
        )?;
        let value: serde_json::Value = resp.json()?;
        if value.get("access_token").is_none() {
            info!(email = email.trim(), "signed up; confirmation pending");
            return Ok(None);
        }
        let token: TokenResponse =
            serde_json::from_value(value).map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(Some(session_from(token, email, now_secs)))
    }

    pub fn sign_in(&self, email: &str, password: &str, now_secs: i64) -> Result<Session, AuthError> {
        let resp = self.post(
            "/auth/v1/token?grant_type=password",
            &self.api_key,
            json!({ "email": email.trim(), "password": password }),
        )?;
        let token: TokenResponse = resp.json()?;
        info!(email = email.trim(), "signed in");
        Ok(session_from(token, email, now_secs))
    }

    pub fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        self.post("/auth/v1/logout", &session.access_token, json!({}))?;
        Ok(())
    }
}

fn session_from(token: TokenResponse, email: &str, now_secs: i64) -> Session {
    let expires_at = token
        .expires_at
        .or_else(|| token.expires_in.map(|s| now_secs + s));
    Session {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        email: token
            .user
            .and_then(|u| u.email)
            .unwrap_or_else(|| email.trim().to_string()),
        expires_at,
    }
}

pub fn current_session<S: RecordStore + ?Sized>(store: &S) -> Result<Option<Session>> {
    let Some(raw) = store.load(keys::SESSION)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(s) => Ok(Some(s)),
        Err(err) => {
            warn!(%err, "discarding corrupt session");
            store.remove(keys::SESSION)?;
            Ok(None)
        }
    }
}

pub fn save_session<S: RecordStore + ?Sized>(store: &S, session: &Session) -> Result<()> {
    store.save(
        keys::SESSION,
        &serde_json::to_string(session).context("Serialize session")?,
    )
}

pub fn clear_session<S: RecordStore + ?Sized>(store: &S) -> Result<()> {
    store.remove(keys::SESSION)
}

pub fn is_signed_in<S: RecordStore + ?Sized>(store: &S, now_secs: i64) -> Result<bool> {
    Ok(current_session(store)?.is_some_and(|s| s.is_valid(now_secs)))
}

/// The chosen username if one is set, else the signed-in email.
pub fn display_identity<S: RecordStore + ?Sized>(store: &S) -> Result<Option<String>> {
    if let Some(name) = store.load(keys::USERNAME)?.filter(|n| !n.trim().is_empty()) {
        return Ok(Some(name.trim().to_string()));
    }
    Ok(current_session(store)?.map(|s| s.email))
}
