// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use planify::auth::{
    self, AuthClient, AuthError, Session, normalize_provider_message, validate_email,
    validate_password,
};
use planify::config::Settings;
use planify::store::{MemoryStore, RecordStore, keys};

fn session(email: &str, expires_at: Option<i64>) -> Session {
    Session {
        access_token: "token".into(),
        refresh_token: None,
        email: email.into(),
        expires_at,
    }
}

#[test]
fn provider_messages_are_normalized() {
    assert_eq!(
        normalize_provider_message("User already registered").to_string(),
        "An account with this email already exists"
    );
    assert_eq!(
        normalize_provider_message("Invalid login credentials").to_string(),
        "Invalid email or password"
    );
    assert_eq!(
        normalize_provider_message("Email rate limit exceeded").to_string(),
        "Email rate limit exceeded"
    );
}

#[test]
fn local_validation() {
    assert!(matches!(validate_password("12345"), Err(AuthError::WeakPassword)));
    assert!(validate_password("123456").is_ok());
    assert!(validate_email(" someone@example.com ").is_ok());
    assert!(matches!(
        validate_email("not-an-email"),
        Err(AuthError::InvalidEmail(_))
    ));
}

#[test]
fn session_validity() {
    assert!(session("a@b.co", None).is_valid(0));
    assert!(session("a@b.co", Some(100)).is_valid(99));
    assert!(!session("a@b.co", Some(100)).is_valid(100));
    let mut empty = session("a@b.co", None);
    empty.access_token.clear();
    assert!(!empty.is_valid(0));
}

#[test]
fn identity_prefers_username_over_email() {
    let store = MemoryStore::new();
    assert_eq!(auth::display_identity(&store).unwrap(), None);
    assert!(!auth::is_signed_in(&store, 0).unwrap());

    auth::save_session(&store, &session("sam@example.com", Some(1_000))).unwrap();
    assert!(auth::is_signed_in(&store, 10).unwrap());
    assert!(!auth::is_signed_in(&store, 2_000).unwrap());
    assert_eq!(
        auth::display_identity(&store).unwrap().as_deref(),
        Some("sam@example.com")
    );

    store.save(keys::USERNAME, "Sam").unwrap();
    assert_eq!(auth::display_identity(&store).unwrap().as_deref(), Some("Sam"));

    auth::clear_session(&store).unwrap();
    assert!(auth::current_session(&store).unwrap().is_none());
}

#[test]
fn corrupt_session_reads_as_signed_out() {
    let store = MemoryStore::new();
    store.save(keys::SESSION, "garbage").unwrap();
    assert!(!auth::is_signed_in(&store, 0).unwrap());
    assert_eq!(store.load(keys::SESSION).unwrap(), None);
}

#[test]
fn client_requires_configuration() {
    let err = AuthClient::from_settings(&Settings::default()).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<AuthError>(),
        Some(AuthError::NotConfigured)
    ));
    let configured = Settings {
        auth_url: Some("https://auth.example".into()),
        auth_key: Some("anon".into()),
        db_path: None,
    };
    assert!(AuthClient::from_settings(&configured).is_ok());
}
