// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{self, AuthClient};
use crate::config::Settings;
use crate::store::{RecordStore, keys};
use anyhow::Result;
use chrono::Utc;

pub fn handle<S: RecordStore + ?Sized>(
    store: &S,
    settings: &Settings,
    m: &clap::ArgMatches,
) -> Result<()> {
    let now = Utc::now().timestamp();
    match m.subcommand() {
        Some(("signup", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let client = AuthClient::from_settings(settings)?;
            match client.sign_up(email, password, now)? {
                Some(session) => {
                    auth::save_session(store, &session)?;
                    println!("Account created; signed in as {}", session.email);
                }
                None => println!("Account created; check {} to confirm it", email.trim()),
            }
        }
        Some(("login", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let client = AuthClient::from_settings(settings)?;
            let session = client.sign_in(email, password, now)?;
            auth::save_session(store, &session)?;
            println!("Signed in as {}", session.email);
        }
        Some(("logout", _)) => {
            if let Some(session) = auth::current_session(store)? {
                if let Ok(client) = AuthClient::from_settings(settings) {
                    if let Err(err) = client.sign_out(&session) {
                        tracing::warn!(%err, "remote sign-out failed; clearing local session");
                    }
                }
            }
            auth::clear_session(store)?;
            println!("Signed out");
        }
        Some(("status", _)) => {
            if auth::is_signed_in(store, now)? {
                let who = auth::display_identity(store)?.unwrap_or_default();
                println!("Signed in as {}", who);
            } else {
                println!("Not signed in");
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn set_username<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let name = m.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        store.remove(keys::USERNAME)?;
        println!("Display name cleared");
    } else {
        store.save(keys::USERNAME, name)?;
        println!("Display name set to {}", name);
    }
    Ok(())
}
