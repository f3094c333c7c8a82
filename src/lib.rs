// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod db;
pub mod models;
pub mod nav;
pub mod reset;
pub mod rollup;
pub mod store;
pub mod utils;
