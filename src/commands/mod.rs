// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budget;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod habits;
pub mod session;
pub mod todos;
pub mod view;
