// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    Budget,
    Habits,
    Todos,
    Goals,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown section '{0}' (expected dashboard, budget, habits, todos or goals)")]
pub struct NavError(pub String);

impl Section {
    pub const ALL: &'static [Section] = &[
        Section::Dashboard,
        Section::Budget,
        Section::Habits,
        Section::Todos,
        Section::Goals,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Budget => "budget",
            Section::Habits => "habits",
            Section::Todos => "todos",
            Section::Goals => "goals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Budget => "Budget",
            Section::Habits => "Habits",
            Section::Todos => "To-dos",
            Section::Goals => "Goals",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a section id to its view. How the request arrived (tab, swipe,
/// scripted tour step) is irrelevant here.
pub fn navigate_to(section_id: &str) -> Result<Section, NavError> {
    let id = section_id.trim();
    Section::ALL
        .iter()
        .copied()
        .find(|s| s.id().eq_ignore_ascii_case(id))
        .ok_or_else(|| NavError(id.to_string()))
}
