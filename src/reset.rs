// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Midnight wake-ups for the daily habit reset.
//!
//! A worker thread sleeps until the next local midnight, reports the new
//! date and re-arms. Stopping (or dropping) the handle wakes the worker and
//! joins it.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

pub fn until_next_midnight(now: NaiveDateTime) -> Duration {
    let next = now
        .date()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now);
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

pub struct DailyReset {
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl DailyReset {
    /// Runs `on_new_day` at every local midnight until stopped.
    pub fn start<F>(on_new_day: F) -> Self
    where
        F: FnMut(NaiveDate) + Send + 'static,
    {
        Self::start_with_clock(|| Local::now().naive_local(), on_new_day)
    }

    pub fn start_with_clock<C, F>(clock: C, mut on_new_day: F) -> Self
    where
        C: Fn() -> NaiveDateTime + Send + 'static,
        F: FnMut(NaiveDate) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let worker = thread::spawn(move || {
            loop {
                let wait = until_next_midnight(clock());
                debug!(secs = wait.as_secs(), "daily reset armed");
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        let day = clock().date();
                        info!(%day, "new day");
                        on_new_day(day);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });
        Self {
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for DailyReset {
    fn drop(&mut self) {
        self.shutdown();
    }
}
