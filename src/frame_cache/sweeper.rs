/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::session::ClientCacheTable;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Shortest pause between sweeps; a zero interval would spin on the table lock.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Background thread running the idle sweep at a fixed interval. The
/// thread is stopped and joined when the sweeper is dropped.
pub struct IdleSweeper {
    time_window_ms: u64,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl IdleSweeper {
    /// Starts sweeping `table`. Returns `None` when `time_window_ms` is zero,
    /// which disables the sweep rather than evicting everyone. Intervals
    /// below one millisecond are raised to one.
    pub fn start<C: Send + 'static>(
        table: Arc<ClientCacheTable<C>>,
        time_window_ms: u64,
        interval: Duration,
    ) -> Option<IdleSweeper> {
        if time_window_ms == 0 {
            return None;
        }
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let removed = table.clean_cache(time_window_ms);
                    debug!(removed = removed.len(), "idle sweep ran");
                }
                // stop requested or sender dropped
                _ => break,
            }
        });
        Some(IdleSweeper {
            time_window_ms: time_window_ms,
            stop: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn time_window_ms(&self) -> u64 {
        self.time_window_ms
    }
}

impl Drop for IdleSweeper {
    fn drop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod test {
    use super::IdleSweeper;
    use crate::frame_cache::clock::ManualClock;
    use crate::frame_cache::session::ClientCacheTable;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn table(clock: Arc<ManualClock>) -> Arc<ClientCacheTable<u8>> {
        Arc::new(ClientCacheTable::new(10, Box::new(|| Some(0u8)), clock))
    }

    #[test]
    fn test_zero_window_disables() {
        let clock = Arc::new(ManualClock::new(0));
        let t = table(clock);
        assert!(IdleSweeper::start(t, 0, Duration::from_millis(1)).is_none());
    }

    #[test]
    fn test_sweeper_removes_idle_clients() {
        let clock = Arc::new(ManualClock::new(0));
        let t = table(clock.clone());
        t.get_current_cache("idle");
        clock.advance(60_000);
        let sweeper = IdleSweeper::start(t.clone(), 30_000, Duration::from_millis(5)).unwrap();
        assert_eq!(sweeper.time_window_ms(), 30_000);

        let deadline = Instant::now() + Duration::from_secs(5);
        while t.contains("idle") && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!t.contains("idle"));
        drop(sweeper);
    }

    #[test]
    fn test_drop_stops_promptly() {
        let clock = Arc::new(ManualClock::new(0));
        let t = table(clock);
        let sweeper = IdleSweeper::start(t, 1_000, Duration::from_secs(3600)).unwrap();
        let started = Instant::now();
        drop(sweeper);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let clock = Arc::new(ManualClock::new(0));
        let t = table(clock.clone());
        t.get_current_cache("idle");
        clock.advance(2_000);
        let sweeper = IdleSweeper::start(t.clone(), 1_000, Duration::ZERO).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while t.contains("idle") && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!t.contains("idle"));
        let started = Instant::now();
        drop(sweeper);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
