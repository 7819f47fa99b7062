/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 19/10/2026
License: MIT

Notes: Request surface of the RPF frame-cache server. Each request is served
from the calling client's own cache. Failures are logged and answered with an
empty result so one client cannot disturb the others; running out of memory
flushes every client's cache.
*/
use super::client_cache::FrameCache;
use super::clock::{Clock, SystemClock};
use super::config::ServerConfig;
use super::session::ClientCacheTable;
use super::source::{CoverageBox, FrameSource, RawImage, SubframeKey};
use super::sweeper::IdleSweeper;
use super::view_attributes::ViewAttributes;
use super::FrameError;
use crate::structures::LatLonPoint;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

pub struct FrameCacheServer<S: FrameSource> {
    config: ServerConfig,
    table: Arc<ClientCacheTable<FrameCache<S>>>,
    sweeper: Mutex<Option<IdleSweeper>>,
}

impl<S: FrameSource> FrameCacheServer<S> {
    /// Opens the frame source from `config.data_paths`. Without a usable
    /// source the server still runs, but every request gets an empty answer.
    pub fn new(config: ServerConfig) -> FrameCacheServer<S> {
        let source = if config.data_paths.is_empty() {
            warn!("no RPF data paths configured");
            None
        } else {
            match S::open(&config.data_paths) {
                Ok(source) => Some(Arc::new(source)),
                Err(e) => {
                    warn!(paths = ?config.data_paths, "could not open RPF data: {}", e);
                    None
                }
            }
        };
        FrameCacheServer::with_source(config, source, Arc::new(SystemClock))
    }

    pub fn with_source(config: ServerConfig, source: Option<Arc<S>>, clock: Arc<dyn Clock>) -> FrameCacheServer<S> {
        let capacity = config.subframe_cache_size;
        let factory = Box::new(move || source.as_ref().map(|s| FrameCache::new(s.clone(), capacity)));
        let table = Arc::new(ClientCacheTable::new(config.max_users, factory, clock));
        let sweeper = IdleSweeper::start(
            table.clone(),
            config.time_window_ms,
            Duration::from_millis(config.sweep_interval_ms),
        );
        info!(
            max_users = config.max_users,
            time_window_ms = config.time_window_ms,
            "frame cache server started"
        );
        FrameCacheServer {
            config: config,
            table: table,
            sweeper: Mutex::new(sweeper),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn num_clients(&self) -> usize {
        self.table.len()
    }

    /// The client table, shared with the idle sweeper.
    pub fn clients(&self) -> &Arc<ClientCacheTable<FrameCache<S>>> {
        &self.table
    }

    /// Current idle window; zero when the sweep is disabled.
    pub fn time_window_ms(&self) -> u64 {
        self.sweeper
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map_or(0, |s| s.time_window_ms())
    }

    /// Restarts the idle sweep with a new window. Zero stops it.
    pub fn set_time_window(&self, time_window_ms: u64) {
        let mut sweeper = self.sweeper.lock().unwrap_or_else(|e| e.into_inner());
        // the old thread is joined before the new one starts
        *sweeper = None;
        *sweeper = IdleSweeper::start(
            self.table.clone(),
            time_window_ms,
            Duration::from_millis(self.config.sweep_interval_ms),
        );
        info!(time_window_ms = time_window_ms, "idle window changed");
    }

    fn serve<T, F>(&self, client_id: &str, request: &str, sentinel: T, f: F) -> T
    where
        F: FnOnce(&mut FrameCache<S>, &ViewAttributes) -> Result<T, FrameError>,
    {
        let (cache, view) = self.table.get_current_session(client_id);
        let result = match cache {
            Some(cache) => {
                let mut cache = cache.lock().unwrap_or_else(|e| e.into_inner());
                f(&mut cache, &view)
            }
            None => Err(FrameError::NoSource),
        };
        match result {
            Ok(value) => value,
            Err(FrameError::OutOfMemory) => {
                warn!(client = client_id, request = request, "out of memory");
                self.table.handle_memory_shortage();
                sentinel
            }
            Err(e) => {
                warn!(client = client_id, request = request, "{}", e);
                sentinel
            }
        }
    }

    pub fn get_coverage(
        &self,
        client_id: &str,
        upper_left: &LatLonPoint,
        lower_right: &LatLonPoint,
        scale: f32,
    ) -> Vec<CoverageBox> {
        self.serve(client_id, "coverage", vec![], |cache, view| {
            cache.coverage(upper_left, lower_right, scale, view)
        })
    }

    /// JPEG-compressed subframe, or an empty buffer.
    pub fn get_subframe_data(&self, client_id: &str, key: &SubframeKey, jpeg_quality: f32) -> Vec<u8> {
        self.serve(client_id, "subframe", vec![], |cache, view| {
            cache.compressed_subframe(key, view, jpeg_quality)
        })
    }

    pub fn get_raw_subframe_data(&self, client_id: &str, key: &SubframeKey) -> RawImage {
        self.serve(client_id, "raw subframe", RawImage::default(), |cache, view| {
            cache.subframe(key, view)
        })
    }

    pub fn get_subframe_attributes(&self, client_id: &str, key: &SubframeKey) -> String {
        self.serve(client_id, "subframe attributes", String::new(), |cache, _| {
            cache.subframe_attributes(key)
        })
    }

    /// Stores new view attributes. Subframes decoded under the old ones are
    /// dropped.
    pub fn set_view_attributes(&self, client_id: &str, view_attributes: ViewAttributes) {
        self.table.set_view_attributes(client_id, view_attributes);
        if let Some(cache) = self.table.get_current_cache(client_id) {
            cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
        }
    }

    pub fn signoff(&self, client_id: &str) {
        self.table.signoff(client_id);
    }
}

#[cfg(test)]
mod test {
    use super::FrameCacheServer;
    use crate::frame_cache::clock::ManualClock;
    use crate::frame_cache::source::{RawImage, SubframeKey};
    use crate::frame_cache::test_source::MockSource;
    use crate::frame_cache::{ServerConfig, ViewAttributes};
    use crate::structures::LatLonPoint;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn config() -> ServerConfig {
        ServerConfig {
            data_paths: vec!["/data/rpf".to_string()],
            max_users: 3,
            time_window_ms: 0,
            ..Default::default()
        }
    }

    fn server() -> (FrameCacheServer<MockSource>, Arc<MockSource>, Arc<ManualClock>) {
        let source = Arc::new(MockSource::default());
        let clock = Arc::new(ManualClock::new(0));
        let server = FrameCacheServer::with_source(config(), Some(source.clone()), clock.clone());
        (server, source, clock)
    }

    #[test]
    fn test_requests_served_per_client() {
        let (server, source, _) = server();
        let key = SubframeKey::new(0, 1, 2, 3);
        let jpeg = server.get_subframe_data("a", &key, 0.8);
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let raw = server.get_raw_subframe_data("a", &key);
        assert_eq!(raw.image_data, vec![2u8; 16]);
        // second request was a cache hit
        assert_eq!(source.decodes.load(Ordering::SeqCst), 1);
        // another client has its own cache
        server.get_raw_subframe_data("b", &key);
        assert_eq!(source.decodes.load(Ordering::SeqCst), 2);
        assert_eq!(server.get_subframe_attributes("a", &key), "toc 0 entry 1");
        assert_eq!(server.num_clients(), 2);
    }

    #[test]
    fn test_failures_become_sentinels() {
        let (server, source, _) = server();
        let bad = SubframeKey::new(0, 0, 7, 0);
        assert!(server.get_subframe_data("a", &bad, 0.8).is_empty());
        assert_eq!(server.get_raw_subframe_data("a", &bad), RawImage::default());
        assert_eq!(server.get_subframe_attributes("a", &bad), "");

        source.fail_encode.store(true, Ordering::SeqCst);
        assert!(server.get_subframe_data("a", &SubframeKey::new(0, 0, 1, 1), 0.8).is_empty());
        // the client keeps its cache
        assert_eq!(server.num_clients(), 1);
    }

    #[test]
    fn test_no_source() {
        let clock = Arc::new(ManualClock::new(0));
        let server: FrameCacheServer<MockSource> = FrameCacheServer::with_source(config(), None, clock);
        let ul = LatLonPoint::new(1.0, 1.0);
        assert!(server.get_coverage("a", &ul, &ul, 1.0).is_empty());
        assert!(server.get_raw_subframe_data("a", &SubframeKey::new(0, 0, 0, 0)).is_empty());

        let missing = ServerConfig {
            data_paths: vec!["/missing".to_string()],
            ..config()
        };
        let server: FrameCacheServer<MockSource> = FrameCacheServer::new(missing);
        assert!(server.get_subframe_data("a", &SubframeKey::new(0, 0, 0, 0), 0.5).is_empty());
    }

    #[test]
    fn test_out_of_memory_flushes_all_clients() {
        let (server, source, _) = server();
        let key = SubframeKey::new(0, 0, 1, 1);
        server.get_raw_subframe_data("a", &key);
        server.get_raw_subframe_data("b", &key);
        assert_eq!(server.num_clients(), 2);

        source.out_of_memory.store(true, Ordering::SeqCst);
        assert!(server.get_raw_subframe_data("c", &SubframeKey::new(0, 0, 2, 2)).is_empty());
        assert_eq!(server.num_clients(), 0);

        // a's cached subframe is gone, so it is decoded again
        source.out_of_memory.store(false, Ordering::SeqCst);
        let before = source.decodes.load(Ordering::SeqCst);
        server.get_raw_subframe_data("a", &key);
        assert_eq!(source.decodes.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn test_population_bound_through_requests() {
        let (server, _, clock) = server();
        let ul = LatLonPoint::new(1.0, 1.0);
        for id in &["a", "b", "c", "d"] {
            clock.advance(1);
            server.get_coverage(id, &ul, &ul, 1.0);
        }
        assert_eq!(server.num_clients(), 3);
        assert!(!server.clients().contains("a"));
    }

    #[test]
    fn test_view_attributes_reset_cache() {
        let (server, source, _) = server();
        let key = SubframeKey::new(0, 0, 1, 1);
        assert_eq!(server.get_raw_subframe_data("a", &key).colortable.len(), 216);
        server.set_view_attributes(
            "a",
            ViewAttributes {
                number_of_colors: 32,
                ..Default::default()
            },
        );
        assert_eq!(server.get_raw_subframe_data("a", &key).colortable.len(), 32);
        assert_eq!(source.decodes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_signoff_and_time_window() {
        let (server, _, _) = server();
        let key = SubframeKey::new(0, 0, 1, 1);
        server.get_raw_subframe_data("a", &key);
        server.signoff("a");
        assert_eq!(server.num_clients(), 0);

        assert_eq!(server.time_window_ms(), 0);
        server.set_time_window(60_000);
        assert_eq!(server.time_window_ms(), 60_000);
        server.set_time_window(0);
        assert_eq!(server.time_window_ms(), 0);
    }
}
