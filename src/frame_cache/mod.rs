/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT

Notes: A server-side cache of RPF frame data, partitioned by client. The
client population is bounded, idle clients are swept out on a timer and a
memory shortage flushes everything.
*/
pub mod client_cache;
pub mod clock;
pub mod config;
pub mod server;
pub mod session;
pub mod source;
pub mod sweeper;
#[cfg(test)]
mod test_source;
pub mod view_attributes;

pub use self::client_cache::{CacheStats, FrameCache};
pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::config::ServerConfig;
pub use self::server::FrameCacheServer;
pub use self::session::{CacheFactory, ClientCacheTable};
pub use self::source::{CoverageBox, FrameSource, RawImage, SubframeKey};
pub use self::sweeper::IdleSweeper;
pub use self::view_attributes::ViewAttributes;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("No RPF data source is configured.")]
    NoSource,

    #[error("Invalid frame request: {0}")]
    InvalidFrame(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("Out of memory while serving the request.")]
    OutOfMemory,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
