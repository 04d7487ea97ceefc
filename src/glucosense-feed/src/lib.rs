#[macro_use]
extern crate log;

mod client;
pub use client::{FeedClient, FeedConfig};

mod snapshot;
pub use snapshot::{FeedRecord, load_snapshot, parse_snapshot};

mod source;
pub use source::FeedSource;
