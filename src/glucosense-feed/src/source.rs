use std::path::PathBuf;

use crate::{FeedClient, FeedRecord, load_snapshot};

/// Where readings come from: the live database or a saved snapshot.
#[derive(Clone)]
pub enum FeedSource {
    Remote(FeedClient),
    File(PathBuf),
}

impl FeedSource {
    pub async fn snapshot(&self) -> anyhow::Result<Vec<FeedRecord>> {
        match self {
            FeedSource::Remote(client) => client.snapshot().await,
            FeedSource::File(path) => load_snapshot(path),
        }
    }

    pub async fn latest(&self, count: usize) -> anyhow::Result<Vec<FeedRecord>> {
        match self {
            FeedSource::Remote(client) => client.latest(count).await,
            FeedSource::File(path) => {
                let mut records = load_snapshot(path)?;
                let skip = records.len().saturating_sub(count);
                records.drain(..skip);
                Ok(records)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FeedSource::Remote(client) => client.endpoint(),
            FeedSource::File(path) => path.display().to_string(),
        }
    }
}
