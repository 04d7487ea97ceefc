use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use glucosense_algos::{
    HistoryWindow, TimeFormatter, TrendSummary, VitalsReport, history_table,
};
use glucosense_feed::{FeedRecord, FeedSource};
use glucosense_types::{HistoryEntry, HistoryPoint, Sample};
use serde::Serialize;
use tokio::time::Instant;

const STOP_CHECK: Duration = Duration::from_millis(100);

/// Pulls readings from an injected feed and turns them into what the
/// dashboard shows.
pub struct Dashboard {
    feed: FeedSource,
    formatter: TimeFormatter,
    history_size: usize,
}

/// Emitted by [`Dashboard::watch`] whenever new records arrive.
#[derive(Debug, Clone)]
pub struct DashboardUpdate {
    pub current: Option<VitalsReport>,
    pub trend: Vec<HistoryPoint>,
    pub summary: Option<TrendSummary>,
    pub accepted: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExport {
    pub generated_at: String,
    pub source: String,
    pub current: Option<VitalsReport>,
    pub trend: Vec<HistoryPoint>,
    pub summary: Option<TrendSummary>,
}

impl Dashboard {
    pub fn new(feed: FeedSource) -> Self {
        Self {
            feed,
            formatter: TimeFormatter::ist(),
            history_size: HistoryWindow::DEFAULT_CAPACITY,
        }
    }

    pub fn with_formatter(mut self, formatter: TimeFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    /// Report for the newest valid reading, if any.
    pub async fn current(&self) -> anyhow::Result<Option<VitalsReport>> {
        let records = self.feed.snapshot().await?;
        Ok(self.report(&records))
    }

    /// Valid readings newest first, optionally capped.
    pub async fn history(&self, limit: Option<usize>) -> anyhow::Result<Vec<HistoryEntry>> {
        let samples = samples(&self.feed.snapshot().await?);
        let mut entries = history_table(&self.formatter, &samples);
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    pub async fn trend(&self) -> anyhow::Result<HistoryWindow> {
        let records = self.feed.snapshot().await?;
        Ok(self.window(&records))
    }

    pub async fn export(&self) -> anyhow::Result<DashboardExport> {
        let records = self.feed.snapshot().await?;
        let window = self.window(&records);

        Ok(DashboardExport {
            generated_at: self.formatter.render(Utc::now()),
            source: self.feed.describe(),
            current: self.report(&records),
            trend: window.points(),
            summary: window.summary(),
        })
    }

    /// Polls the feed until `running` is cleared.
    ///
    /// The first poll rebuilds the window from the full node; later polls
    /// only fetch the newest children and push the unseen ones. The last
    /// valid report is kept until a newer valid reading arrives. Feed errors
    /// are logged and retried on the next tick.
    pub async fn watch<F>(
        &self,
        interval: Duration,
        running: Arc<AtomicBool>,
        mut on_update: F,
    ) -> anyhow::Result<()>
    where
        F: FnMut(&DashboardUpdate),
    {
        let mut window = HistoryWindow::with_capacity(self.formatter, self.history_size);
        let mut last_key: Option<String> = None;
        let mut current: Option<VitalsReport> = None;

        while running.load(Ordering::SeqCst) {
            let fetched = match last_key {
                None => self.feed.snapshot().await,
                Some(_) => self.feed.latest(self.history_size.max(1)).await,
            };

            match fetched {
                Ok(records) => {
                    let fresh = unseen(&records, last_key.as_deref());
                    if let Some(last) = fresh.last() {
                        let accepted = if last_key.is_none() {
                            window.rebuild(&samples(fresh));
                            window.len()
                        } else {
                            window.extend(fresh.iter().map(|r| &r.sample))
                        };
                        last_key = Some(last.key.clone());
                        if let Some(report) = self.report(fresh) {
                            current = Some(report);
                        }

                        let update = DashboardUpdate {
                            current: current.clone(),
                            trend: window.points(),
                            summary: window.summary(),
                            accepted,
                        };
                        info!(
                            "{} new records, {} charted, window {}/{}",
                            fresh.len(),
                            accepted,
                            window.len(),
                            window.capacity()
                        );
                        on_update(&update);
                    } else {
                        debug!("no new records");
                    }
                }
                Err(error) => error!("feed poll failed: {:#}", error),
            }

            pause(interval, &running).await;
        }

        Ok(())
    }

    fn report(&self, records: &[FeedRecord]) -> Option<VitalsReport> {
        latest_valid(records).map(|s| VitalsReport::from_sample(s, &self.formatter))
    }

    fn window(&self, records: &[FeedRecord]) -> HistoryWindow {
        let mut window = HistoryWindow::with_capacity(self.formatter, self.history_size);
        window.rebuild(&samples(records));
        window
    }
}

/// Sleeps for `interval`, returning early once `running` is cleared.
async fn pause(interval: Duration, running: &AtomicBool) {
    let deadline = Instant::now().checked_add(interval);

    while running.load(Ordering::SeqCst) {
        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => STOP_CHECK,
        };
        if remaining.is_zero() {
            break;
        }
        tokio::time::sleep(remaining.min(STOP_CHECK)).await;
    }
}

fn samples(records: &[FeedRecord]) -> Vec<Sample> {
    records.iter().map(|r| r.sample).collect()
}

fn latest_valid(records: &[FeedRecord]) -> Option<&Sample> {
    records.iter().rev().map(|r| &r.sample).find(|s| s.is_valid())
}

/// Records after `last_key`. When the key has rolled out of the fetched
/// range every record is new.
fn unseen<'a>(records: &'a [FeedRecord], last_key: Option<&str>) -> &'a [FeedRecord] {
    let Some(last_key) = last_key else {
        return records;
    };

    match records.iter().position(|r| r.key == last_key) {
        Some(i) => &records[i + 1..],
        None => records,
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use glucosense_types::GlucoseStatus;

    use super::*;

    fn record(key: &str, glucose: f64) -> FeedRecord {
        FeedRecord {
            key: key.to_owned(),
            sample: Sample::new(Some(1_735_689_600.0), glucose, 72.0, 97.0),
        }
    }

    fn fixture(name: &str, glucose: &[f64]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "glucosense-dashboard-{name}-{}.json",
            std::process::id()
        ));
        write_node(&path, glucose);
        path
    }

    fn write_node(path: &Path, glucose: &[f64]) {
        let node: serde_json::Map<String, serde_json::Value> = glucose
            .iter()
            .enumerate()
            .map(|(i, g)| {
                (
                    format!("-N{i:03}"),
                    serde_json::json!({
                        "timestamp": 1_735_689_600 + i as i64 * 60,
                        "estimated_glucose": g,
                        "heartRate": 80,
                        "spo2": 97,
                    }),
                )
            })
            .collect();
        std::fs::write(path, serde_json::Value::Object(node).to_string()).unwrap();
    }

    fn values(update: &DashboardUpdate) -> Vec<f64> {
        update.trend.iter().map(|p| p.value).collect()
    }

    #[test]
    fn latest_valid_skips_trailing_zero() {
        let records = vec![record("a", 90.0), record("b", 104.0), record("c", 0.0)];
        assert_eq!(latest_valid(&records).unwrap().estimated_glucose, 104.0);
        assert!(latest_valid(&[record("a", 0.0)]).is_none());
    }

    #[test]
    fn unseen_after_last_key() {
        let records = vec![record("a", 90.0), record("b", 91.0), record("c", 92.0)];
        assert_eq!(unseen(&records, None).len(), 3);
        assert_eq!(unseen(&records, Some("a")).len(), 2);
        assert!(unseen(&records, Some("c")).is_empty());
        assert_eq!(unseen(&records, Some("zz")).len(), 3);
    }

    #[tokio::test]
    async fn current_reports_newest_valid_reading() {
        let path = fixture("current", &[95.0, 125.0, 0.0]);
        let dashboard = Dashboard::new(FeedSource::File(path.clone()));
        let report = dashboard.current().await.unwrap().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(report.glucose, 125.0);
        assert_eq!(report.status, GlucoseStatus::High);
        assert_eq!(report.blood_pressure.to_string(), "130/84");
        assert_eq!(report.display_time, "01 Jan 2025, 05:31:00 am");
    }

    #[tokio::test]
    async fn pinned_epoch_unit_changes_display_time() {
        let path = fixture("pinned", &[95.0]);
        let formatter = TimeFormatter::ist().with_unit(glucosense_algos::EpochUnit::Milliseconds);
        let dashboard = Dashboard::new(FeedSource::File(path.clone())).with_formatter(formatter);
        let report = dashboard.current().await.unwrap().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(report.display_time, "21 Jan 1970, 07:38:09 am");
    }

    #[tokio::test]
    async fn history_newest_first_with_limit() {
        let path = fixture("history", &[65.0, 0.0, 99.0, 110.0]);
        let dashboard = Dashboard::new(FeedSource::File(path.clone()));
        let all = dashboard.history(None).await.unwrap();
        let two = dashboard.history(Some(2)).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let values: Vec<f64> = all.iter().map(|e| e.glucose).collect();
        assert_eq!(values, vec![110.0, 99.0, 65.0]);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].status, GlucoseStatus::Moderate);
    }

    #[tokio::test]
    async fn trend_caps_window() {
        let glucose: Vec<f64> = (0..25).map(|i| 80.0 + i as f64).collect();
        let path = fixture("trend", &glucose);
        let dashboard = Dashboard::new(FeedSource::File(path.clone()));
        let window = dashboard.trend().await.unwrap();
        let small = dashboard.with_history_size(5).trend().await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(window.len(), 20);
        assert_eq!(window.iter().next().unwrap().value, 85.0);
        assert_eq!(small.len(), 5);
        assert_eq!(small.summary().unwrap().latest, 104.0);
    }

    #[tokio::test]
    async fn export_serializes() {
        let path = fixture("export", &[90.0, 100.0]);
        let dashboard = Dashboard::new(FeedSource::File(path.clone()));
        let export = dashboard.export().await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["current"]["glucose"], 100.0);
        assert_eq!(json["trend"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["mean"], 95.0);
        assert_eq!(json["source"], path.display().to_string());
    }

    #[tokio::test]
    async fn watch_emits_initial_window_then_stops() {
        let path = fixture("watch", &[90.0, 0.0, 110.0]);
        let dashboard = Dashboard::new(FeedSource::File(path.clone()));
        let running = Arc::new(AtomicBool::new(true));
        let mut updates = Vec::new();

        let flag = running.clone();
        dashboard
            .watch(Duration::from_millis(1), running, |update| {
                updates.push(update.clone());
                flag.store(false, Ordering::SeqCst);
            })
            .await
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].accepted, 2);
        assert_eq!(updates[0].trend.len(), 2);
        assert_eq!(updates[0].current.as_ref().unwrap().glucose, 110.0);
    }

    #[tokio::test]
    async fn watch_survives_feed_errors() {
        let dashboard = Dashboard::new(FeedSource::File(PathBuf::from(
            "/nonexistent/glucosense-watch.json",
        )));
        let running = Arc::new(AtomicBool::new(true));

        let flag = running.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(false, Ordering::SeqCst);
        });

        let mut calls = 0;
        dashboard
            .watch(Duration::from_millis(2), running, |_| calls += 1)
            .await
            .unwrap();
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn watch_keeps_last_report_when_poll_has_only_invalid_records() {
        let path = fixture("invalid-poll", &[110.0]);
        let dashboard = Dashboard::new(FeedSource::File(path.clone()));
        let running = Arc::new(AtomicBool::new(true));
        let mut updates = Vec::new();

        let flag = running.clone();
        dashboard
            .watch(Duration::from_millis(1), running, |update| {
                updates.push(update.clone());
                match updates.len() {
                    1 => write_node(&path, &[110.0, 0.0]),
                    _ => flag.store(false, Ordering::SeqCst),
                }
            })
            .await
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].accepted, 0);
        assert_eq!(values(&updates[1]), vec![110.0]);
        assert_eq!(updates[1].current.as_ref().unwrap().glucose, 110.0);
    }

    #[tokio::test]
    async fn watch_appends_new_records_incrementally() {
        let path = fixture("incremental", &[90.0, 91.0]);
        let dashboard = Dashboard::new(FeedSource::File(path.clone())).with_history_size(3);
        let running = Arc::new(AtomicBool::new(true));
        let mut updates = Vec::new();

        let flag = running.clone();
        dashboard
            .watch(Duration::from_millis(1), running, |update| {
                updates.push(update.clone());
                match updates.len() {
                    1 => write_node(&path, &[90.0, 91.0, 92.0, 93.0]),
                    // the last seen key -N003 falls outside the fetched tail
                    2 => write_node(&path, &(0..9).map(|i| 90.0 + i as f64).collect::<Vec<_>>()),
                    _ => flag.store(false, Ordering::SeqCst),
                }
            })
            .await
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(updates.len(), 3);

        assert_eq!(updates[0].accepted, 2);
        assert_eq!(values(&updates[0]), vec![90.0, 91.0]);

        assert_eq!(updates[1].accepted, 2);
        assert_eq!(values(&updates[1]), vec![91.0, 92.0, 93.0]);
        assert_eq!(updates[1].current.as_ref().unwrap().glucose, 93.0);

        assert_eq!(updates[2].accepted, 3);
        assert_eq!(values(&updates[2]), vec![96.0, 97.0, 98.0]);
        assert_eq!(updates[2].summary.unwrap().latest, 98.0);
    }

    #[tokio::test]
    async fn watch_stops_before_interval_elapses() {
        let dashboard = Dashboard::new(FeedSource::File(PathBuf::from(
            "/nonexistent/glucosense-stop.json",
        )));
        let running = Arc::new(AtomicBool::new(true));

        let flag = running.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(false, Ordering::SeqCst);
        });

        let watched = tokio::time::timeout(
            Duration::from_secs(5),
            dashboard.watch(Duration::from_secs(3600), running, |_| {}),
        )
        .await;
        assert!(watched.is_ok());
    }
}
