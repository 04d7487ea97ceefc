#[macro_use]
extern crate log;

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use glucosense::{
    Dashboard,
    algo::{
        DerivedVitals, EpochUnit, HistoryWindow, TimeFormatter, VitalsClassifier, VitalsReport,
    },
    feed::{FeedClient, FeedConfig, FeedSource},
    types::Sample,
};

#[derive(Parser)]
pub struct GlucoSenseCli {
    /// Realtime Database root URL
    #[arg(env, long)]
    pub database_url: Option<String>,
    #[arg(env = "FIREBASE_AUTH_TOKEN", long)]
    pub auth_token: Option<String>,
    #[arg(env, long, default_value = FeedConfig::DEFAULT_PATH)]
    pub feed_path: String,
    /// Read readings from a saved JSON snapshot instead of the database
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
    /// Points kept in the trend window
    #[arg(
        env,
        long,
        default_value_t = HistoryWindow::DEFAULT_CAPACITY as u16,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub history_size: u16,
    /// How feed timestamps are interpreted
    #[arg(env, long, value_enum, default_value_t = EpochUnitArg::Auto)]
    pub epoch_unit: EpochUnitArg,
    #[clap(subcommand)]
    pub subcommand: GlucoSenseCommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EpochUnitArg {
    Auto,
    Seconds,
    Millis,
}

impl From<EpochUnitArg> for EpochUnit {
    fn from(value: EpochUnitArg) -> Self {
        match value {
            EpochUnitArg::Auto => EpochUnit::Auto,
            EpochUnitArg::Seconds => EpochUnit::Seconds,
            EpochUnitArg::Millis => EpochUnit::Milliseconds,
        }
    }
}

#[derive(Subcommand)]
pub enum GlucoSenseCommand {
    ///
    /// Show the latest reading with derived vitals
    ///
    Current,
    ///
    /// List every valid reading, newest first
    ///
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    ///
    /// Print the trailing glucose trend window
    ///
    Trend,
    ///
    /// Poll the feed and print updates until Ctrl-C
    ///
    Watch {
        /// Poll interval in seconds
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
    ///
    /// Write the current report and trend window as JSON
    ///
    Export {
        #[arg(long, short)]
        output: PathBuf,
    },
    ///
    /// Derive and classify vitals for a manual reading
    ///
    Derive {
        #[arg(long)]
        glucose: f64,
        #[arg(long)]
        heart_rate: f64,
        #[arg(long)]
        spo2: f64,
    },
    ///
    /// Classify individually entered vitals
    ///
    Classify {
        #[arg(long)]
        glucose: Option<f64>,
        #[arg(long)]
        heart_rate: Option<f64>,
        #[arg(long)]
        spo2: Option<f64>,
        #[arg(long)]
        hrv: Option<f64>,
        /// `systolic/diastolic`, e.g. 120/80
        #[arg(long)]
        blood_pressure: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Off)
        .init();

    let cli = GlucoSenseCli::parse();

    match cli.subcommand {
        GlucoSenseCommand::Derive {
            glucose,
            heart_rate,
            spo2,
        } => {
            let sample = Sample::new(None, glucose, heart_rate, spo2);
            let vitals = DerivedVitals::from_sample(&sample);
            let now = TimeFormatter::ist().format(None);
            println!("{}", VitalsReport::new(&vitals, now));
            Ok(())
        }
        GlucoSenseCommand::Classify {
            glucose,
            heart_rate,
            spo2,
            hrv,
            blood_pressure,
        } => {
            classify_command(glucose, heart_rate, spo2, hrv, blood_pressure);
            Ok(())
        }
        subcommand => {
            let feed = feed_source(
                cli.snapshot,
                cli.database_url,
                cli.feed_path,
                cli.auth_token,
            )?;
            info!("reading from {}", feed.describe());
            let formatter = TimeFormatter::ist().with_unit(cli.epoch_unit.into());
            let dashboard = Dashboard::new(feed)
                .with_formatter(formatter)
                .with_history_size(cli.history_size.into());
            feed_command(dashboard, subcommand).await
        }
    }
}

async fn feed_command(dashboard: Dashboard, subcommand: GlucoSenseCommand) -> anyhow::Result<()> {
    match subcommand {
        GlucoSenseCommand::Current => {
            match dashboard.current().await? {
                Some(report) => println!("{}", report),
                None => println!("No glucose readings available yet."),
            }
            Ok(())
        }
        GlucoSenseCommand::History { limit } => {
            let entries = dashboard.history(limit).await?;
            if entries.is_empty() {
                println!("No glucose history available yet.");
                return Ok(());
            }

            println!("{:<28}{:>22}  Status", "Date & Time (IST)", "Glucose Level (mg/dL)");
            for entry in entries {
                println!("{:<28}{:>22}  {}", entry.display_time, entry.glucose, entry.status);
            }
            Ok(())
        }
        GlucoSenseCommand::Trend => {
            let window = dashboard.trend().await?;
            for point in window.iter() {
                println!("{:<28}{:>8}", point.display_time, point.value);
            }
            if let Some(summary) = window.summary() {
                println!("\n{}", summary);
            }
            Ok(())
        }
        GlucoSenseCommand::Watch { interval } => {
            let running = Arc::new(AtomicBool::new(true));
            let flag = running.clone();
            ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

            dashboard
                .watch(Duration::from_secs(interval), running, |update| {
                    if let Some(report) = &update.current {
                        println!("{}", report);
                    }
                    if let Some(summary) = &update.summary {
                        println!("Trend ({} points): {}\n", update.trend.len(), summary);
                    }
                })
                .await
        }
        GlucoSenseCommand::Export { output } => {
            let export = dashboard.export().await?;
            let json = serde_json::to_string_pretty(&export)?;
            std::fs::write(&output, json)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Report written to {}", output.display());
            Ok(())
        }
        GlucoSenseCommand::Derive { .. } | GlucoSenseCommand::Classify { .. } => {
            Err(anyhow!("command does not read the feed"))
        }
    }
}

fn feed_source(
    snapshot: Option<PathBuf>,
    database_url: Option<String>,
    feed_path: String,
    auth_token: Option<String>,
) -> anyhow::Result<FeedSource> {
    if let Some(path) = snapshot {
        return Ok(FeedSource::File(path));
    }

    let database_url =
        database_url.ok_or(anyhow!("Either --database-url or --snapshot is required"))?;
    let config = FeedConfig::new(database_url)
        .with_path(feed_path)
        .with_auth_token(auth_token);

    Ok(FeedSource::Remote(FeedClient::new(config)))
}

fn classify_command(
    glucose: Option<f64>,
    heart_rate: Option<f64>,
    spo2: Option<f64>,
    hrv: Option<f64>,
    blood_pressure: Option<String>,
) {
    if let Some(glucose) = glucose {
        let status = VitalsClassifier::glucose(glucose);
        println!("Glucose: {} mg/dL ({})\n\t{}", glucose, status, status.advice());
    }
    if let Some(bpm) = heart_rate {
        println!("Heart rate: {} bpm ({})", bpm, VitalsClassifier::heart_rate(bpm));
    }
    if let Some(spo2) = spo2 {
        println!("SpO2: {}% ({})", spo2, VitalsClassifier::spo2(spo2));
    }
    if let Some(hrv) = hrv {
        println!("HRV: {} ms ({})", hrv, VitalsClassifier::hrv(hrv));
    }
    if let Some(reading) = blood_pressure {
        match VitalsClassifier::blood_pressure_str(&reading) {
            Ok(band) => println!("BP: {} ({})", reading.trim(), band),
            Err(error) => {
                warn!("unreadable blood pressure: {}", error);
                println!("BP: N/A");
            }
        }
    }
}
