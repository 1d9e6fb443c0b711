//! `soilwatch-agent` -- soil-moisture reader and low-moisture alerter.
//!
//! Reads the moisture value the ESP32 publishes to the realtime database,
//! prints it, and raises an alert when it drops below the threshold. A
//! read is triggered by pressing Enter, and additionally on a fixed
//! interval when `POLL_INTERVAL_SECS` is set. See
//! [`AgentConfig::from_env`](soilwatch_agent::config::AgentConfig::from_env)
//! for the full list of environment variables.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use soilwatch_agent::config::AgentConfig;
use soilwatch_agent::display::ConsoleDisplay;
use soilwatch_agent::fetcher::ReadingFetcher;
use soilwatch_agent::monitor::Monitor;
use soilwatch_agent::source::RealtimeDbSource;
use soilwatch_events::{LogSink, NotificationSink, ThresholdNotifier, WebhookSink};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Interval;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soilwatch_agent=info,soilwatch_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env()?;

    tracing::info!(
        database_url = %config.database_url,
        path = %format!("{}/{}", config.sensor_namespace, config.sensor_key),
        threshold = config.threshold.value(),
        poll_interval_secs = config.poll_interval.map(|d| d.as_secs()),
        notifications_enabled = config.notifications_enabled,
        "Starting soilwatch-agent",
    );

    // Built once and shared by every cycle.
    let source = Arc::new(RealtimeDbSource::new(
        &config.database_url,
        config.database_auth.clone(),
    )?);
    let fetcher = ReadingFetcher::new(source, config.sensor_namespace.clone(), config.fetch_timeout);

    let sink: Arc<dyn NotificationSink> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookSink::new(url.clone(), config.notifications_enabled)?),
        None => Arc::new(LogSink::new(config.notifications_enabled)),
    };

    let monitor = Monitor::new(
        fetcher,
        config.sensor_key.clone(),
        ThresholdNotifier::new(config.threshold),
        sink,
        Arc::new(ConsoleDisplay),
    );
    monitor.start().await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let ticker = config.poll_interval.map(tokio::time::interval);
    let exit = run_triggers(&monitor, ticker, &mut ctrl_c).await;

    // Reads already requested still complete when input runs out. Ctrl-C
    // discards them.
    if exit == Exit::InputClosed {
        tokio::select! {
            _ = monitor.drain() => {}
            _ = &mut ctrl_c => tracing::info!("Interrupted while finishing pending reads"),
        }
    }

    monitor.shutdown();
    Ok(())
}

/// Why the trigger loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Interrupted,
    InputClosed,
}

/// Trigger a read for every line on stdin and every poll tick until
/// Ctrl-C, or until stdin closes with no poll interval configured.
async fn run_triggers<F>(
    monitor: &Monitor,
    mut ticker: Option<Interval>,
    ctrl_c: &mut Pin<&mut F>,
) -> Exit
where
    F: Future<Output = std::io::Result<()>>,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("Press Enter to read the sensor (Ctrl-C to quit).");

    loop {
        tokio::select! {
            _ = ctrl_c.as_mut() => {
                tracing::info!("Interrupted");
                return Exit::Interrupted;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(_)) => {
                    monitor.trigger();
                }
                Ok(None) => {
                    stdin_open = false;
                    if ticker.is_none() {
                        return Exit::InputClosed;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                    if ticker.is_none() {
                        return Exit::InputClosed;
                    }
                }
            },
            _ = next_tick(&mut ticker) => {
                monitor.trigger();
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
