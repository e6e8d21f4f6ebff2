use crawl_report::config::Config;
use crawl_report::error::Result;
use crawl_report::logging::{init_logging, parse_log_level, LoggerConfig};
use crawl_report::{log_error, log_info, log_warn};
use crawl_report::{report, utils, CrawlSnapshot, TextTypes};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load_or_default(&config_path)?;

    let logger_config = LoggerConfig {
        directory: config.logging.directory.clone(),
        file_name: config.logging.filename.clone(),
        rotation: tracing_appender::rolling::Rotation::DAILY,
        level: parse_log_level(&config.logging.level)?,
    };

    init_logging(logger_config)?;

    log_info!("[main] Starting crawl report with config {}", config_path);

    let classifier = TextTypes::new(&config.text_types)?;

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let interrupt = Arc::clone(&interrupt);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log_warn!("[main] Interrupt received, finishing with partial report");
                    interrupt.store(true, Ordering::SeqCst);
                }
                Err(e) => log_error!("[main] Unable to listen for interrupt signal: {}", e),
            }
        });
    }

    let snapshots = utils::read_snapshots(&config.snapshots)?;
    let mut out = utils::open_output(config.output.as_deref())?;

    for path in snapshots {
        if interrupt.load(Ordering::SeqCst) {
            log_warn!("[main] Skipping {:?} after interrupt", path);
            continue;
        }

        log_info!("[main] Reporting on {:?}", path);
        let snapshot = match CrawlSnapshot::from_file(&path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log_error!(e => "[main] Skipping unreadable snapshot {:?}", path);
                continue;
            }
        };

        let stats = report(&snapshot, &classifier, &interrupt, &mut out)?;
        log_info!(
            "[main] Reported {} urls into {} counters",
            snapshot.done.len(),
            stats.iter().count()
        );
    }

    out.flush()?;
    log_info!("[main] Report completed");
    Ok(())
}
