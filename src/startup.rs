use crate::components::repository::{AttendanceRepository, InMemoryRepository};
use crate::config::Config;
use crate::error::{other_error, AppResult};
use crate::seed::SeedData;
use crate::service::AttendanceService;
use crate::utils::time::now_local;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config and apply its locale
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            crate::utils::i18n::set_locale(&config.locale);
            info!("Setting locale to {}", config.locale);
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build an in-memory service seeded from the fixture file, or demo data
pub async fn build_service(config: Arc<Config>) -> AppResult<AttendanceService> {
    let repo = Arc::new(InMemoryRepository::new());

    let seed = match &config.seed_file {
        Some(path) => SeedData::load(path)?,
        None => {
            let today = now_local(&config.tz()?).date();
            info!("No seed file configured, using demo data for {}", today);
            SeedData::demo(today)
        }
    };
    seed.apply(repo.as_ref(), config.late_grace_minutes, Utc::now())
        .await?;

    let repo: Arc<dyn AttendanceRepository> = repo;
    Ok(AttendanceService::new(repo, config))
}
