//! Database Bootstrap
//!
//! Drives the one-shot provisioning flow: platform preparation, then
//! either a cold first-setup pass creating the full schema or a warm
//! reopen of the database created on a previous run. Exposes a watch
//! channel the presentation layer can gate on before issuing queries.

use crate::engine::{EngineError, SqliteEngine};
use crate::platform::{self, Platform};
use crate::prefs::{PreferenceStore, PrefsError, DB_NAME_KEY, FIRST_SETUP_KEY};
use crate::schema;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Database file name used when nothing has been configured or persisted
pub const DEFAULT_DB_NAME: &str = "sqgs.db";

/// Errors that abort initialization
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The first-setup flag is set but no database name was persisted
    #[error("First setup already ran but no database name is persisted")]
    MissingDbName,
    /// A previously created database could not be reopened
    #[error("Failed to reopen database '{database}'")]
    WarmOpen {
        database: String,
        #[source]
        source: EngineError,
    },
    /// Platform preparation failed before any database work started
    #[error("Platform preparation failed")]
    Platform(#[source] EngineError),
    /// The preference store could not be read or written
    #[error("Preference store failure")]
    Prefs(#[from] PrefsError),
}

/// Which branch an initialization run took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitMode {
    /// First run: the schema was provisioned table by table
    ColdSetup,
    /// Later run: the existing database was reopened
    WarmOpen,
}

/// Outcome of one table-creation statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOutcome {
    pub table: &'static str,
    /// Creation error, if the statement failed
    pub error: Option<String>,
}

/// Aggregated result of an initialization run.
///
/// A warm open carries no table outcomes; a cold setup carries one per
/// manifest entry, in creation order, whether it succeeded or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub mode: InitMode,
    pub tables: Vec<TableOutcome>,
}

impl InitReport {
    /// Number of tables created without error
    pub fn created(&self) -> usize {
        self.tables.iter().filter(|t| t.error.is_none()).count()
    }

    /// Number of tables whose creation failed
    pub fn failed(&self) -> usize {
        self.tables.iter().filter(|t| t.error.is_some()).count()
    }

    /// True when no table in the run failed
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Handle observing the readiness signal.
///
/// Starts at `false` for every fresh process and flips to `true` at
/// most once per initialization run; it never flips back.
#[derive(Debug, Clone)]
pub struct ReadyWatch {
    rx: watch::Receiver<bool>,
}

impl ReadyWatch {
    /// Current readiness without waiting
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until readiness fires. Returns `false` if the bootstrap was
    /// dropped before ever signaling.
    pub async fn wait(&mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}

/// Owns the provisioning state for one local database.
///
/// Engine and preference store are injected, so embedders decide where
/// the state lives and tests run against scripted doubles. There is no
/// process-wide instance.
pub struct DbBootstrap<E, P> {
    engine: E,
    prefs: P,
    platform: Platform,
    default_db_name: String,
    resolved_name: Mutex<Option<String>>,
    ready_tx: watch::Sender<bool>,
}

impl<E: SqliteEngine, P: PreferenceStore> DbBootstrap<E, P> {
    /// Bootstrap with the standard database name
    pub fn new(engine: E, prefs: P) -> Self {
        Self::with_db_name(engine, prefs, DEFAULT_DB_NAME)
    }

    /// Bootstrap with a custom default database name
    pub fn with_db_name(engine: E, prefs: P, default_db_name: impl Into<String>) -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            engine,
            prefs,
            platform: Platform::detect(),
            default_db_name: default_db_name.into(),
            resolved_name: Mutex::new(None),
            ready_tx,
        }
    }

    /// Force a platform instead of detecting it from the compile target
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Platform this bootstrap prepares for
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Subscribe to the readiness signal
    pub fn subscribe(&self) -> ReadyWatch {
        ReadyWatch {
            rx: self.ready_tx.subscribe(),
        }
    }

    /// Current readiness without subscribing
    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    /// Name of the database this bootstrap resolved, or the default if
    /// initialization has not run yet
    pub fn db_name(&self) -> String {
        self.resolved_name
            .lock()
            .clone()
            .unwrap_or_else(|| self.default_db_name.clone())
    }

    /// Database name persisted by a previous run, if any
    pub async fn stored_db_name(&self) -> Result<Option<String>, BootstrapError> {
        Ok(self.prefs.get(DB_NAME_KEY).await?)
    }

    /// Whether a previous run completed the first setup
    pub async fn first_setup_done(&self) -> Result<bool, BootstrapError> {
        Ok(self.prefs.get(FIRST_SETUP_KEY).await?.is_some())
    }

    /// Run the full initialization flow.
    ///
    /// Strictly sequential: platform preparation, then the cold or warm
    /// branch depending on the persisted first-setup flag. Readiness
    /// fires on success and stays down on failure.
    pub async fn initialize(&self) -> Result<InitReport, BootstrapError> {
        info!("Initializing local database (platform: {})", self.platform);

        platform::prepare(self.platform, &self.engine)
            .await
            .map_err(BootstrapError::Platform)?;

        self.setup_database().await
    }

    /// Close the connection to the resolved database
    pub async fn close(&self) -> Result<(), EngineError> {
        self.engine.close_connection(&self.db_name()).await
    }

    async fn setup_database(&self) -> Result<InitReport, BootstrapError> {
        let first_setup = self.prefs.get(FIRST_SETUP_KEY).await?;
        let stored_name = self.prefs.get(DB_NAME_KEY).await?;
        let stored_name = stored_name.filter(|name| !name.is_empty());

        match first_setup {
            None => {
                // A name persisted by an interrupted earlier run still wins
                let db_name = stored_name.unwrap_or_else(|| self.default_db_name.clone());
                self.cold_setup(db_name).await
            }
            Some(_) => match stored_name {
                Some(db_name) => self.warm_open(db_name).await,
                // The configured default never substitutes on a warm start
                None => {
                    error!("First setup already ran but no database name is persisted");
                    Err(BootstrapError::MissingDbName)
                }
            },
        }
    }

    async fn cold_setup(&self, db_name: String) -> Result<InitReport, BootstrapError> {
        info!("First setup: provisioning schema in '{}'", db_name);

        let mut tables = Vec::with_capacity(schema::TABLE_COUNT);
        for table in &schema::ALL_TABLES {
            match self.engine.execute(&db_name, table.create_sql).await {
                Ok(()) => {
                    debug!("Created table {}", table.name);
                    tables.push(TableOutcome {
                        table: table.name,
                        error: None,
                    });
                }
                Err(e) => {
                    // One bad table must not block the rest of the schema
                    error!("Failed to create table {}: {}", table.name, e);
                    tables.push(TableOutcome {
                        table: table.name,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        self.prefs.set(FIRST_SETUP_KEY, "1").await?;
        self.prefs.set(DB_NAME_KEY, &db_name).await?;
        *self.resolved_name.lock() = Some(db_name);
        self.signal_ready();

        let report = InitReport {
            mode: InitMode::ColdSetup,
            tables,
        };
        info!(
            "First setup complete: {} tables created, {} failed",
            report.created(),
            report.failed()
        );
        Ok(report)
    }

    async fn warm_open(&self, db_name: String) -> Result<InitReport, BootstrapError> {
        info!("Warm start: reopening '{}'", db_name);

        if let Err(source) = self.try_open(&db_name).await {
            error!("Failed to reopen database '{}': {}", db_name, source);
            return Err(BootstrapError::WarmOpen {
                database: db_name,
                source,
            });
        }

        *self.resolved_name.lock() = Some(db_name);
        self.signal_ready();

        Ok(InitReport {
            mode: InitMode::WarmOpen,
            tables: Vec::new(),
        })
    }

    async fn try_open(&self, db_name: &str) -> Result<(), EngineError> {
        self.engine.create_connection(db_name).await?;
        self.engine.open(db_name).await
    }

    fn signal_ready(&self) {
        let was_ready = self.ready_tx.send_replace(true);
        if !was_ready {
            info!("Database ready");
        }
    }
}
