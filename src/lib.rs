//! sqgs-store - Local database provisioning for the SQGS quality-gate app
//!
//! Provisions the on-device SQLite database the SQGS shop-floor app
//! records inspections in: creates the full schema on first run, reopens
//! the existing database on later runs, and signals readiness so the
//! presentation layer knows when queries are safe.
//!
//! # Initialization Flow
//!
//! 1. **Platform preparation**: Android asks for storage permissions
//!    (failure is logged, not fatal), web initializes the backing store
//!    (failure is fatal), iOS and desktop start clean.
//!
//! 2. **Cold start**: when the persisted first-setup flag is absent, every
//!    table in the schema manifest is created in order. A failing table is
//!    logged and reported but does not stop the loop. The flag and the
//!    database name are persisted afterwards and readiness fires.
//!
//! 3. **Warm start**: when the flag is present, the persisted database
//!    name is reopened. A missing name or a failed open keeps readiness
//!    down and surfaces as a typed error.
//!
//! # Quick Start
//!
//! ```no_run
//! use sqgs_store::{BundledEngine, DbBootstrap, FilePreferences};
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = BundledEngine::with_default_dir()?;
//!     let prefs = FilePreferences::new(engine.data_dir().join("preferences.json"));
//!     let bootstrap = DbBootstrap::new(engine, prefs);
//!
//!     let ready = bootstrap.subscribe();
//!     let rt = tokio::runtime::Runtime::new()?;
//!     let report = rt.block_on(bootstrap.initialize())?;
//!
//!     assert!(ready.is_ready());
//!     println!("{:?}: {} tables created", report.mode, report.created());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`bootstrap`]: Cold/warm initialization flow and the readiness watch
//! - [`engine`]: Async boundary over the embedded SQLite engine
//! - [`schema`]: The fixed table manifest and the ID-list codec
//! - [`prefs`]: Persisted key-value state (first-setup flag, database name)
//! - [`platform`]: Platform detection and preparation
//! - [`config`]: TOML application configuration

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod platform;
pub mod prefs;
pub mod schema;

pub use bootstrap::{
    BootstrapError, DbBootstrap, InitMode, InitReport, ReadyWatch, TableOutcome, DEFAULT_DB_NAME,
};
pub use engine::{BundledEngine, EngineError, SqliteEngine};
pub use platform::Platform;
pub use prefs::{
    FilePreferences, MemoryPreferences, PreferenceStore, PrefsError, DB_NAME_KEY, FIRST_SETUP_KEY,
};
pub use schema::{TableDef, ALL_TABLES, TABLE_COUNT};
