//! Schema manifest for the SQGS local database.
//!
//! The manifest is a fixed, ordered list of `CREATE TABLE IF NOT EXISTS`
//! statements covering production line structure (plants, cells, stations),
//! inspection checkpoints, defects and repairs, and user shift deployment.
//! Statement text is kept byte-compatible with databases already provisioned
//! on devices; several columns store serialized ID lists as TEXT, and the
//! [`idlist`] codec owns that encoding.

pub mod idlist;
pub mod tables;

pub use tables::{ALL_TABLES, TABLE_COUNT};

/// One table in the provisioning manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    /// Table name as it appears in the database
    pub name: &'static str,
    /// Idempotent creation statement (`CREATE TABLE IF NOT EXISTS ...`)
    pub create_sql: &'static str,
}

/// Iterate the manifest table names in creation order.
pub fn table_names() -> impl Iterator<Item = &'static str> {
    ALL_TABLES.iter().map(|t| t.name)
}

/// Look up a table definition by name (case-insensitive, like SQLite).
pub fn find(name: &str) -> Option<&'static TableDef> {
    ALL_TABLES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}
