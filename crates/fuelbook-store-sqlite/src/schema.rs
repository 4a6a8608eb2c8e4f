//! SQL schema for a vehicle's ledger file.
//!
//! Executed on every `create`; idempotent thanks to `IF NOT EXISTS`. Future
//! migrations will be gated on `PRAGMA user_version`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS expenses (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    date            TEXT    NOT NULL,   -- YYYY-MM-DD
    event_type      TEXT    NOT NULL
                    CHECK (event_type IN ('fuel', 'maintenance', 'other')),
    odometer        INTEGER,
    liters          REAL,               -- fuel only
    price_per_liter REAL,               -- fuel only
    cost            REAL,               -- derived for fuel, supplied otherwise
    comment         TEXT    NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS expenses_date_idx ON expenses(date);

PRAGMA user_version = 1;
";

/// File extension of a vehicle's ledger file.
pub const EXTENSION: &str = "db";
