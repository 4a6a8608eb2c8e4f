//! [`SqliteStore`]: the SQLite implementation of [`LedgerStore`].

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use fuelbook_core::{
  event::{EventId, ExpenseEvent, NewEvent, SortOrder},
  store::LedgerStore,
  vehicle::VehicleName,
};
use rusqlite::{OpenFlags, OptionalExtension as _};
use tokio_rusqlite::Connection;

use crate::{
  Error, Result,
  encode::{COLUMNS, RawEvent, RowValues},
  schema::{EXTENSION, SCHEMA},
};

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A directory of per-vehicle SQLite ledgers.
///
/// The handle holds no open connections. Each operation opens the vehicle's
/// file, runs, and drops the connection before returning, so nothing stays
/// locked between requests. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct SqliteStore {
  data_dir: Arc<PathBuf>,
}

impl SqliteStore {
  /// Use `data_dir` as the store root, creating it if necessary.
  pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
    let data_dir = data_dir.as_ref().to_path_buf();
    tokio::fs::create_dir_all(&data_dir).await?;
    tracing::debug!(dir = %data_dir.display(), "opened ledger directory");
    Ok(Self { data_dir: Arc::new(data_dir) })
  }

  pub fn data_dir(&self) -> &Path { &self.data_dir }

  fn path_for(&self, vehicle: &VehicleName) -> PathBuf {
    self.data_dir.join(format!("{vehicle}.{EXTENSION}"))
  }

  /// Open an existing vehicle ledger. Never creates the file.
  async fn connect(&self, vehicle: &VehicleName) -> Result<Connection> {
    let path = self.path_for(vehicle);
    if !tokio::fs::try_exists(&path).await? {
      return Err(Error::VehicleNotFound(vehicle.clone()));
    }

    let conn = Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .await?;
    conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
      })
      .await?;
    Ok(conn)
  }
}

// ─── LedgerStore impl ────────────────────────────────────────────────────────

impl LedgerStore for SqliteStore {
  type Error = Error;

  // ── Vehicles ──────────────────────────────────────────────────────────────

  async fn create(&self, vehicle: &VehicleName) -> Result<bool> {
    let path = self.path_for(vehicle);
    let existed = tokio::fs::try_exists(&path).await?;

    let conn = Connection::open(path).await?;
    conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;

    if !existed {
      tracing::info!(%vehicle, "created vehicle ledger");
    }
    Ok(!existed)
  }

  async fn has_vehicle(&self, vehicle: &VehicleName) -> Result<bool> {
    Ok(tokio::fs::try_exists(self.path_for(vehicle)).await?)
  }

  async fn list_vehicles(&self) -> Result<BTreeSet<VehicleName>> {
    let mut vehicles = BTreeSet::new();
    let mut entries = tokio::fs::read_dir(self.data_dir.as_path()).await?;

    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
        continue;
      }
      let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        continue;
      };
      match VehicleName::parse(stem) {
        Ok(name) => {
          vehicles.insert(name);
        }
        Err(e) => {
          tracing::debug!(file = %path.display(), error = %e, "skipping foreign file");
        }
      }
    }

    Ok(vehicles)
  }

  // ── Rows ──────────────────────────────────────────────────────────────────

  async fn insert(&self, vehicle: &VehicleName, event: NewEvent) -> Result<EventId> {
    let values = RowValues::from_event(event);
    let conn = self.connect(vehicle).await?;

    let id = conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO expenses (
             date, event_type, odometer, liters, price_per_liter, cost, comment
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            values.date,
            values.event_type,
            values.odometer,
            values.liters,
            values.price_per_liter,
            values.cost,
            values.comment,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(%vehicle, id, "inserted event");
    Ok(id)
  }

  async fn update(
    &self,
    vehicle: &VehicleName,
    id: EventId,
    event: NewEvent,
  ) -> Result<bool> {
    let values = RowValues::from_event(event);
    let conn = self.connect(vehicle).await?;

    let changed = conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE expenses SET
             date = ?1, event_type = ?2, odometer = ?3, liters = ?4,
             price_per_liter = ?5, cost = ?6, comment = ?7
           WHERE id = ?8",
          rusqlite::params![
            values.date,
            values.event_type,
            values.odometer,
            values.liters,
            values.price_per_liter,
            values.cost,
            values.comment,
            id,
          ],
        )?)
      })
      .await?;

    tracing::debug!(%vehicle, id, changed, "updated event");
    Ok(changed > 0)
  }

  async fn delete(&self, vehicle: &VehicleName, id: EventId) -> Result<bool> {
    let conn = self.connect(vehicle).await?;

    let removed = conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM expenses WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    tracing::debug!(%vehicle, id, removed, "deleted event");
    Ok(removed > 0)
  }

  async fn get_by_id(
    &self,
    vehicle: &VehicleName,
    id: EventId,
  ) -> Result<Option<ExpenseEvent>> {
    let conn = self.connect(vehicle).await?;

    let raw: Option<RawEvent> = conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COLUMNS} FROM expenses WHERE id = ?1"),
            rusqlite::params![id],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn list_all(
    &self,
    vehicle: &VehicleName,
    order: SortOrder,
  ) -> Result<Vec<ExpenseEvent>> {
    let direction = match order {
      SortOrder::Ascending => "ASC",
      SortOrder::Descending => "DESC",
    };
    let conn = self.connect(vehicle).await?;

    let raws: Vec<RawEvent> = conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM expenses
           ORDER BY date {direction}, id {direction}"
        ))?;
        let rows = stmt
          .query_map([], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn last_odometer(&self, vehicle: &VehicleName) -> Result<Option<i64>> {
    let conn = self.connect(vehicle).await?;

    let reading = conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT odometer FROM expenses
             WHERE odometer IS NOT NULL
             ORDER BY date DESC, id DESC
             LIMIT 1",
            [],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(reading)
  }
}
