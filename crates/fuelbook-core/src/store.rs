//! The `LedgerStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `fuelbook-store-sqlite`). The web layer depends on this abstraction and
//! receives a store handle through its state, never a file path.

use std::{collections::BTreeSet, future::Future};

use crate::{
  event::{EventId, ExpenseEvent, NewEvent, SortOrder},
  vehicle::VehicleName,
};

/// Error type of a [`LedgerStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// True when the failure means the vehicle's store does not exist, as
  /// opposed to a broken medium.
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a per-vehicle record store.
///
/// Every vehicle owns an independent store. All operations except
/// [`create`](Self::create), [`has_vehicle`](Self::has_vehicle) and
/// [`list_vehicles`](Self::list_vehicles) fail when the vehicle's store does
/// not exist. Each operation is atomic on its own; there are no multi-row
/// transactions.
///
/// Returned futures are `Send`, so handlers can hold a store across awaits on
/// a multi-threaded runtime.
pub trait LedgerStore: Send + Sync {
  type Error: StoreError;

  /// Ensure a store exists for `vehicle`. Idempotent; returns `true` if the
  /// store was created by this call.
  fn create(
    &self,
    vehicle: &VehicleName,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  /// Whether a store exists for `vehicle`.
  fn has_vehicle(
    &self,
    vehicle: &VehicleName,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  /// Names of every vehicle that has a store.
  fn list_vehicles(
    &self,
  ) -> impl Future<Output = Result<BTreeSet<VehicleName>, Self::Error>> + Send;

  /// Persist `event` and return its newly assigned id.
  fn insert(
    &self,
    vehicle: &VehicleName,
    event: NewEvent,
  ) -> impl Future<Output = Result<EventId, Self::Error>> + Send;

  /// Replace every field of row `id`. Returns `false` if no such row exists.
  fn update(
    &self,
    vehicle: &VehicleName,
    id: EventId,
    event: NewEvent,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  /// Remove row `id`. Returns `false` if no such row exists.
  fn delete(
    &self,
    vehicle: &VehicleName,
    id: EventId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  /// Retrieve a row by id. Returns `None` if not found.
  fn get_by_id(
    &self,
    vehicle: &VehicleName,
    id: EventId,
  ) -> impl Future<Output = Result<Option<ExpenseEvent>, Self::Error>> + Send;

  /// Every row of the ledger, sorted by date (ties by id) in `order`.
  fn list_all(
    &self,
    vehicle: &VehicleName,
    order: SortOrder,
  ) -> impl Future<Output = Result<Vec<ExpenseEvent>, Self::Error>> + Send;

  /// Odometer reading of the most recent event that has one.
  fn last_odometer(
    &self,
    vehicle: &VehicleName,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send;
}
