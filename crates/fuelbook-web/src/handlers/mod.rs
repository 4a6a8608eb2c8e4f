pub mod charts;
pub mod events;
pub mod ledger;
pub mod vehicles;

use axum::response::Redirect;
use fuelbook_core::vehicle::VehicleName;

/// 303 back to the ledger page of `vehicle`.
pub(super) fn to_ledger(vehicle: &VehicleName) -> Redirect {
  Redirect::to(&format!("/?vehicle={vehicle}"))
}
