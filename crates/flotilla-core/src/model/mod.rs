//! Persisted domain entities and their creation payloads.
//!
//! Each entity has a full row struct (as stored) and a `New*` payload used
//! by create endpoints. Payloads validate themselves before they touch
//! storage; validation failures are client errors.

mod catalog;
mod fleet;
mod inspection;
mod payable;
mod trip;

pub use catalog::{Material, MaterialPrice, MaterialUnit, NewMaterial, NewMaterialPrice, NewProject, Project};
pub use fleet::{Driver, NewDriver, NewVehicle, Vehicle, normalize_plate};
pub use inspection::{ChecklistItem, Inspection, InspectionResult, NewInspection};
pub use payable::{AccountPayable, ImportRequest, ImportStatus, NewAccountPayable, PayableSource};
pub use trip::{FuelPurchase, NewFuelPurchase, NewTrip, Trip};
