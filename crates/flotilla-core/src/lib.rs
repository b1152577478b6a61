pub mod error;
pub mod id;
pub mod model;

pub use error::{CoreError, ErrorCategory, Result};
pub use id::parse_id;
pub use model::{
    AccountPayable, ChecklistItem, Driver, FuelPurchase, ImportRequest, ImportStatus, Inspection,
    InspectionResult, Material, MaterialPrice, MaterialUnit, NewAccountPayable, NewDriver,
    NewFuelPurchase, NewInspection, NewMaterial, NewMaterialPrice, NewProject, NewTrip, NewVehicle,
    PayableSource, Project, Trip, Vehicle, normalize_plate,
};
