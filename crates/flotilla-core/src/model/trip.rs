use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// A single haul: vehicle + driver moving a material for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub trip_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub material_id: Uuid,
    pub project_id: Uuid,
    /// Quantity hauled, in the material's unit.
    pub quantity: Decimal,
    /// Unit price agreed for this trip (copied from the material price at
    /// creation time so later price changes do not rewrite history).
    pub unit_price: Decimal,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Billed total for the trip.
    pub fn total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrip {
    pub trip_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub material_id: Uuid,
    pub project_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl NewTrip {
    pub fn validate(self) -> Result<Self> {
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::invalid_quantity("quantity must be > 0"));
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(CoreError::invalid_quantity("unit_price must be > 0"));
        }
        Ok(self)
    }
}

/// A fuel purchase for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelPurchase {
    pub id: Uuid,
    pub purchase_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub gallons: Decimal,
    pub total_cost: Decimal,
    pub station: String,
    pub invoice_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FuelPurchase {
    /// Cost per gallon, if gallons is nonzero.
    pub fn unit_cost(&self) -> Option<Decimal> {
        if self.gallons.is_zero() {
            None
        } else {
            Some(self.total_cost / self.gallons)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFuelPurchase {
    pub purchase_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub gallons: Decimal,
    pub total_cost: Decimal,
    pub station: String,
    #[serde(default)]
    pub invoice_number: Option<String>,
}

impl NewFuelPurchase {
    pub fn validate(self) -> Result<Self> {
        if self.gallons <= Decimal::ZERO {
            return Err(CoreError::invalid_quantity("gallons must be > 0"));
        }
        if self.total_cost <= Decimal::ZERO {
            return Err(CoreError::invalid_quantity("total_cost must be > 0"));
        }
        if self.station.trim().is_empty() {
            return Err(CoreError::validation("Missing required fields: station"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip_payload() -> NewTrip {
        NewTrip {
            trip_date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            vehicle_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            material_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            quantity: Decimal::new(125, 1), // 12.5
            unit_price: Decimal::from(48_000),
            remarks: None,
        }
    }

    #[test]
    fn test_trip_quantity_must_be_positive() {
        let mut payload = trip_payload();
        payload.quantity = Decimal::ZERO;
        assert!(matches!(
            payload.validate().unwrap_err(),
            CoreError::InvalidQuantity(_)
        ));
    }

    #[test]
    fn test_trip_total() {
        let trip = Trip {
            id: Uuid::new_v4(),
            trip_date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            vehicle_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            material_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            quantity: Decimal::new(125, 1),
            unit_price: Decimal::from(48_000),
            remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(trip.total(), Decimal::from(600_000));
    }

    #[test]
    fn test_fuel_unit_cost() {
        let purchase = FuelPurchase {
            id: Uuid::new_v4(),
            purchase_date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            vehicle_id: Uuid::new_v4(),
            gallons: Decimal::from(20),
            total_cost: Decimal::from(320_000),
            station: "Terpel La Y".into(),
            invoice_number: None,
            created_at: Utc::now(),
        };
        assert_eq!(purchase.unit_cost(), Some(Decimal::from(16_000)));
    }

    #[test]
    fn test_fuel_requires_station() {
        let err = NewFuelPurchase {
            purchase_date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            vehicle_id: Uuid::new_v4(),
            gallons: Decimal::from(20),
            total_cost: Decimal::from(320_000),
            station: "  ".into(),
            invoice_number: None,
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("station"));
    }
}
