use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// A registered vehicle of the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    /// Normalized plate, e.g. `ABC123`. Unique across the fleet.
    pub plate: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Load capacity in cubic meters.
    pub capacity_m3: rust_decimal::Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVehicle {
    pub plate: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub capacity_m3: rust_decimal::Decimal,
}

impl NewVehicle {
    /// Validates and normalizes the payload. The plate is uppercased and
    /// stripped of separators before the format check.
    pub fn validate(mut self) -> Result<Self> {
        self.plate = normalize_plate(&self.plate)?;
        if self.make.trim().is_empty() || self.model.trim().is_empty() {
            return Err(CoreError::validation(
                "Missing required fields: make, model",
            ));
        }
        if !(1950..=2100).contains(&self.year) {
            return Err(CoreError::validation(format!(
                "year {} out of range",
                self.year
            )));
        }
        if self.capacity_m3 <= rust_decimal::Decimal::ZERO {
            return Err(CoreError::invalid_quantity("capacity_m3 must be > 0"));
        }
        Ok(self)
    }
}

/// Uppercases a plate, strips spaces and dashes, and checks the
/// three-letters-three-digits format used on Colombian cargo plates.
pub fn normalize_plate(raw: &str) -> Result<String> {
    let plate: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect::<String>()
        .to_ascii_uppercase();

    let valid = plate.len() == 6
        && plate.chars().take(3).all(|c| c.is_ascii_alphabetic())
        && plate.chars().skip(3).all(|c| c.is_ascii_digit());

    if valid {
        Ok(plate)
    } else {
        Err(CoreError::invalid_plate(raw))
    }
}

/// A driver employed by the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    /// National document id. Unique.
    pub document_id: String,
    pub full_name: String,
    pub license_number: String,
    pub license_expires: NaiveDate,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDriver {
    pub document_id: String,
    pub full_name: String,
    pub license_number: String,
    pub license_expires: NaiveDate,
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewDriver {
    pub fn validate(self) -> Result<Self> {
        let mut missing = Vec::new();
        if self.document_id.trim().is_empty() {
            missing.push("document_id");
        }
        if self.full_name.trim().is_empty() {
            missing.push("full_name");
        }
        if self.license_number.trim().is_empty() {
            missing.push("license_number");
        }
        if !missing.is_empty() {
            return Err(CoreError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn vehicle_payload() -> NewVehicle {
        NewVehicle {
            plate: "abc-123".into(),
            make: "Kenworth".into(),
            model: "T880".into(),
            year: 2019,
            capacity_m3: Decimal::from(14),
        }
    }

    #[test]
    fn test_plate_normalization() {
        assert_eq!(normalize_plate("abc-123").unwrap(), "ABC123");
        assert_eq!(normalize_plate("XYZ 987").unwrap(), "XYZ987");
        assert!(normalize_plate("12ABC3").is_err());
        assert!(normalize_plate("ABCD12").is_err());
        assert!(normalize_plate("").is_err());
    }

    #[test]
    fn test_vehicle_validate_normalizes_plate() {
        let v = vehicle_payload().validate().unwrap();
        assert_eq!(v.plate, "ABC123");
    }

    #[test]
    fn test_vehicle_rejects_zero_capacity() {
        let mut payload = vehicle_payload();
        payload.capacity_m3 = Decimal::ZERO;
        let err = payload.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity(_)));
    }

    #[test]
    fn test_vehicle_rejects_bad_year() {
        let mut payload = vehicle_payload();
        payload.year = 1900;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_driver_missing_fields_are_listed() {
        let payload = NewDriver {
            document_id: "".into(),
            full_name: "".into(),
            license_number: "C2-991".into(),
            license_expires: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            phone: None,
        };
        let err = payload.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("document_id"));
        assert!(msg.contains("full_name"));
        assert!(!msg.contains("license_number"));
    }
}
