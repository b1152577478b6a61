use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Unit of measure a material is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialUnit {
    CubicMeters,
    Tons,
    Units,
}

impl MaterialUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CubicMeters => "cubic_meters",
            Self::Tons => "tons",
            Self::Units => "units",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "cubic_meters" => Ok(Self::CubicMeters),
            "tons" => Ok(Self::Tons),
            "units" => Ok(Self::Units),
            other => Err(CoreError::validation(format!(
                "unknown material unit '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for MaterialUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable material (sand, gravel, fill dirt, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    /// Short unique code, e.g. `ARE-01`.
    pub code: String,
    pub name: String,
    pub unit: MaterialUnit,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaterial {
    pub code: String,
    pub name: String,
    pub unit: MaterialUnit,
}

impl NewMaterial {
    pub fn validate(mut self) -> Result<Self> {
        self.code = self.code.trim().to_ascii_uppercase();
        let mut missing = Vec::new();
        if self.code.is_empty() {
            missing.push("code");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
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

/// Price agreed for a material on a given project.
///
/// A material with at least one active price cannot be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrice {
    pub id: Uuid,
    pub material_id: Uuid,
    pub project_id: Uuid,
    pub unit_price: Decimal,
    pub effective_from: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaterialPrice {
    pub project_id: Uuid,
    pub unit_price: Decimal,
    pub effective_from: NaiveDate,
}

impl NewMaterialPrice {
    pub fn validate(self) -> Result<Self> {
        if self.unit_price <= Decimal::ZERO {
            return Err(CoreError::invalid_quantity("unit_price must be > 0"));
        }
        Ok(self)
    }
}

/// A client project trips and prices are billed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub code: String,
    pub name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl NewProject {
    pub fn validate(mut self) -> Result<Self> {
        self.code = self.code.trim().to_ascii_uppercase();
        let mut missing = Vec::new();
        if self.code.is_empty() {
            missing.push("code");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.client_name.trim().is_empty() {
            missing.push("client_name");
        }
        if !missing.is_empty() {
            return Err(CoreError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(CoreError::validation("end_date before start_date"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_unit_round_trip() {
        for unit in [
            MaterialUnit::CubicMeters,
            MaterialUnit::Tons,
            MaterialUnit::Units,
        ] {
            assert_eq!(MaterialUnit::parse(unit.as_str()).unwrap(), unit);
        }
        assert!(MaterialUnit::parse("liters").is_err());
    }

    #[test]
    fn test_material_code_is_uppercased() {
        let m = NewMaterial {
            code: " are-01 ".into(),
            name: "Arena de rio".into(),
            unit: MaterialUnit::CubicMeters,
        }
        .validate()
        .unwrap();
        assert_eq!(m.code, "ARE-01");
    }

    #[test]
    fn test_material_missing_fields() {
        let err = NewMaterial {
            code: "".into(),
            name: " ".into(),
            unit: MaterialUnit::Tons,
        }
        .validate()
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("code") && msg.contains("name"));
    }

    #[test]
    fn test_price_must_be_positive() {
        let err = NewMaterialPrice {
            project_id: Uuid::new_v4(),
            unit_price: Decimal::ZERO,
            effective_from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity(_)));
    }

    #[test]
    fn test_project_end_before_start() {
        let err = NewProject {
            code: "PRJ-9".into(),
            name: "Via El Retiro".into(),
            client_name: "Conconcreto".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()),
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("end_date"));
    }
}
