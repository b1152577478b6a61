use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// State of one checklist item in a preoperational inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItem {
    Pass,
    Fail,
    NotApplicable,
}

/// Overall inspection outcome, derived from the checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionResult {
    Pass,
    Fail,
}

impl InspectionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            other => Err(CoreError::validation(format!(
                "unknown inspection result '{other}'"
            ))),
        }
    }
}

/// A daily preoperational vehicle inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    pub inspection_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    /// Item name -> state. BTreeMap keeps serialized output stable.
    pub checklist: BTreeMap<String, ChecklistItem>,
    pub result: InspectionResult,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInspection {
    pub inspection_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub checklist: BTreeMap<String, ChecklistItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewInspection {
    pub fn validate(self) -> Result<Self> {
        if self.checklist.is_empty() {
            return Err(CoreError::invalid_checklist("checklist has no items"));
        }
        if self.checklist.keys().any(|k| k.trim().is_empty()) {
            return Err(CoreError::invalid_checklist("blank checklist item name"));
        }
        Ok(self)
    }

    /// Any failed item fails the inspection as a whole.
    pub fn result(&self) -> InspectionResult {
        if self
            .checklist
            .values()
            .any(|item| *item == ChecklistItem::Fail)
        {
            InspectionResult::Fail
        } else {
            InspectionResult::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist(items: &[(&str, ChecklistItem)]) -> BTreeMap<String, ChecklistItem> {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn payload(items: &[(&str, ChecklistItem)]) -> NewInspection {
        NewInspection {
            inspection_date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            vehicle_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            checklist: checklist(items),
            notes: None,
        }
    }

    #[test]
    fn test_empty_checklist_rejected() {
        let err = payload(&[]).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidChecklist(_)));
    }

    #[test]
    fn test_blank_item_name_rejected() {
        let err = payload(&[("  ", ChecklistItem::Pass)]).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidChecklist(_)));
    }

    #[test]
    fn test_any_fail_fails_inspection() {
        let p = payload(&[
            ("brakes", ChecklistItem::Pass),
            ("lights", ChecklistItem::Fail),
            ("horn", ChecklistItem::NotApplicable),
        ]);
        assert_eq!(p.result(), InspectionResult::Fail);
    }

    #[test]
    fn test_not_applicable_does_not_fail() {
        let p = payload(&[
            ("brakes", ChecklistItem::Pass),
            ("horn", ChecklistItem::NotApplicable),
        ]);
        assert_eq!(p.result(), InspectionResult::Pass);
    }

    #[test]
    fn test_result_round_trip() {
        assert_eq!(InspectionResult::parse("pass").unwrap(), InspectionResult::Pass);
        assert_eq!(InspectionResult::parse("fail").unwrap(), InspectionResult::Fail);
        assert!(InspectionResult::parse("maybe").is_err());
    }
}
