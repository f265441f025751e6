//! Structured medical-record extraction.

use serde::{Deserialize, Serialize};

/// Fields extracted from a scanned medical record.
///
/// Every field is nullable: extraction is best effort and a missing value is
/// represented as `None`, never as free-form untyped data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalExtraction {
    /// Pet name as written on the record.
    #[serde(default)]
    pub pet_name: Option<String>,

    /// Date of the visit, ISO `YYYY-MM-DD`.
    #[serde(default)]
    pub date_of_visit: Option<String>,

    /// Diagnosis or summary.
    #[serde(default)]
    pub diagnosis: Option<String>,

    /// Medications or vaccines listed on the record.
    #[serde(default)]
    pub medications: Vec<String>,

    /// Next scheduled vaccination date, ISO `YYYY-MM-DD`.
    #[serde(default)]
    pub next_vaccination_date: Option<String>,

    /// Suggested reminder date (two weeks before the next vaccination).
    #[serde(default)]
    pub suggested_reminder_date: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_extraction_deserializes() {
        let extraction: MedicalExtraction = serde_json::from_str(
            r#"{"petName": "Buddy", "diagnosis": null, "medications": ["Rabies"]}"#,
        )
        .unwrap();

        assert_eq!(extraction.pet_name.as_deref(), Some("Buddy"));
        assert!(extraction.diagnosis.is_none());
        assert_eq!(extraction.medications, vec!["Rabies".to_string()]);
        assert!(extraction.next_vaccination_date.is_none());
    }
}
