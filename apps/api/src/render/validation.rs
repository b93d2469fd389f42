use thiserror::Error;

use crate::models::resume::ResumeRecord;

/// A required identity or contact field is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required field: {field}")]
pub struct ValidationError {
    /// JSON name of the offending field, as the form submits it.
    pub field: &'static str,
}

/// Fields that must be non-blank before any document work begins, in check order.
const REQUIRED_FIELDS: &[(&str, fn(&ResumeRecord) -> &str)] = &[
    ("firstName", |r| r.first_name.as_str()),
    ("lastName", |r| r.last_name.as_str()),
    ("email", |r| r.email.as_str()),
    ("phone", |r| r.phone.as_str()),
    ("city", |r| r.city.as_str()),
];

/// Checks the identity and contact fields. Reports the first missing one.
pub fn validate_record(record: &ResumeRecord) -> Result<(), ValidationError> {
    for &(field, get) in REQUIRED_FIELDS {
        if get(record).trim().is_empty() {
            return Err(ValidationError { field });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> ResumeRecord {
        ResumeRecord {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@b.com".to_string(),
            phone: "555-0100".to_string(),
            city: "London".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_passes() {
        assert!(validate_record(&complete_record()).is_ok());
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        let cases: [(&str, fn(&mut ResumeRecord)); 5] = [
            ("firstName", |r| r.first_name.clear()),
            ("lastName", |r| r.last_name.clear()),
            ("email", |r| r.email.clear()),
            ("phone", |r| r.phone.clear()),
            ("city", |r| r.city.clear()),
        ];

        for (field, clear) in cases {
            let mut record = complete_record();
            clear(&mut record);
            assert_eq!(validate_record(&record), Err(ValidationError { field }));
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let mut record = complete_record();
        record.email = "   ".to_string();
        let err = validate_record(&record).unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.to_string(), "Missing required field: email");
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let record = ResumeRecord::default();
        assert_eq!(validate_record(&record).unwrap_err().field, "firstName");
    }
}
