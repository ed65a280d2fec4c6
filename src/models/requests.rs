use serde_json::{Map, Value};
use validator::Validate;
use crate::core::PredictionError;
use crate::models::domain::{RawRecord, FIELD_NAMES};

/// Parse a prediction request body into a `RawRecord`
///
/// Checks presence and JSON type of every field in declared order, then the
/// declared numeric ranges. The first failure is reported with its field name.
/// Categorical values are not checked here; the encoder owns that table.
pub fn parse_prediction_request(body: &Value) -> Result<RawRecord, PredictionError> {
    let fields = match body.as_object() {
        Some(fields) if !fields.is_empty() => fields,
        _ => return Err(PredictionError::validation("body", "No input data provided")),
    };

    let reader = FieldReader { fields };

    let record = RawRecord {
        hours_studied: reader.number("Hours_Studied")?,
        attendance: reader.integer("Attendance")?,
        parental_involvement: reader.category("Parental_Involvement")?,
        access_to_resources: reader.category("Access_to_Resources")?,
        extracurricular_activities: reader.flag("Extracurricular_Activities")?,
        sleep_hours: reader.number("Sleep_Hours")?,
        previous_scores: reader.integer("Previous_Scores")?,
        motivation_level: reader.category("Motivation_Level")?,
        internet_access: reader.flag("Internet_Access")?,
        tutoring_sessions: reader.integer("Tutoring_Sessions")?,
        family_income: reader.category("Family_Income")?,
        teacher_quality: reader.category("Teacher_Quality")?,
        school_type: reader.category("School_Type")?,
        peer_influence: reader.category("Peer_Influence")?,
        physical_activity: reader.integer("Physical_Activity")?,
        learning_disabilities: reader.flag("Learning_Disabilities")?,
        parental_education_level: reader.category("Parental_Education_Level")?,
        distance_from_home: reader.category("Distance_from_Home")?,
        gender: reader.category("Gender")?,
    };

    check_ranges(&record)?;
    Ok(record)
}

/// Run the `validator` range rules and report the first offending field in declared order
fn check_ranges(record: &RawRecord) -> Result<(), PredictionError> {
    let errors = match record.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };

    let failures: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Value out of range".to_string());
            (field.to_string(), reason)
        })
        .collect();

    let first = FIELD_NAMES.iter().find_map(|name| {
        failures
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, reason)| (*name, reason.clone()))
    });

    match first {
        Some((field, reason)) => Err(PredictionError::validation(field, reason)),
        None => Err(PredictionError::validation("body", errors.to_string())),
    }
}

/// Typed access to the fields of a JSON object
struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    fn get(&self, name: &str) -> Result<&'a Value, PredictionError> {
        match self.fields.get(name) {
            Some(Value::Null) | None => {
                Err(PredictionError::validation(name, "Missing required field"))
            }
            Some(value) => Ok(value),
        }
    }

    fn number(&self, name: &str) -> Result<f64, PredictionError> {
        self.get(name)?
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| PredictionError::validation(name, "Expected a number"))
    }

    fn integer(&self, name: &str) -> Result<i64, PredictionError> {
        let value = self.get(name)?;
        if let Some(v) = value.as_i64() {
            return Ok(v);
        }
        match value.as_f64() {
            Some(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
            Some(_) => Err(PredictionError::validation(name, "Expected a whole number")),
            None => Err(PredictionError::validation(name, "Expected a number")),
        }
    }

    /// Booleans arrive either as JSON booleans or as 0/1 from form submissions
    fn flag(&self, name: &str) -> Result<bool, PredictionError> {
        match self.get(name)? {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_f64() {
                Some(v) if v == 0.0 => Ok(false),
                Some(v) if v == 1.0 => Ok(true),
                _ => Err(PredictionError::validation(name, "Expected true/false or 0/1")),
            },
            _ => Err(PredictionError::validation(name, "Expected true/false or 0/1")),
        }
    }

    fn category(&self, name: &str) -> Result<String, PredictionError> {
        self.get(name)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PredictionError::validation(name, "Expected a string"))
    }
}
