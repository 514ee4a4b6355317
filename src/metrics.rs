//! Per-category health metric schemas and form validation.
//!
//! Field order matters: the remote model reads the submitted values
//! positionally, so records always serialize in schema order.

use crate::errors::AppError;
use crate::models::DiseaseCategory;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// One input of a metrics form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Value the form pre-selects, if any.
    pub default: Option<f64>,
}

const fn free(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        min: None,
        max: None,
        default: None,
    }
}

const fn choice(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        min: Some(min),
        max: Some(max),
        default: Some(default),
    }
}

const DIABETES_FIELDS: [FieldSpec; 8] = [
    choice("Pregnancies", "Number of Pregnancies", 0.0, 20.0, 0.0),
    choice("Glucose", "Glucose Level (mg/dL)", 0.0, 300.0, 100.0),
    choice("BloodPressure", "Blood Pressure (mm Hg)", 0.0, 200.0, 80.0),
    choice("SkinThickness", "Skin Thickness (mm)", 0.0, 100.0, 20.0),
    choice("Insulin", "Insulin Level (μU/mL)", 0.0, 900.0, 80.0),
    choice("BMI", "BMI (Body Mass Index)", 0.0, 70.0, 25.0),
    choice("DiabetesPedigreeFunction", "Diabetes Pedigree Function", 0.0, 2.5, 0.5),
    choice("Age", "Age (years)", 1.0, 120.0, 30.0),
];

const HEART_FIELDS: [FieldSpec; 13] = [
    free("age", "Age"),
    choice("sex", "Sex", 0.0, 1.0, 1.0),
    choice("cp", "Chest Pain Type", 0.0, 3.0, 0.0),
    free("trestbps", "Resting Blood Pressure (mm Hg)"),
    free("chol", "Cholesterol (mg/dl)"),
    choice("fbs", "Fasting Blood Sugar >120 mg/dl", 0.0, 1.0, 0.0),
    choice("restecg", "Resting ECG Results", 0.0, 2.0, 0.0),
    free("thalach", "Maximum Heart Rate"),
    choice("exang", "Exercise Induced Angina", 0.0, 1.0, 0.0),
    free("oldpeak", "ST Depression"),
    choice("slope", "Slope of Peak Exercise ST", 0.0, 2.0, 0.0),
    choice("ca", "Number of Major Vessels (0-3)", 0.0, 3.0, 0.0),
    choice("thal", "Thalassemia", 0.0, 2.0, 0.0),
];

const KIDNEY_FIELDS: [FieldSpec; 24] = [
    free("age", "Age"),
    free("bp", "Blood Pressure (mm Hg)"),
    choice("sg", "Specific Gravity", 1.005, 1.025, 1.020),
    choice("al", "Albumin (0-5)", 0.0, 5.0, 0.0),
    choice("su", "Sugar (0-5)", 0.0, 5.0, 0.0),
    choice("rbc", "Red Blood Cells", 0.0, 1.0, 1.0),
    choice("pc", "Pus Cell", 0.0, 1.0, 0.0),
    choice("pcc", "Pus Cell Clumps", 0.0, 1.0, 0.0),
    choice("ba", "Bacteria", 0.0, 1.0, 0.0),
    free("bgr", "Blood Glucose Random (mg/dl)"),
    free("bu", "Blood Urea (mg/dl)"),
    free("sc", "Serum Creatinine (mg/dl)"),
    free("sod", "Sodium (mEq/L)"),
    free("pot", "Potassium (mEq/L)"),
    free("hemo", "Hemoglobin (gms)"),
    free("pcv", "Packed Cell Volume"),
    free("wc", "White Blood Cell Count"),
    free("rc", "Red Blood Cell Count"),
    choice("htn", "Hypertension", 0.0, 1.0, 0.0),
    choice("dm", "Diabetes Mellitus", 0.0, 1.0, 0.0),
    choice("cad", "Coronary Artery Disease", 0.0, 1.0, 0.0),
    choice("appet", "Appetite", 0.0, 1.0, 1.0),
    choice("pe", "Pedal Edema", 0.0, 1.0, 0.0),
    choice("ane", "Anemia", 0.0, 1.0, 0.0),
];

/// Ordered field list for a category.
pub fn schema(category: DiseaseCategory) -> &'static [FieldSpec] {
    match category {
        DiseaseCategory::Diabetes => &DIABETES_FIELDS,
        DiseaseCategory::Heart => &HEART_FIELDS,
        DiseaseCategory::Kidney => &KIDNEY_FIELDS,
    }
}

/// Pre-filled form values, as strings the way a form holds them.
pub fn form_defaults(category: DiseaseCategory) -> HashMap<String, String> {
    schema(category)
        .iter()
        .filter_map(|f| f.default.map(|d| (f.name.to_string(), d.to_string())))
        .collect()
}

/// A complete, validated set of metrics for one category.
///
/// Only produced by [`validate`], so every schema field is present, finite and
/// in range. Values are never logged or persisted.
#[derive(Clone, PartialEq)]
pub struct HealthMetricsRecord {
    category: DiseaseCategory,
    values: Vec<f64>,
}

impl HealthMetricsRecord {
    pub fn category(&self) -> DiseaseCategory {
        self.category
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        schema(self.category)
            .iter()
            .position(|f| f.name == name)
            .map(|i| self.values[i])
    }

    /// `(field, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        schema(self.category)
            .iter()
            .zip(self.values.iter())
            .map(|(f, v)| (f.name, *v))
    }
}

// Keeps metric values out of logs.
impl std::fmt::Debug for HealthMetricsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMetricsRecord")
            .field("category", &self.category)
            .field("fields", &self.values.len())
            .finish()
    }
}

impl Serialize for HealthMetricsRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Validates raw form input against the category schema.
///
/// Fails closed on the first problem found: unknown fields first, then each
/// schema field in order (missing, blank, non-numeric, out of range).
pub fn validate(
    category: DiseaseCategory,
    raw: &HashMap<String, String>,
) -> Result<HealthMetricsRecord, AppError> {
    let fields = schema(category);

    let mut unexpected: Vec<&str> = raw
        .keys()
        .map(String::as_str)
        .filter(|k| !fields.iter().any(|f| f.name == *k))
        .collect();
    unexpected.sort_unstable();
    if let Some(name) = unexpected.first() {
        return Err(AppError::ValidationFailure(format!(
            "Unexpected field: {}",
            name
        )));
    }

    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let raw_value = raw.get(field.name).ok_or_else(|| {
            AppError::ValidationFailure(format!("Missing required field: {}", field.label))
        })?;
        let trimmed = raw_value.trim();
        if trimmed.is_empty() {
            return Err(AppError::ValidationFailure(format!(
                "{} is required",
                field.label
            )));
        }
        let value = trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                AppError::ValidationFailure(format!("{} must be a number", field.label))
            })?;
        if let (Some(min), Some(max)) = (field.min, field.max) {
            if value < min || value > max {
                return Err(AppError::ValidationFailure(format!(
                    "{} must be between {} and {}",
                    field.label, min, max
                )));
            }
        }
        values.push(value);
    }

    Ok(HealthMetricsRecord { category, values })
}
