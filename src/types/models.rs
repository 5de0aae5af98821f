use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{
    FieldError, validate_css_color, validate_css_identifier, validate_email, validate_phone,
    validate_url,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "cannot be empty"));
        }
        if let Some(website) = &self.website {
            if let Err(e) = validate_url("website", website) {
                errors.push(e);
            }
        }
        if let Some(email) = &self.email {
            if let Err(e) = validate_email("email", email) {
                errors.push(e);
            }
        }
        if let Some(phone) = &self.phone {
            if let Err(e) = validate_phone("phone", phone) {
                errors.push(e);
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("first_name", "cannot be empty"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("last_name", "cannot be empty"));
        }
        if let Some(email) = &self.email {
            if let Err(e) = validate_email("email", email) {
                errors.push(e);
            }
        }
        if let Some(phone) = &self.phone {
            if let Err(e) = validate_phone("phone", phone) {
                errors.push(e);
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitType {
    pub id: i64,
    pub name: String,
    /// Theme applied to units of this type; falls back to the default
    /// theme when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub unit_type_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_unit_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One version of a person-unit-role assignment. Versions of the same
/// business key (person, unit, job title) share contiguous version numbers
/// starting at 1; at most one of them is current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub person_id: i64,
    pub unit_id: i64,
    pub job_title_id: i64,
    pub version: i64,
    /// Fraction of full time, in (0, 1].
    pub percentage: f64,
    pub is_ad_interim: bool,
    pub is_unit_boss: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate for `create_or_update`: everything the caller controls.
/// Version, current flag and validity end are owned by the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentCandidate {
    pub person_id: i64,
    pub unit_id: i64,
    pub job_title_id: i64,
    pub percentage: f64,
    #[serde(default)]
    pub is_ad_interim: bool,
    #[serde(default)]
    pub is_unit_boss: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
}

impl AssignmentCandidate {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for (field, id) in [
            ("person_id", self.person_id),
            ("unit_id", self.unit_id),
            ("job_title_id", self.job_title_id),
        ] {
            if id <= 0 {
                errors.push(FieldError::new(field, "must be a positive id"));
            }
        }
        if !(self.percentage > 0.0 && self.percentage <= 1.0) {
            errors.push(FieldError::new(
                "percentage",
                "must be greater than 0 and at most 1.0",
            ));
        }
        errors
    }

    pub fn into_row(self, version: i64, now: DateTime<Utc>) -> Assignment {
        Assignment {
            id: 0,
            person_id: self.person_id,
            unit_id: self.unit_id,
            job_title_id: self.job_title_id,
            version,
            percentage: self.percentage,
            is_ad_interim: self.is_ad_interim,
            is_unit_boss: self.is_unit_boss,
            notes: self.notes,
            flags: self.flags,
            valid_from: self.valid_from,
            valid_to: None,
            is_current: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The eight CSS border styles a theme may use.
pub const BORDER_STYLES: &[&str] = &[
    "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];

pub const MAX_BORDER_WIDTH: i64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTypeTheme {
    pub id: i64,
    pub name: String,
    /// Appended to `unit-` to form the generated CSS class.
    pub css_class_suffix: String,
    pub display_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_shadow_color: Option<String>,
    pub border_width: i64,
    pub border_style: String,
    pub hover_shadow_intensity: f64,
    pub high_contrast_mode: bool,
    pub is_default: bool,
    pub is_active: bool,
    pub datetime_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UnitTypeTheme {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "cannot be empty"));
        }
        if self.display_label.trim().is_empty() {
            errors.push(FieldError::new("display_label", "cannot be empty"));
        }
        if let Err(e) = validate_css_identifier("css_class_suffix", &self.css_class_suffix) {
            errors.push(e);
        }
        for (field, value) in [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
            ("text_color", &self.text_color),
            ("border_color", &self.border_color),
        ] {
            if let Err(e) = validate_css_color(field, value) {
                errors.push(e);
            }
        }
        if let Some(shadow) = &self.hover_shadow_color {
            if let Err(e) = validate_css_color("hover_shadow_color", shadow) {
                errors.push(e);
            }
        }
        if !(0..=MAX_BORDER_WIDTH).contains(&self.border_width) {
            errors.push(FieldError::new(
                "border_width",
                format!("must be between 0 and {MAX_BORDER_WIDTH}"),
            ));
        }
        if !BORDER_STYLES.contains(&self.border_style.as_str()) {
            errors.push(FieldError::new(
                "border_style",
                format!("must be one of: {}", BORDER_STYLES.join(", ")),
            ));
        }
        if !(0.0..=1.0).contains(&self.hover_shadow_intensity) {
            errors.push(FieldError::new(
                "hover_shadow_intensity",
                "must be between 0.0 and 1.0",
            ));
        }
        errors
    }
}

/// A theme handed out by the repository, tagged with where it came from.
/// `EmergencyFallback` is never persisted; it exists so rendering paths
/// always have usable visual properties even when the store is down.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", content = "theme", rename_all = "snake_case")]
pub enum ThemeSource {
    Persisted(UnitTypeTheme),
    EmergencyFallback(UnitTypeTheme),
}

impl ThemeSource {
    pub fn theme(&self) -> &UnitTypeTheme {
        match self {
            ThemeSource::Persisted(t) | ThemeSource::EmergencyFallback(t) => t,
        }
    }

    pub fn into_theme(self) -> UnitTypeTheme {
        match self {
            ThemeSource::Persisted(t) | ThemeSource::EmergencyFallback(t) => t,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ThemeSource::EmergencyFallback(_))
    }
}
