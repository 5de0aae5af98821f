use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct PersonRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UnitTypeRequest {
    pub name: String,
    #[serde(default)]
    pub theme_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UnitRequest {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub unit_type_id: i64,
    #[serde(default)]
    pub parent_unit_id: Option<i64>,
    #[serde(default)]
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct JobTitleRequest {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub person_id: i64,
    pub unit_id: i64,
    pub job_title_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TerminateRequest {
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalAssignmentUpdate {
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
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub name: String,
    pub css_class_suffix: String,
    pub display_label: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub border_color: String,
    #[serde(default)]
    pub hover_shadow_color: Option<String>,
    #[serde(default = "default_border_width")]
    pub border_width: i64,
    #[serde(default = "default_border_style")]
    pub border_style: String,
    #[serde(default = "default_shadow_intensity")]
    pub hover_shadow_intensity: f64,
    #[serde(default)]
    pub high_contrast_mode: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CloneThemeRequest {
    pub name: String,
}

fn default_true() -> bool {
    true
}

fn default_border_width() -> i64 {
    2
}

fn default_border_style() -> String {
    "solid".to_string()
}

fn default_shadow_intensity() -> f64 {
    0.25
}
