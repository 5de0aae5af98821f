mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::NaiveDate;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Company operations
    fn create_company(&self, company: &Company) -> Result<i64>;
    fn get_company(&self, id: i64) -> Result<Option<Company>>;
    fn list_companies(&self) -> Result<Vec<Company>>;
    fn update_company(&self, company: &Company) -> Result<()>;
    fn delete_company(&self, id: i64) -> Result<bool>;

    // Person operations
    fn create_person(&self, person: &Person) -> Result<i64>;
    fn get_person(&self, id: i64) -> Result<Option<Person>>;
    fn list_persons(&self) -> Result<Vec<Person>>;
    fn update_person(&self, person: &Person) -> Result<()>;
    fn delete_person(&self, id: i64) -> Result<bool>;

    // Unit type operations
    fn create_unit_type(&self, unit_type: &UnitType) -> Result<i64>;
    fn get_unit_type(&self, id: i64) -> Result<Option<UnitType>>;
    fn list_unit_types(&self) -> Result<Vec<UnitType>>;
    fn list_unit_types_by_theme(&self, theme_id: i64) -> Result<Vec<UnitType>>;
    fn count_unit_types_using_theme(&self, theme_id: i64) -> Result<i64>;
    fn update_unit_type(&self, unit_type: &UnitType) -> Result<()>;
    fn delete_unit_type(&self, id: i64) -> Result<bool>;

    // Unit operations
    fn create_unit(&self, unit: &Unit) -> Result<i64>;
    fn get_unit(&self, id: i64) -> Result<Option<Unit>>;
    fn list_units(&self) -> Result<Vec<Unit>>;
    fn update_unit(&self, unit: &Unit) -> Result<()>;
    fn delete_unit(&self, id: i64) -> Result<bool>;

    // Job title operations
    fn create_job_title(&self, job_title: &JobTitle) -> Result<i64>;
    fn get_job_title(&self, id: i64) -> Result<Option<JobTitle>>;
    fn list_job_titles(&self) -> Result<Vec<JobTitle>>;
    fn update_job_title(&self, job_title: &JobTitle) -> Result<()>;
    fn delete_job_title(&self, id: i64) -> Result<bool>;

    // Assignment operations
    fn insert_assignment(&self, assignment: &Assignment) -> Result<i64>;
    /// Deactivates the prior current row and inserts the successor in one
    /// transaction; either both happen or neither does.
    fn insert_assignment_version(
        &self,
        prior_id: i64,
        prior_valid_to: NaiveDate,
        successor: &Assignment,
    ) -> Result<i64>;
    fn get_assignment(&self, id: i64) -> Result<Option<Assignment>>;
    fn get_current_assignment(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<Option<Assignment>>;
    /// All versions for a business key, newest version first.
    fn list_assignment_versions(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<Vec<Assignment>>;
    fn count_assignment_versions(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<i64>;
    fn max_assignment_version(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<Option<i64>>;
    fn list_current_assignments_for_person(&self, person_id: i64) -> Result<Vec<Assignment>>;
    fn list_current_assignments_for_unit(&self, unit_id: i64) -> Result<Vec<Assignment>>;
    /// In-place update of a historical row; versioned updates go through
    /// `insert_assignment_version`.
    fn update_assignment(&self, assignment: &Assignment) -> Result<()>;
    /// Marks the row non-current with the given validity end. Returns false
    /// if the row was not the active one.
    fn terminate_assignment(&self, id: i64, valid_to: NaiveDate) -> Result<bool>;
    fn delete_assignment(&self, id: i64) -> Result<bool>;

    // Referential existence checks
    fn person_exists(&self, id: i64) -> Result<bool>;
    fn unit_exists(&self, id: i64) -> Result<bool>;
    fn job_title_exists(&self, id: i64) -> Result<bool>;

    // Theme operations
    /// When `theme.is_default` is set, every other theme is demoted in the
    /// same transaction, keeping the single-default invariant.
    fn create_theme(&self, theme: &UnitTypeTheme) -> Result<i64>;
    fn get_theme(&self, id: i64) -> Result<Option<UnitTypeTheme>>;
    fn get_theme_by_name(&self, name: &str) -> Result<Option<UnitTypeTheme>>;
    fn get_theme_by_suffix(&self, suffix: &str) -> Result<Option<UnitTypeTheme>>;
    fn list_themes(&self) -> Result<Vec<UnitTypeTheme>>;
    fn list_active_themes(&self) -> Result<Vec<UnitTypeTheme>>;
    fn get_default_theme_row(&self) -> Result<Option<UnitTypeTheme>>;
    /// Same demotion semantics as `create_theme`, excluding the theme's own
    /// row.
    fn update_theme(&self, theme: &UnitTypeTheme) -> Result<()>;
    fn delete_theme(&self, id: i64) -> Result<bool>;
}
