use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::error!("Invalid date in database: '{}' - {}", s, e);
            None
        }
    }
}

fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

// Row-to-struct mapping happens here, at the persistence boundary; nothing
// row-shaped leaks into the services.

const COMPANY_COLS: &str = "id, name, website, email, phone, is_active, created_at";

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        website: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        is_active: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const PERSON_COLS: &str = "id, first_name, last_name, email, phone, is_active, created_at";

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        is_active: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const UNIT_TYPE_COLS: &str = "id, name, theme_id, created_at";

fn unit_type_from_row(row: &Row<'_>) -> rusqlite::Result<UnitType> {
    Ok(UnitType {
        id: row.get(0)?,
        name: row.get(1)?,
        theme_id: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

const UNIT_COLS: &str = "id, name, short_name, unit_type_id, parent_unit_id, company_id, created_at";

fn unit_from_row(row: &Row<'_>) -> rusqlite::Result<Unit> {
    Ok(Unit {
        id: row.get(0)?,
        name: row.get(1)?,
        short_name: row.get(2)?,
        unit_type_id: row.get(3)?,
        parent_unit_id: row.get(4)?,
        company_id: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const JOB_TITLE_COLS: &str = "id, name, short_name, created_at";

fn job_title_from_row(row: &Row<'_>) -> rusqlite::Result<JobTitle> {
    Ok(JobTitle {
        id: row.get(0)?,
        name: row.get(1)?,
        short_name: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

const ASSIGNMENT_COLS: &str = "id, person_id, unit_id, job_title_id, version, percentage, \
     is_ad_interim, is_unit_boss, notes, flags, valid_from, valid_to, is_current, created_at, \
     updated_at";

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id: row.get(0)?,
        person_id: row.get(1)?,
        unit_id: row.get(2)?,
        job_title_id: row.get(3)?,
        version: row.get(4)?,
        percentage: row.get(5)?,
        is_ad_interim: row.get(6)?,
        is_unit_boss: row.get(7)?,
        notes: row.get(8)?,
        flags: row.get(9)?,
        valid_from: row.get::<_, Option<String>>(10)?.and_then(|s| parse_date(&s)),
        valid_to: row.get::<_, Option<String>>(11)?.and_then(|s| parse_date(&s)),
        is_current: row.get(12)?,
        created_at: parse_datetime(&row.get::<_, String>(13)?),
        updated_at: parse_datetime(&row.get::<_, String>(14)?),
    })
}

const THEME_COLS: &str = "id, name, css_class_suffix, display_label, icon, primary_color, \
     secondary_color, text_color, border_color, hover_shadow_color, border_width, border_style, \
     hover_shadow_intensity, high_contrast_mode, is_default, is_active, datetime_updated, \
     created_at";

fn theme_from_row(row: &Row<'_>) -> rusqlite::Result<UnitTypeTheme> {
    Ok(UnitTypeTheme {
        id: row.get(0)?,
        name: row.get(1)?,
        css_class_suffix: row.get(2)?,
        display_label: row.get(3)?,
        icon: row.get(4)?,
        primary_color: row.get(5)?,
        secondary_color: row.get(6)?,
        text_color: row.get(7)?,
        border_color: row.get(8)?,
        hover_shadow_color: row.get(9)?,
        border_width: row.get(10)?,
        border_style: row.get(11)?,
        hover_shadow_intensity: row.get(12)?,
        high_contrast_mode: row.get(13)?,
        is_default: row.get(14)?,
        is_active: row.get(15)?,
        datetime_updated: parse_datetime(&row.get::<_, String>(16)?),
        created_at: parse_datetime(&row.get::<_, String>(17)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Company operations

    fn create_company(&self, company: &Company) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO companies (name, website, email, phone, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                company.name,
                company.website,
                company.email,
                company.phone,
                company.is_active,
                format_datetime(&company.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_company(&self, id: i64) -> Result<Option<Company>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {COMPANY_COLS} FROM companies WHERE id = ?1"),
            params![id],
            company_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_companies(&self) -> Result<Vec<Company>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {COMPANY_COLS} FROM companies ORDER BY name"))?;
        let rows = stmt.query_map([], company_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_company(&self, company: &Company) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE companies SET name = ?1, website = ?2, email = ?3, phone = ?4, is_active = ?5
             WHERE id = ?6",
            params![
                company.name,
                company.website,
                company.email,
                company.phone,
                company.is_active,
                company.id,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_company(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM companies WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Person operations

    fn create_person(&self, person: &Person) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO persons (first_name, last_name, email, phone, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                person.first_name,
                person.last_name,
                person.email,
                person.phone,
                person.is_active,
                format_datetime(&person.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_person(&self, id: i64) -> Result<Option<Person>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PERSON_COLS} FROM persons WHERE id = ?1"),
            params![id],
            person_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_persons(&self) -> Result<Vec<Person>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PERSON_COLS} FROM persons ORDER BY last_name, first_name"
        ))?;
        let rows = stmt.query_map([], person_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_person(&self, person: &Person) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE persons SET first_name = ?1, last_name = ?2, email = ?3, phone = ?4,
             is_active = ?5 WHERE id = ?6",
            params![
                person.first_name,
                person.last_name,
                person.email,
                person.phone,
                person.is_active,
                person.id,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_person(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM persons WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Unit type operations

    fn create_unit_type(&self, unit_type: &UnitType) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO unit_types (name, theme_id, created_at) VALUES (?1, ?2, ?3)",
            params![
                unit_type.name,
                unit_type.theme_id,
                format_datetime(&unit_type.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_unit_type(&self, id: i64) -> Result<Option<UnitType>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {UNIT_TYPE_COLS} FROM unit_types WHERE id = ?1"),
            params![id],
            unit_type_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_unit_types(&self) -> Result<Vec<UnitType>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {UNIT_TYPE_COLS} FROM unit_types ORDER BY name"))?;
        let rows = stmt.query_map([], unit_type_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_unit_types_by_theme(&self, theme_id: i64) -> Result<Vec<UnitType>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {UNIT_TYPE_COLS} FROM unit_types WHERE theme_id = ?1 ORDER BY name"
        ))?;
        let rows = stmt.query_map(params![theme_id], unit_type_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_unit_types_using_theme(&self, theme_id: i64) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM unit_types WHERE theme_id = ?1",
            params![theme_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
    }

    fn update_unit_type(&self, unit_type: &UnitType) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE unit_types SET name = ?1, theme_id = ?2 WHERE id = ?3",
            params![unit_type.name, unit_type.theme_id, unit_type.id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_unit_type(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM unit_types WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Unit operations

    fn create_unit(&self, unit: &Unit) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO units (name, short_name, unit_type_id, parent_unit_id, company_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                unit.name,
                unit.short_name,
                unit.unit_type_id,
                unit.parent_unit_id,
                unit.company_id,
                format_datetime(&unit.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_unit(&self, id: i64) -> Result<Option<Unit>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {UNIT_COLS} FROM units WHERE id = ?1"),
            params![id],
            unit_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_units(&self) -> Result<Vec<Unit>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {UNIT_COLS} FROM units ORDER BY name"))?;
        let rows = stmt.query_map([], unit_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_unit(&self, unit: &Unit) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE units SET name = ?1, short_name = ?2, unit_type_id = ?3, parent_unit_id = ?4,
             company_id = ?5 WHERE id = ?6",
            params![
                unit.name,
                unit.short_name,
                unit.unit_type_id,
                unit.parent_unit_id,
                unit.company_id,
                unit.id,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_unit(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM units WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Job title operations

    fn create_job_title(&self, job_title: &JobTitle) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO job_titles (name, short_name, created_at) VALUES (?1, ?2, ?3)",
            params![
                job_title.name,
                job_title.short_name,
                format_datetime(&job_title.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_job_title(&self, id: i64) -> Result<Option<JobTitle>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {JOB_TITLE_COLS} FROM job_titles WHERE id = ?1"),
            params![id],
            job_title_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_job_titles(&self) -> Result<Vec<JobTitle>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {JOB_TITLE_COLS} FROM job_titles ORDER BY name"))?;
        let rows = stmt.query_map([], job_title_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_job_title(&self, job_title: &JobTitle) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE job_titles SET name = ?1, short_name = ?2 WHERE id = ?3",
            params![job_title.name, job_title.short_name, job_title.id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_job_title(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM job_titles WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Assignment operations

    fn insert_assignment(&self, assignment: &Assignment) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO assignments (person_id, unit_id, job_title_id, version, percentage,
             is_ad_interim, is_unit_boss, notes, flags, valid_from, valid_to, is_current,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                assignment.person_id,
                assignment.unit_id,
                assignment.job_title_id,
                assignment.version,
                assignment.percentage,
                assignment.is_ad_interim,
                assignment.is_unit_boss,
                assignment.notes,
                assignment.flags,
                assignment.valid_from.as_ref().map(format_date),
                assignment.valid_to.as_ref().map(format_date),
                assignment.is_current,
                format_datetime(&assignment.created_at),
                format_datetime(&assignment.updated_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_assignment_version(
        &self,
        prior_id: i64,
        prior_valid_to: NaiveDate,
        successor: &Assignment,
    ) -> Result<i64> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let deactivated = tx.execute(
            "UPDATE assignments SET is_current = 0, valid_to = ?1, updated_at = ?2
             WHERE id = ?3 AND is_current = 1",
            params![
                format_date(&prior_valid_to),
                format_datetime(&Utc::now()),
                prior_id
            ],
        )?;
        if deactivated == 0 {
            // Another writer already replaced this version; roll back.
            return Err(Error::Conflict(
                "assignment is no longer the current version".to_string(),
            ));
        }

        tx.execute(
            "INSERT INTO assignments (person_id, unit_id, job_title_id, version, percentage,
             is_ad_interim, is_unit_boss, notes, flags, valid_from, valid_to, is_current,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                successor.person_id,
                successor.unit_id,
                successor.job_title_id,
                successor.version,
                successor.percentage,
                successor.is_ad_interim,
                successor.is_unit_boss,
                successor.notes,
                successor.flags,
                successor.valid_from.as_ref().map(format_date),
                successor.valid_to.as_ref().map(format_date),
                successor.is_current,
                format_datetime(&successor.created_at),
                format_datetime(&successor.updated_at),
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(id)
    }

    fn get_assignment(&self, id: i64) -> Result<Option<Assignment>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {ASSIGNMENT_COLS} FROM assignments WHERE id = ?1"),
            params![id],
            assignment_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_current_assignment(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<Option<Assignment>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {ASSIGNMENT_COLS} FROM assignments
                 WHERE person_id = ?1 AND unit_id = ?2 AND job_title_id = ?3 AND is_current = 1"
            ),
            params![person_id, unit_id, job_title_id],
            assignment_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_assignment_versions(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<Vec<Assignment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLS} FROM assignments
             WHERE person_id = ?1 AND unit_id = ?2 AND job_title_id = ?3
             ORDER BY version DESC"
        ))?;
        let rows = stmt.query_map(params![person_id, unit_id, job_title_id], assignment_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_assignment_versions(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM assignments
             WHERE person_id = ?1 AND unit_id = ?2 AND job_title_id = ?3",
            params![person_id, unit_id, job_title_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
    }

    fn max_assignment_version(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT MAX(version) FROM assignments
             WHERE person_id = ?1 AND unit_id = ?2 AND job_title_id = ?3",
            params![person_id, unit_id, job_title_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
    }

    fn list_current_assignments_for_person(&self, person_id: i64) -> Result<Vec<Assignment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLS} FROM assignments
             WHERE person_id = ?1 AND is_current = 1 ORDER BY unit_id, job_title_id"
        ))?;
        let rows = stmt.query_map(params![person_id], assignment_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_current_assignments_for_unit(&self, unit_id: i64) -> Result<Vec<Assignment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLS} FROM assignments
             WHERE unit_id = ?1 AND is_current = 1 ORDER BY person_id, job_title_id"
        ))?;
        let rows = stmt.query_map(params![unit_id], assignment_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_assignment(&self, assignment: &Assignment) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE assignments SET percentage = ?1, is_ad_interim = ?2, is_unit_boss = ?3,
             notes = ?4, flags = ?5, valid_from = ?6, valid_to = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                assignment.percentage,
                assignment.is_ad_interim,
                assignment.is_unit_boss,
                assignment.notes,
                assignment.flags,
                assignment.valid_from.as_ref().map(format_date),
                assignment.valid_to.as_ref().map(format_date),
                format_datetime(&assignment.updated_at),
                assignment.id,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn terminate_assignment(&self, id: i64, valid_to: NaiveDate) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE assignments SET is_current = 0, valid_to = ?1, updated_at = ?2
             WHERE id = ?3 AND is_current = 1",
            params![format_date(&valid_to), format_datetime(&Utc::now()), id],
        )?;
        Ok(rows > 0)
    }

    fn delete_assignment(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM assignments WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Referential existence checks

    fn person_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn();
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM persons WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn unit_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn();
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM units WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn job_title_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn();
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM job_titles WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    // Theme operations

    fn create_theme(&self, theme: &UnitTypeTheme) -> Result<i64> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // Demoting the old default and inserting the new one must not be
        // separable; a failure in between would leave no default at all.
        if theme.is_default {
            tx.execute("UPDATE unit_type_themes SET is_default = 0", [])?;
        }
        tx.execute(
            "INSERT INTO unit_type_themes (name, css_class_suffix, display_label, icon,
             primary_color, secondary_color, text_color, border_color, hover_shadow_color,
             border_width, border_style, hover_shadow_intensity, high_contrast_mode,
             is_default, is_active, datetime_updated, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                theme.name,
                theme.css_class_suffix,
                theme.display_label,
                theme.icon,
                theme.primary_color,
                theme.secondary_color,
                theme.text_color,
                theme.border_color,
                theme.hover_shadow_color,
                theme.border_width,
                theme.border_style,
                theme.hover_shadow_intensity,
                theme.high_contrast_mode,
                theme.is_default,
                theme.is_active,
                format_datetime(&theme.datetime_updated),
                format_datetime(&theme.created_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn get_theme(&self, id: i64) -> Result<Option<UnitTypeTheme>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {THEME_COLS} FROM unit_type_themes WHERE id = ?1"),
            params![id],
            theme_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_theme_by_name(&self, name: &str) -> Result<Option<UnitTypeTheme>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {THEME_COLS} FROM unit_type_themes WHERE name = ?1"),
            params![name],
            theme_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_theme_by_suffix(&self, suffix: &str) -> Result<Option<UnitTypeTheme>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {THEME_COLS} FROM unit_type_themes WHERE css_class_suffix = ?1"),
            params![suffix],
            theme_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_themes(&self) -> Result<Vec<UnitTypeTheme>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {THEME_COLS} FROM unit_type_themes ORDER BY is_default DESC, name"
        ))?;
        let rows = stmt.query_map([], theme_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_active_themes(&self) -> Result<Vec<UnitTypeTheme>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {THEME_COLS} FROM unit_type_themes WHERE is_active = 1
             ORDER BY is_default DESC, name"
        ))?;
        let rows = stmt.query_map([], theme_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_default_theme_row(&self) -> Result<Option<UnitTypeTheme>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {THEME_COLS} FROM unit_type_themes
                 WHERE is_default = 1 AND is_active = 1 LIMIT 1"
            ),
            [],
            theme_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_theme(&self, theme: &UnitTypeTheme) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        if theme.is_default {
            tx.execute(
                "UPDATE unit_type_themes SET is_default = 0 WHERE id != ?1",
                params![theme.id],
            )?;
        }
        let rows = tx.execute(
            "UPDATE unit_type_themes SET name = ?1, css_class_suffix = ?2, display_label = ?3,
             icon = ?4, primary_color = ?5, secondary_color = ?6, text_color = ?7,
             border_color = ?8, hover_shadow_color = ?9, border_width = ?10, border_style = ?11,
             hover_shadow_intensity = ?12, high_contrast_mode = ?13, is_default = ?14,
             is_active = ?15, datetime_updated = ?16 WHERE id = ?17",
            params![
                theme.name,
                theme.css_class_suffix,
                theme.display_label,
                theme.icon,
                theme.primary_color,
                theme.secondary_color,
                theme.text_color,
                theme.border_color,
                theme.hover_shadow_color,
                theme.border_width,
                theme.border_style,
                theme.hover_shadow_intensity,
                theme.high_contrast_mode,
                theme.is_default,
                theme.is_active,
                format_datetime(&theme.datetime_updated),
                theme.id,
            ],
        )?;
        if rows == 0 {
            // Rolls back the demotion above.
            return Err(Error::NotFound);
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_theme(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM unit_type_themes WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}
