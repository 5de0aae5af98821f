//! Assignment versioning engine.
//!
//! Updating a current assignment never mutates it: the prior row is
//! deactivated (validity end stamped) and a successor row is inserted with
//! the next contiguous version number, inside one transaction. Terminating
//! deactivates without a successor. Historical rows are edited in place.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Assignment, AssignmentCandidate};
use crate::validation::FieldError;

/// Total current workload above this fraction is flagged as severe.
pub const WORKLOAD_WARNING_THRESHOLD: f64 = 1.5;

/// Total current workload above this fraction gets a milder advisory.
pub const WORKLOAD_ATTENTION_THRESHOLD: f64 = 1.2;

/// Interim roles above this fraction of full time get an advisory.
pub const INTERIM_WORKLOAD_THRESHOLD: f64 = 0.5;

pub struct AssignmentService {
    store: Arc<dyn Store>,
}

impl AssignmentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates version 1 when no current assignment exists for the business
    /// key, otherwise deactivates the current row and inserts the next
    /// version. Returns the persisted row together with non-blocking
    /// business-rule warnings.
    pub fn create_or_update(
        &self,
        candidate: AssignmentCandidate,
    ) -> Result<(Assignment, Vec<String>)> {
        let field_errors = candidate.validate();
        if !field_errors.is_empty() {
            return Err(Error::Validation(field_errors));
        }
        self.check_references(&candidate)?;

        let warnings = self.validate_rules(&candidate)?;

        let current = self.store.get_current_assignment(
            candidate.person_id,
            candidate.unit_id,
            candidate.job_title_id,
        )?;

        // A terminated business key keeps its history, so re-opening one
        // continues the version sequence instead of restarting at 1.
        let next_version = self
            .store
            .max_assignment_version(
                candidate.person_id,
                candidate.unit_id,
                candidate.job_title_id,
            )?
            .unwrap_or(0)
            + 1;

        let id = match current {
            None => {
                let row = candidate.into_row(next_version, Utc::now());
                self.store.insert_assignment(&row)?
            }
            Some(prior) => {
                let cutoff = candidate
                    .valid_from
                    .unwrap_or_else(|| Utc::now().date_naive());
                let row = candidate.into_row(next_version, Utc::now());
                self.store.insert_assignment_version(prior.id, cutoff, &row)?
            }
        };

        let persisted = self.store.get_assignment(id)?.ok_or(Error::NotFound)?;
        tracing::info!(
            assignment_id = persisted.id,
            version = persisted.version,
            "assignment version persisted"
        );
        Ok((persisted, warnings))
    }

    /// In-place edit of a historical row. Current rows are versioned and
    /// must go through `create_or_update`.
    pub fn update_historical(&self, assignment: &Assignment) -> Result<Assignment> {
        let existing = self
            .store
            .get_assignment(assignment.id)?
            .ok_or(Error::NotFound)?;
        if existing.is_current {
            return Err(Error::Conflict(
                "current assignments are versioned; use create_or_update".to_string(),
            ));
        }

        let mut field_errors = Vec::new();
        if !(assignment.percentage > 0.0 && assignment.percentage <= 1.0) {
            field_errors.push(FieldError::new(
                "percentage",
                "must be greater than 0 and at most 1.0",
            ));
        }
        if let (Some(from), Some(to)) = (assignment.valid_from, assignment.valid_to) {
            if to < from {
                field_errors.push(FieldError::new("valid_to", "cannot precede valid_from"));
            }
        }
        if !field_errors.is_empty() {
            return Err(Error::Validation(field_errors));
        }

        let mut row = assignment.clone();
        row.updated_at = Utc::now();
        self.store.update_assignment(&row)?;
        self.store.get_assignment(row.id)?.ok_or(Error::NotFound)
    }

    /// Ends the active row without creating a successor version.
    pub fn terminate(
        &self,
        assignment_id: i64,
        termination_date: Option<NaiveDate>,
    ) -> Result<Assignment> {
        let assignment = self
            .store
            .get_assignment(assignment_id)?
            .ok_or(Error::NotFound)?;
        if !assignment.is_current {
            return Err(Error::Conflict(
                "assignment is not the active version".to_string(),
            ));
        }

        let date = termination_date.unwrap_or_else(|| Utc::now().date_naive());
        if !self.store.terminate_assignment(assignment_id, date)? {
            return Err(Error::Conflict(
                "assignment is not the active version".to_string(),
            ));
        }

        tracing::info!(assignment_id, %date, "assignment terminated");
        self.store.get_assignment(assignment_id)?.ok_or(Error::NotFound)
    }

    /// All versions for a business key, newest first. Sequence integrity is
    /// checked and logged, never thrown: history must stay readable even
    /// when damaged.
    pub fn history(
        &self,
        person_id: i64,
        unit_id: i64,
        job_title_id: i64,
    ) -> Result<Vec<Assignment>> {
        let rows = self
            .store
            .list_assignment_versions(person_id, unit_id, job_title_id)?;

        let current_count = rows.iter().filter(|a| a.is_current).count();
        if current_count > 1 {
            tracing::warn!(
                person_id,
                unit_id,
                job_title_id,
                current_count,
                "assignment history has more than one current version"
            );
        }
        let mut versions: Vec<i64> = rows.iter().map(|a| a.version).collect();
        versions.sort_unstable();
        let contiguous = versions
            .iter()
            .enumerate()
            .all(|(i, v)| *v == i as i64 + 1);
        if !contiguous {
            tracing::warn!(
                person_id,
                unit_id,
                job_title_id,
                ?versions,
                "assignment version sequence has gaps"
            );
        }

        Ok(rows)
    }

    /// Non-blocking business-rule advisories for a candidate: a second role
    /// in the same unit, total current workload above 120% or 150%, and
    /// interim-role accumulation.
    pub fn validate_rules(&self, candidate: &AssignmentCandidate) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        let current = self
            .store
            .list_current_assignments_for_person(candidate.person_id)?;

        // The current row for this business key is about to be replaced, so
        // it does not count as an existing role or toward the total.
        let others: Vec<_> = current
            .iter()
            .filter(|a| {
                !(a.unit_id == candidate.unit_id && a.job_title_id == candidate.job_title_id)
            })
            .collect();

        let has_other_role_in_unit = others.iter().any(|a| a.unit_id == candidate.unit_id);
        if has_other_role_in_unit {
            warnings.push("person already holds another role in this unit".to_string());
        }

        let total: f64 = others.iter().map(|a| a.percentage).sum::<f64>() + candidate.percentage;
        if total > WORKLOAD_WARNING_THRESHOLD {
            warnings.push(format!(
                "total workload would reach {:.0}%, above the {:.0}% advisory threshold",
                total * 100.0,
                WORKLOAD_WARNING_THRESHOLD * 100.0
            ));
        } else if total > WORKLOAD_ATTENTION_THRESHOLD {
            warnings.push(format!(
                "total workload would reach {:.0}%, above the {:.0}% advisory threshold",
                total * 100.0,
                WORKLOAD_ATTENTION_THRESHOLD * 100.0
            ));
        }

        if candidate.is_ad_interim {
            if others.iter().any(|a| a.is_ad_interim) {
                warnings.push("person would hold multiple interim roles".to_string());
            }
            if candidate.percentage > INTERIM_WORKLOAD_THRESHOLD {
                warnings.push(format!(
                    "interim role at {:.0}%, above the {:.0}% advisory threshold for interim cover",
                    candidate.percentage * 100.0,
                    INTERIM_WORKLOAD_THRESHOLD * 100.0
                ));
            }
        }

        Ok(warnings)
    }

    /// Deletion is always permitted; the reason tells the caller how many
    /// sibling versions exist so it can warn the user.
    pub fn can_delete(&self, assignment_id: i64) -> Result<(bool, String)> {
        let assignment = self
            .store
            .get_assignment(assignment_id)?
            .ok_or(Error::NotFound)?;
        let siblings = self.store.count_assignment_versions(
            assignment.person_id,
            assignment.unit_id,
            assignment.job_title_id,
        )? - 1;

        let reason = if siblings > 0 {
            format!(
                "version {} of this assignment will be removed; {siblings} other version(s) remain",
                assignment.version
            )
        } else {
            "this is the only version; the assignment history will be removed".to_string()
        };
        Ok((true, reason))
    }

    /// Removes exactly one version row. The warning is populated when other
    /// versions of the same business key remain.
    pub fn delete(&self, assignment_id: i64) -> Result<(bool, Option<String>)> {
        let assignment = self
            .store
            .get_assignment(assignment_id)?
            .ok_or(Error::NotFound)?;
        let siblings = self.store.count_assignment_versions(
            assignment.person_id,
            assignment.unit_id,
            assignment.job_title_id,
        )? - 1;

        let deleted = self.store.delete_assignment(assignment_id)?;
        let warning = (deleted && siblings > 0).then(|| {
            format!("{siblings} other version(s) of this assignment still exist")
        });
        Ok((deleted, warning))
    }

    fn check_references(&self, candidate: &AssignmentCandidate) -> Result<()> {
        let mut missing = Vec::new();
        if !self.store.person_exists(candidate.person_id)? {
            missing.push(format!("person {} does not exist", candidate.person_id));
        }
        if !self.store.unit_exists(candidate.unit_id)? {
            missing.push(format!("unit {} does not exist", candidate.unit_id));
        }
        if !self.store.job_title_exists(candidate.job_title_id)? {
            missing.push(format!("job title {} does not exist", candidate.job_title_id));
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Referential(missing.join("; ")))
        }
    }
}
