#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use orgmap::store::{SqliteStore, Store};
use orgmap::types::{JobTitle, Person, Unit, UnitType, UnitTypeTheme};

pub struct TestStore {
    pub temp_dir: TempDir,
    pub store: Arc<SqliteStore>,
}

pub fn test_store() -> TestStore {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = SqliteStore::new(temp_dir.path().join("orgmap.db")).expect("open store");
    store.initialize().expect("initialize schema");
    TestStore {
        temp_dir,
        store: Arc::new(store),
    }
}

pub struct Fixture {
    pub person_id: i64,
    pub other_person_id: i64,
    pub unit_id: i64,
    pub other_unit_id: i64,
    pub job_title_id: i64,
    pub other_job_title_id: i64,
}

/// Seeds the reference rows an assignment needs: two persons, two units
/// (sharing one unit type), two job titles.
pub fn seed_org(store: &dyn Store) -> Fixture {
    let now = Utc::now();

    let person_id = store
        .create_person(&Person {
            id: 0,
            first_name: "Ada".to_string(),
            last_name: "Rossi".to_string(),
            email: Some("ada.rossi@example.com".to_string()),
            phone: None,
            is_active: true,
            created_at: now,
        })
        .expect("create person");
    let other_person_id = store
        .create_person(&Person {
            id: 0,
            first_name: "Bruno".to_string(),
            last_name: "Bianchi".to_string(),
            email: None,
            phone: None,
            is_active: true,
            created_at: now,
        })
        .expect("create person");

    let unit_type_id = store
        .create_unit_type(&UnitType {
            id: 0,
            name: "Department".to_string(),
            theme_id: None,
            created_at: now,
        })
        .expect("create unit type");

    let unit_id = store
        .create_unit(&Unit {
            id: 0,
            name: "Engineering".to_string(),
            short_name: Some("ENG".to_string()),
            unit_type_id,
            parent_unit_id: None,
            company_id: None,
            created_at: now,
        })
        .expect("create unit");
    let other_unit_id = store
        .create_unit(&Unit {
            id: 0,
            name: "Operations".to_string(),
            short_name: Some("OPS".to_string()),
            unit_type_id,
            parent_unit_id: None,
            company_id: None,
            created_at: now,
        })
        .expect("create unit");

    let job_title_id = store
        .create_job_title(&JobTitle {
            id: 0,
            name: "Engineer".to_string(),
            short_name: None,
            created_at: now,
        })
        .expect("create job title");
    let other_job_title_id = store
        .create_job_title(&JobTitle {
            id: 0,
            name: "Manager".to_string(),
            short_name: None,
            created_at: now,
        })
        .expect("create job title");

    Fixture {
        person_id,
        other_person_id,
        unit_id,
        other_unit_id,
        job_title_id,
        other_job_title_id,
    }
}

/// A valid theme with every field populated; tweak what the test needs.
pub fn theme_fixture(name: &str, suffix: &str) -> UnitTypeTheme {
    let now = Utc::now();
    UnitTypeTheme {
        id: 0,
        name: name.to_string(),
        css_class_suffix: suffix.to_string(),
        display_label: format!("{name} Unit"),
        icon: Some("🏢".to_string()),
        primary_color: "#ffffff".to_string(),
        secondary_color: "#f8f9fa".to_string(),
        text_color: "#212529".to_string(),
        border_color: "#0d6efd".to_string(),
        hover_shadow_color: Some("#0d6efd".to_string()),
        border_width: 2,
        border_style: "solid".to_string(),
        hover_shadow_intensity: 0.25,
        high_contrast_mode: false,
        is_default: false,
        is_active: true,
        datetime_updated: now,
        created_at: now,
    }
}
