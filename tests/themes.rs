mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use common::{test_store, theme_fixture};
use orgmap::css::CssCache;
use orgmap::error::Error;
use orgmap::store::Store;
use orgmap::themes::ThemeService;
use orgmap::types::{ThemeSource, UnitType};

fn service(store: Arc<dyn Store>) -> ThemeService {
    ThemeService::new(store, Arc::new(CssCache::new()))
}

#[test]
fn create_rejects_invalid_fields_as_a_list() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let mut theme = theme_fixture("Broken", "broken");
    theme.primary_color = "#ggg".to_string();
    theme.border_style = "wavy".to_string();
    theme.hover_shadow_intensity = 3.0;

    match themes.create(theme) {
        Err(Error::Validation(fields)) => {
            let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
            assert!(names.contains(&"primary_color"));
            assert!(names.contains(&"border_style"));
            assert!(names.contains(&"hover_shadow_intensity"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn default_flag_is_self_healing() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let mut a = theme_fixture("Alpha", "alpha");
    a.is_default = true;
    let (a, _) = themes.create(a).expect("create alpha");
    assert!(a.is_default);

    let mut b = theme_fixture("Beta", "beta");
    b.is_default = true;
    let (b, _) = themes.create(b).expect("create beta");
    assert!(b.is_default);

    let all = themes.list().expect("list");
    let defaults: Vec<_> = all.iter().filter(|t| t.is_default).collect();
    assert_eq!(defaults.len(), 1, "exactly one default");
    assert_eq!(defaults[0].id, b.id);

    let alpha = themes.get(a.id).expect("get alpha");
    assert!(!alpha.is_default);
}

#[test]
fn promoting_a_theme_via_update_demotes_the_prior_default() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let mut a = theme_fixture("Alpha", "alpha");
    a.is_default = true;
    let (a, _) = themes.create(a).expect("create alpha");

    let (b, _) = themes.create(theme_fixture("Beta", "beta")).expect("create beta");

    let mut promoted = b.clone();
    promoted.is_default = true;
    let (promoted, _) = themes.update(promoted).expect("promote beta");
    assert!(promoted.is_default);

    let all = themes.list().expect("list");
    let defaults: Vec<_> = all.iter().filter(|t| t.is_default).collect();
    assert_eq!(defaults.len(), 1, "exactly one default");
    assert_eq!(defaults[0].id, b.id);
    assert!(!themes.get(a.id).expect("get alpha").is_default);
}

#[test]
fn name_and_suffix_must_be_unique() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    themes
        .create(theme_fixture("Alpha", "alpha"))
        .expect("create alpha");

    let dup_name = theme_fixture("Alpha", "alpha-two");
    assert!(matches!(themes.create(dup_name), Err(Error::Conflict(_))));

    let dup_suffix = theme_fixture("Gamma", "alpha");
    assert!(matches!(themes.create(dup_suffix), Err(Error::Conflict(_))));

    // Updating a theme keeping its own name is not a conflict
    let (theme, _) = themes
        .create(theme_fixture("Delta", "delta"))
        .expect("create delta");
    let mut renamed = theme.clone();
    renamed.display_label = "Renamed".to_string();
    themes.update(renamed).expect("update keeps own name");
}

#[test]
fn delete_refuses_default_and_in_use_themes() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let mut default = theme_fixture("Default", "default-theme");
    default.is_default = true;
    let (default, _) = themes.create(default).expect("create default");

    match themes.delete(default.id) {
        Err(Error::Conflict(msg)) => assert!(msg.contains("default")),
        other => panic!("expected conflict, got {other:?}"),
    }

    let (used, _) = themes.create(theme_fixture("Used", "used")).expect("create used");
    for i in 0..3 {
        ts.store
            .create_unit_type(&UnitType {
                id: 0,
                name: format!("Type {i}"),
                theme_id: Some(used.id),
                created_at: Utc::now(),
            })
            .expect("create unit type");
    }

    match themes.delete(used.id) {
        Err(Error::Conflict(msg)) => assert!(msg.contains('3'), "message: {msg}"),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(themes.get_unit_types_using_theme(used.id).expect("usage").len(), 3);

    // Unreferenced non-default themes delete fine
    let (loose, _) = themes.create(theme_fixture("Loose", "loose")).expect("create");
    assert!(themes.delete(loose.id).expect("delete"));
}

#[test]
fn default_theme_is_synthesized_when_missing() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let resolved = themes.get_default_theme();
    assert!(!resolved.is_fallback(), "should persist, not fall back");
    let first = resolved.into_theme();
    assert!(first.is_default);
    assert_eq!(first.css_class_suffix, "organizational");

    // Second call finds the persisted row instead of synthesizing again
    let second = themes.get_default_theme().into_theme();
    assert_eq!(second.id, first.id);
    assert_eq!(themes.list().expect("list").len(), 1);
}

#[test]
fn fallback_resolution_always_yields_a_theme() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let mut inactive = theme_fixture("Sleepy", "sleepy");
    inactive.is_active = false;
    let (inactive, _) = themes.create(inactive).expect("create inactive");

    // None, unknown id, and inactive id all resolve to the default
    for reference in [None, Some(9999), Some(inactive.id)] {
        let resolved = themes.get_theme_with_fallback(reference);
        let theme = resolved.theme();
        assert!(theme.is_default, "reference {reference:?} should fall back");
    }

    let (real, _) = themes.create(theme_fixture("Real", "real")).expect("create");
    let resolved = themes.get_theme_with_fallback(Some(real.id));
    assert!(matches!(resolved, ThemeSource::Persisted(_)));
    assert_eq!(resolved.theme().id, real.id);
}

#[test]
fn clone_derives_suffix_and_never_copies_default() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let mut source = theme_fixture("Source", "source");
    source.is_default = true;
    let (source, _) = themes.create(source).expect("create source");

    let copy = themes.clone_theme(source.id, "Copy One").expect("clone");
    assert_eq!(copy.css_class_suffix, "source-copy");
    assert!(!copy.is_default);
    assert_eq!(copy.primary_color, source.primary_color);

    // A second clone of the same source gets a distinct suffix
    let copy2 = themes.clone_theme(source.id, "Copy Two").expect("clone again");
    assert_eq!(copy2.css_class_suffix, "source-copy-2");

    assert!(matches!(
        themes.clone_theme(source.id, "Copy One"),
        Err(Error::Conflict(_))
    ));
}

#[test]
fn clone_rejects_a_derived_suffix_past_the_length_cap() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    // 48 characters is valid on its own; "-copy" pushes it past 50
    let long_suffix = "a".repeat(48);
    let (source, _) = themes
        .create(theme_fixture("Long", &long_suffix))
        .expect("create source");

    match themes.clone_theme(source.id, "Long Copy") {
        Err(Error::Validation(fields)) => {
            assert!(fields.iter().any(|f| f.field == "css_class_suffix"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(themes.list().expect("list").len(), 1, "nothing persisted");
}

#[test]
fn contrast_warnings_do_not_block() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let mut low_contrast = theme_fixture("Pale", "pale");
    low_contrast.primary_color = "#eeeeee".to_string();
    low_contrast.text_color = "#ffffff".to_string();

    let (created, warnings) = themes.create(low_contrast).expect("create succeeds");
    assert!(created.id > 0);
    assert!(
        warnings.iter().any(|w| w.contains("contrast")),
        "warnings: {warnings:?}"
    );
}

#[test]
fn stylesheet_is_cached_until_a_theme_mutation() {
    let ts = test_store();
    let cache = Arc::new(CssCache::with_ttl(Duration::from_secs(3600)));
    let themes = ThemeService::new(ts.store.clone(), cache.clone());

    let (theme, _) = themes.create(theme_fixture("Cached", "cached")).expect("create");

    let first = themes.generate_dynamic_css().expect("generate");
    assert!(first.contains(".unit-cached"));
    assert_eq!(cache.entry_count(), 1);

    let again = themes.generate_dynamic_css().expect("cached");
    assert_eq!(first, again);

    // Mutation clears the cache and the new content shows up immediately
    let mut updated = theme.clone();
    updated.border_color = "#ff0000".to_string();
    themes.update(updated).expect("update");
    assert_eq!(cache.entry_count(), 0);

    let regenerated = themes.generate_dynamic_css().expect("regenerate");
    assert!(regenerated.contains("#ff0000"));
}

#[test]
fn empty_theme_set_serves_fallback_css() {
    let ts = test_store();
    let themes = service(ts.store.clone());

    let css = themes.generate_dynamic_css().expect("generate");
    assert!(css.contains(".unit-organizational"));
    assert!(css.contains("Fallback"));

    let minified = themes.generate_dynamic_css_minified().expect("minified");
    assert!(!minified.contains("Fallback"), "comments are stripped");
    assert!(minified.contains(".unit-organizational"));
    assert!(minified.len() < css.len());
}
