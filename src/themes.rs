//! Theme repository: CRUD over unit type themes with uniqueness and
//! single-default enforcement, plus the cache-aware stylesheet entry point.
//!
//! Every write path runs the same explicit pipeline: structural field
//! validation, then uniqueness against the store, then referential checks.
//! Rendering paths must always get a usable theme, so default resolution
//! degrades through a persisted hard-coded default down to an in-memory
//! emergency fallback rather than failing.

use std::sync::Arc;

use chrono::Utc;

use crate::css::{self, CssCache};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{ThemeSource, UnitType, UnitTypeTheme};
use crate::validation::{MIN_CONTRAST_RATIO, contrast_ratio};

pub struct ThemeService {
    store: Arc<dyn Store>,
    cache: Arc<CssCache>,
}

/// The hard-coded default, persisted on demand when no default exists.
fn default_theme_template() -> UnitTypeTheme {
    let now = Utc::now();
    UnitTypeTheme {
        id: 0,
        name: "Organizational".to_string(),
        css_class_suffix: "organizational".to_string(),
        display_label: "Organizational Unit".to_string(),
        icon: Some("🏢".to_string()),
        primary_color: "#ffffff".to_string(),
        secondary_color: "#f8f9fa".to_string(),
        text_color: "#212529".to_string(),
        border_color: "#495057".to_string(),
        hover_shadow_color: Some("#495057".to_string()),
        border_width: 2,
        border_style: "solid".to_string(),
        hover_shadow_intensity: 0.25,
        high_contrast_mode: false,
        is_default: true,
        is_active: true,
        datetime_updated: now,
        created_at: now,
    }
}

impl ThemeService {
    pub fn new(store: Arc<dyn Store>, cache: Arc<CssCache>) -> Self {
        Self { store, cache }
    }

    /// Validates, enforces uniqueness, heals the single-default invariant,
    /// persists, and invalidates the stylesheet cache. Returns the stored
    /// theme with non-blocking contrast advisories.
    pub fn create(&self, mut theme: UnitTypeTheme) -> Result<(UnitTypeTheme, Vec<String>)> {
        let field_errors = theme.validate();
        if !field_errors.is_empty() {
            return Err(Error::Validation(field_errors));
        }
        self.check_uniqueness(&theme, None)?;

        let warnings = contrast_warnings(&theme);

        theme.datetime_updated = Utc::now();
        let id = self.store.create_theme(&theme)?;
        self.cache.invalidate(None);

        let persisted = self.store.get_theme(id)?.ok_or(Error::NotFound)?;
        tracing::info!(theme_id = id, name = %persisted.name, "theme created");
        Ok((persisted, warnings))
    }

    /// Same pipeline as `create`, excluding the theme's own row from the
    /// uniqueness checks.
    pub fn update(&self, mut theme: UnitTypeTheme) -> Result<(UnitTypeTheme, Vec<String>)> {
        if self.store.get_theme(theme.id)?.is_none() {
            return Err(Error::NotFound);
        }
        let field_errors = theme.validate();
        if !field_errors.is_empty() {
            return Err(Error::Validation(field_errors));
        }
        self.check_uniqueness(&theme, Some(theme.id))?;

        let warnings = contrast_warnings(&theme);

        theme.datetime_updated = Utc::now();
        self.store.update_theme(&theme)?;
        self.cache.invalidate(None);

        let persisted = self.store.get_theme(theme.id)?.ok_or(Error::NotFound)?;
        tracing::info!(theme_id = theme.id, name = %persisted.name, "theme updated");
        Ok((persisted, warnings))
    }

    /// Refuses to delete the default theme or any theme still referenced by
    /// a unit type; the error message carries the blocking count.
    pub fn delete(&self, theme_id: i64) -> Result<bool> {
        let theme = self.store.get_theme(theme_id)?.ok_or(Error::NotFound)?;

        if theme.is_default {
            return Err(Error::Conflict(
                "the default theme cannot be deleted".to_string(),
            ));
        }
        let usage = self.store.count_unit_types_using_theme(theme_id)?;
        if usage > 0 {
            return Err(Error::Conflict(format!(
                "theme '{}' is used by {usage} unit type(s) and cannot be deleted",
                theme.name
            )));
        }

        let deleted = self.store.delete_theme(theme_id)?;
        if deleted {
            self.cache.invalidate(None);
            tracing::info!(theme_id, name = %theme.name, "theme deleted");
        }
        Ok(deleted)
    }

    pub fn get(&self, theme_id: i64) -> Result<UnitTypeTheme> {
        self.store.get_theme(theme_id)?.ok_or(Error::NotFound)
    }

    pub fn list(&self) -> Result<Vec<UnitTypeTheme>> {
        self.store.list_themes()
    }

    /// Never fails: the persisted default, else a freshly persisted
    /// hard-coded default, else an in-memory emergency theme.
    pub fn get_default_theme(&self) -> ThemeSource {
        match self.store.get_default_theme_row() {
            Ok(Some(theme)) => ThemeSource::Persisted(theme),
            Ok(None) => self.persist_default_or_fallback(),
            Err(e) => {
                tracing::error!("default theme lookup failed, using emergency fallback: {e}");
                ThemeSource::EmergencyFallback(default_theme_template())
            }
        }
    }

    fn persist_default_or_fallback(&self) -> ThemeSource {
        let template = default_theme_template();
        let result = self
            .store
            .create_theme(&template)
            .and_then(|id| self.store.get_theme(id))
            .and_then(|t| t.ok_or(Error::NotFound));
        match result {
            Ok(theme) => {
                self.cache.invalidate(None);
                tracing::info!(theme_id = theme.id, "persisted hard-coded default theme");
                ThemeSource::Persisted(theme)
            }
            Err(e) => {
                tracing::error!("could not persist default theme, using emergency fallback: {e}");
                ThemeSource::EmergencyFallback(template)
            }
        }
    }

    /// Resolves a possibly-absent or invalid reference to a guaranteed
    /// usable theme, logging why a fallback was taken.
    pub fn get_theme_with_fallback(&self, theme_id: Option<i64>) -> ThemeSource {
        let Some(id) = theme_id else {
            return self.get_default_theme();
        };
        match self.store.get_theme(id) {
            Ok(Some(theme)) if theme.is_active && theme.validate().is_empty() => {
                ThemeSource::Persisted(theme)
            }
            Ok(Some(theme)) => {
                tracing::warn!(
                    theme_id = id,
                    name = %theme.name,
                    "theme is inactive or invalid, falling back to default"
                );
                self.get_default_theme()
            }
            Ok(None) => {
                tracing::warn!(theme_id = id, "theme not found, falling back to default");
                self.get_default_theme()
            }
            Err(e) => {
                tracing::error!(theme_id = id, "theme lookup failed, falling back to default: {e}");
                self.get_default_theme()
            }
        }
    }

    /// Duplicates every visual field under a new name, never as default,
    /// with a derived unique CSS class suffix.
    pub fn clone_theme(&self, source_id: i64, new_name: &str) -> Result<UnitTypeTheme> {
        let source = self.store.get_theme(source_id)?.ok_or(Error::NotFound)?;

        if self.store.get_theme_by_name(new_name)?.is_some() {
            return Err(Error::Conflict(format!(
                "a theme named '{new_name}' already exists"
            )));
        }

        let mut copy = source.clone();
        copy.id = 0;
        copy.name = new_name.to_string();
        copy.css_class_suffix = self.derive_unique_suffix(&source.css_class_suffix)?;
        copy.is_default = false;
        copy.datetime_updated = Utc::now();

        // The derived suffix can push past structural limits.
        let field_errors = copy.validate();
        if !field_errors.is_empty() {
            return Err(Error::Validation(field_errors));
        }

        let id = self.store.create_theme(&copy)?;
        self.cache.invalidate(None);
        tracing::info!(source_id, theme_id = id, "theme cloned");
        self.store.get_theme(id)?.ok_or(Error::NotFound)
    }

    fn derive_unique_suffix(&self, source_suffix: &str) -> Result<String> {
        let base = format!("{source_suffix}-copy");
        if self.store.get_theme_by_suffix(&base)?.is_none() {
            return Ok(base);
        }
        for n in 2.. {
            let candidate = format!("{base}-{n}");
            if self.store.get_theme_by_suffix(&candidate)?.is_none() {
                return Ok(candidate);
            }
        }
        unreachable!()
    }

    /// Unit types currently referencing a theme; what blocks its deletion.
    pub fn get_unit_types_using_theme(&self, theme_id: i64) -> Result<Vec<UnitType>> {
        self.store.list_unit_types_by_theme(theme_id)
    }

    /// The stylesheet for all active themes, served from the cache when the
    /// theme-set fingerprint still matches within the TTL.
    pub fn generate_dynamic_css(&self) -> Result<String> {
        self.render_css(false)
    }

    pub fn generate_dynamic_css_minified(&self) -> Result<String> {
        self.render_css(true)
    }

    fn render_css(&self, minified: bool) -> Result<String> {
        let themes = self.store.list_active_themes()?;
        let mut key = css::fingerprint(&themes);
        if minified {
            key.push_str("+min");
        }

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(%key, "stylesheet cache hit");
            return Ok(cached);
        }

        let rendered = css::generate(&themes, minified);
        self.cache.set(key, rendered.clone());
        Ok(rendered)
    }

    fn check_uniqueness(&self, theme: &UnitTypeTheme, own_id: Option<i64>) -> Result<()> {
        if let Some(existing) = self.store.get_theme_by_name(&theme.name)? {
            if own_id != Some(existing.id) {
                return Err(Error::Conflict(format!(
                    "a theme named '{}' already exists",
                    theme.name
                )));
            }
        }
        if let Some(existing) = self.store.get_theme_by_suffix(&theme.css_class_suffix)? {
            if own_id != Some(existing.id) {
                return Err(Error::Conflict(format!(
                    "css_class_suffix '{}' is already in use",
                    theme.css_class_suffix
                )));
            }
        }
        Ok(())
    }
}

/// WCAG contrast advisories for a theme's background/text pairs. Never
/// blocks a write.
fn contrast_warnings(theme: &UnitTypeTheme) -> Vec<String> {
    let mut warnings = Vec::new();
    for (label, background) in [
        ("primary", &theme.primary_color),
        ("secondary", &theme.secondary_color),
    ] {
        if let Some(ratio) = contrast_ratio(background, &theme.text_color) {
            if ratio < MIN_CONTRAST_RATIO {
                warnings.push(format!(
                    "contrast between {label} color and text color is {ratio:.1}:1, below the recommended {MIN_CONTRAST_RATIO}:1"
                ));
            }
        }
    }
    warnings
}
