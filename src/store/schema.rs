pub const SCHEMA: &str = r#"
-- Companies the chart can reference
CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    website TEXT,
    email TEXT,
    phone TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS persons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Visual themes applied to unit types
CREATE TABLE IF NOT EXISTS unit_type_themes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    css_class_suffix TEXT NOT NULL UNIQUE,
    display_label TEXT NOT NULL,
    icon TEXT,
    primary_color TEXT NOT NULL,
    secondary_color TEXT NOT NULL,
    text_color TEXT NOT NULL,
    border_color TEXT NOT NULL,
    hover_shadow_color TEXT,
    border_width INTEGER NOT NULL DEFAULT 2,
    border_style TEXT NOT NULL DEFAULT 'solid',
    hover_shadow_intensity REAL NOT NULL DEFAULT 0.25,
    high_contrast_mode INTEGER NOT NULL DEFAULT 0,
    is_default INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    datetime_updated TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Unit types (department, function, ...) carry an optional theme
CREATE TABLE IF NOT EXISTS unit_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    theme_id INTEGER REFERENCES unit_type_themes(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    short_name TEXT,
    unit_type_id INTEGER NOT NULL REFERENCES unit_types(id),
    parent_unit_id INTEGER REFERENCES units(id) ON DELETE SET NULL,
    company_id INTEGER REFERENCES companies(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS job_titles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    short_name TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Versioned person-unit-role assignments. A business key
-- (person_id, unit_id, job_title_id) owns versions 1..N; updating the
-- current row deactivates it and inserts version N+1.
CREATE TABLE IF NOT EXISTS assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id INTEGER NOT NULL REFERENCES persons(id),
    unit_id INTEGER NOT NULL REFERENCES units(id),
    job_title_id INTEGER NOT NULL REFERENCES job_titles(id),
    version INTEGER NOT NULL,
    percentage REAL NOT NULL,
    is_ad_interim INTEGER NOT NULL DEFAULT 0,
    is_unit_boss INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    flags TEXT,
    valid_from TEXT,
    valid_to TEXT,
    is_current INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now')),

    -- Racing writers cannot both claim the same next version
    UNIQUE(person_id, unit_id, job_title_id, version)
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_assignments_business_key
    ON assignments(person_id, unit_id, job_title_id);
CREATE INDEX IF NOT EXISTS idx_assignments_person_current
    ON assignments(person_id, is_current);
CREATE INDEX IF NOT EXISTS idx_assignments_unit_current
    ON assignments(unit_id, is_current);
-- At most one current row per business key, enforced by the database as
-- well as by the versioning transaction
CREATE UNIQUE INDEX IF NOT EXISTS idx_assignments_single_current
    ON assignments(person_id, unit_id, job_title_id) WHERE is_current = 1;
CREATE INDEX IF NOT EXISTS idx_units_type ON units(unit_type_id);
CREATE INDEX IF NOT EXISTS idx_units_parent ON units(parent_unit_id);
CREATE INDEX IF NOT EXISTS idx_unit_types_theme ON unit_types(theme_id);
"#;
