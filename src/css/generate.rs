//! Stylesheet generation for unit type themes.
//!
//! `generate` is a pure function of the active theme set: the same themes
//! always produce the same document, regardless of input order (default
//! theme first, then by name).

use sha2::{Digest, Sha256};

use crate::types::UnitTypeTheme;
use crate::validation::resolve_rgb;

/// Served when no active themes exist; the chart must never render unstyled.
const FALLBACK_CSS: &str = "\
/* Fallback unit type styles (no active themes configured) */
.unit-themed {
  position: relative;
  border-radius: 8px;
  padding: 12px;
  transition: box-shadow 0.2s ease;
}
.unit-organizational {
  border: 2px solid #495057;
  background: linear-gradient(135deg, #ffffff 0%, #f8f9fa 100%);
  color: #212529;
}
.unit-organizational:hover {
  box-shadow: 0 4px 12px rgba(73, 80, 87, 0.25);
}
.unit-function {
  border: 4px dashed #0d6efd;
  background: linear-gradient(135deg, #ffffff 0%, #f0f8ff 100%);
  color: #0d6efd;
}
";

/// Order-independent digest of theme identity and freshness. Two
/// permutations of the same theme set share a key; touching any theme's
/// `datetime_updated` changes it.
pub fn fingerprint(themes: &[UnitTypeTheme]) -> String {
    let mut pairs: Vec<String> = themes
        .iter()
        .map(|t| format!("{}:{}", t.id, t.datetime_updated.to_rfc3339()))
        .collect();
    pairs.sort_unstable();

    let mut hasher = Sha256::new();
    for pair in &pairs {
        hasher.update(pair.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

fn hover_shadow(theme: &UnitTypeTheme) -> String {
    let color = theme
        .hover_shadow_color
        .as_deref()
        .unwrap_or(&theme.border_color);
    match resolve_rgb(color) {
        Some((r, g, b)) => format!(
            "rgba({r}, {g}, {b}, {:.2})",
            theme.hover_shadow_intensity
        ),
        None => color.to_string(),
    }
}

fn push_theme_variables(css: &mut String, theme: &UnitTypeTheme) {
    let id = theme.id;
    css.push_str(&format!("  --theme-{id}-primary: {};\n", theme.primary_color));
    css.push_str(&format!(
        "  --theme-{id}-secondary: {};\n",
        theme.secondary_color
    ));
    css.push_str(&format!("  --theme-{id}-text: {};\n", theme.text_color));
    css.push_str(&format!("  --theme-{id}-border: {};\n", theme.border_color));
    css.push_str(&format!("  --theme-{id}-hover-shadow: {};\n", hover_shadow(theme)));
}

fn push_theme_rules(css: &mut String, theme: &UnitTypeTheme) {
    let id = theme.id;
    let class = format!(".unit-{}", theme.css_class_suffix);

    css.push_str(&format!("/* {} */\n", theme.display_label));
    css.push_str(&format!("{class} {{\n"));
    css.push_str(&format!(
        "  border: {}px {} var(--theme-{id}-border);\n",
        theme.border_width, theme.border_style
    ));
    css.push_str(&format!(
        "  background: linear-gradient(135deg, var(--theme-{id}-primary) 0%, var(--theme-{id}-secondary) 100%);\n"
    ));
    css.push_str(&format!("  color: var(--theme-{id}-text);\n"));
    if theme.high_contrast_mode {
        css.push_str(&format!("  outline: 2px solid var(--theme-{id}-text);\n"));
        css.push_str("  outline-offset: 2px;\n");
    }
    css.push_str("}\n");

    css.push_str(&format!("{class}:hover {{\n"));
    css.push_str(&format!(
        "  box-shadow: 0 4px 12px var(--theme-{id}-hover-shadow);\n"
    ));
    css.push_str("}\n");

    if let Some(icon) = &theme.icon {
        css.push_str(&format!("{class} .theme-icon::before {{\n"));
        css.push_str(&format!("  content: \"{icon}\";\n"));
        css.push_str("}\n");
    }
    css.push('\n');
}

/// Renders the full stylesheet for the active subset of `themes`.
pub fn generate(themes: &[UnitTypeTheme], minified: bool) -> String {
    let mut active: Vec<&UnitTypeTheme> = themes.iter().filter(|t| t.is_active).collect();
    if active.is_empty() {
        return if minified {
            minify(FALLBACK_CSS)
        } else {
            FALLBACK_CSS.to_string()
        };
    }

    active.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut css = String::with_capacity(8 * 1024);

    css.push_str("/* Generated unit type themes */\n");
    css.push_str(&format!("/* {} active theme(s) */\n\n", active.len()));

    // Custom properties, one bundle per theme
    css.push_str(":root {\n");
    for theme in &active {
        push_theme_variables(&mut css, theme);
    }
    css.push_str("}\n\n");

    // Shared base for every themed unit box
    css.push_str(
        ".unit-themed {\n  position: relative;\n  border-radius: 8px;\n  padding: 12px;\n  transition: box-shadow 0.2s ease, transform 0.2s ease;\n}\n\n",
    );

    for theme in &active {
        push_theme_rules(&mut css, theme);
    }

    // Utilities
    css.push_str(
        ".theme-icon {\n  display: inline-block;\n  margin-right: 6px;\n}\n.unit-label {\n  font-weight: 600;\n  font-size: 0.95rem;\n}\n.unit-sublabel {\n  font-size: 0.8rem;\n  opacity: 0.8;\n}\n\n",
    );

    // Responsive
    css.push_str(
        "@media (max-width: 768px) {\n  .unit-themed {\n    padding: 8px;\n    border-radius: 6px;\n  }\n  .unit-label {\n    font-size: 0.85rem;\n  }\n}\n\n",
    );

    // Accessibility
    css.push_str(
        ".unit-themed:focus-visible {\n  outline: 3px solid #1a73e8;\n  outline-offset: 2px;\n}\n.unit-themed a, .unit-themed button {\n  min-width: 44px;\n  min-height: 44px;\n}\n.sr-only {\n  position: absolute;\n  width: 1px;\n  height: 1px;\n  padding: 0;\n  margin: -1px;\n  overflow: hidden;\n  clip: rect(0, 0, 0, 0);\n  white-space: nowrap;\n  border: 0;\n}\n@media (prefers-reduced-motion: reduce) {\n  .unit-themed {\n    transition: none;\n  }\n}\n@media (prefers-contrast: more) {\n  .unit-themed {\n    border-width: 3px;\n  }\n}\n\n",
    );

    // Print
    css.push_str(
        "@media print {\n  .unit-themed {\n    box-shadow: none;\n    background: #ffffff;\n  }\n}\n",
    );

    if minified { minify(&css) } else { css }
}

/// Best-effort minifier: drops comments and collapses whitespace while
/// leaving string literals intact.
pub fn minify(css: &str) -> String {
    let mut out = String::with_capacity(css.len() / 2);
    let mut chars = css.chars().peekable();
    let mut in_string: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|n| n.is_whitespace()) {
                    chars.next();
                }
                // Whitespace is only significant between identifier-ish chars
                let prev = out.chars().last();
                let next = chars.peek().copied();
                let keep = prev.is_some_and(|p| p.is_ascii_alphanumeric() || matches!(p, '%' | ')' | '*' | '-' | '.' | '#'))
                    && next.is_some_and(|n| n.is_ascii_alphanumeric() || matches!(n, '-' | '.' | '#' | '(' | '*'));
                if keep {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }

    // Redundant separators
    out.replace(";}", "}")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::UnitTypeTheme;

    fn theme(id: i64, name: &str, is_default: bool) -> UnitTypeTheme {
        UnitTypeTheme {
            id,
            name: name.to_string(),
            css_class_suffix: name.to_string(),
            display_label: format!("{name} label"),
            icon: Some("⭐".to_string()),
            primary_color: "#ffffff".to_string(),
            secondary_color: "#f8f9fa".to_string(),
            text_color: "#212529".to_string(),
            border_color: "#0d6efd".to_string(),
            hover_shadow_color: Some("#0d6efd".to_string()),
            border_width: 2,
            border_style: "solid".to_string(),
            hover_shadow_intensity: 0.25,
            high_contrast_mode: false,
            is_default,
            is_active: true,
            datetime_updated: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_set_yields_fallback_stylesheet() {
        let css = generate(&[], false);
        assert!(css.contains(".unit-organizational"));
        assert!(css.contains("Fallback"));
        assert!(!css.is_empty());
    }

    #[test]
    fn inactive_themes_are_excluded() {
        let mut t = theme(1, "ghost", false);
        t.is_active = false;
        let css = generate(&[t], false);
        assert!(css.contains("Fallback"));
        assert!(!css.contains(".unit-ghost"));
    }

    #[test]
    fn output_is_order_independent() {
        let a = theme(1, "alpha", false);
        let b = theme(2, "beta", true);
        let forward = generate(&[a.clone(), b.clone()], false);
        let reversed = generate(&[b, a], false);
        assert_eq!(forward, reversed);
        // Default theme's variables come first
        let beta_pos = forward.find("--theme-2-primary").unwrap();
        let alpha_pos = forward.find("--theme-1-primary").unwrap();
        assert!(beta_pos < alpha_pos);
    }

    #[test]
    fn generated_rules_cover_theme_properties() {
        let css = generate(&[theme(7, "board", true)], false);
        assert!(css.contains(".unit-board {"));
        assert!(css.contains("border: 2px solid var(--theme-7-border);"));
        assert!(css.contains("--theme-7-hover-shadow: rgba(13, 110, 253, 0.25);"));
        assert!(css.contains("content: \"⭐\";"));
        assert!(css.contains("@media print"));
        assert!(css.contains("prefers-reduced-motion"));
    }

    #[test]
    fn fingerprint_is_order_independent_and_freshness_sensitive() {
        let a = theme(1, "alpha", false);
        let b = theme(2, "beta", true);
        assert_eq!(
            fingerprint(&[a.clone(), b.clone()]),
            fingerprint(&[b.clone(), a.clone()])
        );

        let mut touched = b.clone();
        touched.datetime_updated = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        assert_ne!(fingerprint(&[a.clone(), b]), fingerprint(&[a, touched]));
    }

    #[test]
    fn minify_strips_comments_and_whitespace() {
        let css = "/* header */\n.unit-a {\n  color: #fff;\n}\n";
        let min = minify(css);
        assert!(!min.contains("header"));
        assert!(!min.contains('\n'));
        assert_eq!(min, ".unit-a{color:#fff}");
    }

    #[test]
    fn minify_preserves_string_literals() {
        let css = ".a::before { content: \"a  /* not a comment */  b\"; }";
        let min = minify(css);
        assert!(min.contains("\"a  /* not a comment */  b\""));
    }
}
