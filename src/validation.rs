//! Field-level validators shared by the assignment and theming subsystems.
//!
//! Validators never fail fast: callers collect every problem into a
//! `Vec<FieldError>` so the whole list can be surfaced to the user at once.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const MAX_CSS_SUFFIX_LEN: usize = 50;

/// WCAG AA minimum contrast ratio for normal text.
pub const MIN_CONTRAST_RATIO: f64 = 4.5;

/// CSS named colors accepted by the theme validators. Deliberately the
/// common subset; obscure X11 names are not worth carrying.
const NAMED_COLORS: &[&str] = &[
    "aqua", "beige", "black", "blue", "brown", "coral", "crimson", "cyan",
    "darkblue", "darkgray", "darkgreen", "darkorange", "darkred", "fuchsia",
    "gold", "gray", "green", "grey", "indigo", "ivory", "khaki", "lavender",
    "lightblue", "lightgray", "lightgreen", "lightyellow", "lime", "magenta",
    "maroon", "navy", "olive", "orange", "orchid", "pink", "plum", "purple",
    "red", "salmon", "silver", "teal", "tomato", "transparent", "turquoise",
    "violet", "white", "yellow",
];

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn parse_func_args<'a>(value: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = value
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .trim_end()
        .strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

fn is_channel_byte(s: &str) -> bool {
    s.parse::<u16>().is_ok_and(|n| n <= 255)
}

fn is_alpha(s: &str) -> bool {
    s.parse::<f64>().is_ok_and(|a| (0.0..=1.0).contains(&a))
}

fn is_percent(s: &str) -> bool {
    s.strip_suffix('%')
        .and_then(|p| p.parse::<f64>().ok())
        .is_some_and(|p| (0.0..=100.0).contains(&p))
}

fn is_rgb_color(value: &str) -> bool {
    if let Some(args) = parse_func_args(value, "rgb") {
        return args.len() == 3 && args.iter().all(|a| is_channel_byte(a));
    }
    false
}

fn is_rgba_color(value: &str) -> bool {
    if let Some(args) = parse_func_args(value, "rgba") {
        return args.len() == 4
            && args[..3].iter().all(|a| is_channel_byte(a))
            && is_alpha(args[3]);
    }
    false
}

fn is_hsl_color(value: &str) -> bool {
    if let Some(args) = parse_func_args(value, "hsl") {
        return args.len() == 3
            && args[0].parse::<f64>().is_ok_and(|h| (0.0..=360.0).contains(&h))
            && is_percent(args[1])
            && is_percent(args[2]);
    }
    false
}

fn is_hsla_color(value: &str) -> bool {
    if let Some(args) = parse_func_args(value, "hsla") {
        return args.len() == 4
            && args[0].parse::<f64>().is_ok_and(|h| (0.0..=360.0).contains(&h))
            && is_percent(args[1])
            && is_percent(args[2])
            && is_alpha(args[3]);
    }
    false
}

/// Accepts hex (#rgb/#rgba/#rrggbb/#rrggbbaa), rgb()/rgba(), hsl()/hsla()
/// and the common CSS named colors.
pub fn is_valid_css_color(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    // rgba/hsla before rgb/hsl: "rgba(...)" also strips as "rgb" + "a(...)"
    is_hex_color(value)
        || is_rgba_color(value)
        || is_rgb_color(value)
        || is_hsla_color(value)
        || is_hsl_color(value)
        || NAMED_COLORS.contains(&value.to_ascii_lowercase().as_str())
}

pub fn validate_css_color(field: &str, value: &str) -> Result<(), FieldError> {
    if is_valid_css_color(value) {
        Ok(())
    } else {
        Err(FieldError::new(
            field,
            format!("'{value}' is not a valid CSS color"),
        ))
    }
}

/// CSS-identifier-safe suffix: lowercase alphanumerics and hyphens,
/// starting with a letter.
pub fn validate_css_identifier(field: &str, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::new(field, "cannot be empty"));
    }
    if value.len() > MAX_CSS_SUFFIX_LEN {
        return Err(FieldError::new(
            field,
            format!("cannot exceed {MAX_CSS_SUFFIX_LEN} characters"),
        ));
    }
    if !value.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return Err(FieldError::new(field, "must start with a lowercase letter"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(FieldError::new(
            field,
            "can only contain lowercase letters, digits, hyphens, and underscores",
        ));
    }
    Ok(())
}

pub fn validate_email(field: &str, value: &str) -> Result<(), FieldError> {
    let err = || FieldError::new(field, format!("'{value}' is not a valid email address"));
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None)
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(err()),
    }
}

pub fn validate_url(field: &str, value: &str) -> Result<(), FieldError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(FieldError::new(
            field,
            format!("'{value}' is not a valid http(s) URL"),
        )),
    }
}

pub fn validate_phone(field: &str, value: &str) -> Result<(), FieldError> {
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')' | '/'))
        .collect();
    let digits = digits.strip_prefix('+').unwrap_or(&digits);
    if (6..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FieldError::new(
            field,
            format!("'{value}' is not a valid phone number"),
        ))
    }
}

/// Resolves a color to RGB for contrast math. Covers hex, rgb()/rgba() and
/// a few named colors; gradients and hsl() are skipped (contrast checking
/// is best-effort, never blocking).
pub fn resolve_rgb(value: &str) -> Option<(u8, u8, u8)> {
    let value = value.trim();
    if let Some(digits) = value.strip_prefix('#') {
        return match digits.len() {
            3 | 4 => {
                let c: Vec<u8> = digits
                    .chars()
                    .take(3)
                    .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
                    .collect::<Option<_>>()?;
                Some((c[0], c[1], c[2]))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some((r, g, b))
            }
            _ => None,
        };
    }
    if let Some(args) = parse_func_args(value, "rgba").or_else(|| parse_func_args(value, "rgb")) {
        if args.len() >= 3 {
            let r = args[0].parse().ok()?;
            let g = args[1].parse().ok()?;
            let b = args[2].parse().ok()?;
            return Some((r, g, b));
        }
        return None;
    }
    match value.to_ascii_lowercase().as_str() {
        "black" => Some((0, 0, 0)),
        "white" => Some((255, 255, 255)),
        "red" => Some((255, 0, 0)),
        "green" => Some((0, 128, 0)),
        "blue" => Some((0, 0, 255)),
        "gray" | "grey" => Some((128, 128, 128)),
        "yellow" => Some((255, 255, 0)),
        "orange" => Some((255, 165, 0)),
        _ => None,
    }
}

fn relative_luminance((r, g, b): (u8, u8, u8)) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// WCAG contrast ratio between two colors, when both resolve to RGB.
pub fn contrast_ratio(a: &str, b: &str) -> Option<f64> {
    let la = relative_luminance(resolve_rgb(a)?);
    let lb = relative_luminance(resolve_rgb(b)?);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    Some((lighter + 0.05) / (darker + 0.05))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_color_formats() {
        for color in [
            "#fff",
            "#ffffff",
            "#FFAA00",
            "#ffaa0080",
            "rgb(0,0,0)",
            "rgb(255, 128, 0)",
            "rgba(0,0,0,0.5)",
            "hsl(120,50%,50%)",
            "hsla(120, 50%, 50%, 0.3)",
            "red",
            "Transparent",
        ] {
            assert!(is_valid_css_color(color), "should accept {color}");
        }
    }

    #[test]
    fn rejects_invalid_colors() {
        for color in [
            "",
            "#ggg",
            "#ffff0",
            "rgb(256,0,0)",
            "rgb(0,0)",
            "rgba(0,0,0,1.5)",
            "hsl(400,50%,50%)",
            "hsl(120,50,50)",
            "notacolor",
        ] {
            assert!(!is_valid_css_color(color), "should reject {color:?}");
        }
    }

    #[test]
    fn css_identifier_rules() {
        assert!(validate_css_identifier("suffix", "function-it").is_ok());
        assert!(validate_css_identifier("suffix", "a1-b2_c3").is_ok());
        assert!(validate_css_identifier("suffix", "").is_err());
        assert!(validate_css_identifier("suffix", "1abc").is_err());
        assert!(validate_css_identifier("suffix", "has space").is_err());
        assert!(validate_css_identifier("suffix", "Upper").is_err());
    }

    #[test]
    fn email_surface() {
        assert!(validate_email("email", "a@example.com").is_ok());
        assert!(validate_email("email", "no-at-sign").is_err());
        assert!(validate_email("email", "two@@example.com").is_err());
        assert!(validate_email("email", "a@nodot").is_err());
        assert!(validate_email("email", "a b@example.com").is_err());
    }

    #[test]
    fn url_and_phone_surface() {
        assert!(validate_url("website", "https://example.com").is_ok());
        assert!(validate_url("website", "http://example.com/path").is_ok());
        assert!(validate_url("website", "ftp://example.com").is_err());
        assert!(validate_url("website", "example.com").is_err());

        assert!(validate_phone("phone", "+39 02 1234 5678").is_ok());
        assert!(validate_phone("phone", "(555) 123-4567").is_ok());
        assert!(validate_phone("phone", "12345").is_err());
        assert!(validate_phone("phone", "call me").is_err());
    }

    #[test]
    fn contrast_black_on_white_is_maximal() {
        let ratio = contrast_ratio("#000000", "#ffffff").unwrap();
        assert!((ratio - 21.0).abs() < 0.01);
        assert!(contrast_ratio("#777", "#888").unwrap() < MIN_CONTRAST_RATIO);
        assert!(contrast_ratio("hsl(1,1%,1%)", "#fff").is_none());
    }
}
