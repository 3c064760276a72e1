use chrono::NaiveDateTime;

static EXTENSION: &str = ".png";

/// Picks the output filename: the trimmed hint, else the trimmed default, else a name
/// stamped with `timestamp`. `.png` is appended unless already present in any case.
pub fn resolve_filename(hint: Option<&str>, default: Option<&str>, timestamp: NaiveDateTime) -> String {
    let mut name = match non_empty(hint).or_else(|| non_empty(default)) {
        Some(name) => name.to_string(),
        None => format!("qr_{}", timestamp.format("%Y%m%d_%H%M%S")),
    };

    let has_ext = name
        .len()
        .checked_sub(EXTENSION.len())
        .and_then(|i| name.get(i..))
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION));
    if !has_ext {
        name.push_str(EXTENSION);
    }
    name
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
