use chrono::{DateTime, Utc};

pub const PROJECT_CODE_PREFIX: &str = "PRJ";

/// `PRJ<unix-millis>`, bumped past any code `taken` reports as in use.
/// An error from `taken` stops the search.
pub fn generate_project_code<F, E>(now: DateTime<Utc>, taken: F) -> Result<String, E>
where
    F: Fn(&str) -> Result<bool, E>,
{
    let mut millis = now.timestamp_millis().max(0);
    loop {
        let candidate = format!("{PROJECT_CODE_PREFIX}{millis}");
        if !taken(&candidate)? {
            return Ok(candidate);
        }
        millis += 1;
    }
}
