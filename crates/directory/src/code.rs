//! Human-readable employee code (`EMP001`).
//!
//! Well-formed codes are `EMP` followed by at least three digits. Codes that
//! do not match (legacy data, manual overrides) are kept verbatim but carry no
//! sequence number.

use serde::{Deserialize, Serialize};

use worksphere_core::{DomainError, DomainResult};

const PREFIX: &str = "EMP";
const MIN_DIGITS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeCode(String);

impl EmployeeCode {
    /// Wrap an arbitrary non-empty code.
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into().trim().to_string();
        if raw.is_empty() {
            return Err(DomainError::validation("employee code cannot be empty"));
        }
        Ok(Self(raw))
    }

    /// `EMP` + number, zero padded to three digits (`EMP007`, `EMP1000`).
    pub fn from_number(n: u64) -> Self {
        Self(format!("{PREFIX}{n:03}"))
    }

    /// Sequence number of a well-formed code.
    pub fn number(&self) -> Option<u64> {
        parse_number(&self.0)
    }

    pub fn is_well_formed(&self) -> bool {
        self.number().is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Highest sequence number among well-formed codes (0 when none).
    pub fn max_number<'a>(codes: impl IntoIterator<Item = &'a EmployeeCode>) -> u64 {
        codes.into_iter().filter_map(EmployeeCode::number).max().unwrap_or(0)
    }

    /// The code following every well-formed code in `codes`; `None` once the
    /// maximum is `u64::MAX`.
    pub fn next_after<'a>(codes: impl IntoIterator<Item = &'a EmployeeCode>) -> Option<Self> {
        Self::max_number(codes).checked_add(1).map(Self::from_number)
    }

    /// Whether a later code can still be allocated after this one.
    pub fn has_successor(&self) -> bool {
        self.number().is_none_or(|n| n < u64::MAX)
    }
}

fn parse_number(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix(PREFIX)?;
    if digits.len() < MIN_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl core::fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for EmployeeCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
