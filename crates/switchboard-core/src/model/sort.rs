// ── Index sort order ──

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::error::CoreError;

/// Column the console may sort its index by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    Label,
    DateCreated,
    DateModified,
}

/// A validated `by=` value: a column, optionally descending (`-` prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortOrder {
    /// Most recently modified first.
    fn default() -> Self {
        Self {
            field: SortField::DateModified,
            descending: true,
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, column) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = column.parse().map_err(|_| CoreError::Validation {
            message: format!(
                "invalid sort order '{s}': expected label, date_created or date_modified, \
                 optionally prefixed with '-'"
            ),
        })?;
        Ok(Self { field, descending })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        write!(f, "{}", self.field)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_newest_modified_first() {
        assert_eq!(SortOrder::default().to_string(), "-date_modified");
    }

    #[test]
    fn parses_all_valid_orders() {
        for raw in [
            "label",
            "-label",
            "date_created",
            "-date_created",
            "date_modified",
            "-date_modified",
        ] {
            let order: SortOrder = raw.parse().unwrap();
            assert_eq!(order.to_string(), raw);
        }
    }

    #[test]
    fn rejects_unknown_columns() {
        for raw in ["", "-", "key", "--label", "status"] {
            assert!(raw.parse::<SortOrder>().is_err(), "'{raw}' should be rejected");
        }
    }
}
