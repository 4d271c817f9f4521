// ── Switch status ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::CoreError;

/// The four states a switch can be in.
///
/// Wire values are integers: `DISABLED=1`, `CONDITIONAL=2`, `ACTIVE=3`,
/// `INHERIT=4`. No transition between them is forbidden.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    /// Inactive for everyone.
    #[default]
    Disabled,
    /// Active only when at least one condition matches.
    Conditional,
    /// Active unconditionally.
    Active,
    /// Defer to the parent scope. Only meaningful where one exists.
    Inherit,
}

impl Status {
    /// Integer sent in the `status` form field.
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Disabled => 1,
            Self::Conditional => 2,
            Self::Active => 3,
            Self::Inherit => 4,
        }
    }

    /// Human label shown next to a switch.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Conditional => "Conditional",
            Self::Active => "Active",
            Self::Inherit => "Inherit",
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Disabled),
            2 => Ok(Self::Conditional),
            3 => Ok(Self::Active),
            4 => Ok(Self::Inherit),
            other => Err(CoreError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.wire_value()
    }
}
