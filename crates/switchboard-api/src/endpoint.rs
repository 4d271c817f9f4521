// Console endpoint catalogue
//
// Every mutating operation is a form-encoded POST to a path relative to
// the console's mount point. The index is the only GET.

use std::fmt;

/// A mutating endpoint exposed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AddSwitch,
    UpdateSwitch,
    DeleteSwitch,
    UpdateStatus,
    AddCondition,
    DelCondition,
}

impl Endpoint {
    /// All endpoints, in the order the console registers them.
    pub const ALL: [Self; 6] = [
        Self::AddSwitch,
        Self::UpdateSwitch,
        Self::DeleteSwitch,
        Self::UpdateStatus,
        Self::AddCondition,
        Self::DelCondition,
    ];

    /// Path relative to the console mount point. Always ends in `/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::AddSwitch => "add/",
            Self::UpdateSwitch => "update/",
            Self::DeleteSwitch => "delete/",
            Self::UpdateStatus => "status/",
            Self::AddCondition => "conditions/add/",
            Self::DelCondition => "conditions/remove/",
        }
    }

    /// Operation name as the admin UI refers to it.
    pub fn name(self) -> &'static str {
        match self {
            Self::AddSwitch => "addSwitch",
            Self::UpdateSwitch => "updateSwitch",
            Self::DeleteSwitch => "deleteSwitch",
            Self::UpdateStatus => "updateStatus",
            Self::AddCondition => "addCondition",
            Self::DelCondition => "delCondition",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_relative_and_slash_terminated() {
        for endpoint in Endpoint::ALL {
            let path = endpoint.path();
            assert!(!path.starts_with('/'), "{endpoint} path must be relative");
            assert!(path.ends_with('/'), "{endpoint} path must end with a slash");
        }
    }

    #[test]
    fn display_uses_operation_name() {
        assert_eq!(Endpoint::DelCondition.to_string(), "delCondition");
        assert_eq!(Endpoint::UpdateStatus.path(), "status/");
    }
}
