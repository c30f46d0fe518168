//! CRUD verbs

use std::fmt;
use std::str::FromStr;

use crate::sync::error::SyncError;

/// Verb passed to `sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Read,
    Create,
    Update,
    Delete,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Read, Method::Create, Method::Update, Method::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Read => "read",
            Method::Create => "create",
            Method::Update => "update",
            Method::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SyncError::UnsupportedMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_patch_unsupported() {
        assert_eq!(
            "patch".parse::<Method>(),
            Err(SyncError::UnsupportedMethod("patch".to_string()))
        );
    }
}
