//! Account role hierarchy.
//!
//! Roles are totally ordered by a fixed level map. The map is process-wide
//! constant configuration and never changes at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege level a caller holds within one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Buyer,
    Viewer,
    NoAccess,
}

impl Role {
    /// Numeric privilege level. Higher means more privilege.
    pub const fn level(&self) -> u8 {
        match self {
            Role::Owner => 5,
            Role::Admin => 4,
            Role::Member => 3,
            Role::Buyer => 2,
            Role::Viewer => 1,
            Role::NoAccess => 0,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Buyer => "buyer",
            Role::Viewer => "viewer",
            Role::NoAccess => "noaccess",
        }
    }

    /// Try to parse a role from its stored string form.
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            "buyer" => Some(Role::Buyer),
            "viewer" => Some(Role::Viewer),
            "noaccess" => Some(Role::NoAccess),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Level of a stored role string.
///
/// Unknown values map to 0 (lowest privilege) rather than failing the
/// request; a warning is emitted so a typo'd role in the store shows up in
/// logs instead of silently locking the caller out.
pub fn level_of(role: &str) -> u8 {
    match Role::try_parse(role) {
        Some(r) => r.level(),
        None => {
            tracing::warn!(role = %role, "Unrecognized role value, treating as lowest privilege");
            0
        }
    }
}

/// Whether a stored role string satisfies a minimum required role.
pub fn has_role(role: &str, required: Role) -> bool {
    level_of(role) >= required.level()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_map() {
        assert_eq!(level_of("owner"), 5);
        assert_eq!(level_of("admin"), 4);
        assert_eq!(level_of("member"), 3);
        assert_eq!(level_of("buyer"), 2);
        assert_eq!(level_of("viewer"), 1);
        assert_eq!(level_of("noaccess"), 0);
    }

    #[test]
    fn test_unknown_role_maps_to_lowest() {
        assert_eq!(level_of("superuser"), 0);
        assert_eq!(level_of(""), 0);
        // Role strings are stored lowercase; anything else is unknown.
        assert_eq!(level_of("Owner"), 0);
    }

    #[test]
    fn test_hierarchy_is_strictly_ordered() {
        let ordered = [
            Role::Owner,
            Role::Admin,
            Role::Member,
            Role::Buyer,
            Role::Viewer,
            Role::NoAccess,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].level() > pair[1].level());
        }
    }

    #[test]
    fn test_has_role_matches_level_comparison() {
        let all = ["owner", "admin", "member", "buyer", "viewer", "noaccess"];
        let required = [
            Role::Owner,
            Role::Admin,
            Role::Member,
            Role::Buyer,
            Role::Viewer,
            Role::NoAccess,
        ];
        for role in all {
            for min in required {
                assert_eq!(has_role(role, min), level_of(role) >= min.level());
            }
        }
    }

    #[test]
    fn test_roundtrip() {
        for s in ["owner", "admin", "member", "buyer", "viewer", "noaccess"] {
            assert_eq!(Role::try_parse(s).unwrap().as_str(), s);
        }
    }
}
