use serde::{Deserialize, Serialize};

/// Role assigned to a back-office user.
///
/// Each role owns its own row in the permission matrices; there is no
/// inheritance between roles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Flight,
    Reservation,
    Operation,
    Management,
}

closed_vocabulary!(Role, "role", {
    Admin => "admin",
    Flight => "flight",
    Reservation => "reservation",
    Operation => "operation",
    Management => "management",
});

/// Role as carried by a user record.
///
/// The server (or an old persisted session) may hand us a role name this
/// build does not know. It is kept verbatim so the record still loads, and
/// every check against it is denied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    Known(Role),
    Unrecognized(String),
}

impl RoleClaim {
    /// Parse a raw role name; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Role>() {
            Ok(role) => Self::Known(role),
            Err(_) => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Known(role) => Some(*role),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(role) => role.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(value: Role) -> Self {
        Self::Known(value)
    }
}

impl core::fmt::Display for RoleClaim {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert!("Admin".parse::<Role>().is_err());
        assert!("pilot".parse::<Role>().is_err());
    }

    #[test]
    fn claim_deserializes_known_roles() {
        let claim: RoleClaim = serde_json::from_str("\"reservation\"").unwrap();
        assert_eq!(claim, RoleClaim::Known(Role::Reservation));
        assert_eq!(claim.role(), Some(Role::Reservation));
    }

    #[test]
    fn claim_keeps_unknown_roles_verbatim() {
        let claim: RoleClaim = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(claim, RoleClaim::Unrecognized("superuser".to_string()));
        assert_eq!(claim.role(), None);
        assert_eq!(serde_json::to_string(&claim).unwrap(), "\"superuser\"");
    }

    #[test]
    fn claim_parse_matches_serde() {
        assert_eq!(RoleClaim::parse("flight"), RoleClaim::Known(Role::Flight));
        assert_eq!(
            RoleClaim::parse("Flight"),
            RoleClaim::Unrecognized("Flight".to_string())
        );
    }
}
