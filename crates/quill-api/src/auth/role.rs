// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role registry.
//!
//! Roles form a strict ladder. Names are matched exactly and case-sensitively
//! in their canonical capitalized form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Role {
    /// Unrecognized role name. Level 0, never granted anything.
    Unknown,
    /// Regular reader.
    #[default]
    User,
    /// Can read manuals.
    Manuals,
    /// Can comment on posts.
    Commentor,
    /// Can author and moderate posts.
    Creator,
    /// Full access.
    Admin,
}

impl Role {
    /// Every known role, lowest level first.
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Manuals,
        Role::Commentor,
        Role::Creator,
        Role::Admin,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unknown => "Unknown",
            Role::User => "User",
            Role::Manuals => "Manuals",
            Role::Commentor => "Commentor",
            Role::Creator => "Creator",
            Role::Admin => "Admin",
        }
    }

    /// Privilege level; 0 for [`Role::Unknown`].
    pub fn level(&self) -> u8 {
        match self {
            Role::Unknown => 0,
            Role::User => 1,
            Role::Manuals => 2,
            Role::Commentor => 3,
            Role::Creator => 4,
            Role::Admin => 5,
        }
    }

    /// Parses a canonical role name. Anything else is [`Role::Unknown`].
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == name)
            .unwrap_or(Role::Unknown)
    }

    /// Level of the role called `name`; 0 when unknown.
    pub fn level_of(name: &str) -> u8 {
        Self::parse(name).level()
    }

    /// Returns `true` for every role except [`Role::Unknown`].
    pub fn is_known(&self) -> bool {
        *self != Role::Unknown
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Role::parse(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_strictly_increase() {
        for pair in Role::ALL.windows(2) {
            assert!(pair[0].level() < pair[1].level());
        }
        assert_eq!(Role::Unknown.level(), 0);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Role::parse("Creator"), Role::Creator);
        assert_eq!(Role::parse("CREATOR"), Role::Unknown);
        assert_eq!(Role::parse("creator"), Role::Unknown);
        assert_eq!(Role::parse(" Admin"), Role::Unknown);
        assert_eq!(Role::parse(""), Role::Unknown);
        assert_eq!(Role::level_of("Admin"), 5);
        assert_eq!(Role::level_of("root"), 0);
    }

    #[test]
    fn test_name_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), role);
            assert!(role.is_known());
        }
        assert!(!Role::Unknown.is_known());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Role::Commentor).unwrap();
        assert_eq!(json, "\"Commentor\"");
        let role: Role = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(role, Role::Unknown);
    }
}
