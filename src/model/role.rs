// src/model/role.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed positions in the chain.
///
/// Declaration order is chain order (downstream first), so the derived `Ord`
/// sorts roles from the customer towards the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Retailer,
    Wholesaler,
    Distributor,
    Factory,
}

impl Role {
    /// All roles, Retailer -> Wholesaler -> Distributor -> Factory.
    pub const ALL: [Role; 4] = [
        Role::Retailer,
        Role::Wholesaler,
        Role::Distributor,
        Role::Factory,
    ];

    /// Position in the chain, used to index per-role arrays.
    pub fn index(self) -> usize {
        match self {
            Role::Retailer => 0,
            Role::Wholesaler => 1,
            Role::Distributor => 2,
            Role::Factory => 3,
        }
    }

    /// The supplier this role orders from. The Factory has none.
    pub fn upstream(self) -> Option<Role> {
        match self {
            Role::Retailer => Some(Role::Wholesaler),
            Role::Wholesaler => Some(Role::Distributor),
            Role::Distributor => Some(Role::Factory),
            Role::Factory => None,
        }
    }

    /// The customer this role ships to. The Retailer ships to the market.
    pub fn downstream(self) -> Option<Role> {
        match self {
            Role::Retailer => None,
            Role::Wholesaler => Some(Role::Retailer),
            Role::Distributor => Some(Role::Wholesaler),
            Role::Factory => Some(Role::Distributor),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Retailer => "Retailer",
            Role::Wholesaler => "Wholesaler",
            Role::Distributor => "Distributor",
            Role::Factory => "Factory",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role name is not one of the four chain positions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_neighbours_are_symmetric() {
        for role in Role::ALL {
            if let Some(up) = role.upstream() {
                assert_eq!(up.downstream(), Some(role));
            }
        }
        assert_eq!(Role::Factory.upstream(), None);
        assert_eq!(Role::Retailer.downstream(), None);
    }

    #[test]
    fn test_index_matches_chain_order() {
        for (i, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("Retailer".parse::<Role>(), Ok(Role::Retailer));
        assert_eq!(" factory ".parse::<Role>(), Ok(Role::Factory));
        assert_eq!(
            "Brewery".parse::<Role>(),
            Err(ParseRoleError("Brewery".to_string()))
        );
    }
}
