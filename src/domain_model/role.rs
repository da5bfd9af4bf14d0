use serde::{Deserialize, Serialize};
use std::fmt;

/// The two authenticated roles. Their sessions are stored in separate
/// slots and must never leak into each other.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Operator,
    SuperOperator,
}

impl Role {
    /// Maps the role label found in a legacy unscoped profile onto a slot.
    /// Anything that is not recognizably a super-operator goes to operator.
    pub fn from_legacy_label(label: &str) -> Role {
        match label.to_ascii_lowercase().as_str() {
            "super-operator" | "superoperator" | "superadmin" | "super-admin" | "super_admin" => {
                Role::SuperOperator
            }
            _ => Role::Operator,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Operator => "operator",
            Role::SuperOperator => "super-operator",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_labels_map_to_slots() {
        assert_eq!(Role::from_legacy_label("superadmin"), Role::SuperOperator);
        assert_eq!(Role::from_legacy_label("Super-Operator"), Role::SuperOperator);
        assert_eq!(Role::from_legacy_label("operator"), Role::Operator);
        assert_eq!(Role::from_legacy_label("staff"), Role::Operator);
        assert_eq!(Role::from_legacy_label(""), Role::Operator);
    }
}
