//! Mutation type descriptors and stacking policies
//!
//! A [`MutationType`] decides whether several of its mutations may occupy the
//! same position within one run. Types sharing a `stack_group` are treated
//! as one type for that decision.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Identifier of a mutation type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct MutationTypeId(u32);

impl MutationTypeId {
    /// Create a type id
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw id
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for MutationTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// How mutations of one stack group coexist at a single position
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StackPolicy {
    /// Any number of mutations may stack at a position
    #[default]
    Stack,

    /// The first mutation at a position wins; later ones are rejected
    KeepFirst,

    /// The newest mutation at a position replaces the existing ones
    KeepLast,
}

impl StackPolicy {
    /// One-letter code used in simulation scripts (`s`, `f`, `l`)
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Stack => "s",
            Self::KeepFirst => "f",
            Self::KeepLast => "l",
        }
    }
}

impl Display for StackPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for StackPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(Self::Stack),
            "f" => Ok(Self::KeepFirst),
            "l" => Ok(Self::KeepLast),
            other => Err(PolicyParseError::UnknownCode(other.to_string())),
        }
    }
}

/// Errors parsing a stack policy code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyParseError {
    /// Code is not one of `s`, `f`, `l`
    #[error("unknown stack policy code {0:?} (expected \"s\", \"f\" or \"l\")")]
    UnknownCode(String),
}

/// Mutation type descriptor
///
/// Only the parts a mutation run consults are modelled here; selection
/// coefficients and dominance belong to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MutationType {
    /// Type identifier
    pub id: MutationTypeId,

    /// Stacking policy applied when adding mutations of this type
    pub stack_policy: StackPolicy,

    /// Types with the same group are stacked against each other
    pub stack_group: i64,
}

impl MutationType {
    /// Create a stacking type whose stack group is its own id
    #[inline]
    #[must_use]
    pub const fn new(id: MutationTypeId) -> Self {
        Self {
            id,
            stack_policy: StackPolicy::Stack,
            stack_group: id.get() as i64,
        }
    }

    /// With stack policy
    #[inline]
    #[must_use]
    pub fn with_stack_policy(mut self, policy: StackPolicy) -> Self {
        self.stack_policy = policy;
        self
    }

    /// With stack group
    #[inline]
    #[must_use]
    pub fn with_stack_group(mut self, group: i64) -> Self {
        self.stack_group = group;
        self
    }

    /// Whether mutations of `other` compete with this type at one position
    #[inline]
    #[must_use]
    pub const fn stacks_with(&self, other: &MutationType) -> bool {
        self.stack_group == other.stack_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn policy_codes_round_trip() {
        for policy in [StackPolicy::Stack, StackPolicy::KeepFirst, StackPolicy::KeepLast] {
            assert_eq!(policy.code().parse::<StackPolicy>().unwrap(), policy);
        }
    }

    proptest! {
        #[test]
        fn prop_only_one_letter_codes_parse(code in "[a-z]{0,3}") {
            let parsed = code.parse::<StackPolicy>();
            match code.as_str() {
                "s" | "f" | "l" => {
                    prop_assert_eq!(parsed.unwrap().code(), code.as_str());
                }
                _ => {
                    let expected = PolicyParseError::UnknownCode(code.clone());
                    prop_assert_eq!(parsed, Err(expected));
                }
            }
        }
    }

    #[test]
    fn policy_rejects_unknown_code() {
        let err = "x".parse::<StackPolicy>().unwrap_err();
        assert_eq!(err, PolicyParseError::UnknownCode("x".to_string()));
    }

    #[test]
    fn default_policy_is_stack() {
        assert_eq!(StackPolicy::default(), StackPolicy::Stack);
    }

    #[test]
    fn stack_group_defaults_to_id() {
        let m3 = MutationType::new(MutationTypeId::new(3));
        assert_eq!(m3.stack_group, 3);
        assert_eq!(m3.stack_policy, StackPolicy::Stack);
    }

    #[test]
    fn shared_group_stacks_across_types() {
        let m1 = MutationType::new(MutationTypeId::new(1)).with_stack_group(10);
        let m2 = MutationType::new(MutationTypeId::new(2)).with_stack_group(10);
        let m3 = MutationType::new(MutationTypeId::new(3));
        assert!(m1.stacks_with(&m2));
        assert!(!m1.stacks_with(&m3));
    }

    #[test]
    fn policy_serde_uses_snake_case() {
        let json = serde_json::to_string(&StackPolicy::KeepLast).unwrap();
        assert_eq!(json, "\"keep_last\"");
    }
}
