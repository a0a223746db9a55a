//! # Identity — Typed Identifiers
//!
//! Assessment periods, basis records and cases each get their own UUID
//! newtype so that a basis id can never be passed where an assessment
//! period id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one assessment period ("vurderingsperiode").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub Uuid);

/// Identifier of one basis record ("grunnlag").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasisId(pub Uuid);

/// Identifier of the case an aggregate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub Uuid);

macro_rules! impl_uuid_newtype {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

impl_uuid_newtype!(AssessmentId, "assessment");
impl_uuid_newtype!(BasisId, "basis");
impl_uuid_newtype!(CaseId, "case");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(AssessmentId::new(), AssessmentId::new());
        assert_ne!(BasisId::new(), BasisId::new());
    }

    #[test]
    fn display_is_prefixed() {
        let id = CaseId(Uuid::nil());
        assert_eq!(
            id.to_string(),
            "case:00000000-0000-0000-0000-000000000000"
        );
        assert!(BasisId::new().to_string().starts_with("basis:"));
        assert!(AssessmentId::new().to_string().starts_with("assessment:"));
    }

    #[test]
    fn serde_is_transparent_uuid() {
        let id = AssessmentId(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
