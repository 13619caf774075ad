//! Error types for interface description operations
//!
//! All mutation failures are local and non-fatal: the aggregate is left
//! unchanged on error, so callers may treat a collision as a configuration
//! error or as an idempotent no-op. Query operations never produce an error;
//! they return absence.

use serde::{Deserialize, Serialize};

/// Error type for all interface description operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum IfaceError {
    /// A member with the same name is already registered on the interface
    #[error("member '{name}' already exists on interface '{interface}'")]
    MemberAlreadyExists {
        /// Interface the add was attempted on
        interface: String,
        /// Colliding member name
        name: String,
    },

    /// A property with the same name is already registered on the interface
    #[error("property '{name}' already exists on interface '{interface}'")]
    PropertyAlreadyExists {
        /// Interface the add was attempted on
        interface: String,
        /// Colliding property name
        name: String,
    },

    /// An annotation with the same name is already present on the entity
    #[error("annotation '{name}' already exists on '{entity}'")]
    AnnotationAlreadyExists {
        /// Entity path the add was attempted on, e.g. `com.example.Demo.Ping`
        entity: String,
        /// Colliding annotation name
        name: String,
    },

    /// A description for the same language tag is already present
    #[error("description for language '{language}' already exists on '{entity}'")]
    DescriptionAlreadyExists {
        /// Entity path the set was attempted on
        entity: String,
        /// Colliding language tag (may be empty for the tag-less description)
        language: String,
    },

    /// The interface has been activated and can no longer be modified
    #[error("interface '{interface}' is activated and can no longer be modified")]
    InterfaceActivated {
        /// Name of the frozen interface
        interface: String,
    },

    /// The addressed member does not exist on the interface
    #[error("interface '{interface}' has no member '{name}'")]
    NoSuchMember {
        /// Interface the operation was addressed to
        interface: String,
        /// Missing member name
        name: String,
    },

    /// The addressed property does not exist on the interface
    #[error("interface '{interface}' has no property '{name}'")]
    NoSuchProperty {
        /// Interface the operation was addressed to
        interface: String,
        /// Missing property name
        name: String,
    },
}

impl IfaceError {
    /// Create a member collision error
    pub fn member_already_exists(interface: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MemberAlreadyExists {
            interface: interface.into(),
            name: name.into(),
        }
    }

    /// Create a property collision error
    pub fn property_already_exists(interface: impl Into<String>, name: impl Into<String>) -> Self {
        Self::PropertyAlreadyExists {
            interface: interface.into(),
            name: name.into(),
        }
    }

    /// Create an annotation collision error
    pub fn annotation_already_exists(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AnnotationAlreadyExists {
            entity: entity.into(),
            name: name.into(),
        }
    }

    /// Create a description collision error
    pub fn description_already_exists(
        entity: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self::DescriptionAlreadyExists {
            entity: entity.into(),
            language: language.into(),
        }
    }

    /// Create a frozen-interface error
    pub fn interface_activated(interface: impl Into<String>) -> Self {
        Self::InterfaceActivated {
            interface: interface.into(),
        }
    }

    /// Create a missing-member error
    pub fn no_such_member(interface: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NoSuchMember {
            interface: interface.into(),
            name: name.into(),
        }
    }

    /// Create a missing-property error
    pub fn no_such_property(interface: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NoSuchProperty {
            interface: interface.into(),
            name: name.into(),
        }
    }
}

/// Standard Result type for interface description operations
pub type Result<T> = std::result::Result<T, IfaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IfaceError::member_already_exists("com.example.Demo", "Ping");
        assert_eq!(
            err.to_string(),
            "member 'Ping' already exists on interface 'com.example.Demo'"
        );

        let err = IfaceError::interface_activated("com.example.Demo");
        assert_eq!(
            err.to_string(),
            "interface 'com.example.Demo' is activated and can no longer be modified"
        );
    }

    #[test]
    fn test_error_matching() {
        let err = IfaceError::description_already_exists("com.example.Demo.Ping", "en-US");
        assert!(matches!(err, IfaceError::DescriptionAlreadyExists { .. }));
    }
}
