//! Error codes for semantic diagnostics.
//!
//! Each code pairs a stable identifier (`E1001`) with the message key the
//! renderer looks up. The first digit is the checking area.

use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where first digit indicates area:
/// - E1xxx: Name and import resolution
/// - E2xxx: Class hierarchy
/// - E3xxx: Overrides and inherited-method meets
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorCode {
    // Resolution Errors (E1xxx)
    /// Class not found
    E1001,
    /// Name imported from two packages
    E1002,
    /// Class exists but is not accessible
    E1003,
    /// Imported package has the same name as a class
    E1004,
    /// Imported package does not exist
    E1005,
    /// Inner class not accessible through a qualified name
    E1006,

    // Hierarchy Errors (E2xxx)
    /// Class inherits from itself
    E2001,

    // Override Errors (E3xxx)
    /// Static method overridden by an instance method
    E3001,
    /// Instance method hidden by a static method
    E3002,
    /// Final method overridden
    E3003,
    /// Override narrows access
    E3004,
    /// Override changes the return type
    E3005,
    /// Override throws exceptions the overridden method does not
    E3006,
    /// Two inherited abstract methods differ in return type
    E3007,
    /// Two inherited methods meet and neither can stand for the other
    E3008,
    /// Package-private method in another package is not overridden (warning)
    E3009,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E2001,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
        ErrorCode::E3007,
        ErrorCode::E3008,
        ErrorCode::E3009,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Message key used to look up the user-facing text.
    pub fn key(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "class.not.found",
            ErrorCode::E1002 => "ambig.class",
            ErrorCode::E1003 => "cant.access.class",
            ErrorCode::E1004 => "class.and.package",
            ErrorCode::E1005 => "package.not.found",
            ErrorCode::E1006 => "no.type.access",
            ErrorCode::E2001 => "cyclic.inheritance",
            ErrorCode::E3001 => "override.static.with.instance",
            ErrorCode::E3002 => "hide.instance.with.static",
            ErrorCode::E3003 => "override.final.method",
            ErrorCode::E3004 => "override.more.restrictive",
            ErrorCode::E3005 => "override.return",
            ErrorCode::E3006 => "override.incompatible.exceptions",
            ErrorCode::E3007 => "meet.different.return",
            ErrorCode::E3008 => "nontrivial.meet",
            ErrorCode::E3009 => "no.override.access",
            ErrorCode::E9001 => "internal.error",
            ErrorCode::E9002 => "too.many.errors",
        }
    }

    /// Check if this is a resolution error (E1xxx range).
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
                | ErrorCode::E1006
        )
    }

    /// Check if this is a hierarchy error (E2xxx range).
    pub fn is_hierarchy_error(&self) -> bool {
        matches!(self, ErrorCode::E2001)
    }

    /// Check if this is an override error (E3xxx range).
    pub fn is_override_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E3001
                | ErrorCode::E3002
                | ErrorCode::E3003
                | ErrorCode::E3004
                | ErrorCode::E3005
                | ErrorCode::E3006
                | ErrorCode::E3007
                | ErrorCode::E3008
                | ErrorCode::E3009
        )
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`, or its message key.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper || code.key() == s)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
