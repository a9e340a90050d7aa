//! Macro for implementing Display and FromStr for wire-level state enums
//!
//! The control plane reports states as upper-case strings (`"PENDING"`,
//! `"RUNNING"`, ...). This macro keeps the enum, its display form and its
//! parser in one place.
//!
//! # Example
//!
//! ```rust
//! use clustersync_domain::impl_wire_state_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LibraryState {
//!     Pending,
//!     Installed,
//! }
//!
//! impl_wire_state_conversions!(LibraryState {
//!     Pending => "PENDING",
//!     Installed => "INSTALLED",
//! });
//! ```

/// Implements Display and FromStr traits for wire-level state enums
///
/// This macro generates:
/// - Display trait: writes the variant's wire string
/// - FromStr trait: parses case-insensitively into the matching variant
///
/// Wire strings must be upper-case.
#[macro_export]
macro_rules! impl_wire_state_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_uppercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
