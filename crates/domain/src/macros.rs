//! Macro for implementing Display and FromStr for label enums
//!
//! Generates a single implementation for both traits so that an enum's
//! string form (log fields, config values) and its parser never drift apart.
//!
//! # Example
//!
//! ```rust
//! use busylight_domain::impl_domain_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LogFormat {
//!     Text,
//!     Json,
//! }
//!
//! impl_domain_label_conversions!(LogFormat {
//!     Text => "text",
//!     Json => "json",
//! });
//!
//! assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
//! ```

/// Implements Display and FromStr traits for label enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and names the enum in its error
#[macro_export]
macro_rules! impl_domain_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
