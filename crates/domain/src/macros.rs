//! Macro for implementing Display, FromStr and `as_str` for choice enums
//!
//! ServiceNow choice fields travel as lowercase strings. This macro keeps the
//! wire string, `Display` and case-insensitive parsing in one table.
//!
//! # Example
//!
//! ```rust
//! use snowgate_domain::impl_choice_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Rollout {
//!     Draft,
//!     Live,
//! }
//!
//! impl_choice_conversions!(Rollout {
//!     Draft => "draft",
//!     Live => "live",
//! });
//!
//! assert_eq!(Rollout::Live.as_str(), "live");
//! assert_eq!("DRAFT".parse::<Rollout>().unwrap(), Rollout::Draft);
//! ```

/// Implements `as_str`, Display and FromStr for choice enums
///
/// - `as_str`/Display: the wire string
/// - FromStr: case-insensitive, with a descriptive error naming the enum
#[macro_export]
macro_rules! impl_choice_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this choice
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
