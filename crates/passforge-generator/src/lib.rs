//! # passforge-generator
//!
//! Random password generation for PassForge.
//!
//! A password is built from up to four character pools (lowercase,
//! uppercase, digits, special) concatenated in a fixed order. Each character
//! is drawn independently and uniformly using the operating system CSPRNG
//! via `ring`.
//!
//! ## Quick start
//!
//! ```rust
//! use passforge_generator::{CharClass, CharClasses, Generator, policy};
//!
//! let generator = Generator::new();
//! let classes = CharClasses::none()
//!     .with(CharClass::Lowercase)
//!     .with(CharClass::Digit);
//! let password = generator.generate(policy::DEFAULT_LENGTH, classes);
//! assert_eq!(password.len(), 12);
//! ```

pub mod charset;
pub mod generator;
pub mod policy;

// ── re-exports ───────────────────────────────────────────────────────

pub use charset::{CharClass, CharClasses};
pub use generator::{Generator, RandomUnavailable, generate};
