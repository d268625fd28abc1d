//! Character classes and the alphabet they assemble into.
//!
//! The four pools are fixed, and when several are enabled they are always
//! concatenated in the same order: lowercase, uppercase, digits, special.

use serde::{Deserialize, Serialize};

/// `a`–`z`.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// `A`–`Z`.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `0`–`9`.
pub const DIGITS: &str = "0123456789";

/// The fourteen special characters, in canonical order.
pub const SPECIAL: &str = "!@#$%^&*()-_=+";

// ---------------------------------------------------------------------------
// CharClass
// ---------------------------------------------------------------------------

/// One of the four character pools a password may draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl CharClass {
    /// Every class, in alphabet concatenation order.
    pub const ALL: [CharClass; 4] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digit,
        CharClass::Special,
    ];

    /// The characters belonging to this class.
    pub fn pool(self) -> &'static str {
        match self {
            Self::Lowercase => LOWERCASE,
            Self::Uppercase => UPPERCASE,
            Self::Digit => DIGITS,
            Self::Special => SPECIAL,
        }
    }

    /// Stable lowercase name, as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Digit => "digit",
            Self::Special => "special",
        }
    }
}

impl std::fmt::Display for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CharClasses
// ---------------------------------------------------------------------------

/// A set of enabled character classes.
///
/// Each class is toggled independently. The empty set is valid and yields an
/// empty alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharClasses {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub special: bool,
}

impl Default for CharClasses {
    /// Every class enabled, matching the generator screen's initial toggles.
    fn default() -> Self {
        Self::all()
    }
}

impl CharClasses {
    /// No class enabled.
    pub const fn none() -> Self {
        Self {
            lowercase: false,
            uppercase: false,
            digits: false,
            special: false,
        }
    }

    /// All four classes enabled.
    pub const fn all() -> Self {
        Self {
            lowercase: true,
            uppercase: true,
            digits: true,
            special: true,
        }
    }

    /// Build a set from four independent toggles.
    pub const fn from_flags(lowercase: bool, uppercase: bool, digits: bool, special: bool) -> Self {
        Self {
            lowercase,
            uppercase,
            digits,
            special,
        }
    }

    /// Return a copy with `class` enabled.
    #[must_use]
    pub fn with(mut self, class: CharClass) -> Self {
        self.set(class, true);
        self
    }

    /// Return a copy with `class` disabled.
    #[must_use]
    pub fn without(mut self, class: CharClass) -> Self {
        self.set(class, false);
        self
    }

    /// Enable or disable a single class in place.
    pub fn set(&mut self, class: CharClass, enabled: bool) {
        match class {
            CharClass::Lowercase => self.lowercase = enabled,
            CharClass::Uppercase => self.uppercase = enabled,
            CharClass::Digit => self.digits = enabled,
            CharClass::Special => self.special = enabled,
        }
    }

    /// Whether `class` is enabled.
    pub fn contains(&self, class: CharClass) -> bool {
        match class {
            CharClass::Lowercase => self.lowercase,
            CharClass::Uppercase => self.uppercase,
            CharClass::Digit => self.digits,
            CharClass::Special => self.special,
        }
    }

    /// `true` when no class is enabled.
    pub fn is_empty(&self) -> bool {
        !(self.lowercase || self.uppercase || self.digits || self.special)
    }

    /// Enabled classes in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = CharClass> + '_ {
        CharClass::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Concatenate the enabled pools in canonical order.
    pub fn alphabet(&self) -> Vec<u8> {
        let mut alphabet = Vec::with_capacity(76);
        for class in self.iter() {
            alphabet.extend_from_slice(class.pool().as_bytes());
        }
        alphabet
    }
}

impl FromIterator<CharClass> for CharClasses {
    fn from_iter<I: IntoIterator<Item = CharClass>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_sizes() {
        assert_eq!(LOWERCASE.len(), 26);
        assert_eq!(UPPERCASE.len(), 26);
        assert_eq!(DIGITS.len(), 10);
        assert_eq!(SPECIAL.len(), 14);
    }

    #[test]
    fn full_alphabet_is_concatenated_in_order() {
        let alphabet = CharClasses::all().alphabet();
        let expected = format!("{LOWERCASE}{UPPERCASE}{DIGITS}{SPECIAL}");
        assert_eq!(alphabet, expected.as_bytes());
        assert_eq!(alphabet.len(), 76);
    }

    #[test]
    fn order_does_not_depend_on_how_the_set_was_built() {
        let a: CharClasses = [CharClass::Special, CharClass::Lowercase].into_iter().collect();
        let b = CharClasses::none()
            .with(CharClass::Lowercase)
            .with(CharClass::Special);
        assert_eq!(a, b);
        assert_eq!(a.alphabet(), format!("{LOWERCASE}{SPECIAL}").as_bytes());
    }

    #[test]
    fn empty_set_has_empty_alphabet() {
        let none = CharClasses::none();
        assert!(none.is_empty());
        assert!(none.alphabet().is_empty());
        assert_eq!(none.iter().count(), 0);
    }

    #[test]
    fn without_disables_a_class() {
        let set = CharClasses::all().without(CharClass::Uppercase);
        assert!(!set.contains(CharClass::Uppercase));
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn default_matches_initial_toggles() {
        let set = CharClasses::default();
        assert!(set.lowercase && set.uppercase && set.digits && set.special);
        assert_eq!(set, CharClasses::all());
    }

    #[test]
    fn deserializes_with_missing_fields_as_defaults() {
        let set: CharClasses = serde_json::from_str(r#"{"special": true}"#).unwrap();
        assert_eq!(set, CharClasses::all());
    }
}
