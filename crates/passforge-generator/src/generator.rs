//! Random password generation.
//!
//! Every character is drawn independently and uniformly from the active
//! alphabet using `ring`'s [`SystemRandom`], the operating system CSPRNG.
//! Indices are produced by rejection sampling over random `u32` values so no
//! character is favoured by modulo bias.

use ring::rand::{SecureRandom, SystemRandom};

use crate::charset::CharClasses;

/// The OS random source failed to produce bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("system random source unavailable")]
pub struct RandomUnavailable;

/// Password generator backed by the system CSPRNG.
///
/// Holds no state besides the random source handle, so it is cheap to
/// construct and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Generator {
    rng: SystemRandom,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    /// Generate `length` characters drawn from the enabled classes.
    ///
    /// Returns an empty string when `classes` is empty, regardless of
    /// `length`. The length is not clamped; see [`crate::policy`] for the
    /// range callers should offer.
    ///
    /// # Panics
    ///
    /// Panics if the operating system random source fails.
    pub fn generate(&self, length: usize, classes: CharClasses) -> String {
        match self.try_generate(length, classes) {
            Ok(password) => password,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Generator::generate`], but reports a failing random source
    /// instead of panicking.
    pub fn try_generate(
        &self,
        length: usize,
        classes: CharClasses,
    ) -> Result<String, RandomUnavailable> {
        let alphabet = classes.alphabet();
        if alphabet.is_empty() {
            tracing::trace!(length, "no character class enabled, returning empty password");
            return Ok(String::new());
        }

        let mut password = String::with_capacity(length);
        for _ in 0..length {
            let index = self.uniform_index(alphabet.len())?;
            password.push(char::from(alphabet[index]));
        }

        tracing::trace!(length, alphabet_len = alphabet.len(), "generated password");
        Ok(password)
    }

    /// Draw an index uniformly from `0..bound`.
    ///
    /// `bound` must be non-zero and fit in a `u32`.
    fn uniform_index(&self, bound: usize) -> Result<usize, RandomUnavailable> {
        debug_assert!(bound > 0 && bound as u64 <= u64::from(u32::MAX));

        let bound = bound as u64;
        // Largest multiple of `bound` not exceeding 2^32; draws at or above it
        // are discarded.
        let zone = (1u64 << 32) - ((1u64 << 32) % bound);

        loop {
            let mut bytes = [0u8; 4];
            self.rng.fill(&mut bytes).map_err(|_| RandomUnavailable)?;
            let value = u64::from(u32::from_le_bytes(bytes));
            if value < zone {
                return Ok((value % bound) as usize);
            }
        }
    }
}

/// Generate a password with a fresh [`Generator`].
///
/// Convenience for one-off calls; see [`Generator::generate`].
pub fn generate(length: usize, classes: CharClasses) -> String {
    Generator::new().generate(length, classes)
}

// ── tests ────────────────────────────────────────────────────────────
