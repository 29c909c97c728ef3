use crate::error::CoreError;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Length of every short code.
pub const CODE_LENGTH: usize = 7;

/// The 36-symbol alphabet short codes are drawn from.
pub const CODE_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A validated short code identifier for a shortened URL.
///
/// Short codes are exactly 7 characters of lowercase `[a-z0-9]`.
/// Parsing accepts uppercase input and lowercases it, so codes compare
/// case-insensitively everywhere.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a `ShortCode` after lowercasing and validating the input.
    pub fn parse(code: impl AsRef<str>) -> Result<Self, CoreError> {
        let lowered = code.as_ref().to_ascii_lowercase();
        Self::validate(&lowered)?;
        Ok(Self(lowered))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (the generator, or rows read back from the durable store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// True iff the input has the shape of a short code, ignoring case.
    pub fn is_valid_format(code: &str) -> bool {
        code.len() == CODE_LENGTH
            && code
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b.to_ascii_lowercase()))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() != CODE_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be exactly {}, got {}",
                CODE_LENGTH,
                code.len()
            )));
        }

        if !code.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only characters from [a-z0-9]: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Collision checking against the durable store is the allocation
/// engine's responsibility, not the generator's.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Generates a candidate short code. No uniqueness guarantee.
    fn generate(&self) -> ShortCode;
}

/// Production generator: 7 characters drawn independently and uniformly
/// from the alphabet, using the operating system's secure random source.
#[derive(Debug, Clone, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> ShortCode {
        let mut rng = OsRng;
        let code: String = (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
