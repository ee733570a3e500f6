//! Generators produce the string value of authorization codes.
//!
//! A code is only a handle: everything bound to it is kept by the storage collaborators. Hence
//! the only requirement on a generator is that its output is infeasible to guess.
use std::sync::Arc;

use rand::{rngs::OsRng, RngCore};

/// Generates the value of a fresh authorization code.
///
/// ## Requirements on implementations
///
/// The output MUST be indistinguishable from a random function so that one can not derive the
/// code of another grant from ones own. Implementations are shared between concurrent calls and
/// must not rely on exclusive access.
pub trait CodeGenerator: Send + Sync {
    /// Produce a new code.
    fn generate(&self) -> Result<String, GeneratorError>;
}

/// The generator could not produce a code.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The source of randomness failed.
    #[error("failed to gather randomness: {0}")]
    Random(#[from] rand::Error),
}

/// Generates codes from random bytes.
///
/// Each byte is drawn from the operating system's randomness source. The result is encoded in the
/// url-safe base64 alphabet without padding so it can be put in a query component unchanged.
#[derive(Clone, Copy, Debug)]
pub struct RandomGenerator {
    len: usize,
}

impl RandomGenerator {
    /// Generates codes with a specific byte length.
    pub fn new(length: usize) -> RandomGenerator {
        RandomGenerator { len: length }
    }
}

impl CodeGenerator for RandomGenerator {
    fn generate(&self) -> Result<String, GeneratorError> {
        let mut result = vec![0; self.len];
        OsRng.try_fill_bytes(result.as_mut_slice())?;
        Ok(base64::encode_config(&result, base64::URL_SAFE_NO_PAD))
    }
}

impl<T: CodeGenerator + ?Sized> CodeGenerator for Box<T> {
    fn generate(&self) -> Result<String, GeneratorError> {
        (**self).generate()
    }
}

impl<T: CodeGenerator + ?Sized> CodeGenerator for Arc<T> {
    fn generate(&self) -> Result<String, GeneratorError> {
        (**self).generate()
    }
}

impl<'a, T: CodeGenerator + ?Sized> CodeGenerator for &'a T {
    fn generate(&self) -> Result<String, GeneratorError> {
        (**self).generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_codes_differ() {
        let generator = RandomGenerator::new(16);
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_ne!(first, second);
        // 16 bytes are 22 characters of unpadded base64.
        assert_eq!(first.len(), 22);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn assert_send_sync_static() {
        fn uses<T: Send + Sync + 'static>(_: T) {}
        uses(RandomGenerator::new(16));
        uses(Arc::new(RandomGenerator::new(16)) as Arc<dyn CodeGenerator>);
    }
}
