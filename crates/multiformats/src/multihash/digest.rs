//! Injectable digest functions keyed by algorithm code.
//!
//! The crate never decides which hash implementations exist; callers pass a
//! [`HashFunctions`] table to the operations that need to compute a digest.
//! The default table covers the SHA-2 family and `identity`.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::MultihashError;
use crate::multihash::{Multihash, resolve_algorithm};
use crate::selector::Selector;

/// A function computing a raw digest over its input.
pub type DigestFn = Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// A table of digest functions keyed by multihash algorithm code.
#[derive(Clone)]
pub struct HashFunctions {
    functions: FxHashMap<u64, DigestFn>,
}

impl HashFunctions {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            functions: FxHashMap::default(),
        }
    }

    /// Adds or replaces the function for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Multihash::new`] for an algorithm that
    /// does not resolve.
    pub fn register(
        &mut self,
        algorithm: impl Into<Selector>,
        f: impl Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    ) -> Result<(), MultihashError> {
        let code = resolve_algorithm(algorithm.into())?;
        self.functions.insert(code, Arc::new(f));
        Ok(())
    }

    /// True if a function is registered for `algorithm`.
    pub fn supports(&self, algorithm: impl Into<Selector>) -> bool {
        resolve_algorithm(algorithm.into())
            .map(|code| self.functions.contains_key(&code))
            .unwrap_or(false)
    }

    /// Hashes `content` and wraps the result as a multihash.
    ///
    /// # Errors
    ///
    /// Returns [`MultihashError::UnsupportedAlgorithm`] if no function is
    /// registered for `algorithm`, and [`MultihashError::EmptyDigest`] if the
    /// function produced no bytes (e.g. `identity` over empty content).
    pub fn digest(
        &self,
        algorithm: impl Into<Selector>,
        content: &[u8],
    ) -> Result<Multihash, MultihashError> {
        let code = resolve_algorithm(algorithm.into())?;
        let digest = self.compute(code, content)?;
        Multihash::new(code, &digest)
    }

    pub(crate) fn compute(&self, code: u64, content: &[u8]) -> Result<Vec<u8>, MultihashError> {
        let f = self
            .functions
            .get(&code)
            .ok_or_else(|| MultihashError::UnsupportedAlgorithm {
                algorithm: super::algorithm_name(code),
            })?;
        Ok(f(content))
    }
}

impl Default for HashFunctions {
    fn default() -> Self {
        let mut functions: FxHashMap<u64, DigestFn> = FxHashMap::default();
        functions.insert(0x00, Arc::new(|content: &[u8]| content.to_vec()));
        functions.insert(0x12, Arc::new(|content: &[u8]| Sha256::digest(content).to_vec()));
        functions.insert(0x20, Arc::new(|content: &[u8]| Sha384::digest(content).to_vec()));
        functions.insert(0x13, Arc::new(|content: &[u8]| Sha512::digest(content).to_vec()));
        functions.insert(
            0x56,
            Arc::new(|content: &[u8]| Sha256::digest(Sha256::digest(content)).to_vec()),
        );
        Self { functions }
    }
}

impl fmt::Debug for HashFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<_> = self.functions.keys().copied().collect();
        codes.sort_unstable();
        f.debug_struct("HashFunctions").field("codes", &codes).finish()
    }
}
