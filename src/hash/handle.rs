//! Single-use algorithm handle
//!
//! Wraps one [`HashFunction`] and enforces its lifecycle:
//! `Uninitialized -> Initialized -> Finalized`. Keys may only be set before
//! initialization, transforms must arrive contiguously from offset zero, and
//! the digest can be taken exactly once.

use crate::error::{HashError, Result};
use crate::hash::algorithms::HashFunction;
use crate::hash::digest::Digest;
use crate::hash::reader::TransformSink;

/// Lifecycle state of an [`AlgorithmHandle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Created; keys may still be set
    Uninitialized,
    /// Accepting transforms
    Initialized,
    /// Digest taken
    Finalized,
}

impl HandleState {
    /// Lowercase state name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for HandleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned, single-use hash computation
pub struct AlgorithmHandle {
    function: Box<dyn HashFunction>,
    state: HandleState,
    position: u64,
}

impl AlgorithmHandle {
    /// Take ownership of a freshly created hash function
    pub fn new(function: Box<dyn HashFunction>) -> Self {
        Self {
            function,
            state: HandleState::Uninitialized,
            position: 0,
        }
    }

    /// Algorithm name
    pub fn name(&self) -> &'static str {
        self.function.name()
    }

    /// Current lifecycle state
    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Bytes transformed since `initialize`
    pub fn bytes_transformed(&self) -> u64 {
        self.position
    }

    fn violation(&self, operation: &'static str) -> HashError {
        tracing::error!(
            "{}: {} called while handle is {}",
            self.function.name(),
            operation,
            self.state
        );
        HashError::ProtocolViolation {
            operation,
            state: self.state.as_str(),
        }
    }

    /// Install a key; only legal before `initialize`
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        if self.state != HandleState::Uninitialized {
            return Err(self.violation("set_key"));
        }
        let name = self.function.name();
        match self.function.as_keyed() {
            Some(keyed) => keyed.set_key(key),
            None => Err(HashError::UnsupportedParameter(format!(
                "{} does not accept a key",
                name
            ))),
        }
    }

    /// Establish the starting state
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != HandleState::Uninitialized {
            return Err(self.violation("initialize"));
        }
        self.function.initialize();
        self.state = HandleState::Initialized;
        Ok(())
    }

    /// Absorb the bytes at `offset`, which must follow the previous transform
    pub fn transform(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if self.state != HandleState::Initialized {
            return Err(self.violation("transform"));
        }
        if offset != self.position {
            tracing::error!(
                "{}: transform at offset {} but {} bytes were absorbed",
                self.function.name(),
                offset,
                self.position
            );
            return Err(HashError::ProtocolViolation {
                operation: "transform (non-contiguous offset)",
                state: self.state.as_str(),
            });
        }
        self.function.transform_bytes(offset, data);
        self.position += data.len() as u64;
        Ok(())
    }

    /// Produce the digest; the handle accepts no further calls
    pub fn finalize(&mut self) -> Result<Digest> {
        if self.state != HandleState::Initialized {
            return Err(self.violation("finalize"));
        }
        self.state = HandleState::Finalized;
        Ok(Digest::new(self.function.transform_final()))
    }
}

impl TransformSink for AlgorithmHandle {
    fn transform(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        AlgorithmHandle::transform(self, offset, data)
    }
}

impl std::fmt::Debug for AlgorithmHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmHandle")
            .field("algorithm", &self.function.name())
            .field("state", &self.state)
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::algorithms::{Crc32Hash, SipHash64};

    #[test]
    fn test_lifecycle() {
        let mut handle = AlgorithmHandle::new(Crc32Hash::create());
        assert_eq!(handle.state(), HandleState::Uninitialized);

        handle.initialize().unwrap();
        handle.transform(0, b"ab").unwrap();
        handle.transform(2, b"c").unwrap();
        assert_eq!(handle.bytes_transformed(), 3);

        let digest = handle.finalize().unwrap();
        assert_eq!(digest.to_hex(), "352441c2");
        assert_eq!(handle.state(), HandleState::Finalized);
    }

    #[test]
    fn test_finalize_without_transform() {
        let mut handle = AlgorithmHandle::new(Crc32Hash::create());
        handle.initialize().unwrap();
        assert_eq!(handle.finalize().unwrap().to_hex(), "00000000");
    }

    #[test]
    fn test_double_finalize_is_violation() {
        let mut handle = AlgorithmHandle::new(Crc32Hash::create());
        handle.initialize().unwrap();
        handle.transform(0, b"abc").unwrap();
        assert!(handle.finalize().is_ok());

        let err = handle.finalize().unwrap_err();
        assert!(matches!(
            err,
            HashError::ProtocolViolation { operation: "finalize", state: "finalized" }
        ));
    }

    #[test]
    fn test_transform_before_initialize() {
        let mut handle = AlgorithmHandle::new(Crc32Hash::create());
        let err = handle.transform(0, b"abc").unwrap_err();
        assert!(matches!(err, HashError::ProtocolViolation { state: "uninitialized", .. }));
        assert!(handle.finalize().is_err());
    }

    #[test]
    fn test_transform_after_finalize() {
        let mut handle = AlgorithmHandle::new(Crc32Hash::create());
        handle.initialize().unwrap();
        handle.finalize().unwrap();
        assert!(handle.transform(0, b"late").is_err());
        assert!(handle.initialize().is_err());
    }

    #[test]
    fn test_non_contiguous_offset() {
        let mut handle = AlgorithmHandle::new(Crc32Hash::create());
        handle.initialize().unwrap();
        handle.transform(0, b"abc").unwrap();
        assert!(handle.transform(4, b"def").is_err());
        assert!(handle.transform(1, b"def").is_err());
        assert!(handle.transform(3, b"def").is_ok());
    }

    #[test]
    fn test_set_key_rules() {
        let mut handle = AlgorithmHandle::new(SipHash64::create());
        handle.set_key(&[7u8; 16]).unwrap();
        handle.initialize().unwrap();
        assert!(matches!(
            handle.set_key(&[1u8; 16]).unwrap_err(),
            HashError::ProtocolViolation { operation: "set_key", .. }
        ));

        let mut unkeyed = AlgorithmHandle::new(Crc32Hash::create());
        assert!(matches!(
            unkeyed.set_key(b"key").unwrap_err(),
            HashError::UnsupportedParameter(_)
        ));
    }
}
