//! Hash function contract and adapters over the algorithm crates
//!
//! Every algorithm is driven through the same three calls: `initialize`,
//! any number of `transform_bytes`, then `transform_final`. Keyed algorithms
//! additionally accept a key between construction and `initialize`.
//!
//! Integer checksums (Adler-32, CRC-32, FNV, xxHash) are emitted big-endian so
//! their hex rendering matches published test vectors. SipHash output keeps
//! the little-endian byte order of its reference implementation.

use crate::error::{HashError, Result};
use serde::{Deserialize, Serialize};
use std::hash::Hasher as StdHasher;

/// Capability every hash algorithm exposes to the engine
pub trait HashFunction: Send {
    /// Algorithm name
    fn name(&self) -> &'static str;

    /// Output length in bytes
    fn digest_size(&self) -> usize;

    /// Establish the starting state, applying any key or seed
    fn initialize(&mut self);

    /// Absorb `data`, which starts `offset` bytes into the hashed stream
    fn transform_bytes(&mut self, offset: u64, data: &[u8]);

    /// Produce the digest of everything absorbed since `initialize`
    fn transform_final(&mut self) -> Vec<u8>;

    /// Keyed capability, if the algorithm has one
    fn as_keyed(&mut self) -> Option<&mut dyn KeyedHashFunction> {
        None
    }
}

/// Algorithms configured with a byte key before `initialize`
pub trait KeyedHashFunction: HashFunction {
    /// Required key length; an empty key selects the algorithm default
    fn key_length(&self) -> usize;

    /// Install the key used by the next `initialize`
    fn set_key(&mut self, key: &[u8]) -> Result<()>;
}

fn fixed_key<const N: usize>(name: &str, key: &[u8]) -> Result<Option<[u8; N]>> {
    if key.is_empty() {
        return Ok(None);
    }
    let key: [u8; N] = key.try_into().map_err(|_| {
        HashError::invalid_parameter(format!(
            "{} key must be {} bytes, got {}",
            name,
            N,
            key.len()
        ))
    })?;
    Ok(Some(key))
}

// ---------------------------------------------------------------------------
// Checksums
// ---------------------------------------------------------------------------

/// Adler-32, optionally started from a caller-supplied running checksum
pub struct Adler32Hash {
    initial: u32,
    state: adler::Adler32,
}

impl Adler32Hash {
    /// Standard Adler-32 (running value 1)
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self::with_initial(1))
    }

    /// Adler-32 resumed from `initial`
    pub fn create_with_initial(initial: u32) -> Box<dyn HashFunction> {
        Box::new(Self::with_initial(initial))
    }

    fn with_initial(initial: u32) -> Self {
        Self {
            initial,
            state: adler::Adler32::from_checksum(initial),
        }
    }
}

impl HashFunction for Adler32Hash {
    fn name(&self) -> &'static str {
        "Adler-32"
    }

    fn digest_size(&self) -> usize {
        4
    }

    fn initialize(&mut self) {
        self.state = adler::Adler32::from_checksum(self.initial);
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.write_slice(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.checksum().to_be_bytes().to_vec()
    }
}

/// CRC-32 (IEEE), optionally started from a caller-supplied value
pub struct Crc32Hash {
    initial: u32,
    state: crc32fast::Hasher,
}

impl Crc32Hash {
    /// Standard CRC-32
    pub fn create() -> Box<dyn HashFunction> {
        Self::create_with_initial(0)
    }

    /// CRC-32 resumed from `initial`
    pub fn create_with_initial(initial: u32) -> Box<dyn HashFunction> {
        Box::new(Self {
            initial,
            state: crc32fast::Hasher::new_with_initial(initial),
        })
    }
}

impl HashFunction for Crc32Hash {
    fn name(&self) -> &'static str {
        "CRC-32"
    }

    fn digest_size(&self) -> usize {
        4
    }

    fn initialize(&mut self) {
        self.state = crc32fast::Hasher::new_with_initial(self.initial);
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        let state = std::mem::replace(
            &mut self.state,
            crc32fast::Hasher::new_with_initial(self.initial),
        );
        state.finalize().to_be_bytes().to_vec()
    }
}

/// FNV-1a, 64-bit
pub struct Fnv1a64Hash {
    state: fnv::FnvHasher,
}

impl Fnv1a64Hash {
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self {
            state: fnv::FnvHasher::default(),
        })
    }
}

impl HashFunction for Fnv1a64Hash {
    fn name(&self) -> &'static str {
        "FNV-1a 64"
    }

    fn digest_size(&self) -> usize {
        8
    }

    fn initialize(&mut self) {
        self.state = fnv::FnvHasher::default();
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.write(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.finish().to_be_bytes().to_vec()
    }
}

// ---------------------------------------------------------------------------
// Fast non-cryptographic hashes
// ---------------------------------------------------------------------------

/// XXH3 in its 64-bit or 128-bit output form
pub struct Xxh3Hash {
    wide: bool,
    state: xxhash_rust::xxh3::Xxh3,
}

impl Xxh3Hash {
    /// XXH3 with 64-bit output
    pub fn create_64() -> Box<dyn HashFunction> {
        Box::new(Self {
            wide: false,
            state: xxhash_rust::xxh3::Xxh3::new(),
        })
    }

    /// XXH3 with 128-bit output
    pub fn create_128() -> Box<dyn HashFunction> {
        Box::new(Self {
            wide: true,
            state: xxhash_rust::xxh3::Xxh3::new(),
        })
    }
}

impl HashFunction for Xxh3Hash {
    fn name(&self) -> &'static str {
        if self.wide {
            "XXH3-128"
        } else {
            "XXH3-64"
        }
    }

    fn digest_size(&self) -> usize {
        if self.wide {
            16
        } else {
            8
        }
    }

    fn initialize(&mut self) {
        self.state.reset();
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        if self.wide {
            self.state.digest128().to_be_bytes().to_vec()
        } else {
            self.state.digest().to_be_bytes().to_vec()
        }
    }
}

/// XXH32 keyed by its 32-bit seed (4 little-endian key bytes)
pub struct XxHash32 {
    seed: u32,
    state: xxhash_rust::xxh32::Xxh32,
}

impl XxHash32 {
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self {
            seed: 0,
            state: xxhash_rust::xxh32::Xxh32::new(0),
        })
    }
}

impl HashFunction for XxHash32 {
    fn name(&self) -> &'static str {
        "XXHash32"
    }

    fn digest_size(&self) -> usize {
        4
    }

    fn initialize(&mut self) {
        self.state = xxhash_rust::xxh32::Xxh32::new(self.seed);
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.digest().to_be_bytes().to_vec()
    }

    fn as_keyed(&mut self) -> Option<&mut dyn KeyedHashFunction> {
        Some(self)
    }
}

impl KeyedHashFunction for XxHash32 {
    fn key_length(&self) -> usize {
        4
    }

    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.seed = fixed_key::<4>(self.name(), key)?.map_or(0, u32::from_le_bytes);
        Ok(())
    }
}

/// XXH64 keyed by its 64-bit seed (8 little-endian key bytes)
pub struct XxHash64 {
    seed: u64,
    state: xxhash_rust::xxh64::Xxh64,
}

impl XxHash64 {
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self {
            seed: 0,
            state: xxhash_rust::xxh64::Xxh64::new(0),
        })
    }
}

impl HashFunction for XxHash64 {
    fn name(&self) -> &'static str {
        "XXHash64"
    }

    fn digest_size(&self) -> usize {
        8
    }

    fn initialize(&mut self) {
        self.state = xxhash_rust::xxh64::Xxh64::new(self.seed);
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.digest().to_be_bytes().to_vec()
    }

    fn as_keyed(&mut self) -> Option<&mut dyn KeyedHashFunction> {
        Some(self)
    }
}

impl KeyedHashFunction for XxHash64 {
    fn key_length(&self) -> usize {
        8
    }

    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.seed = fixed_key::<8>(self.name(), key)?.map_or(0, u64::from_le_bytes);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SipHash
// ---------------------------------------------------------------------------

/// Key used when no SipHash key is configured (bytes 0x00..=0x0f)
pub const SIPHASH_DEFAULT_KEY: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
    0x0f,
];

/// SipHash-2-4 with 64-bit output
pub struct SipHash64 {
    key: [u8; 16],
    state: siphasher::sip::SipHasher24,
}

impl SipHash64 {
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self {
            key: SIPHASH_DEFAULT_KEY,
            state: siphasher::sip::SipHasher24::new_with_key(&SIPHASH_DEFAULT_KEY),
        })
    }
}

impl HashFunction for SipHash64 {
    fn name(&self) -> &'static str {
        "SipHash-2-4"
    }

    fn digest_size(&self) -> usize {
        8
    }

    fn initialize(&mut self) {
        self.state = siphasher::sip::SipHasher24::new_with_key(&self.key);
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.write(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.finish().to_le_bytes().to_vec()
    }

    fn as_keyed(&mut self) -> Option<&mut dyn KeyedHashFunction> {
        Some(self)
    }
}

impl KeyedHashFunction for SipHash64 {
    fn key_length(&self) -> usize {
        16
    }

    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.key = fixed_key::<16>(self.name(), key)?.unwrap_or(SIPHASH_DEFAULT_KEY);
        Ok(())
    }
}

/// SipHash-2-4 with 128-bit output
pub struct SipHash128 {
    key: [u8; 16],
    state: siphasher::sip128::SipHasher24,
}

impl SipHash128 {
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self {
            key: SIPHASH_DEFAULT_KEY,
            state: siphasher::sip128::SipHasher24::new_with_key(&SIPHASH_DEFAULT_KEY),
        })
    }
}

impl HashFunction for SipHash128 {
    fn name(&self) -> &'static str {
        "SipHash-2-4-128"
    }

    fn digest_size(&self) -> usize {
        16
    }

    fn initialize(&mut self) {
        self.state = siphasher::sip128::SipHasher24::new_with_key(&self.key);
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.write(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        use siphasher::sip128::Hasher128;
        self.state.finish128().as_bytes().to_vec()
    }

    fn as_keyed(&mut self) -> Option<&mut dyn KeyedHashFunction> {
        Some(self)
    }
}

impl KeyedHashFunction for SipHash128 {
    fn key_length(&self) -> usize {
        16
    }

    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.key = fixed_key::<16>(self.name(), key)?.unwrap_or(SIPHASH_DEFAULT_KEY);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Cryptographic digests
// ---------------------------------------------------------------------------

/// SHA-256
pub struct Sha256Hash {
    state: sha2::Sha256,
}

impl Sha256Hash {
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self {
            state: sha2::Sha256::default(),
        })
    }
}

impl HashFunction for Sha256Hash {
    fn name(&self) -> &'static str {
        "SHA-256"
    }

    fn digest_size(&self) -> usize {
        32
    }

    fn initialize(&mut self) {
        self.state = sha2::Sha256::default();
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        sha2::Digest::update(&mut self.state, data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        sha2::Digest::finalize(std::mem::take(&mut self.state)).to_vec()
    }
}

/// BLAKE3 with its default 32-byte output
pub struct Blake3Hash {
    state: blake3::Hasher,
}

impl Blake3Hash {
    pub fn create() -> Box<dyn HashFunction> {
        Box::new(Self {
            state: blake3::Hasher::new(),
        })
    }
}

impl HashFunction for Blake3Hash {
    fn name(&self) -> &'static str {
        "BLAKE3"
    }

    fn digest_size(&self) -> usize {
        blake3::OUT_LEN
    }

    fn initialize(&mut self) {
        self.state.reset();
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.finalize().as_bytes().to_vec()
    }
}

/// Number of Tiger passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashRounds {
    /// 3 passes
    Rounds3,
    /// 4 passes
    Rounds4,
    /// 5 passes
    Rounds5,
    /// 8 passes
    Rounds8,
}

impl HashRounds {
    /// Number of passes
    pub fn count(&self) -> u32 {
        match self {
            Self::Rounds3 => 3,
            Self::Rounds4 => 4,
            Self::Rounds5 => 5,
            Self::Rounds8 => 8,
        }
    }
}

/// Tiger family (Tiger, Tiger2) with output truncated to `size` bytes
pub struct TigerHash<D> {
    name: &'static str,
    size: usize,
    state: D,
}

/// Full Tiger output length in bytes
pub const TIGER_OUTPUT_SIZE: usize = 24;

impl<D> TigerHash<D>
where
    D: tiger::Digest + Default + Send + 'static,
{
    fn create_named(name: &'static str, size: usize, rounds: HashRounds) -> Result<Box<dyn HashFunction>> {
        if rounds != HashRounds::Rounds3 {
            return Err(HashError::UnsupportedParameter(format!(
                "{} with {} rounds (only 3 rounds are available)",
                name,
                rounds.count()
            )));
        }
        if size == 0 || size > TIGER_OUTPUT_SIZE {
            return Err(HashError::invalid_parameter(format!(
                "{} output size must be 1..={} bytes, got {}",
                name, TIGER_OUTPUT_SIZE, size
            )));
        }
        Ok(Box::new(Self {
            name,
            size,
            state: D::default(),
        }))
    }
}

impl TigerHash<tiger::Tiger> {
    /// Tiger with original padding
    pub fn create(size: usize, rounds: HashRounds) -> Result<Box<dyn HashFunction>> {
        Self::create_named("Tiger", size, rounds)
    }
}

impl TigerHash<tiger::Tiger2> {
    /// Tiger2 (MD-style padding)
    pub fn create(size: usize, rounds: HashRounds) -> Result<Box<dyn HashFunction>> {
        Self::create_named("Tiger2", size, rounds)
    }
}

impl<D> HashFunction for TigerHash<D>
where
    D: tiger::Digest + Default + Send,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn digest_size(&self) -> usize {
        self.size
    }

    fn initialize(&mut self) {
        self.state = D::default();
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        let full = std::mem::take(&mut self.state).finalize();
        full[..self.size].to_vec()
    }
}

/// Parameter block for the BLAKE2 family
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blake2Config {
    key: Vec<u8>,
    salt: Vec<u8>,
    personalization: Vec<u8>,
    hash_size: usize,
}

impl Blake2Config {
    /// Unkeyed configuration with the given output size in bytes
    pub fn new(hash_size: usize) -> Self {
        Self {
            hash_size,
            ..Default::default()
        }
    }

    pub fn set_key(&mut self, key: Vec<u8>) -> &mut Self {
        self.key = key;
        self
    }

    pub fn set_salt(&mut self, salt: Vec<u8>) -> &mut Self {
        self.salt = salt;
        self
    }

    pub fn set_personalization(&mut self, personalization: Vec<u8>) -> &mut Self {
        self.personalization = personalization;
        self
    }

    pub fn set_hash_size(&mut self, hash_size: usize) -> &mut Self {
        self.hash_size = hash_size;
        self
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn personalization(&self) -> &[u8] {
        &self.personalization
    }

    pub fn hash_size(&self) -> usize {
        self.hash_size
    }

    fn validate(&self, name: &str, key: usize, salt: usize, personal: usize, out: usize) -> Result<()> {
        let check = |field: &str, len: usize, max: usize| {
            if len > max {
                Err(HashError::invalid_parameter(format!(
                    "{} {} must be at most {} bytes, got {}",
                    name, field, max, len
                )))
            } else {
                Ok(())
            }
        };
        check("key", self.key.len(), key)?;
        check("salt", self.salt.len(), salt)?;
        check("personalization", self.personalization.len(), personal)?;
        check("hash size", self.hash_size, out)?;
        if self.hash_size == 0 {
            return Err(HashError::invalid_parameter(format!(
                "{} hash size must be at least 1 byte",
                name
            )));
        }
        Ok(())
    }
}

/// BLAKE2b with key, salt, personalization and variable output
pub struct Blake2bHash {
    params: blake2b_simd::Params,
    state: blake2b_simd::State,
    size: usize,
}

impl Blake2bHash {
    pub fn create(config: &Blake2Config) -> Result<Box<dyn HashFunction>> {
        config.validate(
            "Blake2B",
            blake2b_simd::KEYBYTES,
            blake2b_simd::SALTBYTES,
            blake2b_simd::PERSONALBYTES,
            blake2b_simd::OUTBYTES,
        )?;

        let mut params = blake2b_simd::Params::new();
        params
            .hash_length(config.hash_size)
            .key(&config.key)
            .salt(&config.salt)
            .personal(&config.personalization);
        let state = params.to_state();

        Ok(Box::new(Self {
            params,
            state,
            size: config.hash_size,
        }))
    }
}

impl HashFunction for Blake2bHash {
    fn name(&self) -> &'static str {
        "Blake2B"
    }

    fn digest_size(&self) -> usize {
        self.size
    }

    fn initialize(&mut self) {
        self.state = self.params.to_state();
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.finalize().as_bytes().to_vec()
    }
}

/// BLAKE2s with key, salt, personalization and variable output
pub struct Blake2sHash {
    params: blake2s_simd::Params,
    state: blake2s_simd::State,
    size: usize,
}

impl Blake2sHash {
    pub fn create(config: &Blake2Config) -> Result<Box<dyn HashFunction>> {
        config.validate(
            "Blake2S",
            blake2s_simd::KEYBYTES,
            blake2s_simd::SALTBYTES,
            blake2s_simd::PERSONALBYTES,
            blake2s_simd::OUTBYTES,
        )?;

        let mut params = blake2s_simd::Params::new();
        params
            .hash_length(config.hash_size)
            .key(&config.key)
            .salt(&config.salt)
            .personal(&config.personalization);
        let state = params.to_state();

        Ok(Box::new(Self {
            params,
            state,
            size: config.hash_size,
        }))
    }
}

impl HashFunction for Blake2sHash {
    fn name(&self) -> &'static str {
        "Blake2S"
    }

    fn digest_size(&self) -> usize {
        self.size
    }

    fn initialize(&mut self) {
        self.state = self.params.to_state();
    }

    fn transform_bytes(&mut self, _offset: u64, data: &[u8]) {
        self.state.update(data);
    }

    fn transform_final(&mut self) -> Vec<u8> {
        self.state.finalize().as_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mut function: Box<dyn HashFunction>, data: &[u8]) -> Vec<u8> {
        function.initialize();
        function.transform_bytes(0, data);
        function.transform_final()
    }

    #[test]
    fn test_checksum_vectors() {
        assert_eq!(hex::encode(run(Crc32Hash::create(), b"abc")), "352441c2");
        assert_eq!(hex::encode(run(Adler32Hash::create(), b"abc")), "024d0127");
        assert_eq!(hex::encode(run(Adler32Hash::create(), b"")), "00000001");
        assert_eq!(hex::encode(run(Fnv1a64Hash::create(), b"")), "cbf29ce484222325");
        assert_eq!(hex::encode(run(Fnv1a64Hash::create(), b"a")), "af63dc4c8601ec8c");
    }

    #[test]
    fn test_seeded_checksums() {
        assert_eq!(
            run(Crc32Hash::create_with_initial(0), b"abc"),
            run(Crc32Hash::create(), b"abc")
        );
        assert_eq!(
            run(Adler32Hash::create_with_initial(1), b"abc"),
            run(Adler32Hash::create(), b"abc")
        );

        // Resuming from a running CRC equals hashing the concatenation
        let mut first = crc32fast::Hasher::new();
        first.update(b"hello ");
        let running = first.finalize();
        assert_eq!(
            run(Crc32Hash::create_with_initial(running), b"world"),
            crc32fast::hash(b"hello world").to_be_bytes().to_vec()
        );
    }

    #[test]
    fn test_sha256_and_blake3_match_crates() {
        use sha2::Digest;
        assert_eq!(
            hex::encode(run(Sha256Hash::create(), b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(run(Sha256Hash::create(), b"").as_slice(), sha2::Sha256::digest(b"").as_slice());
        assert_eq!(run(Blake3Hash::create(), b"xyz").as_slice(), blake3::hash(b"xyz").as_bytes());
    }

    #[test]
    fn test_xxh3_widths() {
        assert_eq!(
            run(Xxh3Hash::create_64(), b"data"),
            xxhash_rust::xxh3::xxh3_64(b"data").to_be_bytes().to_vec()
        );
        assert_eq!(
            run(Xxh3Hash::create_128(), b"data"),
            xxhash_rust::xxh3::xxh3_128(b"data").to_be_bytes().to_vec()
        );
    }

    #[test]
    fn test_keyed_seed_parsing() {
        let mut function = XxHash32::create();
        let keyed = function.as_keyed().unwrap();
        assert_eq!(keyed.key_length(), 4);
        keyed.set_key(&7u32.to_le_bytes()).unwrap();
        let digest = run(function, b"seeded");
        assert_eq!(
            digest,
            xxhash_rust::xxh32::xxh32(b"seeded", 7).to_be_bytes().to_vec()
        );

        let mut function = XxHash64::create();
        let err = function.as_keyed().unwrap().set_key(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, HashError::InvalidParameter(_)));
    }

    #[test]
    fn test_siphash_default_key() {
        let mut explicit = SipHash64::create();
        explicit.as_keyed().unwrap().set_key(&SIPHASH_DEFAULT_KEY).unwrap();
        assert_eq!(run(explicit, b"payload"), run(SipHash64::create(), b"payload"));

        let mut other = SipHash128::create();
        other.as_keyed().unwrap().set_key(&[0xaa; 16]).unwrap();
        assert_ne!(run(other, b"payload"), run(SipHash128::create(), b"payload"));
    }

    #[test]
    fn test_unkeyed_functions_have_no_key() {
        assert!(Crc32Hash::create().as_keyed().is_none());
        assert!(Sha256Hash::create().as_keyed().is_none());
    }

    #[test]
    fn test_tiger_truncation() {
        use tiger::Digest;
        let full = tiger::Tiger::digest(b"abc");
        let digest = run(TigerHash::<tiger::Tiger>::create(24, HashRounds::Rounds3).unwrap(), b"abc");
        assert_eq!(digest.as_slice(), full.as_slice());

        let short = run(TigerHash::<tiger::Tiger>::create(16, HashRounds::Rounds3).unwrap(), b"abc");
        assert_eq!(short.as_slice(), &full[..16]);

        let tiger2 = run(TigerHash::<tiger::Tiger2>::create(24, HashRounds::Rounds3).unwrap(), b"abc");
        assert_ne!(tiger2, digest);
    }

    #[test]
    fn test_tiger_unsupported_rounds() {
        let err = TigerHash::<tiger::Tiger>::create(24, HashRounds::Rounds4).err().unwrap();
        assert!(matches!(err, HashError::UnsupportedParameter(_)));
    }

    #[test]
    fn test_blake2_configuration() {
        let mut config = Blake2Config::new(16);
        config.set_key(b"key".to_vec()).set_salt(b"salt".to_vec()).set_personalization(b"me".to_vec());

        let digest = run(Blake2bHash::create(&config).unwrap(), b"abc");
        let expected = blake2b_simd::Params::new()
            .hash_length(16)
            .key(b"key")
            .salt(b"salt")
            .personal(b"me")
            .hash(b"abc");
        assert_eq!(digest.as_slice(), expected.as_bytes());

        let digest = run(Blake2sHash::create(&config).unwrap(), b"abc");
        let expected = blake2s_simd::Params::new()
            .hash_length(16)
            .key(b"key")
            .salt(b"salt")
            .personal(b"me")
            .hash(b"abc");
        assert_eq!(digest.as_slice(), expected.as_bytes());
    }

    #[test]
    fn test_blake2_limits() {
        assert!(Blake2bHash::create(&Blake2Config::new(64)).is_ok());
        assert!(Blake2sHash::create(&Blake2Config::new(64)).is_err());
        assert!(Blake2bHash::create(&Blake2Config::new(0)).is_err());

        let mut config = Blake2Config::new(32);
        config.set_salt(vec![0u8; 9]);
        assert!(Blake2bHash::create(&config).is_ok());
        assert!(Blake2sHash::create(&config).is_err());
    }
}
