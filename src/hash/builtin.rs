//! Built-in descriptor table

use crate::error::{HashError, Result};
use crate::hash::algorithms::{
    Adler32Hash, Blake2bHash, Blake2sHash, Blake3Hash, Crc32Hash, Fnv1a64Hash, Sha256Hash,
    SipHash128, SipHash64, TigerHash, Xxh3Hash, XxHash32, XxHash64,
};
use crate::hash::descriptor::{HashDescriptor, HashFactory};

/// Every built-in descriptor, with empty parameters
pub fn builtin_descriptors() -> Vec<HashDescriptor> {
    use HashFactory::*;

    vec![
        HashDescriptor::new("adler32", "Adler-32", Basic(Adler32Hash::create)),
        HashDescriptor::new("crc32", "CRC-32", Basic(Crc32Hash::create)),
        HashDescriptor::new("fnv1a64", "FNV-1a 64", Basic(Fnv1a64Hash::create)),
        HashDescriptor::new("xxh3-64", "XXH3-64", Basic(Xxh3Hash::create_64)),
        HashDescriptor::new("xxh3-128", "XXH3-128", Basic(Xxh3Hash::create_128)),
        HashDescriptor::new("sha256", "SHA-256", Basic(Sha256Hash::create)),
        HashDescriptor::new("blake3", "BLAKE3", Basic(Blake3Hash::create)),
        HashDescriptor::new("xxhash32", "XXHash32", Keyed(XxHash32::create)),
        HashDescriptor::new("xxhash64", "XXHash64", Keyed(XxHash64::create)),
        HashDescriptor::new("siphash64", "SipHash-2-4", Keyed(SipHash64::create)),
        HashDescriptor::new("siphash128", "SipHash-2-4-128", Keyed(SipHash128::create)),
        HashDescriptor::new(
            "crc32-iv",
            "CRC-32 (initial value)",
            InitialValue(Crc32Hash::create_with_initial),
        ),
        HashDescriptor::new(
            "adler32-iv",
            "Adler-32 (initial value)",
            InitialValue(Adler32Hash::create_with_initial),
        ),
        HashDescriptor::new("tiger", "Tiger", RoundsAndSize(TigerHash::<tiger::Tiger>::create)),
        HashDescriptor::new("tiger2", "Tiger2", RoundsAndSize(TigerHash::<tiger::Tiger2>::create)),
        HashDescriptor::new("blake2b", "Blake2B", Blake2(Blake2bHash::create)),
        HashDescriptor::new("blake2s", "Blake2S", Blake2(Blake2sHash::create)),
    ]
}

/// Find a built-in descriptor by id or display name (case-insensitive)
pub fn find_descriptor(name: &str) -> Result<HashDescriptor> {
    let wanted = name.trim();
    builtin_descriptors()
        .into_iter()
        .find(|d| d.id().eq_ignore_ascii_case(wanted) || d.name().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| HashError::UnknownAlgorithm(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_and_names_unique() {
        let descriptors = builtin_descriptors();
        let ids: HashSet<_> = descriptors.iter().map(|d| d.id()).collect();
        let names: HashSet<_> = descriptors.iter().map(|d| d.name()).collect();
        assert_eq!(ids.len(), descriptors.len());
        assert_eq!(names.len(), descriptors.len());
    }

    #[test]
    fn test_find_descriptor() {
        assert_eq!(find_descriptor("crc32").unwrap().name(), "CRC-32");
        assert_eq!(find_descriptor("blake2B").unwrap().id(), "blake2b");
        assert_eq!(find_descriptor(" SipHash-2-4 ").unwrap().id(), "siphash64");
        assert!(matches!(
            find_descriptor("md5").unwrap_err(),
            HashError::UnknownAlgorithm(_)
        ));
    }

    #[test]
    fn test_every_default_configuration_instantiates() {
        for descriptor in builtin_descriptors() {
            let config = descriptor.snapshot().unwrap();
            let mut handle = descriptor.instantiate(&config).unwrap();
            handle.initialize().unwrap();
            let digest = handle.finalize().unwrap();
            assert!(!digest.is_empty(), "{} produced an empty digest", descriptor.name());
        }
    }
}
