//! Execution entry point
//!
//! One invocation = one fresh handle: instantiate from the descriptor,
//! initialize, stream the region window by window, finalize. Nothing is
//! shared between invocations except the read-only descriptor and source,
//! so independent invocations can run on the rayon pool.

use crate::error::{HashError, Result};
use crate::hash::descriptor::{ExecutionConfig, HashDescriptor, ParameterValues};
use crate::hash::digest::Digest;
use crate::hash::reader::{ChunkedReader, TransformSink, DEFAULT_WINDOW_SIZE};
use crate::progress::ProgressReporter;
use crate::source::{AddressableSource, MemorySource, MmapSource, Region};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs descriptors over regions with a fixed window size
#[derive(Clone, Default)]
pub struct HashExecutor {
    reader: ChunkedReader,
    progress: Option<Arc<ProgressReporter>>,
}

impl HashExecutor {
    /// Create an executor reading `window_size` bytes per step
    pub fn new(window_size: usize) -> Result<Self> {
        Ok(Self {
            reader: ChunkedReader::new(window_size)?,
            progress: None,
        })
    }

    /// Report hashed bytes and finished regions to `progress`
    pub fn with_progress(mut self, progress: Arc<ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Window size in bytes
    pub fn window_size(&self) -> usize {
        self.reader.window_size()
    }

    /// Hash `region` of `source` with a fresh handle built from `config`
    ///
    /// Region and parameter problems are reported before the handle is
    /// created; a read failure aborts the run and no digest is produced.
    pub fn execute<S>(
        &self,
        descriptor: &HashDescriptor,
        config: &ExecutionConfig,
        region: Region,
        source: &S,
    ) -> Result<Digest>
    where
        S: AddressableSource + ?Sized,
    {
        if !region.fits_within(source.base_address(), source.end_address()) {
            return Err(HashError::RegionOutOfBounds {
                start: region.start(),
                end: region.end(),
                bound: source.end_address(),
            });
        }

        let mut handle = descriptor.instantiate(config)?;
        handle.initialize()?;

        tracing::debug!(
            "Hashing {} ({} bytes) with {}, window {} bytes",
            region,
            region.len(),
            descriptor.name(),
            self.window_size()
        );
        let started = Instant::now();

        match &self.progress {
            Some(progress) => {
                let mut sink = ProgressSink {
                    inner: &mut handle,
                    progress,
                };
                self.reader.stream(region, source, &mut sink)?;
            }
            None => {
                self.reader.stream(region, source, &mut handle)?;
            }
        }

        let digest = handle.finalize()?;

        tracing::debug!(
            "{} over {} finished in {:.2?}: {}",
            descriptor.name(),
            region,
            started.elapsed(),
            digest
        );
        if let Some(progress) = &self.progress {
            progress.increment_regions(1);
        }

        Ok(digest)
    }
}

impl std::fmt::Debug for HashExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashExecutor")
            .field("window_size", &self.window_size())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Forwards windows to the handle and counts them as progress
struct ProgressSink<'a, T: ?Sized> {
    inner: &'a mut T,
    progress: &'a ProgressReporter,
}

impl<T: TransformSink + ?Sized> TransformSink for ProgressSink<'_, T> {
    fn transform(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        self.inner.transform(offset, data)?;
        self.progress.increment_bytes(data.len() as u64);
        Ok(())
    }
}

/// Freeze `parameters` and hash `region` of `source` with the default window
pub fn compute_digest<S>(
    descriptor: &HashDescriptor,
    parameters: &ParameterValues,
    region: Region,
    source: &S,
) -> Result<Digest>
where
    S: AddressableSource + ?Sized,
{
    let config = parameters.freeze()?;
    HashExecutor::default().execute(descriptor, &config, region, source)
}

impl HashDescriptor {
    /// Hash `region` of `source` using this descriptor's current parameters
    pub fn compute<S>(&self, region: Region, source: &S) -> Result<Digest>
    where
        S: AddressableSource + ?Sized,
    {
        compute_digest(self, self.parameters(), region, source)
    }
}

/// One independent invocation for [`hash_regions_parallel`]
pub struct HashJob<'a> {
    /// Algorithm to run
    pub descriptor: &'a HashDescriptor,
    /// Frozen parameters
    pub config: ExecutionConfig,
    /// Region to hash
    pub region: Region,
    /// Source to read from
    pub source: &'a dyn AddressableSource,
}

/// Run independent jobs in parallel; results keep the order of `jobs`
pub fn hash_regions_parallel(executor: &HashExecutor, jobs: &[HashJob<'_>]) -> Vec<Result<Digest>> {
    jobs.par_iter()
        .map(|job| executor.execute(job.descriptor, &job.config, job.region, job.source))
        .collect()
}

/// Digest of one source region, ready for display or JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashReport {
    /// Descriptor display name
    pub algorithm: String,
    /// Source the region was read from
    pub source: String,
    /// Hashed region
    pub region: Region,
    /// Digest bytes (hex in JSON)
    pub digest: Digest,
}

impl std::fmt::Display for HashReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}", self.digest, self.source)
    }
}

/// Hash `region` of the file at `path` (the whole file when `None`)
pub fn hash_file(
    executor: &HashExecutor,
    descriptor: &HashDescriptor,
    config: &ExecutionConfig,
    path: &Path,
    region: Option<Region>,
) -> Result<HashReport> {
    let source = MmapSource::open(path)?;
    let region = region.unwrap_or_else(|| Region::whole(&source));
    let digest = executor.execute(descriptor, config, region, &source)?;

    Ok(HashReport {
        algorithm: descriptor.name().to_string(),
        source: path.display().to_string(),
        region,
        digest,
    })
}

/// Hash several files in parallel with the same descriptor and parameters
///
/// Each entry pairs a path with its region (the whole file when `None`);
/// results keep the order of `files`.
pub fn hash_files_parallel<P>(
    executor: &HashExecutor,
    descriptor: &HashDescriptor,
    config: &ExecutionConfig,
    files: &[(P, Option<Region>)],
) -> Vec<Result<HashReport>>
where
    P: AsRef<Path> + Sync,
{
    files
        .par_iter()
        .map(|(path, region)| hash_file(executor, descriptor, config, path.as_ref(), *region))
        .collect()
}

/// Time every descriptor's default configuration over `data_size` bytes
///
/// Returns (name, mean duration, MiB/s), fastest first.
pub fn benchmark_descriptors(
    descriptors: &[HashDescriptor],
    data_size: usize,
) -> Result<Vec<(&'static str, Duration, f64)>> {
    let source = MemorySource::new((0..data_size).map(|i| (i % 256) as u8).collect());
    let region = Region::whole(&source);
    let executor = HashExecutor::new(DEFAULT_WINDOW_SIZE)?;
    let iterations = 10;
    let mut results = Vec::new();

    for descriptor in descriptors {
        let config = descriptor.snapshot()?;
        let start = Instant::now();

        for _ in 0..iterations {
            executor.execute(descriptor, &config, region, &source)?;
        }

        let duration = start.elapsed() / iterations;
        let throughput = if duration.as_secs_f64() > 0.0 {
            (data_size as f64) / duration.as_secs_f64() / (1024.0 * 1024.0)
        } else {
            f64::INFINITY
        };

        results.push((descriptor.name(), duration, throughput));
    }

    results.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::builtin::{builtin_descriptors, find_descriptor};
    use crate::hash::handle::AlgorithmHandle;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Counts reads and fails at one address
    struct InstrumentedSource {
        inner: MemorySource,
        reads: AtomicUsize,
        fail_at: Option<u64>,
    }

    impl InstrumentedSource {
        fn new(data: &[u8]) -> Self {
            Self {
                inner: MemorySource::new(data.to_vec()),
                reads: AtomicUsize::new(0),
                fail_at: None,
            }
        }
    }

    impl AddressableSource for InstrumentedSource {
        fn size(&self) -> u64 {
            self.inner.size()
        }

        fn read(&self, address: u64, buf: &mut [u8]) -> Result<()> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == Some(address) {
                return Err(HashError::SourceRead {
                    address,
                    length: buf.len() as u64,
                    source: std::io::Error::new(std::io::ErrorKind::Other, "device gone"),
                });
            }
            self.inner.read(address, buf)
        }
    }

    fn digest_with_window(id: &str, data: &[u8], window: usize) -> Digest {
        let descriptor = find_descriptor(id).unwrap();
        let source = MemorySource::new(data.to_vec());
        HashExecutor::new(window)
            .unwrap()
            .execute(&descriptor, &descriptor.snapshot().unwrap(), Region::whole(&source), &source)
            .unwrap()
    }

    #[test]
    fn test_abc_test_vectors() {
        let source = MemorySource::new(b"abc".to_vec());
        let region = Region::new(0, 3).unwrap();

        let crc = find_descriptor("crc32").unwrap();
        assert_eq!(crc.compute(region, &source).unwrap().to_hex(), "352441c2");

        let adler = find_descriptor("adler32").unwrap();
        assert_eq!(adler.compute(region, &source).unwrap().to_hex(), "024d0127");

        let sha = find_descriptor("sha256").unwrap();
        assert_eq!(
            sha.compute(region, &source).unwrap().to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_empty_region_matches_library_empty_digest() {
        use sha2::Digest as _;
        use tiger::Digest as _;

        let source = MemorySource::new(b"not hashed".to_vec());
        let empty = Region::new(4, 4).unwrap();
        let digest_of = |id: &str| find_descriptor(id).unwrap().compute(empty, &source).unwrap();

        assert_eq!(digest_of("crc32").as_bytes(), &crc32fast::hash(b"").to_be_bytes());
        assert_eq!(digest_of("sha256").as_bytes(), sha2::Sha256::digest(b"").as_slice());
        assert_eq!(digest_of("blake3").as_bytes(), blake3::hash(b"").as_bytes());
        assert_eq!(
            digest_of("blake2b").as_bytes(),
            blake2b_simd::Params::new().hash_length(16).hash(b"").as_bytes()
        );
        assert_eq!(
            digest_of("blake2s").as_bytes(),
            blake2s_simd::Params::new().hash_length(16).hash(b"").as_bytes()
        );
        assert_eq!(digest_of("tiger").as_bytes(), &tiger::Tiger::digest(b"")[..16]);
        assert_eq!(
            digest_of("xxh3-64").as_bytes(),
            &xxhash_rust::xxh3::xxh3_64(b"").to_be_bytes()
        );
    }

    #[test]
    fn test_every_builtin_is_window_independent() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 31 % 251) as u8).collect();
        for descriptor in builtin_descriptors() {
            let reference = digest_with_window(descriptor.id(), &data, DEFAULT_WINDOW_SIZE);
            for window in [1, 7, 64, 4096] {
                assert_eq!(
                    digest_with_window(descriptor.id(), &data, window),
                    reference,
                    "{} differs with window {}",
                    descriptor.name(),
                    window
                );
            }
        }
    }

    #[test]
    fn test_invalid_key_rejected_before_read() {
        let descriptor = find_descriptor("xxhash32").unwrap();
        let source = InstrumentedSource::new(b"abc");
        let parameters = ParameterValues::Key { key: "ZZ".to_string() };

        let err = compute_digest(&descriptor, &parameters, Region::whole(&source), &source).unwrap_err();
        assert!(matches!(err, HashError::InvalidParameter(_)));
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsupported_rounds_rejected_before_read() {
        let descriptor = find_descriptor("tiger").unwrap();
        let source = InstrumentedSource::new(b"abc");
        let parameters = ParameterValues::RoundsAndSize {
            hash_size: 2,
            hash_rounds: 1,
        };

        let err = compute_digest(&descriptor, &parameters, Region::whole(&source), &source).unwrap_err();
        assert!(matches!(err, HashError::UnsupportedParameter(_)));
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_keyed_determinism_and_sensitivity() {
        let descriptor = find_descriptor("siphash64").unwrap();
        let source = MemorySource::new(b"some non-trivial input bytes".to_vec());
        let region = Region::whole(&source);
        let key_a = ParameterValues::Key {
            key: "000102030405060708090a0b0c0d0e0f".to_string(),
        };
        let key_b = ParameterValues::Key {
            key: "0f0e0d0c0b0a09080706050403020100".to_string(),
        };

        let first = compute_digest(&descriptor, &key_a, region, &source).unwrap();
        let again = compute_digest(&descriptor, &key_a, region, &source).unwrap();
        let other = compute_digest(&descriptor, &key_b, region, &source).unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
    }

    #[test]
    fn test_region_bounds_checked() {
        let descriptor = find_descriptor("crc32").unwrap();
        let source = InstrumentedSource::new(b"abc");

        let err = descriptor.compute(Region::new(1, 4).unwrap(), &source).unwrap_err();
        assert!(matches!(err, HashError::RegionOutOfBounds { bound: 3, .. }));
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);

        let based = MemorySource::at(0x100, b"abc".to_vec());
        assert!(descriptor.compute(Region::new(0, 3).unwrap(), &based).is_err());
        assert!(descriptor.compute(Region::new(0x100, 0x103).unwrap(), &based).is_ok());
    }

    #[test]
    fn test_read_error_aborts() {
        let descriptor = find_descriptor("sha256").unwrap();
        let mut source = InstrumentedSource::new(&[0u8; 64]);
        source.fail_at = Some(32);

        let executor = HashExecutor::new(16).unwrap();
        let err = executor
            .execute(&descriptor, &ExecutionConfig::None, Region::whole(&source), &source)
            .unwrap_err();
        assert!(matches!(err, HashError::SourceRead { address: 32, .. }));
        assert!(err.is_read_error());
    }

    #[test]
    fn test_progress_counts_bytes() {
        let progress = Arc::new(ProgressReporter::disabled());
        let executor = HashExecutor::new(10).unwrap().with_progress(progress.clone());
        let descriptor = find_descriptor("fnv1a64").unwrap();
        let source = MemorySource::new(vec![1u8; 95]);

        executor
            .execute(&descriptor, &ExecutionConfig::None, Region::whole(&source), &source)
            .unwrap();

        let summary = progress.summary();
        assert_eq!(summary.bytes_hashed, 95);
        assert_eq!(summary.regions_hashed, 1);
    }

    #[test]
    fn test_parallel_jobs_match_sequential() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 97) as u8).collect();
        let source = MemorySource::new(data);
        let crc = find_descriptor("crc32").unwrap();
        let blake = find_descriptor("blake2s").unwrap();
        let executor = HashExecutor::new(1000).unwrap();

        let regions = [
            Region::new(0, 10_000).unwrap(),
            Region::new(100, 5_000).unwrap(),
            Region::new(9_999, 10_000).unwrap(),
        ];
        let mut jobs = Vec::new();
        for region in regions {
            for descriptor in [&crc, &blake] {
                jobs.push(HashJob {
                    descriptor,
                    config: descriptor.snapshot().unwrap(),
                    region,
                    source: &source,
                });
            }
        }

        let parallel = hash_regions_parallel(&executor, &jobs);
        for (job, result) in jobs.iter().zip(parallel) {
            let sequential = executor
                .execute(job.descriptor, &job.config, job.region, &source)
                .unwrap();
            assert_eq!(result.unwrap(), sequential);
        }
    }

    #[test]
    fn test_hash_file_and_parallel_files() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.bin");
        let second = dir.path().join("second.bin");
        std::fs::write(&first, b"abc").unwrap();
        std::fs::write(&second, b"").unwrap();

        let descriptor = find_descriptor("crc32").unwrap();
        let executor = HashExecutor::default();
        let report = hash_file(&executor, &descriptor, &ExecutionConfig::None, &first, None).unwrap();
        assert_eq!(report.digest.to_hex(), "352441c2");
        assert_eq!(report.region, Region::new(0, 3).unwrap());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["digest"], "352441c2");
        assert_eq!(json["algorithm"], "CRC-32");

        let reports = hash_files_parallel(
            &executor,
            &descriptor,
            &ExecutionConfig::None,
            &[
                (first.clone(), None),
                (second.clone(), None),
                (first.clone(), Some(Region::new(1, 3).unwrap())),
                (second.clone(), Some(Region::new(0, 1).unwrap())),
            ],
        );
        assert_eq!(reports[0].as_ref().unwrap().digest.to_hex(), "352441c2");
        assert_eq!(reports[1].as_ref().unwrap().digest.to_hex(), "00000000");
        assert_eq!(
            reports[2].as_ref().unwrap().digest.as_bytes(),
            &crc32fast::hash(b"bc").to_be_bytes()
        );
        assert!(matches!(
            reports[3].as_ref().unwrap_err(),
            HashError::RegionOutOfBounds { .. }
        ));
    }

    #[test]
    fn test_benchmark_descriptors() {
        let results = benchmark_descriptors(&builtin_descriptors()[..3], 4096).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    proptest! {
        #[test]
        fn prop_window_size_is_unobservable(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            w1 in 1usize..600,
            w2 in 1usize..600,
        ) {
            for id in ["crc32", "xxh3-128", "sha256", "blake2b"] {
                prop_assert_eq!(digest_with_window(id, &data, w1), digest_with_window(id, &data, w2));
            }
        }

        #[test]
        fn prop_split_streams_through_one_handle(
            data in proptest::collection::vec(any::<u8>(), 2..2048),
            split in any::<proptest::sample::Index>(),
            window in 1usize..300,
        ) {
            let source = MemorySource::new(data.clone());
            let whole = Region::whole(&source);
            let mid = 1 + split.index(data.len() - 1) as u64;
            let (left, right) = whole.split_at(mid).unwrap();

            for descriptor in builtin_descriptors() {
                let config = descriptor.snapshot().unwrap();
                let reader = ChunkedReader::new(window).unwrap();

                let mut handle: AlgorithmHandle = descriptor.instantiate(&config).unwrap();
                handle.initialize().unwrap();
                let first = reader.stream(left, &source, &mut handle).unwrap();
                reader.stream_from(right, &source, first, &mut handle).unwrap();
                let split_digest = handle.finalize().unwrap();

                let single = HashExecutor::new(window)
                    .unwrap()
                    .execute(&descriptor, &config, whole, &source)
                    .unwrap();
                prop_assert_eq!(split_digest, single);
            }
        }
    }
}
