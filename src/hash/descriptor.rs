//! Hash descriptors and their parameter shapes
//!
//! A descriptor binds a display name to an immutable factory and to the
//! parameter values a user edits between runs. Before a run the values are
//! frozen into an [`ExecutionConfig`]; hex text is parsed and combo indices
//! are resolved through fixed lookup tables at that point, so a malformed
//! parameter is reported before any byte is read.

use crate::error::{HashError, Result};
use crate::hash::algorithms::{Blake2Config, HashFunction, HashRounds};
use crate::hash::handle::AlgorithmHandle;
use serde::{Deserialize, Serialize};

/// Tiger output sizes in bytes, indexed by the "Hash Size" choice
/// (128, 160, 192 bits)
pub const TIGER_HASH_SIZES: [usize; 3] = [16, 20, 24];

/// Tiger pass counts, indexed by the "Hash Rounds" choice
pub const TIGER_HASH_ROUNDS: [HashRounds; 4] = [
    HashRounds::Rounds3,
    HashRounds::Rounds4,
    HashRounds::Rounds5,
    HashRounds::Rounds8,
];

/// BLAKE2 output sizes in bytes, indexed by the "Hash Size" choice
/// (128, 160, 192, 224, 256, 288, 384, 512 bits)
pub const BLAKE2_HASH_SIZES: [usize; 8] = [16, 20, 24, 28, 32, 36, 48, 64];

/// Factory shape of one algorithm family
#[derive(Clone, Copy)]
pub enum HashFactory {
    /// No parameters
    Basic(fn() -> Box<dyn HashFunction>),
    /// Created bare, then keyed
    Keyed(fn() -> Box<dyn HashFunction>),
    /// Created from a 32-bit initial value
    InitialValue(fn(u32) -> Box<dyn HashFunction>),
    /// Created from an output size in bytes and a pass count
    RoundsAndSize(fn(usize, HashRounds) -> Result<Box<dyn HashFunction>>),
    /// Created from a BLAKE2 parameter block
    Blake2(fn(&Blake2Config) -> Result<Box<dyn HashFunction>>),
}

impl HashFactory {
    /// Parameter shape name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Keyed(_) => "keyed",
            Self::InitialValue(_) => "initial-value",
            Self::RoundsAndSize(_) => "rounds-and-size",
            Self::Blake2(_) => "blake2",
        }
    }

    /// Empty parameter values matching this shape
    pub fn default_parameters(&self) -> ParameterValues {
        match self {
            Self::Basic(_) => ParameterValues::None,
            Self::Keyed(_) => ParameterValues::Key { key: String::new() },
            Self::InitialValue(_) => ParameterValues::InitialValue { initial_value: 0 },
            Self::RoundsAndSize(_) => ParameterValues::RoundsAndSize {
                hash_size: 0,
                hash_rounds: 0,
            },
            Self::Blake2(_) => ParameterValues::Blake2 {
                key: String::new(),
                salt: String::new(),
                personalization: String::new(),
                hash_size: 0,
            },
        }
    }
}

impl std::fmt::Debug for HashFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HashFactory::{}", self.kind())
    }
}

/// Editable parameter values, as entered by a user or loaded from a record
///
/// Byte parameters are hex text; size and round choices are indices into the
/// lookup tables of this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParameterValues {
    /// No parameters
    #[default]
    None,
    /// Hex key text
    Key {
        #[serde(default)]
        key: String,
    },
    /// 32-bit starting value
    InitialValue {
        #[serde(default)]
        initial_value: u32,
    },
    /// Size and round choices
    RoundsAndSize {
        #[serde(default)]
        hash_size: usize,
        #[serde(default)]
        hash_rounds: usize,
    },
    /// BLAKE2 key, salt and personalization as hex, plus a size choice
    Blake2 {
        #[serde(default)]
        key: String,
        #[serde(default)]
        salt: String,
        #[serde(default)]
        personalization: String,
        #[serde(default)]
        hash_size: usize,
    },
}

/// Frozen parameters for exactly one run
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ExecutionConfig {
    None,
    Key(Vec<u8>),
    InitialValue(u32),
    RoundsAndSize { size_bytes: usize, rounds: HashRounds },
    Blake2(Blake2Config),
}

fn lookup<T: Copy>(table: &[T], index: usize, what: &str) -> T {
    match table.get(index) {
        Some(value) => *value,
        None => {
            tracing::warn!(
                "{} choice {} is out of range (0..{}), using the first entry",
                what,
                index,
                table.len()
            );
            table[0]
        }
    }
}

/// Parse hex text into bytes
///
/// ASCII whitespace is ignored and a leading `0x` is accepted. Empty text
/// yields no bytes.
pub fn parse_byte_string(field: &str, text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);

    hex::decode(digits).map_err(|e| {
        HashError::invalid_parameter(format!("{} '{}' is not valid hex: {}", field, text, e))
    })
}

impl ParameterValues {
    /// Snapshot these values into an immutable execution config
    pub fn freeze(&self) -> Result<ExecutionConfig> {
        Ok(match self {
            Self::None => ExecutionConfig::None,
            Self::Key { key } => ExecutionConfig::Key(parse_byte_string("key", key)?),
            Self::InitialValue { initial_value } => ExecutionConfig::InitialValue(*initial_value),
            Self::RoundsAndSize { hash_size, hash_rounds } => ExecutionConfig::RoundsAndSize {
                size_bytes: lookup(&TIGER_HASH_SIZES, *hash_size, "hash size"),
                rounds: lookup(&TIGER_HASH_ROUNDS, *hash_rounds, "hash rounds"),
            },
            Self::Blake2 {
                key,
                salt,
                personalization,
                hash_size,
            } => {
                let mut config = Blake2Config::new(lookup(&BLAKE2_HASH_SIZES, *hash_size, "hash size"));
                config
                    .set_key(parse_byte_string("key", key)?)
                    .set_salt(parse_byte_string("salt", salt)?)
                    .set_personalization(parse_byte_string("personalization", personalization)?);
                ExecutionConfig::Blake2(config)
            }
        })
    }
}

/// Named algorithm family with its factory and current parameter values
#[derive(Debug, Clone)]
pub struct HashDescriptor {
    id: &'static str,
    name: &'static str,
    factory: HashFactory,
    parameters: ParameterValues,
}

impl HashDescriptor {
    /// Create a descriptor with empty parameters
    pub fn new(id: &'static str, name: &'static str, factory: HashFactory) -> Self {
        Self {
            id,
            name,
            factory,
            parameters: factory.default_parameters(),
        }
    }

    /// Short identifier used on the command line
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Factory shape
    pub fn factory(&self) -> &HashFactory {
        &self.factory
    }

    /// Current parameter values
    pub fn parameters(&self) -> &ParameterValues {
        &self.parameters
    }

    /// Edit the current parameter values
    pub fn parameters_mut(&mut self) -> &mut ParameterValues {
        &mut self.parameters
    }

    /// Replace the parameter values, rejecting a shape the factory cannot use
    pub fn set_parameters(&mut self, parameters: ParameterValues) -> Result<()> {
        if std::mem::discriminant(&parameters)
            != std::mem::discriminant(&self.factory.default_parameters())
        {
            return Err(HashError::invalid_parameter(format!(
                "{} takes {} parameters",
                self.name,
                self.factory.kind()
            )));
        }
        self.parameters = parameters;
        Ok(())
    }

    /// Freeze the current parameter values
    pub fn snapshot(&self) -> Result<ExecutionConfig> {
        self.parameters.freeze()
    }

    /// Build a fresh handle configured from `config`
    ///
    /// Keys are installed before the handle is returned; the caller still
    /// has to initialize it.
    pub fn instantiate(&self, config: &ExecutionConfig) -> Result<AlgorithmHandle> {
        let handle = match (&self.factory, config) {
            (HashFactory::Basic(create), ExecutionConfig::None) => AlgorithmHandle::new(create()),
            (HashFactory::Keyed(create), ExecutionConfig::Key(key)) => {
                let mut handle = AlgorithmHandle::new(create());
                handle.set_key(key)?;
                handle
            }
            (HashFactory::InitialValue(create), ExecutionConfig::InitialValue(value)) => {
                AlgorithmHandle::new(create(*value))
            }
            (HashFactory::RoundsAndSize(create), ExecutionConfig::RoundsAndSize { size_bytes, rounds }) => {
                AlgorithmHandle::new(create(*size_bytes, *rounds)?)
            }
            (HashFactory::Blake2(create), ExecutionConfig::Blake2(blake2)) => {
                AlgorithmHandle::new(create(blake2)?)
            }
            (factory, _) => {
                return Err(HashError::invalid_parameter(format!(
                    "{} takes {} parameters",
                    self.name,
                    factory.kind()
                )))
            }
        };
        Ok(handle)
    }
}
