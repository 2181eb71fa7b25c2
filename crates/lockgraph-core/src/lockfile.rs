//! pnpm lockfile schema and loader.
//!
//! Only the fields lockgraph consumes are modeled; everything else in the file is
//! ignored. Shape mismatches in the modeled fields are reported as
//! [`Error::SchemaValidation`].

use crate::error::{Error, Result};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// The lockfile version whose layout is modeled here.
pub const SUPPORTED_LOCKFILE_VERSION: &str = "9.0";

/// A validated lockfile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    #[serde(deserialize_with = "yaml_string")]
    pub lockfile_version: String,
    /// Workspace projects keyed by their path relative to the lockfile directory.
    #[serde(default)]
    pub importers: BTreeMap<String, Importer>,
    /// Resolution metadata; carried opaquely.
    #[serde(default)]
    pub packages: Option<serde_yaml::Value>,
    /// Externally resolved packages keyed by `name@version(peers)`.
    #[serde(default)]
    pub snapshots: BTreeMap<String, Snapshot>,
}

/// A workspace project's direct dependencies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Importer {
    #[serde(default)]
    pub dependencies: BTreeMap<String, ImporterDependency>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, ImporterDependency>,
}

/// One direct dependency of an importer: what was asked for and what was locked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImporterDependency {
    #[serde(deserialize_with = "yaml_string")]
    pub specifier: String,
    #[serde(deserialize_with = "yaml_string")]
    pub version: String,
}

/// An externally resolved package and the versions its dependencies resolved to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "yaml_string_map")]
    pub dependencies: BTreeMap<String, String>,
}

// serde_yaml hands any plain scalar to a `String` field as text, so `9.0`, `1`
// and `true` would all pass. Only YAML strings are accepted here.
fn yaml_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a string")),
    }
}

fn yaml_string_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error> {
    BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(s) => Ok((name, s)),
            other => Err(de::Error::invalid_type(unexpected(&other), &"a version string")),
        })
        .collect()
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Unexpected::Signed(i),
            (_, Some(u), _) => Unexpected::Unsigned(u),
            (_, _, Some(f)) => Unexpected::Float(f),
            _ => Unexpected::Other("number"),
        },
        Value::String(s) => Unexpected::Str(s),
        Value::Sequence(_) => Unexpected::Seq,
        Value::Mapping(_) => Unexpected::Map,
        Value::Tagged(_) => Unexpected::Other("tagged value"),
    }
}

impl Importer {
    /// Regular dependencies followed by dev dependencies.
    pub fn all_dependencies(&self) -> impl Iterator<Item = (&String, &ImporterDependency)> {
        self.dependencies.iter().chain(self.dev_dependencies.iter())
    }
}

impl Lockfile {
    /// Parse and validate lockfile text. `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let lockfile: Lockfile =
            serde_yaml::from_str(text).map_err(|source| Error::SchemaValidation {
                path: path.to_path_buf(),
                source,
            })?;

        if lockfile.lockfile_version != SUPPORTED_LOCKFILE_VERSION {
            warn!(
                found = %lockfile.lockfile_version,
                expected = SUPPORTED_LOCKFILE_VERSION,
                "lockfile version differs from the modeled layout"
            );
        }
        Ok(lockfile)
    }

    /// Read and validate a lockfile from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::LockfileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let lockfile = Self::parse(&text, path)?;
        debug!(
            importers = lockfile.importers.len(),
            snapshots = lockfile.snapshots.len(),
            "lockfile loaded"
        );
        Ok(lockfile)
    }
}
