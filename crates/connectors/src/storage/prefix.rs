//! Hive-style partition prefixes under a table's storage root.

use serde::{Serialize, Serializer};
use std::fmt;

/// A slash-terminated object key prefix, e.g. `s3://bucket/path/partition_date=2024-01-01/`.
///
/// The storage root and the `<column>=<value>` segment are kept apart so a
/// backend can resolve the root as a URL and append the segment as a literal
/// path part. A value holding `#`, `?` or `%` is never read as URL syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePrefix {
    root: String,
    partition: Option<String>,
    rendered: String,
}

impl StoragePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        let root = with_trailing_slash(prefix.into());
        Self {
            rendered: root.clone(),
            root,
            partition: None,
        }
    }

    /// Builds `<root>/<column>=<value>/`. A root without a trailing slash gets one.
    pub fn for_partition(root: &str, column: &str, value: &str) -> Self {
        let root = with_trailing_slash(root.to_string());
        let partition = format!("{column}={value}");
        Self {
            rendered: format!("{root}{partition}/"),
            root,
            partition: Some(partition),
        }
    }

    /// The slash-terminated storage root the partition lives under.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The literal `<column>=<value>` segment, if this prefix names a partition.
    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Whether an object key lives under this prefix.
    pub fn contains(&self, key: &str) -> bool {
        key.starts_with(&self.rendered)
    }
}

fn with_trailing_slash(mut path: String) -> String {
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

impl fmt::Display for StoragePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl Serialize for StoragePrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.rendered)
    }
}
