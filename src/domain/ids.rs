//! Domain identifier types with validation
//!
//! Newtype wrappers for the values that flow through the pipeline. Each type
//! validates its format on construction so later stages can interpolate them
//! into tool arguments without re-checking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Partition key newtype wrapper
///
/// An 8-digit `YYYYMMDD` string selecting one day's slice of the event table
/// and the matching destination path segment. Always derived from a valid
/// calendar date.
///
/// # Examples
///
/// ```
/// use ga4_transfer::domain::ids::PartitionKey;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(PartitionKey::from_date(date).as_str(), "20240305");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKey(String);

impl PartitionKey {
    /// Creates a partition key from a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y%m%d").to_string())
    }

    /// Returns the partition key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PartitionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Partition key must be 8 digits (YYYYMMDD), got: {s}"));
        }
        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(Self::from_date)
            .map_err(|e| format!("Partition key is not a calendar date: {s} ({e})"))
    }
}

impl AsRef<str> for PartitionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// BigQuery dataset identifier
///
/// Format: `{project}:{dataset}`. The project segment is the warehouse
/// project the tools are configured against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(String);

impl DatasetId {
    /// Creates a new DatasetId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            return Err("Dataset ID cannot be empty".to_string());
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!("Dataset ID contains whitespace: {id:?}"));
        }
        if id.starts_with(':') {
            return Err(format!("Dataset ID has an empty project segment: {id}"));
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the dataset ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project identifier: the segment before the first `:`
    pub fn project_id(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// Fully-qualified source table for a partition
    pub fn events_table(&self, partition: &PartitionKey) -> String {
        format!("{}.events_{}", self.0, partition)
    }

    /// Dotted form (`project.dataset`) used in log output
    pub fn dotted(&self) -> String {
        self.0.replace(':', ".")
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object storage provider of a [`StorageUri`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScheme {
    /// Google Cloud Storage (`gs://`)
    Gcs,
    /// Amazon S3 (`s3://`)
    S3,
}

impl StorageScheme {
    /// URI scheme without the `://` separator
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageScheme::Gcs => "gs",
            StorageScheme::S3 => "s3",
        }
    }
}

/// Object storage location
///
/// Built from a bucket path as stored in the secret bundle (`bucket/prefix`,
/// with or without the scheme prefix).
///
/// # Examples
///
/// ```
/// use ga4_transfer::domain::ids::{StorageScheme, StorageUri};
///
/// let uri = StorageUri::new(StorageScheme::Gcs, "staging-bucket/ga4").unwrap();
/// assert_eq!(uri.as_str(), "gs://staging-bucket/ga4");
/// assert_eq!(uri.join("export-*.parquet").as_str(), "gs://staging-bucket/ga4/export-*.parquet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageUri {
    scheme: StorageScheme,
    uri: String,
}

impl StorageUri {
    /// Creates a storage URI from a bucket path
    pub fn new(scheme: StorageScheme, bucket_path: &str) -> Result<Self, String> {
        let prefix = format!("{}://", scheme.as_str());
        let path = bucket_path.trim();
        let path = path.strip_prefix(&prefix).unwrap_or(path);
        let path = path.trim_end_matches('/');

        if path.is_empty() {
            return Err(format!("Bucket path for {prefix} cannot be empty"));
        }
        if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!("Bucket path contains whitespace: {path:?}"));
        }
        if path.contains("://") {
            return Err(format!("Bucket path has a foreign scheme: {path}"));
        }

        let uri = format!("{prefix}{path}");
        let parsed = Url::parse(&uri).map_err(|e| format!("{uri}: {e}"))?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(format!("{uri}: missing bucket name"));
        }

        Ok(Self { scheme, uri })
    }

    /// Appends a path segment
    pub fn join(&self, segment: &str) -> Self {
        Self {
            scheme: self.scheme,
            uri: format!("{}/{}", self.uri, segment.trim_matches('/')),
        }
    }

    /// Returns the URI as a string slice
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_partition_key_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let key = PartitionKey::from_date(date);
        assert_eq!(key.as_str(), "20241231");
    }

    #[test_case("20240229" ; "leap day")]
    #[test_case("19991231" ; "end of century")]
    fn test_partition_key_parse_valid(input: &str) {
        let key: PartitionKey = input.parse().unwrap();
        assert_eq!(key.as_str(), input);
    }

    #[test_case("20230229" ; "not a leap year")]
    #[test_case("2024035" ; "too short")]
    #[test_case("2024-03-05" ; "dashed")]
    #[test_case("２０２４０３０５" ; "non ascii digits")]
    fn test_partition_key_parse_invalid(input: &str) {
        assert!(input.parse::<PartitionKey>().is_err());
    }

    #[test]
    fn test_dataset_project_id() {
        let dataset = DatasetId::new("my-project:analytics_123").unwrap();
        assert_eq!(dataset.project_id(), "my-project");
        assert_eq!(dataset.dotted(), "my-project.analytics_123");
    }

    #[test]
    fn test_dataset_without_separator_is_its_own_project() {
        let dataset = DatasetId::new("analytics_123").unwrap();
        assert_eq!(dataset.project_id(), "analytics_123");
    }

    #[test]
    fn test_dataset_events_table() {
        let dataset = DatasetId::new("p:analytics_1").unwrap();
        let key: PartitionKey = "20240305".parse().unwrap();
        assert_eq!(dataset.events_table(&key), "p:analytics_1.events_20240305");
    }

    #[test_case("" ; "empty")]
    #[test_case(":dataset" ; "empty project")]
    #[test_case("p:data set" ; "whitespace")]
    fn test_dataset_invalid(input: &str) {
        assert!(DatasetId::new(input).is_err());
    }

    #[test_case(StorageScheme::Gcs, "bucket/prefix", "gs://bucket/prefix" ; "gcs path")]
    #[test_case(StorageScheme::S3, "bucket/prefix/", "s3://bucket/prefix" ; "trailing slash")]
    #[test_case(StorageScheme::S3, "s3://bucket", "s3://bucket" ; "scheme already present")]
    fn test_storage_uri_valid(scheme: StorageScheme, path: &str, expected: &str) {
        let uri = StorageUri::new(scheme, path).unwrap();
        assert_eq!(uri.as_str(), expected);
        assert_eq!(uri.join("x").as_str(), format!("{expected}/x"));
    }

    #[test_case(StorageScheme::Gcs, "" ; "empty")]
    #[test_case(StorageScheme::Gcs, "bucket; rm -rf /" ; "shell metacharacters with spaces")]
    #[test_case(StorageScheme::Gcs, "s3://bucket" ; "foreign scheme")]
    #[test_case(StorageScheme::S3, "/prefix-only" ; "missing bucket")]
    fn test_storage_uri_invalid(scheme: StorageScheme, path: &str) {
        assert!(StorageUri::new(scheme, path).is_err());
    }

    #[test]
    fn test_storage_uri_join() {
        let uri = StorageUri::new(StorageScheme::Gcs, "bucket").unwrap();
        let joined = uri.join("event_date_part=20240305").join("/export-*.parquet");
        assert_eq!(
            joined.as_str(),
            "gs://bucket/event_date_part=20240305/export-*.parquet"
        );
    }
}
