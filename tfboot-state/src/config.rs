//! Bootstrap configuration

use std::collections::HashMap;
use std::path::Path;

use tfboot_core::{BACKEND_TAG_CATEGORY, Scope, Value};

use crate::error::{BackendError, BackendResult};
use crate::lock_table::DEFAULT_LOCK_TABLE;

/// Raw configuration attributes, as read from a file or the command line
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub attributes: HashMap<String, Value>,
}

impl BackendConfig {
    /// Parse attributes from a JSON object
    pub fn from_json_str(json: &str) -> BackendResult<Self> {
        let attributes: HashMap<String, Value> = serde_json::from_str(json)
            .map_err(|e| BackendError::Serialization(e.to_string()))?;
        Ok(Self { attributes })
    }

    /// Read attributes from a JSON file
    pub fn load(path: impl AsRef<Path>) -> BackendResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BackendError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Set an attribute, replacing any existing value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get a string attribute value
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Get a boolean attribute value
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).and_then(Value::as_bool)
    }

    /// Get a boolean attribute with a default value
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Get a map attribute, requiring every value to be a string
    pub fn get_string_map(&self, key: &str) -> BackendResult<Vec<(String, String)>> {
        let Some(value) = self.attributes.get(key) else {
            return Ok(Vec::new());
        };
        let map = value.as_map().ok_or_else(|| {
            BackendError::configuration(format!("Attribute '{}' must be a map", key))
        })?;

        map.iter()
            .map(|(k, v)| {
                v.as_str().map(|s| (k.clone(), s.to_string())).ok_or_else(|| {
                    BackendError::configuration(format!(
                        "Attribute '{}.{}' must be a string",
                        key, k
                    ))
                })
            })
            .collect()
    }
}

/// Validated settings for one bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub region: String,
    pub bucket: String,
    pub key: String,
    /// Whether Terraform should encrypt the state object (default: true)
    pub encrypt: bool,
    pub lock_table: String,
    /// Custom endpoint URL (for local emulators)
    pub endpoint_url: Option<String>,
    /// Tag source for the created bucket
    pub scope: Scope,
}

impl BootstrapConfig {
    /// Create a BootstrapConfig from raw attributes
    pub fn from_config(config: &BackendConfig) -> BackendResult<Self> {
        let bucket = config
            .get_string("bucket")
            .ok_or_else(|| BackendError::configuration("Missing required attribute: bucket"))?
            .to_string();

        let key = config
            .get_string("key")
            .ok_or_else(|| BackendError::configuration("Missing required attribute: key"))?
            .to_string();

        let region_value = config
            .get_string("region")
            .ok_or_else(|| BackendError::configuration("Missing required attribute: region"))?;

        // Convert region from DSL format (aws.Region.us_west_2) to AWS format (us-west-2)
        let region = convert_region_value(region_value);
        if region.is_empty() {
            return Err(BackendError::configuration("Attribute 'region' must not be empty"));
        }

        let encrypt = config.get_bool_or("encrypt", true);

        let lock_table = config
            .get_string("dynamodb_table")
            .unwrap_or(DEFAULT_LOCK_TABLE)
            .to_string();

        let endpoint_url = config.get_string("endpoint_url").map(str::to_string);

        let mut scope = Scope::new(bucket.clone());
        for (k, v) in config.get_string_map("tags")? {
            scope = scope.with_tag(k, v);
        }
        for (k, v) in config.get_string_map("backend_tags")? {
            scope = scope.with_category_tag(BACKEND_TAG_CATEGORY, k, v);
        }

        Ok(Self {
            region,
            bucket,
            key,
            encrypt,
            lock_table,
            endpoint_url,
            scope,
        })
    }
}

/// Convert region value from DSL format to AWS format
/// e.g., "aws.Region.ap_northeast_1" -> "ap-northeast-1"
fn convert_region_value(value: &str) -> String {
    match value.strip_prefix("aws.Region.") {
        Some(region) => region.replace('_', "-"),
        None => value.trim().to_string(),
    }
}
