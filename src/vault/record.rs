use super::collection::KeyCollection;
use super::helpers::{format_timestamp, parse_timestamp};
use super::types::{ApiKey, BaseUrl, KeyName};
use serde::{Deserialize, Serialize};

pub const RECORD_VERSION: u32 = 1;

/// On-disk schema of the key store.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StoreRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    pub keys: Vec<StoredKey>,
    #[serde(default)]
    pub default: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredKey {
    pub name: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: String,
}

fn default_version() -> u32 {
    RECORD_VERSION
}

impl StoreRecord {
    pub fn from_collection(collection: &KeyCollection) -> Self {
        let keys = collection
            .get_all()
            .iter()
            .map(|k| StoredKey {
                name: k.name().value().to_string(),
                key: k.secret().to_string(),
                base_url: k.base_url().map(|url| url.value().to_string()),
                note: k.note().map(str::to_string),
                created_at: format_timestamp(k.created_at()),
            })
            .collect();
        Self {
            version: RECORD_VERSION,
            keys,
            default: collection
                .default_name()
                .map(|name| name.value().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validates every field and rebuilds the collection. Errors describe the
    /// offending entry; the caller wraps them as store corruption.
    pub fn into_collection(self) -> anyhow::Result<KeyCollection> {
        if self.version > RECORD_VERSION {
            anyhow::bail!("unsupported store version {}", self.version);
        }

        let mut keys = Vec::with_capacity(self.keys.len());
        for (idx, stored) in self.keys.into_iter().enumerate() {
            let name = KeyName::create(&stored.name)
                .map_err(|e| anyhow::anyhow!("keys[{idx}].name: {e}"))?;
            let base_url = match stored.base_url.as_deref() {
                Some(raw) => Some(
                    BaseUrl::create(raw)
                        .map_err(|e| anyhow::anyhow!("keys[{idx}].baseUrl: {e}"))?,
                ),
                None => None,
            };
            let created_at = parse_timestamp(&stored.created_at).map_err(|e| {
                anyhow::anyhow!("keys[{idx}].createdAt '{}': {e}", stored.created_at)
            })?;
            keys.push(ApiKey::reconstitute(
                name,
                stored.key,
                base_url,
                stored.note,
                created_at,
            ));
        }

        let default = if self.default.trim().is_empty() {
            None
        } else {
            Some(
                KeyName::create(&self.default)
                    .map_err(|e| anyhow::anyhow!("default: {e}"))?,
            )
        };

        KeyCollection::from_parts(keys, default).map_err(|e| anyhow::anyhow!("{e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::StoreRecord;

    fn parse(raw: &str) -> anyhow::Result<StoreRecord> {
        Ok(serde_json::from_str(raw)?)
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let record = parse(
            r#"{"keys":[{"name":"prod","key":"sk-1","createdAt":"2024-01-01T00:00:00.000Z"}]}"#,
        )
        .expect("parse");
        assert_eq!(record.version, 1);
        assert_eq!(record.default, "");
        let keys = record.into_collection().expect("valid");
        assert_eq!(keys.len(), 1);
        assert!(keys.get_default().is_none());
    }

    #[test]
    fn rejects_missing_keys_array_and_wrong_types() {
        assert!(parse(r#"{"version":1,"default":""}"#).is_err());
        assert!(parse(r#"{"keys":{}}"#).is_err());
        assert!(parse(r#"{"keys":[{"name":5,"key":"x","createdAt":"2024-01-01T00:00:00Z"}]}"#)
            .is_err());
        assert!(parse(r#"{"keys":[{"name":"a","key":"x","note":1,"createdAt":"2024-01-01T00:00:00Z"}]}"#)
            .is_err());
        assert!(parse(r#"{"keys":[{"name":"a","key":"x"}]}"#).is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        let bad_name = parse(
            r#"{"keys":[{"name":"bad name","key":"x","createdAt":"2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();
        let err = bad_name.into_collection().expect_err("bad name");
        assert!(err.to_string().contains("keys[0].name"));

        let bad_url = parse(
            r#"{"keys":[{"name":"a","key":"x","baseUrl":"nope","createdAt":"2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();
        assert!(bad_url.into_collection().is_err());

        let bad_date =
            parse(r#"{"keys":[{"name":"a","key":"x","createdAt":"last week"}]}"#).unwrap();
        let err = bad_date.into_collection().expect_err("bad date");
        assert!(err.to_string().contains("createdAt"));

        let dangling = parse(
            r#"{"keys":[{"name":"a","key":"x","createdAt":"2024-01-01T00:00:00Z"}],"default":"b"}"#,
        )
        .unwrap();
        assert!(dangling.into_collection().is_err());

        let future = parse(r#"{"version":2,"keys":[]}"#).unwrap();
        let err = future.into_collection().expect_err("future version");
        assert!(err.to_string().contains("unsupported store version"));
    }

    #[test]
    fn collection_round_trips_through_record() {
        let raw = r#"{
  "version": 1,
  "keys": [
    {
      "name": "prod",
      "key": "sk-prod-xxxx",
      "createdAt": "2024-01-01T00:00:00.000Z"
    },
    {
      "name": "dev",
      "key": "sk-dev-yyyy",
      "baseUrl": "http://localhost:8080",
      "note": "local proxy",
      "createdAt": "2024-02-01T12:30:00.250Z"
    }
  ],
  "default": "prod"
}"#;
        let record = parse(raw).unwrap();
        let keys = record.into_collection().expect("valid");
        let rebuilt = StoreRecord::from_collection(&keys);
        assert_eq!(serde_json::to_string_pretty(&rebuilt).unwrap(), raw);
    }
}
