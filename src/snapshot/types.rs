use serde::{Deserialize, Deserializer, Serialize};

/// Point-in-time capture of the numbered rule listing.
///
/// No schema version is recorded; unknown keys are ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub export_time: String,
    #[serde(default, deserialize_with = "nullable_list")]
    pub rules: Vec<SnapshotRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organize_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organized_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRule {
    /// ufw's rule number at export time. Informational only.
    #[serde(default, deserialize_with = "number_or_text")]
    pub number: u32,
    #[serde(default)]
    pub content: String,
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Older files wrote the number as a quoted string.
fn number_or_text<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u32),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Int(n) => Ok(n),
        Repr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid rule number '{}'", s))),
    }
}
