use serde::{Deserialize, Serialize};

/// Name used when a page has neither a heading nor a title span
pub const UNKNOWN_NAME: &str = "N/A";

/// Classification used when the infobox has no classification row
pub const NOT_CLASSIFIED: &str = "Not Classified";

/// A normalized record extracted from one detail page
///
/// Serialized with the field names downstream consumers expect:
///
/// ```
/// use jutsu_crawler::JutsuRecord;
///
/// let record = JutsuRecord {
///     name: "Rasengan".to_string(),
///     classification: "Ninjutsu".to_string(),
///     description: "A spinning ball of chakra.".to_string(),
/// };
/// let json = serde_json::to_string(&record).unwrap();
/// assert!(json.contains("\"jutsu_name\":\"Rasengan\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JutsuRecord {
    #[serde(rename = "jutsu_name")]
    pub name: String,

    #[serde(rename = "jutsu_type")]
    pub classification: String,

    #[serde(rename = "jutsu_description")]
    pub description: String,
}
