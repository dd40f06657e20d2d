use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Deposit,
    Redemption,
}

/// A history entry. Never modified after creation.
///
/// Also reads the older `{type, title, date, points}` shape, where `date` is a
/// display string such as `"Oct 28, 2025"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "type")]
    pub kind: TransactionKind,
    #[serde(default, alias = "title")]
    pub label: String,
    #[serde(default, alias = "date", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "points")]
    pub points_delta: i64,
}

/// Display formats seen in older records
const LEGACY_DATE_FORMATS: &[&str] = &["%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parse RFC 3339 or a legacy display date; anything else becomes the epoch
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_timestamp(&raw).unwrap_or_else(|| {
        tracing::debug!("Unrecognized transaction date {:?}, using epoch", raw);
        DateTime::<Utc>::default()
    }))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    LEGACY_DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(raw, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}
