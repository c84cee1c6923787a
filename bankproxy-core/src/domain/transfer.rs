//! Money transfer request and the result assigned by the banking API

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Money transfer to submit.
///
/// Field names match the remote wire format exactly. `creditor` and its
/// nested objects are optional at the type level; which of them are
/// mandatory is decided by [`crate::validation::validate_transfer_request`].
/// Inbound bodies that may lack `amount` or `executionDate` go through
/// [`crate::validation::parse_transfer_request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub currency: String,
    /// Sent as a JSON number with the exact digits given
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub execution_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditor: Option<Creditor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creditor {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
}

/// IBAN plus optional BIC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    #[serde(default)]
    pub account_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    /// Street line (`address` on the wire)
    #[serde(default, rename = "address", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Outcome of a submitted transfer. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    /// Empty when the remote sends `null`; the transfer still happened
    #[serde(default, deserialize_with = "null_as_default")]
    pub money_transfer_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub creditor: Option<Creditor>,
    #[serde(default)]
    pub debtor: Option<Debtor>,
    /// Correlation id
    #[serde(default)]
    pub cro: Option<String>,
    /// Payment reference
    #[serde(default)]
    pub uri: Option<String>,
    /// Transaction reference
    #[serde(default)]
    pub trn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "remote_datetime")]
    pub created_datetime: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "remote_datetime")]
    pub accounted_datetime: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub debtor_value_date: Option<NaiveDate>,
    #[serde(default)]
    pub creditor_value_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Option<TransferAmount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_urgent: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_instant: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fees: Vec<Fee>,
    #[serde(default)]
    pub has_tax_relief: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debtor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account: Option<AccountRef>,
}

/// Amounts computed by the remote side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferAmount {
    #[serde(default)]
    pub debtor_amount: Option<Decimal>,
    #[serde(default)]
    pub debtor_currency: Option<String>,
    #[serde(default)]
    pub creditor_amount: Option<Decimal>,
    #[serde(default)]
    pub creditor_currency: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub conversion_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    #[serde(default)]
    pub fee_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl TransferResult {
    /// Sum of all fees charged, regardless of currency
    pub fn total_fees(&self) -> Decimal {
        self.fees.iter().filter_map(|f| f.amount).sum()
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Remote timestamps look like `2019-04-01T10:00:00.000+0200`.
/// RFC 3339 (`+02:00`) is accepted as well.
pub mod remote_datetime {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
    const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

    pub fn parse(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_str(s, PARSE_FORMAT).or_else(|_| DateTime::parse_from_rfc3339(s))
    }

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid datetime '{}': {}", s, e))),
        }
    }
}
