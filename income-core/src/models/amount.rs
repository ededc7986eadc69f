use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Either a usable decimal or anything else (null, garbage strings, objects).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Value(Decimal),
    Invalid(IgnoredAny),
}

/// Deserializes a money amount, mapping null or unparsable input to zero.
///
/// Pair with `#[serde(default)]` so an absent field also becomes zero.
pub(crate) fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Value(value) => Ok(value),
        RawAmount::Invalid(_) => {
            tracing::warn!("invalid amount in persisted data; treating as 0");
            Ok(Decimal::ZERO)
        }
    }
}
