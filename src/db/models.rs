use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque description of the selected flight, as sent by the mobile client.
///
/// Any JSON object is accepted; its contents are never inspected. Values that
/// are not objects (strings, arrays, numbers) are rejected when decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightDetails(pub Map<String, Value>);

/// A flight reservation as stored in the `bookings` collection and returned
/// by the API.
///
/// Bookings are written once and never updated. Unset fields are omitted
/// from both the stored document and the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Server-assigned document key (UUID v4).
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizenship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    /// Creation timestamp, assigned at insert time unless the client sent one.
    pub created_at: DateTime<Utc>,
}

/// The request payload for `POST /bookings`.
///
/// Every field is optional so partial submissions are accepted, but unknown
/// fields and values that cannot be coerced to the field's type are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookingRequest {
    #[serde(default, deserialize_with = "coerce::text")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub email: Option<String>,
    #[serde(default)]
    pub flight: Option<FlightDetails>,
    #[serde(default, deserialize_with = "coerce::count")]
    pub passengers: Option<u32>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub passenger_name: Option<String>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub passport_number: Option<String>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub citizenship: Option<String>,
    #[serde(default, deserialize_with = "coerce::timestamp")]
    pub passport_expiry: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "coerce::price")]
    pub total_price: Option<f64>,
    #[serde(default, deserialize_with = "coerce::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookingRequest {
    /// Turn the request into a storable booking with a fresh id.
    ///
    /// `now` becomes `createdAt` when the client did not supply one.
    pub fn into_booking(self, now: DateTime<Utc>) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4().to_string(),
            user: self.user,
            email: self.email,
            flight: self.flight,
            passengers: self.passengers,
            passenger_name: self.passenger_name,
            passport_number: self.passport_number,
            citizenship: self.citizenship,
            passport_expiry: self.passport_expiry,
            total_price: self.total_price,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

/// The response from a successful `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreatedResponse {
    pub message: String,
    pub booking: Booking,
}

/// Lenient decoders for the request fields.
///
/// Mobile clients send form values as strings, so numeric strings and
/// date-only strings are accepted alongside native JSON types. Text fields
/// take numbers and booleans as their string form. `null` and blank strings
/// decode to `None` for the numeric and date fields.
mod coerce {
    use super::*;
    use serde::de::Error;
    use serde::Deserializer;

    fn blank(s: &str) -> bool {
        s.trim().is_empty()
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(D::Error::custom(format!(
                "expected a string, got {other}"
            ))),
        }
    }

    pub fn price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) if blank(&s) => return Ok(None),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "totalPrice: expected a number, got {other}"
                )))
            }
        };

        parsed
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| D::Error::custom("totalPrice: not a valid number"))
    }

    pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) if blank(&s) => return Ok(None),
            Some(Value::Number(n)) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "passengers: expected a number, got {other}"
                )))
            }
        };

        parsed
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom("passengers: not a valid passenger count"))
    }

    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if blank(&s) => Ok(None),
            Some(Value::String(s)) => parse_date(s.trim())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date '{s}'"))),
            // Epoch milliseconds
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp {n}"))),
            Some(other) => Err(D::Error::custom(format!(
                "expected a date string, got {other}"
            ))),
        }
    }

    pub(super) fn parse_date(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}
