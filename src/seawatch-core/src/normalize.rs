use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};

use crate::{
    DockingStatus, HEADING_NOT_AVAILABLE, MalformedJsonSnafu, MissingCoordinatesSnafu,
    MissingIdentitySnafu, Mmsi, NavigationStatus, NormalizeError, NotAnObjectSnafu, RiskFactor,
    VesselRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Mmsi,
    Latitude,
    Longitude,
    Speed,
    Course,
    Heading,
    NavigationalStatus,
    Name,
    CallSign,
    Destination,
    ShipType,
    Timestamp,
    DockingStatus,
    RiskScore,
    RiskFactors,
}

/// Source keys for a field in priority order, the first usable one wins.
struct FieldRule {
    field: Field,
    sources: &'static [&'static str],
    sentinel: Option<f64>,
}

const fn rule(field: Field, sources: &'static [&'static str]) -> FieldRule {
    FieldRule {
        field,
        sources,
        sentinel: None,
    }
}

const FIELD_RULES: &[FieldRule] = &[
    rule(Field::Mmsi, &["UserID", "mmsi", "MMSI"]),
    rule(Field::Latitude, &["Latitude", "latitude"]),
    rule(Field::Longitude, &["Longitude", "longitude"]),
    rule(Field::Speed, &["Sog", "speed"]),
    rule(Field::Course, &["Cog", "course"]),
    FieldRule {
        field: Field::Heading,
        sources: &["TrueHeading", "heading"],
        sentinel: Some(HEADING_NOT_AVAILABLE),
    },
    rule(Field::NavigationalStatus, &["NavigationalStatus", "nav_status"]),
    rule(Field::Name, &["ShipName", "ship_name", "name", "Name"]),
    rule(Field::CallSign, &["CallSign", "call_sign"]),
    rule(Field::Destination, &["Destination", "destination"]),
    rule(Field::ShipType, &["Type", "ship_type"]),
    rule(Field::Timestamp, &["time_utc", "timestamp"]),
    rule(Field::DockingStatus, &["status", "docking_status"]),
    rule(Field::RiskScore, &["risk_score"]),
    rule(Field::RiskFactors, &["risk_factors"]),
];

const AISSTREAM_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z UTC";

/// Normalizes a raw stream payload into a [VesselRecord], stamping it with the current time
/// when the payload carries no usable timestamp.
pub fn normalize(raw: &str) -> Result<VesselRecord, NormalizeError> {
    normalize_at(raw, Utc::now())
}

pub fn normalize_at(raw: &str, ingested_at: DateTime<Utc>) -> Result<VesselRecord, NormalizeError> {
    let value: Value = serde_json::from_str(raw).context(MalformedJsonSnafu)?;
    normalize_value(value, ingested_at)
}

pub fn normalize_value(
    value: Value,
    ingested_at: DateTime<Utc>,
) -> Result<VesselRecord, NormalizeError> {
    let Value::Object(object) = value else {
        return NotAnObjectSnafu.fail();
    };
    let payload = Payload(flatten_envelope(object));

    let mmsi = payload
        .resolve(Field::Mmsi, integer)
        .and_then(|v| Mmsi::try_from(v).ok())
        .context(MissingIdentitySnafu)?;

    let (latitude, longitude) = match (
        payload.resolve(Field::Latitude, number),
        payload.resolve(Field::Longitude, number),
    ) {
        (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => (lat, lon),
        _ => return MissingCoordinatesSnafu { mmsi }.fail(),
    };

    let course = payload.resolve(Field::Course, number).unwrap_or(0.0);

    Ok(VesselRecord {
        mmsi,
        latitude,
        longitude,
        course,
        heading: payload.resolve(Field::Heading, number).unwrap_or(course),
        speed: payload.resolve(Field::Speed, number).unwrap_or(0.0),
        name: payload.resolve(Field::Name, text),
        call_sign: payload.resolve(Field::CallSign, text),
        destination: payload.resolve(Field::Destination, text),
        ship_type: payload
            .resolve(Field::ShipType, integer)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0),
        navigational_status: payload
            .resolve(Field::NavigationalStatus, integer)
            .map(NavigationStatus::from)
            .unwrap_or_default(),
        timestamp: payload
            .resolve(Field::Timestamp, timestamp)
            .unwrap_or(ingested_at),
        docking_status: payload
            .resolve(Field::DockingStatus, text)
            .map(|v| DockingStatus::from_lenient(&v))
            .unwrap_or_default(),
        risk_score: payload.resolve(Field::RiskScore, number),
        risk_factors: payload
            .resolve(Field::RiskFactors, risk_factors)
            .unwrap_or_default(),
    })
}

struct Payload(Map<String, Value>);

impl Payload {
    fn resolve<T>(&self, field: Field, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let rule = FIELD_RULES.iter().find(|r| r.field == field)?;
        rule.sources
            .iter()
            .filter_map(|key| self.0.get(*key))
            .filter(|v| match (rule.sentinel, number(v)) {
                (Some(sentinel), Some(n)) => n != sentinel,
                _ => true,
            })
            .find_map(convert)
    }
}

/// Lifts the inner message of a typed stream envelope to the top level, merging in any
/// metadata keys the inner message lacks. Payloads that are not envelopes pass through.
fn flatten_envelope(mut object: Map<String, Value>) -> Map<String, Value> {
    let message_type = match object.get("MessageType") {
        Some(Value::String(v)) => v.clone(),
        _ => return object,
    };
    let Some(Value::Object(mut message)) = object.remove("Message") else {
        return object;
    };
    let Some(Value::Object(mut flat)) = message.remove(&message_type) else {
        return object;
    };
    if let Some(Value::Object(meta)) = object.remove("MetaData") {
        for (key, value) in meta {
            flat.entry(key).or_insert(value);
        }
    }
    flat
}

fn number(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(v) => v.as_f64(),
        Value::String(v) => v.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(v) => v
            .as_i64()
            .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(v) => v.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(v) => {
            let trimmed = v.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let Value::String(v) = value else {
        return None;
    };
    let v = v.trim();
    DateTime::parse_from_rfc3339(v)
        .or_else(|_| DateTime::parse_from_str(v, AISSTREAM_TIME_FORMAT))
        .map(|t| t.to_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S%.f").map(|t| t.and_utc()))
        .ok()
}

fn risk_factors(value: &Value) -> Option<BTreeMap<String, RiskFactor>> {
    let Value::Object(factors) = value else {
        return None;
    };
    Some(
        factors
            .iter()
            .filter_map(|(key, v)| {
                let factor = match v {
                    Value::Number(n) => RiskFactor::Number(n.as_f64()?),
                    Value::String(s) => RiskFactor::Text(s.clone()),
                    Value::Bool(b) => RiskFactor::Text(b.to_string()),
                    _ => return None,
                };
                Some((key.clone(), factor))
            })
            .collect(),
    )
}
