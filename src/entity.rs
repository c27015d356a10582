//! Entity values, identity rules and flat-record serialization

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::enumerations::CaseDiagnostic;
use crate::error::{Result, ValidationError};
use crate::registry::KindRegistry;
use crate::schema::{AttributeSpec, AttributeType, Kind};

/// Record field holding the entity id
pub const ID_FIELD: &str = "id";
/// Record field holding the kind discriminator
pub const KIND_FIELD: &str = "kind";

/// A typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Duration(chrono::Duration),
    List(Vec<Value>),
    Mapping(Map<String, Value>),
}

impl AttributeValue {
    /// Short name of the value's shape, used in type errors
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "string",
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Float(_) => "float",
            AttributeValue::Timestamp(_) => "timestamp",
            AttributeValue::Duration(_) => "duration",
            AttributeValue::List(_) => "list",
            AttributeValue::Mapping(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Encode for the flat record
    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::String(s) => Value::String(s.clone()),
            AttributeValue::Boolean(b) => Value::Bool(*b),
            AttributeValue::Integer(i) => Value::from(*i),
            // Non-finite floats are rejected during validation
            AttributeValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttributeValue::Timestamp(t) => {
                Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            AttributeValue::Duration(d) => Value::from(d.num_milliseconds()),
            AttributeValue::List(items) => Value::Array(items.clone()),
            AttributeValue::Mapping(map) => Value::Object(map.clone()),
        }
    }

    /// Decode a record value according to the declared attribute type
    pub fn from_json(spec: &AttributeSpec, value: &Value) -> std::result::Result<Self, ValidationError> {
        let mismatch = || ValidationError::TypeMismatch {
            attribute: spec.name.to_string(),
            expected: spec.ty.describe(),
            found: json_type_name(value).to_string(),
        };

        let decoded = match (spec.ty, value) {
            (AttributeType::String | AttributeType::Enum(_), Value::String(s)) => {
                AttributeValue::String(s.clone())
            }
            (AttributeType::Boolean, Value::Bool(b)) => AttributeValue::Boolean(*b),
            (AttributeType::Integer, Value::Number(n)) => {
                AttributeValue::Integer(n.as_i64().ok_or_else(mismatch)?)
            }
            (AttributeType::Float, Value::Number(n)) => {
                AttributeValue::Float(n.as_f64().ok_or_else(mismatch)?)
            }
            (AttributeType::Timestamp, Value::String(s)) => {
                let parsed = DateTime::parse_from_rfc3339(s).map_err(|_| mismatch())?;
                AttributeValue::Timestamp(parsed.with_timezone(&Utc))
            }
            (AttributeType::Duration, Value::Number(n)) => {
                let millis = n.as_i64().ok_or_else(mismatch)?;
                AttributeValue::Duration(
                    chrono::Duration::try_milliseconds(millis).ok_or_else(mismatch)?,
                )
            }
            (
                AttributeType::List | AttributeType::StringList | AttributeType::EnumList(_),
                Value::Array(items),
            ) => AttributeValue::List(items.clone()),
            (AttributeType::Mapping, Value::Object(map)) => AttributeValue::Mapping(map.clone()),
            _ => return Err(mismatch()),
        };
        Ok(decoded)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i64::from(i))
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(t: DateTime<Utc>) -> Self {
        AttributeValue::Timestamp(t)
    }
}

impl From<chrono::Duration> for AttributeValue {
    fn from(d: chrono::Duration) -> Self {
        AttributeValue::Duration(d)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(items: Vec<&str>) -> Self {
        AttributeValue::List(items.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(items: Vec<String>) -> Self {
        AttributeValue::List(items.into_iter().map(Value::String).collect())
    }
}

impl From<Vec<Value>> for AttributeValue {
    fn from(items: Vec<Value>) -> Self {
        AttributeValue::List(items)
    }
}

impl From<Map<String, Value>> for AttributeValue {
    fn from(map: Map<String, Value>) -> Self {
        AttributeValue::Mapping(map)
    }
}

/// A value paired with the soft diagnostics raised while validating it
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub value: T,
    pub diagnostics: Vec<CaseDiagnostic>,
}

/// Check `value` against `spec`, returning the normalised value
fn validate_value(
    spec: &AttributeSpec,
    value: AttributeValue,
) -> std::result::Result<Validated<AttributeValue>, ValidationError> {
    let mismatch = |found: &AttributeValue| ValidationError::TypeMismatch {
        attribute: spec.name.to_string(),
        expected: spec.ty.describe(),
        found: found.type_name().to_string(),
    };

    let mut diagnostics = Vec::new();
    let value = match (spec.ty, value) {
        (AttributeType::String, v @ AttributeValue::String(_)) => v,
        (AttributeType::Boolean, v @ AttributeValue::Boolean(_)) => v,
        (AttributeType::Integer, v @ AttributeValue::Integer(_)) => v,
        (AttributeType::Float, AttributeValue::Integer(i)) => AttributeValue::Float(i as f64),
        (AttributeType::Float, AttributeValue::Float(f)) => {
            if !f.is_finite() {
                return Err(ValidationError::TypeMismatch {
                    attribute: spec.name.to_string(),
                    expected: spec.ty.describe(),
                    found: "non-finite float".to_string(),
                });
            }
            AttributeValue::Float(f)
        }
        (AttributeType::Timestamp, AttributeValue::Timestamp(t)) => {
            // RFC 3339 only has room for four-digit years
            if !(0..=9999).contains(&t.year()) {
                return Err(ValidationError::TypeMismatch {
                    attribute: spec.name.to_string(),
                    expected: spec.ty.describe(),
                    found: format!("timestamp in year {}", t.year()),
                });
            }
            AttributeValue::Timestamp(t)
        }
        (AttributeType::Duration, AttributeValue::Duration(d)) => {
            AttributeValue::Duration(chrono::Duration::milliseconds(d.num_milliseconds()))
        }
        (AttributeType::List, v @ AttributeValue::List(_)) => v,
        (AttributeType::StringList, AttributeValue::List(items)) => {
            if let Some(bad) = items.iter().find(|item| !item.is_string()) {
                return Err(ValidationError::TypeMismatch {
                    attribute: spec.name.to_string(),
                    expected: spec.ty.describe(),
                    found: format!("list containing {}", json_type_name(bad)),
                });
            }
            AttributeValue::List(items)
        }
        (AttributeType::Mapping, v @ AttributeValue::Mapping(_)) => v,
        (AttributeType::Enum(enumeration), AttributeValue::String(s)) => {
            diagnostics.extend(enumeration.check(spec.name, &s)?);
            AttributeValue::String(s)
        }
        (AttributeType::EnumList(enumeration), AttributeValue::List(items)) => {
            let mut values = Vec::with_capacity(items.len());
            for item in &items {
                match item.as_str() {
                    Some(s) => values.push(s),
                    None => {
                        return Err(ValidationError::TypeMismatch {
                            attribute: spec.name.to_string(),
                            expected: spec.ty.describe(),
                            found: format!("list containing {}", json_type_name(item)),
                        })
                    }
                }
            }
            diagnostics.extend(enumeration.check_all(spec.name, &values)?);
            AttributeValue::List(items)
        }
        (_, other) => return Err(mismatch(&other)),
    };

    Ok(Validated { value, diagnostics })
}

/// Validate an id for `kind`: a hyphenated UUIDv4, behind the kind's prefix if it has one
pub fn validate_id(kind: Kind, value: &str) -> std::result::Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidId {
        value: value.to_string(),
        prefix: kind.id_prefix(),
    };

    let uuid_part = match kind.id_prefix() {
        Some(prefix) => value.strip_prefix(prefix).ok_or_else(invalid)?,
        None => value,
    };

    // Hyphenated form only; braced and urn forms would leak into file names
    if uuid_part.len() != 36 {
        return Err(invalid());
    }
    let uuid = Uuid::parse_str(uuid_part).map_err(|_| invalid())?;
    if uuid.get_version_num() != 4 {
        return Err(invalid());
    }
    Ok(())
}

/// Generate a fresh id for `kind`
pub fn generate_id(kind: Kind) -> String {
    let uuid = Uuid::new_v4().to_string();
    match kind.id_prefix() {
        Some(prefix) => format!("{}{}", prefix, uuid),
        None => uuid,
    }
}

/// A typed simulation entity: cyber object, cyber event or relationship
///
/// Attributes that were never set are absent; there are no null placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: String,
    kind: Kind,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Entity {
    /// Construct with a generated id. Casing diagnostics are logged.
    pub fn new<K, I>(kind: Kind, attributes: I) -> std::result::Result<Self, ValidationError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AttributeValue)>,
    {
        Self::construct(kind, None, attributes).map(log_diagnostics)
    }

    /// Construct with a caller-supplied id. Casing diagnostics are logged.
    pub fn with_id<K, I>(
        kind: Kind,
        id: &str,
        attributes: I,
    ) -> std::result::Result<Self, ValidationError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AttributeValue)>,
    {
        Self::construct(kind, Some(id), attributes).map(log_diagnostics)
    }

    /// Construct, validating the id and every supplied attribute; fails on the first bad field
    pub fn construct<K, I>(
        kind: Kind,
        id: Option<&str>,
        attributes: I,
    ) -> std::result::Result<Validated<Self>, ValidationError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AttributeValue)>,
    {
        let id = match id {
            Some(id) => {
                validate_id(kind, id)?;
                id.to_string()
            }
            None => generate_id(kind),
        };

        let mut entity = Entity {
            id,
            kind,
            attributes: BTreeMap::new(),
        };
        let mut diagnostics = Vec::new();
        for (name, value) in attributes {
            diagnostics.extend(entity.set(name, value)?);
        }

        for spec in kind.declared_attributes() {
            if spec.required && !entity.attributes.contains_key(spec.name) {
                return Err(ValidationError::MissingAttribute {
                    kind: kind.to_string(),
                    name: spec.name.to_string(),
                });
            }
        }

        Ok(Validated {
            value: entity,
            diagnostics,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Replace the id after validating it
    pub fn set_id(&mut self, id: &str) -> std::result::Result<(), ValidationError> {
        validate_id(self.kind, id)?;
        self.id = id.to_string();
        Ok(())
    }

    /// Get a set attribute
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterate over set attributes in name order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set one attribute, validating only that field
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> std::result::Result<Vec<CaseDiagnostic>, ValidationError> {
        let name = name.into();
        let spec = self.spec(&name)?;
        let validated = validate_value(spec, value)?;
        self.attributes.insert(name, validated.value);
        Ok(validated.diagnostics)
    }

    /// Make an attribute absent again, returning its previous value
    pub fn unset(&mut self, name: &str) -> std::result::Result<Option<AttributeValue>, ValidationError> {
        let spec = self.spec(name)?;
        if spec.required {
            return Err(ValidationError::MissingAttribute {
                kind: self.kind.to_string(),
                name: name.to_string(),
            });
        }
        Ok(self.attributes.remove(name))
    }

    fn spec(&self, name: &str) -> std::result::Result<&'static AttributeSpec, ValidationError> {
        if name == ID_FIELD || name == KIND_FIELD {
            return Err(ValidationError::Reserved {
                attribute: name.to_string(),
            });
        }
        KindRegistry::global()
            .descriptor(self.kind)
            .attribute(name)
            .ok_or_else(|| ValidationError::UnknownAttribute {
                kind: self.kind.to_string(),
                name: name.to_string(),
            })
    }

    /// Soft diagnostics for every enum-valued attribute currently set
    pub fn case_diagnostics(&self) -> Vec<CaseDiagnostic> {
        let descriptor = KindRegistry::global().descriptor(self.kind);
        let mut diagnostics = Vec::new();
        for (name, value) in &self.attributes {
            let Some(spec) = descriptor.attribute(name) else {
                continue;
            };
            if let Ok(validated) = validate_value(spec, value.clone()) {
                diagnostics.extend(validated.diagnostics);
            }
        }
        diagnostics
    }

    /// Flat record: `id`, `kind` and every set attribute
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        record.insert(
            KIND_FIELD.to_string(),
            Value::String(self.kind.as_str().to_string()),
        );
        for (name, value) in &self.attributes {
            record.insert(name.clone(), value.to_json());
        }
        record
    }

    /// Rebuild an entity from a flat record, dispatching on its kind discriminator
    pub fn from_record(record: &Map<String, Value>) -> Result<Self> {
        KindRegistry::global().reconstruct(record)
    }
}

fn log_diagnostics(validated: Validated<Entity>) -> Entity {
    for diag in &validated.diagnostics {
        warn!(
            kind = %validated.value.kind,
            id = %validated.value.id,
            "{}", diag
        );
    }
    validated.value
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}(", self.kind)?;
        writeln!(f, "    id: {}", self.id)?;
        for (name, value) in &self.attributes {
            writeln!(f, "    {}: {}", name, value.to_json())?;
        }
        write!(f, ")")
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let record = self.to_record();
        let mut map = serializer.serialize_map(Some(record.len()))?;
        for (k, v) in &record {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Map::<String, Value>::deserialize(deserializer)?;
        Entity::from_record(&record).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_generated_id_is_uuid_v4() {
        let app = Entity::new(Kind::Application, Vec::<(&str, AttributeValue)>::new()).unwrap();
        let uuid = Uuid::parse_str(app.id()).unwrap();
        assert_eq!(uuid.get_version_num(), 4);
    }

    #[test]
    fn test_rejects_non_v4_ids() {
        let no_attrs = Vec::<(&str, AttributeValue)>::new;
        for bad in [
            "not-a-uuid",
            "",
            // version 1
            "c232ab00-9414-11ec-b3c8-9f6bdeced846",
            // simple form of a v4
            "9293510b534b4dd0b7c578d92e279400",
        ] {
            let err = Entity::with_id(Kind::Device, bad, no_attrs()).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidId { .. }), "{bad}");
        }
        assert!(Entity::with_id(Kind::Device, "9293510b-534b-4dd0-b7c5-78d92e279400", no_attrs()).is_ok());
    }

    #[test]
    fn test_relationship_id_prefix() {
        let attrs = || {
            vec![
                ("subject_id", AttributeValue::from("a")),
                ("relationship_type", AttributeValue::from("Administers")),
                ("object_id", AttributeValue::from("b")),
            ]
        };
        let rel = Entity::new(Kind::Relationship, attrs()).unwrap();
        assert!(rel.id().starts_with("relationship--"));

        let bare = "9293510b-534b-4dd0-b7c5-78d92e279400";
        assert!(Entity::with_id(Kind::Relationship, bare, attrs()).is_err());
        let prefixed = format!("relationship--{}", bare);
        assert!(Entity::with_id(Kind::Relationship, &prefixed, attrs()).is_ok());
    }

    #[test]
    fn test_type_mismatch_names_attribute() {
        let err = Entity::new(Kind::Device, vec![("is_virtual", AttributeValue::from("yes"))])
            .unwrap_err();
        match err {
            ValidationError::TypeMismatch { attribute, expected, found } => {
                assert_eq!(attribute, "is_virtual");
                assert_eq!(expected, "boolean");
                assert_eq!(found, "string");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_and_reserved_attributes() {
        let err = Entity::new(Kind::Persona, vec![("version", AttributeValue::from("1"))]).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownAttribute { .. }));

        let err = Entity::new(Kind::Persona, vec![("kind", AttributeValue::from("Device"))]).unwrap_err();
        assert!(matches!(err, ValidationError::Reserved { .. }));
    }

    #[test]
    fn test_enum_case_mismatch_is_diagnostic() {
        let validated = Entity::construct(
            Kind::System,
            None,
            vec![("system_type", AttributeValue::from("scada"))],
        )
        .unwrap();
        assert_eq!(validated.diagnostics.len(), 1);
        assert_eq!(validated.diagnostics[0].canonical, "SCADA");
        assert_eq!(
            validated.value.get("system_type"),
            Some(&AttributeValue::from("scada"))
        );
        assert_eq!(validated.value.case_diagnostics().len(), 1);
    }

    #[test]
    fn test_enum_list_checks_each_element() {
        let err = Entity::new(
            Kind::Device,
            vec![("device_types", AttributeValue::from(vec!["Sensor", "Blender"]))],
        )
        .unwrap_err();
        match err {
            ValidationError::InvalidEnumValue { attribute, enumeration, value, .. } => {
                assert_eq!(attribute, "device_types");
                assert_eq!(enumeration, "DeviceType");
                assert_eq!(value, "Blender");
            }
            other => panic!("Expected InvalidEnumValue, got {:?}", other),
        }

        let err = Entity::new(Kind::Data, vec![("status", AttributeValue::from("Broken"))]).unwrap_err();
        assert!(err.to_string().contains("for status (DataStatusType)"));
    }

    #[test]
    fn test_set_revalidates_single_field() {
        let mut device = Entity::new(Kind::Device, vec![("role", AttributeValue::from("gateway"))]).unwrap();
        assert!(device.set("latency", AttributeValue::from(3)).is_err());
        assert!(device.set("is_virtual", AttributeValue::from(true)).is_ok());
        assert_eq!(device.get("role").and_then(|v| v.as_str()), Some("gateway"));
        assert_eq!(device.unset("role").unwrap(), Some(AttributeValue::from("gateway")));
        assert!(!device.contains("role"));
    }

    #[test]
    fn test_record_omits_absent_attributes() {
        let app = Entity::new(Kind::Application, vec![("name", AttributeValue::from("Firefox"))]).unwrap();
        let record = app.to_record();
        assert_eq!(record.len(), 3);
        assert_eq!(record["kind"], json!("Application"));
        assert!(!record.contains_key("version"));
    }

    #[test]
    fn test_event_round_trip() {
        let when = Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 0).unwrap()
            + chrono::Duration::microseconds(250);
        let mut modifiers = Map::new();
        modifiers.insert("port".to_string(), json!(502));
        let effect = Entity::new(
            Kind::LoadRateEffect,
            vec![
                ("event_time", AttributeValue::from(when)),
                ("duration", AttributeValue::from(chrono::Duration::milliseconds(1500))),
                ("phase", AttributeValue::from("Start")),
                ("target_ids", AttributeValue::from(vec!["t1", "t2"])),
                ("target_modifiers", AttributeValue::from(modifiers)),
                ("percentage", AttributeValue::from(42)),
                ("rate_type", AttributeValue::from("Upload")),
            ],
        )
        .unwrap();

        assert_eq!(effect.get("percentage"), Some(&AttributeValue::Float(42.0)));

        let text = serde_json::to_string(&effect).unwrap();
        let back: Entity = serde_json::from_str(&text).unwrap();
        assert_eq!(back, effect);
    }

    #[test]
    fn test_timestamp_year_must_fit_rfc3339() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let err = Entity::new(Kind::CyberAttack, vec![("event_time", AttributeValue::from(far))])
            .unwrap_err();
        match err {
            ValidationError::TypeMismatch { attribute, .. } => assert_eq!(attribute, "event_time"),
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }

        let bc = Utc.with_ymd_and_hms(-1, 6, 1, 0, 0, 0).unwrap();
        assert!(Entity::new(Kind::CyberAttack, vec![("event_time", AttributeValue::from(bc))]).is_err());

        let edge = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        let attack = Entity::new(Kind::CyberAttack, vec![("event_time", AttributeValue::from(edge))]).unwrap();
        let back = Entity::from_record(&attack.to_record()).unwrap();
        assert_eq!(back, attack);
    }

    #[test]
    fn test_duration_normalised_to_millis() {
        let d = chrono::Duration::microseconds(1_500_700);
        let attack = Entity::new(Kind::CyberAttack, vec![("duration", AttributeValue::from(d))]).unwrap();
        assert_eq!(
            attack.get("duration"),
            Some(&AttributeValue::Duration(chrono::Duration::milliseconds(1500)))
        );
    }

    #[test]
    fn test_relationship_requires_triple() {
        let err = Entity::new(
            Kind::Relationship,
            vec![("subject_id", AttributeValue::from("a"))],
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::MissingAttribute { .. }));
    }
}
