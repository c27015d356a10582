//! Kind Registry
//!
//! Static mapping from kind discriminator to its attribute schema and
//! constructor. Built once from the closed [`Kind`] taxonomy and never mutated.

use std::collections::HashMap;
use std::sync::OnceLock;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::{Map, Value};

use crate::entity::{AttributeValue, Entity, ID_FIELD, KIND_FIELD};
use crate::error::{Error, Result, ValidationError};
use crate::schema::{AttributeSpec, Branch, Kind};

static GLOBAL: OnceLock<KindRegistry> = OnceLock::new();

/// Schema and constructor for one kind
#[derive(Debug, Clone)]
pub struct KindDescriptor {
    kind: Kind,
    attributes: Vec<&'static AttributeSpec>,
}

impl KindDescriptor {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            attributes: kind.declared_attributes(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn branch(&self) -> Branch {
        self.kind.branch()
    }

    /// Declared attributes (excluding `id`), inherited ones first
    pub fn attributes(&self) -> &[&'static AttributeSpec] {
        &self.attributes
    }

    /// Look up a declared attribute by name
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().copied().find(|a| a.name == name)
    }

    /// Construct an entity of this kind
    pub fn construct(
        &self,
        id: Option<&str>,
        attributes: Vec<(String, AttributeValue)>,
    ) -> std::result::Result<Entity, ValidationError> {
        match id {
            Some(id) => Entity::with_id(self.kind, id, attributes),
            None => Entity::new(self.kind, attributes),
        }
    }

    /// Construct an entity of this kind from a flat record's attribute fields
    pub fn construct_from_record(
        &self,
        record: &Map<String, Value>,
    ) -> std::result::Result<Entity, ValidationError> {
        let id = match record.get(ID_FIELD) {
            Some(Value::String(id)) => id.as_str(),
            Some(_) | None => return Err(ValidationError::MissingField(ID_FIELD)),
        };

        let mut attributes = Vec::with_capacity(record.len());
        for (name, value) in record {
            if name == ID_FIELD || name == KIND_FIELD {
                continue;
            }
            let spec = self
                .attribute(name)
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    kind: self.kind.to_string(),
                    name: name.clone(),
                })?;
            attributes.push((name.clone(), AttributeValue::from_json(spec, value)?));
        }
        self.construct(Some(id), attributes)
    }
}

/// Registry of every kind, keyed by discriminator
#[derive(Debug)]
pub struct KindRegistry {
    kinds: HashMap<&'static str, KindDescriptor>,
}

impl KindRegistry {
    /// Build the registry by enumerating the closed taxonomy
    pub fn build() -> Self {
        let kinds = Kind::ALL
            .iter()
            .map(|kind| (kind.as_str(), KindDescriptor::new(*kind)))
            .collect();
        Self { kinds }
    }

    /// Process-wide registry, built on first access
    pub fn global() -> &'static KindRegistry {
        GLOBAL.get_or_init(Self::build)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Descriptor for a kind
    pub fn descriptor(&self, kind: Kind) -> &KindDescriptor {
        // Every Kind is registered by build()
        &self.kinds[kind.as_str()]
    }

    /// Descriptor by discriminator, if registered
    pub fn get(&self, name: &str) -> Option<&KindDescriptor> {
        self.kinds.get(name)
    }

    /// Descriptor by discriminator, or an UnknownKind error with a suggestion
    pub fn resolve(&self, name: &str) -> Result<&KindDescriptor> {
        self.get(name).ok_or_else(|| Error::UnknownKind {
            name: name.to_string(),
            suggestion: self.suggest(name),
        })
    }

    /// All descriptors in taxonomy order
    pub fn descriptors(&self) -> impl Iterator<Item = &KindDescriptor> {
        Kind::ALL.iter().map(move |kind| self.descriptor(*kind))
    }

    /// Closest registered discriminator to `name`
    pub fn suggest(&self, name: &str) -> Option<String> {
        if let Some(kind) = Kind::ALL
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
        {
            return Some(kind.as_str().to_string());
        }

        let matcher = SkimMatcherV2::default();
        Kind::ALL
            .iter()
            .filter_map(|kind| {
                matcher
                    .fuzzy_match(kind.as_str(), name)
                    .map(|score| (score, kind.as_str()))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, name)| name.to_string())
    }

    /// Rebuild an entity from a flat record by dispatching on its `kind` field
    pub fn reconstruct(&self, record: &Map<String, Value>) -> Result<Entity> {
        let name = match record.get(KIND_FIELD) {
            Some(Value::String(name)) => name,
            Some(_) | None => return Err(ValidationError::MissingField(KIND_FIELD).into()),
        };
        let descriptor = self.resolve(name)?;
        Ok(descriptor.construct_from_record(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_covers_taxonomy() {
        let registry = KindRegistry::build();
        assert_eq!(registry.len(), Kind::ALL.len());
        for kind in Kind::ALL {
            assert_eq!(registry.descriptor(*kind).kind(), *kind);
        }
        assert!(registry.get("CPULoadEffect").is_some());
    }

    #[test]
    fn test_resolve_suggests_kind() {
        let registry = KindRegistry::build();
        match registry.resolve("device") {
            Err(Error::UnknownKind { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("Device"));
            }
            other => panic!("Expected UnknownKind, got {:?}", other),
        }
        assert_eq!(registry.suggest("PhishAtt").as_deref(), Some("PhishingAttack"));
    }

    #[test]
    fn test_reconstruct_dispatches_on_kind() {
        let record = json!({
            "id": "46545b7a-1840-4e34-a26f-aef5eb954b25",
            "kind": "Service",
            "name": "httpd",
            "version": "2.4.20",
            "service_type": "Web",
        });
        let entity = KindRegistry::global()
            .reconstruct(record.as_object().unwrap())
            .unwrap();
        assert_eq!(entity.kind(), Kind::Service);
        assert_eq!(entity.to_record(), *record.as_object().unwrap());
    }

    #[test]
    fn test_reconstruct_rejects_out_of_range_duration() {
        let record = json!({
            "id": "46545b7a-1840-4e34-a26f-aef5eb954b25",
            "kind": "CyberAttack",
            "duration": i64::MIN,
        });
        match KindRegistry::global().reconstruct(record.as_object().unwrap()) {
            Err(Error::Validation(ValidationError::TypeMismatch { attribute, .. })) => {
                assert_eq!(attribute, "duration");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }

        let record = json!({
            "id": "46545b7a-1840-4e34-a26f-aef5eb954b25",
            "kind": "CyberAttack",
            "duration": i64::MAX,
        });
        assert!(KindRegistry::global()
            .reconstruct(record.as_object().unwrap())
            .is_ok());
    }

    #[test]
    fn test_reconstruct_rejects_bad_records() {
        let registry = KindRegistry::global();

        let missing_kind = json!({ "id": "46545b7a-1840-4e34-a26f-aef5eb954b25" });
        assert!(matches!(
            registry.reconstruct(missing_kind.as_object().unwrap()),
            Err(Error::Validation(ValidationError::MissingField("kind")))
        ));

        let unknown_attr = json!({
            "id": "46545b7a-1840-4e34-a26f-aef5eb954b25",
            "kind": "Persona",
            "bandwidth": 10,
        });
        assert!(matches!(
            registry.reconstruct(unknown_attr.as_object().unwrap()),
            Err(Error::Validation(ValidationError::UnknownAttribute { .. }))
        ));
    }
}
