//! Relationship helpers
//!
//! A relationship is a first-class `Relationship` entity holding a directed,
//! typed edge `(subject_id, relationship_type, object_id)`. Endpoints are opaque
//! ids and are never checked against the store, so a relationship may be saved
//! before the entities it connects.
//!
//! Inverse edges are never derived implicitly. A caller that wants both
//! directions builds the second record with [`inverse`] and saves it.

use crate::entity::{AttributeValue, Entity};
use crate::error::ValidationError;
use crate::schema::Kind;

/// Borrowed view of a relationship's edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triple<'a> {
    pub subject_id: &'a str,
    pub relationship_type: &'a str,
    pub object_id: &'a str,
}

/// Build a relationship entity with a generated `relationship--` id
pub fn relationship(
    subject_id: &str,
    relationship_type: &str,
    object_id: &str,
    privileges: Option<Vec<String>>,
) -> Result<Entity, ValidationError> {
    let mut attributes = vec![
        ("subject_id", AttributeValue::from(subject_id)),
        ("relationship_type", AttributeValue::from(relationship_type)),
        ("object_id", AttributeValue::from(object_id)),
    ];
    if let Some(privileges) = privileges {
        attributes.push(("privileges", AttributeValue::from(privileges)));
    }
    Entity::new(Kind::Relationship, attributes)
}

/// The edge of a relationship entity; `None` for any other kind
pub fn triple(entity: &Entity) -> Option<Triple<'_>> {
    if entity.kind() != Kind::Relationship {
        return None;
    }
    Some(Triple {
        subject_id: entity.get("subject_id")?.as_str()?,
        relationship_type: entity.get("relationship_type")?.as_str()?,
        object_id: entity.get("object_id")?.as_str()?,
    })
}

/// Semantic inverse of a RelationshipType option, matched case-insensitively
pub fn inverse_type(relationship_type: &str) -> Option<&'static str> {
    const PAIRS: &[(&str, &str)] = &[
        ("Administers", "AdministeredBy"),
        ("ComponentOf", "HasComponent"),
        ("ContainedIn", "Contains"),
        ("ProvidedBy", "Provides"),
        ("ResidesOn", "HasResident"),
    ];
    PAIRS.iter().find_map(|(a, b)| {
        if a.eq_ignore_ascii_case(relationship_type) {
            Some(*b)
        } else if b.eq_ignore_ascii_case(relationship_type) {
            Some(*a)
        } else {
            None
        }
    })
}

/// A new, unsaved relationship pointing the other way, with the same privileges
pub fn inverse(entity: &Entity) -> Option<Result<Entity, ValidationError>> {
    let edge = triple(entity)?;
    let inverse_type = inverse_type(edge.relationship_type)?;
    let privileges = match entity.get("privileges") {
        Some(AttributeValue::List(items)) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
        ),
        _ => None,
    };
    Some(relationship(
        edge.object_id,
        inverse_type,
        edge.subject_id,
        privileges,
    ))
}
