//! Predicate evaluation against loaded entities
//!
//! Comparison follows the stored value's type: numbers and durations (in
//! milliseconds) compare numerically, timestamps chronologically, booleans as
//! `false < true`, everything else as text. A literal that cannot be read as
//! the value's type makes the clause false rather than an error.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::entity::{AttributeValue, Entity, ID_FIELD, KIND_FIELD};

use super::{Clause, Predicate};

impl Predicate {
    /// Whether `entity` satisfies the predicate
    pub fn evaluate(&self, entity: &Entity) -> bool {
        match self {
            Predicate::Clause(clause) => clause.matches(entity),
            Predicate::And(left, right) => left.evaluate(entity) && right.evaluate(entity),
            Predicate::Or(left, right) => left.evaluate(entity) || right.evaluate(entity),
        }
    }
}

impl Clause {
    /// Whether `entity` satisfies this clause
    ///
    /// An attribute the entity does not have never matches, whatever the operator.
    pub fn matches(&self, entity: &Entity) -> bool {
        let literal = self.literal.text();
        let ordering = match self.attribute.as_str() {
            ID_FIELD => Some(entity.id().cmp(literal)),
            KIND_FIELD => Some(entity.kind().as_str().cmp(literal)),
            name => match entity.get(name) {
                Some(value) => compare(value, literal),
                None => None,
            },
        };
        ordering.is_some_and(|o| self.op.accepts(o))
    }
}

/// Order `value` relative to `literal`, or `None` if they are not comparable
fn compare(value: &AttributeValue, literal: &str) -> Option<Ordering> {
    match value {
        AttributeValue::String(s) => Some(s.as_str().cmp(literal)),
        AttributeValue::Integer(i) => compare_integer(*i, literal),
        AttributeValue::Float(f) => compare_number(*f, literal),
        AttributeValue::Duration(d) => compare_integer(d.num_milliseconds(), literal),
        AttributeValue::Boolean(b) => parse_bool(literal).map(|l| b.cmp(&l)),
        AttributeValue::Timestamp(t) => DateTime::parse_from_rfc3339(literal)
            .ok()
            .map(|l| t.cmp(&l.with_timezone(&Utc))),
        AttributeValue::List(_) | AttributeValue::Mapping(_) => {
            Some(value.to_json().to_string().as_str().cmp(literal))
        }
    }
}

/// Exact when the literal is an integer, otherwise through `f64`
fn compare_integer(value: i64, literal: &str) -> Option<Ordering> {
    match literal.trim().parse::<i64>() {
        Ok(literal) => Some(value.cmp(&literal)),
        Err(_) => compare_number(value as f64, literal),
    }
}

fn compare_number(value: f64, literal: &str) -> Option<Ordering> {
    let literal: f64 = literal.trim().parse().ok()?;
    value.partial_cmp(&literal)
}

fn parse_bool(literal: &str) -> Option<bool> {
    if literal.eq_ignore_ascii_case("true") {
        Some(true)
    } else if literal.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
