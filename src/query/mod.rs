//! SELECT/FROM/WHERE queries over store contents
//!
//! Queries are parsed into a closed AST and interpreted; predicate text is
//! never executed. Every query is a full scan of the namespaces it names.
//!
//! ```text
//! SELECT name,version FROM Application WHERE name='Firefox'
//! SELECT id FROM Device WHERE (role='gateway' AND is_virtual=false) OR role='firewall'
//! SELECT * FROM *
//! ```

mod eval;
mod parser;

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::entity::{Entity, ID_FIELD, KIND_FIELD};
use crate::error::Result;
use crate::schema::Kind;
use crate::store::Store;

pub use parser::{parse, parse_predicate};

/// A parsed query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub select: Selection,
    pub from: Source,
    pub predicate: Option<Predicate>,
}

/// Projection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// `*`: `id`, every declared attribute of every kind in scope, then `kind`
    All,
    Attributes(Vec<String>),
}

/// Namespaces to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `*`: every namespace currently on disk
    All,
    Kinds(Vec<String>),
}

/// Boolean WHERE expression
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Clause(Clause),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

/// `attribute op literal`
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub attribute: String,
    pub op: Operator,
    pub literal: Literal,
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Operator::Eq),
            "<>" => Some(Operator::Ne),
            "<" => Some(Operator::Lt),
            ">" => Some(Operator::Gt),
            "<=" => Some(Operator::Le),
            ">=" => Some(Operator::Ge),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }

    /// Whether `ordering` (record value relative to literal) satisfies the operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Right-hand side of a clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `'text'` or `"text"`
    Quoted(String),
    /// Unquoted word such as `60`, `false` or `gateway`
    Bare(String),
}

impl Literal {
    pub fn text(&self) -> &str {
        match self {
            Literal::Quoted(s) | Literal::Bare(s) => s,
        }
    }
}

/// One projected row; `None` marks an attribute the record does not have
pub type Row = Vec<Option<Value>>;

/// Headers and rows returned by a query
///
/// Row order follows the directory listing of each namespace and is not
/// guaranteed to be stable between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, or `None` if no such header
    pub fn column(&self, header: &str) -> Option<Vec<Option<&Value>>> {
        let index = self.headers.iter().position(|h| h == header)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).and_then(Option::as_ref))
                .collect(),
        )
    }

    /// Rows as JSON objects keyed by header, omitting absent cells
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(row)
                    .filter_map(|(header, cell)| cell.clone().map(|v| (header.clone(), v)))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }
}

/// Run a parsed query against `store`
pub fn execute(store: &Store, query: &Query) -> Result<QueryResult> {
    let kinds = resolve_source(store, &query.from)?;
    let headers = match &query.select {
        Selection::All => expand_all(&kinds),
        Selection::Attributes(names) => names.clone(),
    };

    let mut rows = Vec::new();
    let mut scanned = 0usize;
    for kind in &kinds {
        for entity in store.list(*kind)? {
            scanned += 1;
            let matched = query
                .predicate
                .as_ref()
                .map_or(true, |predicate| predicate.evaluate(&entity));
            if matched {
                rows.push(project(&entity, &headers));
            }
        }
    }

    debug!(
        namespaces = kinds.len(),
        scanned,
        matched = rows.len(),
        "Executed query"
    );
    Ok(QueryResult { headers, rows })
}

fn resolve_source(store: &Store, source: &Source) -> Result<Vec<Kind>> {
    match source {
        Source::All => store.namespaces(),
        Source::Kinds(names) => {
            let mut kinds = Vec::with_capacity(names.len());
            for name in names {
                let kind = store.registry().resolve(name)?.kind();
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            Ok(kinds)
        }
    }
}

fn expand_all(kinds: &[Kind]) -> Vec<String> {
    let mut headers = vec![ID_FIELD.to_string()];
    for kind in kinds {
        for spec in kind.declared_attributes() {
            if !headers.iter().any(|h| h == spec.name) {
                headers.push(spec.name.to_string());
            }
        }
    }
    headers.push(KIND_FIELD.to_string());
    headers
}

fn project(entity: &Entity, headers: &[String]) -> Row {
    headers
        .iter()
        .map(|header| match header.as_str() {
            ID_FIELD => Some(Value::String(entity.id().to_string())),
            KIND_FIELD => Some(Value::String(entity.kind().as_str().to_string())),
            name => entity.get(name).map(|value| value.to_json()),
        })
        .collect()
}
