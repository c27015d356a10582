//! CyberDEM Entity Store
//!
//! Typed cyber simulation entities (objects, events and relationships),
//! persisted as flat JSON records in a directory tree and queried with a
//! small SELECT/FROM/WHERE dialect.
//!
//! ## Features
//!
//! - **Closed Taxonomy**: Every kind and its attributes are declared up front
//! - **Enumeration Validation**: Enum-valued attributes are checked against fixed option lists
//! - **Absent, Not Null**: Unset attributes are never stored or projected as null
//! - **Flat-File Store**: One namespace directory per kind, one record per file
//! - **Query Engine**: Parsed and interpreted predicates over full namespace scans
//!
//! ## Architecture
//!
//! ```text
//! cyberdem-fs/
//! ├── Application/
//! │   ├── 46545b7a-1840-4e34-a26f-aef5eb954b25.json
//! │   └── 9293510b-534b-4dd0-b7c5-78d92e279400.json
//! ├── Device/
//! │   └── 3f1c8c55-0e43-4a65-9d55-2f1bb3f4a1de.json
//! └── Relationship/
//!     └── relationship--82ca4ed1-a053-4fc1-b1cc-f4b58b4dbf8c.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use cyberdem::{AttributeValue, Entity, Kind, Store};
//!
//! # fn main() -> cyberdem::Result<()> {
//! let store = Store::open("./cyberdem-fs")?;
//! let firefox = Entity::new(
//!     Kind::Application,
//!     vec![
//!         ("name", AttributeValue::from("Firefox")),
//!         ("version", AttributeValue::from("60")),
//!     ],
//! )?;
//! store.save(&firefox, false)?;
//!
//! let result = store.query("SELECT id FROM Application WHERE name='Firefox'")?;
//! assert_eq!(result.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entity;
pub mod enumerations;
pub mod error;
pub mod query;
pub mod registry;
pub mod relationship;
pub mod schema;
pub mod store;

pub use config::{CyberDemConfig, OutputFormat};
pub use entity::{AttributeValue, Entity, Validated};
pub use enumerations::{CaseDiagnostic, Enumeration};
pub use error::{Error, QuerySyntaxError, Result, ValidationError};
pub use query::QueryResult;
pub use registry::{KindDescriptor, KindRegistry};
pub use schema::{AttributeSpec, AttributeType, Branch, Kind};
pub use store::{Lookup, Store, StoreOptions};
