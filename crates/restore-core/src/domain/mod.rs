//! Domain model (records, queries, backends, errors).

pub mod backend;
pub mod errors;
pub mod object;
pub mod query;
pub mod release;
pub mod selector;

pub use self::backend::StorageBackendKind;
pub use self::errors::{DecodeError, RestoreError};
pub use self::object::{ComponentInstance, ContainerLaunch, StoredObject};
pub use self::query::ListQuery;
pub use self::release::ReleaseRecord;
pub use self::selector::{LabelSelector, Requirement, SelectorError};
