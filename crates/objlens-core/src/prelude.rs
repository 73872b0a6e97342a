//! Common module for library exports

pub use crate::bridge::{InspectionBridge, Snapshot, SnapshotBridge};
pub use crate::cache::{CacheDomain, CacheStats};
pub use crate::config::InspectorConfig;
pub use crate::error::{InspectError, InspectResult};
pub use crate::inspector::Inspector;
pub use crate::providers::{Provider, SyntheticProvider};
pub use crate::session::SessionState;
pub use crate::shape::ObjectShape;
pub use crate::types::{Address, EvalValue, FieldTypeCode, ObjectRef, RenderMode, Symbol, ValueHandle};
