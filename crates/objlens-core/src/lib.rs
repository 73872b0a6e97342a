//! # objlens-core
//!
//! Introspection and rendering of managed-runtime objects through an
//! attached debugger.
//!
//! Given the address of an object header in a stopped process, this crate:
//! - Resolves the object's runtime type descriptor (a self-reference test on
//!   the masked header word)
//! - Classifies it as null, uninitialized, string, array or record using a
//!   helper exported by the runtime
//! - Reads its fields through a fixed primitive conversion table
//! - Renders it as a short summary or a full recursive string, bounded in
//!   breadth by the host's `target.max-children-count`
//!
//! ## Host integration
//!
//! The host debugger is only reached through the [`InspectionBridge`] trait:
//! expression evaluation, C-string reads, module symbols and integer
//! settings. Nothing is ever written to the target.
//!
//! ## Example
//!
//! ```rust
//! use objlens_core::bridge::SnapshotBridge;
//! use objlens_core::types::{EvalValue, ObjectRef, RenderMode};
//! use objlens_core::{Inspector, InspectorConfig};
//!
//! let bridge = SnapshotBridge::default();
//! let inspector = Inspector::new(bridge, InspectorConfig::default());
//!
//! // Plain native values render as themselves
//! let native = ObjectRef::native("count", "int", Some("3".to_string()));
//! assert_eq!(inspector.render(&native, RenderMode::Full).unwrap(), "3");
//! ```

pub mod bridge;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod expr;
pub mod field;
pub mod inspector;
pub mod prelude;
pub mod providers;
pub mod resolver;
pub mod session;
pub mod shape;
pub mod types;

pub use bridge::InspectionBridge;
pub use config::InspectorConfig;
pub use error::{InspectError, InspectResult};
pub use inspector::Inspector;
pub use types::{Address, ObjectRef, RenderMode};
