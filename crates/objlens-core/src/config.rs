//! # Inspector Configuration
//!
//! Names of the in-process helpers, limits and the few tunables of a render.
//!
//! Defaults match the Kotlin/Native runtime debug helpers. A handful of limits
//! can be overridden from the environment:
//!
//! - `OBJLENS_MAX_DEPTH`: maximum nesting of full renderings (`0` or `none` = unbounded)
//! - `OBJLENS_SIGHTING_CAPACITY`: size of the re-entrancy sighting log
//! - `OBJLENS_STRING_READ_LIMIT`: bytes read for helper-returned C-strings

use std::env;

use tracing::warn;

/// Object header pointer type that marks a handle as a runtime object.
pub const OBJECT_HEADER_TYPE: &str = "ObjHeader *";

/// Debugger setting holding the per-level breadth limit.
pub const MAX_CHILDREN_SETTING: &str = "target.max-children-count";

/// Names of the functions the runtime exports for debuggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperNames
{
    /// `(obj, stringTypeInfo) -> char*`: full classification in one call
    pub classify: String,
    /// `(obj, count) -> char*`: types and addresses of all elements
    pub fields_type_and_address: String,
    /// `(obj) -> char*`: runtime type name
    pub type_name: String,
}

impl Default for HelperNames
{
    fn default() -> Self
    {
        Self {
            classify: "Konan_DebugCompleteTypeInitFlow".to_string(),
            fields_type_and_address: "Konan_DebugGetFieldsTypeAndAddress".to_string(),
            type_name: "Konan_DebugGetTypeName".to_string(),
        }
    }
}

/// Configuration of an [`Inspector`](crate::Inspector)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig
{
    /// Declared type of runtime object handles
    pub object_type_name: String,
    pub helpers: HelperNames,
    /// Symbol of the string class type info, passed to the classifier
    pub string_class_symbol: String,
    /// Bytes read when fetching a helper-returned C-string
    pub string_read_limit: usize,
    /// Host setting queried for the breadth limit
    pub max_children_setting: String,
    /// Number of `(address, child count)` pairs remembered for re-entrancy detection
    pub sighting_capacity: usize,
    /// Maximum nesting of full renderings; `None` leaves depth unbounded
    ///
    /// Defaults to `Some(8)`, unlike the unbounded recursion of the LLDB
    /// formatter this mirrors, so cyclic object graphs terminate. Deep
    /// acyclic graphs are cut at the same depth; set `None` to lift it.
    pub max_depth: Option<usize>,
}

impl Default for InspectorConfig
{
    fn default() -> Self
    {
        Self {
            object_type_name: OBJECT_HEADER_TYPE.to_string(),
            helpers: HelperNames::default(),
            string_class_symbol: "kclass:kotlin.String".to_string(),
            string_read_limit: 0x1000,
            max_children_setting: MAX_CHILDREN_SETTING.to_string(),
            sighting_capacity: 4096,
            max_depth: Some(8),
        }
    }
}

impl InspectorConfig
{
    /// Defaults, overridden by `OBJLENS_*` environment variables.
    ///
    /// Unparsable values are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self
    {
        let mut config = Self::default();

        if let Ok(raw) = env::var("OBJLENS_MAX_DEPTH") {
            match raw.trim() {
                "0" | "none" | "unbounded" => config.max_depth = None,
                value => match value.parse::<usize>() {
                    Ok(depth) => config.max_depth = Some(depth),
                    Err(_) => warn!("Ignoring OBJLENS_MAX_DEPTH={raw}: not a number"),
                },
            }
        }
        if let Some(capacity) = parse_env("OBJLENS_SIGHTING_CAPACITY") {
            config.sighting_capacity = capacity;
        }
        if let Some(limit) = parse_env("OBJLENS_STRING_READ_LIMIT") {
            config.string_read_limit = limit;
        }

        config
    }

    /// Whether a handle of `type_name` is a runtime object reference.
    pub fn is_object_type(&self, type_name: &str) -> bool
    {
        type_name == self.object_type_name
    }
}

fn parse_env(name: &str) -> Option<usize>
{
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {name}={raw}: not a number");
            None
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_default_config()
    {
        let config = InspectorConfig::default();
        assert!(config.is_object_type("ObjHeader *"));
        assert!(!config.is_object_type("int"));
        assert_eq!(config.string_read_limit, 0x1000);
        assert_eq!(config.max_children_setting, "target.max-children-count");
        assert_eq!(config.helpers.classify, "Konan_DebugCompleteTypeInitFlow");
        assert_eq!(config.max_depth, Some(8));
    }
}
