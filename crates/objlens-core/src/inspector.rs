//! # Dispatch Facade
//!
//! [`Inspector`] is the single entry point the host calls per value handle.
//! It owns the bridge, the session state and the configuration, and wires
//! the pipeline together:
//!
//! ```text
//! render ─► resolve type descriptor ─► classify shape ─► Provider ─► short/full string
//! ```
//!
//! ## Example
//!
//! ```rust
//! use objlens_core::bridge::SnapshotBridge;
//! use objlens_core::types::{ObjectRef, RenderMode};
//! use objlens_core::{Inspector, InspectorConfig};
//!
//! let inspector = Inspector::new(SnapshotBridge::default(), InspectorConfig::default());
//! let handle = ObjectRef::new("obj", "ObjHeader *", 0u64);
//! assert_eq!(inspector.render(&handle, RenderMode::Full).unwrap(), "null");
//! ```

use std::cell::Cell;

use tracing::{debug, trace, warn};

use crate::bridge::InspectionBridge;
use crate::cache::CacheDomain;
use crate::config::InspectorConfig;
use crate::error::{InspectError, InspectResult};
use crate::providers::{
    ArrayProvider, NullProvider, Provider, RecordProvider, StringProvider, SyntheticProvider, UninitializedProvider,
};
use crate::session::SessionState;
use crate::shape::ObjectShape;
use crate::types::{Address, ObjectRef, RenderMode, ValueHandle, NULL};

/// Rendering of a child beyond the depth limit.
pub(crate) const ELIDED: &str = "...";

/// Introspection engine bound to one host bridge and one debug session
///
/// Not `Sync`: renders are synchronous against a single stopped target.
#[derive(Debug)]
pub struct Inspector<B>
{
    bridge: B,
    session: SessionState,
    config: InspectorConfig,
    depth: Cell<usize>,
}

impl<B: InspectionBridge> Inspector<B>
{
    /// Create an inspector with a fresh session.
    pub fn new(bridge: B, config: InspectorConfig) -> Self
    {
        let session = SessionState::new(config.sighting_capacity);
        Self::with_session(bridge, config, session)
    }

    /// Create an inspector around an existing session state.
    pub fn with_session(bridge: B, config: InspectorConfig, session: SessionState) -> Self
    {
        Self {
            bridge,
            session,
            config,
            depth: Cell::new(0),
        }
    }

    pub fn bridge(&self) -> &B
    {
        &self.bridge
    }

    pub fn session(&self) -> &SessionState
    {
        &self.session
    }

    pub fn config(&self) -> &InspectorConfig
    {
        &self.config
    }

    /// Forget all cached resolutions and sightings.
    pub fn reset(&self)
    {
        self.session.reset();
    }

    /// Render `handle` as a string
    ///
    /// - Plain native values render as themselves (`null` if absent)
    /// - The null address renders as `null`
    /// - An object whose type descriptor does not resolve renders as the
    ///   handle's native value
    /// - Anything else is classified and rendered by its provider
    ///
    /// ## Errors
    ///
    /// Bridge failures during resolution or classification, and `Protocol`
    /// when the classification helper's answer cannot be parsed.
    pub fn render(&self, handle: &ObjectRef, mode: RenderMode) -> InspectResult<String>
    {
        if !self.config.is_object_type(&handle.type_name) {
            trace!(name = %handle.name, type_name = %handle.type_name, "not a runtime object");
            return Ok(handle.native_value());
        }
        if handle.address.is_null() {
            return Ok(NULL.to_string());
        }

        let Some(descriptor) = self.resolve_type_descriptor(handle)? else {
            debug!(address = %handle.address, "type descriptor did not resolve, using native value");
            return Ok(handle.native_value());
        };

        let shape = self.classify(handle, descriptor)?;
        let provider = self.provider_for_shape(handle, shape)?;
        match mode {
            RenderMode::Short => provider.to_short_string(),
            RenderMode::Full => provider.to_full_string(),
        }
    }

    /// Host-facing summary: never fails
    ///
    /// Falls back to the handle's native value when rendering fails, so the
    /// host always has something to show.
    pub fn summary(&self, handle: &ObjectRef) -> String
    {
        self.summary_with(handle, RenderMode::Short)
    }

    /// [`Inspector::summary`] with an explicit mode.
    pub fn summary_with(&self, handle: &ObjectRef, mode: RenderMode) -> String
    {
        match self.render(handle, mode) {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(address = %handle.address, "render failed, falling back to native value: {err}");
                handle.native_value()
            }
        }
    }

    /// Select the synthetic children provider for an object handle
    ///
    /// ## Errors
    ///
    /// `InvalidArgument` if `handle` is not a runtime object, otherwise as
    /// [`Inspector::render`].
    pub fn provider(&self, handle: &ObjectRef) -> InspectResult<Provider<'_, B>>
    {
        if !self.config.is_object_type(&handle.type_name) {
            return Err(InspectError::InvalidArgument(format!(
                "{} is a `{}`, not a runtime object",
                handle.name, handle.type_name
            )));
        }
        if handle.address.is_null() {
            return self.provider_for_shape(handle, ObjectShape::Null);
        }
        match self.resolve_type_descriptor(handle)? {
            Some(descriptor) => {
                let shape = self.classify(handle, descriptor)?;
                self.provider_for_shape(handle, shape)
            }
            None => self.provider_for_shape(handle, ObjectShape::Uninitialized),
        }
    }

    fn provider_for_shape(&self, handle: &ObjectRef, shape: ObjectShape) -> InspectResult<Provider<'_, B>>
    {
        debug!(address = %handle.address, shape = shape.kind(), "selecting provider");
        let provider = match shape {
            ObjectShape::Null => Provider::Null(NullProvider),
            ObjectShape::Uninitialized => Provider::Uninitialized(UninitializedProvider),
            ObjectShape::String { buffer, length } => {
                Provider::String(StringProvider::new(self, handle, buffer, length)?)
            }
            ObjectShape::Array { child_count } => Provider::Array(ArrayProvider::new(self, handle, child_count)),
            ObjectShape::Record(layout) => Provider::Record(RecordProvider::new(self, handle, layout)),
        };
        Ok(provider)
    }

    /// Render one materialized child for a full rendering
    ///
    /// References go back through [`Inspector::render`], so nested objects are
    /// rendered in full, null references as `null` and unresolvable pointers
    /// as their raw value. Primitives render as the debugger formats them.
    pub(crate) fn render_child(&self, child: &ValueHandle) -> InspectResult<String>
    {
        if !child.code.is_reference() {
            return Ok(child.result.display_value());
        }

        let depth = self.depth.get();
        if self.config.max_depth.is_some_and(|max| depth >= max) {
            trace!(depth, name = %child.name, "depth limit reached");
            return Ok(ELIDED.to_string());
        }

        self.depth.set(depth + 1);
        let rendered = self.render(&child.to_object_ref(&self.config.object_type_name), RenderMode::Full);
        self.depth.set(depth);
        rendered
    }

    /// Per-level breadth limit from the host settings.
    pub(crate) fn max_children_count(&self) -> InspectResult<usize>
    {
        let limit = self.bridge.int_setting(&self.config.max_children_setting)?;
        Ok(usize::try_from(limit).unwrap_or(0))
    }

    /// Load address of a symbol in the selected frame's module
    ///
    /// ## Errors
    ///
    /// `Evaluation` if no such symbol is loaded.
    pub fn symbol_loaded_address(&self, name: &str) -> InspectResult<Address>
    {
        if let Some(address) = self.session.cache().get(CacheDomain::LoadedAddress, name) {
            trace!(name, "symbol address from cache");
            return Ok(address);
        }

        let address = self
            .bridge
            .module_symbols()?
            .into_iter()
            .find(|symbol| symbol.name == name)
            .map(|symbol| symbol.load_address)
            .ok_or_else(|| InspectError::evaluation(name, "symbol not found in selected module"))?;

        debug!(name, %address, "resolved symbol address");
        self.session.cache().put(CacheDomain::LoadedAddress, name, address);
        Ok(address)
    }

    /// Evaluate a helper returning `char *` and read the string it points at
    ///
    /// The returned pointer is cached per expression in the resolved-address
    /// domain.
    pub(crate) fn read_helper_string(&self, expr: &str) -> InspectResult<String>
    {
        let cached = self.session.cache().get(CacheDomain::ResolvedAddress, expr);
        let address = match cached {
            Some(address) => {
                trace!(expr, "helper string address from cache");
                address
            }
            None => {
                let result = self.bridge.evaluate(expr)?;
                if !result.is_valid {
                    return Err(InspectError::evaluation(expr, "helper returned an invalid value"));
                }
                let address = result.as_address();
                self.session.cache().put(CacheDomain::ResolvedAddress, expr, address);
                address
            }
        };

        trace!(expr, %address, "reading helper string");
        self.bridge.read_c_string(address, self.config.string_read_limit)
    }

    /// Record a `(address, child count)` sighting, clearing resolved helper
    /// strings on a repeat.
    pub(crate) fn note_sighting(&self, address: Address, child_count: usize)
    {
        let repeated = self.session.sightings().observe(address, child_count);
        if repeated {
            debug!(%address, child_count, "repeat sighting, clearing resolved-address cache");
            self.session.cache().clear_resolved();
        }
    }
}
