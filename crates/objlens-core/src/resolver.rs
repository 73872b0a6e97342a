//! # Type Resolver
//!
//! Finds the runtime type descriptor of an object header.
//!
//! The first word of every object header points, once its two management tag
//! bits are masked off, at the object's type descriptor (or at a meta-object
//! whose first word does). A type descriptor's own first word points back at
//! itself, so the check is a fixed point test done in one evaluation:
//!
//! ```text
//! td = *(obj) & ~0x3
//! valid  <=>  *td == td
//! ```
//!
//! Objects whose header fails the test are treated as not yet initialized.

use tracing::{debug, trace};

use crate::bridge::InspectionBridge;
use crate::cache::CacheDomain;
use crate::error::InspectResult;
use crate::expr;
use crate::inspector::Inspector;
use crate::types::{Address, ObjectRef, TypeDescriptorId};

impl<B: InspectionBridge> Inspector<B>
{
    /// Resolve the type descriptor of `handle`
    ///
    /// Returns `None` for non-object handles, the null address, and headers
    /// whose self-reference test fails. The result is cached by the exact
    /// expression text, which embeds the address.
    ///
    /// ## Errors
    ///
    /// `Evaluation` if the host cannot evaluate the test.
    pub fn resolve_type_descriptor(&self, handle: &ObjectRef) -> InspectResult<Option<TypeDescriptorId>>
    {
        if !self.config().is_object_type(&handle.type_name) || handle.address.is_null() {
            return Ok(None);
        }

        let expr = expr::type_descriptor(handle.address);
        let cached = self.session().cache().get(CacheDomain::TypeDescriptor, &expr);
        let word = match cached {
            Some(word) => {
                trace!(address = %handle.address, "type descriptor from cache");
                word
            }
            None => {
                let result = self.bridge().evaluate(&expr)?;
                let word = if result.is_valid { result.as_address() } else { Address::ZERO };
                self.session().cache().put(CacheDomain::TypeDescriptor, expr, word);
                word
            }
        };

        if word.is_null() {
            debug!(address = %handle.address, "self-reference test failed");
            return Ok(None);
        }
        Ok(Some(TypeDescriptorId(word)))
    }
}
