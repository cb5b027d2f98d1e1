//! Tag-driven field injection.
//!
//! Injection walks the fields of a shared record, resolves every field that is
//! tagged `#[inject]`, public and of an injectable kind, then recurses into the
//! resolved value before storing it. Untagged, private or scalar fields are
//! left untouched.

use std::sync::Arc;

use crate::container::Container;
use crate::errors::ContainerError;
use crate::reflect::{Record, Reflect, TypeKind, Value};

impl Container {
    /// Populate the injectable fields of `target`, recursively.
    ///
    /// `target` must be a reference (an `Arc`). A reference without record
    /// metadata has no fields and is accepted as is; contracts declared with
    /// `contract!(dyn Trait: Record)` expose the fields of the instance behind
    /// them. The first failing field aborts the walk; fields populated before
    /// it keep their values.
    pub fn inject(&self, target: impl Into<Value>) -> Result<(), ContainerError> {
        let target = target.into();
        self.inject_value(&target, 0)
    }

    /// Populate the injectable fields of a shared record
    pub fn inject_into<T: Record + Reflect>(&self, target: &Arc<T>) -> Result<(), ContainerError> {
        self.inject(Value::shared(Arc::clone(target)))
    }

    fn inject_value(&self, target: &Value, depth: usize) -> Result<(), ContainerError> {
        if target.kind() != TypeKind::Reference {
            return Err(ContainerError::InvalidInjectTargetType {
                kind: target.kind(),
            });
        }

        if let Some(limit) = self.config().max_injection_depth {
            if depth > limit {
                tracing::warn!(
                    target_type = target.type_name(),
                    limit,
                    "injection depth exceeded"
                );
                return Err(ContainerError::InjectionDepthExceeded { limit });
            }
        }

        let Some(record) = target.as_record() else {
            tracing::trace!(
                target_type = target.type_name(),
                depth,
                "no record metadata, nothing to inject"
            );
            return Ok(());
        };

        for field in record.fields() {
            if !field.is_injectable() {
                continue;
            }
            let (Some(declared), Some(slot)) = (field.declared_type(), field.target()) else {
                continue;
            };

            tracing::trace!(
                target_type = target.type_name(),
                field = field.name(),
                abstraction = declared.name(),
                depth,
                "injecting field"
            );

            let resolved = self.resolve(declared)?;
            self.inject_value(&resolved, depth + 1)?;

            if !slot.assign(&resolved) {
                return Err(ContainerError::incompatible_field_value(
                    field.name(),
                    declared.name(),
                    resolved.type_name(),
                ));
            }
        }

        tracing::debug!(target_type = target.type_name(), depth, "injected");
        Ok(())
    }
}
