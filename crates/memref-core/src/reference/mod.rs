mod diagnostics;
mod persist;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use persist::PersistedReference;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::codec;
use crate::error::{Error, Result};
use crate::introspect::{MemberAccess, MemberDescriptor, MemberEntry, Reflect, ScopeFlags};
use crate::value::{FromValue, Value};

pub type Target = Rc<RefCell<dyn Reflect>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceState {
    Unresolved,
    Resolved,
}

/// A persisted pointer to one member of a target object.
///
/// The token is resolved by [`MemberReference::refresh`], which the load path
/// calls once after restoring state. Reads, writes and calls never fail
/// outward: failures go to the [`Diagnostics`] sink and surface as `None`.
pub struct MemberReference {
    target: Option<Weak<RefCell<dyn Reflect>>>,
    scope_flags: ScopeFlags,
    token: String,
    cached: Option<MemberEntry>,
    diagnostics: Rc<dyn Diagnostics>,
}

impl Default for MemberReference {
    fn default() -> Self {
        Self {
            target: None,
            scope_flags: ScopeFlags::default(),
            token: String::new(),
            cached: None,
            diagnostics: Rc::new(TracingDiagnostics),
        }
    }
}

impl fmt::Debug for MemberReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberReference")
            .field("has_target", &self.target().is_some())
            .field("scope_flags", &self.scope_flags)
            .field("token", &self.token)
            .field("cached", &self.cached.as_ref().map(|e| &e.descriptor))
            .finish_non_exhaustive()
    }
}

impl MemberReference {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target<R: Reflect>(mut self, target: &Rc<RefCell<R>>) -> Self {
        let target: Target = target.clone();
        self.set_target(Some(&target));
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    #[must_use]
    pub fn with_scope_flags(mut self, flags: ScopeFlags) -> Self {
        self.scope_flags = flags;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Rc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Rebuilds a reference from saved state and resolves it once.
    pub fn restore(persisted: &PersistedReference, target: Option<&Target>) -> Self {
        let mut reference = Self {
            scope_flags: persisted.scope(),
            token: persisted.token.clone(),
            ..Self::default()
        };
        reference.set_target(target);
        reference.refresh();
        reference
    }

    pub fn persist(&self, target_id: Option<String>) -> PersistedReference {
        PersistedReference {
            target: target_id,
            token: self.token.clone(),
            scope_flags: self.scope_flags.bits(),
        }
    }

    /// The reference does not keep the target alive.
    pub fn set_target(&mut self, target: Option<&Target>) {
        self.target = target.map(Rc::downgrade);
    }

    pub fn target(&self) -> Option<Target> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    pub const fn scope_flags(&self) -> ScopeFlags {
        self.scope_flags
    }

    pub fn set_scope_flags(&mut self, flags: ScopeFlags) {
        self.scope_flags = flags;
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Stores the picker's choice. Takes effect on the next `refresh`.
    pub fn select(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    pub fn clear(&mut self) {
        self.token.clear();
        self.cached = None;
    }

    pub fn refresh(&mut self) {
        self.cached = None;
        if self.token.is_empty() {
            return;
        }
        let Some(target) = self.target() else {
            debug!(token = %self.token, "member reference has no target");
            return;
        };
        let Ok(object) = target.try_borrow() else {
            debug!(
                token = %self.token,
                "member reference target is borrowed, leaving it unresolved"
            );
            return;
        };

        match codec::decode(&self.token, object.type_info(), self.scope_flags) {
            Ok(entry) => {
                debug!(
                    token = %self.token,
                    type_name = object.type_info().name(),
                    "resolved member reference"
                );
                self.cached = Some(entry.clone());
            }
            Err(e) => debug!(error = %e, "member reference did not resolve"),
        }
    }

    pub fn can_operate(&self) -> bool {
        self.cached.is_some() && self.target().is_some()
    }

    pub fn state(&self) -> ReferenceState {
        if self.cached.is_some() {
            ReferenceState::Resolved
        } else {
            ReferenceState::Unresolved
        }
    }

    pub fn descriptor(&self) -> Option<&MemberDescriptor> {
        self.cached.as_ref().map(|entry| &entry.descriptor)
    }

    /// Reads a data member or accessor, or invokes a callable with `args`.
    /// A callable that returns nothing yields `None`, as does a failure.
    pub fn get(&self, args: &[Value]) -> Option<Value> {
        if !self.can_operate() {
            return None;
        }
        self.try_get(args)
            .map_err(|e| self.diagnostics.report(&e))
            .ok()
            .filter(|value| !value.is_unit())
    }

    pub fn get_as<V: FromValue>(&self, args: &[Value]) -> Option<V> {
        let value = self.get(args)?;
        V::from_value(value).map_err(|e| self.diagnostics.report(&e)).ok()
    }

    /// Writes `args[0]` into a data member or accessor and returns `None`.
    /// Callables are invoked exactly as by [`MemberReference::get`].
    pub fn set(&self, args: &[Value]) -> Option<Value> {
        if !self.can_operate() {
            return None;
        }
        self.try_set(args)
            .map_err(|e| self.diagnostics.report(&e))
            .ok()
            .flatten()
            .filter(|value| !value.is_unit())
    }

    pub fn try_get(&self, args: &[Value]) -> Result<Value> {
        let entry = self.cached.as_ref().ok_or(Error::NotResolved)?;
        let name = entry.descriptor.name();
        let access = entry
            .access()
            .ok_or_else(|| Error::NotBound(name.to_string()))?;
        let target = self.target().ok_or(Error::TargetMissing)?;

        match access {
            MemberAccess::Data { get, .. } | MemberAccess::Accessor { get, .. } => {
                let object = target.try_borrow().map_err(|_| Error::TargetBusy)?;
                guarded(name, || get(object.as_any()))
            }
            MemberAccess::Callable { call } => {
                let mut object = target.try_borrow_mut().map_err(|_| Error::TargetBusy)?;
                guarded(name, || call(object.as_any_mut(), args))
            }
        }
    }

    pub fn try_set(&self, args: &[Value]) -> Result<Option<Value>> {
        let entry = self.cached.as_ref().ok_or(Error::NotResolved)?;
        let name = entry.descriptor.name();
        let access = entry
            .access()
            .ok_or_else(|| Error::NotBound(name.to_string()))?;

        let set = match access {
            MemberAccess::Callable { .. } => return self.try_get(args).map(Some),
            MemberAccess::Data { set, .. } => set,
            MemberAccess::Accessor { set: Some(set), .. } => set,
            MemberAccess::Accessor { set: None, .. } => {
                return Err(Error::ReadOnly(name.to_string()));
            }
        };

        let value = args
            .first()
            .cloned()
            .ok_or_else(|| Error::MissingArgument(name.to_string()))?;
        let target = self.target().ok_or(Error::TargetMissing)?;
        let mut object = target.try_borrow_mut().map_err(|_| Error::TargetBusy)?;
        guarded(name, || set(object.as_any_mut(), value))?;
        Ok(None)
    }
}

/// Runs a member body, turning a panic into an error.
fn guarded<T>(name: &str, body: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        Err(Error::Panicked {
            name: name.to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
