use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::{FromValue, IntoValue, Value, ValueType};

use super::types::{Binding, MemberDescriptor, Param, TypeRef, Visibility};

pub type Getter = Arc<dyn Fn(&dyn Any) -> Result<Value> + Send + Sync>;
pub type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> Result<()> + Send + Sync>;
pub type Invoker = Arc<dyn Fn(&mut dyn Any, &[Value]) -> Result<Value> + Send + Sync>;

/// How a resolved member reads, writes or calls into its owner.
#[derive(Clone)]
pub enum MemberAccess {
    Data { get: Getter, set: Setter },
    Accessor { get: Getter, set: Option<Setter> },
    Callable { call: Invoker },
}

impl fmt::Debug for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data { .. } => write!(f, "Data"),
            Self::Accessor { set, .. } => f
                .debug_struct("Accessor")
                .field("writable", &set.is_some())
                .finish(),
            Self::Callable { .. } => write!(f, "Callable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemberEntry {
    pub descriptor: MemberDescriptor,
    pub visibility: Visibility,
    pub binding: Binding,
    pub inherited: bool,
    pub(crate) access: Option<MemberAccess>,
}

impl MemberEntry {
    /// Entry without access functions, as described by a manifest.
    pub fn detached(
        descriptor: MemberDescriptor,
        visibility: Visibility,
        binding: Binding,
    ) -> Self {
        Self {
            descriptor,
            visibility,
            binding,
            inherited: false,
            access: None,
        }
    }

    pub const fn access(&self) -> Option<&MemberAccess> {
        self.access.as_ref()
    }
}

/// Member registry of one type. Declared members come first in
/// registration order, followed by inherited ones.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: String,
    members: Vec<MemberEntry>,
}

impl TypeInfo {
    pub fn builder<T: Any>(name: impl Into<String>) -> TypeBuilder<T> {
        TypeBuilder {
            name: name.into(),
            declared: Vec::new(),
            inherited: Vec::new(),
            visibility: Visibility::Public,
            binding: Binding::Instance,
            _owner: PhantomData,
        }
    }

    pub(crate) fn from_entries(
        name: String,
        declared: Vec<MemberEntry>,
        inherited: Vec<MemberEntry>,
    ) -> Self {
        let mut members = declared;
        members.extend(inherited.into_iter().map(|mut entry| {
            entry.inherited = true;
            entry
        }));
        Self { name, members }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every registered member regardless of scope.
    pub fn entries(&self) -> &[MemberEntry] {
        &self.members
    }
}

/// Objects whose members can be introspected and dispatched at runtime.
pub trait Reflect: Any {
    fn type_info(&self) -> &TypeInfo;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Types whose registry is reachable without an instance.
pub trait Typed: Reflect {
    fn static_type_info() -> &'static TypeInfo
    where
        Self: Sized;
}

/// Implements `Reflect` and `Typed` from a registry constructor that runs once.
#[macro_export]
macro_rules! impl_reflect {
    ($ty:ty, $build:expr) => {
        impl $crate::introspect::Typed for $ty {
            fn static_type_info() -> &'static $crate::introspect::TypeInfo {
                static INFO: ::std::sync::OnceLock<$crate::introspect::TypeInfo> =
                    ::std::sync::OnceLock::new();
                INFO.get_or_init($build)
            }
        }

        impl $crate::introspect::Reflect for $ty {
            fn type_info(&self) -> &$crate::introspect::TypeInfo {
                <Self as $crate::introspect::Typed>::static_type_info()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

/// Registers the members of `T`.
///
/// # Panics
///
/// Registering a member panics when its name, type or a parameter would
/// not survive token encoding (see [`MemberDescriptor::validate`]).
/// Registries are built once per type, so the panic surfaces on first use.
pub struct TypeBuilder<T> {
    name: String,
    declared: Vec<MemberEntry>,
    inherited: Vec<MemberEntry>,
    visibility: Visibility,
    binding: Binding,
    _owner: PhantomData<fn() -> T>,
}

fn owner<'a, T: Any>(object: &'a dyn Any, member: &str) -> Result<&'a T> {
    object
        .downcast_ref::<T>()
        .ok_or_else(|| Error::invocation(member, "target has an unexpected type"))
}

fn owner_mut<'a, T: Any>(object: &'a mut dyn Any, member: &str) -> Result<&'a mut T> {
    object
        .downcast_mut::<T>()
        .ok_or_else(|| Error::invocation(member, "target has an unexpected type"))
}

fn check_arity(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::ArgumentCount {
            name: name.to_string(),
            expected,
            found: args.len(),
        })
    }
}

impl<T: Any> TypeBuilder<T> {
    /// Visibility and binding applied to members registered after this call.
    #[must_use]
    pub fn scope(mut self, visibility: Visibility, binding: Binding) -> Self {
        self.visibility = visibility;
        self.binding = binding;
        self
    }

    fn push(&mut self, descriptor: MemberDescriptor, access: MemberAccess) {
        if let Err(e) = descriptor.validate() {
            panic!("cannot register a member on {}: {e}", self.name);
        }
        self.declared.push(MemberEntry {
            descriptor,
            visibility: self.visibility,
            binding: self.binding,
            inherited: false,
            access: Some(access),
        });
    }

    /// Data member with a raw `Value` getter and setter.
    #[must_use]
    pub fn field_raw<G, S>(mut self, name: &str, ty: TypeRef, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Result<Value> + Send + Sync + 'static,
        S: Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
    {
        let get_name = name.to_string();
        let set_name = name.to_string();
        let access = MemberAccess::Data {
            get: Arc::new(move |object: &dyn Any| get(owner::<T>(object, &get_name)?)),
            set: Arc::new(move |object: &mut dyn Any, value: Value| {
                set(owner_mut::<T>(object, &set_name)?, value)
            }),
        };
        self.push(
            MemberDescriptor::Data {
                name: name.to_string(),
                ty,
            },
            access,
        );
        self
    }

    #[must_use]
    pub fn field<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: ValueType + FromValue + IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.field_raw(
            name,
            V::type_ref(),
            move |owner| Ok(get(owner).into_value()),
            move |owner, value| {
                set(owner, V::from_value(value)?);
                Ok(())
            },
        )
    }

    /// Accessor with a raw `Value` getter and an optional setter.
    #[must_use]
    pub fn property_raw<G>(
        mut self,
        name: &str,
        ty: TypeRef,
        get: G,
        set: Option<Box<dyn Fn(&mut T, Value) -> Result<()> + Send + Sync>>,
    ) -> Self
    where
        G: Fn(&T) -> Result<Value> + Send + Sync + 'static,
    {
        let get_name = name.to_string();
        let set_name = name.to_string();
        let set: Option<Setter> = set.map(|set| {
            let setter: Setter = Arc::new(move |object: &mut dyn Any, value: Value| {
                set(owner_mut::<T>(object, &set_name)?, value)
            });
            setter
        });
        let access = MemberAccess::Accessor {
            get: Arc::new(move |object: &dyn Any| get(owner::<T>(object, &get_name)?)),
            set,
        };
        self.push(
            MemberDescriptor::Accessor {
                name: name.to_string(),
                ty,
            },
            access,
        );
        self
    }

    /// Read-only accessor.
    #[must_use]
    pub fn property<V, G>(self, name: &str, get: G) -> Self
    where
        V: ValueType + IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.property_raw(name, V::type_ref(), move |owner| Ok(get(owner).into_value()), None)
    }

    #[must_use]
    pub fn property_mut<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: ValueType + FromValue + IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.property_raw(
            name,
            V::type_ref(),
            move |owner| Ok(get(owner).into_value()),
            Some(Box::new(move |owner: &mut T, value: Value| {
                set(owner, V::from_value(value)?);
                Ok(())
            })),
        )
    }

    /// Callable with an explicit signature. The body receives the raw arguments
    /// after their count has been checked against `params`.
    #[must_use]
    pub fn method_raw<F>(
        mut self,
        name: &str,
        return_type: TypeRef,
        params: Vec<Param>,
        call: F,
    ) -> Self
    where
        F: Fn(&mut T, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let arity = params.len();
        let call_name = name.to_string();
        let access = MemberAccess::Callable {
            call: Arc::new(move |object: &mut dyn Any, args: &[Value]| {
                check_arity(&call_name, args, arity)?;
                call(owner_mut::<T>(object, &call_name)?, args)
            }),
        };
        self.push(
            MemberDescriptor::Callable {
                name: name.to_string(),
                return_type,
                params,
            },
            access,
        );
        self
    }

    #[must_use]
    pub fn method0<R, F>(self, name: &str, call: F) -> Self
    where
        R: ValueType + IntoValue,
        F: Fn(&mut T) -> R + Send + Sync + 'static,
    {
        self.method_raw(name, R::type_ref(), Vec::new(), move |owner, _| {
            Ok(call(owner).into_value())
        })
    }

    #[must_use]
    pub fn method1<A, R, F>(self, name: &str, param: &str, call: F) -> Self
    where
        A: ValueType + FromValue,
        R: ValueType + IntoValue,
        F: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        let params = vec![Param::new(A::type_ref(), param)];
        self.method_raw(name, R::type_ref(), params, move |owner, args| {
            let a = A::from_value(args[0].clone())?;
            Ok(call(owner, a).into_value())
        })
    }

    #[must_use]
    pub fn method2<A, B, R, F>(self, name: &str, params: [&str; 2], call: F) -> Self
    where
        A: ValueType + FromValue,
        B: ValueType + FromValue,
        R: ValueType + IntoValue,
        F: Fn(&mut T, A, B) -> R + Send + Sync + 'static,
    {
        let params = vec![
            Param::new(A::type_ref(), params[0]),
            Param::new(B::type_ref(), params[1]),
        ];
        self.method_raw(name, R::type_ref(), params, move |owner, args| {
            let a = A::from_value(args[0].clone())?;
            let b = B::from_value(args[1].clone())?;
            Ok(call(owner, a, b).into_value())
        })
    }

    /// Appends the members of `base` as inherited, reached through the
    /// projection from `T` to the embedded base value.
    #[must_use]
    pub fn inherit<B: Any>(
        mut self,
        base: &TypeInfo,
        project: fn(&T) -> &B,
        project_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        for entry in base.entries() {
            let access = entry.access.clone().map(|access| {
                project_access::<T, B>(access, entry.descriptor.name(), project, project_mut)
            });
            self.inherited.push(MemberEntry {
                access,
                ..entry.clone()
            });
        }
        self
    }

    pub fn build(self) -> TypeInfo {
        TypeInfo::from_entries(self.name, self.declared, self.inherited)
    }
}

fn project_getter<T: Any, B: Any>(get: Getter, name: String, project: fn(&T) -> &B) -> Getter {
    Arc::new(move |object: &dyn Any| {
        let base: &dyn Any = project(owner::<T>(object, &name)?);
        get(base)
    })
}

fn project_setter<T: Any, B: Any>(
    set: Setter,
    name: String,
    project_mut: fn(&mut T) -> &mut B,
) -> Setter {
    Arc::new(move |object: &mut dyn Any, value: Value| {
        let base: &mut dyn Any = project_mut(owner_mut::<T>(object, &name)?);
        set(base, value)
    })
}

fn project_access<T: Any, B: Any>(
    access: MemberAccess,
    name: &str,
    project: fn(&T) -> &B,
    project_mut: fn(&mut T) -> &mut B,
) -> MemberAccess {
    let name = name.to_string();
    match access {
        MemberAccess::Data { get, set } => MemberAccess::Data {
            get: project_getter(get, name.clone(), project),
            set: project_setter(set, name, project_mut),
        },
        MemberAccess::Accessor { get, set } => MemberAccess::Accessor {
            get: project_getter(get, name.clone(), project),
            set: set.map(|set| project_setter(set, name, project_mut)),
        },
        MemberAccess::Callable { call } => MemberAccess::Callable {
            call: Arc::new(move |object: &mut dyn Any, args: &[Value]| {
                let base: &mut dyn Any = project_mut(owner_mut::<T>(object, &name)?);
                call(base, args)
            }),
        },
    }
}
