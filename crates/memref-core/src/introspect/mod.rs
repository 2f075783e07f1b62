mod registry;
mod types;

pub use registry::{
    Getter, Invoker, MemberAccess, MemberEntry, Reflect, Setter, TypeBuilder, TypeInfo, Typed,
};
pub use types::{Binding, MemberDescriptor, MemberKind, Param, ScopeFlags, TypeRef, Visibility};

/// Members of `info` reachable under `flags`, in registry order.
pub fn members(info: &TypeInfo, flags: ScopeFlags) -> Vec<&MemberEntry> {
    info.entries()
        .iter()
        .filter(|entry| is_reachable(entry, flags))
        .collect()
}

pub fn descriptors(info: &TypeInfo, flags: ScopeFlags) -> Vec<MemberDescriptor> {
    members(info, flags)
        .into_iter()
        .map(|entry| entry.descriptor.clone())
        .collect()
}

fn is_reachable(entry: &MemberEntry, flags: ScopeFlags) -> bool {
    let visible = match entry.visibility {
        Visibility::Public => flags.contains(ScopeFlags::PUBLIC),
        Visibility::NonPublic => flags.contains(ScopeFlags::NON_PUBLIC),
    };
    let bound = match entry.binding {
        Binding::Instance => flags.contains(ScopeFlags::INSTANCE),
        Binding::Static => flags.contains(ScopeFlags::STATIC),
    };
    visible && bound && !(entry.inherited && flags.contains(ScopeFlags::DECLARED_ONLY))
}
