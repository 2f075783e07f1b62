use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::introspect::{
    Binding, MemberDescriptor, MemberEntry, MemberKind, Param, TypeInfo, TypeRef, Visibility,
};

/// JSON description of a type's members, for checking tokens without the
/// type itself being linked in. Members built from a manifest carry no
/// access functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Box<TypeManifest>>,
    #[serde(default)]
    pub members: Vec<MemberManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberManifest {
    pub kind: MemberKind,
    pub name: String,
    #[serde(rename = "type", default = "void")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamManifest>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub binding: Binding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

const fn void() -> TypeRef {
    TypeRef::Void
}

impl TypeManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn into_type_info(self) -> Result<TypeInfo> {
        let declared = self
            .members
            .into_iter()
            .map(MemberManifest::into_entry)
            .collect::<Result<Vec<_>>>()?;
        let inherited = match self.base {
            Some(base) => base.into_type_info()?.entries().to_vec(),
            None => Vec::new(),
        };
        Ok(TypeInfo::from_entries(self.name, declared, inherited))
    }
}

impl MemberManifest {
    fn into_entry(self) -> Result<MemberEntry> {
        if self.kind != MemberKind::Callable && !self.params.is_empty() {
            return Err(Error::InvalidManifest(format!(
                "{} '{}' cannot declare parameters",
                self.kind, self.name
            )));
        }

        let descriptor = match self.kind {
            MemberKind::Data => MemberDescriptor::Data {
                name: self.name,
                ty: self.ty,
            },
            MemberKind::Accessor => MemberDescriptor::Accessor {
                name: self.name,
                ty: self.ty,
            },
            MemberKind::Callable => MemberDescriptor::Callable {
                name: self.name,
                return_type: self.ty,
                params: self
                    .params
                    .into_iter()
                    .map(|p| Param::new(p.ty, p.name))
                    .collect(),
            },
        };
        descriptor
            .validate()
            .map_err(|e| Error::InvalidManifest(e.to_string()))?;
        Ok(MemberEntry::detached(descriptor, self.visibility, self.binding))
    }
}
