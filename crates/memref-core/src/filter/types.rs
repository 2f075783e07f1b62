use crate::introspect::MemberDescriptor;

/// One parsed filter option. Each variant carries its comma-separated
/// arguments with empty entries dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOption {
    ReturnType(Vec<String>),
    NameContains(Vec<String>),
    NameEquals(Vec<String>),
    ParamCount(Vec<String>),
    ParamNameContains(Vec<String>),
    ParamNameEquals(Vec<String>),
    ParamType(Vec<String>),
    Unrecognized(String),
}

impl FilterOption {
    pub fn args(&self) -> &[String] {
        match self {
            Self::ReturnType(args)
            | Self::NameContains(args)
            | Self::NameEquals(args)
            | Self::ParamCount(args)
            | Self::ParamNameContains(args)
            | Self::ParamNameEquals(args)
            | Self::ParamType(args) => args,
            Self::Unrecognized(_) => &[],
        }
    }

    /// True for the `mp*` options, which only constrain callables.
    pub const fn targets_params(&self) -> bool {
        matches!(
            self,
            Self::ParamCount(_)
                | Self::ParamNameContains(_)
                | Self::ParamNameEquals(_)
                | Self::ParamType(_)
        )
    }

    /// Expected parameter count; `None` means unconstrained.
    pub fn param_count(&self) -> Option<usize> {
        let Self::ParamCount(args) = self else {
            return None;
        };
        let count = args.last()?.parse::<i64>().ok()?;
        if count == -1 {
            return None;
        }
        // Other negative counts never match.
        Some(usize::try_from(count).unwrap_or(usize::MAX))
    }

    pub fn matches(&self, member: &MemberDescriptor) -> bool {
        let args = self.args();
        if args.is_empty() {
            return true;
        }
        if self.targets_params() && !member.is_callable() {
            return true;
        }

        let params = member.params();
        match self {
            Self::ReturnType(_) => args.iter().any(|a| member.value_type().matches_name(a)),
            Self::NameContains(_) => args.iter().any(|a| member.name().contains(a.as_str())),
            Self::NameEquals(_) => args.iter().any(|a| member.name() == a),
            Self::ParamCount(_) => match self.param_count() {
                Some(count) => count == params.len(),
                None => true,
            },
            Self::ParamNameContains(_) => params
                .iter()
                .any(|p| args.iter().any(|a| p.name.contains(a.as_str()))),
            Self::ParamNameEquals(_) => params
                .iter()
                .any(|p| args.iter().any(|a| &p.name == a)),
            Self::ParamType(_) => params
                .iter()
                .any(|p| args.iter().any(|a| p.ty.matches_name(a))),
            Self::Unrecognized(_) => true,
        }
    }
}
