use tracing::warn;

use super::types::FilterOption;

const RETURN_TYPE: &str = "r:";
const NAME_CONTAINS: &str = "nc:";
const NAME_EQUALS: &str = "ne:";
const PARAM_COUNT: &str = "mpc:";
const PARAM_NAME_CONTAINS: &str = "mpnc:";
const PARAM_NAME_EQUALS: &str = "mpne:";
const PARAM_TYPE: &str = "mpt:";

const ARG_SEPARATOR: char = ',';

type Constructor = fn(Vec<String>) -> FilterOption;

const TAGS: &[(&str, Constructor)] = &[
    (RETURN_TYPE, FilterOption::ReturnType),
    (NAME_CONTAINS, FilterOption::NameContains),
    (NAME_EQUALS, FilterOption::NameEquals),
    (PARAM_COUNT, FilterOption::ParamCount),
    (PARAM_NAME_CONTAINS, FilterOption::ParamNameContains),
    (PARAM_NAME_EQUALS, FilterOption::ParamNameEquals),
    (PARAM_TYPE, FilterOption::ParamType),
];

/// Parses `<tag>:<arg1,arg2,...>` after stripping all whitespace.
/// Unknown tags parse to `FilterOption::Unrecognized`.
pub fn parse_option(input: &str) -> FilterOption {
    let option: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    let Some((tag, constructor)) = TAGS.iter().find(|(tag, _)| option.starts_with(tag)) else {
        warn!(option = %option, "ignoring unrecognized member filter option");
        return FilterOption::Unrecognized(option);
    };

    let args = parse_args(&option[tag.len()..]);
    let parsed = constructor(args);

    if let FilterOption::ParamCount(args) = &parsed {
        if let Some(last) = args.last() {
            if last.parse::<i64>().is_err() {
                warn!(
                    option = %option,
                    "parameter count is not a number, leaving it unconstrained"
                );
            }
        }
    }

    parsed
}

pub fn parse_options<I, S>(inputs: I) -> Vec<FilterOption>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|input| parse_option(input.as_ref()))
        .collect()
}

fn parse_args(input: &str) -> Vec<String> {
    input
        .split(ARG_SEPARATOR)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}
