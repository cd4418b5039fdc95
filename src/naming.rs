//! Identifier fragments for synthesized template resources.
//!
//! Logical resource names in a CloudFormation template must be alphanumeric.
//! Fragments are capitalized so they concatenate into compound names such as
//! `MyFuncLambdaPermissionCoolTopic`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix the packaging pipeline appends to a normalized function key to
/// name the function's own resource.
pub const FUNCTION_RESOURCE_SUFFIX: &str = "LambdaFunction";

/// Infix joining a function and a topic in a permission's logical name.
pub const PERMISSION_RESOURCE_INFIX: &str = "LambdaPermission";

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Za-z]").unwrap());

/// Uppercase the first character and leave the rest untouched.
///
/// Absent or empty input yields `None`, which callers treat as "no
/// contribution" rather than as an empty token.
pub fn normalize(name: Option<&str>) -> Option<String> {
    let name = name.filter(|n| !n.is_empty())?;
    let mut chars = name.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Like [`normalize`], then drop every non-alphanumeric character from the
/// remainder: `foo-topic` becomes `Footopic`.
pub fn normalize_topic_name(name: Option<&str>) -> Option<String> {
    let normalized = normalize(name)?;
    let mut chars = normalized.chars();
    let first = chars.next()?;
    let rest: String = chars.collect();
    Some(format!("{first}{}", NON_ALPHANUMERIC.replace_all(&rest, "")))
}

/// Logical name of the function resource emitted by the packaging pipeline.
pub fn function_logical_id(function_key: &str) -> String {
    format!(
        "{}{FUNCTION_RESOURCE_SUFFIX}",
        normalize(Some(function_key)).unwrap_or_default()
    )
}

/// Logical name of the permission letting `topic_name` invoke the function.
pub fn permission_logical_id(function_key: &str, topic_name: &str) -> String {
    format!(
        "{}{PERMISSION_RESOURCE_INFIX}{}",
        normalize(Some(function_key)).unwrap_or_default(),
        normalize_topic_name(Some(topic_name)).unwrap_or_default()
    )
}
