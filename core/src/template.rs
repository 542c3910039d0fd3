//! URL template handling: `{placeholder}` extraction, path substitution and
//! query-string construction.

use crate::error::CallError;
use crate::params::Params;

/// Placeholder names in `template`, in order of appearance.
///
/// Returns `None` for an unbalanced brace or an empty `{}`.
pub fn placeholders(template: &str) -> Option<Vec<&str>> {
    let mut names = Vec::new();
    let mut rest = template;
    loop {
        let open = rest.find('{');
        let close = rest.find('}');
        match (open, close) {
            (None, None) => return Some(names),
            (Some(open), Some(close)) if open < close => {
                let name = &rest[open + 1..close];
                if name.is_empty() || name.contains('{') {
                    return None;
                }
                names.push(name);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }
}

/// Substitute every placeholder in `template` with its percent-encoded value.
///
/// Fails on the first placeholder that `params` does not supply.
pub fn render_path(operation: &str, template: &str, params: &Params) -> Result<String, CallError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
            break;
        };
        rendered.push_str(&rest[..open]);
        let name = &rest[open + 1..close];
        let value = params
            .get(name)
            .ok_or_else(|| CallError::MissingPathParameter {
                operation: operation.to_string(),
                placeholder: name.to_string(),
            })?;
        rendered.push_str(&urlencoding::encode(value));
        rest = &rest[close + 1..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}

/// `&`-joined `key=value` pairs for each declared name the caller supplied.
///
/// Names already consumed as path placeholders are skipped. Returns `None`
/// when nothing would be emitted.
pub fn query_string(declared: &[&str], consumed: &[&str], params: &Params) -> Option<String> {
    let pairs: Vec<String> = declared
        .iter()
        .filter(|name| !consumed.contains(name))
        .filter_map(|name| {
            params
                .get(name)
                .map(|value| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_placeholders_in_order() {
        assert_eq!(
            placeholders("/projects/{projectId}/blocks/{blockId}"),
            Some(vec!["projectId", "blockId"])
        );
        assert_eq!(placeholders("/projects"), Some(vec![]));
    }

    #[test]
    fn rejects_malformed_templates() {
        assert_eq!(placeholders("/projects/{projectId"), None);
        assert_eq!(placeholders("/projects/projectId}"), None);
        assert_eq!(placeholders("/projects/{}"), None);
        assert_eq!(placeholders("/projects/{a{b}"), None);
    }

    #[test]
    fn renders_and_encodes_values() {
        let params = Params::new().with("projectId", "a b/c");
        let path = render_path("listProject", "/projects/{projectId}", &params).unwrap();
        assert_eq!(path, "/projects/a%20b%2Fc");
    }

    #[test]
    fn empty_value_is_still_supplied() {
        let params = Params::new()
            .with("projectId", "p")
            .with("blockId", "b")
            .with("position", "");
        let path = render_path(
            "cloneBlock",
            "/projects/{projectId}/blocks/{blockId}/clone/{position}",
            &params,
        )
        .unwrap();
        assert_eq!(path, "/projects/p/blocks/b/clone/");
    }

    #[test]
    fn missing_value_names_the_placeholder() {
        let params = Params::new().with("projectId", "p");
        let err = render_path("listBlock", "/projects/{projectId}/blocks/{blockId}", &params)
            .unwrap_err();
        match err {
            CallError::MissingPathParameter {
                operation,
                placeholder,
            } => {
                assert_eq!(operation, "listBlock");
                assert_eq!(placeholder, "blockId");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn query_uses_declared_order_and_omits_absent() {
        let params = Params::new().with("itemsPerPage", 3).with("page", 2);
        let query = query_string(&["page", "itemsPerPage", "title"], &[], &params);
        assert_eq!(query.as_deref(), Some("page=2&itemsPerPage=3"));
    }

    #[test]
    fn query_skips_consumed_and_undeclared() {
        let params = Params::new()
            .with("projectId", "p")
            .with("page", 1)
            .with("debug", "yes");
        let query = query_string(&["projectId", "page"], &["projectId"], &params);
        assert_eq!(query.as_deref(), Some("page=1"));
    }

    #[test]
    fn query_encodes_values() {
        let params = Params::new().with("title", "Q3 & Q4");
        let query = query_string(&["title"], &[], &params);
        assert_eq!(query.as_deref(), Some("title=Q3%20%26%20Q4"));
    }

    #[test]
    fn empty_query_is_none() {
        assert_eq!(query_string(&["page"], &[], &Params::new()), None);
    }
}
