use crate::config::AffiliateTags;
use crate::model::Platform;
use std::collections::HashMap;
use url::form_urlencoded;

/// Rewrites an outbound link with the platform's affiliate query
/// parameter: `tag` for Amazon, `affid` for Flipkart. Other platforms, or
/// a missing tag value, leave the URL untouched. Overwrite semantics make
/// the operation idempotent for a fixed tag.
///
/// Parsing is best-effort: a malformed URL comes back with at most its
/// query component altered.
pub fn normalize(link: &str, platform: Platform, tags: &AffiliateTags) -> String {
    let tag = match platform {
        Platform::Amazon => tags.amazon.as_deref().map(|t| ("tag", t)),
        Platform::Flipkart => tags.flipkart.as_deref().map(|t| ("affid", t)),
        Platform::Unknown => None,
    };
    let Some((key, value)) = tag.filter(|(_, v)| !v.is_empty()) else {
        return link.to_string();
    };

    // Everything before the query (scheme, authority, path and any legacy
    // `;params` segment) and the fragment pass through unchanged.
    let (base, fragment) = match link.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (link, None),
    };
    let (head, query) = match base.split_once('?') {
        Some((head, query)) => (head, query),
        None => (base, ""),
    };

    let query = set_query_value(query, key, value);

    let mut out = format!("{head}?{query}");
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Re-serializes `query` with `key` forced to the single `value`. Every
/// other key keeps its values, repeated keys included, in
/// first-occurrence order.
fn set_query_value(query: &str, key: &str, value: &str) -> String {
    let mut order: Vec<String> = Vec::new();
    let mut values: HashMap<String, Vec<String>> = HashMap::new();

    for (k, v) in form_urlencoded::parse(query.as_bytes()).into_owned() {
        if !values.contains_key(&k) {
            order.push(k.clone());
        }
        values.entry(k).or_default().push(v);
    }

    if !values.contains_key(key) {
        order.push(key.to_string());
    }
    values.insert(key.to_string(), vec![value.to_string()]);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for k in &order {
        if let Some(vs) = values.get(k) {
            for v in vs {
                serializer.append_pair(k, v);
            }
        }
    }
    serializer.finish()
}
