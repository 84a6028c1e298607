//! Filters applied to a captured entry before it is stored
//!
//! Filters run after the live request, in the order they were registered,
//! and each sees the changes made by the ones before it. The caller also
//! observes the filtered response. Their main use is keeping secrets out of
//! recording files. Filters must not perform I/O.

use std::sync::Arc;

use crate::entry::Entry;

/// Mutation applied to an entry before it is stored
pub type Filter = Arc<dyn Fn(&mut Entry) + Send + Sync>;

/// Build a filter from a closure
pub fn filter_fn<F>(f: F) -> Filter
where
    F: Fn(&mut Entry) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Remove a request header. The name is case-sensitive and matched against
/// canonical names such as `Authorization`.
#[must_use]
pub fn remove_request_header(name: impl Into<String>) -> Filter {
    let name = name.into();
    Arc::new(move |entry: &mut Entry| {
        entry.request.headers.remove(&name);
    })
}

/// Remove a response header. The name is case-sensitive and matched against
/// canonical names such as `Set-Cookie`.
#[must_use]
pub fn remove_response_header(name: impl Into<String>) -> Filter {
    let name = name.into();
    Arc::new(move |entry: &mut Entry| {
        entry.response.headers.remove(&name);
    })
}

/// Replace the value of a request header, leaving absent headers absent
#[must_use]
pub fn redact_request_header(name: impl Into<String>, replacement: impl Into<String>) -> Filter {
    let name = name.into();
    let replacement = replacement.into();
    Arc::new(move |entry: &mut Entry| {
        if let Some(value) = entry.request.headers.get_mut(&name) {
            value.clone_from(&replacement);
        }
    })
}

/// Run filters over an entry in order
pub fn apply_filters(filters: &[Filter], entry: &mut Entry) {
    for filter in filters {
        filter(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_headers() -> Entry {
        let mut entry = Entry::default();
        entry
            .request
            .headers
            .insert("Authorization".to_string(), "abcdef".to_string());
        entry
            .request
            .headers
            .insert("Accept".to_string(), "*/*".to_string());
        entry
            .response
            .headers
            .insert("Set-Cookie".to_string(), "session=1".to_string());
        entry
    }

    #[test]
    fn test_remove_request_header() {
        let mut entry = entry_with_headers();
        apply_filters(&[remove_request_header("Authorization")], &mut entry);

        assert!(!entry.request.headers.contains_key("Authorization"));
        assert_eq!(entry.request.headers["Accept"], "*/*");
        assert!(entry.response.headers.contains_key("Set-Cookie"));
    }

    #[test]
    fn test_remove_header_is_case_sensitive() {
        let mut entry = entry_with_headers();
        apply_filters(&[remove_request_header("authorization")], &mut entry);

        assert!(entry.request.headers.contains_key("Authorization"));
    }

    #[test]
    fn test_remove_response_header() {
        let mut entry = entry_with_headers();
        apply_filters(&[remove_response_header("Set-Cookie")], &mut entry);

        assert!(entry.response.headers.is_empty());
        assert_eq!(entry.request.headers.len(), 2);
    }

    #[test]
    fn test_redact_request_header() {
        let mut entry = entry_with_headers();
        apply_filters(
            &[
                redact_request_header("Authorization", "REDACTED"),
                redact_request_header("X-Missing", "REDACTED"),
            ],
            &mut entry,
        );

        assert_eq!(entry.request.headers["Authorization"], "REDACTED");
        assert!(!entry.request.headers.contains_key("X-Missing"));
    }

    #[test]
    fn test_filters_run_in_order() {
        let mut entry = Entry::default();
        let filters = vec![
            filter_fn(|e: &mut Entry| e.response.body.push('a')),
            filter_fn(|e: &mut Entry| e.response.body.push('b')),
            filter_fn(|e: &mut Entry| e.response.body = e.response.body.to_uppercase()),
        ];

        apply_filters(&filters, &mut entry);
        assert_eq!(entry.response.body, "AB");
    }
}
