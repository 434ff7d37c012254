use std::collections::HashSet;
use std::sync::OnceLock;

use crate::types::headers::header_name::HeaderName;

/// Table of which header kinds may carry multiple values.
///
/// Built once and never mutated afterwards; `global()` hands out the
/// shared instance. Extension headers are always treated as list-capable
/// since their grammar is unknown.
#[derive(Debug)]
pub struct HeaderRegistry {
    list_capable: HashSet<HeaderName>,
}

impl HeaderRegistry {
    /// Builds the standard RFC 3261 capability table.
    pub fn standard() -> Self {
        let list_capable = [
            HeaderName::Via,
            HeaderName::Route,
            HeaderName::RecordRoute,
            HeaderName::Contact,
            HeaderName::Warning,
            HeaderName::Accept,
            HeaderName::AcceptEncoding,
            HeaderName::AcceptLanguage,
            HeaderName::Allow,
            HeaderName::Supported,
            HeaderName::Unsupported,
            HeaderName::Require,
            HeaderName::ProxyRequire,
            HeaderName::CallInfo,
            HeaderName::AlertInfo,
            HeaderName::ErrorInfo,
            HeaderName::InReplyTo,
            HeaderName::ProxyAuthorization,
        ]
        .into_iter()
        .collect();

        HeaderRegistry { list_capable }
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static HeaderRegistry {
        static REGISTRY: OnceLock<HeaderRegistry> = OnceLock::new();
        REGISTRY.get_or_init(HeaderRegistry::standard)
    }

    /// Whether headers of this kind may appear multiple times.
    pub fn is_list_capable(&self, name: &HeaderName) -> bool {
        matches!(name, HeaderName::Other(_)) || self.list_capable.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_capable_kinds() {
        let reg = HeaderRegistry::global();
        assert!(reg.is_list_capable(&HeaderName::Via));
        assert!(reg.is_list_capable(&HeaderName::Route));
        assert!(reg.is_list_capable(&HeaderName::Contact));
    }

    #[test]
    fn test_singleton_kinds() {
        let reg = HeaderRegistry::global();
        assert!(!reg.is_list_capable(&HeaderName::From));
        assert!(!reg.is_list_capable(&HeaderName::CSeq));
        assert!(!reg.is_list_capable(&HeaderName::CallId));
        assert!(!reg.is_list_capable(&HeaderName::ContentLength));
        assert!(!reg.is_list_capable(&HeaderName::MaxForwards));
    }

    #[test]
    fn test_extension_headers_are_list_capable() {
        let reg = HeaderRegistry::global();
        assert!(reg.is_list_capable(&HeaderName::Other("x-custom".to_string())));
    }

    #[test]
    fn test_global_is_shared() {
        let a = HeaderRegistry::global() as *const _;
        let b = HeaderRegistry::global() as *const _;
        assert_eq!(a, b);
    }
}
