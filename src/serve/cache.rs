use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::HeaderMap;

/// Mark a response as uncacheable by clients and intermediaries.
///
/// Uses `insert`, not `append`: any cache policy set earlier in the pipeline
/// is overridden, never duplicated.
#[allow(clippy::declare_interior_mutable_const)]
pub fn disable(headers: &mut HeaderMap) {
    const CACHE: HeaderValue =
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0");
    const PRAGMA_VALUE: HeaderValue = HeaderValue::from_static("no-cache");
    const EXPIRED: HeaderValue = HeaderValue::from_static("0");

    headers.insert(CACHE_CONTROL, CACHE);
    headers.insert(PRAGMA, PRAGMA_VALUE);
    headers.insert(EXPIRES, EXPIRED);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_all_three_headers() {
        let mut headers = HeaderMap::new();
        disable(&mut headers);
        assert_eq!(
            headers.get(CACHE_CONTROL).unwrap(),
            "no-store, no-cache, must-revalidate, max-age=0"
        );
        assert_eq!(headers.get(PRAGMA).unwrap(), "no-cache");
        assert_eq!(headers.get(EXPIRES).unwrap(), "0");
    }

    #[test]
    fn overrides_existing_policy() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=3600"));
        disable(&mut headers);
        assert_eq!(headers.get_all(CACHE_CONTROL).iter().count(), 1);
        assert_eq!(
            headers.get(CACHE_CONTROL).unwrap(),
            "no-store, no-cache, must-revalidate, max-age=0"
        );
    }
}
