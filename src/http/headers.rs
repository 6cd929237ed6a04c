//! Site-wide response headers
//!
//! CORS and Content-Security-Policy headers attached to every response so the
//! widget can be embedded in the platform's admin panel.

use hyper::header::{
    HeaderMap, HeaderValue, InvalidHeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_SECURITY_POLICY,
};

/// Headers shared by every response, built once at start-up
#[derive(Debug, Clone)]
pub struct SiteHeaders {
    csp: HeaderValue,
}

impl SiteHeaders {
    /// Build the `frame-ancestors` policy from the allowed origins
    pub fn new(csp_allowlist: &[String]) -> Result<Self, InvalidHeaderValue> {
        let csp = HeaderValue::from_str(&build_csp(csp_allowlist))?;
        Ok(Self { csp })
    }

    /// Insert CORS and CSP headers, replacing any existing values
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        headers.insert(CONTENT_SECURITY_POLICY, self.csp.clone());
    }
}

/// `frame-ancestors 'self' <origin> <origin> ...`
pub fn build_csp(csp_allowlist: &[String]) -> String {
    let mut csp = String::from("frame-ancestors 'self'");
    for origin in csp_allowlist {
        csp.push(' ');
        csp.push_str(origin);
    }
    csp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_csp() {
        let allowlist = vec!["*.example.com:*".to_string(), "panel.example.org".to_string()];
        assert_eq!(
            build_csp(&allowlist),
            "frame-ancestors 'self' *.example.com:* panel.example.org"
        );
        assert_eq!(build_csp(&[]), "frame-ancestors 'self'");
    }

    #[test]
    fn test_apply_sets_cors_and_csp() {
        let site = SiteHeaders::new(&["*.example.com:*".to_string()]).unwrap();
        let mut headers = HeaderMap::new();
        site.apply(&mut headers);

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(
            headers[CONTENT_SECURITY_POLICY],
            "frame-ancestors 'self' *.example.com:*"
        );
    }

    #[test]
    fn test_rejects_invalid_origin() {
        assert!(SiteHeaders::new(&["bad\norigin".to_string()]).is_err());
    }
}
