//! Request view consumed by the form pipeline.
//!
//! The [`FormRequest`] exposes the parts of an HTTP request the pipeline
//! needs: method, URI, headers, body and the key/value view of submitted
//! fields. The hosting server either hands over pre-tokenized values with
//! [`FormRequest::with_form_values`] or lets [`FormRequest::form_values`]
//! parse a URL-encoded body.

use crate::{FormError, FormResult, FormValues};
use bytes::Bytes;
use http::{header, HeaderMap, Method, Uri};

/// Default maximum body size for form decoding (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

const URLENCODED: &str = "application/x-www-form-urlencoded";

/// The request as seen by providers, decoders and validators.
///
/// # Example
///
/// ```
/// use formwright_core::FormRequest;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let req = FormRequest::new(
///     Method::POST,
///     Uri::from_static("/signup?ref=mail"),
///     HeaderMap::new(),
///     Bytes::from_static(b"firstname=Ann&email=a%40b.com"),
/// );
///
/// let values = req.form_values().unwrap();
/// assert_eq!(values.get("email"), Some("a@b.com"));
/// assert_eq!(values.get("ref"), Some("mail"));
/// assert!(req.is_submission());
/// ```
#[derive(Debug, Clone)]
pub struct FormRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    values: Option<FormValues>,
    max_body_size: usize,
}

impl FormRequest {
    /// Creates a new request view.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            values: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> FormRequestBuilder {
        FormRequestBuilder::new()
    }

    /// Supplies already tokenized form values; the body is not parsed.
    #[must_use]
    pub fn with_form_values(mut self, values: FormValues) -> Self {
        self.values = Some(values);
        self
    }

    /// Overrides the maximum body size accepted by [`form_values`](Self::form_values).
    #[must_use]
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns `true` for methods that submit a form (POST, PUT, PATCH).
    #[must_use]
    pub fn is_submission(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the submitted field values.
    ///
    /// Pre-tokenized values win. Otherwise the URL-encoded body is parsed
    /// and the query string values are appended after the body values, so a
    /// name present in both reads its body value first. Single-value fields
    /// decode from that first value; sequence fields see both.
    pub fn form_values(&self) -> FormResult<FormValues> {
        if let Some(values) = &self.values {
            return Ok(values.clone());
        }

        let mut values = self.body_values()?;
        if let Some(query) = self.query_string() {
            for (name, submitted) in FormValues::from_urlencoded(query)? {
                for value in submitted {
                    values.append(name.clone(), value);
                }
            }
        }
        Ok(values)
    }

    fn body_values(&self) -> FormResult<FormValues> {
        if self.body.is_empty() {
            return Ok(FormValues::new());
        }

        if self.body.len() > self.max_body_size {
            return Err(FormError::PayloadTooLarge {
                max_size: self.max_body_size,
                actual_size: self.body.len(),
            });
        }

        if let Some(content_type) = self.content_type() {
            let essence = content_type.split(';').next().unwrap_or("").trim();
            if !essence.eq_ignore_ascii_case(URLENCODED) {
                return Err(FormError::UnsupportedMediaType {
                    expected: URLENCODED.to_string(),
                    actual: content_type.to_string(),
                });
            }
        }

        let body = std::str::from_utf8(&self.body)
            .map_err(|e| FormError::decode(format!("invalid UTF-8: {e}")))?;
        FormValues::from_urlencoded(body)
    }
}

impl From<http::Request<Bytes>> for FormRequest {
    fn from(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }
}

/// Builder for constructing a [`FormRequest`].
///
/// Method defaults to `GET`, URI to `/`.
#[derive(Debug, Default)]
pub struct FormRequestBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    values: Option<FormValues>,
}

impl FormRequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Adds a single header; invalid values are skipped.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets pre-tokenized form values.
    #[must_use]
    pub fn form_values(mut self, values: FormValues) -> Self {
        self.values = Some(values);
        self
    }

    /// Builds the request view.
    #[must_use]
    pub fn build(self) -> FormRequest {
        let request = FormRequest::new(
            self.method.unwrap_or(Method::GET),
            self.uri.unwrap_or_else(|| Uri::from_static("/")),
            self.headers,
            self.body,
        );
        match self.values {
            Some(values) => request.with_form_values(values),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormErrorCategory;

    fn post(body: &'static [u8]) -> FormRequest {
        FormRequest::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/form"))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body)
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let req = FormRequest::builder().build();
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.path(), "/");
        assert!(!req.is_submission());
    }

    #[test]
    fn test_submission_methods() {
        for method in [Method::POST, Method::PUT, Method::PATCH] {
            assert!(FormRequest::builder().method(method).build().is_submission());
        }
        for method in [Method::GET, Method::HEAD, Method::DELETE, Method::OPTIONS] {
            assert!(!FormRequest::builder().method(method).build().is_submission());
        }
    }

    #[test]
    fn test_parse_body() {
        let values = post(b"firstname=&email=a%40b.com").form_values().unwrap();
        assert_eq!(values.get("firstname"), Some(""));
        assert_eq!(values.get("email"), Some("a@b.com"));
    }

    #[test]
    fn test_content_type_with_charset() {
        let req = FormRequest::builder()
            .method(Method::POST)
            .header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
            .body(&b"a=1"[..])
            .build();
        assert_eq!(req.form_values().unwrap().get("a"), Some("1"));
    }

    #[test]
    fn test_body_values_precede_query_values() {
        let req = FormRequest::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/form?tag=query"))
            .body(&b"tag=body"[..])
            .build();

        let values = req.form_values().unwrap();
        assert_eq!(values.get_all("tag"), ["body", "query"]);
    }

    #[test]
    fn test_query_overlap_decodes_body_value() {
        #[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        struct Subscribe {
            email: String,
        }

        impl crate::FormSchema for Subscribe {}

        let req = FormRequest::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/subscribe?email=query%40example.com"))
            .body(&b"email=body%40example.com"[..])
            .build();

        let mut data = Subscribe::default();
        crate::FormData::decode_from(&mut data, &req.form_values().unwrap()).unwrap();
        assert_eq!(data.email, "body@example.com");
    }

    #[test]
    fn test_pre_tokenized_values_win() {
        let values: FormValues = [("company", "Acme")].into_iter().collect();
        let req = post(b"company=Other").with_form_values(values);

        assert_eq!(req.form_values().unwrap().get("company"), Some("Acme"));
    }

    #[test]
    fn test_empty_body_yields_no_values() {
        let req = FormRequest::builder().method(Method::POST).build();
        assert!(req.form_values().unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_media_type() {
        let req = FormRequest::builder()
            .method(Method::POST)
            .header("content-type", "application/json")
            .body(&br#"{"a":1}"#[..])
            .build();

        let err = req.form_values().unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_MEDIA_TYPE");
    }

    #[test]
    fn test_payload_too_large() {
        let req = post(b"name=aaaaaaaaaaaaaaaaaaaa").with_max_body_size(8);
        let err = req.form_values().unwrap_err();
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_invalid_utf8() {
        let req = FormRequest::builder()
            .method(Method::POST)
            .body(vec![b'a', b'=', 0xff, 0xfe])
            .build();

        let err = req.form_values().unwrap_err();
        assert_eq!(err.category(), FormErrorCategory::Decode);
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_from_http_request() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/newsletter")
            .body(Bytes::from_static(b"email=x%40y.org"))
            .unwrap();

        let req = FormRequest::from(request);
        assert_eq!(req.path(), "/newsletter");
        assert_eq!(req.form_values().unwrap().get("email"), Some("x@y.org"));
    }
}
