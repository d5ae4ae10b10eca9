//! Test request building.

use crate::error::TestError;
use bytes::Bytes;
use formwright_core::{FormRequest, FormValues};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::Serialize;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Entry points for building a [`FormRequest`] in tests.
///
/// # Example
///
/// ```
/// use formwright_test::TestRequest;
///
/// let req = TestRequest::post("/signup")
///     .field("firstname", "Ada")
///     .field("email", "ada@example.com")
///     .build()
///     .unwrap();
///
/// let values = req.form_values().unwrap();
/// assert_eq!(values.get("email"), Some("ada@example.com"));
/// ```
pub struct TestRequest;

impl TestRequest {
    /// Creates a GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Creates a DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }
}

/// Builder for test form requests.
///
/// Invalid headers are reported by [`build`](Self::build) rather than at the
/// call that set them.
#[must_use]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    fields: Vec<(String, String)>,
    values: Option<FormValues>,
    max_body_size: Option<usize>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            fields: Vec::new(),
            values: None,
            max_body_size: None,
            error: None,
        }
    }

    /// Sets a header on the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.fail(format!("invalid header name: {e}")),
            (_, Err(e)) => self.fail(format!("invalid header value: {e}")),
        }
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends a URL-encoded body field.
    ///
    /// Fields are encoded when the request is built and set the form content
    /// type unless one was given explicitly.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Sets the body to the URL-encoded form of `value`.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => {
                self.body = Some(Bytes::from(encoded));
                self.content_type(FORM_CONTENT_TYPE)
            }
            Err(e) => {
                self.error.get_or_insert(TestError::Encode(e));
                self
            }
        }
    }

    /// Supplies pre-tokenized values; the body is then never parsed.
    pub fn values(mut self, values: FormValues) -> Self {
        self.values = Some(values);
        self
    }

    /// Overrides the accepted body size.
    pub fn max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = Some(max_body_size);
        self
    }

    /// Builds the request.
    pub fn build(mut self) -> Result<FormRequest, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("invalid URI: {e}")))?;

        if !self.fields.is_empty() {
            let encoded = serde_urlencoded::to_string(&self.fields)?;
            self.body = Some(Bytes::from(encoded));
            if !self.headers.contains_key(header::CONTENT_TYPE) {
                self.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(FORM_CONTENT_TYPE),
                );
            }
        }

        let mut request =
            FormRequest::new(self.method, uri, self.headers, self.body.unwrap_or_default());
        if let Some(values) = self.values {
            request = request.with_form_values(values);
        }
        if let Some(max_body_size) = self.max_body_size {
            request = request.with_max_body_size(max_body_size);
        }
        Ok(request)
    }

    fn fail(&mut self, message: String) {
        self.error.get_or_insert(TestError::RequestBuild(message));
    }
}
