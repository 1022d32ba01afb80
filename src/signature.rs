use {
    crate::{
        canonical::{build_canonical_request, percent_decode, query_string_to_parameters, LowerCaseHeaders, QueryParameters},
        constants::{DEFAULT_SCHEME, PRESIGN_URL_MAX_EXPIRATION_SECONDS},
        crypto::sha256_hex,
        validator::{Clock, HostResolver, SignedHeaderValidator},
        S3Error,
    },
    chrono::Duration,
    derive_builder::Builder,
    http::request::Parts,
    log::{debug, trace},
};

/// How an `x-amz-date` timestamp is compared against the presign window.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DateCheck {
    /// Compare the full timestamp against the current time.
    #[default]
    Instant,

    /// Compare only the calendar dates (UTC). This accepts timestamps up to a day beyond the window.
    CalendarDay,
}

/// Options that can be used to configure string-to-sign production.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignatureOptions {
    /// How far `x-amz-date` may be from the current time. Defaults to seven days, the longest
    /// expiration SigV4 allows for a presigned URL.
    pub presign_window: Duration,

    /// How `x-amz-date` is compared against the window.
    pub date_check: DateCheck,

    /// Scheme assumed when a request URI does not carry one.
    pub default_scheme: &'static str,
}

impl Default for SignatureOptions {
    fn default() -> Self {
        Self {
            presign_window: Duration::seconds(PRESIGN_URL_MAX_EXPIRATION_SECONDS),
            date_check: DateCheck::Instant,
            default_scheme: DEFAULT_SCHEME,
        }
    }
}

impl SignatureOptions {
    /// Replace the presign window.
    pub fn with_presign_window(mut self, presign_window: Duration) -> Self {
        self.presign_window = presign_window;
        self
    }

    /// Replace the date comparison mode.
    pub fn with_date_check(mut self, date_check: DateCheck) -> Self {
        self.date_check = date_check;
        self
    }

    /// Replace the default scheme.
    pub fn with_default_scheme(mut self, default_scheme: &'static str) -> Self {
        self.default_scheme = default_scheme;
        self
    }
}

/// Signing information previously extracted from a request's `Authorization` header or presigned
/// query string.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[builder(setter(into), derive(Debug))]
pub struct SignatureInfo {
    /// The signing algorithm, e.g. `AWS4-HMAC-SHA256`.
    algorithm: String,

    /// The credential scope, e.g. `20240101/us-east-1/s3/aws4_request`.
    credential_scope: String,

    /// The request timestamp in `yyyyMMdd'T'HHmmss'Z'` format.
    date_time: String,

    /// Semicolon-separated lowercase header names, in the order the client listed them.
    signed_headers: String,

    /// If true, the client-supplied `x-amz-content-sha256` is used as the payload hash.
    sign_payload: bool,

    /// The access key id the request was signed with.
    #[builder(default)]
    access_id: String,

    /// The signature supplied by the client.
    #[builder(default)]
    signature: String,

    /// Whether the signing information came from presigned URL query parameters.
    #[builder(default)]
    presigned: bool,

    /// How long a presigned URL stays valid after `date_time`, if the client said.
    #[builder(default)]
    expires: Option<Duration>,
}

impl SignatureInfo {
    /// Create a builder for `SignatureInfo`.
    #[inline(always)]
    pub fn builder() -> SignatureInfoBuilder {
        SignatureInfoBuilder::default()
    }

    /// The signing algorithm.
    #[inline(always)]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The credential scope.
    #[inline(always)]
    pub fn credential_scope(&self) -> &str {
        &self.credential_scope
    }

    /// The request timestamp.
    #[inline(always)]
    pub fn date_time(&self) -> &str {
        &self.date_time
    }

    /// The signed headers list, verbatim.
    #[inline(always)]
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Whether the payload hash is signed.
    #[inline(always)]
    pub fn sign_payload(&self) -> bool {
        self.sign_payload
    }

    /// The access key id.
    #[inline(always)]
    pub fn access_id(&self) -> &str {
        &self.access_id
    }

    /// The client-supplied signature.
    #[inline(always)]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Whether this came from a presigned URL.
    #[inline(always)]
    pub fn presigned(&self) -> bool {
        self.presigned
    }

    /// The presigned URL lifetime (`X-Amz-Expires`), if given.
    #[inline(always)]
    pub fn expires(&self) -> Option<Duration> {
        self.expires
    }
}

/// The parts of an HTTP request that contribute to the canonical request.
///
/// The path and query values are already percent-decoded; headers and query parameters hold only
/// their first value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestView {
    scheme: String,
    method: String,
    path: String,
    headers: LowerCaseHeaders,
    query: QueryParameters,
}

impl RequestView {
    /// Create a `RequestView` from already-decoded components.
    pub fn new<S, M, P>(scheme: S, method: M, path: P, headers: LowerCaseHeaders, query: QueryParameters) -> Self
    where
        S: Into<String>,
        M: Into<String>,
        P: Into<String>,
    {
        Self {
            scheme: scheme.into(),
            method: method.into(),
            path: path.into(),
            headers,
            query,
        }
    }

    /// Create a `RequestView` from HTTP request [`Parts`]. The URI path and query string are
    /// percent-decoded; if the URI has no scheme, `options.default_scheme` is used.
    ///
    /// # Errors
    /// Returns an `AuthInfoCreationError` if the path or query string contains a malformed escape or
    /// does not decode to UTF-8.
    pub fn from_request_parts(parts: &Parts, options: &SignatureOptions) -> Result<Self, S3Error> {
        let scheme = parts.uri.scheme_str().unwrap_or(options.default_scheme);
        let path = percent_decode(parts.uri.path(), false)?;
        let query = query_string_to_parameters(parts.uri.query().unwrap_or(""))?;
        let headers = LowerCaseHeaders::from_header_map(&parts.headers);

        Ok(Self::new(scheme, parts.method.as_str(), path, headers, query))
    }

    /// The request scheme, e.g. `http`.
    #[inline(always)]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The request method, verbatim.
    #[inline(always)]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The decoded request path.
    #[inline(always)]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request headers.
    #[inline(always)]
    pub fn headers(&self) -> &LowerCaseHeaders {
        &self.headers
    }

    /// The decoded query parameters.
    #[inline(always)]
    pub fn query(&self) -> &QueryParameters {
        &self.query
    }
}

/// Create the SigV4 string to sign for a request.
///
/// The result is `Algorithm\nDateTime\nCredentialScope\nhex(SHA-256(canonical request))`, with no
/// trailing newline. `path`, `headers`, and `query` must already be decoded.
///
/// # Errors
/// Returns an `AuthInfoCreationError` if a signed header is missing from `headers` or is rejected
/// by `validator`, or if the payload is signed but no `x-amz-content-sha256` header was sent.
pub fn create_signature_base<R, C>(
    signature_info: &SignatureInfo,
    scheme: &str,
    method: &str,
    path: &str,
    headers: &LowerCaseHeaders,
    query: &QueryParameters,
    validator: &SignedHeaderValidator<R, C>,
) -> Result<String, S3Error>
where
    R: HostResolver,
    C: Clock,
{
    let canonical_request = build_canonical_request(
        scheme,
        method,
        path,
        signature_info.signed_headers(),
        headers,
        query,
        !signature_info.sign_payload(),
        validator,
    )?;

    let string_to_sign = compute_string_to_sign(
        signature_info.algorithm(),
        signature_info.date_time(),
        signature_info.credential_scope(),
        &canonical_request,
    );

    debug!("canonicalRequest:[{}]", canonical_request);
    debug!("StringToSign:[{}]", string_to_sign);
    Ok(string_to_sign)
}

/// Create the SigV4 string to sign for a [`RequestView`].
///
/// # Errors
/// See [`create_signature_base`].
pub fn create_signature_base_for_request<R, C>(
    signature_info: &SignatureInfo,
    request: &RequestView,
    validator: &SignedHeaderValidator<R, C>,
) -> Result<String, S3Error>
where
    R: HostResolver,
    C: Clock,
{
    create_signature_base(
        signature_info,
        request.scheme(),
        request.method(),
        request.path(),
        request.headers(),
        request.query(),
        validator,
    )
}

/// Compute the string to sign from its components.
fn compute_string_to_sign(algorithm: &str, date_time: &str, credential_scope: &str, canonical_request: &str) -> String {
    let canonical_request_hash = sha256_hex(canonical_request.as_bytes());
    trace!("Canonical request hash: {}", canonical_request_hash);
    format!("{}\n{}\n{}\n{}", algorithm, date_time, credential_scope, canonical_request_hash)
}
