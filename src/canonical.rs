//! Canonicalization functionality for string-to-sign production.
//!
//! This includes the URI and query string encoders, header and query normalization, and the
//! ability to create an AWS SigV4 canonical request for an S3 request.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions.

use {
    crate::{
        constants::*,
        validator::{Clock, HostResolver, SignedHeaderValidator},
        S3Error,
    },
    http::header::HeaderMap,
    log::{debug, trace},
    qualifier_attr::qualifiers,
    std::{
        collections::{btree_map, BTreeMap, HashMap},
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

/// Request headers keyed by their lowercase name.
///
/// Only the first value of a repeated header is kept; later duplicates are discarded.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct LowerCaseHeaders {
    headers: BTreeMap<String, String>,
}

impl LowerCaseHeaders {
    /// Create an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the headers from an HTTP [`HeaderMap`]. Values are interpreted as Latin-1.
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let mut result = Self::new();
        for (name, value) in headers.iter() {
            result.insert(name.as_str(), latin1_to_string(value.as_bytes()));
        }
        result
    }

    /// Add a header unless one with the same (case-insensitive) name is already present.
    ///
    /// Returns `true` if the header was added.
    pub fn insert<K: AsRef<str>, V: Into<String>>(&mut self, name: K, value: V) -> bool {
        match self.headers.entry(name.as_ref().to_ascii_lowercase()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value.into());
                true
            }
        }
    }

    /// Look up a header by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name.bytes().any(|c| c.is_ascii_uppercase()) {
            self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
        } else {
            self.headers.get(name).map(String::as_str)
        }
    }

    /// Indicates whether a header with the given name (ignoring case) is present.
    #[inline(always)]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The number of distinct headers.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Indicates whether there are no headers.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate over `(lowercase name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for LowerCaseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (name, value) in iter {
            result.insert(name, value);
        }
        result
    }
}

impl Debug for LowerCaseHeaders {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_map().entries(self.headers.iter()).finish()
    }
}

/// Decoded query parameters, one value per key.
///
/// Keys keep their case. Only the first value of a repeated parameter is kept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryParameters {
    parameters: HashMap<String, String>,
}

impl QueryParameters {
    /// Create an empty parameter collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter unless one with the same key is already present.
    ///
    /// Returns `true` if the parameter was added.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> bool {
        let key = key.into();
        if self.parameters.contains_key(&key) {
            false
        } else {
            self.parameters.insert(key, value.into());
            true
        }
    }

    /// Look up a parameter by its exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// The number of distinct parameters.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Indicates whether there are no parameters.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterate over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (key, value) in iter {
            result.insert(key, value);
        }
        result
    }
}

/// Percent-encode a single URI path segment.
///
/// Bytes outside the RFC 3986 unreserved set (`A-Z a-z 0-9 - _ . ~`) are encoded as `%XX` with
/// uppercase hex digits. Spaces become `%20` and `~` is left alone. `/` is encoded too, so callers
/// must split paths before calling this.
#[inline(always)]
pub fn encode_segment(segment: &str) -> String {
    uri_encode(segment)
}

/// Percent-encode a query parameter key or value. The rules are identical to [`encode_segment`].
#[inline(always)]
pub fn encode_query_token(token: &str) -> String {
    uri_encode(token)
}

fn uri_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.bytes() {
        if is_rfc3986_unreserved(c) {
            result.push(c as char);
        } else {
            let hex = u8_to_upper_hex(c);
            result.push('%');
            result.push(hex[0] as char);
            result.push(hex[1] as char);
        }
    }
    result
}

/// Create the canonical URI: each `/`-delimited segment is encoded independently and the segments are
/// rejoined with unencoded slashes. Empty segments (from `//`) are preserved, and `.`/`..` are taken
/// literally.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_uri_path(uri_path: &str) -> String {
    // Special case: a blank path is converted to '/'.
    if uri_path.trim().is_empty() {
        return "/".to_string();
    }

    uri_path.split('/').map(encode_segment).collect::<Vec<String>>().join("/")
}

/// Create the canonical query string: parameters sorted by key, then value, with `X-Amz-Signature`
/// left out.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_query_to_string(query_parameters: &QueryParameters) -> String {
    let mut params: Vec<(&str, &str)> = query_parameters.iter().filter(|(key, _)| *key != QP_X_AMZ_SIGNATURE).collect();
    params.sort_unstable();

    params
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode_query_token(key), encode_query_token(value)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Split a `SignedHeaders` value into its header names, dropping empty entries.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn split_signed_headers(signed_headers: &str) -> impl Iterator<Item = &str> {
    signed_headers.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Create the canonical headers block: one `name:value\n` line per signed header, in the order the
/// client listed them. Each header is checked by `validator` before it is emitted.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_headers<R, C>(
    scheme: &str,
    signed_headers: &str,
    headers: &LowerCaseHeaders,
    validator: &SignedHeaderValidator<R, C>,
) -> Result<String, S3Error>
where
    R: HostResolver,
    C: Clock,
{
    let mut result = String::new();

    for header in split_signed_headers(signed_headers) {
        let header_lower = header.to_ascii_lowercase();
        let Some(value) = headers.get(&header_lower) else {
            debug!("Header {} not present in request but requested to be signed", header_lower);
            return Err(S3Error::auth_info_creation(header_lower.as_str())
                .with_message(format!("Header {} not present in request but requested to be signed.", header_lower)));
        };

        validator.validate(scheme, &header_lower, value)?;

        result.push_str(&header_lower);
        result.push(':');
        result.push_str(value);
        result.push('\n');
    }

    Ok(result)
}

/// Select the payload hash: `UNSIGNED-PAYLOAD` if the payload is unsigned (either because the caller
/// says so or because the client sent that sentinel), otherwise the client's `x-amz-content-sha256`.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn payload_hash(headers: &LowerCaseHeaders, unsigned_payload: bool) -> Result<&str, S3Error> {
    let content_sha256 = headers.get(HDR_X_AMZ_CONTENT_SHA256);

    if unsigned_payload || content_sha256 == Some(XACS_UNSIGNED_PAYLOAD) {
        debug!("Using {} for the payload hash", XACS_UNSIGNED_PAYLOAD);
        return Ok(XACS_UNSIGNED_PAYLOAD);
    }

    content_sha256.ok_or_else(|| {
        S3Error::auth_info_creation(HDR_X_AMZ_CONTENT_SHA256)
            .with_message("Payload is signed but the request has no x-amz-content-sha256 header.")
    })
}

/// Get the [canonical request](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
/// for an S3 request.
///
/// The result is six newline-separated fields: method, canonical URI, canonical query string,
/// canonical headers (each already newline-terminated), signed headers, and payload hash.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[allow(clippy::too_many_arguments)]
fn build_canonical_request<R, C>(
    scheme: &str,
    method: &str,
    uri_path: &str,
    signed_headers: &str,
    headers: &LowerCaseHeaders,
    query_parameters: &QueryParameters,
    unsigned_payload: bool,
    validator: &SignedHeaderValidator<R, C>,
) -> Result<String, S3Error>
where
    R: HostResolver,
    C: Clock,
{
    let canonical_uri = canonicalize_uri_path(uri_path);
    let canonical_query = canonicalize_query_to_string(query_parameters);
    let canonical_headers = canonicalize_headers(scheme, signed_headers, headers, validator)?;
    let payload_hash = payload_hash(headers, unsigned_payload)?;

    let mut result = String::with_capacity(1024);
    result.push_str(method);
    result.push('\n');
    result.push_str(&canonical_uri);
    result.push('\n');
    result.push_str(&canonical_query);
    result.push('\n');
    result.push_str(&canonical_headers);
    result.push('\n');
    result.push_str(signed_headers);
    result.push('\n');
    result.push_str(payload_hash);

    trace!("Canonical request:\n{}", result);
    Ok(result)
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.
#[inline(always)]
pub fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Convert a Latin-1 slice of bytes to a UTF-8 string.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

/// Decode a percent-encoded path or query element into UTF-8. If `plus_is_space` is set, `+` is
/// decoded to a space (form encoding, as used in query strings).
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn percent_decode(s: &str, plus_is_space: bool) -> Result<String, S3Error> {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                // % encoding would go beyond end of string.
                if i + 3 > bytes.len() {
                    return Err(S3Error::auth_info_creation(s).with_message(MSG_INCOMPLETE_TRAILING_ESCAPE));
                }

                let hex_digits = &bytes[i + 1..i + 3];
                match hex::decode(hex_digits) {
                    Ok(value) => result.push(value[0]),
                    Err(_) => {
                        return Err(S3Error::auth_info_creation(s).with_message(format!(
                            "{}{}{}",
                            MSG_ILLEGAL_HEX_CHAR, hex_digits[0] as char, hex_digits[1] as char
                        )))
                    }
                }
                i += 3;
            }
            b'+' if plus_is_space => {
                result.push(b' ');
                i += 1;
            }
            c => {
                result.push(c);
                i += 1;
            }
        }
    }

    String::from_utf8(result)
        .map_err(|_| S3Error::auth_info_creation(s).with_message("Percent-decoded value is not valid UTF-8"))
}

/// Decode a raw query string into [`QueryParameters`], keeping the first value of each key.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn query_string_to_parameters(query_string: &str) -> Result<QueryParameters, S3Error> {
    let mut result = QueryParameters::new();

    for component in query_string.split('&') {
        if component.is_empty() {
            continue;
        }

        // Only the first '=' separates the key from the value.
        let (key, value) = component.split_once('=').unwrap_or((component, ""));
        let key = percent_decode(key, true)?;
        let value = percent_decode(value, true)?;

        if !result.insert(key, value) {
            trace!("Ignoring repeated query parameter {}", component);
        }
    }

    Ok(result)
}

/// Convert a byte to uppercase hex representation.
#[inline(always)]
const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]]
}

#[cfg(test)]
mod tests {
    use {
        super::{
            build_canonical_request, canonicalize_headers, canonicalize_query_to_string, canonicalize_uri_path,
            payload_hash, percent_decode, query_string_to_parameters, split_signed_headers,
        },
        crate::{
            encode_query_token, encode_segment, is_rfc3986_unreserved, LowerCaseHeaders, QueryParameters,
            SignatureOptions, SignedHeaderValidator, SyntaxOnlyResolver,
        },
        chrono::{DateTime, NaiveDate, Utc},
        http::header::{HeaderMap, HeaderValue},
        scratchstack_errors::ServiceError,
    };

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn validator() -> SignedHeaderValidator<SyntaxOnlyResolver, DateTime<Utc>> {
        let now = NaiveDate::from_ymd_opt(2013, 5, 24).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
        SignedHeaderValidator::new(SyntaxOnlyResolver, now, SignatureOptions::default())
    }

    fn get_object_headers() -> LowerCaseHeaders {
        LowerCaseHeaders::from_iter([
            ("Host", "examplebucket.s3.amazonaws.com"),
            ("Range", "bytes=0-9"),
            ("x-amz-content-sha256", EMPTY_SHA256),
            ("x-amz-date", "20130524T000000Z"),
        ])
    }

    #[test_log::test]
    fn test_unreserved() {
        for c in b"ABCXYZabcxyz0189-_.~" {
            assert!(is_rfc3986_unreserved(*c), "{} should be unreserved", *c as char);
        }
        for c in b" !\"#$%&'()*+,/:;<=>?@[\\]^`{|}" {
            assert!(!is_rfc3986_unreserved(*c), "{} should be reserved", *c as char);
        }
        assert!(!is_rfc3986_unreserved(0x80));
    }

    #[test_log::test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("bücket"), "b%C3%BCcket");
        assert_eq!(encode_segment("my key"), "my%20key");
        assert_eq!(encode_segment("a*b+c~d"), "a%2Ab%2Bc~d");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("Aa0-_.~"), "Aa0-_.~");
        assert_eq!(encode_segment(""), "");
        assert_eq!(encode_query_token("x=y&z"), "x%3Dy%26z");
    }

    #[test_log::test]
    fn test_canonicalize_uri_path() {
        assert_eq!(canonicalize_uri_path(""), "/");
        assert_eq!(canonicalize_uri_path("   "), "/");
        assert_eq!(canonicalize_uri_path("/"), "/");
        assert_eq!(canonicalize_uri_path("/bücket/key"), "/b%C3%BCcket/key");
        assert_eq!(canonicalize_uri_path("/bucket//key/"), "/bucket//key/");
        assert_eq!(canonicalize_uri_path("/./../key"), "/./../key");
        assert_eq!(canonicalize_uri_path("/bucket/my key (1).txt"), "/bucket/my%20key%20%281%29.txt");

        // Encoding an already-canonical safe path changes nothing.
        let once = canonicalize_uri_path("/bucket/key-1_2.3~4");
        assert_eq!(canonicalize_uri_path(&once), once);
    }

    #[test_log::test]
    fn test_canonicalize_query() {
        assert_eq!(canonicalize_query_to_string(&QueryParameters::new()), "");

        let query = QueryParameters::from_iter([("prefix", "J"), ("max-keys", "2")]);
        assert_eq!(canonicalize_query_to_string(&query), "max-keys=2&prefix=J");

        let query = QueryParameters::from_iter([
            ("X-Amz-Signature", "abcd"),
            ("acl", ""),
            ("prefix", "photos/2024 jan"),
        ]);
        assert_eq!(canonicalize_query_to_string(&query), "acl=&prefix=photos%2F2024%20jan");

        // Sorting happens on the raw keys, before encoding.
        let query = QueryParameters::from_iter([("a/", "2"), ("a.", "1")]);
        assert_eq!(canonicalize_query_to_string(&query), "a.=1&a%2F=2");
    }

    #[test_log::test]
    fn test_split_signed_headers() {
        let names: Vec<&str> = split_signed_headers("host; x-amz-date;;range;").collect();
        assert_eq!(names, vec!["host", "x-amz-date", "range"]);
        assert_eq!(split_signed_headers("").count(), 0);
    }

    #[test_log::test]
    fn test_canonicalize_headers_order() {
        let headers = get_object_headers();
        let block = canonicalize_headers("http", "x-amz-date;Host;range", &headers, &validator()).unwrap();
        assert_eq!(
            block,
            "x-amz-date:20130524T000000Z\nhost:examplebucket.s3.amazonaws.com\nrange:bytes=0-9\n"
        );

        assert_eq!(canonicalize_headers("http", "", &headers, &validator()).unwrap(), "");
    }

    #[test_log::test]
    fn test_canonicalize_headers_missing() {
        let headers = LowerCaseHeaders::from_iter([("host", "examplebucket.s3.amazonaws.com")]);
        let e = canonicalize_headers("http", "host;Range", &headers, &validator()).unwrap_err();
        assert_eq!(e.error_code(), "AuthInfoCreationError");
        assert_eq!(e.resource(), "range");
        assert_eq!(e.message(), Some("Header range not present in request but requested to be signed."));
    }

    #[test_log::test]
    fn test_canonicalize_headers_rejected_value() {
        let headers = LowerCaseHeaders::from_iter([("x-amz-date", "20240101T000000Z")]);
        let e = canonicalize_headers("http", "x-amz-date", &headers, &validator()).unwrap_err();
        assert_eq!(e.error_code(), "AuthInfoCreationError");
        assert_eq!(e.resource(), "20240101T000000Z");
    }

    #[test_log::test]
    fn test_payload_hash() {
        let signed = LowerCaseHeaders::from_iter([("x-amz-content-sha256", EMPTY_SHA256)]);
        let sentinel = LowerCaseHeaders::from_iter([("x-amz-content-sha256", "UNSIGNED-PAYLOAD")]);
        let missing = LowerCaseHeaders::new();

        assert_eq!(payload_hash(&signed, false).unwrap(), EMPTY_SHA256);
        assert_eq!(payload_hash(&signed, true).unwrap(), "UNSIGNED-PAYLOAD");
        assert_eq!(payload_hash(&sentinel, false).unwrap(), "UNSIGNED-PAYLOAD");
        assert_eq!(payload_hash(&missing, true).unwrap(), "UNSIGNED-PAYLOAD");

        let e = payload_hash(&missing, false).unwrap_err();
        assert_eq!(e.error_code(), "AuthInfoCreationError");
        assert_eq!(e.resource(), "x-amz-content-sha256");
    }

    #[test_log::test]
    fn test_build_canonical_request() {
        let canonical_request = build_canonical_request(
            "http",
            "GET",
            "/test.txt",
            "host;range;x-amz-content-sha256;x-amz-date",
            &get_object_headers(),
            &QueryParameters::new(),
            false,
            &validator(),
        )
        .unwrap();

        assert_eq!(
            canonical_request,
            "GET\n\
             /test.txt\n\
             \n\
             host:examplebucket.s3.amazonaws.com\n\
             range:bytes=0-9\n\
             x-amz-content-sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\n\
             x-amz-date:20130524T000000Z\n\
             \n\
             host;range;x-amz-content-sha256;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test_log::test]
    fn test_build_canonical_request_unsigned() {
        let query = QueryParameters::from_iter([("uploads", "")]);
        let canonical_request =
            build_canonical_request("http", "POST", "", "host", &get_object_headers(), &query, true, &validator())
                .unwrap();
        assert_eq!(canonical_request, "POST\n/\nuploads=\nhost:examplebucket.s3.amazonaws.com\n\nhost\nUNSIGNED-PAYLOAD");
    }

    #[test_log::test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/b%C3%BCcket/my%20key", false).unwrap(), "/bücket/my key");
        assert_eq!(percent_decode("a+b%2B", false).unwrap(), "a+b+");
        assert_eq!(percent_decode("a+b%2B", true).unwrap(), "a b+");
        assert_eq!(percent_decode("%7e%7E", false).unwrap(), "~~");

        let e = percent_decode("abc%4", false).unwrap_err();
        assert_eq!(e.error_code(), "AuthInfoCreationError");
        assert_eq!(e.resource(), "abc%4");
        assert_eq!(e.message(), Some("Incomplete trailing escape % sequence"));

        let e = percent_decode("%G1", false).unwrap_err();
        assert_eq!(e.message(), Some("Illegal hex character in escape % pattern: %G1"));

        let e = percent_decode("%FF", false).unwrap_err();
        assert_eq!(e.resource(), "%FF");
    }

    #[test_log::test]
    fn test_query_string_to_parameters() {
        let query = query_string_to_parameters("a=1&a=2&b&c=x=y&&d=%2F+e").unwrap();
        assert_eq!(query.len(), 4);
        assert_eq!(query.get("a"), Some("1"));
        assert_eq!(query.get("b"), Some(""));
        assert_eq!(query.get("c"), Some("x=y"));
        assert_eq!(query.get("d"), Some("/ e"));

        assert!(query_string_to_parameters("").unwrap().is_empty());
        assert!(query_string_to_parameters("a=%ZZ").is_err());
    }

    #[test_log::test]
    fn test_lower_case_headers() {
        let mut headers = LowerCaseHeaders::new();
        assert!(headers.is_empty());
        assert!(headers.insert("X-Amz-Date", "20130524T000000Z"));
        assert!(!headers.insert("x-amz-date", "20200101T000000Z"));
        assert_eq!(headers.get("X-AMZ-DATE"), Some("20130524T000000Z"));
        assert!(headers.contains("x-amz-date"));
        assert!(!headers.contains("host"));
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("x-amz-date", "20130524T000000Z")]);
        assert_eq!(format!("{:?}", headers), r#"{"x-amz-date": "20130524T000000Z"}"#);

        let mut map = HeaderMap::new();
        map.append("X-Custom", HeaderValue::from_bytes(b"caf\xe9").unwrap());
        map.append("x-custom", HeaderValue::from_static("second"));
        let headers = LowerCaseHeaders::from_header_map(&map);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-custom"), Some("café"));
    }
}
