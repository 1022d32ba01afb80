//! Semantic checks applied to individual signed headers while the canonical request is built.
//!
//! Host resolution and the current time are reached through the [`HostResolver`] and [`Clock`]
//! traits so deployments (and tests) can substitute their own.

use {
    crate::{
        chronoutil::ParseCompactISO8601,
        constants::{
            HDR_HOST, HDR_X_AMZ_CONTENT_SHA256, HDR_X_AMZ_DATE, ISO8601_COMPACT_FORMAT, MSG_REQUEST_EXPIRED,
            MSG_REQUEST_NOT_YET_VALID,
        },
        DateCheck, S3Error, S3ErrorCode, SignatureOptions,
    },
    chrono::{DateTime, Duration, NaiveDate, Utc},
    http::uri::Uri,
    log::{error, trace},
    std::{
        io::{Error as IOError, ErrorKind, Result as IOResult},
        net::ToSocketAddrs,
    },
};

/// Resolves the host named in a signed `host` header.
pub trait HostResolver {
    /// Succeeds if `host` (a name or IP literal, without port) resolves to at least one address.
    fn resolve(&self, host: &str) -> IOResult<()>;
}

/// Resolves hosts through the operating system resolver. This blocks the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, host: &str) -> IOResult<()> {
        let mut addrs = (host, 0).to_socket_addrs()?;
        addrs
            .next()
            .map(|_| ())
            .ok_or_else(|| IOError::new(ErrorKind::NotFound, format!("No addresses found for '{}'", host)))
    }
}

/// Accepts any host that parses as part of a URI authority, without resolving it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntaxOnlyResolver;

impl HostResolver for SyntaxOnlyResolver {
    #[inline(always)]
    fn resolve(&self, _host: &str) -> IOResult<()> {
        Ok(())
    }
}

impl<F> HostResolver for F
where
    F: Fn(&str) -> IOResult<()>,
{
    #[inline(always)]
    fn resolve(&self, host: &str) -> IOResult<()> {
        self(host)
    }
}

/// Source of the current time for timestamp validation.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline(always)]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A fixed point in time acts as a clock that never moves.
impl Clock for DateTime<Utc> {
    #[inline(always)]
    fn now(&self) -> DateTime<Utc> {
        *self
    }
}

/// Validates signed header values before they are emitted into a canonical request.
///
/// * `host` must form a valid URI authority with the request scheme, and its host must resolve.
/// * `x-amz-date` must be a `yyyyMMdd'T'HHmmss'Z'` timestamp within the presign window of the
///   clock's current time.
/// * All other headers are accepted as-is.
#[derive(Clone, Debug, Default)]
pub struct SignedHeaderValidator<R = SystemResolver, C = SystemClock> {
    resolver: R,
    clock: C,
    options: SignatureOptions,
}

impl<R, C> SignedHeaderValidator<R, C> {
    /// Create a validator from a resolver, a clock, and options.
    pub const fn new(resolver: R, clock: C, options: SignatureOptions) -> Self {
        Self {
            resolver,
            clock,
            options,
        }
    }

    /// The options this validator was created with.
    #[inline(always)]
    pub fn options(&self) -> &SignatureOptions {
        &self.options
    }
}

impl<R, C> SignedHeaderValidator<R, C>
where
    R: HostResolver,
    C: Clock,
{
    /// Validate a single signed header. `header` must already be lowercase.
    ///
    /// # Errors
    /// Returns an `AuthInfoCreationError` carrying the header value if the value is unacceptable.
    pub fn validate(&self, scheme: &str, header: &str, value: &str) -> Result<(), S3Error> {
        match header {
            HDR_HOST => self.validate_host(scheme, value),
            HDR_X_AMZ_DATE => self.validate_date(value),
            HDR_X_AMZ_CONTENT_SHA256 => Ok(()),
            _ => Ok(()),
        }
    }

    fn validate_host(&self, scheme: &str, value: &str) -> Result<(), S3Error> {
        let host = format!("{}://{}", scheme, value)
            .parse::<Uri>()
            .ok()
            .and_then(|uri| uri.host().map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string()))
            .filter(|h| !h.is_empty());

        let Some(host) = host else {
            error!("Host value mentioned in signed header is not valid. Host:{}", value);
            return Err(S3Error::auth_info_creation(value));
        };

        if let Err(e) = self.resolver.resolve(&host) {
            error!("Host value mentioned in signed header is not valid. Host:{}: {}", value, e);
            return Err(S3Error::auth_info_creation(value));
        }

        trace!("validate_host: {} resolved", host);
        Ok(())
    }

    fn validate_date(&self, value: &str) -> Result<(), S3Error> {
        let Ok(timestamp) = DateTime::<Utc>::parse_from_compact_iso8601(value) else {
            error!("AWS date is not in {} format. Request timestamp:{}", ISO8601_COMPACT_FORMAT, value);
            return Err(S3Error::auth_info_creation(value));
        };

        let now = self.clock.now();
        let window = self.options.presign_window;

        let in_range = match self.options.date_check {
            DateCheck::Instant => {
                let min_ts = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
                let max_ts = now.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC);
                trace!("validate_date: {} must be between {} and {}", timestamp, min_ts, max_ts);
                min_ts <= timestamp && timestamp <= max_ts
            }
            DateCheck::CalendarDay => {
                let date = timestamp.date_naive();
                let today = now.date_naive();
                let min_date = today.checked_sub_signed(window).unwrap_or(NaiveDate::MIN);
                let max_date = today.checked_add_signed(window).unwrap_or(NaiveDate::MAX);
                trace!("validate_date: {} must be between {} and {}", date, min_date, max_date);
                min_date <= date && date <= max_date
            }
        };

        if !in_range {
            error!(
                "AWS date not in valid range. Request timestamp:{} should be within {} seconds of {}.",
                value,
                window.num_seconds(),
                now.format(ISO8601_COMPACT_FORMAT)
            );
            return Err(S3Error::auth_info_creation(value));
        }

        Ok(())
    }

    /// Check the lifetime of a presigned URL: the clock's now must not be past `date_time` plus
    /// `expires` (the presign window if the client gave none), and `date_time` must not lie more
    /// than the presign window in the future.
    ///
    /// # Errors
    /// Returns `AccessDenied` carrying `date_time` if the URL has expired or is not valid yet, and
    /// `AuthInfoCreationError` if `date_time` is malformed.
    pub fn validate_presigned_expiry(&self, date_time: &str, expires: Option<Duration>) -> Result<(), S3Error> {
        let Ok(timestamp) = DateTime::<Utc>::parse_from_compact_iso8601(date_time) else {
            error!("AWS date is not in {} format. Request timestamp:{}", ISO8601_COMPACT_FORMAT, date_time);
            return Err(S3Error::auth_info_creation(date_time));
        };

        let now = self.clock.now();
        let window = self.options.presign_window;
        let expires = expires.unwrap_or(window);

        let latest_date = now.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC);
        if timestamp > latest_date {
            error!("Presigned URL dated {} is more than {} seconds ahead of {}", date_time, window.num_seconds(), now);
            return Err(S3Error::new(S3ErrorCode::AccessDenied, date_time).with_message(MSG_REQUEST_NOT_YET_VALID));
        }

        let expiration = timestamp.checked_add_signed(expires).unwrap_or(DateTime::<Utc>::MAX_UTC);
        trace!("validate_presigned_expiry: {} must not be after {}", now, expiration);
        if now > expiration {
            error!("Presigned URL dated {} expired at {}; now is {}", date_time, expiration, now);
            return Err(S3Error::new(S3ErrorCode::AccessDenied, date_time).with_message(MSG_REQUEST_EXPIRED));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{
            DateCheck, S3Error, SignatureOptions, SignedHeaderValidator, SyntaxOnlyResolver, SystemClock,
            SystemResolver,
        },
        chrono::{DateTime, Duration, NaiveDate, Utc},
        std::{
            cell::RefCell,
            io::{Error as IOError, ErrorKind, Result as IOResult},
        },
    };

    macro_rules! expect_auth_info_err {
        ($test:expr, $resource:expr) => {
            match $test {
                Ok(ref v) => panic!("Expected Err(AuthInfoCreationError); got Ok({:?})", v),
                Err(ref e) => {
                    assert_eq!(scratchstack_errors::ServiceError::error_code(e), "AuthInfoCreationError");
                    assert_eq!(scratchstack_errors::ServiceError::http_status(e), 400);
                    assert_eq!(e.resource(), $resource);
                }
            }
        };
    }

    fn now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap().and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn fixed_validator(options: SignatureOptions) -> SignedHeaderValidator<SyntaxOnlyResolver, DateTime<Utc>> {
        SignedHeaderValidator::new(SyntaxOnlyResolver, now(), options)
    }

    #[test_log::test]
    fn test_other_headers_accepted() {
        let v = fixed_validator(SignatureOptions::default());
        v.validate("http", "x-amz-content-sha256", "not even a hash").unwrap();
        v.validate("http", "range", "bytes=0-9").unwrap();
        v.validate("http", "content-type", "").unwrap();
    }

    #[test_log::test]
    fn test_date_window_instant() {
        let v = fixed_validator(SignatureOptions::default());
        v.validate("http", "x-amz-date", "20240108T120000Z").unwrap();
        v.validate("http", "x-amz-date", "20240101T120000Z").unwrap();
        v.validate("http", "x-amz-date", "20240115T120000Z").unwrap();

        expect_auth_info_err!(v.validate("http", "x-amz-date", "20240101T115959Z"), "20240101T115959Z");
        expect_auth_info_err!(v.validate("http", "x-amz-date", "20240115T120001Z"), "20240115T120001Z");
        expect_auth_info_err!(v.validate("http", "x-amz-date", "20200101T000000Z"), "20200101T000000Z");
    }

    #[test_log::test]
    fn test_date_window_calendar_day() {
        let v = fixed_validator(SignatureOptions::default().with_date_check(DateCheck::CalendarDay));
        v.validate("http", "x-amz-date", "20240101T000000Z").unwrap();
        v.validate("http", "x-amz-date", "20240115T235959Z").unwrap();

        expect_auth_info_err!(v.validate("http", "x-amz-date", "20231231T235959Z"), "20231231T235959Z");
        expect_auth_info_err!(v.validate("http", "x-amz-date", "20240116T000000Z"), "20240116T000000Z");
    }

    #[test_log::test]
    fn test_date_custom_window() {
        let v = fixed_validator(SignatureOptions::default().with_presign_window(Duration::minutes(15)));
        v.validate("http", "x-amz-date", "20240108T121500Z").unwrap();
        expect_auth_info_err!(v.validate("http", "x-amz-date", "20240108T121501Z"), "20240108T121501Z");
    }

    #[test_log::test]
    fn test_date_malformed() {
        let v = fixed_validator(SignatureOptions::default());
        for bad in ["", "2024-01-08T12:00:00Z", "20240108T120000", "Mon, 08 Jan 2024 12:00:00 GMT"] {
            expect_auth_info_err!(v.validate("http", "x-amz-date", bad), bad);
        }
    }

    #[test_log::test]
    fn test_host_resolution_uses_resolver() {
        let seen = RefCell::new(Vec::new());
        let resolver = |host: &str| -> IOResult<()> {
            seen.borrow_mut().push(host.to_string());
            if host.ends_with(".invalid") {
                Err(IOError::new(ErrorKind::NotFound, "no such host"))
            } else {
                Ok(())
            }
        };
        let v = SignedHeaderValidator::new(resolver, now(), SignatureOptions::default());

        v.validate("http", "host", "s3.example.com").unwrap();
        v.validate("https", "host", "s3.example.com:9000").unwrap();
        v.validate("http", "host", "[::1]:9000").unwrap();
        expect_auth_info_err!(v.validate("http", "host", "bucket.s3.invalid"), "bucket.s3.invalid");

        assert_eq!(*seen.borrow(), vec!["s3.example.com", "s3.example.com", "::1", "bucket.s3.invalid"]);
    }

    #[test_log::test]
    fn test_host_syntax() {
        let v = fixed_validator(SignatureOptions::default());
        expect_auth_info_err!(v.validate("http", "host", ""), "");
        expect_auth_info_err!(v.validate("http", "host", "bad host"), "bad host");
        expect_auth_info_err!(v.validate("http", "host", "bad<host>"), "bad<host>");
    }

    #[test_log::test]
    fn test_system_resolver_ip_literal() {
        // IP literals never touch DNS.
        let v = SignedHeaderValidator::new(SystemResolver, SystemClock, SignatureOptions::default());
        v.validate("http", "host", "127.0.0.1:8080").unwrap();
        v.validate("http", "host", "[::1]").unwrap();
    }

    #[test_log::test]
    fn test_default_validator() {
        let v: SignedHeaderValidator = SignedHeaderValidator::default();
        assert_eq!(v.options().presign_window, Duration::seconds(604800));
        assert_eq!(v.options().date_check, DateCheck::Instant);
        let e: Result<(), S3Error> = v.validate("http", "x-amz-date", "19700101T000000Z");
        expect_auth_info_err!(e, "19700101T000000Z");
    }

    #[test_log::test]
    fn test_date_oversized_window() {
        // Long enough to overflow the representable range on both sides of now.
        let huge = Duration::days(100_000_000);
        for date_check in [DateCheck::Instant, DateCheck::CalendarDay] {
            let v = fixed_validator(
                SignatureOptions::default().with_presign_window(huge).with_date_check(date_check),
            );
            v.validate("http", "x-amz-date", "20000101T000000Z").unwrap();
            v.validate("http", "x-amz-date", "20240108T120000Z").unwrap();
            v.validate("http", "x-amz-date", "20500101T000000Z").unwrap();
        }

        let v = fixed_validator(SignatureOptions::default().with_presign_window(huge));
        v.validate_presigned_expiry("20000101T000000Z", None).unwrap();
    }

    fn expect_access_denied(result: Result<(), S3Error>, resource: &str, message: &str) {
        let e = result.unwrap_err();
        assert_eq!(scratchstack_errors::ServiceError::error_code(&e), "AccessDenied");
        assert_eq!(scratchstack_errors::ServiceError::http_status(&e), 403);
        assert_eq!(e.resource(), resource);
        assert_eq!(e.message(), Some(message));
    }

    #[test_log::test]
    fn test_presigned_expiry() {
        let v = fixed_validator(SignatureOptions::default());
        let one_second = Some(Duration::seconds(1));

        v.validate_presigned_expiry("20240108T120000Z", one_second).unwrap();
        v.validate_presigned_expiry("20240108T115959Z", one_second).unwrap();
        expect_access_denied(
            v.validate_presigned_expiry("20240108T115958Z", one_second),
            "20240108T115958Z",
            "Request has expired",
        );
        expect_access_denied(
            v.validate_presigned_expiry("20130524T000000Z", one_second),
            "20130524T000000Z",
            "Request has expired",
        );

        // Without X-Amz-Expires the presign window applies.
        v.validate_presigned_expiry("20240101T120000Z", None).unwrap();
        expect_access_denied(
            v.validate_presigned_expiry("20240101T115959Z", None),
            "20240101T115959Z",
            "Request has expired",
        );
    }

    #[test_log::test]
    fn test_presigned_not_yet_valid() {
        let v = fixed_validator(SignatureOptions::default());
        v.validate_presigned_expiry("20240115T120000Z", Some(Duration::seconds(60))).unwrap();
        expect_access_denied(
            v.validate_presigned_expiry("20240115T120001Z", Some(Duration::seconds(60))),
            "20240115T120001Z",
            "Request is not valid yet",
        );
    }

    #[test_log::test]
    fn test_presigned_malformed_date() {
        let v = fixed_validator(SignatureOptions::default());
        expect_auth_info_err!(v.validate_presigned_expiry("2024-01-08T12:00:00Z", None), "2024-01-08T12:00:00Z");
    }
}
