//! S3 error codes and the typed failure raised by the signing pipeline.
//!
//! The codes follow the [S3 error responses](http://docs.aws.amazon.com/AmazonS3/latest/API/ErrorResponses.html)
//! for API version 2006-03-01; a few are gateway-specific.

use {
    http::status::StatusCode,
    lazy_static::lazy_static,
    scratchstack_errors::ServiceError,
    std::{
        collections::HashMap,
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// An entry in the S3 error catalog: a code string, a human-readable description, and the HTTP status
/// returned to the client.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum S3ErrorCode {
    /// The Content-MD5 you specified did not match what we received.
    BadDigest,

    /// The requested bucket name already exists.
    BucketAlreadyExists,

    /// The bucket you tried to delete is not empty.
    BucketNotEmpty,

    /// The specified bucket name is invalid.
    InvalidBucketName,

    /// We encountered an internal error.
    InternalError,

    /// The specified bucket or prefix does not exist.
    NoSuchBucket,

    /// The specified key does not exist.
    NoSuchKey,

    /// The specified multipart upload does not exist.
    NoSuchUpload,

    /// At least one of the preconditions did not hold.
    PreconditionFailed,

    /// The continuation token provided is incorrect.
    InvalidContinuationToken,

    /// The specified multipart upload already exists.
    UploadAlreadyExists,

    /// The authorization header (or presigned query) provided is invalid.
    AuthorizationHeaderMalformed,

    /// The request's signing information could not be turned into a string to sign.
    AuthInfoCreationError,

    /// The user doesn't have the right to access this resource.
    AccessDenied,

    /// Invalid S3 identifier.
    InvalidIdentifier,

    /// No secret manager implementation is configured.
    NotProvidCustomSecretManager,

    /// The specified bucket is not a directory directly under a mount point.
    ///
    /// This reports the `BucketAlreadyExists` code string with a 400 status.
    InvalidNestedBucketName,
}

impl S3ErrorCode {
    /// Every entry in the catalog, in declaration order.
    pub const ALL: [S3ErrorCode; 17] = [
        Self::BadDigest,
        Self::BucketAlreadyExists,
        Self::BucketNotEmpty,
        Self::InvalidBucketName,
        Self::InternalError,
        Self::NoSuchBucket,
        Self::NoSuchKey,
        Self::NoSuchUpload,
        Self::PreconditionFailed,
        Self::InvalidContinuationToken,
        Self::UploadAlreadyExists,
        Self::AuthorizationHeaderMalformed,
        Self::AuthInfoCreationError,
        Self::AccessDenied,
        Self::InvalidIdentifier,
        Self::NotProvidCustomSecretManager,
        Self::InvalidNestedBucketName,
    ];

    /// The code string sent to clients in the `<Code>` element.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadDigest => "BadDigest",
            Self::BucketAlreadyExists | Self::InvalidNestedBucketName => "BucketAlreadyExists",
            Self::BucketNotEmpty => "BucketNotEmpty",
            Self::InvalidBucketName => "InvalidBucketName",
            Self::InternalError => "InternalError",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::NoSuchUpload => "NoSuchUpload",
            Self::PreconditionFailed => "PreconditionFailed",
            Self::InvalidContinuationToken => "InvalidContinuationToken",
            Self::UploadAlreadyExists => "UploadAlreadyExists",
            Self::AuthorizationHeaderMalformed => "AuthorizationHeaderMalformed",
            Self::AuthInfoCreationError => "AuthInfoCreationError",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidIdentifier => "InvalidIdentifier",
            Self::NotProvidCustomSecretManager => "NotProvidCustomSecretManager",
        }
    }

    /// Human-readable description of the error.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::BadDigest => "The Content-MD5 you specified did not match what we received.",
            Self::BucketAlreadyExists => "The requested bucket name already exists",
            Self::BucketNotEmpty => "The bucket you tried to delete is not empty",
            Self::InvalidBucketName => "The specified bucket name is invalid",
            Self::InternalError => "We encountered an internal error. Please try again.",
            Self::NoSuchBucket => "The specified bucket or prefix does not exist",
            Self::NoSuchKey => "The specified key does not exist",
            Self::NoSuchUpload => {
                "The specified multipart upload does not exist. The upload ID might be invalid, or the multipart \
                 upload might have been aborted or completed."
            }
            Self::PreconditionFailed => "At least one of the preconditions did not hold",
            Self::InvalidContinuationToken => "The continuation token provided is incorrect",
            Self::UploadAlreadyExists => "The specified multipart upload already exits",
            Self::AuthorizationHeaderMalformed => "The authorization header provided is invalid.",
            Self::AuthInfoCreationError => "Error creating s3 auth info",
            Self::AccessDenied => "User doesn't have the right to access this resource",
            Self::InvalidIdentifier => "Invalid S3 identifier",
            Self::NotProvidCustomSecretManager => "Not found implementation for S3SecretManager",
            Self::InvalidNestedBucketName => "The specified bucket is not a directory directly under a mount point",
        }
    }

    /// The HTTP status returned alongside this error.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::BadDigest
            | Self::InvalidBucketName
            | Self::InvalidContinuationToken
            | Self::AuthorizationHeaderMalformed
            | Self::AuthInfoCreationError
            | Self::InvalidNestedBucketName => StatusCode::BAD_REQUEST,
            Self::AccessDenied | Self::InvalidIdentifier => StatusCode::FORBIDDEN,
            Self::NoSuchBucket | Self::NoSuchKey | Self::NoSuchUpload => StatusCode::NOT_FOUND,
            Self::BucketAlreadyExists | Self::BucketNotEmpty | Self::UploadAlreadyExists => StatusCode::CONFLICT,
            Self::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            Self::InternalError | Self::NotProvidCustomSecretManager => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Look up a catalog entry by its code string.
    ///
    /// Codes shared by more than one entry resolve to the entry that owns the code, so
    /// `"BucketAlreadyExists"` always yields [`S3ErrorCode::BucketAlreadyExists`].
    pub fn from_code(code: &str) -> Option<Self> {
        CATALOG.get(code).copied()
    }
}

impl Display for S3ErrorCode {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.code())
    }
}

lazy_static! {
    static ref CATALOG: HashMap<&'static str, S3ErrorCode> = {
        let mut catalog = HashMap::with_capacity(S3ErrorCode::ALL.len());
        for code in S3ErrorCode::ALL {
            catalog.entry(code.code()).or_insert(code);
        }
        catalog
    };
}

/// Error raised by the gateway when signing or request handling fails.
///
/// This pairs a catalog entry with the resource the failure concerns: usually the offending header
/// value, path, or query parameter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct S3Error {
    code: S3ErrorCode,
    resource: String,
    message: Option<String>,
}

impl S3Error {
    /// Create a new error for the given catalog entry and resource.
    pub fn new<R: Into<String>>(code: S3ErrorCode, resource: R) -> Self {
        Self {
            code,
            resource: resource.into(),
            message: None,
        }
    }

    /// Attach a detail message, replacing the catalog description in the display form.
    pub fn with_message<M: Into<String>>(mut self, message: M) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Shorthand for an `AuthInfoCreationError` concerning `resource`.
    pub fn auth_info_creation<R: Into<String>>(resource: R) -> Self {
        Self::new(S3ErrorCode::AuthInfoCreationError, resource)
    }

    /// Shorthand for an `AuthorizationHeaderMalformed` error with a detail message.
    pub fn authorization_header_malformed<R: Into<String>, M: Into<String>>(resource: R, message: M) -> Self {
        Self::new(S3ErrorCode::AuthorizationHeaderMalformed, resource).with_message(message)
    }

    /// The catalog entry for this error.
    #[inline(always)]
    pub fn code(&self) -> S3ErrorCode {
        self.code
    }

    /// The resource this error concerns.
    #[inline(always)]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The detail message, if one was attached.
    #[inline(always)]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn error_code(&self) -> &'static str {
        self.code.code()
    }

    fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl ServiceError for S3Error {
    fn error_code(&self) -> &'static str {
        S3Error::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        S3Error::http_status(self)
    }
}

impl Display for S3Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let message = self.message.as_deref().unwrap_or(self.code.description());
        if self.resource.is_empty() {
            f.write_str(message)
        } else {
            write!(f, "{} (resource: {})", message, self.resource)
        }
    }
}

impl Error for S3Error {}
