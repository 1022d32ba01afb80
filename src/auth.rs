use {
    crate::{
        signature::create_signature_base_for_request,
        validator::{Clock, HostResolver, SignedHeaderValidator},
        RequestView, S3Error, SignatureInfo,
    },
    derive_builder::Builder,
    log::debug,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// The result of authenticating an S3 request: the string to sign produced by the gateway, the
/// signature the client sent, and the access key id it was sent under.
///
/// An authorization layer looks up the secret for `access_id`, signs `string_to_sign`, and compares
/// the result to `signature`.
#[derive(Builder, Clone, Debug, Eq, Hash, PartialEq)]
#[builder(setter(into), derive(Debug))]
pub struct S3Auth {
    string_to_sign: String,
    signature: String,
    access_id: String,
}

impl S3Auth {
    /// Create a new `S3Auth` from its components.
    pub fn new<S, G, A>(string_to_sign: S, signature: G, access_id: A) -> Self
    where
        S: Into<String>,
        G: Into<String>,
        A: Into<String>,
    {
        Self {
            string_to_sign: string_to_sign.into(),
            signature: signature.into(),
            access_id: access_id.into(),
        }
    }

    /// Create a builder for `S3Auth`.
    #[inline(always)]
    pub fn builder() -> S3AuthBuilder {
        S3AuthBuilder::default()
    }

    /// The string to sign.
    #[inline(always)]
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// The client-supplied signature.
    #[inline(always)]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The access key id.
    #[inline(always)]
    pub fn access_id(&self) -> &str {
        &self.access_id
    }
}

impl Display for S3Auth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "S3Auth{{StringToSign={}, Signature={}, AccessID={}}}",
            self.string_to_sign, self.signature, self.access_id
        )
    }
}

/// Extract the signing information from `request` and produce its [`S3Auth`].
///
/// For presigned URLs, `X-Amz-Date` plus `X-Amz-Expires` must not be earlier than the validator's
/// clock.
///
/// # Errors
/// Returns an error if the request carries no usable authentication, if a presigned URL has
/// expired, or if the string to sign cannot be produced.
pub fn create_s3_auth<R, C>(request: &RequestView, validator: &SignedHeaderValidator<R, C>) -> Result<S3Auth, S3Error>
where
    R: HostResolver,
    C: Clock,
{
    let signature_info = SignatureInfo::from_request(request)?;
    if signature_info.presigned() {
        validator.validate_presigned_expiry(signature_info.date_time(), signature_info.expires())?;
    }

    let string_to_sign = create_signature_base_for_request(&signature_info, request, validator)?;
    let auth = S3Auth::new(string_to_sign, signature_info.signature(), signature_info.access_id());
    debug!("create_s3_auth: access_id={}", auth.access_id());
    Ok(auth)
}
