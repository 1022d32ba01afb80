//! Extraction of [`SignatureInfo`] from the `Authorization` header or from presigned URL query
//! parameters.

use {
    crate::{
        chronoutil::ParseCompactISO8601, constants::*, LowerCaseHeaders, QueryParameters, RequestView, S3Error,
        S3ErrorCode, SignatureInfo,
    },
    chrono::{DateTime, Duration, Utc},
    log::{debug, trace},
    std::collections::HashMap,
};

/// The access key id and credential scope from a `Credential` value.
struct Credential<'a> {
    access_id: &'a str,
    scope: &'a str,
}

/// Split `keyid/date/region/service/aws4_request` into the access key id and the scope.
fn parse_credential(credential: &str) -> Result<Credential<'_>, S3Error> {
    let parts: Vec<&str> = credential.split('/').collect();
    if parts.len() != 5 {
        return Err(S3Error::authorization_header_malformed(
            credential,
            format!("{} got '{}'", MSG_CREDENTIAL_MUST_HAVE_FIVE_PARTS, credential),
        ));
    }

    if parts[4] != AWS4_REQUEST {
        return Err(S3Error::authorization_header_malformed(
            credential,
            format!("Credential should be scoped with a valid terminator: '{}', not '{}'.", AWS4_REQUEST, parts[4]),
        ));
    }

    let (access_id, scope) = credential.split_once('/').unwrap_or((credential, ""));
    Ok(Credential {
        access_id,
        scope,
    })
}

/// Make sure a request timestamp is in `yyyyMMdd'T'HHmmss'Z'` form. `source` names the header or
/// query parameter the timestamp came from.
fn check_timestamp(source: &str, timestamp: &str) -> Result<(), S3Error> {
    if timestamp.len() != ISO8601_UTC_LENGTH || DateTime::<Utc>::parse_from_compact_iso8601(timestamp).is_err() {
        return Err(S3Error::authorization_header_malformed(
            source,
            format!(
                "Date must be in ISO-8601 'basic format'. Got '{}'. See http://en.wikipedia.org/wiki/ISO_8601",
                timestamp
            ),
        ));
    }

    Ok(())
}

impl SignatureInfo {
    /// Extract signing information from a request, using the `Authorization` header if present and
    /// the presigned query parameters otherwise.
    ///
    /// # Errors
    /// Returns `AccessDenied` if the request carries neither (or both) forms of authentication, and
    /// `AuthorizationHeaderMalformed` if the one present is incomplete.
    pub fn from_request(request: &RequestView) -> Result<Self, S3Error> {
        let auth_header = request.headers().get(HDR_AUTHORIZATION);
        let query_alg = request.query().get(QP_X_AMZ_ALGORITHM);

        match (auth_header, query_alg) {
            (Some(auth_header), None) => Self::from_authorization_header(auth_header, request.headers()),
            (None, Some(_)) => Self::from_presigned_query(request.query()),
            (Some(_), Some(_)) => Err(S3Error::new(S3ErrorCode::AccessDenied, request.path())
                .with_message("Only one auth mechanism allowed; only the X-Amz-Algorithm query parameter or the Authorization header should be specified")),
            (None, None) => Err(S3Error::new(S3ErrorCode::AccessDenied, request.path())
                .with_message(MSG_REQUEST_MISSING_AUTH_TOKEN)),
        }
    }

    /// Parse an `Authorization` header of the form
    /// `AWS4-HMAC-SHA256 Credential=<key>/<scope>, SignedHeaders=<list>, Signature=<hex>`.
    ///
    /// The timestamp comes from the `x-amz-date` header. The payload is treated as signed unless
    /// `x-amz-content-sha256` is `UNSIGNED-PAYLOAD`.
    ///
    /// # Errors
    /// Returns `AuthorizationHeaderMalformed` if the header uses another algorithm, is missing a
    /// parameter, or the `x-amz-date` header is missing or malformed.
    pub fn from_authorization_header(auth_header: &str, headers: &LowerCaseHeaders) -> Result<Self, S3Error> {
        let auth_header = auth_header.trim();

        let (algorithm, parameters) = match auth_header.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((algorithm, parameters)) => (algorithm, parameters),
            None => (auth_header, ""),
        };

        if algorithm != AWS4_HMAC_SHA256 {
            return Err(S3Error::authorization_header_malformed(
                auth_header,
                format!("{}'{}'.", MSG_UNSUPPORTED_ALGORITHM, algorithm),
            ));
        }

        let mut parameter_map = HashMap::new();
        for parameter in parameters.split(',').map(str::trim) {
            if parameter.is_empty() {
                continue;
            }

            let Some((key, value)) = parameter.split_once('=') else {
                return Err(S3Error::authorization_header_malformed(
                    auth_header,
                    format!(
                        "'{}' not a valid key=value pair (missing equal-sign) in Authorization header: '{}'",
                        parameter, auth_header
                    ),
                ));
            };

            // Later values for the same key overwrite earlier ones.
            parameter_map.insert(key.trim(), value.trim());
        }

        let mut missing_messages = Vec::new();
        let credential = parameter_map.get(CREDENTIAL).copied();
        let signature = parameter_map.get(SIGNATURE).copied();
        let signed_headers = parameter_map.get(SIGNED_HEADERS).copied();
        let date_time = headers.get(HDR_X_AMZ_DATE);

        if credential.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_CREDENTIAL);
        }
        if signature.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_SIGNATURE);
        }
        if signed_headers.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_SIGNED_HEADERS);
        }
        if date_time.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_DATE);
        }

        let (Some(credential), Some(signature), Some(signed_headers), Some(date_time)) =
            (credential, signature, signed_headers, date_time)
        else {
            return Err(S3Error::authorization_header_malformed(
                auth_header,
                format!("{} Authorization={}", missing_messages.join(" "), algorithm),
            ));
        };

        let credential = parse_credential(credential)?;
        check_timestamp(HDR_X_AMZ_DATE, date_time)?;

        let sign_payload = headers.get(HDR_X_AMZ_CONTENT_SHA256) != Some(XACS_UNSIGNED_PAYLOAD);
        trace!(
            "Authorization header: access_id={} scope={} signed_headers={} sign_payload={}",
            credential.access_id,
            credential.scope,
            signed_headers,
            sign_payload
        );

        Self::builder()
            .algorithm(algorithm)
            .credential_scope(credential.scope)
            .date_time(date_time)
            .signed_headers(signed_headers)
            .sign_payload(sign_payload)
            .access_id(credential.access_id)
            .signature(signature)
            .build()
            .map_err(|e| S3Error::new(S3ErrorCode::InternalError, "").with_message(e.to_string()))
    }

    /// Parse the `X-Amz-*` parameters of a presigned URL. Presigned requests never sign the payload.
    ///
    /// # Errors
    /// Returns `AuthorizationHeaderMalformed` if the algorithm is unsupported, a parameter is
    /// missing, or `X-Amz-Expires` is not an integer between 0 and 604800.
    pub fn from_presigned_query(query: &QueryParameters) -> Result<Self, S3Error> {
        let algorithm = query.get(QP_X_AMZ_ALGORITHM).unwrap_or("");
        if algorithm != AWS4_HMAC_SHA256 {
            return Err(S3Error::authorization_header_malformed(
                QP_X_AMZ_ALGORITHM,
                format!("{}'{}'.", MSG_UNSUPPORTED_ALGORITHM, algorithm),
            ));
        }

        let credential = query.get(QP_X_AMZ_CREDENTIAL);
        let date_time = query.get(QP_X_AMZ_DATE);
        let signed_headers = query.get(QP_X_AMZ_SIGNED_HEADERS);
        let signature = query.get(QP_X_AMZ_SIGNATURE);

        let missing: Vec<&str> = [
            (QP_X_AMZ_CREDENTIAL, credential),
            (QP_X_AMZ_DATE, date_time),
            (QP_X_AMZ_SIGNED_HEADERS, signed_headers),
            (QP_X_AMZ_SIGNATURE, signature),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect();

        let (Some(credential), Some(date_time), Some(signed_headers), Some(signature)) =
            (credential, date_time, signed_headers, signature)
        else {
            let message = missing
                .iter()
                .map(|name| format!("AWS query-string parameters must include '{}'.", name))
                .collect::<Vec<String>>()
                .join(" ");
            return Err(S3Error::authorization_header_malformed(
                missing.join(","),
                format!("{} Re-examine the query-string parameters.", message),
            ));
        };

        let expires = match query.get(QP_X_AMZ_EXPIRES) {
            None => None,
            Some(expires) => match expires.parse::<i64>() {
                Ok(seconds) if (0..=PRESIGN_URL_MAX_EXPIRATION_SECONDS).contains(&seconds) => {
                    debug!("Presigned URL expires {} seconds after {}", seconds, date_time);
                    Some(Duration::seconds(seconds))
                }
                Ok(_) => {
                    return Err(S3Error::authorization_header_malformed(
                        expires,
                        format!(
                            "X-Amz-Expires must be less than a week (in seconds) that is {}",
                            PRESIGN_URL_MAX_EXPIRATION_SECONDS
                        ),
                    ))
                }
                Err(_) => {
                    return Err(S3Error::authorization_header_malformed(
                        expires,
                        "X-Amz-Expires should be a number",
                    ))
                }
            },
        };

        let credential = parse_credential(credential)?;
        check_timestamp(QP_X_AMZ_DATE, date_time)?;

        Self::builder()
            .algorithm(algorithm)
            .credential_scope(credential.scope)
            .date_time(date_time)
            .signed_headers(signed_headers)
            .sign_payload(false)
            .access_id(credential.access_id)
            .signature(signature)
            .presigned(true)
            .expires(expires)
            .build()
            .map_err(|e| S3Error::new(S3ErrorCode::InternalError, "").with_message(e.to_string()))
    }
}
