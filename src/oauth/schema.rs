//! Declarative validation of untyped JSON response bodies.
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s. [`validate`] walks the
//! fields in declared order and stops at the first one that fails, so the
//! reported field is deterministic even when several fields are wrong.
//! An optional field that is absent is skipped; an optional field that is
//! present is held to the same checks as a required one.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use url::Url;

use super::protocol::OAuthErrorCode;

/// Expected shape of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    /// A string that must not be empty.
    NonEmptyString,
    /// A non-negative JSON number, integral or not. Fractions round up to
    /// whole seconds.
    Number,
    /// A string that parses as an absolute URL.
    Url,
    /// A string equal to exactly this value.
    Literal(&'static str),
    /// A string naming a known OAuth error code.
    ErrorCode,
}

/// One declared field of a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub ty: FieldType,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            required: true,
            ty,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            required: false,
            ty,
        }
    }
}

/// Ordered field declarations for one response shape.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// RFC 8628 §3.2 device authorization response.
pub const DEVICE_AUTHORIZATION_RESPONSE: Schema = Schema {
    name: "device authorization response",
    fields: &[
        FieldSpec::required("device_code", FieldType::String),
        FieldSpec::required("user_code", FieldType::String),
        FieldSpec::required("verification_uri", FieldType::Url),
        FieldSpec::required("verification_uri_complete", FieldType::Url),
        FieldSpec::required("expires_in", FieldType::Number),
        FieldSpec::required("interval", FieldType::Number),
    ],
};

/// RFC 6749 §5.1 access token response, restricted to bearer tokens.
pub const TOKEN_RESPONSE: Schema = Schema {
    name: "token response",
    fields: &[
        FieldSpec::required("access_token", FieldType::String),
        FieldSpec::required("token_type", FieldType::Literal("Bearer")),
        FieldSpec::required("expires_in", FieldType::Number),
        FieldSpec::optional("refresh_token", FieldType::NonEmptyString),
        FieldSpec::optional("scope", FieldType::String),
    ],
};

/// RFC 6749 §5.2 error response.
pub const ERROR_RESPONSE: Schema = Schema {
    name: "error response",
    fields: &[
        FieldSpec::required("error", FieldType::ErrorCode),
        FieldSpec::optional("error_description", FieldType::String),
        FieldSpec::optional("error_uri", FieldType::String),
    ],
};

/// Why a field (or the whole body) was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    NotAnObject,
    MalformedJson(String),
    Missing,
    WrongType { expected: &'static str },
    InvalidUrl,
    EmptyString,
    LiteralMismatch { expected: &'static str },
    UnknownErrorCode(String),
    OutOfRange,
}

/// A response body failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    field: Option<&'static str>,
    failure: ValidationFailure,
}

impl ValidationError {
    pub fn new(field: &'static str, failure: ValidationFailure) -> Self {
        Self {
            field: Some(field),
            failure,
        }
    }

    pub fn not_an_object() -> Self {
        Self {
            field: None,
            failure: ValidationFailure::NotAnObject,
        }
    }

    pub fn malformed_json(error: &serde_json::Error) -> Self {
        Self {
            field: None,
            failure: ValidationFailure::MalformedJson(error.to_string()),
        }
    }

    /// The offending field; `None` when the body as a whole was rejected.
    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    pub fn failure(&self) -> &ValidationFailure {
        &self.failure
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.unwrap_or("response");
        match &self.failure {
            ValidationFailure::NotAnObject => write!(f, "expected response to be an object"),
            ValidationFailure::MalformedJson(e) => {
                write!(f, "response body is not valid JSON: {e}")
            }
            ValidationFailure::Missing => write!(f, "missing `{field}`"),
            ValidationFailure::WrongType { expected } => {
                write!(f, "expected `{field}` to be {expected}")
            }
            ValidationFailure::InvalidUrl => {
                write!(f, "expected `{field}` to be an absolute URL")
            }
            ValidationFailure::EmptyString => {
                write!(f, "expected `{field}` to be a non-empty string")
            }
            ValidationFailure::LiteralMismatch { expected } => {
                write!(f, "expected `{field}` to be \"{expected}\"")
            }
            ValidationFailure::UnknownErrorCode(code) => {
                write!(f, "unrecognized `{field}` code \"{code}\"")
            }
            ValidationFailure::OutOfRange => write!(f, "`{field}` is out of range"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validated field value, already converted to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Number(u64),
    Url(Url),
    Code(OAuthErrorCode),
}

/// The fields that passed validation, keyed by name.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    values: BTreeMap<&'static str, FieldValue<'a>>,
}

impl<'a> Fields<'a> {
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// A required string field (plain, non-empty or literal).
    pub fn str(&self, name: &'static str) -> Result<&'a str, ValidationError> {
        self.opt_str(name)?
            .ok_or_else(|| ValidationError::new(name, ValidationFailure::Missing))
    }

    pub fn opt_str(&self, name: &'static str) -> Result<Option<&'a str>, ValidationError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(FieldValue::Str(s)) => Ok(Some(*s)),
            Some(_) => Err(wrong_type(name, "a string")),
        }
    }

    pub fn number(&self, name: &'static str) -> Result<u64, ValidationError> {
        match self.values.get(name) {
            Some(FieldValue::Number(n)) => Ok(*n),
            Some(_) => Err(wrong_type(name, "a number")),
            None => Err(ValidationError::new(name, ValidationFailure::Missing)),
        }
    }

    pub fn url(&self, name: &'static str) -> Result<Url, ValidationError> {
        match self.values.get(name) {
            Some(FieldValue::Url(url)) => Ok(url.clone()),
            Some(_) => Err(ValidationError::new(name, ValidationFailure::InvalidUrl)),
            None => Err(ValidationError::new(name, ValidationFailure::Missing)),
        }
    }

    pub fn error_code(&self, name: &'static str) -> Result<OAuthErrorCode, ValidationError> {
        match self.values.get(name) {
            Some(FieldValue::Code(code)) => Ok(*code),
            Some(_) => Err(wrong_type(name, "an OAuth error code")),
            None => Err(ValidationError::new(name, ValidationFailure::Missing)),
        }
    }
}

/// Validate `value` against `schema`, reporting the first failing field.
pub fn validate<'a>(value: &'a Value, schema: &Schema) -> Result<Fields<'a>, ValidationError> {
    let object = value.as_object().ok_or_else(ValidationError::not_an_object)?;
    let mut values = BTreeMap::new();

    for field in schema.fields {
        match object.get(field.name) {
            None if field.required => {
                return Err(ValidationError::new(field.name, ValidationFailure::Missing));
            }
            None => continue,
            Some(raw) => {
                values.insert(field.name, check_field(field, raw)?);
            }
        }
    }

    Ok(Fields { values })
}

/// Parse a response body and require it to be a JSON object.
pub fn parse_object(body: &str) -> Result<Value, ValidationError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ValidationError::malformed_json(&e))?;
    if !value.is_object() {
        return Err(ValidationError::not_an_object());
    }
    Ok(value)
}

fn check_field<'a>(field: &FieldSpec, raw: &'a Value) -> Result<FieldValue<'a>, ValidationError> {
    let name = field.name;
    match field.ty {
        FieldType::String => as_str(name, raw).map(FieldValue::Str),
        FieldType::NonEmptyString => {
            let s = as_str(name, raw)?;
            if s.is_empty() {
                return Err(ValidationError::new(name, ValidationFailure::EmptyString));
            }
            Ok(FieldValue::Str(s))
        }
        FieldType::Number => whole_seconds(raw)
            .map(FieldValue::Number)
            .ok_or_else(|| wrong_type(name, "a non-negative number")),
        FieldType::Url => {
            let s = as_str(name, raw)?;
            Url::parse(s)
                .map(FieldValue::Url)
                .map_err(|_| ValidationError::new(name, ValidationFailure::InvalidUrl))
        }
        FieldType::Literal(expected) => match raw.as_str() {
            Some(s) if s == expected => Ok(FieldValue::Str(s)),
            _ => Err(ValidationError::new(
                name,
                ValidationFailure::LiteralMismatch { expected },
            )),
        },
        FieldType::ErrorCode => {
            let s = as_str(name, raw)?;
            OAuthErrorCode::from_str(s)
                .map(FieldValue::Code)
                .map_err(|_| {
                    ValidationError::new(name, ValidationFailure::UnknownErrorCode(s.to_string()))
                })
        }
    }
}

fn as_str<'a>(name: &'static str, raw: &'a Value) -> Result<&'a str, ValidationError> {
    raw.as_str().ok_or_else(|| wrong_type(name, "a string"))
}

fn whole_seconds(raw: &Value) -> Option<u64> {
    if let Some(n) = raw.as_u64() {
        return Some(n);
    }
    let f = raw.as_f64()?;
    if !f.is_finite() || f < 0.0 || f.ceil() > u64::MAX as f64 {
        return None;
    }
    Some(f.ceil() as u64)
}

fn wrong_type(name: &'static str, expected: &'static str) -> ValidationError {
    ValidationError::new(name, ValidationFailure::WrongType { expected })
}
