//! Validation and output projection for [`Sample`] records.
//!
//! Every field is described by a row in [`SAMPLE_FIELDS`]: its name, its
//! [`Access`] and, for writable fields, the parser turning a JSON value into
//! the typed payload. Input validation walks the writable rows, output
//! projection walks the readable ones.

use std::str::FromStr;

use serde_json::{Map, Value};
use sermo_types::{
    FieldErrors,
    error::{NOT_NULL, REQUIRED},
    general::{ShortText, ValidEmail, ValidSlug},
};
use tracing::debug;

use crate::{
    error::SaveError,
    sample::{CreateSample, Sample, SampleData},
    store::SampleStore,
};

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const MAX_NUMERIC_STRING: usize = 1000;
const INVALID_STRING: &str = "Not a valid string.";
const BLANK: &str = "This field may not be blank.";
const INVALID_INTEGER: &str = "A valid integer is required.";
const INVALID_NUMBER: &str = "A valid number is required.";
const INVALID_BOOLEAN: &str = "Must be a valid boolean.";
const NUMBER_TOO_LONG: &str = "String value too large.";

const TRUE_VALUES: &[&str] = &[
    "t", "T", "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON", "1",
];
const FALSE_VALUES: &[&str] = &[
    "f", "F", "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF", "0",
];

/// Which directions a field travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub read: bool,
    pub write: bool,
}

impl Access {
    pub const READ_WRITE: Access = Access {
        read: true,
        write: true,
    };
    pub const READ_ONLY: Access = Access {
        read: true,
        write: false,
    };
    pub const WRITE_ONLY: Access = Access {
        read: false,
        write: true,
    };
}

type FieldResult<T = ()> = Result<T, Vec<String>>;
type Parser = fn(&mut SampleDraft, &Value) -> FieldResult;
type Reader = fn(&Sample) -> Value;

pub struct FieldSpec {
    pub name: &'static str,
    pub access: Access,
    parse: Option<Parser>,
    read: Reader,
}

pub const SAMPLE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "id",
        access: Access::READ_ONLY,
        parse: None,
        read: |s| Value::from(s.id),
    },
    FieldSpec {
        name: "text",
        access: Access::READ_WRITE,
        parse: Some(parse_text),
        read: |s| Value::from(s.text.as_str()),
    },
    FieldSpec {
        name: "number",
        access: Access::READ_WRITE,
        parse: Some(parse_number),
        read: |s| Value::from(s.number),
    },
    FieldSpec {
        name: "is_something",
        access: Access::READ_WRITE,
        parse: Some(parse_is_something),
        read: |s| Value::from(s.is_something),
    },
    FieldSpec {
        name: "email",
        access: Access::READ_WRITE,
        parse: Some(parse_email),
        read: |s| Value::from(s.email.as_str()),
    },
    FieldSpec {
        name: "slug",
        access: Access::READ_WRITE,
        parse: Some(parse_slug),
        read: |s| Value::from(s.slug.as_str()),
    },
    FieldSpec {
        name: "real",
        access: Access::READ_WRITE,
        parse: Some(parse_real),
        read: |s| Value::from(s.real),
    },
    FieldSpec {
        name: "password",
        access: Access::WRITE_ONLY,
        parse: Some(parse_password),
        read: |s| Value::from(s.password.as_str()),
    },
    FieldSpec {
        name: "generated",
        access: Access::READ_ONLY,
        parse: None,
        read: |s| Value::from(s.generated.as_str()),
    },
];

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    SAMPLE_FIELDS.iter().find(|f| f.name == name)
}

#[derive(Default)]
struct SampleDraft {
    text: Option<ShortText>,
    number: Option<i64>,
    is_something: Option<bool>,
    email: Option<ValidEmail>,
    slug: Option<ValidSlug>,
    real: Option<f64>,
    password: Option<ShortText>,
}

impl SampleDraft {
    fn finish(self) -> Option<CreateSample> {
        Some(CreateSample {
            text: self.text?,
            number: self.number?,
            is_something: self.is_something?,
            email: self.email?,
            slug: self.slug?,
            real: self.real?,
            password: self.password?,
        })
    }
}

fn report_messages(report: garde::Report) -> Vec<String> {
    report
        .iter()
        .map(|(_, error)| error.message().to_string())
        .collect()
}

fn invalid<T>(message: &str) -> FieldResult<T> {
    Err(vec![message.to_string()])
}

/// Strings are trimmed, numbers take their textual form.
fn as_string(value: &Value) -> FieldResult<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => invalid(INVALID_STRING),
    }
}

fn validated<T>(value: &Value) -> FieldResult<T>
where
    T: FromStr<Err = garde::Report>,
{
    let s = as_string(value)?;
    if s.is_empty() {
        return invalid(BLANK);
    }
    s.parse::<T>().map_err(report_messages)
}

fn integer_from_str(s: &str) -> FieldResult<i64> {
    let s = s.trim();
    if s.len() > MAX_NUMERIC_STRING {
        return invalid(NUMBER_TOO_LONG);
    }
    // "15", "15.", "15.000" are integers, "15.5" is not
    let digits = match s.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return invalid(INVALID_INTEGER),
        None => s,
    };
    digits
        .parse::<i64>()
        .or_else(|_| invalid(INVALID_INTEGER))
}

fn parse_text(draft: &mut SampleDraft, value: &Value) -> FieldResult {
    draft.text = Some(validated(value)?);
    Ok(())
}

fn parse_password(draft: &mut SampleDraft, value: &Value) -> FieldResult {
    draft.password = Some(validated(value)?);
    Ok(())
}

fn parse_email(draft: &mut SampleDraft, value: &Value) -> FieldResult {
    draft.email = Some(validated(value)?);
    Ok(())
}

fn parse_slug(draft: &mut SampleDraft, value: &Value) -> FieldResult {
    draft.slug = Some(validated(value)?);
    Ok(())
}

fn parse_number(draft: &mut SampleDraft, value: &Value) -> FieldResult {
    let number = match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
            _ => return invalid(INVALID_INTEGER),
        },
        Value::String(s) => integer_from_str(s)?,
        _ => return invalid(INVALID_INTEGER),
    };
    draft.number = Some(number);
    Ok(())
}

fn parse_is_something(draft: &mut SampleDraft, value: &Value) -> FieldResult {
    let flag = match value {
        Value::Bool(b) => *b,
        Value::String(s) if TRUE_VALUES.contains(&s.as_str()) => true,
        Value::String(s) if FALSE_VALUES.contains(&s.as_str()) => false,
        Value::Number(n) if n.as_f64() == Some(1.0) => true,
        Value::Number(n) if n.as_f64() == Some(0.0) => false,
        _ => return invalid(INVALID_BOOLEAN),
    };
    draft.is_something = Some(flag);
    Ok(())
}

fn parse_real(draft: &mut SampleDraft, value: &Value) -> FieldResult {
    let real = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().len() > MAX_NUMERIC_STRING => {
            return invalid(NUMBER_TOO_LONG);
        }
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match real {
        Some(real) if real.is_finite() => {
            draft.real = Some(real);
            Ok(())
        }
        _ => invalid(INVALID_NUMBER),
    }
}

/// Validates input and projects stored samples, persisting through `S`.
pub struct SampleSerializer<S> {
    store: S,
}

impl<S: SampleStore> SampleSerializer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Checks any JSON value, non-objects are rejected as a whole.
    pub fn validate_value(&self, input: &Value) -> Result<CreateSample, FieldErrors> {
        match input {
            Value::Object(map) => self.validate(map),
            other => {
                let mut errors = FieldErrors::new();
                errors.add(
                    NON_FIELD_ERRORS,
                    format!("Invalid data. Expected an object, but got {}.", json_kind(other)),
                );
                Err(errors)
            }
        }
    }

    /// Validates every writable field independently, read-only and unknown keys are ignored.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<CreateSample, FieldErrors> {
        let mut draft = SampleDraft::default();
        let mut errors = FieldErrors::new();
        for spec in SAMPLE_FIELDS.iter().filter(|f| f.access.write) {
            let Some(parse) = spec.parse else {
                continue;
            };
            match input.get(spec.name) {
                None => errors.add(spec.name, REQUIRED),
                Some(Value::Null) => errors.add(spec.name, NOT_NULL),
                Some(value) => {
                    if let Err(messages) = parse(&mut draft, value) {
                        errors.extend_field(spec.name, messages);
                    }
                }
            }
        }

        match draft.finish() {
            Some(payload) if errors.is_empty() => Ok(payload),
            _ => {
                debug!("Invalid sample input: {errors}");
                Err(errors)
            }
        }
    }

    pub fn is_valid(&self, input: &Value) -> bool {
        self.validate_value(input).is_ok()
    }

    /// Readable fields only, `password` never appears.
    ///
    /// The store-assigned `id` is emitted alongside the record columns so
    /// callers can address the record in a later `update`.
    pub fn to_output(&self, sample: &Sample) -> Map<String, Value> {
        SAMPLE_FIELDS
            .iter()
            .filter(|f| f.access.read)
            .map(|f| (f.name.to_string(), (f.read)(sample)))
            .collect()
    }

    pub async fn create(&self, input: &Value) -> Result<Sample, SaveError> {
        let payload = self.validate_value(input)?;
        self.create_valid(payload).await
    }

    pub async fn create_valid(&self, payload: CreateSample) -> Result<Sample, SaveError> {
        use garde::Validate as _;
        payload.validate().map_err(FieldErrors::from)?;
        let mut data = SampleData::from(payload);
        data.recompute_generated();
        let sample = self.store.insert(&data).await?;
        debug!("Created sample {} ({})", sample.id, sample.generated);
        Ok(sample)
    }

    pub async fn update(&self, existing: &mut Sample, input: &Value) -> Result<Sample, SaveError> {
        let payload = self.validate_value(input)?;
        self.update_valid(existing, payload).await
    }

    pub async fn update_valid(
        &self,
        existing: &mut Sample,
        payload: CreateSample,
    ) -> Result<Sample, SaveError> {
        use garde::Validate as _;
        payload.validate().map_err(FieldErrors::from)?;
        let mut updated = existing.clone();
        updated.assign(payload);
        updated.recompute_generated();
        self.store.update_in_place(&updated).await?;
        debug!("Updated sample {} ({})", updated.id, updated.generated);
        *existing = updated.clone();
        Ok(updated)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::SampleRepository;

    fn valid_input() -> Value {
        json!({
            "text": "1500",
            "number": 42,
            "is_something": true,
            "email": "12000@1500.com",
            "slug": "1999",
            "real": 45.67,
            "password": "123456",
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut input = valid_input();
        input[field] = value;
        input
    }

    async fn serializer() -> SampleSerializer<SampleRepository> {
        SampleSerializer::new(SampleRepository::new(crate::test_pool().await))
    }

    fn validate(input: &Value) -> Result<CreateSample, FieldErrors> {
        // validation does not touch the store
        struct NoStore;
        impl SampleStore for NoStore {
            async fn insert(&self, _data: &SampleData) -> crate::error::Result<Sample> {
                unreachable!()
            }
            async fn get(&self, _id: i64) -> crate::error::Result<Sample> {
                unreachable!()
            }
            async fn update_in_place(&self, _sample: &Sample) -> crate::error::Result<()> {
                unreachable!()
            }
            async fn count(&self) -> crate::error::Result<u64> {
                unreachable!()
            }
        }
        SampleSerializer::new(NoStore).validate_value(input)
    }

    fn single_error(input: &Value, field: &str) {
        let errors = validate(input).unwrap_err();
        assert_eq!(errors.len(), 1, "unexpected errors {errors:?}");
        assert!(errors.contains(field));
    }

    #[test]
    fn test_field_table() {
        assert_eq!(field("password").unwrap().access, Access::WRITE_ONLY);
        assert_eq!(field("generated").unwrap().access, Access::READ_ONLY);
        assert_eq!(field("text").unwrap().access, Access::READ_WRITE);
        assert!(field("unknown").is_none());
    }

    #[test]
    fn test_valid() {
        let payload = validate(&valid_input()).unwrap();
        assert_eq!(payload.number, 42);
        assert_eq!(payload.slug.as_ref(), "1999");
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(validate(&with("number", json!("15"))).unwrap().number, 15);
        assert_eq!(validate(&with("number", json!("15.00"))).unwrap().number, 15);
        assert_eq!(validate(&with("number", json!(" -7 "))).unwrap().number, -7);
        assert_eq!(validate(&with("number", json!(3.0))).unwrap().number, 3);
        single_error(&with("number", json!("15.5")), "number");
        single_error(&with("number", json!(15.5)), "number");
        single_error(&with("number", json!("abc")), "number");
        single_error(&with("number", json!(true)), "number");
    }

    #[test]
    fn test_boolean_tokens() {
        for (token, expected) in [
            (json!("yes"), true),
            (json!("TRUE"), true),
            (json!("on"), true),
            (json!(1), true),
            (json!("n"), false),
            (json!("False"), false),
            (json!(0), false),
        ] {
            let payload = validate(&with("is_something", token)).unwrap();
            assert_eq!(payload.is_something, expected);
        }
        single_error(&with("is_something", json!("jojo")), "is_something");
        single_error(&with("is_something", json!(2)), "is_something");
    }

    #[test]
    fn test_string_rules() {
        single_error(&with("email", json!("not_an_email")), "email");
        single_error(&with("email", json!("user@domain")), "email");
        single_error(&with("email", json!("a@b")), "email");
        single_error(&with("slug", json!("not_an_slug./$")), "slug");
        single_error(&with("text", json!("   ")), "text");
        single_error(&with("text", json!("x".repeat(51))), "text");
        single_error(&with("password", json!(["a"])), "password");
        assert_eq!(
            validate(&with("text", json!(1234))).unwrap().text.as_ref(),
            "1234"
        );
    }

    #[test]
    fn test_real() {
        assert_eq!(validate(&with("real", json!("2.5"))).unwrap().real, 2.5);
        assert_eq!(validate(&with("real", json!(7))).unwrap().real, 7.0);
        single_error(&with("real", json!("NaN")), "real");
        single_error(&with("real", json!("abc")), "real");
    }

    #[test]
    fn test_required_and_null() {
        let mut input = valid_input();
        input.as_object_mut().unwrap().remove("text");
        input["slug"] = Value::Null;
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("text").unwrap(), [REQUIRED]);
        assert_eq!(errors.get("slug").unwrap(), [NOT_NULL]);
    }

    #[test]
    fn test_errors_are_collected_per_field() {
        let mut input = valid_input();
        input["number"] = json!("15.5");
        input["is_something"] = json!("jojo");
        input["email"] = json!("not_an_email");
        input["slug"] = json!("not_an_slug./$");
        let errors = validate(&input).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, ["email", "is_something", "number", "slug"]);
    }

    #[test]
    fn test_read_only_and_unknown_ignored() {
        let mut input = valid_input();
        input["generated"] = json!("fixed");
        input["id"] = json!("not even a number");
        input["whatever"] = json!({"nested": true});
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_not_an_object() {
        let errors = validate(&json!([1, 2])).unwrap_err();
        assert!(errors.contains(NON_FIELD_ERRORS));
    }

    #[tokio::test]
    async fn test_output_projection() {
        let serializer = serializer().await;
        let sample = serializer.create(&valid_input()).await.unwrap();
        let output = serializer.to_output(&sample);
        assert!(!output.contains_key("password"));
        assert_eq!(output["generated"], json!("1999:42"));
        assert_eq!(output["id"], json!(sample.id));
        assert_eq!(output.len(), SAMPLE_FIELDS.len() - 1);
    }

    #[tokio::test]
    async fn test_invalid_create_does_not_persist() {
        let serializer = serializer().await;
        let result = serializer.create(&with("slug", json!("a/b"))).await;
        let errors = result.unwrap_err();
        assert!(errors.validation_errors().unwrap().contains("slug"));
        assert_eq!(serializer.store().count().await.unwrap(), 0);
    }
}
