//! Declarative payload validation.
//!
//! A [`Schema`] lists the fields a payload may carry and the constraints on
//! each one. [`validate`] checks a JSON payload against a schema and either
//! returns the normalized fields or every violated constraint, in field
//! order, so each issue can be attached to its form field.
//!
//! Validation is pure: no I/O, and "now" is an explicit input for the
//! future-timestamp checks ([`validate_at`]).

pub mod schemas;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use uuid::Uuid;

/// Machine-readable category of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Required,
    InvalidType,
    InvalidString,
    InvalidEnumValue,
    InvalidDate,
    TooSmall,
    TooBig,
    Custom,
}

/// One violated constraint, attributed to a field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub path: Vec<String>,
    pub message: String,
    pub code: IssueCode,
}

impl FieldIssue {
    fn new(field: &str, code: IssueCode, message: impl Into<String>) -> Self {
        let path = if field.is_empty() {
            Vec::new()
        } else {
            vec![field.to_string()]
        };
        Self {
            path,
            message: message.into(),
            code,
        }
    }

    /// Dotted field path, empty for payload-level issues
    pub fn field(&self) -> String {
        self.path.join(".")
    }
}

/// Every issue found in a payload, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub issues: Vec<FieldIssue>,
}

impl ValidationFailure {
    pub fn single(field: &str, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(field, code, message)],
        }
    }

    /// Issues attributed to the given field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        self.issues.iter().filter(move |issue| issue.field() == field)
    }

    pub fn has_issue_for(&self, field: &str) -> bool {
        self.for_field(field).next().is_some()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field(), issue.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Primitive shape of a field. Numbers given as strings are coerced.
#[derive(Debug, Clone)]
pub enum Kind {
    Text,
    Url,
    Uuid,
    Integer,
    Number,
    OneOf(Vec<&'static str>),
    Timestamp,
}

#[derive(Debug, Clone)]
enum Constraint {
    MinLen(usize, &'static str),
    MaxLen(usize, &'static str),
    /// Inclusive lower bound
    Min(f64, &'static str),
    /// Inclusive upper bound
    Max(f64, &'static str),
    /// Strictly greater than zero
    Positive(&'static str),
    /// Strictly later than validation time
    Future(&'static str),
}

/// One declared field of a schema
#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    kind: Kind,
    required: bool,
    invalid_message: Option<&'static str>,
    constraints: Vec<Constraint>,
}

impl Field {
    fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
            invalid_message: None,
            constraints: Vec::new(),
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, Kind::Text)
    }

    pub fn url(name: &'static str, message: &'static str) -> Self {
        Self::new(name, Kind::Url).invalid(message)
    }

    pub fn uuid(name: &'static str, message: &'static str) -> Self {
        Self::new(name, Kind::Uuid).invalid(message)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, Kind::Integer)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, Kind::Number)
    }

    pub fn one_of(name: &'static str, options: Vec<&'static str>) -> Self {
        Self::new(name, Kind::OneOf(options))
    }

    pub fn timestamp(name: &'static str) -> Self {
        Self::new(name, Kind::Timestamp)
    }

    /// Field may be absent (or null)
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Message used when the value has the right type but the wrong format
    pub fn invalid(mut self, message: &'static str) -> Self {
        self.invalid_message = Some(message);
        self
    }

    pub fn min_len(mut self, len: usize, message: &'static str) -> Self {
        self.constraints.push(Constraint::MinLen(len, message));
        self
    }

    pub fn max_len(mut self, len: usize, message: &'static str) -> Self {
        self.constraints.push(Constraint::MaxLen(len, message));
        self
    }

    pub fn min(mut self, bound: f64, message: &'static str) -> Self {
        self.constraints.push(Constraint::Min(bound, message));
        self
    }

    pub fn max(mut self, bound: f64, message: &'static str) -> Self {
        self.constraints.push(Constraint::Max(bound, message));
        self
    }

    pub fn non_negative(self, message: &'static str) -> Self {
        self.min(0.0, message)
    }

    pub fn positive(mut self, message: &'static str) -> Self {
        self.constraints.push(Constraint::Positive(message));
        self
    }

    pub fn future(mut self, message: &'static str) -> Self {
        self.constraints.push(Constraint::Future(message));
        self
    }
}

/// Cross-field rule: `later` must be strictly after `earlier`
#[derive(Debug, Clone)]
struct Ordering {
    later: &'static str,
    earlier: &'static str,
    message: &'static str,
}

/// Declared payload shape
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    orderings: Vec<Ordering>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Require timestamp field `later` to be after `earlier` when both are present
    pub fn after(
        mut self,
        later: &'static str,
        earlier: &'static str,
        message: &'static str,
    ) -> Self {
        self.orderings.push(Ordering {
            later,
            earlier,
            message,
        });
        self
    }

    /// Turn every field optional, for partial updates
    pub fn partial(mut self) -> Self {
        for field in &mut self.fields {
            field.required = false;
        }
        self
    }
}

/// Fields that passed validation, normalized (numbers coerced, timestamps in
/// RFC 3339 UTC) and stripped of undeclared keys
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayload {
    fields: Map<String, Value>,
}

impl ValidatedPayload {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Deserialize the normalized fields into a typed input
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ValidationFailure> {
        serde_json::from_value(self.into_value()).map_err(|e| {
            ValidationFailure::single("", IssueCode::InvalidType, format!("Invalid payload: {}", e))
        })
    }
}

/// Validate `payload` against `schema` at the current time
pub fn validate(schema: &Schema, payload: &Value) -> Result<ValidatedPayload, ValidationFailure> {
    validate_at(schema, payload, Utc::now())
}

/// Validate `payload` against `schema`, treating `now` as the current time
pub fn validate_at(
    schema: &Schema,
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<ValidatedPayload, ValidationFailure> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationFailure::single(
            "",
            IssueCode::InvalidType,
            format!("Expected object, received {}", type_name(payload)),
        ));
    };

    let mut issues = Vec::new();
    let mut fields = Map::new();
    let mut instants: Vec<(&'static str, DateTime<Utc>)> = Vec::new();

    for field in &schema.fields {
        let raw = object.get(field.name).filter(|value| !is_absent(field, value));

        let Some(raw) = raw else {
            if field.required {
                issues.push(FieldIssue::new(field.name, IssueCode::Required, "Required"));
            }
            continue;
        };

        match check_field(field, raw, now) {
            Ok((value, instant)) => {
                if let Some(instant) = instant {
                    instants.push((field.name, instant));
                }
                fields.insert(field.name.to_string(), value);
            }
            Err(mut field_issues) => issues.append(&mut field_issues),
        }
    }

    for ordering in &schema.orderings {
        let find = |name: &str| {
            instants
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, instant)| *instant)
        };
        if let (Some(later), Some(earlier)) = (find(ordering.later), find(ordering.earlier)) {
            if later <= earlier {
                issues.push(FieldIssue::new(
                    ordering.later,
                    IssueCode::Custom,
                    ordering.message,
                ));
            }
        }
    }

    if issues.is_empty() {
        Ok(ValidatedPayload { fields })
    } else {
        Err(ValidationFailure { issues })
    }
}

/// Null, and empty strings on non-text fields, count as "not supplied"
fn is_absent(field: &Field, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty() && !matches!(field.kind, Kind::Text),
        _ => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

type Checked = (Value, Option<DateTime<Utc>>);

fn check_field(field: &Field, raw: &Value, now: DateTime<Utc>) -> Result<Checked, Vec<FieldIssue>> {
    let name = field.name;
    let invalid = |code: IssueCode, fallback: String| {
        vec![FieldIssue::new(
            name,
            code,
            field.invalid_message.map(str::to_string).unwrap_or(fallback),
        )]
    };

    match &field.kind {
        Kind::Text => {
            let Some(text) = raw.as_str() else {
                return Err(type_error(name, "string", raw));
            };
            let length = text.chars().count();
            let issues: Vec<FieldIssue> = field
                .constraints
                .iter()
                .filter_map(|constraint| match constraint {
                    Constraint::MinLen(min, msg) if length < *min => {
                        Some(FieldIssue::new(name, IssueCode::TooSmall, *msg))
                    }
                    Constraint::MaxLen(max, msg) if length > *max => {
                        Some(FieldIssue::new(name, IssueCode::TooBig, *msg))
                    }
                    _ => None,
                })
                .collect();
            if issues.is_empty() {
                Ok((Value::String(text.to_string()), None))
            } else {
                Err(issues)
            }
        }
        Kind::Url => {
            let Some(text) = raw.as_str() else {
                return Err(type_error(name, "string", raw));
            };
            if is_url(text) {
                Ok((Value::String(text.trim().to_string()), None))
            } else {
                Err(invalid(IssueCode::InvalidString, "Invalid url".to_string()))
            }
        }
        Kind::Uuid => {
            let Some(text) = raw.as_str() else {
                return Err(type_error(name, "string", raw));
            };
            match Uuid::parse_str(text.trim()) {
                Ok(id) => Ok((Value::String(id.to_string()), None)),
                Err(_) => Err(invalid(IssueCode::InvalidString, "Invalid uuid".to_string())),
            }
        }
        Kind::Integer | Kind::Number => {
            let Some(number) = coerce_number(raw) else {
                return Err(type_error(name, "number", raw));
            };
            let integral = matches!(field.kind, Kind::Integer);
            if integral && number.fract() != 0.0 {
                return Err(vec![FieldIssue::new(
                    name,
                    IssueCode::InvalidType,
                    "Expected integer, received float",
                )]);
            }
            let issues = numeric_issues(name, &field.constraints, number);
            if !issues.is_empty() {
                return Err(issues);
            }
            let value = if integral {
                Value::Number(Number::from(number as i64))
            } else {
                Number::from_f64(number)
                    .map(Value::Number)
                    .ok_or_else(|| type_error(name, "number", raw))?
            };
            Ok((value, None))
        }
        Kind::OneOf(options) => {
            let Some(text) = raw.as_str() else {
                return Err(type_error(name, "string", raw));
            };
            if options.contains(&text) {
                Ok((Value::String(text.to_string()), None))
            } else {
                Err(vec![FieldIssue::new(
                    name,
                    IssueCode::InvalidEnumValue,
                    format!(
                        "Invalid enum value. Expected {}, received '{}'",
                        options
                            .iter()
                            .map(|o| format!("'{}'", o))
                            .collect::<Vec<_>>()
                            .join(" | "),
                        text
                    ),
                )])
            }
        }
        Kind::Timestamp => {
            let Some(text) = raw.as_str() else {
                return Err(type_error(name, "string", raw));
            };
            let Some(instant) = parse_timestamp(text) else {
                return Err(invalid(IssueCode::InvalidDate, "Invalid date".to_string()));
            };
            let issues: Vec<FieldIssue> = field
                .constraints
                .iter()
                .filter_map(|constraint| match constraint {
                    Constraint::Future(msg) if instant <= now => {
                        Some(FieldIssue::new(name, IssueCode::Custom, *msg))
                    }
                    _ => None,
                })
                .collect();
            if issues.is_empty() {
                Ok((
                    Value::String(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
                    Some(instant),
                ))
            } else {
                Err(issues)
            }
        }
    }
}

fn type_error(field: &str, expected: &str, raw: &Value) -> Vec<FieldIssue> {
    vec![FieldIssue::new(
        field,
        IssueCode::InvalidType,
        format!("Expected {}, received {}", expected, type_name(raw)),
    )]
}

fn numeric_issues(field: &str, constraints: &[Constraint], number: f64) -> Vec<FieldIssue> {
    constraints
        .iter()
        .filter_map(|constraint| match constraint {
            Constraint::Min(min, msg) if number < *min => {
                Some(FieldIssue::new(field, IssueCode::TooSmall, *msg))
            }
            Constraint::Max(max, msg) if number > *max => {
                Some(FieldIssue::new(field, IssueCode::TooBig, *msg))
            }
            Constraint::Positive(msg) if number <= 0.0 => {
                Some(FieldIssue::new(field, IssueCode::TooSmall, *msg))
            }
            _ => None,
        })
        .collect()
}

fn coerce_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// RFC 3339, or a zone-less `datetime-local` form value read as UTC
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

fn is_url(text: &str) -> bool {
    let text = text.trim();
    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !rest.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::new()
            .field(
                Field::text("name")
                    .min_len(3, "Name must be at least 3 characters")
                    .max_len(10, "Name is too long"),
            )
            .field(Field::integer("seats").positive("Seats must be a positive number"))
            .field(
                Field::number("fee")
                    .optional()
                    .non_negative("Fee cannot be negative"),
            )
            .field(Field::one_of("kind", vec!["a", "b"]))
            .field(Field::timestamp("opens").future("Opens must be in the future"))
            .field(Field::timestamp("closes").optional())
            .after("closes", "opens", "Closes must be after opens")
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let payload = json!({
            "name": "Hack",
            "seats": "50",
            "fee": 0,
            "kind": "a",
            "opens": "2030-02-01T10:00",
            "closes": "2030-02-01T14:00:00+02:00",
            "extra": "dropped"
        });

        let validated = validate_at(&sample_schema(), &payload, now()).unwrap();

        assert_eq!(validated.get("seats"), Some(&json!(50)));
        assert_eq!(validated.get("opens"), Some(&json!("2030-02-01T10:00:00Z")));
        assert_eq!(validated.get("closes"), Some(&json!("2030-02-01T12:00:00Z")));
        assert!(!validated.contains("extra"));
    }

    #[test]
    fn test_every_violation_is_reported_in_field_order() {
        let payload = json!({
            "name": "ab",
            "seats": 0,
            "fee": -1,
            "kind": "c",
            "opens": "2029-01-01T00:00:00Z"
        });

        let failure = validate_at(&sample_schema(), &payload, now()).unwrap_err();
        let fields: Vec<String> = failure.issues.iter().map(FieldIssue::field).collect();

        assert_eq!(fields, vec!["name", "seats", "fee", "kind", "opens"]);
        assert_eq!(failure.issues[0].message, "Name must be at least 3 characters");
        assert_eq!(failure.issues[3].code, IssueCode::InvalidEnumValue);
        assert_eq!(failure.issues[4].message, "Opens must be in the future");
    }

    #[test]
    fn test_missing_required_fields_are_issues_not_panics() {
        let failure = validate_at(&sample_schema(), &json!({}), now()).unwrap_err();
        assert_eq!(failure.issues.len(), 4);
        assert!(failure.issues.iter().all(|i| i.code == IssueCode::Required));
    }

    #[test]
    fn test_non_object_payload() {
        let failure = validate_at(&sample_schema(), &json!([1, 2]), now()).unwrap_err();
        assert_eq!(failure.issues.len(), 1);
        assert!(failure.issues[0].path.is_empty());
        assert_eq!(failure.issues[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_ordering_rule() {
        let payload = json!({
            "name": "Hack",
            "seats": 1,
            "kind": "b",
            "opens": "2030-02-01T10:00:00Z",
            "closes": "2030-02-01T09:00:00Z"
        });

        let failure = validate_at(&sample_schema(), &payload, now()).unwrap_err();
        assert_eq!(failure.issues.len(), 1);
        assert!(failure.has_issue_for("closes"));

        // The same instant in another offset is not strictly after
        let payload = json!({
            "name": "Hack",
            "seats": 1,
            "kind": "b",
            "opens": "2030-02-01T10:00:00Z",
            "closes": "2030-02-01T12:00:00+02:00"
        });
        let failure = validate_at(&sample_schema(), &payload, now()).unwrap_err();
        assert_eq!(failure.issues[0].message, "Closes must be after opens");
    }

    #[test]
    fn test_integer_rejects_fraction_and_garbage() {
        let mut payload = json!({
            "name": "Hack",
            "seats": 2.5,
            "kind": "a",
            "opens": (now() + Duration::days(1)).to_rfc3339()
        });
        let failure = validate_at(&sample_schema(), &payload, now()).unwrap_err();
        assert_eq!(failure.issues[0].message, "Expected integer, received float");

        payload["seats"] = json!("many");
        let failure = validate_at(&sample_schema(), &payload, now()).unwrap_err();
        assert_eq!(failure.issues[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_empty_string_on_optional_number_is_absent() {
        let payload = json!({
            "name": "Hack",
            "seats": 3,
            "fee": "",
            "kind": "a",
            "opens": "2030-02-01T10:00:00Z"
        });
        let validated = validate_at(&sample_schema(), &payload, now()).unwrap();
        assert!(!validated.contains("fee"));
    }

    #[test]
    fn test_partial_schema_accepts_empty_object() {
        let validated = validate_at(&sample_schema().partial(), &json!({}), now()).unwrap();
        assert!(validated.is_empty());
    }

    #[test]
    fn test_url_and_uuid_checks() {
        let schema = Schema::new()
            .field(Field::url("site", "Invalid receipt URL"))
            .field(Field::uuid("owner", "Invalid user ID"));

        let failure =
            validate_at(&schema, &json!({ "site": "ftp://x", "owner": "nope" }), now()).unwrap_err();
        assert_eq!(failure.issues[0].message, "Invalid receipt URL");
        assert_eq!(failure.issues[1].message, "Invalid user ID");

        let id = Uuid::new_v4();
        let ok = validate_at(
            &schema,
            &json!({ "site": "https://college.edu/r.pdf", "owner": id.to_string() }),
            now(),
        );
        assert!(ok.is_ok());
    }
}
