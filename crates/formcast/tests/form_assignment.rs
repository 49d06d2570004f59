use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use formcast::{
    AttrOptions, AttrType, AttributeHost, AttributeRegistry, Form, FormError, Object, Params,
    Value,
};

fn form(declare: impl FnOnce(AttributeRegistry) -> formcast::Result<AttributeRegistry>) -> Form {
    let registry = declare(AttributeRegistry::new("TestForm")).unwrap();
    Form::new(Arc::new(registry))
}

fn profile() -> Form {
    form(|r| {
        r.attribute("name", AttrOptions::new())?
            .attribute("age", AttrOptions::new())?
            .attribute("admin", AttrOptions::new())?
            .attribute("height", AttrOptions::new())?
            .attribute("balance", AttrOptions::new())?
            .attribute("birthday", AttrOptions::typed(AttrType::Date))
    })
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn test_untyped_attribute_keeps_values() {
    let mut form = form(|r| r.attribute("name", AttrOptions::new()));
    assert_eq!(form.get("name"), &Value::Nil);

    let mut map = indexmap::IndexMap::new();
    map.insert("foo".to_string(), Value::from("bar"));
    let values = [
        Value::Bool(false),
        Value::Integer(123),
        Value::Object(Object::new(String::from("opaque"))),
        Value::Map(map),
    ];
    for value in values {
        form.set("name", value.clone()).unwrap();
        assert_eq!(form.get("name"), &value);
    }
}

#[test]
fn test_string_attribute() {
    let mut form = form(|r| r.attribute("name", AttrOptions::typed(AttrType::String)));
    assert_eq!(form.get("name"), &Value::Nil);

    let cases: [(Value, &str); 4] = [
        ("foo".into(), "foo"),
        (false.into(), "false"),
        (123.into(), "123"),
        (Value::List(vec![1.into(), 2.into()]), "[1, 2]"),
    ];
    for (input, expected) in cases {
        form.set("name", input).unwrap();
        assert_eq!(form.get("name"), &Value::from(expected));
    }
}

#[test]
fn test_integer_attribute() {
    let mut form = form(|r| r.attribute("age", AttrOptions::typed(AttrType::Integer)));
    assert_eq!(form.get("age"), &Value::Nil);

    let cases: [(Value, Value); 7] = [
        (123.into(), Value::Integer(123)),
        ("123".into(), Value::Integer(123)),
        ("foo".into(), Value::Integer(0)),
        (123.4.into(), Value::Integer(123)),
        (false.into(), Value::Nil),
        (true.into(), Value::Nil),
        (Value::Object(Object::new(())), Value::Nil),
    ];
    for (input, expected) in cases {
        form.set("age", input.clone()).unwrap();
        assert_eq!(form.get("age"), &expected, "input {input:?}");
    }
}

#[test]
fn test_float_attribute() {
    let mut form = form(|r| r.attribute("height", AttrOptions::typed(AttrType::Float)));
    assert_eq!(form.get("height"), &Value::Nil);

    let cases: [(Value, Value); 7] = [
        (123.into(), Value::Float(123.0)),
        ("123".into(), Value::Float(123.0)),
        ("123.4".into(), Value::Float(123.4)),
        ("foo".into(), Value::Float(0.0)),
        (false.into(), Value::Nil),
        (true.into(), Value::Nil),
        (Value::Object(Object::new(())), Value::Nil),
    ];
    for (input, expected) in cases {
        form.set("height", input.clone()).unwrap();
        assert_eq!(form.get("height"), &expected, "input {input:?}");
    }
}

#[test]
fn test_boolean_attribute() {
    let mut form = form(|r| r.attribute("admin", AttrOptions::typed(AttrType::Boolean)));
    assert_eq!(form.get("admin"), &Value::Nil);

    let truthy: [Value; 9] = [
        true.into(),
        1.into(),
        "1".into(),
        "t".into(),
        "T".into(),
        "true".into(),
        "TRUE".into(),
        "on".into(),
        "ON".into(),
    ];
    for input in truthy {
        form.set("admin", input.clone()).unwrap();
        assert_eq!(form.get("admin"), &Value::Bool(true), "input {input:?}");
    }

    let falsy: [Value; 8] = [
        false.into(),
        0.into(),
        "0".into(),
        10.into(),
        "foo".into(),
        "yes".into(),
        1.0.into(),
        Value::Nil,
    ];
    for input in falsy {
        form.set("admin", input.clone()).unwrap();
        assert_eq!(form.get("admin"), &Value::Bool(false), "input {input:?}");
    }
}

#[test]
fn test_date_attribute() {
    let mut form = form(|r| r.attribute("birthday", AttrOptions::typed(AttrType::Date)));
    assert_eq!(form.get("birthday"), &Value::Nil);

    for input in [
        "1986-08-25",
        "1986-8-25",
        "1986/08/25",
        "1986/8/25",
        "25 Aug 1986",
        "Mon, 25 Aug 1986",
    ] {
        form.set("birthday", input.into()).unwrap();
        assert_eq!(form.get("birthday"), &date(1986, 8, 25), "input {input}");
    }

    form.set("birthday", "not a date".into()).unwrap();
    assert_eq!(form.get("birthday"), &Value::Nil);
}

#[test]
fn test_assign_attributes() {
    let mut form = profile();
    form.assign_attributes([
        ("name", Value::from("Pavel")),
        ("age", Value::Integer(28)),
        ("admin", Value::Bool(true)),
        ("height", Value::Integer(179)),
    ])
    .unwrap();

    assert_eq!(form.get("name"), &Value::from("Pavel"));
    assert_eq!(form.get("age"), &Value::Integer(28));
    assert_eq!(form.get("admin"), &Value::Bool(true));
    assert_eq!(form.get("height"), &Value::Integer(179));
    assert_eq!(form.get("balance"), &Value::Nil);
}

#[test]
fn test_assign_composite_attribute() {
    let mut form = profile();
    form.assign_attributes([
        ("birthday(1i)", "1986"),
        ("birthday(2i)", "08"),
        ("birthday(3i)", "25"),
    ])
    .unwrap();
    assert_eq!(form.get("birthday"), &date(1986, 8, 25));
}

#[test]
fn test_composite_attribute_with_missing_part_is_nil() {
    let mut form = profile();
    form.assign_attributes([("birthday(1i)", "1986"), ("birthday(3i)", "25")])
        .unwrap();
    assert_eq!(form.get("birthday"), &Value::Nil);
}

#[test]
fn test_composite_attribute_with_invalid_parts_is_nil() {
    let mut form = profile();
    form.assign_attributes([
        ("birthday(1i)", "1986"),
        ("birthday(2i)", "800"),
        ("birthday(3i)", "2500"),
    ])
    .unwrap();
    assert_eq!(form.get("birthday"), &Value::Nil);
}

#[test]
fn test_unknown_attribute_error() {
    let mut form = profile();
    let err = form.assign_attributes([("foo", "bar")]).unwrap_err();
    assert!(matches!(&err, FormError::UnknownAttribute(key) if key == "foo"));
    assert_eq!(err.to_string(), "No such attribute: \"foo\"");
}

#[test]
fn test_missing_composite_setter_error() {
    let mut form = profile();
    let err = form
        .assign_attributes([("missing(3i)", Value::Integer(1986))])
        .unwrap_err();
    assert!(matches!(&err, FormError::MissingCompositeSetter(field) if field == "missing"));
    assert_eq!(
        err.to_string(),
        "Attribute \"missing\" doesn't have a composite setter"
    );
}

#[test]
fn test_untyped_attribute_has_no_composite_setter() {
    let mut form = profile();
    let err = form.assign_attributes([("age(1i)", "1")]).unwrap_err();
    assert!(matches!(err, FormError::MissingCompositeSetter(field) if field == "age"));
}

#[test]
fn test_assign_defined_attributes_skips_unknown_keys() {
    let mut form = profile();
    form.assign_defined_attributes([
        ("foo", "bar"),
        ("name", "Pavel"),
        ("missing(3i)", "1986"),
    ])
    .unwrap();
    assert_eq!(form.get("name"), &Value::from("Pavel"));
}

#[test]
fn test_failed_batch_keeps_earlier_assignments() {
    let mut form = profile();
    let result = form.assign_attributes([("name", "Pavel"), ("foo", "bar"), ("age", "28")]);
    assert!(result.is_err());
    assert_eq!(form.get("name"), &Value::from("Pavel"));
    assert_eq!(form.get("age"), &Value::Nil);
}

#[test]
fn test_interleaved_composite_fields() {
    let mut form = form(|r| {
        r.attribute("starts_on", AttrOptions::typed(AttrType::Date))?
            .attribute("ends_on", AttrOptions::typed(AttrType::Date))
    });
    form.assign_attributes([
        ("starts_on(1i)", "2024"),
        ("ends_on(1i)", "2025"),
        ("starts_on(2i)", "3"),
        ("ends_on(2i)", "1"),
        ("ends_on(3i)", "31"),
        ("starts_on(3i)", "15"),
    ])
    .unwrap();
    assert_eq!(form.get("starts_on"), &date(2024, 3, 15));
    assert_eq!(form.get("ends_on"), &date(2025, 1, 31));
}

#[test]
fn test_composite_flushes_after_simple_keys() {
    let mut form = profile();
    form.assign_attributes([
        ("birthday(1i)", "1986"),
        ("birthday(2i)", "8"),
        ("birthday(3i)", "25"),
        ("birthday", "2001-01-01"),
    ])
    .unwrap();
    assert_eq!(form.get("birthday"), &date(1986, 8, 25));
}

#[test]
fn test_predicate() {
    let mut form = profile();
    assert!(!form.is_present("name"));
    for blank in [Value::Nil, Value::Bool(false), Value::from(""), Value::List(vec![])] {
        form.set("name", blank).unwrap();
        assert!(!form.is_present("name"));
    }
    form.set("name", Value::Object(Object::new(()))).unwrap();
    assert!(form.is_present("name"));
}

#[test]
fn test_defaults_are_typecast() {
    let form = form(|r| {
        r.attribute(
            "admin",
            AttrOptions::typed(AttrType::Boolean).with_default("on"),
        )?
        .attribute("age", AttrOptions::typed(AttrType::Integer).with_default("18"))?
        .attribute("name", AttrOptions::new())
    });
    assert_eq!(form.get("admin"), &Value::Bool(true));
    assert_eq!(form.get("age"), &Value::Integer(18));
    assert_eq!(form.get("name"), &Value::Nil);
}

#[test]
fn test_with_attributes_applies_batch_over_defaults() {
    let registry = AttributeRegistry::new("Counter")
        .attribute("count", AttrOptions::typed(AttrType::Integer).with_default(1))
        .unwrap();
    let form = Form::with_attributes(Arc::new(registry), [("count", "5")]).unwrap();
    assert_eq!(form.get("count"), &Value::Integer(5));
}

#[test]
fn test_registry_isolation() {
    let mut base = AttributeRegistry::new("Base")
        .attribute("name", AttrOptions::new())
        .unwrap();
    let mut derived = base.derive("Derived");

    base.declare("email", AttrOptions::new()).unwrap();
    derived.declare("level", AttrOptions::new()).unwrap();

    let mut base_form = Form::new(Arc::new(base));
    let mut derived_form = Form::new(Arc::new(derived));

    assert!(derived_form.assign_attributes([("email", "x")]).is_err());
    assert!(base_form.assign_attributes([("level", "x")]).is_err());
    assert!(base_form.assign_attributes([("name", "a"), ("email", "x")]).is_ok());
    assert!(derived_form.assign_attributes([("name", "a"), ("level", "x")]).is_ok());
}

#[test]
fn test_json_params() {
    let mut form = form(|r| {
        r.attribute("name", AttrOptions::typed(AttrType::String))?
            .attribute("age", AttrOptions::typed(AttrType::Integer))?
            .attribute("birthday", AttrOptions::typed(AttrType::Date))
    });
    let params = Params::from_json_str(
        r#"{
            "name": "Pavel",
            "age": "28",
            "birthday(1i)": "1986",
            "birthday(2i)": "08",
            "birthday(3i)": 25
        }"#,
    )
    .unwrap();
    form.assign_attributes(params).unwrap();

    let values: Vec<(&str, &Value)> = form.attributes().collect();
    assert_eq!(
        values,
        vec![
            ("name", &Value::from("Pavel")),
            ("age", &Value::Integer(28)),
            ("birthday", &date(1986, 8, 25)),
        ]
    );
}

/// Host that accepts a `full_name` key and splits it into two declared fields.
struct Person {
    registry: Arc<AttributeRegistry>,
    values: HashMap<String, Value>,
}

impl Person {
    fn new() -> Self {
        let registry = AttributeRegistry::new("Person")
            .attribute("first_name", AttrOptions::typed(AttrType::String))
            .unwrap()
            .attribute("last_name", AttrOptions::typed(AttrType::String))
            .unwrap();
        Self {
            registry: Arc::new(registry),
            values: HashMap::new(),
        }
    }
}

impl AttributeHost for Person {
    fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    fn store(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn read(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn has_setter(&self, name: &str) -> bool {
        name == "full_name" || self.registry().contains(name)
    }

    fn set(&mut self, name: &str, value: Value) -> formcast::Result<()> {
        if name != "full_name" {
            let typed = self
                .registry()
                .get(name)
                .map(|definition| definition.typecast(value))
                .ok_or_else(|| FormError::UnknownAttribute(name.to_string()))?;
            self.store(name, typed);
            return Ok(());
        }
        let full = value.to_string();
        let (first, last) = full.split_once(' ').unwrap_or((full.as_str(), ""));
        self.set("first_name", first.into())?;
        self.set("last_name", last.into())
    }
}

#[test]
fn test_custom_host_virtual_setter() {
    let mut person = Person::new();
    person
        .assign_attributes([("full_name", "Ada Lovelace")])
        .unwrap();
    assert_eq!(person.get("first_name"), &Value::from("Ada"));
    assert_eq!(person.get("last_name"), &Value::from("Lovelace"));
    assert!(person.assign_attributes([("nickname", "ada")]).is_err());
}

/// Host that records every call to its setter.
struct Settings {
    registry: Arc<AttributeRegistry>,
    values: HashMap<String, Value>,
    assigned: Vec<String>,
}

impl Settings {
    fn new() -> formcast::Result<Self> {
        let registry = AttributeRegistry::new("Settings")
            .attribute("admin", AttrOptions::typed(AttrType::Boolean).with_default("on"))?
            .attribute("theme", AttrOptions::new())?
            .attribute("retries", AttrOptions::typed(AttrType::Integer).with_default("3"))?;
        let mut settings = Self {
            registry: Arc::new(registry),
            values: HashMap::new(),
            assigned: Vec::new(),
        };
        settings.assign_defaults()?;
        Ok(settings)
    }
}

impl AttributeHost for Settings {
    fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    fn store(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn read(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn set(&mut self, name: &str, value: Value) -> formcast::Result<()> {
        self.assigned.push(name.to_string());
        let typed = self
            .registry()
            .get(name)
            .map(|definition| definition.typecast(value))
            .ok_or_else(|| FormError::UnknownAttribute(name.to_string()))?;
        self.store(name, typed);
        Ok(())
    }
}

#[test]
fn test_custom_host_defaults_use_its_setter() {
    let settings = Settings::new().unwrap();
    assert_eq!(settings.get("admin"), &Value::Bool(true));
    assert_eq!(settings.get("retries"), &Value::Integer(3));
    assert_eq!(settings.get("theme"), &Value::Nil);
    assert_eq!(settings.assigned, vec!["admin", "retries"]);
}

#[test]
fn test_out_of_range_composite_position_nils_the_field() {
    let mut form = profile();
    form.assign_attributes([("birthday(1i)", "1986"), ("birthday(17i)", "1")])
        .unwrap();
    assert_eq!(form.get("birthday"), &Value::Nil);

    form.set("birthday", "2000-01-01".into()).unwrap();
    form.assign_defined_attributes([("birthday(17i)", "1")])
        .unwrap();
    assert_eq!(form.get("birthday"), &Value::Nil);
}

#[test]
fn test_composite_key_without_field_name() {
    let mut form = profile();
    let err = form.assign_attributes([("(1i)", "1")]).unwrap_err();
    assert!(matches!(&err, FormError::MissingCompositeSetter(field) if field.is_empty()));
}

#[test]
fn test_datetime_input_is_truncated_to_seconds() {
    let mut form = form(|r| r.attribute("seen_at", AttrOptions::typed(AttrType::DateTime)));
    let precise = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_nano_opt(9, 30, 15, 123_456_789)
        .unwrap();
    form.set("seen_at", precise.into()).unwrap();
    let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 15)
        .unwrap();
    assert_eq!(form.get("seen_at"), &Value::DateTime(expected));
}
