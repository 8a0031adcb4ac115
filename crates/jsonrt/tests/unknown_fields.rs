#![expect(missing_docs)]

mod common;

use common::{DISALLOW_UNKNOWN_STRING, DisallowUnknown, StructWithUnknownsProxy};
use jsonrt::{ErrorKind, LexerOptions};

const WITH_UNKNOWNS: &str =
    r#"{"Field1":"123","Field2":{"nested":[1, 2]},"Field3":null,"Field4":"x"}"#;

#[test]
fn unknown_fields_round_trip_in_order() {
    let mut v = StructWithUnknownsProxy::default();
    jsonrt::unmarshal(WITH_UNKNOWNS.as_bytes(), &mut v).unwrap();
    assert_eq!(v.field1, "123");
    assert_eq!(v.unknown.len(), 3);
    assert_eq!(v.unknown.get("Field3"), Some(&b"null"[..]));

    let out = jsonrt::marshal(&v).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), WITH_UNKNOWNS);
}

#[test]
fn captured_values_outlive_the_input() {
    let mut v = StructWithUnknownsProxy::default();
    {
        let input = WITH_UNKNOWNS.to_owned();
        jsonrt::unmarshal(input.as_bytes(), &mut v).unwrap();
    }
    assert_eq!(v.unknown.get("Field4"), Some(&br#""x""#[..]));
}

#[test]
fn strict_options_reject_captured_keys() {
    let mut v = StructWithUnknownsProxy::default();
    let err = jsonrt::unmarshal_with_options(
        WITH_UNKNOWNS.as_bytes(),
        &mut v,
        LexerOptions {
            disallow_unknown_fields: true,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    assert!(v.unknown.is_empty());
}

#[test]
fn disallow_unknown_type_fails() {
    let mut d = DisallowUnknown::default();
    let err = jsonrt::unmarshal(DISALLOW_UNKNOWN_STRING.as_bytes(), &mut d).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    insta::assert_snapshot!(
        err,
        @r#"parse error: unknown field "field_two" near offset 34 of '"two"'"#
    );
}

#[test]
fn lenient_mode_skips_unknown_keys() {
    let mut s = common::Struct::default();
    jsonrt::unmarshal(r#"{"x":{"y":[true,{"z":"é"}]},"Test":"ok"}"#.as_bytes(), &mut s).unwrap();
    assert_eq!(s.test, "ok");
}
