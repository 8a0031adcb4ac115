//! Hand-written encode/decode pairs shaped like generated code.
#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc};

use jsonrt::{
    ContainerKind, Lexer, Marshaler, OptBool, OptFloat64, OptInt, OptString, RawMessage,
    Unmarshaler, UnknownFields, Writer,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrimitiveTypes {
    pub string: String,
    pub boolean: bool,
    pub int8: i8,
    pub int16: i16,
    pub int32: i32,
    pub int64: i64,
    pub uint8: u8,
    pub uint16: u16,
    pub uint32: u32,
    pub uint64: u64,
    pub float32: f32,
    pub float64: f64,
    pub ptr: Option<Box<String>>,
    pub ptr_nil: Option<Box<String>>,
}

pub fn primitive_types_value() -> PrimitiveTypes {
    PrimitiveTypes {
        string: "test".into(),
        boolean: true,
        int8: -8,
        int16: -16,
        int32: -32,
        int64: -64,
        uint8: 8,
        uint16: 16,
        uint32: 32,
        uint64: 64,
        float32: 1.5,
        float64: -2.25,
        ptr: Some(Box::new("ptr".into())),
        ptr_nil: None,
    }
}

pub const PRIMITIVE_TYPES_STRING: &str = concat!(
    r#"{"String":"test","Bool":true,"#,
    r#""Int8":-8,"Int16":-16,"Int32":-32,"Int64":-64,"#,
    r#""Uint8":8,"Uint16":16,"Uint32":32,"Uint64":64,"#,
    r#""Float32":1.5,"Float64":-2.25,"Ptr":"ptr","PtrNil":null}"#
);

impl Marshaler for PrimitiveTypes {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"String":"#);
        w.string(&self.string);
        w.raw_string(r#","Bool":"#);
        w.bool(self.boolean);
        w.raw_string(r#","Int8":"#);
        w.i8(self.int8);
        w.raw_string(r#","Int16":"#);
        w.i16(self.int16);
        w.raw_string(r#","Int32":"#);
        w.i32(self.int32);
        w.raw_string(r#","Int64":"#);
        w.i64(self.int64);
        w.raw_string(r#","Uint8":"#);
        w.u8(self.uint8);
        w.raw_string(r#","Uint16":"#);
        w.u16(self.uint16);
        w.raw_string(r#","Uint32":"#);
        w.u32(self.uint32);
        w.raw_string(r#","Uint64":"#);
        w.u64(self.uint64);
        w.raw_string(r#","Float32":"#);
        w.f32(self.float32);
        w.raw_string(r#","Float64":"#);
        w.f64(self.float64);
        w.raw_string(r#","Ptr":"#);
        self.ptr.marshal_json(w);
        w.raw_string(r#","PtrNil":"#);
        self.ptr_nil.marshal_json(w);
        w.end_object();
    }
}

impl Unmarshaler for PrimitiveTypes {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "String" => self.string = l.string(),
            "Bool" => self.boolean = l.bool(),
            "Int8" => self.int8 = l.i8(),
            "Int16" => self.int16 = l.i16(),
            "Int32" => self.int32 = l.i32(),
            "Int64" => self.int64 = l.i64(),
            "Uint8" => self.uint8 = l.u8(),
            "Uint16" => self.uint16 = l.u16(),
            "Uint32" => self.uint32 = l.u32(),
            "Uint64" => self.uint64 = l.u64(),
            "Float32" => self.float32 = l.f32(),
            "Float64" => self.float64 = l.f64(),
            "Ptr" => self.ptr.unmarshal_json(l),
            "PtrNil" => self.ptr_nil.unmarshal_json(l),
            _ => l.skip_unknown(key),
        });
    }
}

/// `{"Test":...}`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Struct {
    pub test: String,
}

impl Marshaler for Struct {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"Test":"#);
        w.string(&self.test);
        w.end_object();
    }
}

impl Unmarshaler for Struct {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "Test" => self.test = l.string(),
            _ => l.skip_unknown(key),
        });
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Arrays {
    pub ints: [i32; 3],
    pub strings: [String; 2],
}

pub fn arrays_value() -> Arrays {
    Arrays {
        ints: [1, 2, 3],
        strings: ["a".into(), "b".into()],
    }
}

pub const ARRAYS_STRING: &str = r#"{"Ints":[1,2,3],"Strings":["a","b"]}"#;
pub const ARRAYS_OVERFLOW_STRING: &str =
    r#"{"Ints":[1,2,3,4,5],"Strings":["a","b",{"skip":["me"]}]}"#;
pub const ARRAYS_UNDERFLOW_STRING: &str = r#"{"Ints":[1,2],"Strings":["a"]}"#;

pub fn arrays_underflow_value() -> Arrays {
    Arrays {
        ints: [1, 2, 0],
        strings: ["a".into(), String::new()],
    }
}

impl Marshaler for Arrays {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"Ints":"#);
        self.ints.marshal_json(w);
        w.raw_string(r#","Strings":"#);
        self.strings.marshal_json(w);
        w.end_object();
    }
}

impl Unmarshaler for Arrays {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "Ints" => self.ints.unmarshal_json(l),
            "Strings" => self.strings.unmarshal_json(l),
            _ => l.skip_unknown(key),
        });
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EncodingFlagsTestMap {
    pub f: Option<BTreeMap<String, String>>,
}

impl Marshaler for EncodingFlagsTestMap {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"F":"#);
        w.nullable_container(ContainerKind::Map, self.f.as_ref(), |w, m| m.marshal_json(w));
        w.end_object();
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EncodingFlagsTestSlice {
    pub f: Option<Vec<String>>,
}

impl Marshaler for EncodingFlagsTestSlice {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"F":"#);
        w.nullable_container(ContainerKind::Slice, self.f.as_deref(), |w, s| {
            s.marshal_json(w);
        });
        w.end_object();
    }
}

/// `field` decoded through the lexer's intern cache.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Intern {
    pub field: Arc<str>,
}

impl Unmarshaler for Intern {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "field" => self.field = l.interned_string(),
            _ => l.skip_unknown(key),
        });
    }
}

impl Marshaler for Intern {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"field":"#);
        w.string(&self.field);
        w.end_object();
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NoIntern {
    pub field: String,
}

impl Unmarshaler for NoIntern {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "field" => self.field = l.string(),
            _ => l.skip_unknown(key),
        });
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StructWithUnknownsProxy {
    pub unknown: UnknownFields,
    pub field1: String,
}

impl Marshaler for StructWithUnknownsProxy {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"Field1":"#);
        w.string(&self.field1);
        self.unknown.emit_all(w, false);
        w.end_object();
    }
}

impl Unmarshaler for StructWithUnknownsProxy {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "Field1" => self.field1 = l.string(),
            _ => self.unknown.capture(key, l),
        });
    }
}

/// Rejects every key it does not declare, whatever the lexer options say.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DisallowUnknown {
    pub field_one: String,
}

pub const DISALLOW_UNKNOWN_STRING: &str = r#"{"field_one": "one", "field_two": "two"}"#;

impl Unmarshaler for DisallowUnknown {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "field_one" => self.field_one = l.string(),
            _ => l.reject_unknown(key),
        });
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Opts {
    pub b: OptBool,
    pub i: OptInt,
    pub f: OptFloat64,
    pub s: OptString,
    pub s_null: OptString,
}

pub fn opts_value() -> Opts {
    Opts {
        b: OptBool::of(true),
        i: OptInt::of(0),
        f: OptFloat64::of(0.5),
        s: OptString::of("value".into()),
        s_null: OptString::undefined(),
    }
}

pub const OPTS_STRING: &str = r#"{"B":true,"I":0,"F":0.5,"S":"value","SNull":null}"#;

impl Marshaler for Opts {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"B":"#);
        self.b.marshal_json(w);
        w.raw_string(r#","I":"#);
        self.i.marshal_json(w);
        w.raw_string(r#","F":"#);
        self.f.marshal_json(w);
        w.raw_string(r#","S":"#);
        self.s.marshal_json(w);
        w.raw_string(r#","SNull":"#);
        self.s_null.marshal_json(w);
        w.end_object();
    }
}

impl Unmarshaler for Opts {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "B" => self.b.unmarshal_json(l),
            "I" => self.i.unmarshal_json(l),
            "F" => self.f.unmarshal_json(l),
            "S" => self.s.unmarshal_json(l),
            "SNull" => self.s_null.unmarshal_json(l),
            _ => l.skip_unknown(key),
        });
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Raw {
    pub f: RawMessage,
    pub f_nil: RawMessage,
}

pub fn raw_value() -> Raw {
    Raw {
        f: RawMessage::new(&br#"{"nested": [1, "x"]}"#[..]),
        f_nil: RawMessage::default(),
    }
}

pub const RAW_STRING: &str = r#"{"F":{"nested": [1, "x"]},"FNil":null}"#;

impl Marshaler for Raw {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"F":"#);
        self.f.marshal_json(w);
        w.raw_string(r#","FNil":"#);
        self.f_nil.marshal_json(w);
        w.end_object();
    }
}

impl Unmarshaler for Raw {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "F" => self.f.unmarshal_json(l),
            "FNil" => self.f_nil.unmarshal_json(l),
            _ => l.skip_unknown(key),
        });
    }
}

/// Integers carried as JSON strings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Quoted {
    pub id: u64,
    pub delta: i32,
}

pub const QUOTED_STRING: &str = r#"{"id":"18446744073709551615","delta":"-7"}"#;

impl Marshaler for Quoted {
    fn marshal_json(&self, w: &mut Writer) {
        w.raw_string(r#"{"id":"#);
        w.u64_str(self.id);
        w.raw_string(r#","delta":"#);
        w.i32_str(self.delta);
        w.end_object();
    }
}

impl Unmarshaler for Quoted {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        l.object(|l, key| match key {
            "id" => self.id = l.u64_str(),
            "delta" => self.delta = l.i32_str(),
            _ => l.skip_unknown(key),
        });
    }
}
