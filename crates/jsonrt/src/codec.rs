//! Encode/decode traits and their implementations for standard types.
//!
//! Generated code implements [`Marshaler`] and [`Unmarshaler`] for each
//! declared type as a fixed sequence of [`Writer`] and [`Lexer`] calls. The
//! implementations here cover the building blocks those sequences lean on.

use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
    sync::Arc,
};

use crate::{lexer::Lexer, value::Value, writer::Writer};

/// A type that can write itself as JSON.
pub trait Marshaler {
    fn marshal_json(&self, w: &mut Writer);
}

/// A type that can fill itself from JSON.
///
/// Implementations read exactly one value. On error they record it on the
/// lexer and return; the lexer's sticky error is the only failure channel.
pub trait Unmarshaler {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>);
}

macro_rules! primitive {
    ($($t:ty => $method:ident),* $(,)?) => {$(
        impl Marshaler for $t {
            #[inline]
            fn marshal_json(&self, w: &mut Writer) {
                w.$method(*self);
            }
        }

        impl Unmarshaler for $t {
            #[inline]
            fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
                *self = l.$method();
            }
        }
    )*};
}

primitive! {
    bool => bool,
    i8 => i8,
    i16 => i16,
    i32 => i32,
    i64 => i64,
    isize => isize,
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    usize => usize,
    f32 => f32,
    f64 => f64,
}

impl Marshaler for str {
    fn marshal_json(&self, w: &mut Writer) {
        w.string(self);
    }
}

impl Marshaler for String {
    fn marshal_json(&self, w: &mut Writer) {
        w.string(self);
    }
}

impl Unmarshaler for String {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        let s = l.consume_string();
        self.clear();
        self.push_str(&s);
    }
}

impl Marshaler for Arc<str> {
    fn marshal_json(&self, w: &mut Writer) {
        w.string(self);
    }
}

impl Unmarshaler for Arc<str> {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        *self = Arc::from(l.consume_string().as_ref());
    }
}

impl<T: Marshaler + ?Sized> Marshaler for &T {
    fn marshal_json(&self, w: &mut Writer) {
        (**self).marshal_json(w);
    }
}

impl<T: Marshaler + ?Sized> Marshaler for Box<T> {
    fn marshal_json(&self, w: &mut Writer) {
        (**self).marshal_json(w);
    }
}

impl<T: Unmarshaler + ?Sized> Unmarshaler for Box<T> {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        (**self).unmarshal_json(l);
    }
}

/// `None` is `null`.
impl<T: Marshaler> Marshaler for Option<T> {
    fn marshal_json(&self, w: &mut Writer) {
        match self {
            Some(v) => v.marshal_json(w),
            None => w.null(),
        }
    }
}

/// `null` clears the option; anything else decodes into the existing value,
/// or a default one.
impl<T: Unmarshaler + Default> Unmarshaler for Option<T> {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        if l.is_null() {
            l.consume_null();
            *self = None;
        } else {
            self.get_or_insert_with(T::default).unmarshal_json(l);
        }
    }
}

fn marshal_seq<T: Marshaler>(items: &[T], w: &mut Writer) {
    w.begin_array();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            w.comma();
        }
        item.marshal_json(w);
    }
    w.end_array();
}

impl<T: Marshaler> Marshaler for [T] {
    fn marshal_json(&self, w: &mut Writer) {
        marshal_seq(self, w);
    }
}

impl<T: Marshaler> Marshaler for Vec<T> {
    fn marshal_json(&self, w: &mut Writer) {
        marshal_seq(self, w);
    }
}

/// `null` empties the vector.
impl<T: Unmarshaler + Default> Unmarshaler for Vec<T> {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        self.clear();
        if l.is_null() {
            l.consume_null();
            return;
        }
        l.array(|l, _| {
            let mut item = T::default();
            item.unmarshal_json(l);
            self.push(item);
        });
    }
}

impl<T: Marshaler, const N: usize> Marshaler for [T; N] {
    fn marshal_json(&self, w: &mut Writer) {
        marshal_seq(self, w);
    }
}

/// Fixed-length arrays decode leniently: elements past `N` are scanned and
/// dropped, and slots the input does not reach keep their current values.
/// `null` leaves the array untouched.
impl<T: Unmarshaler, const N: usize> Unmarshaler for [T; N] {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        if l.is_null() {
            l.consume_null();
            return;
        }
        l.array(|l, i| match self.get_mut(i) {
            Some(slot) => slot.unmarshal_json(l),
            None => l.skip_value(),
        });
    }
}

/// A type usable as a map key.
///
/// JSON object keys are always strings. Integer keys are written quoted
/// (`{"1":"a"}`) and parsed back from the key text; a key that is not a valid
/// number for the type records `Syntax` or `NumberOverflow`. Types with their
/// own text form implement this by hand.
pub trait MapKey: Sized {
    fn write_key(&self, w: &mut Writer);

    /// Reads one object key. On error the lexer records it and the returned
    /// key is discarded.
    fn read_key(l: &mut Lexer<'_>) -> Self;
}

impl MapKey for String {
    fn write_key(&self, w: &mut Writer) {
        w.string(self);
    }

    fn read_key(l: &mut Lexer<'_>) -> Self {
        l.field_name().into_owned()
    }
}

impl MapKey for Arc<str> {
    fn write_key(&self, w: &mut Writer) {
        w.string(self);
    }

    fn read_key(l: &mut Lexer<'_>) -> Self {
        l.interned_string()
    }
}

macro_rules! int_keys {
    ($($t:ty => $write:ident, $read:ident;)*) => {$(
        impl MapKey for $t {
            fn write_key(&self, w: &mut Writer) {
                w.$write(*self);
            }

            fn read_key(l: &mut Lexer<'_>) -> Self {
                l.$read()
            }
        }
    )*};
}

int_keys! {
    i8 => i8_str, i8_str;
    i16 => i16_str, i16_str;
    i32 => i32_str, i32_str;
    i64 => i64_str, i64_str;
    isize => isize_str, isize_str;
    u8 => u8_str, u8_str;
    u16 => u16_str, u16_str;
    u32 => u32_str, u32_str;
    u64 => u64_str, u64_str;
    usize => usize_str, usize_str;
}

fn marshal_entries<'m, K, T, I>(entries: I, w: &mut Writer)
where
    K: MapKey + 'm,
    T: Marshaler + 'm,
    I: Iterator<Item = (&'m K, &'m T)>,
{
    w.begin_object();
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            w.comma();
        }
        key.write_key(w);
        w.colon();
        value.marshal_json(w);
    }
    w.end_object();
}

/// Reads an object into `insert`. `null` inserts nothing.
fn unmarshal_entries<K, T>(l: &mut Lexer<'_>, mut insert: impl FnMut(K, T))
where
    K: MapKey,
    T: Unmarshaler + Default,
{
    if l.is_null() {
        l.consume_null();
        return;
    }
    l.delim(b'{');
    let mut index = 0;
    while l.next_item(b'}', index) {
        let key = K::read_key(l);
        l.want_colon();
        if !l.ok() {
            return;
        }
        let mut value = T::default();
        value.unmarshal_json(l);
        insert(key, value);
        index += 1;
    }
    l.delim(b'}');
}

impl<K: MapKey + Ord, T: Marshaler> Marshaler for BTreeMap<K, T> {
    fn marshal_json(&self, w: &mut Writer) {
        marshal_entries(self.iter(), w);
    }
}

impl<K: MapKey + Ord, T: Unmarshaler + Default> Unmarshaler for BTreeMap<K, T> {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        self.clear();
        unmarshal_entries(l, |k, v| {
            self.insert(k, v);
        });
    }
}

/// Entries come out in the map's iteration order.
impl<K: MapKey + Eq + Hash, T: Marshaler, S: BuildHasher> Marshaler for HashMap<K, T, S> {
    fn marshal_json(&self, w: &mut Writer) {
        marshal_entries(self.iter(), w);
    }
}

impl<K, T, S> Unmarshaler for HashMap<K, T, S>
where
    K: MapKey + Eq + Hash,
    T: Unmarshaler + Default,
    S: BuildHasher,
{
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        self.clear();
        unmarshal_entries(l, |k, v| {
            self.insert(k, v);
        });
    }
}

impl Marshaler for Value {
    fn marshal_json(&self, w: &mut Writer) {
        w.value(self);
    }
}

impl Unmarshaler for Value {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        *self = l.value();
    }
}
