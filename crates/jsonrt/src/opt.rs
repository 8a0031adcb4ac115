//! Optional primitive values.
//!
//! [`Opt<T>`] distinguishes "explicitly absent" from a zero value. An absent
//! value encodes as `null`, and `null` decodes to an absent value whose
//! payload is reset to `T::default()`.

use std::fmt;

use crate::{
    codec::{Marshaler, Unmarshaler},
    lexer::Lexer,
    writer::Writer,
};

mod sealed {
    pub trait Sealed {}
}

/// Types [`Opt`] can hold: `bool`, the integer widths, the float widths and
/// `String`.
pub trait Primitive:
    sealed::Sealed + Marshaler + Unmarshaler + Default + Clone + fmt::Display
{
}

macro_rules! primitives {
    ($($t:ty => $alias:ident),* $(,)?) => {$(
        impl sealed::Sealed for $t {}
        impl Primitive for $t {}

        #[doc = concat!("Optional `", stringify!($t), "`.")]
        pub type $alias = Opt<$t>;
    )*};
}

primitives! {
    bool => OptBool,
    i8 => OptInt8,
    i16 => OptInt16,
    i32 => OptInt32,
    i64 => OptInt64,
    isize => OptInt,
    u8 => OptUint8,
    u16 => OptUint16,
    u32 => OptUint32,
    u64 => OptUint64,
    usize => OptUint,
    f32 => OptFloat32,
    f64 => OptFloat64,
    String => OptString,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Hash)]
pub struct Opt<T> {
    value: T,
    defined: bool,
}

impl<T: Primitive> Opt<T> {
    /// A defined value.
    #[must_use]
    pub fn of(value: T) -> Self {
        Self {
            value,
            defined: true,
        }
    }

    /// An absent value.
    #[must_use]
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Returns the held value, or `default` when absent.
    #[must_use]
    pub fn get(&self, default: T) -> T {
        if self.defined {
            self.value.clone()
        } else {
            default
        }
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    #[must_use]
    pub fn as_option(&self) -> Option<&T> {
        self.defined.then_some(&self.value)
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        self.defined.then_some(self.value)
    }

    pub fn set(&mut self, value: T) {
        *self = Self::of(value);
    }

    /// Marks the value absent and resets the payload.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<T: Primitive> From<Option<T>> for Opt<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or_else(Self::default, Self::of)
    }
}

impl<T: Primitive> From<Opt<T>> for Option<T> {
    fn from(v: Opt<T>) -> Self {
        v.into_option()
    }
}

impl<T: Primitive> Marshaler for Opt<T> {
    fn marshal_json(&self, w: &mut Writer) {
        if self.defined {
            self.value.marshal_json(w);
        } else {
            w.null();
        }
    }
}

impl<T: Primitive> Unmarshaler for Opt<T> {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        if l.is_null() {
            l.consume_null();
            self.clear();
        } else {
            self.value.unmarshal_json(l);
            self.defined = l.ok();
        }
    }
}

impl<T: Primitive> fmt::Display for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.defined {
            fmt::Display::fmt(&self.value, f)
        } else {
            f.write_str("<undefined>")
        }
    }
}

#[cfg(any(test, feature = "serde"))]
impl<T: Primitive + serde::Serialize> serde::Serialize for Opt<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

#[cfg(any(test, feature = "serde"))]
impl<'de, T: Primitive + serde::Deserialize<'de>> serde::Deserialize<'de> for Opt<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
