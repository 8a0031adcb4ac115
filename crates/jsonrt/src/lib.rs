//! Reflection-free JSON runtime for generated encode/decode code.
//!
//! A code generator turns each declared type into a pair of functions that
//! drive a [`Writer`] (encode) or a [`Lexer`] (decode) token by token. This
//! crate is the runtime those functions call into:
//!
//! - [`Lexer`]: a zero-copy tokenizer over a borrowed byte slice with a sticky
//!   first error and an optional per-decode [`InternCache`].
//! - [`Writer`]: a chunked encoder with HTML-escaping and nil-container
//!   [`Flags`].
//! - [`Opt`]: "value or explicitly absent" for every primitive.
//! - [`UnknownFields`]: captures unrecognised members for round-tripping.
//! - [`RawMessage`] and [`Value`]: uninterpreted and dynamic JSON.
//! - [`marshal`], [`unmarshal`] and friends wire a fresh writer or lexer to a
//!   [`Marshaler`]/[`Unmarshaler`] implementation per call.
//!
//! ```rust
//! use jsonrt::{Lexer, Marshaler, Unmarshaler, Writer};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Marshaler for Point {
//!     fn marshal_json(&self, w: &mut Writer) {
//!         w.raw_string(r#"{"x":"#);
//!         w.i32(self.x);
//!         w.raw_string(r#","y":"#);
//!         w.i32(self.y);
//!         w.end_object();
//!     }
//! }
//!
//! impl Unmarshaler for Point {
//!     fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
//!         l.object(|l, key| match key {
//!             "x" => self.x = l.i32(),
//!             "y" => self.y = l.i32(),
//!             _ => l.skip_unknown(key),
//!         });
//!     }
//! }
//!
//! let bytes = jsonrt::marshal(&Point { x: 1, y: -2 }).unwrap();
//! assert_eq!(bytes, br#"{"x":1,"y":-2}"#);
//!
//! let mut p = Point::default();
//! jsonrt::unmarshal(&bytes, &mut p).unwrap();
//! assert_eq!(p, Point { x: 1, y: -2 });
//! ```

#![allow(missing_docs)]

mod buffer;
mod codec;
mod error;
mod facade;
mod intern;
mod lexer;
mod opt;
mod options;
mod raw;
mod unknown;
mod value;
mod writer;


pub use buffer::ChunkReader;
pub use codec::{MapKey, Marshaler, Unmarshaler};
pub use error::{EncodeError, Error, ErrorKind, LexerError, SinkError};
pub use facade::{
    Committed, ResponseError, ResponseSink, marshal, marshal_to_response, marshal_to_writer,
    marshal_with, unmarshal, unmarshal_with, unmarshal_with_options,
};
pub use intern::InternCache;
pub use lexer::{Lexer, MAX_DEPTH, TokenKind};
pub use opt::{
    Opt, OptBool, OptFloat32, OptFloat64, OptInt, OptInt8, OptInt16, OptInt32, OptInt64,
    OptString, OptUint, OptUint8, OptUint16, OptUint32, OptUint64, Primitive,
};
pub use options::LexerOptions;
pub use raw::RawMessage;
pub use unknown::UnknownFields;
pub use value::{Array, Map, Value};
pub use writer::{ContainerKind, Flags, Writer};
