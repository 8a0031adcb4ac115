#![no_main]

use arbitrary::Arbitrary;
use jsonrt::{Flags, Lexer, LexerOptions, Value, Writer};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    escape_html: bool,
    strict: bool,
    data: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let options = LexerOptions {
        disallow_unknown_fields: input.strict,
    };

    // skip_value and value must agree on validity and on where the value ends.
    let mut skipper = Lexer::with_options(input.data, options);
    skipper.skip_value();
    let skip_ok = skipper.ok();
    let skip_end = skipper.offset();

    let mut lexer = Lexer::with_options(input.data, options);
    let raw = lexer.raw_value();
    assert_eq!(lexer.ok(), skip_ok);
    if skip_ok {
        assert_eq!(lexer.offset(), skip_end);
    }

    let mut lexer = Lexer::new(raw);
    let value = lexer.value();
    lexer.consumed();
    if lexer.into_result().is_err() {
        return;
    }

    let flags = if input.escape_html {
        Flags::NONE
    } else {
        Flags::NO_ESCAPE_HTML
    };
    let mut w = Writer::with_flags(flags);
    w.value(&value);
    let Ok(bytes) = w.build_bytes() else {
        return;
    };

    // Whatever we write must be valid JSON and read back as the same value.
    if serde_json::from_slice::<serde_json::Value>(&bytes).is_err() {
        panic!("writer produced invalid JSON: {:?}", String::from_utf8_lossy(&bytes));
    }
    let mut reread = Value::Null;
    jsonrt::unmarshal(&bytes, &mut reread).unwrap();
    assert_eq!(reread, value);
});
