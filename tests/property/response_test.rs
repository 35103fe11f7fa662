// tests/property/response_test.rs

//! Property-based tests for response framing
//! Tests that any value or error detail is written as exactly one line.

use beangate::core::protocol::{ErrorCode, LineCodec, Response};
use bytes::BytesMut;
use proptest::prelude::*;
use tokio_util::codec::Encoder;

proptest! {
    #[test]
    fn test_ok_response_has_one_line_per_value(values in prop::collection::vec(".{0,40}", 0..8)) {
        let mut codec = LineCodec::default();
        let mut buf = BytesMut::new();
        let count = values.len();
        codec.encode(Response::Ok(values), &mut buf).unwrap();
        let text = String::from_utf8(buf.to_vec()).unwrap();
        prop_assert_eq!(text.matches('\n').count(), count + 1);
        prop_assert!(text.starts_with("OK\n"));
    }

    #[test]
    fn test_error_response_has_three_lines(detail in "(.|\n|\r|\t){0,80}") {
        let mut codec = LineCodec::default();
        let mut buf = BytesMut::new();
        codec.encode(Response::error(ErrorCode::IoError, detail), &mut buf).unwrap();
        let text = String::from_utf8(buf.to_vec()).unwrap();
        prop_assert_eq!(text.matches('\n').count(), 3);
        prop_assert!(text.starts_with("ERR\nIO_ERROR\n"));
    }
}
