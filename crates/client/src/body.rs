//! JSON body helpers shared by every REST call.

use std::io::{Cursor, Read};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::trace::TraceSink;

/// Serialize an outgoing request body.
///
/// Returns `Ok(None)` when there is no body to send. Otherwise the
/// serialized bytes are traced and returned as a reader positioned at the
/// start.
pub fn marshal_body<T>(body: Option<&T>, trace: &TraceSink) -> Result<Option<Cursor<Vec<u8>>>>
where
    T: Serialize + ?Sized,
{
    let Some(body) = body else {
        return Ok(None);
    };

    let bytes = serde_json::to_vec(body).map_err(ClientError::Marshal)?;
    trace.request_body(&bytes);

    Ok(Some(Cursor::new(bytes)))
}

/// Read a response stream to the end and decode it as JSON.
pub fn unmarshal_response<R, T>(mut body: R, trace: &TraceSink) -> Result<T>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    body.read_to_end(&mut bytes)
        .map_err(|e| ClientError::ReadBody(Box::new(e)))?;
    trace.response_body(&bytes);

    serde_json::from_slice(&bytes).map_err(ClientError::Unmarshal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::capture;
    use proptest::prelude::*;
    use serde::{Deserialize, Serializer};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::io;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Counter {
        a: i64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
    struct Pipeline {
        slug: String,
        steps: Vec<String>,
        branch: Option<String>,
        build_number: i64,
        env: BTreeMap<String, String>,
        retries: Option<Vec<u32>>,
        paused: bool,
    }

    fn pipeline() -> impl Strategy<Value = Pipeline> {
        (
            any::<String>(),
            prop::collection::vec(any::<String>(), 0..8),
            any::<Option<String>>(),
            any::<i64>(),
            prop::collection::btree_map(any::<String>(), any::<String>(), 0..8),
            prop::option::of(prop::collection::vec(any::<u32>(), 0..8)),
            any::<bool>(),
        )
            .prop_map(|(slug, steps, branch, build_number, env, retries, paused)| Pipeline {
                slug,
                steps,
                branch,
                build_number,
                env,
                retries,
                paused,
            })
    }

    fn json_value() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            any::<String>().prop_map(serde_json::Value::from),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(serde_json::Value::Array),
                prop::collection::btree_map(any::<String>(), inner, 0..8)
                    .prop_map(|map| serde_json::Value::Object(map.into_iter().collect())),
            ]
        })
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot serialize this value"))
        }
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
        }
    }

    #[test]
    fn test_marshal_without_body_is_empty() {
        let result = marshal_body::<serde_json::Value>(None, &TraceSink::disabled()).unwrap();
        assert!(result.is_none());
    }

    proptest! {
        #[test]
        fn marshal_then_unmarshal_round_trips_structs(original in pipeline()) {
            let trace = TraceSink::disabled();

            let reader = marshal_body(Some(&original), &trace).unwrap().unwrap();
            let decoded: Pipeline = unmarshal_response(reader, &trace).unwrap();

            prop_assert_eq!(decoded, original);
        }

        #[test]
        fn marshal_then_unmarshal_round_trips_json(original in json_value()) {
            let trace = TraceSink::disabled();

            let reader = marshal_body(Some(&original), &trace).unwrap().unwrap();
            let decoded: serde_json::Value = unmarshal_response(reader, &trace).unwrap();

            prop_assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_marshal_failure_is_wrapped() {
        let err = marshal_body(Some(&Unserializable), &TraceSink::disabled()).unwrap_err();

        assert!(matches!(err, ClientError::Marshal(_)));
        assert!(err.to_string().contains("could not marshal body"));
        assert_eq!(
            std::error::Error::source(&err).map(|e| e.to_string()),
            Some("cannot serialize this value".to_string())
        );
    }

    #[test]
    fn test_marshal_reader_starts_at_beginning() {
        let reader = marshal_body(Some(&json!({"a": 1})), &TraceSink::disabled())
            .unwrap()
            .unwrap();

        assert_eq!(reader.position(), 0);
        assert_eq!(reader.get_ref().as_slice(), br#"{"a":1}"#);
    }

    #[test]
    fn test_unmarshal_populates_destination() {
        let counter: Counter =
            unmarshal_response(&br#"{"a":1}"#[..], &TraceSink::disabled()).unwrap();
        assert_eq!(counter, Counter { a: 1 });
    }

    #[test]
    fn test_unmarshal_invalid_json_is_wrapped() {
        let err =
            unmarshal_response::<_, Counter>(&b"{invalid}"[..], &TraceSink::disabled()).unwrap_err();

        assert!(matches!(err, ClientError::Unmarshal(_)));
        assert!(err.to_string().contains("could not unmarshal response body"));
    }

    #[test]
    fn test_unmarshal_read_failure_is_wrapped() {
        let err = unmarshal_response::<_, Counter>(BrokenReader, &TraceSink::disabled()).unwrap_err();

        assert!(matches!(err, ClientError::ReadBody(_)));
        assert!(err.to_string().contains("could not read response body"));
    }

    #[test]
    fn test_payloads_are_traced() {
        let (dispatch, captured) = capture::dispatch();
        let trace = TraceSink::new(dispatch);

        let reader = marshal_body(Some(&json!({"name": "ci"})), &trace)
            .unwrap()
            .unwrap();
        let _: serde_json::Value = unmarshal_response(reader, &trace).unwrap();

        let out = captured.contents();
        assert!(out.contains(r#"Buildkite Request body {"name":"ci"}"#));
        assert!(out.contains(r#"Buildkite Response body {"name":"ci"}"#));
    }
}
