//! Wire encoding of scan requests and decoding of scan responses.
//!
//! Encoding validates before it serializes: the page range must be ordered and
//! every leaf predicate, in `filter` and in `filter2`, must carry an operand of
//! the shape its operation expects. Decoding checks shape only; values are
//! passed through untouched.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ConstructionError, DecodeError, ScreenerError, SerializationError};
use crate::filter::FilterOperation;
use crate::request::QueryRequest;
use crate::response::{ScreenerResult, ScreenerRow};

/// Validates `request` and encodes it as the scanner's JSON body.
pub fn encode_request(request: &QueryRequest) -> Result<String, ScreenerError> {
    let (start, end) = (request.range.start(), request.range.end());
    if start > end {
        return Err(ConstructionError::InvalidRange { start, end }.into());
    }

    let flat = request.filter.iter().flatten();
    let tree = request
        .filter_tree
        .iter()
        .flat_map(|tree| tree.leaves());
    for filter in flat.chain(tree) {
        validate_filter(filter)?;
    }

    serde_json::to_string(request)
        .map_err(SerializationError::Encode)
        .map_err(ScreenerError::from)
}

/// Parses a wire request body back into a [`QueryRequest`].
///
/// `filter2` trees may nest arbitrarily deep, so the recursion limit is lifted
/// and the stack grows on demand while decoding.
pub fn decode_request(body: &str) -> Result<QueryRequest, ScreenerError> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    deserializer.disable_recursion_limit();
    let request = QueryRequest::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(SerializationError::Decode)?;
    deserializer.end().map_err(SerializationError::Decode)?;
    Ok(request)
}

/// Decodes a `{totalCount, data}` response body.
pub fn decode_response(body: &str) -> Result<ScreenerResult, DecodeError> {
    let value: Value = serde_json::from_str(body).map_err(DecodeError::Malformed)?;
    let Value::Object(mut object) = value else {
        return Err(DecodeError::InvalidField {
            field: "response",
            expected: "an object",
        });
    };

    if let Some(message) = service_error(&object) {
        return Err(DecodeError::Service { message });
    }

    let total_count = match object.get("totalCount") {
        None | Some(Value::Null) => return Err(DecodeError::MissingField("totalCount")),
        Some(count) => count.as_u64().ok_or(DecodeError::InvalidField {
            field: "totalCount",
            expected: "a non-negative integer",
        })?,
    };

    let rows = match object.remove("data") {
        None | Some(Value::Null) => return Err(DecodeError::MissingField("data")),
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            return Err(DecodeError::InvalidField {
                field: "data",
                expected: "an array",
            })
        }
    };

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| decode_row(index, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScreenerResult { total_count, rows })
}

fn validate_filter(filter: &FilterOperation) -> Result<(), SerializationError> {
    filter
        .validate()
        .map_err(|source| SerializationError::InvalidFilter {
            field: filter.left().to_owned(),
            operation: filter.operation().as_str(),
            source,
        })
}

// The scanner answers unknown fields with `{"error": "...", "data": null}`.
fn service_error(object: &Map<String, Value>) -> Option<String> {
    let message = object.get("error")?.as_str()?;
    let has_data = matches!(object.get("data"), Some(Value::Array(_)));
    (!message.is_empty() && !has_data).then(|| message.to_owned())
}

fn decode_row(index: usize, row: Value) -> Result<ScreenerRow, DecodeError> {
    let invalid = |reason: &str| DecodeError::InvalidRow {
        index,
        reason: reason.to_owned(),
    };

    let Value::Object(mut row) = row else {
        return Err(invalid("expected an object"));
    };
    let symbol = match row.remove("s") {
        Some(Value::String(symbol)) => symbol,
        Some(_) => return Err(invalid("'s' must be a string")),
        None => return Err(invalid("missing 's'")),
    };
    let values = match row.remove("d") {
        Some(Value::Array(values)) => values,
        Some(_) => return Err(invalid("'d' must be an array")),
        None => return Err(invalid("missing 'd'")),
    };

    Ok(ScreenerRow { symbol, values })
}
