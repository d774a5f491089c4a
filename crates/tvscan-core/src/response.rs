use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded scan response.
///
/// `rows` holds exactly what the service returned; it is never padded or
/// truncated to `total_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerResult {
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    #[serde(rename = "data")]
    pub rows: Vec<ScreenerRow>,
}

impl ScreenerResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pairs each row's values with `columns` by position.
    ///
    /// The symbol is stored under `"symbol"`. Missing trailing values become
    /// `null`; surplus values are dropped.
    pub fn records<S: AsRef<str>>(&self, columns: &[S]) -> Vec<Map<String, Value>> {
        self.rows.iter().map(|row| row.record(columns)).collect()
    }
}

/// One symbol's values, aligned with the request's `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerRow {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "d")]
    pub values: Vec<Value>,
}

impl ScreenerRow {
    /// Value at the position of `column` in `columns`.
    pub fn get<S: AsRef<str>>(&self, columns: &[S], column: &str) -> Option<&Value> {
        columns
            .iter()
            .position(|candidate| candidate.as_ref() == column)
            .and_then(|index| self.values.get(index))
    }

    pub fn record<S: AsRef<str>>(&self, columns: &[S]) -> Map<String, Value> {
        let mut record = Map::with_capacity(columns.len() + 1);
        record.insert(String::from("symbol"), Value::from(self.symbol.as_str()));
        for (index, column) in columns.iter().enumerate() {
            let value = self.values.get(index).cloned().unwrap_or(Value::Null);
            record.insert(column.as_ref().to_owned(), value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(symbol: &str, values: Value) -> ScreenerRow {
        ScreenerRow {
            symbol: symbol.to_owned(),
            values: serde_json::from_value(values).expect("values should decode"),
        }
    }

    #[test]
    fn records_zip_values_with_columns() {
        let result = ScreenerResult {
            total_count: 1,
            rows: vec![row("NASDAQ:AAPL", json!(["Apple", 190.5, null]))],
        };

        let records = result.records(&["name", "close", "volume", "market_cap_basic"]);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({
                "symbol": "NASDAQ:AAPL",
                "name": "Apple",
                "close": 190.5,
                "volume": null,
                "market_cap_basic": null
            })
        );
    }

    #[test]
    fn get_looks_up_by_column_position() {
        let row = row("NYSE:IBM", json!(["IBM", 140]));
        let columns = ["name", "close"];

        assert_eq!(row.get(&columns, "close"), Some(&json!(140)));
        assert_eq!(row.get(&columns, "volume"), None);
    }

    #[test]
    fn serializes_with_wire_names() {
        let result = ScreenerResult {
            total_count: 7,
            rows: vec![row("NYSE:IBM", json!([1]))],
        };

        assert_eq!(
            serde_json::to_value(&result).expect("result should serialize"),
            json!({"totalCount": 7, "data": [{"s": "NYSE:IBM", "d": [1]}]})
        );
    }
}
