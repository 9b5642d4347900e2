//! Record decoding and KPI arithmetic shared by the pipeline.
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decodes raw Odoo records, skipping the ones that cannot be read at all.
pub fn decode_records<T: DeserializeOwned>(model: &str, records: Vec<Value>) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| {
            serde_json::from_value(record)
                .map_err(|e| {
                    warn!("Skipping malformed {model} record: {e}");
                })
                .ok()
        })
        .collect()
}

pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }

    (part as f64 / whole as f64 * 100.0).round_ties_even() as u32
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::{decode_records, percentage};

    #[derive(Deserialize)]
    struct Row {
        id: i64,
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let rows: Vec<Row> = decode_records(
            "test.model",
            vec![json!({ "id": 1 }), json!({ "id": "x" }), json!(42), json!({ "id": 3 })],
        );

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(0, 4), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(4, 4), 100);
    }

    #[test]
    fn test_percentage_ties_round_to_even() {
        // 12.5 and 37.5
        assert_eq!(percentage(1, 8), 12);
        assert_eq!(percentage(3, 8), 38);
    }
}
