use domain::Page;
use domain::serde_util::optional_count;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Every shape a list endpoint has been seen to answer with.
///
/// The shape is picked from the JSON itself: an array is a bare list, an
/// object with `items` or `results` is a wrapped page, and any other object
/// is a lone item. Totals are read as leniently as entity counts.
#[derive(Debug)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Items { items: Vec<T>, total: Option<u64> },
    Results { results: Vec<T>, count: Option<u64> },
    Single(T),
}

fn lenient_total(value: Value) -> Option<u64> {
    optional_count(value)
        .ok()
        .flatten()
        .map(|n| u64::try_from(n).unwrap_or(0))
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ListEnvelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let envelope = match value {
            Value::Array(_) => serde_json::from_value(value).map(Self::Bare),
            Value::Object(mut map) => {
                if let Some(items) = map.remove("items") {
                    let total = map.remove("total").and_then(lenient_total);
                    serde_json::from_value(items).map(|items| Self::Items { items, total })
                } else if let Some(results) = map.remove("results") {
                    let count = map.remove("count").and_then(lenient_total);
                    serde_json::from_value(results).map(|results| Self::Results { results, count })
                } else {
                    serde_json::from_value(Value::Object(map)).map(Self::Single)
                }
            }
            other => return Err(D::Error::custom(format!("unexpected list response: {other}"))),
        };
        envelope.map_err(D::Error::custom)
    }
}

impl<T> ListEnvelope<T> {
    pub fn normalize(self) -> Page<T> {
        match self {
            Self::Bare(items) => Page::from_items(items),
            Self::Items { items, total } => match total {
                Some(total) => Page::new(items, total),
                None => Page::from_items(items),
            },
            Self::Results { results, count } => match count {
                Some(count) => Page::new(results, count),
                None => Page::from_items(results),
            },
            Self::Single(item) => Page::from_items(vec![item]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    fn decode(value: serde_json::Value) -> Page<Row> {
        serde_json::from_value::<ListEnvelope<Row>>(value)
            .unwrap()
            .normalize()
    }

    #[test]
    fn test_bare_array() {
        let page = decode(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(page.items, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_items_with_total() {
        let page = decode(json!({"items": [{"id": 1}], "total": 40}));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 40);
    }

    #[test]
    fn test_items_without_total() {
        let page = decode(json!({"items": [{"id": 1}, {"id": 5}]}));
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_results_with_count() {
        let page = decode(json!({"results": [{"id": 3}], "count": 9}));
        assert_eq!(page.items, vec![Row { id: 3 }]);
        assert_eq!(page.total, 9);
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let page = decode(json!({"id": 7}));
        assert_eq!(page.items, vec![Row { id: 7 }]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_empty_array() {
        assert!(decode(json!([])).is_empty());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct LooseRow {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        code: String,
    }

    #[test]
    fn test_items_with_string_total() {
        let page = decode(json!({"items": [{"id": 1}, {"id": 2}], "total": "2"}));
        assert_eq!(page.items, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(page.total, 2);

        let page = decode(json!({"results": [{"id": 3}], "count": "9.0"}));
        assert_eq!(page.total, 9);
    }

    #[test]
    fn test_unreadable_total_is_lenient() {
        let page = decode(json!({"items": [{"id": 1}], "total": "lots"}));
        assert_eq!(page.total, 0);
        let page = decode(json!({"items": [{"id": 1}], "total": null}));
        assert_eq!(page.total, 1);
        let page = decode(json!({"items": [{"id": 1}], "total": -4}));
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_wrapped_page_never_becomes_a_single_row() {
        let page = serde_json::from_value::<ListEnvelope<LooseRow>>(json!({
            "items": [{"id": 1, "code": "A"}, {"id": 2, "code": "B"}],
            "total": "2"
        }))
        .unwrap()
        .normalize();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, Some(1));
        assert_eq!(page.items[1].code, "B");

        let broken = serde_json::from_value::<ListEnvelope<LooseRow>>(json!({"items": "oops"}));
        assert!(broken.is_err());
        let broken = serde_json::from_value::<ListEnvelope<LooseRow>>(json!({"results": {"id": 1}}));
        assert!(broken.is_err());
    }

    #[test]
    fn test_unrecognised_shape_is_an_error() {
        assert!(serde_json::from_value::<ListEnvelope<Row>>(json!("nope")).is_err());
    }
}
