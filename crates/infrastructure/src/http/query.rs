use domain::PageRequest;

/// Query string builder. Pagination is always sent; filters only when they
/// carry a value (non-empty text, non-zero number, `true`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.0.push(("skip".to_string(), page.skip.to_string()));
        self.0.push(("limit".to_string(), page.limit.to_string()));
        self
    }

    pub fn text(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn number(mut self, key: &str, value: Option<i64>) -> Self {
        if let Some(value) = value.filter(|v| *v != 0) {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn flag(mut self, key: &str, value: bool) -> Self {
        if value {
            self.0.push((key.to_string(), "true".to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_filters_are_dropped() {
        let params = QueryParams::new()
            .text("search", Some("  "))
            .text("race", None)
            .number("bull_id", Some(0))
            .flag("active", false);
        assert!(params.is_empty());
    }

    #[test]
    fn test_pagination_always_sent() {
        let params = QueryParams::new()
            .page(PageRequest::first(10))
            .text("search", Some(" ana "))
            .number("bull_id", Some(4))
            .flag("active", true);
        let pairs: Vec<(&str, &str)> = params
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("skip", "0"),
                ("limit", "10"),
                ("search", "ana"),
                ("bull_id", "4"),
                ("active", "true")
            ]
        );
    }
}
