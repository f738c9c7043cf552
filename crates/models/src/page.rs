use serde::{Deserialize, Serialize};

/// One page of a paginated list response, exactly as the backend returns it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// An empty first page, used as the reset value before any load.
    pub fn empty(per_page: u32) -> Self {
        Self { page: 1, per_page, total_items: 0, total_pages: 0, items: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn deserializes_backend_envelope() {
        let raw = r#"{"page":2,"perPage":10,"totalItems":25,"totalPages":3,"items":["a","b"]}"#;
        let page: Page<String> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, vec!["a", "b"]);
    }
}
