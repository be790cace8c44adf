//! Page descriptors and page envelopes for paged list endpoints.
//!
//! List endpoints accept an optional [`PageQuery`] (camelCase query params),
//! resolve it into a [`PageRequest`] with endpoint-specific defaults, and
//! return their rows wrapped in a [`Page`] envelope carrying totals.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Zero-based index of the first page.
pub const DEFAULT_PAGE_NUMBER: u64 = 0;
/// Items per page when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Sort direction for list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `"asc"` in any casing selects ascending; every other token descending.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

/// Resolved sort attribute: which field, which direction.
///
/// The field is kept as the raw caller-supplied token. Mapping it onto an
/// actual sortable column is the store's job, and unknown fields are the
/// store's error to raise.
#[derive(Clone, Debug)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Query parameters accepted by paged list endpoints.
///
/// All parameters are optional; [`PageQuery::resolve`] fills in the
/// endpoint-specific defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index (default 0)
    pub page_number: Option<u64>,
    /// Items per page (default 50, minimum 1)
    pub page_size: Option<u64>,
    /// Field to sort by (default: the entity's id field)
    pub sort_by: Option<String>,
    /// "asc" for ascending, anything else for descending (default "asc")
    pub sort_order: Option<String>,
}

impl PageQuery {
    /// Resolve the optional caller input against endpoint defaults.
    ///
    /// A `pageSize` of 0 is normalized to 1 rather than rejected.
    pub fn resolve(self, default_sort_by: &str, default_order: SortOrder) -> PageRequest {
        let page = self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER);
        let size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let field = self
            .sort_by
            .unwrap_or_else(|| default_sort_by.to_string());
        let order = self
            .sort_order
            .map(|token| SortOrder::from_token(&token))
            .unwrap_or(default_order);

        PageRequest {
            page,
            size,
            sort: Sort { field, order },
        }
    }
}

/// Fully resolved page request handed to the store.
#[derive(Clone, Debug)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl PageRequest {
    /// Number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        self.page * self.size
    }

    /// Number of rows on a full page.
    pub fn limit(&self) -> u64 {
        self.size
    }
}

/// One page of results plus paging metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last_page: bool,
}

impl<T> Page<T> {
    /// Build a page envelope from one page of rows and the filtered total.
    ///
    /// `total_pages` is `ceil(total / size)`; an empty result set therefore
    /// has zero pages and reports `last_page == true` for any page index.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(request.size);
        Self {
            content,
            page_number: request.page,
            page_size: request.size,
            total_elements,
            total_pages,
            last_page: request.page + 1 >= total_pages,
        }
    }

    /// Convert the content, keeping the metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last_page: self.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        page_number: Option<u64>,
        page_size: Option<u64>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> PageQuery {
        PageQuery {
            page_number,
            page_size,
            sort_by: sort_by.map(str::to_string),
            sort_order: sort_order.map(str::to_string),
        }
    }

    #[test]
    fn test_sort_order_token_is_case_insensitive() {
        assert_eq!(SortOrder::from_token("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_token("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::from_token("Asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_token("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_token("anything else"), SortOrder::Desc);
        assert_eq!(SortOrder::from_token(""), SortOrder::Desc);
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let request = query(None, None, None, None).resolve("id", SortOrder::Asc);
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 50);
        assert_eq!(request.sort.field, "id");
        assert_eq!(request.sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_resolve_keeps_caller_values() {
        let request =
            query(Some(2), Some(10), Some("price"), Some("DESC")).resolve("id", SortOrder::Asc);
        assert_eq!(request.page, 2);
        assert_eq!(request.size, 10);
        assert_eq!(request.sort.field, "price");
        assert_eq!(request.sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_resolve_normalizes_zero_page_size() {
        let request = query(None, Some(0), None, None).resolve("id", SortOrder::Asc);
        assert_eq!(request.size, 1);
    }

    #[test]
    fn test_offset_and_limit() {
        let request = query(Some(3), Some(20), None, None).resolve("id", SortOrder::Asc);
        assert_eq!(request.offset(), 60);
        assert_eq!(request.limit(), 20);
    }

    #[test]
    fn test_page_math_for_full_and_final_pages() {
        // 120 rows, page size 50: pages are 50 / 50 / 20
        let request = query(Some(0), Some(50), None, None).resolve("id", SortOrder::Asc);
        let page = Page::new(vec![0u8; 50], &request, 120);
        assert_eq!(page.total_elements, 120);
        assert_eq!(page.total_pages, 3);
        assert!(!page.last_page);

        let request = query(Some(2), Some(50), None, None).resolve("id", SortOrder::Asc);
        let page = Page::new(vec![0u8; 20], &request, 120);
        assert_eq!(page.content.len(), 20);
        assert_eq!(page.total_pages, 3);
        assert!(page.last_page);
    }

    #[test]
    fn test_page_math_for_exact_multiple() {
        let request = query(Some(1), Some(50), None, None).resolve("id", SortOrder::Asc);
        let page = Page::new(vec![0u8; 50], &request, 100);
        assert_eq!(page.total_pages, 2);
        assert!(page.last_page);
    }

    #[test]
    fn test_empty_result_is_last_page() {
        let request = query(Some(0), Some(50), None, None).resolve("id", SortOrder::Asc);
        let page = Page::new(Vec::<u8>::new(), &request, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.last_page);
    }

    #[test]
    fn test_out_of_range_page_is_last_page() {
        let request = query(Some(9), Some(50), None, None).resolve("id", SortOrder::Asc);
        let page = Page::new(Vec::<u8>::new(), &request, 120);
        assert_eq!(page.total_pages, 3);
        assert!(page.content.is_empty());
        assert!(page.last_page);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let request = query(Some(0), Some(2), None, None).resolve("id", SortOrder::Asc);
        let page = Page::new(vec![1, 2], &request, 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageNumber"], 0);
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["totalElements"], 5);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["lastPage"], false);
        assert_eq!(json["content"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let request = query(Some(1), Some(2), None, None).resolve("id", SortOrder::Asc);
        let page = Page::new(vec![1, 2], &request, 6).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_elements, 6);
    }
}
