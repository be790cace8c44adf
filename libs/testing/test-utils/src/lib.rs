//! Test helpers shared by the domain crates.
//!
//! [`TestDataBuilder`] derives record names from a seed so a test can create
//! uniquely named rows without colliding with its neighbours while staying
//! reproducible from run to run. [`assertions`] collects checks that recur in
//! the handler and service tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeded source of unique record names.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds the builder from the test's own name.
    ///
    /// Two runs of the same test produce the same names; two different tests
    /// produce different ones.
    pub fn from_test_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Produces `test-{prefix}-{seed}-{suffix}`.
    ///
    /// The result is always longer than the five characters category name
    /// validation requires.
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Assertions shared by handler and service tests.
pub mod assertions {
    /// Compares floats with a 1e-9 tolerance.
    ///
    /// Special prices are derived in floating point, so exact equality is too
    /// strict.
    pub fn assert_close(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{}: expected {}, got {}",
            context,
            expected,
            actual
        );
    }

    /// Checks every metadata field of a paged JSON envelope at once.
    pub fn assert_page_metadata(
        body: &serde_json::Value,
        page_number: u64,
        page_size: u64,
        total_elements: u64,
        total_pages: u64,
        last_page: bool,
    ) {
        assert_eq!(body["pageNumber"], page_number, "pageNumber mismatch");
        assert_eq!(body["pageSize"], page_size, "pageSize mismatch");
        assert_eq!(
            body["totalElements"], total_elements,
            "totalElements mismatch"
        );
        assert_eq!(body["totalPages"], total_pages, "totalPages mismatch");
        assert_eq!(body["lastPage"], last_page, "lastPage mismatch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_names() {
        assert_eq!(
            TestDataBuilder::new(7).name("category", "main"),
            TestDataBuilder::new(7).name("category", "main")
        );
    }

    #[test]
    fn test_names_seed_reproducibly() {
        let first = TestDataBuilder::from_test_name("lists_products");
        let second = TestDataBuilder::from_test_name("lists_products");
        assert_eq!(first.name("product", "a"), second.name("product", "a"));
    }

    #[test]
    fn distinct_tests_get_distinct_names() {
        let first = TestDataBuilder::from_test_name("creates_category");
        let second = TestDataBuilder::from_test_name("deletes_category");
        assert_ne!(first.name("category", "a"), second.name("category", "a"));
    }

    #[test]
    fn close_enough_floats_pass() {
        assertions::assert_close(900.0, 900.0 + 1e-12, "special price");
    }

    #[test]
    #[should_panic(expected = "special price")]
    fn distant_floats_panic() {
        assertions::assert_close(900.0, 900.1, "special price");
    }

    #[test]
    fn page_metadata_helper_reads_the_envelope() {
        let body = serde_json::json!({
            "content": [],
            "pageNumber": 2,
            "pageSize": 50,
            "totalElements": 120,
            "totalPages": 3,
            "lastPage": true,
        });

        assertions::assert_page_metadata(&body, 2, 50, 120, 3, true);
    }
}
