/// Formats every T as `...`
pub fn mask_fmt<T>(_: &T, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str("...")
}

/// Whether the SQLite URL points at an in-memory database.
pub fn is_in_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory_url("sqlite::memory:"));
        assert!(is_in_memory_url("sqlite://file:books?mode=memory&cache=shared"));
        assert!(!is_in_memory_url("sqlite://bookshelf.db"));
    }
}
