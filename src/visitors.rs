use crate::store::Storage;

/// Count one more visit and return the new total. A missing or garbled
/// stored value counts as zero; the total stops at `i64::MAX`.
pub fn increment(storage: &dyn Storage, key: &str) -> Result<i64, String> {
    let next = storage.get_i64(key).max(0).saturating_add(1);
    storage.set(key, &next.to_string())?;
    Ok(next)
}

/// Total as displayed on the page. Never fails: if the write does not go
/// through, the previous total is shown.
pub fn record_visit(storage: &dyn Storage, key: &str) -> String {
    match increment(storage, key) {
        Ok(n) => format_count(n),
        Err(e) => {
            log::warn!("Visitor counter error: {}", e);
            format_count(storage.get_i64(key))
        }
    }
}

/// Group thousands with commas: `1234567` → `1,234,567`.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    #[test]
    fn test_increment_from_empty() {
        let store = MemoryStorage::new();
        assert_eq!(increment(&store, "visits").unwrap(), 1);
        assert_eq!(increment(&store, "visits").unwrap(), 2);
        assert_eq!(store.get("visits"), Some("2".to_string()));
    }

    #[test]
    fn test_garbled_value_restarts_at_one() {
        let store = MemoryStorage::new();
        store.set("visits", "lots").unwrap();
        assert_eq!(increment(&store, "visits").unwrap(), 1);
    }

    #[test]
    fn test_counter_saturates_at_max() {
        let store = MemoryStorage::new();
        store.set("visits", &i64::MAX.to_string()).unwrap();
        assert_eq!(increment(&store, "visits").unwrap(), i64::MAX);
        assert_eq!(store.get_i64("visits"), i64::MAX);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(-4200), "-4,200");
    }
}
