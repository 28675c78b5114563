//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as the first argument. Methods that the booking engine also
//! calls inside a transaction accept any [`sqlx::PgExecutor`] instead, so
//! callers can pass either the pool or `&mut *tx`.

pub mod history_repo;
pub mod lot_repo;
pub mod role_repo;
pub mod user_repo;

pub use history_repo::HistoryRepo;
pub use lot_repo::LotRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;

/// Build a `%term%` pattern for `ILIKE`, escaping the LIKE wildcards in
/// `term` so user input matches literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn plain_term_is_wrapped() {
        assert_eq!(contains_pattern("ab12"), "%ab12%");
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
