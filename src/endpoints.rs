//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// [TRANSACTIONS] with a trailing slash, served the same way.
pub const TRANSACTIONS_SLASH: &str = "/transactions/";
/// The route for the sum of the session's transaction amounts.
pub const TRANSACTIONS_SUMMARY: &str = "/transactions/summary";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a right
/// brace, e.g. '{transaction_id}' in '/transactions/{transaction_id}'.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };
    let Some(param_end) = endpoint_path[param_start..].find('}') else {
        return endpoint_path.to_owned();
    };

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_start + param_end + 1..]
    )
}

#[cfg(test)]
mod tests {
    use super::{TRANSACTION, TRANSACTIONS, format_endpoint};

    #[test]
    fn replaces_parameter() {
        assert_eq!(format_endpoint(TRANSACTION, "abc"), "/transactions/abc");
    }

    #[test]
    fn returns_path_without_parameter_unchanged() {
        assert_eq!(format_endpoint(TRANSACTIONS, 1), TRANSACTIONS);
    }

    #[test]
    fn keeps_suffix_after_parameter() {
        assert_eq!(
            format_endpoint("/transactions/{transaction_id}/edit", 42),
            "/transactions/42/edit"
        );
    }
}
