/// Percentage of `sent` over `total`, rounded to a single decimal.
///
/// Exactly `100.0` once `sent == total`, and `100.0` for a zero-byte
/// total so callers never divide by zero.
pub fn percent_complete(sent: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    ((sent as f64 / total as f64) * 1000.0).round() / 10.0
}
