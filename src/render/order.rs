//! Row ordering for the Gantt grid.

use std::cmp::Ordering;

/// How grid rows are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// First-appearance order of the process ids.
    #[default]
    Arrival,
    /// By numeric suffix, so `P2` sorts before `P10`.
    NumericSuffix,
}

impl RowOrder {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            RowOrder::Arrival => RowOrder::NumericSuffix,
            RowOrder::NumericSuffix => RowOrder::Arrival,
        }
    }

    /// Orders `ids` (given in first-appearance order) without touching the input.
    pub fn apply<'a>(&self, ids: &'a [String]) -> Vec<&'a str> {
        let mut out: Vec<&str> = ids.iter().map(String::as_str).collect();
        if *self == RowOrder::NumericSuffix {
            out.sort_by(|a, b| suffix_cmp(a, b));
        }
        out
    }
}

/// Splits `P10` into `("P", Some(10))`; ids without a trailing number
/// yield `(id, None)`.
fn split_suffix(id: &str) -> (&str, Option<u64>) {
    let digits = id.bytes().rev().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (id, None);
    }
    let (prefix, number) = id.split_at(id.len() - digits);
    match number.parse() {
        Ok(n) => (prefix, Some(n)),
        Err(_) => (id, None),
    }
}

/// Compares process ids by `(prefix, numeric suffix)`, then lexicographically.
///
/// Ids without a numeric suffix compare by their full text.
pub fn suffix_cmp(a: &str, b: &str) -> Ordering {
    let (pa, na) = split_suffix(a);
    let (pb, nb) = split_suffix(b);
    pa.cmp(pb).then(na.cmp(&nb)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_suffix_order() {
        let input = ids(&["P10", "P2", "P1"]);
        assert_eq!(RowOrder::NumericSuffix.apply(&input), vec!["P1", "P2", "P10"]);
    }

    #[test]
    fn test_arrival_order_untouched() {
        let input = ids(&["P10", "P2", "P1"]);
        assert_eq!(RowOrder::Arrival.apply(&input), vec!["P10", "P2", "P1"]);
    }

    #[test]
    fn test_no_suffix_falls_back_to_lexicographic() {
        let input = ids(&["beta", "alpha", "gamma"]);
        assert_eq!(
            RowOrder::NumericSuffix.apply(&input),
            vec!["alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn test_mixed_prefixes() {
        let input = ids(&["B2", "A10", "A9", "B", "A"]);
        assert_eq!(
            RowOrder::NumericSuffix.apply(&input),
            vec!["A", "A9", "A10", "B", "B2"]
        );
    }

    #[test]
    fn test_leading_zeros_tie_break() {
        assert_eq!(suffix_cmp("P01", "P1"), Ordering::Less);
        assert_eq!(suffix_cmp("P1", "P1"), Ordering::Equal);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(RowOrder::Arrival.toggled(), RowOrder::NumericSuffix);
        assert_eq!(RowOrder::NumericSuffix.toggled(), RowOrder::Arrival);
    }
}
