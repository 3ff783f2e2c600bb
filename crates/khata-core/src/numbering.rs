//! Invoice number sequence: `INV-001`, `INV-002`, ...

/// Prefix every generated invoice number carries.
pub const INVOICE_PREFIX: &str = "INV-";

/// Minimum digits after the prefix; longer numbers are not truncated.
const PAD_WIDTH: usize = 3;

/// Returns the number following `last`, the greatest number on file.
///
/// The digits after the first `INV-` that has any are incremented and
/// zero-padded to three places. With no previous number, or one that does
/// not carry `INV-<digits>`, the sequence restarts at `INV-001`.
///
/// ```rust
/// use khata_core::numbering::next_invoice_number;
///
/// assert_eq!(next_invoice_number(None), "INV-001");
/// assert_eq!(next_invoice_number(Some("INV-004")), "INV-005");
/// assert_eq!(next_invoice_number(Some("INV-999")), "INV-1000");
/// assert_eq!(next_invoice_number(Some("MANUAL-7")), "INV-001");
/// ```
pub fn next_invoice_number(last: Option<&str>) -> String {
    let next = last.and_then(sequence_of).and_then(|n| n.checked_add(1)).unwrap_or(1);
    format!("{}{:0width$}", INVOICE_PREFIX, next, width = PAD_WIDTH)
}

fn sequence_of(number: &str) -> Option<u64> {
    let digits = number.match_indices(INVOICE_PREFIX).find_map(|(at, prefix)| {
        let rest = &number[at + prefix.len()..];
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        (end > 0).then(|| &rest[..end])
    })?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number() {
        assert_eq!(next_invoice_number(None), "INV-001");
    }

    #[test]
    fn test_increments_and_pads() {
        assert_eq!(next_invoice_number(Some("INV-001")), "INV-002");
        assert_eq!(next_invoice_number(Some("INV-004")), "INV-005");
        assert_eq!(next_invoice_number(Some("INV-099")), "INV-100");
        assert_eq!(next_invoice_number(Some("INV-7")), "INV-008");
    }

    #[test]
    fn test_grows_past_pad_width() {
        assert_eq!(next_invoice_number(Some("INV-999")), "INV-1000");
        assert_eq!(next_invoice_number(Some("INV-1234")), "INV-1235");
    }

    #[test]
    fn test_prefix_found_anywhere() {
        assert_eq!(next_invoice_number(Some("2024/INV-041")), "INV-042");
        assert_eq!(next_invoice_number(Some("INV-012-A")), "INV-013");
    }

    #[test]
    fn test_skips_prefix_without_digits() {
        assert_eq!(next_invoice_number(Some("X INV-ABC INV-5")), "INV-006");
        assert_eq!(next_invoice_number(Some("INV-INV-41")), "INV-042");
        assert_eq!(next_invoice_number(Some("INV-3 INV-9")), "INV-004");
    }

    #[test]
    fn test_unparseable_restarts_sequence() {
        assert_eq!(next_invoice_number(Some("")), "INV-001");
        assert_eq!(next_invoice_number(Some("INV-")), "INV-001");
        assert_eq!(next_invoice_number(Some("BILL-42")), "INV-001");
        assert_eq!(
            next_invoice_number(Some("INV-99999999999999999999999")),
            "INV-001"
        );
    }
}
