/// Returns the designator class of a reference: the prefix left after
/// stripping a trailing run of decimal digits.
///
/// `"R101"` becomes `"R"` and `"C1"` becomes `"C"`, grouping same-type
/// components under one legend entry. Designators without a trailing digit
/// run (`"U3A"`) are returned unchanged; so are all-digit designators, which
/// would otherwise collapse into an empty class.
pub fn designator_class(designator: &str) -> &str {
    let class = designator.trim_end_matches(|c: char| c.is_ascii_digit());
    if class.is_empty() {
        designator
    } else {
        class
    }
}

#[cfg(test)]
mod tests {
    use super::designator_class;

    #[test]
    fn strips_trailing_digits() {
        assert_eq!(designator_class("R101"), "R");
        assert_eq!(designator_class("C1"), "C");
        assert_eq!(designator_class("REF42"), "REF");
    }

    #[test]
    fn keeps_designators_without_trailing_digits() {
        assert_eq!(designator_class("U3A"), "U3A");
        assert_eq!(designator_class("GND"), "GND");
    }

    #[test]
    fn keeps_all_digit_designators() {
        assert_eq!(designator_class("101"), "101");
    }
}
