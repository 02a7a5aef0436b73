/// Optional search criteria for the post listings.
///
/// Every field left as `None` contributes no predicate.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct PostFilter {
    pub prefecture: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub parking: Option<bool>,
    pub price_range: Option<String>,
    pub entrance_fee: Option<bool>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

/// Query-string flag: missing or empty is absent, `"true"` is true and
/// anything else is false.
pub fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        None | Some("") => None,
        Some(value) => Some(value == "true"),
    }
}

/// Treats an empty query-string value the same as a missing one.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(None), None);
        assert_eq!(parse_flag(Some("")), None);
        assert_eq!(parse_flag(Some("true")), Some(true));
        assert_eq!(parse_flag(Some("false")), Some(false));
        assert_eq!(parse_flag(Some("TRUE")), Some(false));
        assert_eq!(parse_flag(Some("1")), Some(false));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("tokyo".into())), Some("tokyo".into()));
    }
}
