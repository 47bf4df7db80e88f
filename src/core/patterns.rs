/// Index syntax shared by the xrefs loader and the CSV merger
///
/// Both input files key their records by a string-table index. An index is
/// accepted with surrounding whitespace, an optional sign, and single
/// underscores between digit groups (`1_024`).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches a whole index field and captures its sign and digits
    static ref INDEX_PATTERN: Regex =
        Regex::new(r"^\s*([+-]?)([0-9]+(?:_[0-9]+)*)\s*$").expect("index pattern is valid");
}

/// Parse a string-table index.
///
/// # Arguments
///
/// * `field` - Raw text of the index field
///
/// # Returns
///
/// The parsed index, or `None` if the field is not an integer or does not fit in an `i64`
pub fn parse_index(field: &str) -> Option<i64> {
    let captures = INDEX_PATTERN.captures(field)?;
    let sign = captures.get(1).map_or("", |m| m.as_str());
    let digits = captures.get(2)?.as_str().replace('_', "");

    format!("{}{}", sign, digits).parse::<i64>().ok()
}
