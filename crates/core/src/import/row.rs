//! Parsed rows and tolerant header matching.
//!
//! Uploaded files spell the same column many ways (`accountCode`,
//! `account_code`, `Account Code`, `code`). [`resolve_field`] hides that
//! from every consumer.

use serde::{Deserialize, Serialize};

/// One data row of an uploaded file, keyed by its original headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Line number in the source file (header is line 1).
    pub row_number: usize,
    /// `(header, cell)` pairs in column order.
    pub cells: Vec<(String, String)>,
}

impl ImportRow {
    /// Creates a row from header/cell pairs.
    pub fn new<H, V>(row_number: usize, cells: impl IntoIterator<Item = (H, V)>) -> Self
    where
        H: Into<String>,
        V: Into<String>,
    {
        Self {
            row_number,
            cells: cells
                .into_iter()
                .map(|(h, v)| (h.into(), v.into()))
                .collect(),
        }
    }

    /// Cell under exactly `header`.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Sets the cell under `header`, adding the column if absent.
    pub fn set(&mut self, header: &str, value: impl Into<String>) {
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| h == header) {
            Some((_, cell)) => *cell = value,
            None => self.cells.push((header.to_string(), value)),
        }
    }

    /// Header actually used for `canonical`, if any column matches.
    #[must_use]
    pub fn header_for(&self, canonical: &str) -> Option<&str> {
        for alias in aliases(canonical) {
            if let Some((h, _)) = self.cells.iter().find(|(h, _)| h.trim() == alias) {
                return Some(h);
            }
        }

        let wanted = normalize(canonical);
        if let Some((h, _)) = self.cells.iter().find(|(h, _)| normalize(h) == wanted) {
            return Some(h);
        }

        synonyms(canonical).iter().find_map(|syn| {
            let syn = normalize(syn);
            self.cells
                .iter()
                .find(|(h, _)| normalize(h) == syn)
                .map(|(h, _)| h.as_str())
        })
    }

    /// True if every cell is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

/// Looks up a field by its canonical camelCase name.
///
/// Tries snake_case, kebab-case, camelCase, PascalCase, space-separated and
/// Title Case spellings, then a case-insensitive scan ignoring separators,
/// then a short synonym list. Blank cells count as missing.
#[must_use]
pub fn resolve_field<'a>(row: &'a ImportRow, canonical: &str) -> Option<&'a str> {
    let header = row.header_for(canonical)?;
    row.get(header)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.extend(c.to_lowercase());
        } else {
            current.extend(c.to_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Spelling variants of a canonical field name.
fn aliases(canonical: &str) -> Vec<String> {
    let words = split_words(canonical);
    if words.is_empty() {
        return Vec::new();
    }
    let camel: String = words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
        .collect();
    let pascal: String = words.iter().map(|w| capitalize(w)).collect();
    let title = words.iter().map(|w| capitalize(w)).collect::<Vec<_>>().join(" ");

    vec![
        canonical.to_string(),
        words.join("_"),
        words.join("-"),
        camel,
        pascal,
        words.join(" "),
        title,
    ]
}

/// Lowercase alphanumerics only.
fn normalize(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Other names operators use for the same column.
fn synonyms(canonical: &str) -> &'static [&'static str] {
    match normalize(canonical).as_str() {
        "accountcode" => &["code", "account number", "account no", "acct", "acct no", "gl code", "account"],
        "accountname" => &["name", "title"],
        "accounttype" => &["type", "category"],
        "subtype" => &["account subtype", "detail type"],
        "parentcode" => &["parent", "parent account", "parent account code"],
        "description" => &["desc", "notes"],
        "isactive" => &["active", "status"],
        "accountid" => &["id"],
        "entrydate" => &["date", "transaction date", "posting date"],
        "reference" => &["ref", "reference number", "reference no", "ref no", "entry number", "je number"],
        "memo" => &["line memo", "line description"],
        "debit" => &["dr", "debit amount"],
        "credit" => &["cr", "credit amount"],
        "entrytype" => &["type", "side", "dr cr"],
        "entitycode" => &["entity", "company", "company code"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("accountCode")]
    #[case("account_code")]
    #[case("account-code")]
    #[case("AccountCode")]
    #[case("account code")]
    #[case("Account Code")]
    #[case("ACCOUNT CODE")]
    #[case(" Account_Code ")]
    #[case("code")]
    #[case("Acct No")]
    fn test_account_code_aliases(#[case] header: &str) {
        let row = ImportRow::new(2, [(header, "1000")]);
        assert_eq!(resolve_field(&row, "accountCode"), Some("1000"));
    }

    #[test]
    fn test_exact_spelling_beats_synonym() {
        let row = ImportRow::new(2, [("code", "X"), ("Account Code", "1000")]);
        assert_eq!(resolve_field(&row, "accountCode"), Some("1000"));
    }

    #[test]
    fn test_missing_and_blank_fields() {
        let row = ImportRow::new(2, [("name", "Cash"), ("type", "  ")]);
        assert_eq!(resolve_field(&row, "accountName"), Some("Cash"));
        assert_eq!(resolve_field(&row, "accountType"), None);
        assert_eq!(resolve_field(&row, "parentCode"), None);
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("parentCode"), vec!["parent", "code"]);
        assert_eq!(split_words("is_active"), vec!["is", "active"]);
        assert_eq!(aliases("entryDate")[6], "Entry Date");
    }

    #[test]
    fn test_set_overwrites_or_appends() {
        let mut row = ImportRow::new(3, [("Debit", "10")]);
        row.set("Debit", "20");
        row.set("Memo", "fixed");
        assert_eq!(row.get("Debit"), Some("20"));
        assert_eq!(row.get("Memo"), Some("fixed"));
        assert!(!row.is_blank());
    }
}
