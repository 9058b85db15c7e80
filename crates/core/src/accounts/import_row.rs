//! Typed view of one uploaded chart-of-accounts row.

use ledgerwise_shared::types::AccountId;

use super::types::AccountType;
use super::warning::{ImportWarning, WarningCode};
use crate::import::{ImportRow, resolve_field};

/// A chart-of-accounts row with headers resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountImportRow {
    /// Source row number.
    pub row_number: usize,
    /// Existing account id, when the file carries one.
    pub id: Option<AccountId>,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Subtype; `None` leaves an existing value alone.
    pub subtype: Option<String>,
    /// Description; `None` leaves an existing value alone.
    pub description: Option<String>,
    /// Parent account code.
    pub parent_code: Option<String>,
    /// Explicit active flag.
    pub is_active: Option<bool>,
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "active" => Some(true),
        "false" | "no" | "n" | "0" | "inactive" => Some(false),
        _ => None,
    }
}

impl AccountImportRow {
    /// Reads a row, returning a warning instead when it must be skipped.
    ///
    /// # Errors
    ///
    /// Missing code, name, or type, and unparseable types, yield a warning.
    pub fn from_row(row: &ImportRow) -> Result<Self, ImportWarning> {
        let code = resolve_field(row, "accountCode");
        let name = resolve_field(row, "accountName");
        let raw_type = resolve_field(row, "accountType");

        let (Some(code), Some(name), Some(raw_type)) = (code, name, raw_type) else {
            let missing: Vec<&str> = [("code", code), ("name", name), ("type", raw_type)]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(f, _)| f)
                .collect();
            return Err(ImportWarning::row(
                row.row_number,
                code,
                WarningCode::MissingRequiredField,
                format!("Row skipped: missing {}", missing.join(", ")),
            ));
        };

        let Some(account_type) = AccountType::parse(raw_type) else {
            return Err(ImportWarning::row(
                row.row_number,
                Some(code),
                WarningCode::InvalidAccountType,
                format!("Row skipped: unknown account type '{raw_type}'"),
            ));
        };

        Ok(Self {
            row_number: row.row_number,
            id: resolve_field(row, "accountId").and_then(|v| v.parse().ok()),
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            subtype: resolve_field(row, "subtype").map(ToString::to_string),
            description: resolve_field(row, "description").map(ToString::to_string),
            parent_code: resolve_field(row, "parentCode").map(ToString::to_string),
            is_active: resolve_field(row, "isActive").and_then(parse_bool),
        })
    }
}
