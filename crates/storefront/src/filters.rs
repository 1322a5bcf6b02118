//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Item count label, e.g. "1 item" or "3 itens".
///
/// Usage in templates: `{{ cart.item_count|items_label }}`
#[askama::filter_fn]
pub fn items_label(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(plural(&count.to_string(), "item", "itens"))
}

/// Result count label, e.g. "1 produto encontrado".
///
/// Usage in templates: `{{ result_count|found_label }}`
#[askama::filter_fn]
pub fn found_label(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(plural(
        &count.to_string(),
        "produto encontrado",
        "produtos encontrados",
    ))
}

fn plural(count: &str, singular: &str, plural: &str) -> String {
    if count == "1" {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
