use crate::constants::*;
use crate::error::{ApiError, ApiResult};
use crate::models::CurrencyPayload;

pub fn validate_string_length(value: &str, field_name: &str, max_length: usize) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!(
            "{} cannot be empty",
            field_name
        )));
    }
    if value.trim().chars().count() > max_length {
        return Err(ApiError::Validation(format!(
            "{} must be at most {} characters",
            field_name, max_length
        )));
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> ApiResult<()> {
    validate_string_length(name, "Category name", MAX_CATEGORY_NAME_LENGTH)
}

/// Trims an optional text field and maps blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Base URL for the web console: `value` when set and not blank, else the
/// default the CLI config also falls back to. No trailing slash.
pub fn api_base_url(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
}

pub fn normalize_currency_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Trims every field and uppercases the ISO code.
pub fn normalize_currency(payload: &CurrencyPayload) -> CurrencyPayload {
    CurrencyPayload {
        name: payload.name.trim().to_string(),
        symbol: payload.symbol.trim().to_string(),
        code: normalize_currency_code(&payload.code),
    }
}

/// Client-side format hints; the backend stays the authority.
pub fn validate_currency(payload: &CurrencyPayload) -> ApiResult<()> {
    validate_string_length(&payload.name, "Currency name", MAX_CURRENCY_NAME_LENGTH)?;
    validate_string_length(&payload.symbol, "Symbol", MAX_CURRENCY_SYMBOL_LENGTH)?;

    let code = payload.code.trim();
    if code.chars().count() != CURRENCY_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(ApiError::Validation(format!(
            "Code must be {} letters (ISO 4217)",
            CURRENCY_CODE_LENGTH
        )));
    }
    Ok(())
}

/// Installs the global tracing subscriber. A set `RUST_LOG` replaces the default filter.
#[cfg(feature = "client")]
pub fn init_tracing(verbose: bool) {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static TRACING_INIT: Once = Once::new();

    TRACING_INIT.call_once(|| {
        let level = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("shop_admin={}", level)));
        fmt().with_env_filter(filter).with_target(false).init();
    });
}
