use thiserror::Error;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid EVM address format: {0}")]
    InvalidEvmAddress(String),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}

/// Clamp a caller-supplied limit into [1, MAX_LIMIT], defaulting when
/// absent.
pub fn validate_limit(raw: Option<&str>) -> Result<i64, ValidationError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(value) => {
            let parsed: i64 = value
                .parse()
                .map_err(|_| ValidationError::InvalidLimit(value.to_string()))?;
            if parsed < 1 {
                return Err(ValidationError::InvalidLimit(value.to_string()));
            }
            Ok(parsed.min(MAX_LIMIT))
        }
    }
}

/// 0x-prefixed, 40 hex chars. Normalized to lower case to match how the
/// indexer stores addresses.
pub fn validate_evm_address(address: &str) -> Result<String, ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    let hex = address
        .strip_prefix("0x")
        .ok_or_else(|| ValidationError::InvalidEvmAddress(address.to_string()))?;

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidEvmAddress(address.to_string()));
    }

    Ok(address.to_lowercase())
}
