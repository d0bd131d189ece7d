use crate::error::AppError;

/// Validate a trimmed free-text field of `1..=max` Unicode characters.
pub fn validate_text(value: &str, field: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Validate an optional inclusive range filter (`min <= max`, both finite).
pub fn validate_range(min: Option<f64>, max: Option<f64>, field: &str) -> Result<(), AppError> {
    for bound in [min, max].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(AppError::Validation(format!(
                "{field} bounds must be finite numbers"
            )));
        }
    }
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(AppError::Validation(format!(
            "min_{field} must not exceed max_{field}"
        )));
    }
    Ok(())
}
