//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a color is written as `#rrggbb` hexadecimal.
///
/// # Examples
///
/// ```ignore
/// validate_hex_color("#24243F") // Ok
/// validate_hex_color("24243F")  // Err - missing '#'
/// validate_hex_color("#fff")    // Err - short form
/// ```
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let Some(digits) = color.strip_prefix('#') else {
        let mut err = ValidationError::new("color_prefix");
        err.message = Some("Color must start with '#'".into());
        return Err(err);
    };

    if digits.len() != 6 {
        let mut err = ValidationError::new("color_length");
        err.message = Some(
            format!(
                "Color must have exactly 6 hexadecimal digits (got {})",
                digits.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut err = ValidationError::new("color_format");
        err.message = Some("Color must contain only hexadecimal digits".into());
        return Err(err);
    }

    Ok(())
}
