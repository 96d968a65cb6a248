use crate::config::{MAX_FLOOR, MAX_WORLD};
use crate::{CategoryCode, LevelPosition, RunTime};

/// Code used when the category selector holds something that is not a
/// number. It is unlisted, so it lands on the speed section defaults.
pub const UNKNOWN_CATEGORY: CategoryCode = -1;

/// Read the category selector's value.
pub fn parse_category(value: &str) -> CategoryCode {
    value.trim().parse().unwrap_or(UNKNOWN_CATEGORY)
}

/// Parse a run field's text as a number and bound-check it, producing the
/// inline message the form shows under the field (named `field_name`).
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

pub fn validate_score(input: &str) -> Result<u64, String> {
    validate_numeric_input(input, Some(0), None, "Score")
}

pub fn validate_minutes(input: &str) -> Result<u64, String> {
    validate_numeric_input(input, Some(0), None, "Minutes")
}

pub fn validate_seconds(input: &str) -> Result<u64, String> {
    validate_numeric_input(input, Some(0), Some(59), "Seconds")
}

pub fn validate_milliseconds(input: &str) -> Result<u64, String> {
    validate_numeric_input(input, Some(0), Some(999), "Milliseconds")
}

pub fn validate_world(input: &str) -> Result<u32, String> {
    validate_numeric_input(input, Some(1), Some(MAX_WORLD), "World")
}

pub fn validate_floor(input: &str) -> Result<u32, String> {
    validate_numeric_input(input, Some(1), Some(MAX_FLOOR), "Floor")
}

/// Assemble a run time from the three speed-section fields.
pub fn run_time_from_fields(minutes: &str, seconds: &str, milliseconds: &str) -> Result<RunTime, String> {
    Ok(RunTime {
        minutes: validate_minutes(minutes)?,
        seconds: validate_seconds(seconds)?,
        milliseconds: validate_milliseconds(milliseconds)?,
    })
}

/// Assemble a final position from the world and floor fields.
pub fn position_from_fields(world: &str, floor: &str) -> Result<LevelPosition, String> {
    Ok(LevelPosition {
        world: validate_world(world)?,
        floor: validate_floor(floor)?,
    })
}
