// src/pipeline/validate.rs

//! Response validation.
//!
//! The top-level shape is all-or-nothing; individual homework entries are
//! checked one by one and dropped on failure.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Homework, StatusBatch};

/// Check a raw status response and extract the valid homework records.
pub fn check_response(response: &Value) -> Result<StatusBatch> {
    log::info!("Checking the received data");

    let object = response.as_object().ok_or_else(|| {
        AppError::format(format!("response is not a JSON object: {}", kind(response)))
    })?;

    let (Some(current_date), Some(raw_homeworks)) =
        (object.get("current_date"), object.get("homeworks"))
    else {
        return Err(AppError::format(
            "response must contain 'current_date' and 'homeworks' keys",
        ));
    };

    let current_date = current_date.as_i64().ok_or_else(|| {
        AppError::format(format!(
            "'current_date' must be an integer, got {}",
            kind(current_date)
        ))
    })?;

    let raw_homeworks = raw_homeworks.as_array().ok_or_else(|| {
        AppError::format(format!(
            "'homeworks' must be a list, got {}",
            kind(raw_homeworks)
        ))
    })?;

    if raw_homeworks.is_empty() {
        log::info!("Response homeworks list is empty");
        return Ok(StatusBatch {
            current_date,
            ..StatusBatch::default()
        });
    }

    log::info!("Received data contain {} records", raw_homeworks.len());

    let mut batch = StatusBatch {
        current_date,
        homeworks: Vec::with_capacity(raw_homeworks.len()),
        rejected: 0,
    };

    for entry in raw_homeworks {
        match Homework::deserialize(entry) {
            Ok(homework) => batch.homeworks.push(homework),
            Err(e) => {
                batch.rejected += 1;
                log::error!("Wrong homework data format: {} at {}", e, entry);
            }
        }
    }

    log::info!(
        "The resulting list contains {} items",
        batch.homeworks.len()
    );
    Ok(batch)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
