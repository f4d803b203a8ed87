//! Bulk schedule operations run from the command line. Each returns the
//! line to print on success and the service error otherwise.

use horarios_core::types::ResourceId;
use horarios_core::{ApiClient, ApiError, HorarioService, VersionService};
use serde_json::Value;
use tracing::info;

/// The backend's `message` field, or the whole body when it has none.
fn summary(body: &Value) -> String {
    match body.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => body.to_string(),
    }
}

/// One line per entry of the backend's `errors` list. Import rows carry
/// `fila` and `error`; anything else is printed as it came.
fn row_errors(body: &Value) -> Vec<String> {
    let Some(errors) = body.get("errors").and_then(Value::as_array) else {
        return Vec::new();
    };
    errors
        .iter()
        .map(|entry| {
            let fila = entry.get("fila").and_then(Value::as_u64);
            let error = entry.get("error").and_then(Value::as_str);
            match (fila, error, entry.as_str()) {
                (Some(fila), Some(error), _) => format!("  - Fila {fila}: {error}"),
                (_, _, Some(text)) => format!("  - {text}"),
                _ => format!("  - {entry}"),
            }
        })
        .collect()
}

pub fn generate(client: &ApiClient) -> Result<String, ApiError> {
    let body = HorarioService::new(client).generate()?;
    let mut line = summary(&body);
    if let Some(count) = body.get("horarios_generados_count").and_then(Value::as_u64) {
        line.push_str(&format!(" ({count} horarios)"));
    }
    info!("schedule generation finished");
    Ok(line)
}

pub fn delete_all(client: &ApiClient) -> Result<String, ApiError> {
    let body = HorarioService::new(client).delete_all()?;
    Ok(summary(&body))
}

pub fn import(client: &ApiClient, filename: &str, bytes: &[u8]) -> Result<String, ApiError> {
    info!(filename, bytes = bytes.len(), "uploading spreadsheet");
    let body = HorarioService::new(client).upload_spreadsheet(filename, bytes)?;
    let mut lines = vec![summary(&body)];
    lines.extend(row_errors(&body));
    Ok(lines.join("\n"))
}

pub fn save_version(client: &ApiClient, name: &str) -> Result<String, ApiError> {
    let version = VersionService::new(client).save_current(name)?;
    Ok(format!(
        "Versión \"{}\" guardada con id {} ({} horarios).",
        version.data.nombre_version,
        version.id,
        version.data.datos_horario_json.len()
    ))
}

pub fn restore_version(client: &ApiClient, id: &ResourceId) -> Result<String, ApiError> {
    let result = VersionService::new(client).restore(id)?;
    let mut lines = vec![result.message];
    lines.extend(result.errors.into_iter().map(|error| format!("  - {error}")));
    Ok(lines.join("\n"))
}
