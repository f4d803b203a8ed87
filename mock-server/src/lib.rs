use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const PROFESORES: &str = "profesores";
pub const MATERIAS: &str = "materias";
pub const AULAS: &str = "aulas";
pub const RESTRICCIONES: &str = "restricciones";
pub const HORARIOS: &str = "horarios";
pub const SOLICITUDES: &str = "solicitudes-clase";
pub const VERSIONES: &str = "versiones-horario";

/// Every collection served under `/api/{collection}/`.
pub const COLLECTIONS: [&str; 7] = [
    PROFESORES,
    MATERIAS,
    AULAS,
    RESTRICCIONES,
    HORARIOS,
    SOLICITUDES,
    VERSIONES,
];

/// In-memory records keyed by collection, then by id. Ids are shared
/// across collections and never reused.
#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    collections: HashMap<&'static str, BTreeMap<u64, Value>>,
}

impl Store {
    fn insert(&mut self, collection: &'static str, mut fields: Map<String, Value>) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        fields.insert("id".to_string(), json!(id));
        let record = Value::Object(fields);
        self.collections
            .entry(collection)
            .or_default()
            .insert(id, record.clone());
        record
    }

    fn replace(&mut self, collection: &'static str, id: u64, mut fields: Map<String, Value>) -> Option<Value> {
        let slot = self.collections.get_mut(collection)?.get_mut(&id)?;
        fields.insert("id".to_string(), json!(id));
        *slot = Value::Object(fields);
        Some(slot.clone())
    }

    fn get(&self, collection: &str, id: u64) -> Option<&Value> {
        self.collections.get(collection)?.get(&id)
    }

    fn get_mut(&mut self, collection: &str, id: u64) -> Option<&mut Value> {
        self.collections.get_mut(collection)?.get_mut(&id)
    }

    fn remove(&mut self, collection: &str, id: u64) -> Option<Value> {
        self.collections.get_mut(collection)?.remove(&id)
    }

    fn records(&self, collection: &str) -> Vec<Value> {
        self.collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }

    fn clear(&mut self, collection: &str) -> usize {
        self.collections
            .get_mut(collection)
            .map(|records| {
                let count = records.len();
                records.clear();
                count
            })
            .unwrap_or(0)
    }
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, Json<Value>);
type ApiResult<T> = Result<T, Rejection>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));

    let mut router: Router<Db> = Router::new()
        .route("/api/generar-horarios/", post(generate_schedules))
        .route("/api/importar-horarios-excel/", post(import_spreadsheet))
        .route("/api/horarios/eliminar_horarios/", delete(delete_all_schedules))
        .route("/api/solicitudes-clase/clear_all/", delete(clear_requests))
        .route(
            "/api/solicitudes-clase/{id}/asignar_a_horario/",
            post(assign_request),
        )
        .route("/api/versiones-horario/guardar_actual/", post(save_version))
        .route(
            "/api/versiones-horario/{id}/cargar_version/",
            get(load_version),
        )
        .route("/api/versiones-horario/{id}/restore/", post(restore_version));

    for collection in COLLECTIONS {
        router = router
            .route(
                &format!("/api/{collection}/"),
                get(
                    move |State(db): State<Db>, Query(filter): Query<HashMap<String, String>>| {
                        list_records(db, collection, filter)
                    },
                )
                .post(move |State(db): State<Db>, Json(body): Json<Value>| {
                    create_record(db, collection, body)
                }),
            )
            .route(
                &format!("/api/{collection}/{{id}}/"),
                get(move |State(db): State<Db>, Path(id): Path<u64>| {
                    get_record(db, collection, id)
                })
                .put(
                    move |State(db): State<Db>, Path(id): Path<u64>, Json(body): Json<Value>| {
                        update_record(db, collection, id, body)
                    },
                )
                .delete(move |State(db): State<Db>, Path(id): Path<u64>| {
                    delete_record(db, collection, id)
                }),
            );
    }

    router.with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn rejection(status: StatusCode, message: impl Into<String>) -> Rejection {
    (status, Json(json!({ "error": message.into() })))
}

fn not_found() -> Rejection {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "No encontrado." })))
}

fn required_fields(collection: &str) -> &'static [&'static str] {
    match collection {
        PROFESORES => &["nombre", "apellido"],
        MATERIAS => &["nombre"],
        AULAS => &["codigo", "capacidad"],
        RESTRICCIONES => &["nombre", "tipo"],
        HORARIOS => &["profesor", "materia", "aula", "dia", "hora_inicio", "hora_fin"],
        SOLICITUDES => &[
            "materia",
            "profesor",
            "tipo_clase",
            "seccion",
            "periodo_academico",
            "carrera_programa",
        ],
        VERSIONES => &["nombre_version"],
        _ => &[],
    }
}

/// Validate a request body the way a model serializer would: it must be a
/// JSON object carrying every required field. Errors are keyed by field.
fn validated_fields(collection: &str, body: Value) -> ApiResult<Map<String, Value>> {
    let Value::Object(mut fields) = body else {
        return Err(rejection(StatusCode::BAD_REQUEST, "Se esperaba un objeto JSON."));
    };
    let missing: Map<String, Value> = required_fields(collection)
        .iter()
        .filter(|name| fields.get(**name).map_or(true, Value::is_null))
        .map(|name| (name.to_string(), json!(["Este campo es requerido."])))
        .collect();
    if !missing.is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(Value::Object(missing))));
    }
    fields.remove("id");
    Ok(fields)
}

fn field_matches(record: &Value, key: &str, expected: &str) -> bool {
    match record.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

async fn list_records(
    db: Db,
    collection: &'static str,
    filter: HashMap<String, String>,
) -> Json<Vec<Value>> {
    let store = db.read().await;
    let records = store
        .records(collection)
        .into_iter()
        .filter(|record| filter.iter().all(|(key, value)| field_matches(record, key, value)))
        .collect();
    Json(records)
}

async fn create_record(
    db: Db,
    collection: &'static str,
    body: Value,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut fields = validated_fields(collection, body)?;
    if collection == SOLICITUDES {
        fields.insert("estado".to_string(), json!("Pendiente"));
    }
    let record = db.write().await.insert(collection, fields);
    debug!(collection, id = %record["id"], "created record");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(db: Db, collection: &'static str, id: u64) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.get(collection, id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_record(
    db: Db,
    collection: &'static str,
    id: u64,
    body: Value,
) -> ApiResult<Json<Value>> {
    let mut fields = validated_fields(collection, body)?;
    let mut store = db.write().await;
    let current = store.get(collection, id).ok_or_else(not_found)?;
    if collection == SOLICITUDES {
        fields.insert("estado".to_string(), current["estado"].clone());
    }
    store.replace(collection, id, fields).map(Json).ok_or_else(not_found)
}

async fn delete_record(db: Db, collection: &'static str, id: u64) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .remove(collection, id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

/// Stand-in for the backend's generator: checks the same preconditions
/// and reports the schedule currently stored, without computing one.
async fn generate_schedules(State(db): State<Db>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    for (collection, message) in [
        (PROFESORES, "No hay profesores registrados. Crea al menos uno en el admin."),
        (MATERIAS, "No hay materias registradas. Crea al menos una en el admin."),
        (AULAS, "No hay aulas registradas. Crea al menos una en el admin."),
    ] {
        if store.count(collection) == 0 {
            return Err((StatusCode::BAD_REQUEST, Json(json!({ "message": message }))));
        }
    }
    let horarios = store.records(HORARIOS);
    Ok(Json(json!({
        "message": "Generación de horarios finalizada.",
        "horarios_generados_count": horarios.len(),
        "detalles_horarios": horarios,
    })))
}

async fn delete_all_schedules(State(db): State<Db>) -> Json<Value> {
    let count = db.write().await.clear(HORARIOS);
    Json(json!({ "message": format!("Se eliminaron {count} horarios exitosamente.") }))
}

/// Columns of one import row, in file order.
const IMPORT_COLUMNS: [&str; 6] = [
    "materia",
    "profesor",
    "tipo_clase",
    "seccion",
    "periodo_academico",
    "carrera_programa",
];

/// Turn one data row into class request fields. The mock reads the sheet as
/// comma-separated text with a header line; ids must name stored records.
fn import_row(store: &Store, line: &str) -> Result<Map<String, Value>, String> {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();
    if cells.len() != IMPORT_COLUMNS.len() || cells.iter().any(|cell| cell.is_empty()) {
        return Err("Una o más columnas críticas están vacías.".to_string());
    }
    let mut fields: Map<String, Value> = IMPORT_COLUMNS
        .iter()
        .zip(&cells)
        .map(|(column, cell)| (column.to_string(), json!(cell)))
        .collect();
    for (index, collection, label) in [(0, MATERIAS, "Materia"), (1, PROFESORES, "Profesor")] {
        let raw = cells[index];
        let id = raw
            .parse::<u64>()
            .ok()
            .filter(|id| store.get(collection, *id).is_some())
            .ok_or_else(|| format!("{label} inexistente: {raw}"))?;
        fields.insert(IMPORT_COLUMNS[index].to_string(), json!(id));
    }
    fields.insert("estado".to_string(), json!("Pendiente"));
    Ok(fields)
}

async fn import_spreadsheet(
    State(db): State<Db>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejection(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| rejection(StatusCode::BAD_REQUEST, e.to_string()))?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, data) = upload
        .ok_or_else(|| rejection(StatusCode::BAD_REQUEST, "No se proporcionó ningún archivo."))?;
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    if ext != "xls" && ext != "xlsx" {
        return Err(rejection(
            StatusCode::BAD_REQUEST,
            "Formato de archivo no soportado. Por favor, sube un archivo Excel (.xls o .xlsx).",
        ));
    }

    let text = String::from_utf8_lossy(&data);
    let mut store = db.write().await;
    let mut created = Vec::new();
    let mut errors = Vec::new();
    // line 1 is the header, so data rows are numbered from 2
    for (index, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match import_row(&store, line) {
            Ok(fields) => created.push(store.insert(SOLICITUDES, fields)),
            Err(error) => errors.push(json!({ "fila": index + 1, "error": error, "data": line })),
        }
    }
    debug!(%filename, created = created.len(), errors = errors.len(), "imported spreadsheet");

    if errors.is_empty() {
        return Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": format!("Se importaron {} solicitudes exitosamente.", created.len()),
                "archivo": filename,
                "bytes": data.len(),
                "solicitudes_creadas": created,
            })),
        ));
    }
    Ok((
        StatusCode::MULTI_STATUS,
        Json(json!({
            "message": format!(
                "Se procesaron {} solicitudes. Se encontraron {} errores. Revise los detalles.",
                created.len(),
                errors.len()
            ),
            "archivo": filename,
            "bytes": data.len(),
            "solicitudes_creadas": created,
            "errors": errors,
        })),
    ))
}

async fn clear_requests(State(db): State<Db>) -> StatusCode {
    db.write().await.clear(SOLICITUDES);
    StatusCode::NO_CONTENT
}

async fn assign_request(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let slot_fields = ["aula", "dia", "hora_inicio", "hora_fin"];
    if !slot_fields.iter().all(|field| body.get(*field).is_some()) {
        return Err(rejection(
            StatusCode::BAD_REQUEST,
            "Faltan campos requeridos para crear el horario: aula, dia, hora_inicio, hora_fin.",
        ));
    }

    let mut store = db.write().await;
    let solicitud = store
        .get(SOLICITUDES, id)
        .cloned()
        .ok_or_else(|| rejection(StatusCode::NOT_FOUND, "Solicitud de clase no encontrada."))?;

    let mut horario = Map::new();
    for key in [
        "profesor",
        "materia",
        "tipo_clase",
        "seccion",
        "periodo_academico",
        "carrera_programa",
    ] {
        horario.insert(key.to_string(), solicitud[key].clone());
    }
    for key in slot_fields {
        horario.insert(key.to_string(), body[key].clone());
    }

    // conflicts only count inside the same period and the exact same slot
    let conflicts: [(&[&str], &str); 3] = [
        (&["aula"], "El aula ya está ocupada en ese horario para este período."),
        (&["profesor"], "El profesor ya está ocupado en ese horario para este período."),
        (
            &["materia", "seccion"],
            "Ya existe un horario para esta materia y sección en el slot seleccionado.",
        ),
    ];
    let same_slot = |other: &Value| {
        ["dia", "hora_inicio", "hora_fin", "periodo_academico"]
            .iter()
            .all(|key| other[*key] == horario[*key])
    };
    let horarios = store.records(HORARIOS);
    for (keys, message) in conflicts {
        let taken = horarios
            .iter()
            .any(|other| same_slot(other) && keys.iter().all(|key| other[*key] == horario[*key]));
        if taken {
            return Err(rejection(StatusCode::CONFLICT, message));
        }
    }

    let created = store.insert(HORARIOS, horario);
    if let Some(record) = store.get_mut(SOLICITUDES, id) {
        record["estado"] = json!("Asignada");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Solicitud asignada al horario exitosamente.",
            "horario": created,
        })),
    ))
}

async fn save_version(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let nombre = body
        .get("nombre_version")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            rejection(
                StatusCode::BAD_REQUEST,
                "El nombre de la versión es requerido para guardar.",
            )
        })?
        .to_string();

    let mut store = db.write().await;
    let snapshot = store.records(HORARIOS);
    let mut fields = Map::new();
    fields.insert("nombre_version".to_string(), json!(nombre));
    fields.insert("datos_horario_json".to_string(), Value::Array(snapshot));
    Ok((StatusCode::CREATED, Json(store.insert(VERSIONES, fields))))
}

async fn load_version(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let version = store.get(VERSIONES, id).ok_or_else(not_found)?;
    Ok(Json(json!({
        "message": format!(
            "Versión \"{}\" cargada. Datos de horario devueltos.",
            version["nombre_version"].as_str().unwrap_or_default()
        ),
        "horarios_data": version["datos_horario_json"],
    })))
}

async fn restore_version(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let version = store.get(VERSIONES, id).cloned().ok_or_else(not_found)?;
    let snapshot = version["datos_horario_json"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    store.clear(HORARIOS);
    let mut restored = 0;
    for entry in snapshot {
        if let Value::Object(mut fields) = entry {
            fields.remove("id");
            store.insert(HORARIOS, fields);
            restored += 1;
        }
    }

    Ok(Json(json!({
        "message": format!(
            "Versión de horario '{}' restaurada exitosamente. Se crearon {restored} horarios.",
            version["nombre_version"].as_str().unwrap_or_default()
        ),
    })))
}
