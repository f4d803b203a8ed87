//! Request and response schemas for the scheduling backend.
//!
//! # Design
//! Each resource has a `*Data` payload (the fields sent on create and
//! update) and a record type (the payload plus `id` and the read-only fields
//! the backend computes). Records flatten their payload so both share one
//! field list. Decoding fails on a missing required field; unknown fields
//! are ignored so backend additions do not break the client.
//!
//! Times are kept as the `HH:MM[:SS]` strings the backend emits. Free-form
//! JSON columns (availability, room requirements, rules) stay as
//! `serde_json::Value`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque record identifier.
///
/// The backend emits integers today, but the client never interprets an id
/// beyond formatting it into an item path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        ResourceId::Number(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Text(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::Text(value)
    }
}

/// Digits parse as a numeric id, anything else is kept as text.
impl FromStr for ResourceId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u64>()
            .map(ResourceId::Number)
            .unwrap_or_else(|_| ResourceId::Text(s.to_string())))
    }
}

/// Day of the week as the backend encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dia {
    Lun,
    Mar,
    Mie,
    Jue,
    Vie,
    Sab,
    Dom,
}

impl Dia {
    pub fn label(&self) -> &'static str {
        match self {
            Dia::Lun => "Lunes",
            Dia::Mar => "Martes",
            Dia::Mie => "Miércoles",
            Dia::Jue => "Jueves",
            Dia::Vie => "Viernes",
            Dia::Sab => "Sábado",
            Dia::Dom => "Domingo",
        }
    }
}

// ---------------------------------------------------------------------------
// Profesores
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfesorData {
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub especialidad: Option<String>,
    #[serde(default)]
    pub carga_horaria_maxima: i32,
    /// Availability per day, e.g. `{"LUN": ["08:00-12:00"]}`.
    #[serde(default)]
    pub disponibilidad: Option<Value>,
    #[serde(default)]
    pub cedula: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub regimen: Option<String>,
    #[serde(default)]
    pub dedicatoria: Option<String>,
    #[serde(default)]
    pub carrera_principal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profesor {
    pub id: ResourceId,
    #[serde(flatten)]
    pub data: ProfesorData,
    /// Hours per week currently assigned, computed by the backend.
    #[serde(default)]
    pub carga_horaria_asignada: Option<f64>,
}

// ---------------------------------------------------------------------------
// Materias
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MateriaData {
    pub nombre: String,
    #[serde(default)]
    pub horas_semanales: i32,
    #[serde(default)]
    pub horas_teoricas: i32,
    #[serde(default)]
    pub horarios_de_practicas: i32,
    #[serde(default)]
    pub horario_de_laboratorio: i32,
    #[serde(default = "default_tipo_de_materia")]
    pub tipo_de_materia: String,
    #[serde(default = "default_secciones")]
    pub secciones_disponibles: i32,
    #[serde(default)]
    pub profesores_aptos: Vec<ResourceId>,
    #[serde(default = "default_carrera")]
    pub carrera_principal: String,
    #[serde(default)]
    pub requisitos_de_aula: Option<Value>,
}

fn default_tipo_de_materia() -> String {
    "Obligatoria".to_string()
}

fn default_secciones() -> i32 {
    1
}

fn default_carrera() -> String {
    "Sin Carrera Definida".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Materia {
    pub id: ResourceId,
    #[serde(flatten)]
    pub data: MateriaData,
    #[serde(default)]
    pub profesores_aptos_nombres: Vec<String>,
}

// ---------------------------------------------------------------------------
// Aulas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AulaData {
    pub codigo: String,
    #[serde(default = "default_tipo_aula")]
    pub tipo: String,
    pub capacidad: i32,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(default)]
    pub recursos_especiales: Option<Vec<String>>,
}

fn default_tipo_aula() -> String {
    "Salón de Clases".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aula {
    pub id: ResourceId,
    #[serde(flatten)]
    pub data: AulaData,
}

// ---------------------------------------------------------------------------
// Restricciones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoRestriccion {
    ProfesorNoDisponible,
    AulaNoDisponible,
    MateriaNoEnAula,
}

impl TipoRestriccion {
    pub fn label(&self) -> &'static str {
        match self {
            TipoRestriccion::ProfesorNoDisponible => "Profesor No Disponible",
            TipoRestriccion::AulaNoDisponible => "Aula No Disponible",
            TipoRestriccion::MateriaNoEnAula => "Materia No Puede Usar Aula Específica",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestriccionData {
    pub nombre: String,
    pub tipo: TipoRestriccion,
    #[serde(default)]
    pub dia: Option<Dia>,
    #[serde(default)]
    pub hora_inicio: Option<String>,
    #[serde(default)]
    pub hora_fin: Option<String>,
    #[serde(default)]
    pub profesor: Option<ResourceId>,
    #[serde(default)]
    pub aula: Option<ResourceId>,
    #[serde(default)]
    pub materia: Option<ResourceId>,
    #[serde(default)]
    pub reglas: Option<Value>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restriccion {
    pub id: ResourceId,
    #[serde(flatten)]
    pub data: RestriccionData,
    #[serde(default)]
    pub profesor_info: Option<String>,
    #[serde(default)]
    pub aula_info: Option<String>,
    #[serde(default)]
    pub materia_info: Option<String>,
}

// ---------------------------------------------------------------------------
// Horarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorarioData {
    pub profesor: ResourceId,
    pub materia: ResourceId,
    pub aula: ResourceId,
    pub dia: Dia,
    pub hora_inicio: String,
    pub hora_fin: String,
    #[serde(default)]
    pub tipo_clase: Option<String>,
    #[serde(default = "default_seccion")]
    pub seccion: String,
    #[serde(default = "default_periodo")]
    pub periodo_academico: String,
    #[serde(default = "default_programa")]
    pub carrera_programa: String,
}

fn default_seccion() -> String {
    "1".to_string()
}

fn default_periodo() -> String {
    "2025-2".to_string()
}

fn default_programa() -> String {
    "ingeniero en sistemas".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horario {
    pub id: ResourceId,
    #[serde(flatten)]
    pub data: HorarioData,
    #[serde(default)]
    pub profesor_nombre: Option<String>,
    #[serde(default)]
    pub materia_nombre: Option<String>,
    #[serde(default)]
    pub aula_codigo: Option<String>,
}

// ---------------------------------------------------------------------------
// Solicitudes de clase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoSolicitud {
    Pendiente,
    Asignada,
    Cancelada,
    Rechazada,
}

impl EstadoSolicitud {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoSolicitud::Pendiente => "Pendiente",
            EstadoSolicitud::Asignada => "Asignada",
            EstadoSolicitud::Cancelada => "Cancelada",
            EstadoSolicitud::Rechazada => "Rechazada",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolicitudData {
    pub materia: ResourceId,
    pub profesor: ResourceId,
    #[serde(default)]
    pub aula: Option<ResourceId>,
    #[serde(default)]
    pub dia: Option<Dia>,
    #[serde(default)]
    pub hora_inicio: Option<String>,
    #[serde(default)]
    pub hora_fin: Option<String>,
    pub tipo_clase: String,
    pub seccion: String,
    pub periodo_academico: String,
    pub carrera_programa: String,
    #[serde(default)]
    pub requisitos_aula_sugeridos: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolicitudClase {
    pub id: ResourceId,
    #[serde(flatten)]
    pub data: SolicitudData,
    pub estado: EstadoSolicitud,
    #[serde(default)]
    pub materia_nombre: Option<String>,
    #[serde(default)]
    pub profesor_nombre: Option<String>,
    #[serde(default)]
    pub aula_codigo: Option<String>,
}

/// Slot sent when turning a class request into a schedule entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsignacionHorario {
    pub aula: ResourceId,
    pub dia: Dia,
    pub hora_inicio: String,
    pub hora_fin: String,
}

// ---------------------------------------------------------------------------
// Versiones de horario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionData {
    pub nombre_version: String,
    /// Snapshot of the schedule entries, in the backend's serialized form.
    #[serde(default)]
    pub datos_horario_json: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionHorario {
    pub id: ResourceId,
    #[serde(flatten)]
    pub data: VersionData,
    #[serde(default)]
    pub fecha_guardado: Option<String>,
}

/// Body of `versiones-horario/{id}/cargar_version/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionCargada {
    pub message: String,
    #[serde(default)]
    pub horarios_data: Vec<Value>,
}

/// Body of `versiones-horario/{id}/restore/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreResult {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}
