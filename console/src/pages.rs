//! Page content for every route.
//!
//! # Design
//! `load` maps a resolved `Route` to a `Page`. Entity pages fetch their
//! collection through the matching service and lay the records out as a
//! table. A failed fetch becomes an error body on the same page, so the
//! layout around it still renders.

use std::fmt;

use horarios_core::types::{Aula, Horario, Materia, Profesor, Restriccion, SolicitudClase, VersionHorario};
use horarios_core::{
    ApiClient, ApiError, AulaService, HorarioService, MateriaService, ProfesorService,
    RestriccionService, Route, ScheduleTab, SolicitudService, VersionService,
};
use tracing::warn;

pub const NOT_FOUND_TITLE: &str = "404 - Página no encontrada";
pub const NOT_FOUND_MESSAGE: &str = "La URL que has solicitado no existe.";

/// Rows of cells under fixed column headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Table(Table),
    Text(Vec<&'static str>),
    /// A service call failed; holds the error as shown to the user.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: &'static str,
    pub body: Body,
}

impl Page {
    pub fn is_error(&self) -> bool {
        matches!(self.body, Body::Error(_))
    }
}

/// Build the page for `route`, calling the backend when the page lists
/// records.
pub fn load(client: &ApiClient, route: &Route) -> Page {
    match route {
        Route::Home | Route::Horarios(ScheduleTab::Principal) => table_page(
            "Gestión de Horarios",
            &["ID", "Día", "Inicio", "Fin", "Materia", "Profesor", "Aula", "Sección"],
            HorarioService::new(client).list(),
            horario_row,
        ),
        Route::Horarios(ScheduleTab::Soa) => text_page(
            "Detalles de SOA",
            &["Información relacionada con la Arquitectura Orientada a Servicios para el sistema de horarios."],
        ),
        Route::Horarios(ScheduleTab::Nomina) => text_page(
            "Detalles de Nómina",
            &["Aquí se mostrarán los datos de nómina de los profesores basados en los horarios asignados (ej. horas, número de cuenta)."],
        ),
        Route::Horarios(ScheduleTab::BaseDatos) => text_page(
            "Detalles de Base de Datos",
            &["Información y herramientas relacionadas con la base de datos del sistema."],
        ),
        Route::Profesores => table_page(
            "Gestión de Profesores",
            &["ID", "Nombre", "Apellido", "Especialidad", "Carga máx.", "Carga asignada"],
            ProfesorService::new(client).list(),
            profesor_row,
        ),
        Route::Materias => table_page(
            "Gestión de Materias",
            &["ID", "Nombre", "Horas/semana", "Tipo", "Secciones", "Carrera"],
            MateriaService::new(client).list(),
            materia_row,
        ),
        Route::Aulas => table_page(
            "Gestión de Aulas",
            &["ID", "Código", "Tipo", "Capacidad", "Ubicación"],
            AulaService::new(client).list(),
            aula_row,
        ),
        Route::Restricciones => table_page(
            "Gestión de Restricciones",
            &["ID", "Nombre", "Tipo", "Día", "Inicio", "Fin"],
            RestriccionService::new(client).list(),
            restriccion_row,
        ),
        Route::Solicitudes => table_page(
            "Solicitudes de Clase",
            &["ID", "Materia", "Profesor", "Tipo", "Sección", "Estado"],
            SolicitudService::new(client).list(),
            solicitud_row,
        ),
        Route::Versiones => table_page(
            "Versiones de Horario",
            &["ID", "Nombre", "Guardada", "Horarios"],
            VersionService::new(client).list(),
            version_row,
        ),
        Route::ImportarExcel => text_page(
            "Importar Horarios desde Excel",
            &[
                "Sube un archivo .xls o .xlsx con los horarios a importar:",
                "  horarios-console import <archivo.xlsx>",
            ],
        ),
        Route::NotFound(_) => text_page(NOT_FOUND_TITLE, &[NOT_FOUND_MESSAGE]),
    }
}

fn text_page(title: &'static str, lines: &[&'static str]) -> Page {
    Page {
        title,
        body: Body::Text(lines.to_vec()),
    }
}

fn table_page<T>(
    title: &'static str,
    headers: &[&'static str],
    records: Result<Vec<T>, ApiError>,
    row: fn(&T) -> Vec<String>,
) -> Page {
    let body = match records {
        Ok(records) => Body::Table(Table {
            headers: headers.to_vec(),
            rows: records.iter().map(row).collect(),
        }),
        Err(err) => {
            warn!(page = title, error = %err, "failed to load page data");
            Body::Error(err.to_string())
        }
    };
    Page { title, body }
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn horario_row(h: &Horario) -> Vec<String> {
    vec![
        h.id.to_string(),
        h.data.dia.label().to_string(),
        h.data.hora_inicio.clone(),
        h.data.hora_fin.clone(),
        h.materia_nombre.clone().unwrap_or_else(|| h.data.materia.to_string()),
        h.profesor_nombre.clone().unwrap_or_else(|| h.data.profesor.to_string()),
        h.aula_codigo.clone().unwrap_or_else(|| h.data.aula.to_string()),
        h.data.seccion.clone(),
    ]
}

fn profesor_row(p: &Profesor) -> Vec<String> {
    vec![
        p.id.to_string(),
        p.data.nombre.clone(),
        p.data.apellido.clone(),
        or_dash(&p.data.especialidad),
        p.data.carga_horaria_maxima.to_string(),
        p.carga_horaria_asignada
            .map(|hours| format!("{hours:.1}"))
            .unwrap_or_else(|| "-".to_string()),
    ]
}

fn materia_row(m: &Materia) -> Vec<String> {
    vec![
        m.id.to_string(),
        m.data.nombre.clone(),
        m.data.horas_semanales.to_string(),
        m.data.tipo_de_materia.clone(),
        m.data.secciones_disponibles.to_string(),
        m.data.carrera_principal.clone(),
    ]
}

fn aula_row(a: &Aula) -> Vec<String> {
    vec![
        a.id.to_string(),
        a.data.codigo.clone(),
        a.data.tipo.clone(),
        a.data.capacidad.to_string(),
        or_dash(&a.data.ubicacion),
    ]
}

fn restriccion_row(r: &Restriccion) -> Vec<String> {
    vec![
        r.id.to_string(),
        r.data.nombre.clone(),
        r.data.tipo.label().to_string(),
        r.data
            .dia
            .map(|dia| dia.label().to_string())
            .unwrap_or_else(|| "-".to_string()),
        or_dash(&r.data.hora_inicio),
        or_dash(&r.data.hora_fin),
    ]
}

fn solicitud_row(s: &SolicitudClase) -> Vec<String> {
    vec![
        s.id.to_string(),
        s.materia_nombre.clone().unwrap_or_else(|| s.data.materia.to_string()),
        s.profesor_nombre.clone().unwrap_or_else(|| s.data.profesor.to_string()),
        s.data.tipo_clase.clone(),
        s.data.seccion.clone(),
        s.estado.as_str().to_string(),
    ]
}

fn version_row(v: &VersionHorario) -> Vec<String> {
    vec![
        v.id.to_string(),
        v.data.nombre_version.clone(),
        or_dash(&v.fecha_guardado),
        v.data.datos_horario_json.len().to_string(),
    ]
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "Sin registros.");
        }
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_row(f, self.headers.iter().copied(), &widths)?;
        let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(f, rules.iter().map(String::as_str), &widths)?;
        for row in &self.rows {
            write_row(f, row.iter().map(String::as_str), &widths)?;
        }
        Ok(())
    }
}

fn write_row<'a>(
    f: &mut fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> fmt::Result {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        match &self.body {
            Body::Table(table) => write!(f, "{table}"),
            Body::Text(lines) => lines.iter().try_for_each(|line| writeln!(f, "{line}")),
            Body::Error(message) => writeln!(f, "Error al cargar los datos: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{stub_client, Stub};

    #[test]
    fn profesores_page_lists_records() {
        let client = stub_client(Stub::Reply(
            200,
            r#"[{"id":1,"nombre":"Ana","apellido":"Pérez","especialidad":null,"carga_horaria_maxima":20,"carga_horaria_asignada":4.0}]"#,
        ));
        let page = load(&client, &Route::Profesores);

        assert_eq!(page.title, "Gestión de Profesores");
        let Body::Table(table) = &page.body else {
            panic!("expected table, got {:?}", page.body);
        };
        assert_eq!(table.rows, vec![vec!["1", "Ana", "Pérez", "-", "20", "4.0"]]);
    }

    #[test]
    fn schedules_page_prefers_display_names() {
        let client = stub_client(Stub::Reply(
            200,
            r#"[{"id":7,"profesor":1,"materia":2,"aula":3,"dia":"MIE","hora_inicio":"08:00","hora_fin":"10:00","materia_nombre":"Redes"}]"#,
        ));
        let page = load(&client, &Route::Horarios(ScheduleTab::Principal));

        assert_eq!(page.title, "Gestión de Horarios");
        let Body::Table(table) = &page.body else {
            panic!("expected table, got {:?}", page.body);
        };
        assert_eq!(
            table.rows[0],
            vec!["7", "Miércoles", "08:00", "10:00", "Redes", "1", "3", "1"]
        );
    }

    #[test]
    fn failed_fetch_renders_error_line() {
        let client = stub_client(Stub::Fail);
        let page = load(&client, &Route::Aulas);

        assert!(page.is_error());
        let text = page.to_string();
        assert!(text.starts_with("Gestión de Aulas\n"));
        assert!(text.contains("Error al cargar los datos: transport error"));
    }

    #[test]
    fn backend_rejection_is_reported() {
        let client = stub_client(Stub::Reply(500, "boom"));
        let page = load(&client, &Route::Versiones);
        assert_eq!(page.body, Body::Error("HTTP 500: boom".to_string()));
    }

    #[test]
    fn static_pages_do_not_call_backend() {
        let client = stub_client(Stub::Fail);
        for route in [
            Route::Horarios(ScheduleTab::Soa),
            Route::Horarios(ScheduleTab::Nomina),
            Route::Horarios(ScheduleTab::BaseDatos),
            Route::ImportarExcel,
            Route::NotFound("/xyz".to_string()),
        ] {
            let page = load(&client, &route);
            assert!(!page.is_error(), "{route:?}");
        }
    }

    #[test]
    fn not_found_page_text() {
        let client = stub_client(Stub::Fail);
        let page = load(&client, &Route::NotFound("/xyz".to_string()));
        assert_eq!(
            page.to_string(),
            "404 - Página no encontrada\n\nLa URL que has solicitado no existe.\n"
        );
    }

    #[test]
    fn table_aligns_columns() {
        let table = Table {
            headers: vec!["ID", "Código"],
            rows: vec![
                vec!["1".to_string(), "A".to_string()],
                vec!["10".to_string(), "LAB-200".to_string()],
            ],
        };
        assert_eq!(
            table.to_string(),
            "ID  Código\n--  -------\n1   A\n10  LAB-200\n"
        );
    }

    #[test]
    fn empty_table_says_so() {
        let table = Table {
            headers: vec!["ID"],
            rows: Vec::new(),
        };
        assert_eq!(table.to_string(), "Sin registros.\n");
    }
}
