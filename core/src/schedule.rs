//! Schedule service: CRUD on `horarios/` plus the bulk operations.
//!
//! # Design
//! `HorarioService` derefs to the generic `ResourceService<Horarios>` for the
//! five CRUD calls and adds:
//!
//! - `generate`: `POST generar-horarios/` with no body
//! - `delete_all`: `DELETE horarios/eliminar_horarios/`
//! - `upload_spreadsheet`: `POST importar-horarios-excel/` as multipart
//!
//! Bulk responses are backend-defined and returned as untyped JSON without
//! inspection. The upload is the only call that overrides the JSON
//! content-type, and only for that single request.

use std::ops::Deref;

use crate::client::{decode_value, ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::{spreadsheet_content_type, MultipartForm};
use crate::resource::{Horarios, ResourceService};

pub const GENERATE_PATH: &str = "generar-horarios/";
pub const DELETE_ALL_PATH: &str = "horarios/eliminar_horarios/";
pub const IMPORT_PATH: &str = "importar-horarios-excel/";

/// Multipart field the backend reads the spreadsheet from.
pub const IMPORT_FIELD: &str = "file";

pub struct HorarioService<'a> {
    inner: ResourceService<'a, Horarios>,
}

impl<'a> Deref for HorarioService<'a> {
    type Target = ResourceService<'a, Horarios>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'a> HorarioService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: ResourceService::new(client),
        }
    }

    pub fn build_generate(&self) -> HttpRequest {
        self.client()
            .build_request(HttpMethod::Post, GENERATE_PATH, None, None)
    }

    pub fn build_delete_all(&self) -> HttpRequest {
        self.client()
            .build_request(HttpMethod::Delete, DELETE_ALL_PATH, None, None)
    }

    pub fn build_upload_spreadsheet(&self, filename: &str, bytes: &[u8]) -> HttpRequest {
        let form = MultipartForm::new();
        let options = RequestOptions::content_type(form.content_type());
        let body = form
            .file(IMPORT_FIELD, filename, spreadsheet_content_type(filename), bytes)
            .finish();
        self.client()
            .build_request(HttpMethod::Post, IMPORT_PATH, Some(body), Some(&options))
    }

    /// Return the backend's JSON body unmodified after a status check.
    pub fn parse_bulk(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        decode_value(response)
    }

    /// Ask the backend to compute a full schedule assignment.
    pub fn generate(&self) -> Result<serde_json::Value, ApiError> {
        let response = self.client().execute(self.build_generate())?;
        self.parse_bulk(response)
    }

    /// Remove every schedule record on the backend.
    pub fn delete_all(&self) -> Result<serde_json::Value, ApiError> {
        let response = self.client().execute(self.build_delete_all())?;
        self.parse_bulk(response)
    }

    /// Forward a spreadsheet to the import endpoint. The file is not read
    /// or validated client-side.
    pub fn upload_spreadsheet(&self, filename: &str, bytes: &[u8]) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client()
            .execute(self.build_upload_spreadsheet(filename, bytes))?;
        self.parse_bulk(response)
    }
}
