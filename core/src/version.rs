//! Saved schedule versions: CRUD on `versiones-horario/` plus snapshot,
//! load and restore.

use std::ops::Deref;

use serde::Serialize;

use crate::client::{decode, json_body, ApiClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::resource::{collection_path, item_path, ResourceService, Versiones};
use crate::types::{ResourceId, RestoreResult, VersionCargada, VersionHorario};

#[derive(Serialize)]
struct SaveCurrent<'n> {
    nombre_version: &'n str,
}

pub struct VersionService<'a> {
    inner: ResourceService<'a, Versiones>,
}

impl<'a> Deref for VersionService<'a> {
    type Target = ResourceService<'a, Versiones>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'a> VersionService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: ResourceService::new(client),
        }
    }

    pub fn build_save_current(&self, nombre_version: &str) -> Result<HttpRequest, ApiError> {
        let path = format!("{}guardar_actual/", collection_path::<Versiones>());
        let body = json_body(&SaveCurrent { nombre_version })?;
        Ok(self
            .client()
            .build_request(HttpMethod::Post, &path, Some(body), None))
    }

    pub fn build_load(&self, id: &ResourceId) -> HttpRequest {
        let path = format!("{}cargar_version/", item_path::<Versiones>(id));
        self.client().build_request(HttpMethod::Get, &path, None, None)
    }

    pub fn build_restore(&self, id: &ResourceId) -> HttpRequest {
        let path = format!("{}restore/", item_path::<Versiones>(id));
        self.client().build_request(HttpMethod::Post, &path, None, None)
    }

    /// Snapshot the backend's current schedule under `nombre_version`.
    pub fn save_current(&self, nombre_version: &str) -> Result<VersionHorario, ApiError> {
        let response = self
            .client()
            .execute(self.build_save_current(nombre_version)?)?;
        decode(response)
    }

    /// Fetch a saved snapshot without touching the live schedule.
    pub fn load(&self, id: &ResourceId) -> Result<VersionCargada, ApiError> {
        let response = self.client().execute(self.build_load(id))?;
        decode(response)
    }

    /// Replace the live schedule with a saved snapshot.
    pub fn restore(&self, id: &ResourceId) -> Result<RestoreResult, ApiError> {
        let response = self.client().execute(self.build_restore(id))?;
        decode(response)
    }
}
