//! Class request service: CRUD on `solicitudes-clase/` plus the request
//! workflow endpoints.

use std::ops::Deref;

use crate::client::{check_status, decode, decode_value, json_body, ApiClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::resource::{collection_path, item_path, ResourceService, Solicitudes};
use crate::types::{AsignacionHorario, EstadoSolicitud, ResourceId, SolicitudClase};

pub struct SolicitudService<'a> {
    inner: ResourceService<'a, Solicitudes>,
}

impl<'a> Deref for SolicitudService<'a> {
    type Target = ResourceService<'a, Solicitudes>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'a> SolicitudService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: ResourceService::new(client),
        }
    }

    pub fn build_list_by_estado(&self, estado: EstadoSolicitud) -> HttpRequest {
        let path = format!("{}?estado={}", collection_path::<Solicitudes>(), estado.as_str());
        self.client().build_request(HttpMethod::Get, &path, None, None)
    }

    pub fn build_clear_all(&self) -> HttpRequest {
        let path = format!("{}clear_all/", collection_path::<Solicitudes>());
        self.client().build_request(HttpMethod::Delete, &path, None, None)
    }

    pub fn build_assign_to_schedule(
        &self,
        id: &ResourceId,
        slot: &AsignacionHorario,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("{}asignar_a_horario/", item_path::<Solicitudes>(id));
        let body = json_body(slot)?;
        Ok(self
            .client()
            .build_request(HttpMethod::Post, &path, Some(body), None))
    }

    /// Requests in one workflow state, filtered by the backend.
    pub fn list_by_estado(&self, estado: EstadoSolicitud) -> Result<Vec<SolicitudClase>, ApiError> {
        let response = self.client().execute(self.build_list_by_estado(estado))?;
        decode(response)
    }

    /// Remove every class request on the backend.
    pub fn clear_all(&self) -> Result<(), ApiError> {
        let response = self.client().execute(self.build_clear_all())?;
        check_status(&response)
    }

    /// Turn a request into a schedule entry at `slot`. The backend answers
    /// 409 when the room or professor is already taken.
    pub fn assign_to_schedule(
        &self,
        id: &ResourceId,
        slot: &AsignacionHorario,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client()
            .execute(self.build_assign_to_schedule(id, slot)?)?;
        decode_value(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::tests::recording_client;
    use crate::types::Dia;

    #[test]
    fn list_by_estado_adds_query() {
        let (client, transport) = recording_client();
        transport.reply(200, "[]");

        let pendientes = SolicitudService::new(&client)
            .list_by_estado(EstadoSolicitud::Pendiente)
            .unwrap();
        assert!(pendientes.is_empty());
        assert_eq!(
            transport.requests()[0].url,
            "http://localhost:8000/api/solicitudes-clase/?estado=Pendiente"
        );
    }

    #[test]
    fn clear_all_deletes_collection_action() {
        let (client, transport) = recording_client();
        transport.reply(204, "");

        SolicitudService::new(&client).clear_all().unwrap();
        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8000/api/solicitudes-clase/clear_all/");
    }

    #[test]
    fn assign_posts_slot_to_item_action() {
        let (client, transport) = recording_client();
        transport.reply(409, r#"{"error":"El aula ya está ocupada en ese horario para este período."}"#);

        let slot = AsignacionHorario {
            aula: 2u64.into(),
            dia: Dia::Mar,
            hora_inicio: "08:00".to_string(),
            hora_fin: "10:00".to_string(),
        };
        let err = SolicitudService::new(&client)
            .assign_to_schedule(&7u64.into(), &slot)
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 409, .. }));

        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.url,
            "http://localhost:8000/api/solicitudes-clase/7/asignar_a_horario/"
        );
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["aula"], 2);
        assert_eq!(body["dia"], "MAR");
    }

    #[test]
    fn records_decode_estado() {
        let (client, transport) = recording_client();
        transport.reply(
            200,
            r#"[{"id":1,"materia":2,"profesor":3,"tipo_clase":"Teoría","seccion":"1","periodo_academico":"2025-2","carrera_programa":"Telecom","estado":"Asignada","materia_nombre":"Redes"}]"#,
        );

        let solicitudes = SolicitudService::new(&client).list().unwrap();
        assert_eq!(solicitudes[0].estado, EstadoSolicitud::Asignada);
        assert_eq!(solicitudes[0].materia_nombre.as_deref(), Some("Redes"));
    }
}
