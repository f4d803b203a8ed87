//! Generic CRUD service over one backend collection.
//!
//! # Design
//! A `Resource` names a collection path and the payload/record types that
//! travel on it. `ResourceService` turns the five CRUD operations into
//! single REST round trips against that collection:
//!
//! | op     | method | path                 |
//! |--------|--------|----------------------|
//! | list   | GET    | `{collection}/`      |
//! | get    | GET    | `{collection}/{id}/` |
//! | create | POST   | `{collection}/`      |
//! | update | PUT    | `{collection}/{id}/` |
//! | delete | DELETE | `{collection}/{id}/` |
//!
//! Every operation exists as a pure `build_*` / `parse_*` pair plus a method
//! that executes the pair through the shared client. There is no local
//! validation, caching or retry.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{check_status, decode, json_body, ApiClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Aula, AulaData, Horario, HorarioData, Materia, MateriaData, Profesor, ProfesorData,
    ResourceId, Restriccion, RestriccionData, SolicitudClase, SolicitudData, VersionData,
    VersionHorario,
};

/// Describes one backend collection.
pub trait Resource {
    /// Collection path relative to the API root, without slashes.
    const COLLECTION: &'static str;
    /// Fields sent on create and update.
    type Payload: Serialize;
    /// Record returned by the backend.
    type Record: DeserializeOwned;
}

pub struct Profesores;
pub struct Materias;
pub struct Aulas;
pub struct Restricciones;
pub struct Horarios;
pub struct Solicitudes;
pub struct Versiones;

impl Resource for Profesores {
    const COLLECTION: &'static str = "profesores";
    type Payload = ProfesorData;
    type Record = Profesor;
}

impl Resource for Materias {
    const COLLECTION: &'static str = "materias";
    type Payload = MateriaData;
    type Record = Materia;
}

impl Resource for Aulas {
    const COLLECTION: &'static str = "aulas";
    type Payload = AulaData;
    type Record = Aula;
}

impl Resource for Restricciones {
    const COLLECTION: &'static str = "restricciones";
    type Payload = RestriccionData;
    type Record = Restriccion;
}

impl Resource for Horarios {
    const COLLECTION: &'static str = "horarios";
    type Payload = HorarioData;
    type Record = Horario;
}

impl Resource for Solicitudes {
    const COLLECTION: &'static str = "solicitudes-clase";
    type Payload = SolicitudData;
    type Record = SolicitudClase;
}

impl Resource for Versiones {
    const COLLECTION: &'static str = "versiones-horario";
    type Payload = VersionData;
    type Record = VersionHorario;
}

pub type ProfesorService<'a> = ResourceService<'a, Profesores>;
pub type MateriaService<'a> = ResourceService<'a, Materias>;
pub type AulaService<'a> = ResourceService<'a, Aulas>;
pub type RestriccionService<'a> = ResourceService<'a, Restricciones>;

/// `{collection}/`
pub fn collection_path<R: Resource>() -> String {
    format!("{}/", R::COLLECTION)
}

/// `{collection}/{id}/`
pub fn item_path<R: Resource>(id: &ResourceId) -> String {
    format!("{}/{id}/", R::COLLECTION)
}

/// CRUD operations for the collection described by `R`.
pub struct ResourceService<'a, R> {
    client: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> ResourceService<'a, R> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &'a ApiClient {
        self.client
    }

    pub fn build_list(&self) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &collection_path::<R>(), None, None)
    }

    pub fn build_get(&self, id: &ResourceId) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &item_path::<R>(id), None, None)
    }

    pub fn build_create(&self, input: &R::Payload) -> Result<HttpRequest, ApiError> {
        let body = json_body(input)?;
        Ok(self
            .client
            .build_request(HttpMethod::Post, &collection_path::<R>(), Some(body), None))
    }

    pub fn build_update(&self, id: &ResourceId, input: &R::Payload) -> Result<HttpRequest, ApiError> {
        let body = json_body(input)?;
        Ok(self
            .client
            .build_request(HttpMethod::Put, &item_path::<R>(id), Some(body), None))
    }

    pub fn build_delete(&self, id: &ResourceId) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Delete, &item_path::<R>(id), None, None)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<R::Record>, ApiError> {
        decode(response)
    }

    pub fn parse_record(&self, response: HttpResponse) -> Result<R::Record, ApiError> {
        decode(response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn list(&self) -> Result<Vec<R::Record>, ApiError> {
        let response = self.client.execute(self.build_list())?;
        self.parse_list(response)
    }

    pub fn get(&self, id: &ResourceId) -> Result<R::Record, ApiError> {
        let response = self.client.execute(self.build_get(id))?;
        self.parse_record(response)
    }

    pub fn create(&self, input: &R::Payload) -> Result<R::Record, ApiError> {
        let response = self.client.execute(self.build_create(input)?)?;
        self.parse_record(response)
    }

    /// Replace the record at `{collection}/{id}/`. The target is always
    /// taken from `id`, never from the payload.
    pub fn update(&self, id: &ResourceId, input: &R::Payload) -> Result<R::Record, ApiError> {
        let response = self.client.execute(self.build_update(id, input)?)?;
        self.parse_record(response)
    }

    pub fn delete(&self, id: &ResourceId) -> Result<(), ApiError> {
        let response = self.client.execute(self.build_delete(id))?;
        self.parse_delete(response)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::{Transport, APPLICATION_JSON, CONTENT_TYPE};

    /// Records every request and replies from a queue of canned responses.
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub requests: Mutex<Vec<HttpRequest>>,
        pub replies: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    }

    impl RecordingTransport {
        pub fn reply(&self, status: u16, body: &str) {
            self.replies.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
        }

        pub fn fail(&self, err: ApiError) {
            self.replies.lock().unwrap().push_back(Err(err));
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no canned reply".to_string())))
        }
    }

    pub(crate) fn recording_client() -> (ApiClient, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let client = ApiClient::with_transport(
            ClientConfig::new("http://localhost:8000/api/"),
            transport.clone(),
        );
        (client, transport)
    }

    fn aula_data() -> AulaData {
        AulaData {
            codigo: "A-101".to_string(),
            tipo: "Teórica".to_string(),
            capacidad: 40,
            ubicacion: Some("Edificio A".to_string()),
            recursos_especiales: None,
        }
    }

    const AULA_JSON: &str = r#"{"id":5,"codigo":"A-101","tipo":"Teórica","capacidad":40,"ubicacion":"Edificio A","recursos_especiales":null}"#;

    #[test]
    fn list_issues_one_get_on_collection() {
        let (client, transport) = recording_client();
        transport.reply(200, &format!("[{AULA_JSON}]"));

        let aulas = AulaService::new(&client).list().unwrap();
        assert_eq!(aulas.len(), 1);
        assert_eq!(aulas[0].data.codigo, "A-101");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://localhost:8000/api/aulas/");
        assert!(requests[0].body.is_none());
    }

    #[test]
    fn get_addresses_item_path() {
        let (client, transport) = recording_client();
        transport.reply(200, AULA_JSON);

        let aula = AulaService::new(&client).get(&5u64.into()).unwrap();
        assert_eq!(aula.id, ResourceId::Number(5));
        assert_eq!(transport.requests()[0].url, "http://localhost:8000/api/aulas/5/");
    }

    #[test]
    fn create_posts_json_payload() {
        let (client, transport) = recording_client();
        transport.reply(201, AULA_JSON);

        AulaService::new(&client).create(&aula_data()).unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/aulas/");
        assert_eq!(req.header(CONTENT_TYPE), Some(APPLICATION_JSON));
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["codigo"], "A-101");
        assert_eq!(body["capacidad"], 40);
        assert!(body.get("id").is_none());
    }

    #[test]
    fn update_targets_id_from_argument() {
        let (client, transport) = recording_client();
        transport.reply(200, r#"{"id":9,"nombre":"Redes"}"#);

        let service = MateriaService::new(&client);
        let data: MateriaData = serde_json::from_value(serde_json::json!({"nombre": "Redes"})).unwrap();
        service.update(&9u64.into(), &data).unwrap();

        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/api/materias/9/");
    }

    #[test]
    fn delete_aula_five() {
        let (client, transport) = recording_client();
        transport.reply(204, "");

        AulaService::new(&client).delete(&5u64.into()).unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].url, "http://localhost:8000/api/aulas/5/");
    }

    #[test]
    fn text_ids_pass_through_unchanged() {
        let (client, transport) = recording_client();
        transport.reply(204, "");

        RestriccionService::new(&client)
            .delete(&ResourceId::from("r-17"))
            .unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://localhost:8000/api/restricciones/r-17/"
        );
    }

    #[test]
    fn not_found_and_http_errors_surface() {
        let (client, transport) = recording_client();
        transport.reply(404, r#"{"detail":"No encontrado."}"#);
        transport.reply(500, "boom");

        let service = ProfesorService::new(&client);
        assert!(matches!(service.get(&1u64.into()), Err(ApiError::NotFound)));
        assert!(matches!(
            service.list(),
            Err(ApiError::Http { status: 500, .. })
        ));
    }

    #[test]
    fn transport_failure_is_returned_unchanged() {
        let (client, transport) = recording_client();
        transport.fail(ApiError::Timeout);

        let err = ProfesorService::new(&client).list().unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn wrong_shape_is_a_failure_not_a_partial_record() {
        let (client, transport) = recording_client();
        transport.reply(200, r#"[{"id":1,"nombre":"Sin apellido"}]"#);

        let err = ProfesorService::new(&client).list().unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn content_type_only_on_calls_with_a_body() {
        let (client, _) = recording_client();
        let service = AulaService::new(&client);
        let id = ResourceId::from(1u64);
        for req in [
            service.build_create(&aula_data()).unwrap(),
            service.build_update(&id, &aula_data()).unwrap(),
        ] {
            assert_eq!(req.header(CONTENT_TYPE), Some(APPLICATION_JSON), "{}", req.url);
        }
        for req in [service.build_list(), service.build_get(&id), service.build_delete(&id)] {
            assert_eq!(req.header(CONTENT_TYPE), None, "{} {}", req.method, req.url);
        }
    }
}
