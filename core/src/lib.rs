//! Synchronous API client core for the academic scheduling backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for every
//! backend collection (professors, subjects, classrooms, restrictions,
//! schedules, class requests, saved versions). A single `ApiClient`, built
//! once from an immutable `ClientConfig`, executes the round-trip through a
//! `Transport` and is shared by reference with every service.
//!
//! # Design
//! - `ApiClient` holds configuration and a transport, nothing mutable.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), with a convenience method running both.
//! - Records are typed at the boundary; a response that does not match its
//!   schema is an error, never a partial value.
//! - `navigation` derives the layout state (sections, sidebar) from a
//!   browser path without any I/O.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod navigation;
pub mod resource;
pub mod schedule;
pub mod solicitud;
pub mod transport;
pub mod types;
pub mod version;

pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use navigation::{NavEntry, Navigator, Route, ScheduleTab, Section, ViewState};
pub use resource::{
    AulaService, MateriaService, ProfesorService, Resource, ResourceService, RestriccionService,
};
pub use schedule::HorarioService;
pub use solicitud::SolicitudService;
pub use transport::UreqTransport;
pub use types::ResourceId;
pub use version::VersionService;
