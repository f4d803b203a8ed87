//! Render pages and run the bulk actions against the live mock server.

use std::net::SocketAddr;

use horarios_console::{actions, render};
use horarios_core::types::AulaData;
use horarios_core::{ApiClient, AulaService, ClientConfig};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(ClientConfig::new(&format!("http://{addr}/api/")))
}

#[test]
fn aulas_page_shows_created_rooms() {
    let client = client_for(start_server());
    AulaService::new(&client)
        .create(&AulaData {
            codigo: "LAB-7".to_string(),
            tipo: "Laboratorio".to_string(),
            capacidad: 24,
            ubicacion: Some("Edificio B".to_string()),
            recursos_especiales: None,
        })
        .unwrap();

    let out = render(&client, "/aulas/");
    assert!(out.contains("Gestión de Aulas"));
    assert!(out.contains("LAB-7"));
    assert!(out.contains("Edificio B"));
    assert!(!out.contains("Horario Principal"));
}

#[test]
fn bulk_actions_report_backend_messages() {
    let client = client_for(start_server());

    let err = actions::generate(&client).unwrap_err();
    assert!(err.to_string().contains("No hay profesores"));

    assert_eq!(
        actions::delete_all(&client).unwrap(),
        "Se eliminaron 0 horarios exitosamente."
    );
    assert_eq!(
        actions::import(&client, "plan.xlsx", b"PK\x03\x04").unwrap(),
        "Se importaron 0 solicitudes exitosamente."
    );
    assert!(actions::save_version(&client, "inicial")
        .unwrap()
        .starts_with("Versión \"inicial\" guardada"));
}

#[test]
fn unreachable_backend_renders_error_inside_layout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let out = render(&client_for(addr), "/horarios");
    assert!(out.contains("> Horario Principal"));
    assert!(out.contains("Error al cargar los datos: transport error"));
}
