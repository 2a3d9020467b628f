//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use accounts::Trace;
#[cfg(debug_assertions)]
use accounts::doc::ApiDoc;
use accounts::domain::RegistrationFinalizer;
use accounts::domain::ports::AccountStore;
use accounts::inbound::http::accounts::create_account;
use accounts::inbound::http::health::{HealthState, live, ready};
use accounts::inbound::http::state::HttpState;
use accounts::inbound::http::validation::json_config;

fn build_http_state(store: Arc<dyn AccountStore>) -> web::Data<HttpState> {
    let finalizer = RegistrationFinalizer::new(store, Arc::new(DefaultClock));
    web::Data::new(HttpState::new(Arc::new(finalizer)))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").service(create_account);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the service ready.
///
/// The returned [`Server`] must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig { bind_addr, store } = config;
    let http_state = build_http_state(store);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accounts::domain::{Email, PendingRegistration, Provider, RegistrationCode, SocialId};
    use accounts::outbound::memory::InMemoryAccountStore;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn seeded_store() -> InMemoryAccountStore {
        let store = InMemoryAccountStore::default();
        store
            .insert_pending(PendingRegistration {
                code: RegistrationCode::new("abc123").expect("valid code"),
                email: Email::new("john@doe.com").expect("valid email"),
                provider: Provider::new("google").expect("valid provider"),
                social_id: SocialId::new("g-1").expect("valid social id"),
                created_at: Utc::now(),
            })
            .await
            .expect("seed pending registration");
        store
    }

    #[rstest]
    #[actix_web::test]
    async fn wired_app_creates_accounts() {
        let store = seeded_store().await;
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            build_http_state(Arc::new(store.clone())),
        ))
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "registrationCode": "abc123",
                "email": "john@doe.com",
                "username": "johnny",
                "bio": "hi there"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res.headers().contains_key("trace-id"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["profile"]["username"], "johnny");
        assert_eq!(store.accounts().await.len(), 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_uses_error_schema() {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            build_http_state(Arc::new(InMemoryAccountStore::default())),
        ))
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"registrationCode\":")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert!(body["traceId"].is_string());
    }
}
