use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use mongodb::options::ClientOptions;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use flightbook::app::{build_router, AppState};
use flightbook::db::repository::{BookingRepository, MongoBookingRepository};

/// Holds a running MongoDB container and provides the Axum router for
/// integration tests.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    pub mongo: ContainerAsync<Mongo>,
    pub router: Router,
    pub repo: Arc<dyn BookingRepository>,
    pub db: mongodb::Database,
}

impl TestEnv {
    /// Start MongoDB and build a router wired to a fresh database.
    pub async fn start() -> Self {
        let mongo = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);

        // Short selection timeout so outage tests fail fast
        let mut options = ClientOptions::parse(mongo_uri.as_str())
            .await
            .expect("Failed to parse MongoDB URI");
        options.server_selection_timeout = Some(Duration::from_secs(2));

        let client =
            mongodb::Client::with_options(options).expect("Failed to create MongoDB client");
        let db = client.database(&format!("flightbook_test_{}", uuid::Uuid::new_v4().simple()));

        let repo: Arc<dyn BookingRepository> = Arc::new(MongoBookingRepository::new(&db));
        let router = build_router(AppState::new(repo.clone()));

        Self {
            mongo,
            router,
            repo,
            db,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }
}

/// The booking submitted by the mobile client in the happy-path scenario.
pub fn alice_booking() -> serde_json::Value {
    serde_json::json!({
        "user": "alice",
        "email": "a@x.com",
        "flight": { "id": "F1" },
        "passengers": 1,
        "passengerName": "Alice",
        "passportNumber": "P123",
        "citizenship": "US",
        "passportExpiry": "2030-01-01",
        "totalPrice": 250
    })
}
