use std::net::TcpListener;

use auth_service::configuration::get_configuration;
use auth_service::startup::run;
use sqlx::{Connection, Executor, PgConnection, PgPool};

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

/// Spawn the application on a random port against a freshly created
/// database, so tests are isolated from each other.
pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let connection_pool = configure_database(&configuration.database_url).await;

    let server = run(
        listener,
        connection_pool.clone(),
        configuration.jwt_settings(),
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

async fn configure_database(database_url: &str) -> PgPool {
    let (base_url, _) = database_url
        .rsplit_once('/')
        .expect("database_url has no database name");
    let database_name = uuid::Uuid::new_v4().to_string();

    // Create database
    let mut connection = PgConnection::connect(base_url)
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, database_name))
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(&format!("{}/{}", base_url, database_name))
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");

    connection_pool
}
