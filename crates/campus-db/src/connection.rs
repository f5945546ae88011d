//! Remote SurrealDB connection for deployed services.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema::run_migrations;

/// Where the Campus store lives and how to sign in to it.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Host and port of the websocket endpoint, without scheme.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "localhost:8000".into(),
            namespace: "campus".into(),
            database: "campus".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// An open, migrated connection. Cheap to clone.
#[derive(Clone)]
pub struct DbManager {
    client: Surreal<Client>,
}

impl DbManager {
    /// Open the connection, select the namespace and database, and bring
    /// the schema up to date.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let client = Surreal::new::<Ws>(config.url.as_str()).await?;
        client
            .signin(Root {
                username: config.username.clone(),
                password: config.password.clone(),
            })
            .await?;
        client
            .use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await?;

        run_migrations(&client).await?;

        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Campus store ready"
        );
        Ok(Self { client })
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.client
    }
}
