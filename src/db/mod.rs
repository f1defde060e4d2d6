//! MongoDB connection handle.

use std::env;

use log::info;
use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client};

/// Shared MongoDB client plus the name of the shop database.
///
/// Registered once in the [`ServiceLocator`](crate::core::registry::ServiceLocator);
/// repositories obtain typed collections through [`Database::get_database`].
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// Connects using `MONGODB_URI` / `DATABASE_NAME` and verifies the
    /// connection with a `ping`.
    pub async fn new() -> Result<Self, mongodb::error::Error> {
        let mongodb_uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name =
            env::var("DATABASE_NAME").unwrap_or_else(|_| "perfume_shop_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("perfume_shop_backend".to_string());

        let client = Client::with_options(client_options)?;
        client
            .database(&database_name)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB connected: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
