use crate::collection::MongoPostCollection;
use mongodb::{Client, Collection, Database, bson::doc};
use posthouse_common::model::ModelValidationError;
use thiserror::Error;
use tracing::info;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

pub const POSTS_COLLECTION: &str = "posts";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Handle to the active database.
///
/// Created once by the process entry point and shared from there; there is no
/// reconnection or health checking beyond the initial ping.
#[derive(Clone, Debug)]
pub struct DbClient {
    database: Database,
}

impl DbClient {
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub async fn connect(uri: &str, database_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database_name);

        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = database_name, "Connected to MongoDB");

        Ok(Self::new(database))
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    #[must_use]
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    #[must_use]
    pub fn posts(&self) -> MongoPostCollection {
        MongoPostCollection::new(self.collection(POSTS_COLLECTION))
    }
}
