//! Database repository for vehicle classifications.

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::classifications::{ClassificationCreateDBRequest, ClassificationDBResponse},
    },
    types::ClassificationId,
};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Classification {
    pub classification_id: ClassificationId,
    pub classification_name: String,
}

impl From<Classification> for ClassificationDBResponse {
    fn from(row: Classification) -> Self {
        Self {
            classification_id: row.classification_id,
            classification_name: row.classification_name,
        }
    }
}

pub struct Classifications<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Classifications<'c> {
    type CreateRequest = ClassificationCreateDBRequest;
    type Response = ClassificationDBResponse;
    type Id = ClassificationId;
    type Filter = ();

    #[instrument(skip(self, request), fields(name = %request.classification_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let row = sqlx::query_as::<_, Classification>(
            "INSERT INTO classification (classification_name) VALUES ($1) RETURNING classification_id, classification_name",
        )
        .bind(&request.classification_name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let row = sqlx::query_as::<_, Classification>(
            "SELECT classification_id, classification_name FROM classification WHERE classification_id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as::<_, Classification>(
            "SELECT classification_id, classification_name FROM classification ORDER BY classification_name",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl<'c> Classifications<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Exact-name lookup, used to reject duplicate classifications before inserting
    #[instrument(skip(self), err)]
    pub async fn get_by_name(&mut self, name: &str) -> Result<Option<ClassificationDBResponse>> {
        let row = sqlx::query_as::<_, Classification>(
            "SELECT classification_id, classification_name FROM classification WHERE classification_name = $1",
        )
        .bind(name)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(row.map(Into::into))
    }
}
