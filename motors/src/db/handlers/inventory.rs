//! Database repository for vehicles, including the advanced search query builder.

use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::inventory::{InventoryCreateDBRequest, InventoryDBResponse, InventorySearch, InventoryUpdateDBRequest},
    },
    types::{ClassificationId, InventoryId},
};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

/// Maximum number of rows returned by a search.
pub const SEARCH_LIMIT: i64 = 50;

const SELECT_JOINED: &str =
    "SELECT i.*, c.classification_name FROM inventory AS i JOIN classification AS c ON i.classification_id = c.classification_id";

// Database entity model, always read joined with the classification name
#[derive(Debug, Clone, FromRow)]
struct Vehicle {
    pub inv_id: InventoryId,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_year: String,
    pub inv_description: String,
    pub inv_image: String,
    pub inv_thumbnail: String,
    pub inv_price: Decimal,
    pub inv_miles: i32,
    pub inv_color: String,
    pub classification_id: ClassificationId,
    pub classification_name: String,
}

impl From<Vehicle> for InventoryDBResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            inv_id: v.inv_id,
            inv_make: v.inv_make,
            inv_model: v.inv_model,
            inv_year: v.inv_year,
            inv_description: v.inv_description,
            inv_image: v.inv_image,
            inv_thumbnail: v.inv_thumbnail,
            inv_price: v.inv_price,
            inv_miles: v.inv_miles,
            inv_color: v.inv_color,
            classification_id: v.classification_id,
            classification_name: v.classification_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SearchValue {
    Int(i32),
    Price(Decimal),
    Text(String),
}

/// Incrementally built search statement.
///
/// Each filter contributes one predicate and one bound value. Placeholders are numbered in
/// the order filters are pushed, so the SQL text and the bind list can never drift apart.
#[derive(Debug, Default)]
struct SearchQuery {
    predicates: Vec<String>,
    values: Vec<SearchValue>,
}

impl SearchQuery {
    fn from_filter(filter: &InventorySearch) -> Self {
        let mut query = Self::default();

        if let Some(id) = filter.classification_id {
            query.push(SearchValue::Int(id), |p| format!("i.classification_id = {p}"));
        }
        if let Some(min) = filter.min_price {
            query.push(SearchValue::Price(min), |p| format!("i.inv_price >= {p}"));
        }
        if let Some(max) = filter.max_price {
            query.push(SearchValue::Price(max), |p| format!("i.inv_price <= {p}"));
        }
        if let Some(min) = filter.min_year {
            query.push(SearchValue::Int(min), |p| format!("CAST(i.inv_year AS INTEGER) >= {p}"));
        }
        if let Some(max) = filter.max_year {
            query.push(SearchValue::Int(max), |p| format!("CAST(i.inv_year AS INTEGER) <= {p}"));
        }
        if let Some(miles) = filter.max_miles {
            query.push(SearchValue::Int(miles), |p| format!("i.inv_miles <= {p}"));
        }
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query.push(SearchValue::Text(contains_pattern(q)), |p| {
                format!("(i.inv_make ILIKE {p} OR i.inv_model ILIKE {p})")
            });
        }

        query
    }

    fn push(&mut self, value: SearchValue, predicate: impl FnOnce(&str) -> String) {
        self.values.push(value);
        let placeholder = format!("${}", self.values.len());
        self.predicates.push(predicate(&placeholder));
    }

    fn sql(&self) -> String {
        let mut sql = String::from(SELECT_JOINED);
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        sql.push_str(&format!(" ORDER BY i.inv_year DESC, i.inv_price ASC LIMIT {SEARCH_LIMIT}"));
        sql
    }

    fn into_parts(self) -> (String, Vec<SearchValue>) {
        let sql = self.sql();
        (sql, self.values)
    }
}

/// `ILIKE` pattern matching `text` anywhere, with its own wildcards taken literally.
///
/// Backslash is the default `LIKE` escape character in Postgres.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub struct Inventory<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Inventory<'c> {
    type CreateRequest = InventoryCreateDBRequest;
    type Response = InventoryDBResponse;
    type Id = InventoryId;
    type Filter = InventorySearch;

    #[instrument(skip(self, request), fields(make = %request.inv_make, model = %request.inv_model), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            WITH inserted AS (
                INSERT INTO inventory (
                    inv_make, inv_model, inv_year, inv_description, inv_image,
                    inv_thumbnail, inv_price, inv_miles, inv_color, classification_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT i.*, c.classification_name
            FROM inserted AS i
            JOIN classification AS c ON i.classification_id = c.classification_id
            "#,
        )
        .bind(&request.inv_make)
        .bind(&request.inv_model)
        .bind(&request.inv_year)
        .bind(&request.inv_description)
        .bind(&request.inv_image)
        .bind(&request.inv_thumbnail)
        .bind(request.inv_price)
        .bind(request.inv_miles)
        .bind(&request.inv_color)
        .bind(request.classification_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(vehicle.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!("{SELECT_JOINED} WHERE i.inv_id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(vehicle.map(Into::into))
    }

    /// Advanced search: every present filter is AND-ed together, newest and cheapest first,
    /// capped at [`SEARCH_LIMIT`] rows.
    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let (sql, values) = SearchQuery::from_filter(filter).into_parts();

        let mut query = sqlx::query_as::<_, Vehicle>(&sql);
        for value in values {
            query = match value {
                SearchValue::Int(v) => query.bind(v),
                SearchValue::Price(v) => query.bind(v),
                SearchValue::Text(v) => query.bind(v),
            };
        }

        let vehicles = query.fetch_all(&mut *self.db).await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }
}

impl<'c> Inventory<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All vehicles in one classification; empty when there are none.
    #[instrument(skip(self), err)]
    pub async fn list_by_classification(&mut self, classification_id: ClassificationId) -> Result<Vec<InventoryDBResponse>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "{SELECT_JOINED} WHERE i.classification_id = $1 ORDER BY i.inv_make, i.inv_model, i.inv_id"
        ))
        .bind(classification_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    /// Alias for [`Repository::list`] with a name that reads better at call sites.
    pub async fn search(&mut self, filter: &InventorySearch) -> Result<Vec<InventoryDBResponse>> {
        self.list(filter).await
    }

    #[instrument(skip(self, request), fields(make = %request.inv_make, model = %request.inv_model), err)]
    pub async fn update(&mut self, id: InventoryId, request: &InventoryUpdateDBRequest) -> Result<InventoryDBResponse> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            WITH updated AS (
                UPDATE inventory SET
                    inv_make = $1,
                    inv_model = $2,
                    inv_year = $3,
                    inv_description = $4,
                    inv_image = $5,
                    inv_thumbnail = $6,
                    inv_price = $7,
                    inv_miles = $8,
                    inv_color = $9,
                    classification_id = $10
                WHERE inv_id = $11
                RETURNING *
            )
            SELECT i.*, c.classification_name
            FROM updated AS i
            JOIN classification AS c ON i.classification_id = c.classification_id
            "#,
        )
        .bind(&request.inv_make)
        .bind(&request.inv_model)
        .bind(&request.inv_year)
        .bind(&request.inv_description)
        .bind(&request.inv_image)
        .bind(&request.inv_thumbnail)
        .bind(request.inv_price)
        .bind(request.inv_miles)
        .bind(&request.inv_color)
        .bind(request.classification_id)
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        vehicle.map(Into::into).ok_or(DbError::NotFound)
    }

    /// Delete a vehicle, returning the removed row or `None` when nothing matched.
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: InventoryId) -> Result<Option<InventoryDBResponse>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            WITH deleted AS (
                DELETE FROM inventory WHERE inv_id = $1 RETURNING *
            )
            SELECT i.*, c.classification_name
            FROM deleted AS i
            JOIN classification AS c ON i.classification_id = c.classification_id
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(vehicle.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        handlers::Classifications,
        models::classifications::ClassificationCreateDBRequest,
    };
    use sqlx::PgPool;

    async fn create_classification(pool: &PgPool, name: &str) -> ClassificationId {
        let mut conn = pool.acquire().await.unwrap();
        Classifications::new(&mut conn)
            .create(&ClassificationCreateDBRequest {
                classification_name: name.to_string(),
            })
            .await
            .unwrap()
            .classification_id
    }

    fn vehicle(make: &str, model: &str, year: &str, price: i64, miles: i32, classification_id: ClassificationId) -> InventoryCreateDBRequest {
        InventoryCreateDBRequest {
            inv_make: make.to_string(),
            inv_model: model.to_string(),
            inv_year: year.to_string(),
            inv_description: format!("A well kept {make} {model} from {year}."),
            inv_image: "/images/vehicles/no-image.png".to_string(),
            inv_thumbnail: "/images/vehicles/no-image-tn.png".to_string(),
            inv_price: Decimal::from(price),
            inv_miles: miles,
            inv_color: "Blue".to_string(),
            classification_id,
        }
    }

    #[test]
    fn test_search_sql_without_filters() {
        let (sql, values) = SearchQuery::from_filter(&InventorySearch::default()).into_parts();
        assert_eq!(
            sql,
            "SELECT i.*, c.classification_name FROM inventory AS i JOIN classification AS c ON i.classification_id = c.classification_id \
             ORDER BY i.inv_year DESC, i.inv_price ASC LIMIT 50"
        );
        assert!(values.is_empty());
    }

    #[test]
    fn test_search_sql_with_single_filter() {
        let filter = InventorySearch {
            max_miles: Some(30_000),
            ..Default::default()
        };
        let (sql, values) = SearchQuery::from_filter(&filter).into_parts();
        assert!(sql.contains(" WHERE i.inv_miles <= $1 ORDER BY"));
        assert!(!sql.contains(" AND "));
        assert_eq!(values, vec![SearchValue::Int(30_000)]);
    }

    #[test]
    fn test_search_sql_with_all_filters_numbers_placeholders_in_order() {
        let filter = InventorySearch {
            classification_id: Some(2),
            min_price: Some(Decimal::from(1_000)),
            max_price: Some(Decimal::from(50_000)),
            min_year: Some(2000),
            max_year: Some(2020),
            max_miles: Some(80_000),
            q: Some("  cam ".to_string()),
        };
        let (sql, values) = SearchQuery::from_filter(&filter).into_parts();

        let where_clause = sql
            .split(" WHERE ")
            .nth(1)
            .and_then(|rest| rest.split(" ORDER BY ").next())
            .unwrap();
        assert_eq!(
            where_clause,
            "i.classification_id = $1 AND i.inv_price >= $2 AND i.inv_price <= $3 \
             AND CAST(i.inv_year AS INTEGER) >= $4 AND CAST(i.inv_year AS INTEGER) <= $5 \
             AND i.inv_miles <= $6 AND (i.inv_make ILIKE $7 OR i.inv_model ILIKE $7)"
        );
        assert_eq!(values.len(), 7);
        assert_eq!(values[6], SearchValue::Text("%cam%".to_string()));
        assert!(sql.ends_with("ORDER BY i.inv_year DESC, i.inv_price ASC LIMIT 50"));
    }

    #[test]
    fn test_text_filter_escapes_wildcards() {
        assert_eq!(contains_pattern("cam"), "%cam%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("f_150"), "%f\\_150%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");

        let filter = InventorySearch {
            q: Some(" _ ".to_string()),
            ..Default::default()
        };
        let (_, values) = SearchQuery::from_filter(&filter).into_parts();
        assert_eq!(values, vec![SearchValue::Text(r"%\_%".to_string())]);
    }

    #[test]
    fn test_blank_text_filter_is_omitted() {
        let filter = InventorySearch {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        let (sql, values) = SearchQuery::from_filter(&filter).into_parts();
        assert!(!sql.contains("WHERE"));
        assert!(values.is_empty());
    }

    #[sqlx::test]
    async fn test_create_and_get_vehicle(pool: PgPool) {
        let classification_id = create_classification(&pool, "Hatchback").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        let request = vehicle("Honda", "Fit", "2015", 9_500, 64_000, classification_id);
        let created = repo.create(&request).await.unwrap();
        assert_eq!(created.classification_name, "Hatchback");
        assert_eq!(created.display_name(), "Honda Fit");

        let fetched = repo.get_by_id(created.inv_id).await.unwrap().expect("vehicle should exist");
        assert_eq!(fetched, created);
        assert_eq!(fetched.inv_year, "2015");
        assert_eq!(fetched.inv_price, Decimal::from(9_500));
        assert_eq!(fetched.inv_miles, 64_000);
    }

    #[sqlx::test]
    async fn test_fractional_price_round_trips(pool: PgPool) {
        let classification_id = create_classification(&pool, "Coupe").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        let request = InventoryCreateDBRequest {
            inv_price: Decimal::new(1_234_550, 2),
            ..vehicle("Mazda", "MX-5", "2016", 0, 30_000, classification_id)
        };
        let created = repo.create(&request).await.unwrap();
        assert_eq!(created.inv_price, Decimal::new(1_234_550, 2));

        let fetched = repo.get_by_id(created.inv_id).await.unwrap().expect("vehicle should exist");
        assert_eq!(fetched.inv_price, request.inv_price);
    }

    #[sqlx::test]
    async fn test_get_missing_vehicle_is_absent(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);
        assert!(repo.get_by_id(424_242).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_list_by_classification(pool: PgPool) {
        let wagons = create_classification(&pool, "Wagon").await;
        let coupes = create_classification(&pool, "Coupe").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        repo.create(&vehicle("Volvo", "V70", "2008", 6_000, 150_000, wagons)).await.unwrap();
        repo.create(&vehicle("Audi", "A4 Avant", "2012", 11_000, 98_000, wagons)).await.unwrap();

        let listed = repo.list_by_classification(wagons).await.unwrap();
        let names: Vec<_> = listed.iter().map(|v| v.display_name()).collect();
        assert_eq!(names, vec!["Audi A4 Avant", "Volvo V70"]);

        assert!(repo.list_by_classification(coupes).await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn test_update_vehicle(pool: PgPool) {
        let classification_id = create_classification(&pool, "Roadster").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        let created = repo
            .create(&vehicle("Mazda", "MX-5", "2019", 21_000, 12_000, classification_id))
            .await
            .unwrap();

        let mut changes = vehicle("Mazda", "MX-5 RF", "2019", 19_500, 14_000, classification_id);
        changes.inv_color = "Red".to_string();
        let updated = repo.update(created.inv_id, &changes).await.unwrap();
        assert_eq!(updated.inv_id, created.inv_id);
        assert_eq!(updated.inv_model, "MX-5 RF");
        assert_eq!(updated.inv_color, "Red");
        assert_eq!(updated.inv_price, Decimal::from(19_500));
    }

    #[sqlx::test]
    async fn test_update_missing_vehicle_is_not_found(pool: PgPool) {
        let classification_id = create_classification(&pool, "Minivan").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        let err = repo
            .update(999_999, &vehicle("Kia", "Sedona", "2016", 8_000, 90_000, classification_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    async fn test_update_with_unknown_classification_is_fk_violation(pool: PgPool) {
        let classification_id = create_classification(&pool, "Pickup").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        let created = repo
            .create(&vehicle("Ford", "Ranger", "2021", 28_000, 20_000, classification_id))
            .await
            .unwrap();
        let err = repo
            .update(created.inv_id, &vehicle("Ford", "Ranger", "2021", 28_000, 20_000, 777_777))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(err.is_constraint_violation());
    }

    #[sqlx::test]
    async fn test_negative_price_is_check_violation(pool: PgPool) {
        let classification_id = create_classification(&pool, "Kitcar").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        let err = repo
            .create(&vehicle("Caterham", "Seven", "2010", -1, 5_000, classification_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[sqlx::test]
    async fn test_delete_vehicle(pool: PgPool) {
        let classification_id = create_classification(&pool, "Compact").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        let created = repo
            .create(&vehicle("Fiat", "500", "2014", 5_000, 70_000, classification_id))
            .await
            .unwrap();

        let deleted = repo.delete(created.inv_id).await.unwrap().expect("row should be deleted");
        assert_eq!(deleted.inv_id, created.inv_id);
        assert_eq!(deleted.classification_name, "Compact");
        assert!(repo.get_by_id(created.inv_id).await.unwrap().is_none());

        // Second delete finds nothing
        assert!(repo.delete(created.inv_id).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_search_filters_and_ordering(pool: PgPool) {
        let classification_id = create_classification(&pool, "Muscle").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        repo.create(&vehicle("Chevy", "Camaro", "1969", 45_000, 80_000, classification_id)).await.unwrap();
        repo.create(&vehicle("Dodge", "Challenger", "2018", 30_000, 25_000, classification_id)).await.unwrap();
        repo.create(&vehicle("Ford", "Mustang", "2018", 27_000, 30_000, classification_id)).await.unwrap();
        repo.create(&vehicle("Pontiac", "GTO", "1967", 55_000, 95_000, classification_id)).await.unwrap();

        // Year descending, then price ascending
        let all = repo
            .search(&InventorySearch {
                classification_id: Some(classification_id),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = all.iter().map(|v| v.display_name()).collect();
        assert_eq!(names, vec!["Ford Mustang", "Dodge Challenger", "Chevy Camaro", "Pontiac GTO"]);

        // Bounds are inclusive and compared numerically
        let classics = repo
            .search(&InventorySearch {
                classification_id: Some(classification_id),
                min_year: Some(1967),
                max_year: Some(1969),
                max_price: Some(Decimal::from(45_000)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(classics.len(), 1);
        assert_eq!(classics[0].display_name(), "Chevy Camaro");

        // Text matches make or model, case-insensitively
        let by_text = repo
            .search(&InventorySearch {
                q: Some("gto".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].inv_make, "Pontiac");

        let by_make = repo
            .search(&InventorySearch {
                q: Some("DODGE".to_string()),
                max_miles: Some(25_000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_make.len(), 1);

        // Wildcards in the text are matched literally
        for q in ["%", "_", "Ca%ro"] {
            let literal = repo
                .search(&InventorySearch {
                    q: Some(q.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert!(literal.is_empty(), "{q} should match nothing");
        }
    }

    #[sqlx::test]
    async fn test_search_is_capped(pool: PgPool) {
        let classification_id = create_classification(&pool, "Fleet").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inventory::new(&mut conn);

        for n in 0..(SEARCH_LIMIT + 5) {
            repo.create(&vehicle("Toyota", "Corolla", "2020", 15_000 + n, 10_000, classification_id))
                .await
                .unwrap();
        }

        let results = repo.search(&InventorySearch::default()).await.unwrap();
        assert_eq!(results.len() as i64, SEARCH_LIMIT);
        assert!(results.windows(2).all(|w| w[0].inv_price <= w[1].inv_price));
    }
}
