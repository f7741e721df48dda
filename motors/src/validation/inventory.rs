//! Validation for classification, vehicle, delete and search submissions.

use super::{ValidationErrors, Validated, rules};
use crate::{
    api::models::inventory::{ClassificationForm, DeleteForm, InventoryForm, SearchParams},
    db::{
        errors::Result,
        handlers::Classifications,
        models::{
            classifications::ClassificationCreateDBRequest,
            inventory::{InventoryCreateDBRequest, InventorySearch, InventoryUpdateDBRequest},
        },
    },
    types::InventoryId,
};
use rust_decimal::Decimal;
use sqlx::PgConnection;

/// Earliest year accepted by the search form.
pub const MIN_SEARCH_YEAR: i32 = 1886;
/// Longest free-text search accepted.
pub const MAX_SEARCH_TEXT: usize = 50;
/// Largest price the `NUMERIC(9, 2)` column holds, in cents.
pub const MAX_PRICE_CENTS: i64 = 999_999_999;
/// Cents are the finest price the column stores.
pub const PRICE_SCALE: u32 = 2;

pub const CLASSIFICATION_REQUIRED: &str = "Please provide a classification name.";
pub const CLASSIFICATION_ALPHANUMERIC: &str = "Classification name must not contain spaces or special characters.";
pub const CLASSIFICATION_EXISTS: &str = "Classification already exists.";

pub const MAKE_REQUIRED: &str = "Please provide a vehicle make.";
pub const MODEL_REQUIRED: &str = "Please provide a vehicle model.";
pub const YEAR_INVALID: &str = "Please provide a valid 4-digit year.";
pub const DESCRIPTION_TOO_SHORT: &str = "Please provide a vehicle description (at least 10 characters).";
pub const IMAGE_REQUIRED: &str = "Please provide an image path.";
pub const THUMBNAIL_REQUIRED: &str = "Please provide a thumbnail path.";
pub const PRICE_INVALID: &str = "Please provide a valid price.";
pub const MILES_INVALID: &str = "Please provide a valid mileage.";
pub const COLOR_REQUIRED: &str = "Please provide a vehicle color.";
pub const CLASSIFICATION_INVALID: &str = "Please choose a valid classification.";
pub const VEHICLE_ID_INVALID: &str = "Vehicle id is missing or invalid.";

pub const SEARCH_CLASSIFICATION_INVALID: &str = "Classification must be a valid value.";
pub const SEARCH_MIN_PRICE_INVALID: &str = "Minimum price must be 0 or greater.";
pub const SEARCH_MAX_PRICE_INVALID: &str = "Maximum price must be 0 or greater.";
pub const SEARCH_MIN_YEAR_INVALID: &str = "Minimum year must be valid.";
pub const SEARCH_MAX_YEAR_INVALID: &str = "Maximum year must be valid.";
pub const SEARCH_MILES_INVALID: &str = "Maximum miles must be 0 or greater.";
pub const SEARCH_TEXT_TOO_LONG: &str = "Search text must be 50 characters or fewer.";
pub const SEARCH_PRICE_RANGE: &str = "Minimum price cannot be greater than maximum price.";
pub const SEARCH_YEAR_RANGE: &str = "Minimum year cannot be greater than maximum year.";

/// Field rules for a new classification name.
pub fn validate_classification(form: &ClassificationForm) -> Validated<ClassificationCreateDBRequest> {
    let name = rules::required(&form.classification_name, CLASSIFICATION_REQUIRED)
        .and_then(|name| rules::alphanumeric(&name, CLASSIFICATION_ALPHANUMERIC));

    match name {
        Ok(classification_name) => Ok(ClassificationCreateDBRequest { classification_name }),
        Err(message) => Err(ValidationErrors::single("classification_name", message)),
    }
}

/// Field rules, then an exact-name uniqueness check against existing classifications.
pub async fn validate_new_classification(
    conn: &mut PgConnection,
    form: &ClassificationForm,
) -> Result<Validated<ClassificationCreateDBRequest>> {
    let request = match validate_classification(form) {
        Ok(request) => request,
        Err(errors) => return Ok(Err(errors)),
    };

    let existing = Classifications::new(conn).get_by_name(&request.classification_name).await?;
    if existing.is_some() {
        return Ok(Err(ValidationErrors::single("classification_name", CLASSIFICATION_EXISTS)));
    }

    Ok(Ok(request))
}

/// Field rules shared by the add and edit vehicle forms.
pub fn validate_vehicle(form: &InventoryForm) -> Validated<InventoryCreateDBRequest> {
    let mut errors = ValidationErrors::new();

    let make = errors.check("inv_make", rules::required(&form.inv_make, MAKE_REQUIRED));
    let model = errors.check("inv_model", rules::required(&form.inv_model, MODEL_REQUIRED));
    let year = errors.check("inv_year", rules::four_digit_year(&form.inv_year, YEAR_INVALID));
    let description = errors.check(
        "inv_description",
        rules::min_chars(&form.inv_description, 10, DESCRIPTION_TOO_SHORT),
    );
    let image = errors.check("inv_image", rules::required(&form.inv_image, IMAGE_REQUIRED));
    let thumbnail = errors.check("inv_thumbnail", rules::required(&form.inv_thumbnail, THUMBNAIL_REQUIRED));
    let price = errors.check(
        "inv_price",
        rules::decimal_min(&form.inv_price, Decimal::ZERO, PRICE_INVALID)
            .and_then(|p| rules::max_scale(p, PRICE_SCALE, PRICE_INVALID))
            .and_then(|p| if p > Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE) { Err(PRICE_INVALID.to_string()) } else { Ok(p) }),
    );
    let miles = errors.check("inv_miles", rules::int_min(&form.inv_miles, 0, MILES_INVALID));
    let color = errors.check("inv_color", rules::required(&form.inv_color, COLOR_REQUIRED));
    let classification_id = errors.check(
        "classification_id",
        rules::int(&form.classification_id, CLASSIFICATION_INVALID),
    );

    match (make, model, year, description, image, thumbnail, price, miles, color, classification_id) {
        (
            Some(inv_make),
            Some(inv_model),
            Some(inv_year),
            Some(inv_description),
            Some(inv_image),
            Some(inv_thumbnail),
            Some(inv_price),
            Some(inv_miles),
            Some(inv_color),
            Some(classification_id),
        ) => Ok(InventoryCreateDBRequest {
            inv_make,
            inv_model,
            inv_year,
            inv_description,
            inv_image,
            inv_thumbnail,
            inv_price,
            inv_miles,
            inv_color,
            classification_id,
        }),
        _ => Err(errors),
    }
}

/// Edit form: the vehicle rules plus a valid `inv_id`.
pub fn validate_vehicle_update(form: &InventoryForm) -> Validated<(InventoryId, InventoryUpdateDBRequest)> {
    let id = rules::int_min(&form.inv_id, 1, VEHICLE_ID_INVALID);
    match (id, validate_vehicle(form)) {
        (Ok(id), Ok(request)) => Ok((id, request)),
        (id, request) => {
            let mut errors = request.err().unwrap_or_default();
            if let Err(message) = id {
                errors.add("inv_id", message);
            }
            Err(errors)
        }
    }
}

pub fn validate_delete(form: &DeleteForm) -> Validated<InventoryId> {
    rules::int_min(&form.inv_id, 1, VEHICLE_ID_INVALID).map_err(|message| ValidationErrors::single("inv_id", message))
}

/// Search filters: each one optional, then the range checks across min/max pairs.
pub fn validate_search(params: &SearchParams) -> Validated<InventorySearch> {
    let mut errors = ValidationErrors::new();

    let classification_id = errors.check(
        "classification_id",
        rules::optional(&params.classification_id, |v| rules::int_min(v, 1, SEARCH_CLASSIFICATION_INVALID)),
    );
    let min_price = errors.check(
        "min_price",
        rules::optional(&params.min_price, |v| rules::decimal_min(v, Decimal::ZERO, SEARCH_MIN_PRICE_INVALID)),
    );
    let max_price = errors.check(
        "max_price",
        rules::optional(&params.max_price, |v| rules::decimal_min(v, Decimal::ZERO, SEARCH_MAX_PRICE_INVALID)),
    );
    let min_year = errors.check(
        "min_year",
        rules::optional(&params.min_year, |v| rules::int_min(v, MIN_SEARCH_YEAR, SEARCH_MIN_YEAR_INVALID)),
    );
    let max_year = errors.check(
        "max_year",
        rules::optional(&params.max_year, |v| rules::int_min(v, MIN_SEARCH_YEAR, SEARCH_MAX_YEAR_INVALID)),
    );
    let max_miles = errors.check(
        "max_miles",
        rules::optional(&params.max_miles, |v| rules::int_min(v, 0, SEARCH_MILES_INVALID)),
    );
    let q = errors.check("q", rules::max_chars(&params.q, MAX_SEARCH_TEXT, SEARCH_TEXT_TOO_LONG));

    if let (Some(Some(min)), Some(Some(max))) = (min_price, max_price)
        && min > max
    {
        errors.add("min_price", SEARCH_PRICE_RANGE);
    }
    if let (Some(Some(min)), Some(Some(max))) = (min_year, max_year)
        && min > max
    {
        errors.add("min_year", SEARCH_YEAR_RANGE);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(InventorySearch {
        classification_id: classification_id.flatten(),
        min_price: min_price.flatten(),
        max_price: max_price.flatten(),
        min_year: min_year.flatten(),
        max_year: max_year.flatten(),
        max_miles: max_miles.flatten(),
        q: q.filter(|q| !q.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{handlers::Repository, models::classifications::ClassificationCreateDBRequest};
    use sqlx::PgPool;

    fn valid_vehicle_form() -> InventoryForm {
        InventoryForm {
            inv_id: String::new(),
            inv_make: " Jeep ".to_string(),
            inv_model: "Wrangler".to_string(),
            inv_year: "2019".to_string(),
            inv_description: "Trail rated and ready for anything.".to_string(),
            inv_image: "/images/vehicles/wrangler.jpg".to_string(),
            inv_thumbnail: "/images/vehicles/wrangler-tn.jpg".to_string(),
            inv_price: "28045".to_string(),
            inv_miles: "41205".to_string(),
            inv_color: "Yellow".to_string(),
            classification_id: "3".to_string(),
        }
    }

    #[test]
    fn test_classification_rules() {
        let ok = validate_classification(&ClassificationForm {
            classification_name: " Hybrid ".to_string(),
        })
        .unwrap();
        assert_eq!(ok.classification_name, "Hybrid");

        let empty = validate_classification(&ClassificationForm::default()).unwrap_err();
        assert_eq!(empty.messages(), vec![CLASSIFICATION_REQUIRED]);

        let spaced = validate_classification(&ClassificationForm {
            classification_name: "Off Road".to_string(),
        })
        .unwrap_err();
        assert_eq!(spaced.messages(), vec![CLASSIFICATION_ALPHANUMERIC]);
    }

    #[test]
    fn test_valid_vehicle() {
        let request = validate_vehicle(&valid_vehicle_form()).unwrap();
        assert_eq!(request.inv_make, "Jeep");
        assert_eq!(request.inv_price, Decimal::from(28045));
        assert_eq!(request.inv_miles, 41205);
        assert_eq!(request.classification_id, 3);
    }

    #[test]
    fn test_vehicle_errors_are_reported_per_field_in_order() {
        let form = InventoryForm {
            inv_year: "19".to_string(),
            inv_description: "Too short".to_string(),
            inv_price: "-5".to_string(),
            inv_miles: "lots".to_string(),
            classification_id: String::new(),
            ..valid_vehicle_form()
        };
        let errors = validate_vehicle(&form).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![YEAR_INVALID, DESCRIPTION_TOO_SHORT, PRICE_INVALID, MILES_INVALID, CLASSIFICATION_INVALID]
        );
        assert!(errors.has_field("inv_year"));
        assert!(!errors.has_field("inv_make"));
    }

    #[test]
    fn test_vehicle_price_must_fit_column() {
        for price in ["10000000", "1.234", "19999.999"] {
            let form = InventoryForm {
                inv_price: price.to_string(),
                ..valid_vehicle_form()
            };
            assert_eq!(validate_vehicle(&form).unwrap_err().messages(), vec![PRICE_INVALID], "{price}");
        }

        for (price, expected) in [("9999999.99", Decimal::new(999_999_999, 2)), ("12345.50", Decimal::new(1_234_550, 2)), ("100.500", Decimal::new(10_050, 2))] {
            let form = InventoryForm {
                inv_price: price.to_string(),
                ..valid_vehicle_form()
            };
            assert_eq!(validate_vehicle(&form).unwrap().inv_price, expected, "{price}");
        }
    }

    #[test]
    fn test_vehicle_update_requires_id() {
        let missing = validate_vehicle_update(&valid_vehicle_form()).unwrap_err();
        assert_eq!(missing.messages(), vec![VEHICLE_ID_INVALID]);

        let form = InventoryForm {
            inv_id: "12".to_string(),
            ..valid_vehicle_form()
        };
        let (id, request) = validate_vehicle_update(&form).unwrap();
        assert_eq!(id, 12);
        assert_eq!(request.inv_model, "Wrangler");

        let both = validate_vehicle_update(&InventoryForm {
            inv_make: String::new(),
            ..valid_vehicle_form()
        })
        .unwrap_err();
        assert_eq!(both.messages(), vec![MAKE_REQUIRED, VEHICLE_ID_INVALID]);
    }

    #[test]
    fn test_delete_requires_integer_id() {
        let form = |id: &str| DeleteForm {
            inv_id: id.to_string(),
            ..Default::default()
        };
        assert_eq!(validate_delete(&form("7")), Ok(7));
        assert!(validate_delete(&form("seven")).is_err());
    }

    #[test]
    fn test_empty_search_has_no_filters() {
        assert_eq!(validate_search(&SearchParams::default()), Ok(InventorySearch::default()));
    }

    #[test]
    fn test_search_parses_filters() {
        let params = SearchParams {
            classification_id: "2".to_string(),
            min_price: "1000".to_string(),
            max_price: "25000.50".to_string(),
            min_year: "1886".to_string(),
            max_year: "2024".to_string(),
            max_miles: "0".to_string(),
            q: "  civic ".to_string(),
        };
        let search = validate_search(&params).unwrap();
        assert_eq!(search.classification_id, Some(2));
        assert_eq!(search.max_price, Some(Decimal::new(2500050, 2)));
        assert_eq!(search.min_year, Some(1886));
        assert_eq!(search.max_miles, Some(0));
        assert_eq!(search.q.as_deref(), Some("civic"));
    }

    #[test]
    fn test_search_field_rules() {
        let params = SearchParams {
            classification_id: "0".to_string(),
            min_year: "1885".to_string(),
            max_miles: "-1".to_string(),
            q: "x".repeat(51),
            ..Default::default()
        };
        let errors = validate_search(&params).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![SEARCH_CLASSIFICATION_INVALID, SEARCH_MIN_YEAR_INVALID, SEARCH_MILES_INVALID, SEARCH_TEXT_TOO_LONG]
        );
    }

    #[test]
    fn test_search_rejects_inverted_ranges() {
        let params = SearchParams {
            min_price: "30000".to_string(),
            max_price: "20000".to_string(),
            min_year: "2020".to_string(),
            max_year: "2010".to_string(),
            ..Default::default()
        };
        let errors = validate_search(&params).unwrap_err();
        assert_eq!(errors.messages(), vec![SEARCH_PRICE_RANGE, SEARCH_YEAR_RANGE]);

        // Equal bounds are fine
        let equal = SearchParams {
            min_price: "20000".to_string(),
            max_price: "20000".to_string(),
            ..Default::default()
        };
        assert!(validate_search(&equal).is_ok());
    }

    #[sqlx::test]
    async fn test_new_classification_must_be_unique(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        Classifications::new(&mut conn)
            .create(&ClassificationCreateDBRequest {
                classification_name: "Classic".to_string(),
            })
            .await
            .unwrap();

        let duplicate = validate_new_classification(
            &mut conn,
            &ClassificationForm {
                classification_name: "Classic".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap_err();
        assert_eq!(duplicate.messages(), vec![CLASSIFICATION_EXISTS]);

        let fresh = validate_new_classification(
            &mut conn,
            &ClassificationForm {
                classification_name: "Antique".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(fresh.is_ok());
    }
}
