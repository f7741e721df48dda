//! Inventory pages: browsing by classification, vehicle detail, the management area and
//! the advanced search.
//!
//! Mutations follow one shape. Validation failures re-render the submitted form with its
//! errors. A mutation the database refuses (constraint violation, vanished row) re-renders
//! the form with a failure notice. Anything else goes to the error page.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
};
use tracing::{error, instrument, warn};

use crate::{
    AppState,
    api::models::inventory::{ClassificationForm, DeleteForm, InventoryForm, InventoryResponse, SearchParams},
    db::{
        errors::DbError,
        handlers::{Classifications, Inventory, Repository},
        models::inventory::{InventoryDBResponse, InventorySearch},
    },
    errors::{Error, Result},
    types::parse_id,
    validation::inventory::{
        validate_delete, validate_new_classification, validate_search, validate_vehicle, validate_vehicle_update,
    },
    views::{Page, Site},
};

pub const NO_VEHICLES: &str = "Sorry, no matching vehicles could be found.";

fn management_page(site: &Site) -> Page {
    site.page("inventory/management.html", "Inventory Management")
        .with("classification_options", site.classification_options(None))
}

fn add_classification_page(site: &Site, form: &ClassificationForm) -> Page {
    site.page("inventory/add-classification.html", "Add Classification").with("form", form)
}

fn add_inventory_page(site: &Site, form: &InventoryForm) -> Page {
    site.page("inventory/add-inventory.html", "Add Inventory")
        .with("form", form)
        .with("classification_options", site.classification_options(form.selected_classification()))
}

fn edit_inventory_page(site: &Site, form: &InventoryForm) -> Page {
    site.page(
        "inventory/edit-inventory.html",
        format!("Edit {} {}", form.inv_make.trim(), form.inv_model.trim()),
    )
    .with("form", form)
    .with("classification_options", site.classification_options(form.selected_classification()))
}

fn delete_inventory_page(site: &Site, form: &DeleteForm) -> Page {
    site.page(
        "inventory/delete-confirm.html",
        format!("Delete {} {}", form.inv_make.trim(), form.inv_model.trim()),
    )
    .with("form", form)
}

/// Splits a mutation outcome into success, a soft failure to report on the form, or a
/// hard error for the error page.
fn soft<T>(result: std::result::Result<T, DbError>, operation: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_constraint_violation() => {
            warn!("Failed to {operation}: {e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

async fn vehicle_or_404(state: &AppState, raw_id: &str) -> Result<InventoryDBResponse> {
    let id = parse_id(raw_id).ok_or_else(|| Error::not_found("Vehicle", raw_id))?;
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    Inventory::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("Vehicle", id))
}

#[instrument(skip_all)]
pub async fn build_management(site: Site) -> Page {
    management_page(&site)
}

#[instrument(skip_all, fields(classification_id = %classification_id))]
pub async fn build_by_classification(
    site: Site,
    State(state): State<AppState>,
    Path(classification_id): Path<String>,
) -> Result<Page> {
    let id = parse_id(&classification_id).ok_or_else(|| Error::not_found("Classification", &classification_id))?;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let classification = Classifications::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("Classification", id))?;
    let vehicles = Inventory::new(&mut conn).list_by_classification(id).await?;

    let mut page = site
        .page(
            "inventory/classification.html",
            format!("{} vehicles", classification.classification_name),
        )
        .with("vehicles", &vehicles);
    if vehicles.is_empty() {
        page = page.notice(NO_VEHICLES);
    }
    Ok(page)
}

#[instrument(skip_all, fields(inv_id = %inv_id))]
pub async fn build_detail(site: Site, State(state): State<AppState>, Path(inv_id): Path<String>) -> Result<Page> {
    let vehicle = vehicle_or_404(&state, &inv_id).await?;
    Ok(site.page("inventory/detail.html", vehicle.display_name()).with("vehicle", &vehicle))
}

/// Always fails, to exercise the error page.
#[instrument]
pub async fn trigger_error() -> Result<Page> {
    Err(anyhow::anyhow!("Intentional test error triggered").into())
}

#[instrument(skip_all)]
pub async fn build_add_classification(site: Site) -> Page {
    add_classification_page(&site, &ClassificationForm::default())
}

#[instrument(skip_all)]
pub async fn add_classification(
    mut site: Site,
    State(state): State<AppState>,
    Form(form): Form<ClassificationForm>,
) -> Result<Page> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    let request = match validate_new_classification(&mut conn, &form).await? {
        Ok(request) => request,
        Err(errors) => return Ok(add_classification_page(&site, &form).errors(&errors)),
    };

    let created = soft(Classifications::new(&mut conn).create(&request).await, "add classification")?;
    match created {
        Some(created) => {
            site.refresh(&mut conn).await?;
            Ok(management_page(&site).notice(format!("Success: {} added.", created.classification_name)))
        }
        None => Ok(add_classification_page(&site, &form).notice("Sorry, adding classification failed.")),
    }
}

#[instrument(skip_all)]
pub async fn build_add_inventory(site: Site) -> Page {
    add_inventory_page(&site, &InventoryForm::blank())
}

#[instrument(skip_all)]
pub async fn add_inventory(site: Site, State(state): State<AppState>, Form(form): Form<InventoryForm>) -> Result<Page> {
    let request = match validate_vehicle(&form) {
        Ok(request) => request,
        Err(errors) => return Ok(add_inventory_page(&site, &form).errors(&errors)),
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    match soft(Inventory::new(&mut conn).create(&request).await, "add vehicle")? {
        Some(vehicle) => Ok(management_page(&site).notice(format!("Success: {} added.", vehicle.display_name()))),
        None => Ok(add_inventory_page(&site, &form).notice("Sorry, adding vehicle failed.")),
    }
}

/// Vehicles in a classification as JSON, for the management page's inventory table.
#[instrument(skip_all, fields(classification_id = %classification_id))]
pub async fn get_inventory_json(
    State(state): State<AppState>,
    Path(classification_id): Path<String>,
) -> Result<Json<Vec<InventoryResponse>>> {
    let id = parse_id(&classification_id).ok_or_else(|| Error::not_found("Inventory", &classification_id))?;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let vehicles = Inventory::new(&mut conn).list_by_classification(id).await?;
    if vehicles.is_empty() {
        return Err(Error::not_found("Inventory", id));
    }

    Ok(Json(vehicles.into_iter().map(InventoryResponse::from).collect()))
}

#[instrument(skip_all, fields(inv_id = %inv_id))]
pub async fn build_edit_inventory(site: Site, State(state): State<AppState>, Path(inv_id): Path<String>) -> Result<Page> {
    let vehicle = vehicle_or_404(&state, &inv_id).await?;
    Ok(edit_inventory_page(&site, &InventoryForm::from(&vehicle)))
}

#[instrument(skip_all)]
pub async fn update_inventory(site: Site, State(state): State<AppState>, Form(form): Form<InventoryForm>) -> Result<Page> {
    let (id, request) = match validate_vehicle_update(&form) {
        Ok(valid) => valid,
        Err(errors) => return Ok(edit_inventory_page(&site, &form).errors(&errors)),
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    match soft(Inventory::new(&mut conn).update(id, &request).await, "update vehicle")? {
        Some(vehicle) => Ok(management_page(&site).notice(format!("Success: {} updated.", vehicle.display_name()))),
        None => Ok(edit_inventory_page(&site, &form).notice("Sorry, updating vehicle failed.")),
    }
}

#[instrument(skip_all, fields(inv_id = %inv_id))]
pub async fn build_delete_inventory(site: Site, State(state): State<AppState>, Path(inv_id): Path<String>) -> Result<Page> {
    let vehicle = vehicle_or_404(&state, &inv_id).await?;
    Ok(delete_inventory_page(&site, &DeleteForm::from(&vehicle)))
}

#[instrument(skip_all)]
pub async fn delete_inventory(site: Site, State(state): State<AppState>, Form(form): Form<DeleteForm>) -> Result<Page> {
    let id = match validate_delete(&form) {
        Ok(id) => id,
        // Without a usable id there is no vehicle to confirm against
        Err(errors) => return Ok(management_page(&site).errors(&errors)),
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    match soft(Inventory::new(&mut conn).delete(id).await, "delete vehicle")?.flatten() {
        Some(vehicle) => Ok(management_page(&site).notice(format!("Success: {} deleted.", vehicle.display_name()))),
        None => Ok(delete_inventory_page(&site, &form).notice("Sorry, deleting vehicle failed.")),
    }
}

async fn run_search(state: &AppState, filter: &InventorySearch) -> std::result::Result<Vec<InventoryDBResponse>, DbError> {
    let mut conn = state.db.acquire().await?;
    Inventory::new(&mut conn).search(filter).await
}

/// Advanced search. A blank form lists the newest vehicles; a failing query is logged
/// and shown as an empty result rather than an error page.
#[instrument(skip_all)]
pub async fn search_inventory(site: Site, State(state): State<AppState>, Query(params): Query<SearchParams>) -> Page {
    let page = site
        .page("inventory/search.html", "Search Inventory")
        .with("params", &params)
        .with("filtered", params.is_submitted())
        .with("classification_options", site.classification_options(parse_id(&params.classification_id)));

    let filter = match validate_search(&params) {
        Ok(filter) => filter,
        Err(errors) => return page.errors(&errors).with("vehicles", Vec::<InventoryDBResponse>::new()),
    };

    let vehicles = run_search(&state, &filter).await.unwrap_or_else(|e| {
        error!("Inventory search failed: {e:#}");
        Vec::new()
    });

    let page = if vehicles.is_empty() { page.notice(NO_VEHICLES) } else { page };
    page.with("vehicles", &vehicles)
}
