//! Cabin routes — the form layer over the cabin write workflow.
//!
//! DESIGN
//! ======
//! Submissions arrive as multipart forms. Decoding settles the image into a
//! tagged `ImageRef` exactly once (file part → pending payload, text part →
//! resolved URL, absent → none); the workflow never re-inspects raw input.
//! Field validation runs before the workflow, and this module is the sole
//! point translating workflow errors into HTTP feedback. Mutations invalidate
//! the collection keys the workflow reports; reads go through the cache.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::routes::auth::AuthUser;
use crate::services::cabin::{self, CabinChanges, CabinError, CabinFields, ImageRef, NewCabin};
use crate::state::AppState;

const DEFAULT_IMAGE_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// ERROR TRANSLATION
// =============================================================================

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message.to_owned() })).into_response()
}

fn cabin_error_response(err: &CabinError) -> Response {
    match err {
        CabinError::Validation(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        CabinError::Persistence(msg) => error_response(StatusCode::BAD_GATEWAY, msg),
    }
}

#[derive(Debug, thiserror::Error)]
enum FormError {
    #[error("missing form field: {0}")]
    Missing(&'static str),
    #[error("invalid value for form field: {0}")]
    Invalid(&'static str),
    #[error("malformed multipart body: {0}")]
    Body(String),
}

// =============================================================================
// FORM DECODING
// =============================================================================

struct CabinForm {
    fields: CabinFields,
    image: Option<ImageRef>,
}

async fn read_cabin_form(mut multipart: Multipart) -> Result<CabinForm, FormError> {
    let mut name = None;
    let mut max_capacity = None;
    let mut regular_price = None;
    let mut discount = None;
    let mut description = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::Body(e.to_string()))?
    {
        let Some(field_name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "name" => name = Some(text_value(field).await?),
            "maxCapacity" => max_capacity = Some(parse_field(&text_value(field).await?, "maxCapacity")?),
            "regularPrice" => regular_price = Some(parse_field(&text_value(field).await?, "regularPrice")?),
            "discount" => discount = Some(parse_field(&text_value(field).await?, "discount")?),
            "description" => description = Some(text_value(field).await?),
            "image" => image = read_image_field(field).await?,
            _ => {}
        }
    }

    Ok(CabinForm {
        fields: CabinFields {
            name: name.ok_or(FormError::Missing("name"))?,
            max_capacity: max_capacity.ok_or(FormError::Missing("maxCapacity"))?,
            regular_price: regular_price.ok_or(FormError::Missing("regularPrice"))?,
            discount: discount.unwrap_or(0.0),
            description: description.unwrap_or_default(),
        },
        image,
    })
}

/// Decide the image variant once, at the form boundary: a file part becomes a
/// pending payload, a text part a resolved URL, and anything empty is absent.
async fn read_image_field(field: Field<'_>) -> Result<Option<ImageRef>, FormError> {
    if let Some(file_name) = field.file_name().map(ToOwned::to_owned) {
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE)
            .to_owned();
        let payload = field
            .bytes()
            .await
            .map_err(|e| FormError::Body(e.to_string()))?
            .to_vec();
        // Browsers submit an empty file part when no photo was chosen.
        if file_name.is_empty() || payload.is_empty() {
            return Ok(None);
        }
        return Ok(Some(ImageRef::Pending { file_name, content_type, payload }));
    }

    let url = text_value(field).await?;
    if url.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(ImageRef::Resolved { url }))
    }
}

async fn text_value(field: Field<'_>) -> Result<String, FormError> {
    field.text().await.map_err(|e| FormError::Body(e.to_string()))
}

fn parse_field<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, FormError> {
    raw.trim().parse().map_err(|_| FormError::Invalid(field))
}

fn validate_fields(fields: &CabinFields) -> Result<(), &'static str> {
    if fields.name.trim().is_empty() {
        return Err("cabin name is required");
    }
    if fields.max_capacity < 1 {
        return Err("maximum capacity must be at least 1");
    }
    if fields.regular_price <= 0.0 {
        return Err("regular price must be positive");
    }
    if fields.discount < 0.0 {
        return Err("discount cannot be negative");
    }
    if fields.discount >= fields.regular_price {
        return Err("discount must be less than the regular price");
    }
    Ok(())
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/cabins` — list cabins, served from cache when warm.
pub async fn list_cabins(_auth: AuthUser, State(state): State<AppState>) -> Response {
    if let Some(cached) = state.cache.get(cabin::CABINS_KEY).await {
        return Json(cached).into_response();
    }

    match cabin::list_cabins(state.tables.as_ref()).await {
        Ok(cabins) => match serde_json::to_value(&cabins) {
            Ok(payload) => {
                state.cache.put(cabin::CABINS_KEY, payload.clone()).await;
                Json(payload).into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "cabin list serialization failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "cabins could not be loaded")
            }
        },
        Err(e) => cabin_error_response(&e),
    }
}

/// `POST /api/cabins` — create a cabin from a multipart form.
pub async fn create_cabin(
    _auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let form = match read_cabin_form(multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    if let Err(msg) = validate_fields(&form.fields) {
        return error_response(StatusCode::BAD_REQUEST, msg);
    }

    let new = NewCabin { fields: form.fields, image: form.image };
    match cabin::create_cabin(state.tables.as_ref(), state.files.as_ref(), &state.image_bucket, new).await {
        Ok(write) => {
            for key in write.invalidates {
                state.cache.invalidate(key).await;
            }
            (StatusCode::CREATED, Json(write.cabin)).into_response()
        }
        Err(e) => cabin_error_response(&e),
    }
}

/// `PATCH /api/cabins/{id}` — update a cabin from a multipart form.
pub async fn update_cabin(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let form = match read_cabin_form(multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    if let Err(msg) = validate_fields(&form.fields) {
        return error_response(StatusCode::BAD_REQUEST, msg);
    }

    let changes = CabinChanges { fields: form.fields, image: form.image };
    match cabin::update_cabin(state.tables.as_ref(), state.files.as_ref(), &state.image_bucket, id, changes)
        .await
    {
        Ok(write) => {
            for key in write.invalidates {
                state.cache.invalidate(key).await;
            }
            Json(write.cabin).into_response()
        }
        Err(e) => cabin_error_response(&e),
    }
}

/// `DELETE /api/cabins/{id}` — delete a cabin record.
pub async fn delete_cabin(_auth: AuthUser, State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match cabin::delete_cabin(state.tables.as_ref(), id).await {
        Ok(invalidates) => {
            for key in invalidates {
                state.cache.invalidate(key).await;
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => cabin_error_response(&e),
    }
}

#[cfg(test)]
#[path = "cabins_test.rs"]
mod tests;
