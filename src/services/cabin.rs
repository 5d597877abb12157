//! Cabin write workflow — create/update/delete/list with image resolution.
//!
//! DESIGN
//! ======
//! A persisted cabin always carries a resolved image URL, never a raw file
//! payload; resolving that reference is this module's whole job. Create is a
//! two-phase write (insert record, then upload image) with a compensating
//! delete when the upload fails, approximating atomicity across two
//! non-transactional backend calls. Update uploads first and only then
//! touches the record, so a failed upload mutates nothing.
//!
//! ERROR HANDLING
//! ==============
//! Two kinds suffice: `Validation` (unusable image reference, caught before
//! any backend call) and `Persistence` (the backend rejected a read/write/
//! upload), each with a fixed message per operation. Backend detail goes to
//! the log at the conversion site. The one recovery point is the compensating
//! delete; its own failure is logged distinctly and swallowed so it never
//! masks the primary upload error. No retries anywhere: a failed attempt is
//! terminal and the user resubmits.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::cache::CollectionKey;
use crate::store::{FileStore, TableStore};

pub const CABINS_TABLE: &str = "cabins";

/// Collection key invalidated by every cabin write.
pub const CABINS_KEY: CollectionKey = "cabins";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CabinError {
    /// The caller supplied an unusable image reference.
    #[error("{0}")]
    Validation(&'static str),
    /// The backend rejected the read, write, or upload.
    #[error("{0}")]
    Persistence(&'static str),
}

/// Cabin row as stored by the hosted backend. Column names are camelCase to
/// match the hosted schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cabin {
    pub id: i64,
    pub name: String,
    pub max_capacity: i32,
    pub regular_price: f64,
    pub discount: f64,
    pub description: String,
    /// Always a resolved public URL on a persisted row.
    pub image: String,
}

/// Image reference as decided once at the form boundary: either a local file
/// payload still awaiting upload, or a URL that is already durable.
#[derive(Debug, Clone)]
pub enum ImageRef {
    Pending { file_name: String, content_type: String, payload: Vec<u8> },
    Resolved { url: String },
}

/// Scalar cabin fields shared by create and update submissions.
#[derive(Debug, Clone)]
pub struct CabinFields {
    pub name: String,
    pub max_capacity: i32,
    pub regular_price: f64,
    pub discount: f64,
    pub description: String,
}

#[derive(Debug)]
pub struct NewCabin {
    pub fields: CabinFields,
    pub image: Option<ImageRef>,
}

#[derive(Debug)]
pub struct CabinChanges {
    pub fields: CabinFields,
    pub image: Option<ImageRef>,
}

/// Result of a successful write: the stored row plus the collection keys the
/// caller must invalidate before the UI re-fetches.
#[derive(Debug)]
pub struct CabinWrite {
    pub cabin: Cabin,
    pub invalidates: Vec<CollectionKey>,
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create a cabin record together with its image upload.
///
/// Insert first, upload second; a failed upload triggers a best-effort
/// compensating delete of the just-inserted row so no record is left pointing
/// at an unresolvable image.
///
/// # Errors
///
/// `Validation` if no file payload was supplied; `Persistence` if the insert
/// or the upload fails.
pub async fn create_cabin(
    tables: &dyn TableStore,
    files: &dyn FileStore,
    bucket: &str,
    new: NewCabin,
) -> Result<CabinWrite, CabinError> {
    let Some(ImageRef::Pending { file_name, content_type, payload }) = new.image else {
        return Err(CabinError::Validation("cabin image must be provided"));
    };

    let object_name = storage_object_name(&file_name);
    let image_url = files.public_url(bucket, &object_name);

    let row = cabin_row(&new.fields, &image_url)?;
    let inserted = tables.insert_returning(CABINS_TABLE, row).await.map_err(|e| {
        tracing::error!(error = %e, "cabin insert failed");
        CabinError::Persistence("cabin could not be created")
    })?;
    let cabin = parse_cabin(inserted, "cabin could not be created")?;

    if let Err(e) = files.upload(bucket, &object_name, &content_type, payload).await {
        tracing::error!(error = %e, cabin_id = cabin.id, "cabin image upload failed; rolling back insert");
        if let Err(del) = tables.delete_row(CABINS_TABLE, cabin.id).await {
            // Secondary failure: the orphan row survived the rollback. Logged
            // distinctly from the upload error, which stays the surfaced one.
            tracing::error!(error = %del, cabin_id = cabin.id, "compensating delete failed; orphan cabin row remains");
        }
        return Err(CabinError::Persistence(
            "cabin image could not be uploaded and the cabin was not created",
        ));
    }

    Ok(CabinWrite { cabin, invalidates: vec![CABINS_KEY] })
}

/// Update an existing cabin, optionally replacing its image.
///
/// A new file payload is uploaded before the record is touched; an unchanged
/// image arrives as a resolved URL and causes no upload at all.
///
/// # Errors
///
/// `Validation` if the image is neither a file nor a URL; `Persistence` if
/// the upload or the record update fails.
pub async fn update_cabin(
    tables: &dyn TableStore,
    files: &dyn FileStore,
    bucket: &str,
    id: i64,
    changes: CabinChanges,
) -> Result<CabinWrite, CabinError> {
    let image_url = match changes.image {
        Some(ImageRef::Pending { file_name, content_type, payload }) => {
            let object_name = storage_object_name(&file_name);
            files.upload(bucket, &object_name, &content_type, payload).await.map_err(|e| {
                tracing::error!(error = %e, cabin_id = id, "cabin image upload failed");
                CabinError::Persistence("cabin image could not be uploaded")
            })?;
            files.public_url(bucket, &object_name)
        }
        Some(ImageRef::Resolved { url }) => url,
        None => return Err(CabinError::Validation("cabin image path must be provided or uploaded")),
    };

    let row = cabin_row(&changes.fields, &image_url)?;
    let updated = tables.update_returning(CABINS_TABLE, id, row).await.map_err(|e| {
        tracing::error!(error = %e, cabin_id = id, "cabin update failed");
        CabinError::Persistence("cabin could not be updated")
    })?;

    Ok(CabinWrite {
        cabin: parse_cabin(updated, "cabin could not be updated")?,
        invalidates: vec![CABINS_KEY],
    })
}

/// Delete a cabin record. The stored image is left behind (acknowledged gap:
/// storage reclamation would need a listing of still-referenced objects).
///
/// # Errors
///
/// `Persistence` if the backend rejects the delete.
pub async fn delete_cabin(tables: &dyn TableStore, id: i64) -> Result<Vec<CollectionKey>, CabinError> {
    tables.delete_row(CABINS_TABLE, id).await.map_err(|e| {
        tracing::error!(error = %e, cabin_id = id, "cabin delete failed");
        CabinError::Persistence("cabin could not be deleted")
    })?;
    Ok(vec![CABINS_KEY])
}

/// List all cabins.
///
/// # Errors
///
/// `Persistence` if the backend rejects the read.
pub async fn list_cabins(tables: &dyn TableStore) -> Result<Vec<Cabin>, CabinError> {
    let rows = tables.select_all(CABINS_TABLE).await.map_err(|e| {
        tracing::error!(error = %e, "cabin list failed");
        CabinError::Persistence("cabins could not be loaded")
    })?;

    rows.into_iter()
        .map(|row| parse_cabin(row, "cabins could not be loaded"))
        .collect()
}

// =============================================================================
// HELPERS
// =============================================================================

/// Wire shape of a cabin write; the backend assigns the id.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CabinRecord<'a> {
    name: &'a str,
    max_capacity: i32,
    regular_price: f64,
    discount: f64,
    description: &'a str,
    image: &'a str,
}

fn cabin_row(fields: &CabinFields, image_url: &str) -> Result<Value, CabinError> {
    serde_json::to_value(CabinRecord {
        name: &fields.name,
        max_capacity: fields.max_capacity,
        regular_price: fields.regular_price,
        discount: fields.discount,
        description: &fields.description,
        image: image_url,
    })
    .map_err(|e| {
        tracing::error!(error = %e, "cabin row serialization failed");
        CabinError::Persistence("cabin could not be saved")
    })
}

fn parse_cabin(row: Value, message: &'static str) -> Result<Cabin, CabinError> {
    serde_json::from_value(row).map_err(|e| {
        tracing::error!(error = %e, "cabin row parse failed");
        CabinError::Persistence(message)
    })
}

/// Collision-resistant storage object name: random prefix plus the sanitized
/// original filename. Path separators can never survive sanitization.
fn storage_object_name(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{}-{sanitized}", Uuid::new_v4())
}

#[cfg(test)]
#[path = "cabin_test.rs"]
mod tests;
