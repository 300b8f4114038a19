//! Request handlers for the ordered collections.
//!
//! Each submodule provides async handler functions (list, get_by_id, create,
//! update, delete) for one collection; [`reorder`] holds the bulk order
//! endpoint shared by all three. Handlers delegate to the repositories in
//! `showroom_db` and map errors via [`AppError`](crate::error::AppError).
//!
//! Create and update run their body against a [`MediaChangeSet`] and hand the
//! outcome to [`settle`], which deletes replaced files only after the write
//! succeeded and removes freshly stored files if it failed.

pub mod gallery;
pub mod reorder;
pub mod services;
pub mod testimonials;

use std::collections::HashSet;

use showroom_core::collection::Collection;
use showroom_core::error::CoreError;
use showroom_core::media::{MediaChangeSet, MediaOwner, MediaStore};
use showroom_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Resolve a request's media changes against the result of its write.
///
/// `previous` holds the paths the entity referenced before the request
/// (empty on create). On success, every previous path the persisted entity no
/// longer references is deleted in the background.
pub(crate) fn settle<T: MediaOwner>(
    store: &MediaStore,
    mut changes: MediaChangeSet,
    previous: &[String],
    result: AppResult<T>,
) -> AppResult<T> {
    match result {
        Ok(entity) => {
            {
                let live: HashSet<&str> = entity.media_paths().into_iter().collect();
                changes.retire_unreferenced(previous.iter().map(String::as_str), &live);
                changes.commit(store, &live);
            }
            Ok(entity)
        }
        Err(e) => {
            changes.discard(store);
            Err(e)
        }
    }
}

/// Explain a version-checked update that matched no row: the row was
/// deleted (404) or another request wrote it after it was read (409).
pub(crate) fn missed_update(collection: Collection, id: DbId, still_exists: bool) -> AppError {
    if still_exists {
        AppError::Core(CoreError::Conflict(format!(
            "{} {id} was modified by another request; reload and retry",
            collection.entity_name()
        )))
    } else {
        AppError::Core(CoreError::NotFound {
            entity: collection.entity_name(),
            id,
        })
    }
}
