//! Binding uploaded files to slots of nested JSON arrays.
//!
//! A multipart create/update request carries array fields as JSON strings
//! (`sections`, `subProducts`) plus file parts whose names address a slot in
//! one of those arrays (`sectionImage_2`). The mapping from array field to
//! file-field prefix is declared once in [`NESTED_BINDINGS`]; every file part
//! is classified against it exactly once, at the request boundary.
//!
//! Nested structure is handled leniently: an unparsable array falls back to
//! the stored value (or empty on create), and files addressing a slot that
//! does not exist are dropped with a warning. The server never adds or removes
//! elements; it only fills in `image` on elements the client sent.

use std::collections::HashSet;

use serde::de::DeserializeOwned;

use crate::collection::Collection;
use crate::content::ImageSlot;
use crate::error::CoreError;
use crate::media::{MediaChangeSet, MediaStore, UploadedFile};

/// Declared mapping from an array field to the file-field prefix addressing
/// its elements (`<prefix><index>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedArrayBinding {
    pub collection: Collection,
    pub array_field: &'static str,
    pub file_prefix: &'static str,
}

pub const SUB_PRODUCTS: NestedArrayBinding = NestedArrayBinding {
    collection: Collection::Services,
    array_field: "subProducts",
    file_prefix: "subProductImage_",
};

pub const SECTIONS: NestedArrayBinding = NestedArrayBinding {
    collection: Collection::Services,
    array_field: "sections",
    file_prefix: "sectionImage_",
};

/// Every nested array that accepts file uploads.
pub const NESTED_BINDINGS: &[NestedArrayBinding] = &[SUB_PRODUCTS, SECTIONS];

/// Nested bindings declared for one collection.
pub fn nested_bindings(collection: Collection) -> impl Iterator<Item = &'static NestedArrayBinding> {
    NESTED_BINDINGS
        .iter()
        .filter(move |b| b.collection == collection)
}

/// Where a file part should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTarget {
    /// The collection's top-level image field.
    Flat,
    Nested {
        array_field: &'static str,
        index: usize,
    },
    Unmatched,
}

/// Classify a multipart field name for `collection`.
///
/// Negative or non-numeric indices (`sectionImage_-1`, `sectionImage_x`) are
/// `Unmatched`.
pub fn classify(collection: Collection, field_name: &str) -> FileTarget {
    if field_name == collection.flat_image_field() {
        return FileTarget::Flat;
    }
    for binding in nested_bindings(collection) {
        if let Some(suffix) = field_name.strip_prefix(binding.file_prefix) {
            return match parse_index(suffix) {
                Some(index) => FileTarget::Nested {
                    array_field: binding.array_field,
                    index,
                },
                None => FileTarget::Unmatched,
            };
        }
    }
    FileTarget::Unmatched
}

fn parse_index(suffix: &str) -> Option<usize> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// A file addressed to one slot of a nested array.
#[derive(Debug, Clone)]
pub struct NestedUpload {
    pub array_field: &'static str,
    pub index: usize,
    pub file: UploadedFile,
}

/// The file parts of one request, sorted by target.
#[derive(Debug, Default)]
pub struct UploadSet {
    pub flat: Option<UploadedFile>,
    pub nested: Vec<NestedUpload>,
    /// Field names that matched nothing.
    pub ignored: Vec<String>,
}

impl UploadSet {
    pub fn classify(collection: Collection, files: Vec<UploadedFile>) -> Self {
        let mut set = Self::default();
        for file in files {
            match classify(collection, &file.field_name) {
                FileTarget::Flat => {
                    if set.flat.is_some() {
                        tracing::warn!(
                            %collection,
                            field = %file.field_name,
                            "Duplicate image part, keeping the last one",
                        );
                    }
                    set.flat = Some(file);
                }
                FileTarget::Nested { array_field, index } => {
                    set.nested.push(NestedUpload {
                        array_field,
                        index,
                        file,
                    });
                }
                FileTarget::Unmatched => {
                    tracing::warn!(
                        %collection,
                        field = %file.field_name,
                        "Ignoring file part with unrecognised field name",
                    );
                    set.ignored.push(file.field_name);
                }
            }
        }
        set
    }

    /// Remove and return the uploads addressed to `array_field`.
    pub fn take_nested(&mut self, array_field: &str) -> Vec<NestedUpload> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.nested)
            .into_iter()
            .partition(|u| u.array_field == array_field);
        self.nested = rest;
        taken
    }
}

/// Parse a JSON-string array field, falling back on absence or parse error.
///
/// Never fails: a malformed payload yields `fallback`.
pub fn parse_array_field<T: DeserializeOwned>(
    field: &str,
    raw: Option<&str>,
    fallback: Vec<T>,
) -> Vec<T> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return fallback;
    };
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(field, error = %e, "Malformed array field, keeping previous value");
            fallback
        }
    }
}

/// Clear `image` on any element naming a path the entity did not already
/// reference. Clients may echo back stored paths, but cannot introduce new
/// ones except by uploading.
pub fn sanitize_references<T: ImageSlot>(items: &mut [T], known: &HashSet<String>) {
    for (index, item) in items.iter_mut().enumerate() {
        if let Some(path) = item.image() {
            if !known.contains(path) {
                tracing::warn!(index, path, "Dropping unknown image reference from payload");
                item.set_image(None);
            }
        }
    }
}

/// Outcome of binding one path to one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindResult {
    Attached { replaced: Option<String> },
    OutOfRange { len: usize },
}

/// Set `items[index].image = path`, reporting the previous value.
pub fn bind_image<T: ImageSlot>(items: &mut [T], index: usize, path: String) -> BindResult {
    match items.get_mut(index) {
        Some(item) => {
            let replaced = item.image().map(str::to_string);
            item.set_image(Some(path));
            BindResult::Attached { replaced }
        }
        None => BindResult::OutOfRange { len: items.len() },
    }
}

/// Merges uploads into nested arrays of one collection.
pub struct NestedMediaBinder<'a> {
    store: &'a MediaStore,
    collection: Collection,
}

impl<'a> NestedMediaBinder<'a> {
    pub fn new(store: &'a MediaStore, collection: Collection) -> Self {
        Self { store, collection }
    }

    /// Produce the array to persist for `binding`.
    ///
    /// `raw` is the submitted JSON string (if any) and `current` the stored
    /// array (empty on create). Files are written only for in-range slots;
    /// replaced paths are recorded in `changes` and deleted only when the
    /// caller commits after persisting.
    pub async fn merge<T: DeserializeOwned + ImageSlot>(
        &self,
        binding: &NestedArrayBinding,
        raw: Option<&str>,
        current: Vec<T>,
        uploads: Vec<NestedUpload>,
        changes: &mut MediaChangeSet,
    ) -> Result<Vec<T>, CoreError> {
        let known: HashSet<String> = current
            .iter()
            .filter_map(|i| i.image().map(str::to_string))
            .collect();

        let mut items = parse_array_field(binding.array_field, raw, current);
        sanitize_references(&mut items, &known);

        for upload in uploads {
            if upload.index >= items.len() {
                tracing::warn!(
                    collection = %self.collection,
                    field = %upload.file.field_name,
                    index = upload.index,
                    len = items.len(),
                    "File addresses a missing array slot, ignoring",
                );
                continue;
            }

            let path = self.store.store(self.collection, &upload.file).await?;
            changes.record_stored(path.clone());

            if let BindResult::Attached { replaced } = bind_image(&mut items, upload.index, path) {
                if let Some(old) = replaced {
                    changes.orphan(old);
                }
            }
        }

        Ok(items)
    }
}
