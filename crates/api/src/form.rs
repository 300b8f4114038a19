//! Multipart intake for create/update requests.
//!
//! A request body is drained once into [`FormPayload`]: text parts become
//! named fields, parts carrying a file name become [`UploadedFile`]s. Empty
//! file parts (a browser submitting an untouched file input) are dropped
//! here so nothing downstream has to special-case them.

use std::collections::HashMap;

use axum::extract::Multipart;
use showroom_core::error::CoreError;
use showroom_core::media::UploadedFile;

use crate::error::{AppError, AppResult};

/// Buffered multipart body.
#[derive(Debug, Default)]
pub struct FormPayload {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl FormPayload {
    /// Drain every part of `multipart`.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut payload = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if data.is_empty() {
                    tracing::debug!(field = %name, "Skipping empty file part");
                    continue;
                }
                payload.files.push(UploadedFile {
                    field_name: name,
                    file_name: Some(file_name),
                    content_type,
                    data: data.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                payload.fields.insert(name, value);
            }
        }

        Ok(payload)
    }

    /// Raw value of a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Trimmed value of a text field, if present. An empty string is kept so
    /// updates can clear an optional field.
    pub fn trimmed(&self, name: &str) -> Option<String> {
        self.text(name).map(|v| v.trim().to_string())
    }

    /// Trimmed, non-empty value; `None` when absent or blank.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.trimmed(name).filter(|v| !v.is_empty())
    }

    /// Trimmed, non-empty value or a validation error naming the field.
    pub fn required(&self, name: &str) -> AppResult<String> {
        self.non_empty(name)
            .ok_or_else(|| AppError::Core(CoreError::Validation(format!("{name} is required"))))
    }

    /// Like [`required`](Self::required), but only when the field is present.
    /// Used by updates: omitting a field keeps it, blanking it is an error.
    pub fn required_if_present(&self, name: &str) -> AppResult<Option<String>> {
        match self.text(name) {
            None => Ok(None),
            Some(_) => self.required(name).map(Some),
        }
    }

    /// Parse a checkbox-style boolean (`true/false`, `1/0`, `on/off`).
    pub fn bool(&self, name: &str) -> AppResult<Option<bool>> {
        let Some(raw) = self.non_empty(name) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(Some(true)),
            "false" | "0" | "off" | "no" => Ok(Some(false)),
            _ => Err(AppError::Core(CoreError::Validation(format!(
                "{name} must be a boolean, got '{raw}'"
            )))),
        }
    }

    /// Parse a star rating in `1..=5`.
    pub fn rating(&self, name: &str) -> AppResult<Option<i16>> {
        let Some(raw) = self.non_empty(name) else {
            return Ok(None);
        };
        match raw.parse::<i16>() {
            Ok(r) if (1..=5).contains(&r) => Ok(Some(r)),
            _ => Err(AppError::Core(CoreError::Validation(format!(
                "{name} must be an integer between 1 and 5"
            )))),
        }
    }

    /// Hand over the buffered file parts.
    pub fn take_files(&mut self) -> Vec<UploadedFile> {
        std::mem::take(&mut self.files)
    }
}

#[cfg(test)]
impl FormPayload {
    pub(crate) fn with_fields<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: Vec::new(),
        }
    }
}
