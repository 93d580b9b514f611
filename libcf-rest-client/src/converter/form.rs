// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Form data: `application/x-www-form-urlencoded` and `multipart/form-data`.

use bytes::Bytes;
use mime::Mime;
use reqwest::multipart::{Form, Part};

use super::{EncodedBody, MessageConverter, Payload, TextConverter};
use crate::RestError;

/// A single named form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: Payload,
}

/// Ordered form fields. Duplicate names are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(name, Payload::Text(value.into()))
    }

    /// Append a field with any payload.
    pub fn part(mut self, name: impl Into<String>, value: Payload) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value,
        });
        self
    }

    /// The fields in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// The first text value for `name`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            Payload::Text(value) if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    fn is_all_text(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part.value, Payload::Text(_)))
    }
}

/// Converter for [`Payload::Form`].
///
/// Parts of a multipart body are written by the first matching part
/// converter.
#[derive(Debug, Clone, PartialEq)]
pub struct FormConverter {
    part_converters: Vec<MessageConverter>,
}

impl Default for FormConverter {
    /// Text parts as `application/json` without a charset, then resources,
    /// then application uploads.
    fn default() -> Self {
        Self::new(vec![
            MessageConverter::Text(TextConverter::json_part()),
            MessageConverter::Resource,
            MessageConverter::UploadPayload,
        ])
    }
}

impl FormConverter {
    /// A form converter with the given part converters.
    pub fn new(part_converters: Vec<MessageConverter>) -> Self {
        Self { part_converters }
    }

    /// The part converters in precedence order.
    pub fn part_converters(&self) -> &[MessageConverter] {
        &self.part_converters
    }

    pub(super) fn write(
        &self,
        form: &MultipartForm,
        media_type: Option<&Mime>,
    ) -> Result<EncodedBody, RestError> {
        let multipart = match media_type {
            Some(m) if m.type_() == mime::MULTIPART => true,
            Some(m) if m.subtype() == mime::WWW_FORM_URLENCODED => false,
            _ => !form.is_all_text(),
        };
        if multipart {
            self.write_multipart(form).map(EncodedBody::Multipart)
        } else {
            write_urlencoded(form)
        }
    }

    fn write_multipart(&self, form: &MultipartForm) -> Result<Form, RestError> {
        form.parts().iter().try_fold(Form::new(), |multipart, part| {
            Ok(multipart.part(part.name.clone(), self.write_part(part)?))
        })
    }

    fn write_part(&self, part: &FormPart) -> Result<Part, RestError> {
        let converter = self
            .part_converters
            .iter()
            .find(|c| c.can_write(&part.value, None))
            .ok_or_else(|| {
                RestError::Conversion(format!(
                    "no part converter can write form field '{}' ({})",
                    part.name,
                    part.value.kind()
                ))
            })?;
        let EncodedBody::Bytes { content_type, data } = converter.write(&part.value, None)? else {
            return Err(RestError::Conversion(format!(
                "form field '{}' cannot hold a nested multipart form",
                part.name
            )));
        };

        let mut encoded = Part::bytes(data.to_vec())
            .mime_str(&content_type)
            .map_err(|e| RestError::Conversion(e.to_string()))?;
        if let Some(filename) = part_filename(&part.value) {
            encoded = encoded.file_name(filename.to_owned());
        }
        Ok(encoded)
    }

    pub(super) fn read(data: &Bytes) -> Result<MultipartForm, RestError> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(data).map_err(|e| RestError::Conversion(e.to_string()))?;
        Ok(pairs
            .into_iter()
            .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value)))
    }
}

fn write_urlencoded(form: &MultipartForm) -> Result<EncodedBody, RestError> {
    let pairs = form
        .parts()
        .iter()
        .map(|part| match &part.value {
            Payload::Text(value) => Ok((part.name.as_str(), value.as_str())),
            other => Err(RestError::Conversion(format!(
                "form field '{}' is {} and cannot be url-encoded",
                part.name,
                other.kind()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let encoded =
        serde_urlencoded::to_string(pairs).map_err(|e| RestError::Conversion(e.to_string()))?;
    Ok(EncodedBody::bytes(
        mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
        Bytes::from(encoded),
    ))
}

fn part_filename(value: &Payload) -> Option<&str> {
    match value {
        Payload::Resource(resource) => resource.filename.as_deref(),
        Payload::Upload(upload) => Some(upload.filename()),
        _ => None,
    }
}
