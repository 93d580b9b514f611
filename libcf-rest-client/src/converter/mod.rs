// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Message converters: translation between in-memory [`Payload`] values and
//! HTTP body bytes.
//!
//! Converters are kept in an ordered [`MessageConverters`] list. Selection
//! always takes the first converter that matches both the payload kind and
//! the media type, so more specific converters must be registered before
//! generic ones.

mod form;
mod upload;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use mime::Mime;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::RestError;

pub use form::{FormConverter, FormPart, MultipartForm};
pub use upload::UploadApplicationPayload;

/// An opaque binary resource, such as a file being uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// File name of the multipart part carrying this resource.
    pub filename: Option<String>,
    /// Resource contents.
    pub data: Bytes,
}

impl Resource {
    /// A resource without a file name.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            filename: None,
            data: data.into(),
        }
    }

    /// Set the file name.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// A request or response body before encoding / after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw bytes.
    Bytes(Bytes),
    /// Text.
    Text(String),
    /// A binary resource.
    Resource(Resource),
    /// An application bits upload.
    Upload(UploadApplicationPayload),
    /// Form data, written url-encoded or as `multipart/form-data`.
    Form(MultipartForm),
    /// A JSON document.
    Json(serde_json::Value),
}

impl Payload {
    /// Serialize `value` into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, RestError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| RestError::Conversion(e.to_string()))
    }

    /// Deserialize a JSON payload into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, RestError> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| RestError::Conversion(e.to_string()))
            }
            other => Err(RestError::Conversion(format!(
                "expected a json payload, got {}",
                other.kind()
            ))),
        }
    }

    /// The kind of this payload.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Bytes(_) => PayloadKind::Bytes,
            Payload::Text(_) => PayloadKind::Text,
            Payload::Resource(_) => PayloadKind::Resource,
            Payload::Upload(_) => PayloadKind::Upload,
            Payload::Form(_) => PayloadKind::Form,
            Payload::Json(_) => PayloadKind::Json,
        }
    }
}

/// The kind of value a converter reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// [`Payload::Bytes`]
    Bytes,
    /// [`Payload::Text`]
    Text,
    /// [`Payload::Resource`]
    Resource,
    /// [`Payload::Upload`]
    Upload,
    /// [`Payload::Form`]
    Form,
    /// [`Payload::Json`]
    Json,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadKind::Bytes => "bytes",
            PayloadKind::Text => "text",
            PayloadKind::Resource => "resource",
            PayloadKind::Upload => "upload",
            PayloadKind::Form => "form",
            PayloadKind::Json => "json",
        };
        f.write_str(name)
    }
}

/// An encoded request body.
#[derive(Debug)]
pub enum EncodedBody {
    /// A buffered body and the `Content-Type` to send with it.
    Bytes {
        /// Value for the `Content-Type` header.
        content_type: String,
        /// Body bytes.
        data: Bytes,
    },
    /// A `multipart/form-data` body. reqwest writes the framing and the
    /// `Content-Type` header, boundary included.
    Multipart(reqwest::multipart::Form),
}

impl EncodedBody {
    pub(crate) fn bytes(content_type: impl Into<String>, data: Bytes) -> Self {
        EncodedBody::Bytes {
            content_type: content_type.into(),
            data,
        }
    }

    /// The `Content-Type` of a buffered body. `None` for multipart bodies.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            EncodedBody::Bytes { content_type, .. } => Some(content_type),
            EncodedBody::Multipart(_) => None,
        }
    }

    /// The bytes of a buffered body. `None` for multipart bodies.
    pub fn data(&self) -> Option<&Bytes> {
        match self {
            EncodedBody::Bytes { data, .. } => Some(data),
            EncodedBody::Multipart(_) => None,
        }
    }
}

/// Converter for [`Payload::Text`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextConverter {
    media_types: Vec<Mime>,
    write_charset: bool,
}

impl Default for TextConverter {
    fn default() -> Self {
        Self {
            media_types: vec![mime::TEXT_PLAIN, mime::STAR_STAR],
            write_charset: true,
        }
    }
}

impl TextConverter {
    /// Restrict the converter to the given media types.
    pub fn with_media_types(mut self, media_types: Vec<Mime>) -> Self {
        self.media_types = media_types;
        self
    }

    /// Whether to append `; charset=utf-8` to the `Content-Type`.
    pub fn write_charset(mut self, write_charset: bool) -> Self {
        self.write_charset = write_charset;
        self
    }

    /// The converter used for text form parts: `application/json` only, no
    /// charset parameter.
    pub fn json_part() -> Self {
        Self::default()
            .with_media_types(vec![mime::APPLICATION_JSON])
            .write_charset(false)
    }

    fn write(&self, text: &str, media_type: Option<&Mime>) -> EncodedBody {
        let base = concrete(media_type)
            .or_else(|| self.media_types.iter().find(|m| is_concrete(m)))
            .map(essence)
            .unwrap_or_else(|| mime::TEXT_PLAIN.essence_str().to_owned());
        let content_type = if self.write_charset {
            format!("{base}; charset=utf-8")
        } else {
            base
        };
        EncodedBody::bytes(content_type, Bytes::copy_from_slice(text.as_bytes()))
    }

    fn read(media_type: Option<&Mime>, data: &Bytes) -> Result<String, RestError> {
        let charset = media_type
            .and_then(|m| m.get_param(mime::CHARSET))
            .map(|c| c.as_str().to_ascii_lowercase());
        match charset.as_deref() {
            None | Some("utf-8") | Some("utf8") | Some("us-ascii") => {
                String::from_utf8(data.to_vec()).map_err(|e| RestError::Conversion(e.to_string()))
            }
            Some("iso-8859-1") | Some("latin1") => {
                Ok(data.iter().map(|&b| char::from(b)).collect())
            }
            Some(other) => Err(RestError::Conversion(format!("unsupported charset {other}"))),
        }
    }
}

/// One entry in a [`MessageConverters`] list.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageConverter {
    /// Raw bytes, any media type.
    RawBytes,
    /// Text.
    Text(TextConverter),
    /// Opaque binary resources, any media type.
    Resource,
    /// Application bits uploads. Write-only.
    UploadPayload,
    /// Url-encoded and multipart forms.
    MultipartForm(FormConverter),
    /// JSON documents.
    Json,
}

impl MessageConverter {
    /// The media types this converter handles.
    pub fn supported_media_types(&self) -> Vec<Mime> {
        match self {
            MessageConverter::RawBytes => vec![mime::APPLICATION_OCTET_STREAM, mime::STAR_STAR],
            MessageConverter::Text(text) => text.media_types.clone(),
            MessageConverter::Resource => vec![mime::STAR_STAR],
            MessageConverter::UploadPayload => vec![mime::APPLICATION_OCTET_STREAM],
            MessageConverter::MultipartForm(_) => vec![
                mime::MULTIPART_FORM_DATA,
                mime::APPLICATION_WWW_FORM_URLENCODED,
            ],
            MessageConverter::Json => {
                let mut types = vec![mime::APPLICATION_JSON];
                types.extend(Mime::from_str("application/*+json").ok());
                types
            }
        }
    }

    fn handles(&self, kind: PayloadKind) -> bool {
        matches!(
            (self, kind),
            (MessageConverter::RawBytes, PayloadKind::Bytes)
                | (MessageConverter::Text(_), PayloadKind::Text)
                | (MessageConverter::Resource, PayloadKind::Resource)
                | (MessageConverter::UploadPayload, PayloadKind::Upload)
                | (MessageConverter::MultipartForm(_), PayloadKind::Form)
                | (MessageConverter::Json, PayloadKind::Json)
        )
    }

    fn supports(&self, media_type: Option<&Mime>) -> bool {
        match media_type {
            None => true,
            Some(media_type) => self
                .supported_media_types()
                .iter()
                .any(|supported| is_compatible(supported, media_type)),
        }
    }

    /// Whether this converter can decode a body of `media_type` into `kind`.
    pub fn can_read(&self, kind: PayloadKind, media_type: Option<&Mime>) -> bool {
        match self {
            MessageConverter::UploadPayload => false,
            MessageConverter::MultipartForm(_) => {
                kind == PayloadKind::Form
                    && media_type
                        .is_none_or(|m| is_compatible(&mime::APPLICATION_WWW_FORM_URLENCODED, m))
            }
            _ => self.handles(kind) && self.supports(media_type),
        }
    }

    /// Whether this converter can encode `payload` as `media_type`.
    pub fn can_write(&self, payload: &Payload, media_type: Option<&Mime>) -> bool {
        self.handles(payload.kind()) && self.supports(media_type)
    }

    /// Encode `payload`. `media_type` is the requested content type, if any.
    pub fn write(
        &self,
        payload: &Payload,
        media_type: Option<&Mime>,
    ) -> Result<EncodedBody, RestError> {
        match (self, payload) {
            (MessageConverter::RawBytes, Payload::Bytes(data)) => Ok(EncodedBody::bytes(
                content_type_or(media_type, &mime::APPLICATION_OCTET_STREAM),
                data.clone(),
            )),
            (MessageConverter::Text(text), Payload::Text(value)) => {
                Ok(text.write(value, media_type))
            }
            (MessageConverter::Resource, Payload::Resource(resource)) => Ok(EncodedBody::bytes(
                content_type_or(media_type, &mime::APPLICATION_OCTET_STREAM),
                resource.data.clone(),
            )),
            (MessageConverter::UploadPayload, Payload::Upload(upload)) => Ok(upload.encode()),
            (MessageConverter::MultipartForm(form), Payload::Form(value)) => {
                form.write(value, media_type)
            }
            (MessageConverter::Json, Payload::Json(value)) => {
                let data =
                    serde_json::to_vec(value).map_err(|e| RestError::Conversion(e.to_string()))?;
                Ok(EncodedBody::bytes(
                    content_type_or(media_type, &mime::APPLICATION_JSON),
                    Bytes::from(data),
                ))
            }
            (converter, payload) => Err(RestError::Conversion(format!(
                "{converter:?} cannot write a {} payload",
                payload.kind()
            ))),
        }
    }

    /// Decode `data` into a payload of `kind`.
    pub fn read(
        &self,
        kind: PayloadKind,
        media_type: Option<&Mime>,
        data: &Bytes,
    ) -> Result<Payload, RestError> {
        match (self, kind) {
            (MessageConverter::RawBytes, PayloadKind::Bytes) => Ok(Payload::Bytes(data.clone())),
            (MessageConverter::Text(_), PayloadKind::Text) => {
                TextConverter::read(media_type, data).map(Payload::Text)
            }
            (MessageConverter::Resource, PayloadKind::Resource) => {
                Ok(Payload::Resource(Resource::new(data.clone())))
            }
            (MessageConverter::MultipartForm(_), PayloadKind::Form) => {
                FormConverter::read(data).map(Payload::Form)
            }
            (MessageConverter::Json, PayloadKind::Json) => serde_json::from_slice(data)
                .map(Payload::Json)
                .map_err(|e| RestError::Conversion(e.to_string())),
            (converter, kind) => Err(RestError::Conversion(format!(
                "{converter:?} cannot read a {kind} payload"
            ))),
        }
    }
}

/// An ordered list of message converters.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageConverters {
    converters: Vec<MessageConverter>,
}

impl Default for MessageConverters {
    /// Raw bytes, text, resource, upload payload, form, JSON, in that order.
    fn default() -> Self {
        Self::new(vec![
            MessageConverter::RawBytes,
            MessageConverter::Text(TextConverter::default()),
            MessageConverter::Resource,
            MessageConverter::UploadPayload,
            MessageConverter::MultipartForm(FormConverter::default()),
            MessageConverter::Json,
        ])
    }
}

impl MessageConverters {
    /// A list with exactly these converters, in this order.
    pub fn new(converters: Vec<MessageConverter>) -> Self {
        Self { converters }
    }

    /// The registered converters in precedence order.
    pub fn converters(&self) -> &[MessageConverter] {
        &self.converters
    }

    /// The first converter able to write `payload` as `media_type`.
    pub fn writer_for(
        &self,
        payload: &Payload,
        media_type: Option<&Mime>,
    ) -> Option<&MessageConverter> {
        self.converters
            .iter()
            .find(|c| c.can_write(payload, media_type))
    }

    /// The first converter able to read `kind` from `media_type`.
    pub fn reader_for(
        &self,
        kind: PayloadKind,
        media_type: Option<&Mime>,
    ) -> Option<&MessageConverter> {
        self.converters.iter().find(|c| c.can_read(kind, media_type))
    }

    /// Encode `payload` with the first matching converter.
    pub fn write(
        &self,
        payload: &Payload,
        media_type: Option<&Mime>,
    ) -> Result<EncodedBody, RestError> {
        self.writer_for(payload, media_type)
            .ok_or_else(|| {
                RestError::Conversion(format!(
                    "no converter can write a {} payload as {}",
                    payload.kind(),
                    media_type.map_or("any media type", |m| m.as_ref())
                ))
            })?
            .write(payload, media_type)
    }

    /// Decode `data` with the first matching converter.
    pub fn read(
        &self,
        kind: PayloadKind,
        media_type: Option<&Mime>,
        data: &Bytes,
    ) -> Result<Payload, RestError> {
        self.reader_for(kind, media_type)
            .ok_or_else(|| {
                RestError::Conversion(format!(
                    "no converter can read a {kind} payload from {}",
                    media_type.map_or("an untyped body", |m| m.as_ref())
                ))
            })?
            .read(kind, media_type, data)
    }
}

/// Whether either media type includes the other.
pub(crate) fn is_compatible(a: &Mime, b: &Mime) -> bool {
    includes(a, b) || includes(b, a)
}

fn includes(range: &Mime, candidate: &Mime) -> bool {
    if range.type_() == mime::STAR {
        return true;
    }
    if range.type_() != candidate.type_() {
        return false;
    }
    if range.subtype() != mime::STAR {
        return range.subtype() == candidate.subtype() && range.suffix() == candidate.suffix();
    }
    match range.suffix() {
        None => true,
        Some(suffix) => candidate.suffix() == Some(suffix) || candidate.subtype() == suffix,
    }
}

fn is_concrete(media_type: &Mime) -> bool {
    media_type.type_() != mime::STAR && media_type.subtype() != mime::STAR
}

fn concrete(media_type: Option<&Mime>) -> Option<&Mime> {
    media_type.filter(|m| is_concrete(m))
}

fn essence(media_type: &Mime) -> String {
    media_type.essence_str().to_owned()
}

fn content_type_or(media_type: Option<&Mime>, fallback: &Mime) -> String {
    concrete(media_type)
        .map(|m| m.as_ref().to_owned())
        .unwrap_or_else(|| fallback.as_ref().to_owned())
}
