// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;

use super::EncodedBody;

/// The archive sent when uploading application bits.
///
/// The archive is produced elsewhere (it only contains the files the
/// platform does not already have); this type carries it to the wire
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadApplicationPayload {
    filename: String,
    data: Bytes,
}

impl UploadApplicationPayload {
    /// Wrap an already built archive.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Archive file name, sent as the multipart `filename`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Archive size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(super) fn encode(&self) -> EncodedBody {
        EncodedBody::bytes(mime::APPLICATION_OCTET_STREAM.as_ref(), self.data.clone())
    }
}
