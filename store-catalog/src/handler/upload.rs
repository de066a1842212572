//! Multipart intake for store forms
//!
//! Reads a `multipart/form-data` body into text fields plus an optional
//! photo. A file part without a filename or without bytes means "no photo",
//! which is what browsers send when the file input is left empty.

use axum::extract::Multipart;
use std::collections::HashMap;

use crate::db::models::{StoreInput, StoreUpdate};
use crate::imaging::PhotoUpload;
use crate::utils::{AppError, AppResult, from_multipart_error};

/// Form field carrying the photo
pub const PHOTO_FIELD: &str = "photo";

/// Repeated form field carrying tags
pub const TAGS_FIELD: &str = "tags";

/// Decoded store form
#[derive(Debug, Default)]
pub struct StoreForm {
    pub fields: HashMap<String, String>,
    pub tags: Option<Vec<String>>,
    pub photo: Option<PhotoUpload>,
}

impl StoreForm {
    /// Read every part of `multipart`
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = StoreForm::default();

        while let Some(field) = multipart.next_field().await.map_err(from_multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == PHOTO_FIELD {
                let file_name = field.file_name().map(|s| s.to_string()).filter(|s| !s.is_empty());
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(from_multipart_error)?;

                if file_name.is_none() || bytes.is_empty() {
                    tracing::debug!("Empty photo part ignored");
                    continue;
                }
                form.photo = Some(PhotoUpload {
                    content_type,
                    bytes: bytes.to_vec(),
                    file_name,
                });
            } else if name == TAGS_FIELD {
                let value = field.text().await.map_err(from_multipart_error)?;
                form.tags.get_or_insert_with(Vec::new).push(value);
            } else if !name.is_empty() {
                let value = field.text().await.map_err(from_multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).cloned()
    }

    fn number(&self, key: &str) -> AppResult<Option<f64>> {
        match self.fields.get(key).map(|v| v.trim()) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| {
                AppError::validation(format!("{} must be a number", key)).with_detail("field", key)
            }),
        }
    }

    /// Create input for `author`; missing text fields become empty and fail
    /// validation downstream
    pub fn into_input(self, author: &str) -> AppResult<(StoreInput, Option<PhotoUpload>)> {
        let lng = self
            .number("lng")?
            .ok_or_else(|| AppError::required("lng", "You must supply coordinates!"))?;
        let lat = self
            .number("lat")?
            .ok_or_else(|| AppError::required("lat", "You must supply coordinates!"))?;

        let input = StoreInput {
            name: self.text("name").unwrap_or_default(),
            description: self.text("description"),
            address: self.text("address").unwrap_or_default(),
            lng,
            lat,
            tags: self.tags.clone().unwrap_or_default(),
            author: author.to_string(),
        };
        Ok((input, self.photo))
    }

    /// Update input; only fields present in the form are changed
    pub fn into_update(self) -> AppResult<(StoreUpdate, Option<PhotoUpload>)> {
        let update = StoreUpdate {
            name: self.text("name"),
            description: self.text("description"),
            address: self.text("address"),
            lng: self.number("lng")?,
            lat: self.number("lat")?,
            tags: self.tags.clone(),
        };
        Ok((update, self.photo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use http::Request;

    const BOUNDARY: &str = "XBOUNDARYX";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    async fn multipart(parts: &[Part<'_>]) -> Multipart {
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value)
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, file_name, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_fields_tags_and_photo() {
        let mp = multipart(&[
            Part::Text("name", "Blue Door"),
            Part::Text("address", "1 Main St"),
            Part::Text("lng", "-79.38"),
            Part::Text("lat", "43.65"),
            Part::Text("tags", "Wifi"),
            Part::Text("tags", "Open Late"),
            Part::File("photo", "door.png", "image/png", b"\x89PNG fake"),
        ])
        .await;

        let form = StoreForm::read(mp).await.unwrap();
        let photo = form.photo.as_ref().unwrap();
        assert_eq!(photo.content_type, "image/png");
        assert_eq!(photo.file_name.as_deref(), Some("door.png"));

        let (input, photo) = form.into_input("user:1").unwrap();
        assert_eq!(input.name, "Blue Door");
        assert_eq!(input.tags, vec!["Wifi", "Open Late"]);
        assert_eq!(input.lat, 43.65);
        assert!(photo.is_some());
    }

    #[tokio::test]
    async fn test_empty_file_part_is_no_photo() {
        let mp = multipart(&[
            Part::Text("name", "Blue Door"),
            Part::File("photo", "", "application/octet-stream", b""),
        ])
        .await;

        let form = StoreForm::read(mp).await.unwrap();
        assert!(form.photo.is_none());

        let (update, photo) = form.into_update().unwrap();
        assert_eq!(update.name.as_deref(), Some("Blue Door"));
        assert!(update.tags.is_none());
        assert!(photo.is_none());
    }

    #[tokio::test]
    async fn test_bad_number_is_validation_error() {
        let mp = multipart(&[Part::Text("lng", "east"), Part::Text("lat", "1")]).await;
        let form = StoreForm::read(mp).await.unwrap();
        let err = form.into_input("user:1").unwrap_err();
        assert_eq!(err.code, crate::utils::ErrorCode::ValidationFailed);
    }
}
