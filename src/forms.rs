// src/forms.rs
//
// Request-body decoding: application/x-www-form-urlencoded for the plain
// forms, multipart/form-data for the listing form with its image files.

use std::collections::HashMap;

use crate::domain::form::ImageUpload;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct MultipartPart {
    pub name: String,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

pub fn parse_urlencoded(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body)
        .into_owned()
        .collect()
}

/// Parse a multipart/form-data body against the boundary from the
/// Content-Type header.
pub fn parse_multipart(
    content_type: &str,
    body: &[u8],
) -> Result<Vec<MultipartPart>, ServerError> {
    let boundary = boundary_from_content_type(content_type)
        .ok_or_else(|| ServerError::BadRequest("missing multipart boundary".into()))?;

    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut parts = Vec::new();
    let mut pos = match find_subslice(body, delimiter) {
        Some(i) => i + delimiter.len(),
        None => return Err(ServerError::BadRequest("malformed multipart body".into())),
    };

    loop {
        // "--" right after a delimiter closes the body
        if body[pos..].starts_with(b"--") {
            break;
        }
        let chunk_start = match body[pos..].iter().position(|&b| b == b'\n') {
            Some(i) => pos + i + 1,
            None => break,
        };
        let chunk_end = match find_subslice(&body[chunk_start..], delimiter) {
            Some(i) => chunk_start + i,
            None => return Err(ServerError::BadRequest("unterminated multipart part".into())),
        };

        parts.push(parse_part(&body[chunk_start..chunk_end])?);
        pos = chunk_end + delimiter.len();
    }

    Ok(parts)
}

/// Split decoded parts into plain fields and the uploaded image files.
/// Empty file inputs (a submitted form with no file chosen) are dropped.
pub fn split_listing_form(parts: Vec<MultipartPart>) -> (HashMap<String, String>, Vec<ImageUpload>) {
    let mut fields = HashMap::new();
    let mut images = Vec::new();

    for part in parts {
        match part.file_name {
            Some(file_name) => {
                if !part.data.is_empty() {
                    images.push(ImageUpload {
                        file_name,
                        bytes: part.data,
                    });
                }
            }
            None => {
                let value = String::from_utf8_lossy(&part.data).into_owned();
                fields.insert(part.name, value);
            }
        }
    }

    (fields, images)
}

fn boundary_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let param = param.trim();
        let value = param.strip_prefix("boundary=")?;
        Some(value.trim_matches('"').to_string())
    })
}

fn parse_part(chunk: &[u8]) -> Result<MultipartPart, ServerError> {
    let header_end = find_subslice(chunk, b"\r\n\r\n")
        .ok_or_else(|| ServerError::BadRequest("multipart part without headers".into()))?;

    let headers = String::from_utf8_lossy(&chunk[..header_end]);
    let mut data = &chunk[header_end + 4..];
    // strip the CRLF that precedes the next delimiter
    if data.ends_with(b"\r\n") {
        data = &data[..data.len() - 2];
    }

    let disposition = headers
        .lines()
        .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))
        .ok_or_else(|| ServerError::BadRequest("multipart part without disposition".into()))?;

    let name = disposition_param(disposition, "name")
        .ok_or_else(|| ServerError::BadRequest("multipart part without a field name".into()))?;
    let file_name = disposition_param(disposition, "filename");

    Ok(MultipartPart {
        name,
        file_name,
        data: data.to_vec(),
    })
}

fn disposition_param(disposition: &str, key: &str) -> Option<String> {
    disposition.split(';').find_map(|param| {
        let param = param.trim();
        let value = param.strip_prefix(&format!("{key}="))?;
        Some(value.trim_matches('"').to_string())
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
