use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::ValidateEmail;

use crate::domain::supplier::NewSupplier;

#[derive(MultipartForm)]
/// Multipart form for backfilling suppliers of identities that predate the service.
pub struct UploadSuppliersForm {
    #[multipart(limit = "10MB")]
    /// Uploaded CSV file with `id`, `email` and optional `name` columns.
    pub csv: TempFile,
}

/// Errors that can occur while parsing a supplier backfill upload.
#[derive(Debug, Error)]
pub enum SupplierUploadError {
    #[error("error reading csv file")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The upload lacks an `id` or `email` column.
    #[error("upload is missing the required `id` and `email` columns")]
    MissingRequiredHeaders,
    #[error("row {row} is missing an identity id")]
    MissingId { row: usize },
    #[error("row {row} has invalid email `{value}`")]
    InvalidEmail { row: usize, value: String },
}

impl UploadSuppliersForm {
    /// Parse the uploaded CSV file into [`NewSupplier`] records.
    pub fn into_new_suppliers(&mut self) -> Result<Vec<NewSupplier>, SupplierUploadError> {
        self.csv.file.rewind()?;
        parse_suppliers(self.csv.file.by_ref())
    }
}

#[derive(Deserialize)]
struct SupplierCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
}

fn parse_suppliers<R: Read>(reader: R) -> Result<Vec<NewSupplier>, SupplierUploadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    // Row deserialization matches column names exactly.
    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(str::to_lowercase)
        .collect();
    let has_column = |name: &str| headers.iter().any(|h| h == name);
    if !has_column("id") || !has_column("email") {
        return Err(SupplierUploadError::MissingRequiredHeaders);
    }
    csv_reader.set_headers(headers);

    let mut suppliers = Vec::new();

    for (index, row) in csv_reader.deserialize::<SupplierCsvRow>().enumerate() {
        let row_number = index + 2; // account for header row
        let record = row?;

        let Some(id) = record.id else {
            return Err(SupplierUploadError::MissingId { row: row_number });
        };

        let email = record.email.unwrap_or_default();
        if !email.validate_email() {
            return Err(SupplierUploadError::InvalidEmail {
                row: row_number,
                value: email,
            });
        }

        suppliers.push(NewSupplier::new(id, record.name.as_deref(), email));
    }

    Ok(suppliers)
}
