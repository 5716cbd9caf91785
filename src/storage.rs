//! Local file storage for generated reports and uploaded product images.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const REPORT_HEADER: [&str; 7] = [
    "User Email",
    "User ID",
    "Purchase Event ID",
    "Address",
    "Product Name",
    "Quantity",
    "Purchase Date",
];

/// Report CSV files under a single directory.
#[derive(Clone, Debug)]
pub struct ReportStore {
    base_path: PathBuf,
}

impl ReportStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `user_purchases_report_<YYYYmmddHHMMSS>.csv`; two reports generated
    /// in the same second share a name.
    pub fn file_name_for(generated_at: DateTime<Utc>) -> String {
        format!(
            "user_purchases_report_{}.csv",
            generated_at.format("%Y%m%d%H%M%S")
        )
    }

    /// Encode `rows` under the fixed header and place the file atomically:
    /// the bytes go to a hidden temp sibling which is then renamed into place.
    pub async fn write(
        &self,
        generated_at: DateTime<Utc>,
        rows: &[Vec<String>],
    ) -> AppResult<PathBuf> {
        let bytes = encode_csv(rows)?;

        fs::create_dir_all(&self.base_path).await?;
        let file_name = Self::file_name_for(generated_at);
        let final_path = self.base_path.join(&file_name);
        let tmp_path = self
            .base_path
            .join(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

        if let Err(err) = fs::write(&tmp_path, &bytes).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }

        Ok(final_path)
    }

    /// Read every row back, header included.
    pub async fn read_rows(&self, path: &Path) -> AppResult<Vec<Vec<String>>> {
        let bytes = read_existing(path).await?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes.as_slice());
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    pub async fn read_bytes(&self, path: &Path) -> AppResult<Vec<u8>> {
        read_existing(path).await
    }

    /// Remove a report file; a file that is already gone is not an error.
    pub async fn remove(&self, path: &Path) -> AppResult<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn encode_csv(rows: &[Vec<String>]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to flush report: {e}")))
}

async fn read_existing(path: &Path) -> AppResult<Vec<u8>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::not_found("Report not found or deleted."))
        }
        Err(e) => Err(e.into()),
    }
}

/// Uploaded product images, stored flat under one directory by sanitized name.
#[derive(Clone, Debug)]
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save under `file_name`, which must already be sanitized. A later
    /// upload with the same name replaces the earlier file.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.base_path).await?;
        let path = self.base_path.join(file_name);
        fs::write(&path, data).await?;
        Ok(path)
    }
}
