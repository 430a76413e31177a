//! services/upload_service.rs
//! Guarda los archivos subidos en el directorio de uploads con su nombre.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::errors::{SubmitError, ValidationError};
use crate::models::dispatch_model::{UploadedFile, UPLOAD_EXTENSIONS};

#[derive(Clone, Debug)]
pub struct UploadService {
    upload_dir: PathBuf,
}

impl UploadService {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        UploadService {
            upload_dir: upload_dir.into(),
        }
    }

    /// Guarda el archivo y devuelve la ruta que usan el sender y el log.
    pub async fn save(&self, file: &UploadedFile) -> Result<PathBuf, SubmitError> {
        // Solo el último componente, así "../x.pdf" queda dentro de upload_dir
        let name = Path::new(&file.filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingFile)?;

        if !has_allowed_extension(name) {
            return Err(ValidationError::UnsupportedFileExtension(name.to_string()).into());
        }

        let path = self.upload_dir.join(name);
        self.write(&path, &file.data)
            .await
            .map_err(SubmitError::Upload)?;

        log::info!("(save) File saved to {:?}", path);
        Ok(path)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .with_context(|| format!("Could not create {:?}", self.upload_dir))?;
        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Could not write {:?}", path))
    }
}

fn has_allowed_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            UPLOAD_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}
