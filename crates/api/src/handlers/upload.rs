//! Handler for `POST /api/projects/upload`.
//!
//! The PDF is streamed to disk chunk by chunk while the byte count is checked
//! against the configured ceiling. The file is held by a [`PendingUpload`]
//! guard until its row is inserted, so any failure, timeout, or dropped
//! connection before that point removes it.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use fyparchive_core::error::CoreError;
use fyparchive_core::project::{generate_project_id, ProjectStatus};
use fyparchive_core::types::DbId;
use fyparchive_core::upload::{display_file_name, stored_file_name, validate_pdf_upload};
use fyparchive_core::validation::NewProjectFields;
use fyparchive_db::models::project::{CreateProject, Project};
use fyparchive_db::repositories::ProjectRepo;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};
use crate::extract::AppMultipart;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::storage::PendingUpload;

/// Identity and status of a freshly uploaded project.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedProject {
    pub project_id: String,
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub status: ProjectStatus,
}

impl From<Project> for UploadedProject {
    fn from(project: Project) -> Self {
        Self {
            project_id: project.project_id,
            id: project.id,
            title: project.title,
            author: project.author,
            status: project.status,
        }
    }
}

#[derive(Debug)]
struct StoredFile {
    upload: PendingUpload,
    original_name: String,
    size: u64,
}

#[derive(Debug)]
enum FilePart {
    Stored(StoredFile),
    /// A file was sent but its name or content type is not PDF. Nothing was
    /// written for it.
    Rejected(CoreError),
}

#[derive(Debug, Default)]
struct UploadForm {
    fields: NewProjectFields,
    file: Option<FilePart>,
}

/// POST /api/projects/upload
///
/// Multipart form with text fields `title`, `author`, `department`, `year`,
/// `abstract`, `supervisor` and a PDF in `file`. Creates a pending project.
pub async fn upload_project(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> AppResult<ApiResponse<UploadedProject>> {
    let mut form = UploadForm::default();
    read_form(&state, &mut multipart, &mut form).await?;

    let UploadForm { fields, file } = form;
    let details = fields.into_details()?;
    let stored = match file {
        None => return Err(AppError::BadRequest("No PDF file uploaded".into())),
        Some(FilePart::Rejected(err)) => return Err(err.into()),
        Some(FilePart::Stored(stored)) => stored,
    };

    if stored.size == 0 {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let input = CreateProject {
        project_id: generate_project_id(),
        title: details.title,
        author: details.author,
        department: details.department,
        year: details.year,
        abstract_text: details.abstract_text,
        supervisor: details.supervisor,
        file_path: stored.upload.path().to_string_lossy().into_owned(),
        file_name: stored.original_name,
        file_size: i64::try_from(stored.size)
            .map_err(|_| AppError::PayloadTooLarge("File is too large".into()))?,
    };

    let project = ProjectRepo::create(&state.pool, &input).await?;
    stored.upload.keep();

    tracing::info!(
        id = project.id,
        project_id = %project.project_id,
        file_size = project.file_size,
        "Project uploaded"
    );
    Ok(ApiResponse::created(
        "Project uploaded successfully. Awaiting admin approval.",
        UploadedProject::from(project),
    ))
}

async fn read_form(
    state: &AppState,
    multipart: &mut Multipart,
    form: &mut UploadForm,
) -> AppResult<()> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            if form.file.is_some() {
                return Err(AppError::BadRequest("Only one file may be uploaded".into()));
            }
            receive_file(state, field, form).await?;
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.fields.set(&name, value);
        }
    }
    Ok(())
}

async fn receive_file(
    state: &AppState,
    mut field: Field<'_>,
    form: &mut UploadForm,
) -> AppResult<()> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    if let Err(err) = validate_pdf_upload(&file_name, content_type.as_deref()) {
        tracing::debug!(file_name = %file_name, content_type = ?content_type, "Rejected non-PDF upload");
        form.file = Some(FilePart::Rejected(err));
        return Ok(());
    }

    let (upload, mut file) = state
        .uploads
        .create(&stored_file_name())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload file: {e}")))?;

    form.file = Some(FilePart::Stored(StoredFile {
        upload,
        original_name: display_file_name(&file_name),
        size: 0,
    }));
    let Some(FilePart::Stored(stored)) = form.file.as_mut() else {
        return Err(AppError::InternalError("Upload state lost".into()));
    };

    let max_file_size = state.config.upload.max_file_size;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        stored.size += chunk.len() as u64;
        if stored.size > max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum size of {} bytes",
                max_file_size
            )));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

    Ok(())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum request size".into())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
