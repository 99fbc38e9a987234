//! Projects API handlers.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        State,
    },
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blob::path_segment;
use crate::error::ProblemDetails;
use crate::store::{Project, SiteDocument};

use super::multipart::{file_extension, read_form, take_json_field};
use super::router::AppState;
use super::{new_id, Acknowledged};

const PROJECT_FIELD: &str = "project";
const HERO_IMAGE_FILE: &str = "heroImage";
const GALLERY_IMAGE_PREFIX: &str = "galleryImage";

#[derive(Debug, Serialize)]
pub struct ProjectSaved {
    pub success: bool,
    pub project: Project,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProject {
    pub id: String,
}

/// GET /api/projects - The whole site document
pub async fn get_document(
    State(state): State<AppState>,
) -> Result<Json<SiteDocument>, ProblemDetails> {
    Ok(Json(state.store.load().await?))
}

/// POST|PUT /api/projects - Create or update a project with its images
pub async fn save_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ProjectSaved>, ProblemDetails> {
    let mut form = read_form(&headers, body)?;
    let mut project: Project = take_json_field(&mut form, PROJECT_FIELD)?;

    if project.id.is_empty() {
        project.id = new_id("project");
    }
    let folder = path_segment(if project.slug.is_empty() {
        &project.id
    } else {
        &project.slug
    });

    if let Some(hero) = form.take_file(HERO_IMAGE_FILE) {
        let pathname = format!("projects/{folder}/hero.{}", file_extension(&hero));
        let url = state
            .blobs
            .put(&pathname, hero.data, &hero.content_type)
            .await?;
        project.image = Some(url);
    }

    let gallery = form.take_files_with_prefix(GALLERY_IMAGE_PREFIX);
    if !gallery.is_empty() {
        let stamp = chrono::Utc::now().timestamp_millis();
        let mut urls = Vec::with_capacity(gallery.len());
        for (index, (_, file)) in gallery.into_iter().enumerate() {
            let pathname = format!(
                "projects/{folder}/gallery-{stamp}-{index}.{}",
                file_extension(&file)
            );
            urls.push(
                state
                    .blobs
                    .put(&pathname, file.data, &file.content_type)
                    .await?,
            );
        }
        project.images = urls;
    }

    let project = state.store.upsert_project(project).await?;
    tracing::info!(
        project_id = %project.id,
        images = project.images.len(),
        "project saved"
    );

    Ok(Json(ProjectSaved {
        success: true,
        project,
    }))
}

/// DELETE /api/projects - Delete a project by id
pub async fn delete_project(
    State(state): State<AppState>,
    input: Result<Json<DeleteProject>, JsonRejection>,
) -> Result<Json<Acknowledged>, ProblemDetails> {
    let Json(input) = input?;

    let project = state
        .store
        .delete_project(&input.id)
        .await?
        .ok_or_else(|| ProblemDetails::not_found(format!("Project {} not found", input.id)))?;

    let urls: Vec<String> = project
        .image
        .into_iter()
        .chain(project.images)
        .collect();
    if let Err(e) = state.blobs.delete(&urls).await {
        tracing::warn!(project_id = %input.id, error = %e, "failed to delete project blobs");
    }

    tracing::info!(project_id = %input.id, "project deleted");
    Ok(Json(Acknowledged { success: true }))
}
