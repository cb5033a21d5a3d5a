use tracing::info;

use crate::api::client::ApiClient;
use crate::api::endpoints;
use crate::api::transport::Transport;
use crate::error::ApiError;
use crate::types::{ApiResponse, CreateLongExposureImageRequest, ProjectDataResponse, ProjectsResponse};

impl<T: Transport> ApiClient<T> {
    /// List all projects for the picker.
    pub async fn list_projects(&self) -> Result<ApiResponse<ProjectsResponse>, ApiError> {
        self.get(endpoints::projects()).await
    }

    /// Fetch metadata for a single project.
    pub async fn project_data(&self, project_id: &str) -> Result<ApiResponse<ProjectDataResponse>, ApiError> {
        self.get(&endpoints::specific_project(project_id)).await
    }

    /// Ask the server to composite the selected frames.
    ///
    /// The server answers with the served URL of the new image as plain text.
    pub async fn create_long_exposure_image(
        &self,
        project_id: &str,
        request: &CreateLongExposureImageRequest,
    ) -> Result<ApiResponse<String>, ApiError> {
        info!(
            "Creating long exposure image for {} from {} frames",
            project_id,
            request.frames_to_include.len()
        );
        self.post(&endpoints::create_long_exposure_image(project_id), request)
            .await
    }

    /// Delete a project and its uploaded video. Returns the server's confirmation text.
    pub async fn delete_project(&self, project_id: &str) -> Result<ApiResponse<String>, ApiError> {
        info!("Deleting project {}", project_id);
        self.delete(&endpoints::specific_project(project_id)).await
    }
}
