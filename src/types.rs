use serde::{Deserialize, Serialize};

// -- Api envelope --

/// Uniform envelope returned by every client call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
}

/// Body of a successful upload.
///
/// Older backends named the identifier `video_id`; both decode into `project_id`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(alias = "video_id")]
    pub project_id: String,
}

// -- Project editor types --

/// One extracted video frame as shown in the editor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub src: String,
    pub frame_number: u32,
    pub time: String,
    pub weight: f32,
}

/// The part of a [`Frame`] the compositing endpoint cares about.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FrameToInclude {
    pub frame_number: u32,
    pub frame_weight: f32,
}

impl From<&Frame> for FrameToInclude {
    fn from(frame: &Frame) -> Self {
        Self {
            frame_number: frame.frame_number,
            frame_weight: frame.weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreateLongExposureImageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub frames_to_include: Vec<FrameToInclude>,
}

impl CreateLongExposureImageRequest {
    pub fn from_frames<'a>(frames: impl IntoIterator<Item = &'a Frame>) -> Self {
        Self {
            project_id: None,
            frames_to_include: frames.into_iter().map(FrameToInclude::from).collect(),
        }
    }

    /// Attach the project identifier for backends that expect it in the body.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// Per-project metadata, fetched when the editor loads.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectDataResponse {
    pub fps: u32,
    pub project_name: String,
    pub scale: String,
    pub video_file_extension: String,
    pub latest_long_exposure_image_name: Option<String>,
}

// -- Project picker types --

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectDetails>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectDetails {
    pub id: String,
    pub project_name: String,
    pub thumbnail_path: String,
}
