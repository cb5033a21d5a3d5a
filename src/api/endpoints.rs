//! Relative backend paths. Identifiers are inserted verbatim; the server rejects bad ones.

pub fn projects() -> &'static str {
    "/projects"
}

pub fn specific_project(project_id: &str) -> String {
    format!("/projects/{}", project_id)
}

pub fn create_long_exposure_image(project_id: &str) -> String {
    format!("/projects/{}/createLongExposureImage", project_id)
}

/// Thumbnail of a single frame. Frame numbers are left-padded to four digits.
pub fn frame_thumbnail(project_id: &str, frame_number: u32) -> String {
    format!(
        "/outputs/{}/frames/ffout_thumbnail_{:04}.webp",
        project_id, frame_number
    )
}

pub fn video_file(project_id: &str, file_extension: &str) -> String {
    format!("/uploads/{}.{}", project_id, file_extension)
}

/// Upload endpoint of backends that predate multipart `POST /projects`.
pub fn upload() -> &'static str {
    "/upload"
}
