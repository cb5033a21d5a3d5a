//! Multipart uploads with progress reporting.
//!
//! `fetch` cannot observe request-body progress, so uploads go through
//! `XMLHttpRequest`. The browser callbacks only translate DOM events into
//! [`TransportEvent`]s; [`UploadState`] turns those into a progress stream and
//! a single outcome, which keeps the logic testable off-browser.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::{mpsc, oneshot};
use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::types::{ApiResponse, UploadResponse};

pub type UploadOutcome = Result<ApiResponse<UploadResponse>, ApiError>;

/// ffmpeg scale filter applied to extracted frames unless the user changes it.
pub const DEFAULT_SCALE: &str = "1600:-1";
pub const DEFAULT_FPS: u32 = 1;

/// Field values of a create-or-update project request.
///
/// With `project_id` set the server reprocesses the stored video using the new
/// `fps`/`scale` and no file needs to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectUpload {
    pub project_id: Option<String>,
    pub project_name: String,
    pub scale: String,
    pub fps: u32,
}

impl ProjectUpload {
    /// Text fields in wire order. `project_id` must precede `video_file`, the
    /// server decides whether to skip the file based on it.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(4);
        if let Some(id) = &self.project_id {
            fields.push(("project_id", id.clone()));
        }
        fields.push(("project_name", self.project_name.clone()));
        fields.push(("scale", self.scale.clone()));
        fields.push(("fps", self.fps.to_string()));
        fields
    }

    /// Reject requests the server cannot process before opening a connection.
    pub fn validate(&self, has_video: bool) -> Result<(), ApiError> {
        if self.project_id.is_none() && !has_video {
            return Err(ApiError::Invalid("A video file is required for a new project".into()));
        }
        if self.fps == 0 {
            return Err(ApiError::Invalid("FPS must be at least 1".into()));
        }
        if self.scale.trim().is_empty() {
            return Err(ApiError::Invalid("Scale must not be empty".into()));
        }
        Ok(())
    }

    pub fn to_form_data(&self, video: Option<&File>) -> Result<FormData, ApiError> {
        self.validate(video.is_some())?;

        let form = FormData::new()?;
        for (name, value) in self.text_fields() {
            form.append_with_str(name, &value)?;
        }
        if let Some(file) = video {
            form.append_with_blob_and_filename("video_file", file, &file.name())?;
        }
        Ok(form)
    }
}

/// Parse the frames-per-second field of the upload forms.
pub fn parse_fps(input: &str) -> Result<u32, ApiError> {
    match input.trim().parse::<u32>() {
        Ok(fps) if fps > 0 => Ok(fps),
        _ => Err(ApiError::Invalid(format!("FPS must be a whole number above 0, got '{}'", input.trim()))),
    }
}

/// Suggested project name for an uploaded file: its name without the extension.
pub fn project_name_from_file(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Integer percentage for a progress event, if the total is known.
pub fn progress_percent(loaded: f64, total: f64, length_computable: bool) -> Option<u8> {
    if !length_computable || !(total > 0.0) {
        return None;
    }
    let percent = (loaded / total * 100.0).round().clamp(0.0, 100.0);
    Some(percent as u8)
}

/// Map a finished request to its outcome. Success is any 2xx status.
pub fn complete_upload(status: u16, body: &str) -> UploadOutcome {
    if !(200..300).contains(&status) {
        return Err(ApiError::Http {
            status,
            message: body.to_string(),
        });
    }
    let data: UploadResponse = serde_json::from_str(body)?;
    Ok(ApiResponse { data, status })
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Progress {
        loaded: f64,
        total: f64,
        length_computable: bool,
    },
    Load {
        status: u16,
        body: String,
    },
    Error,
    Abort,
}

/// Turns transport events into progress notifications and exactly one outcome.
///
/// Once resolved, the progress sender is dropped so the stream ends, and every
/// later event is ignored.
#[derive(Debug)]
pub struct UploadState {
    progress: Option<mpsc::UnboundedSender<u8>>,
    outcome: Option<oneshot::Sender<UploadOutcome>>,
}

impl UploadState {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<u8>, oneshot::Receiver<UploadOutcome>) {
        let (progress_tx, progress_rx) = mpsc::unbounded();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let state = Self {
            progress: Some(progress_tx),
            outcome: Some(outcome_tx),
        };
        (state, progress_rx, outcome_rx)
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn handle(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Progress {
                loaded,
                total,
                length_computable,
            } => {
                let Some(tx) = &self.progress else { return };
                if let Some(percent) = progress_percent(loaded, total, length_computable) {
                    debug!("Upload progress: {}%", percent);
                    // Nobody listening is fine; the outcome still resolves.
                    let _ = tx.unbounded_send(percent);
                }
            }
            TransportEvent::Load { status, body } => self.resolve(complete_upload(status, &body)),
            TransportEvent::Error => self.resolve(Err(ApiError::Network("Network error".into()))),
            TransportEvent::Abort => self.resolve(Err(ApiError::Aborted)),
        }
    }

    fn resolve(&mut self, outcome: UploadOutcome) {
        self.progress = None;
        if let Some(tx) = self.outcome.take() {
            match &outcome {
                Ok(response) => info!("Upload finished with status {}", response.status),
                Err(e) => warn!("Upload failed: {}", e),
            }
            let _ = tx.send(outcome);
        }
    }
}

/// Aborts an in-flight upload from outside the task that awaits it.
#[derive(Clone)]
pub struct UploadAbortHandle {
    xhr: XmlHttpRequest,
    state: Rc<RefCell<UploadState>>,
}

impl UploadAbortHandle {
    pub fn abort(&self) {
        if self.state.borrow().is_resolved() {
            return;
        }
        let _ = self.xhr.abort();
        // Some browsers skip the abort event for requests that have not started sending.
        self.state.borrow_mut().handle(TransportEvent::Abort);
    }
}

struct XhrHandlers {
    _progress: Closure<dyn FnMut(ProgressEvent)>,
    _load: Closure<dyn FnMut()>,
    _error: Closure<dyn FnMut()>,
    _abort: Closure<dyn FnMut()>,
}

/// An upload in flight. Dropping it before completion aborts the request.
pub struct UploadTask {
    progress: mpsc::UnboundedReceiver<u8>,
    outcome: Option<oneshot::Receiver<UploadOutcome>>,
    handle: UploadAbortHandle,
    _handlers: XhrHandlers,
}

impl UploadTask {
    /// Percentages as they arrive. The stream ends once the upload resolves.
    pub fn progress(&mut self) -> &mut mpsc::UnboundedReceiver<u8> {
        &mut self.progress
    }

    pub fn abort_handle(&self) -> UploadAbortHandle {
        self.handle.clone()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the single outcome of the upload.
    pub async fn finish(mut self) -> UploadOutcome {
        match self.outcome.take() {
            Some(rx) => rx.await.unwrap_or(Err(ApiError::Aborted)),
            None => Err(ApiError::Aborted),
        }
    }
}

impl Drop for UploadTask {
    fn drop(&mut self) {
        let xhr = &self.handle.xhr;
        xhr.set_onload(None);
        xhr.set_onerror(None);
        xhr.set_onabort(None);
        if let Ok(upload) = xhr.upload() {
            upload.set_onprogress(None);
        }
        if !self.handle.state.borrow().is_resolved() {
            let _ = xhr.abort();
        }
    }
}

/// POST `form` to `endpoint` and report progress while the body is sent.
pub fn upload_file(config: &ClientConfig, endpoint: &str, form: &FormData) -> Result<UploadTask, ApiError> {
    let url = config.resolve(endpoint);
    info!("Uploading to {}", url);

    let xhr = XmlHttpRequest::new()?;
    xhr.open("POST", &url)?;

    let (state, progress, outcome) = UploadState::channel();
    let state = Rc::new(RefCell::new(state));

    let on_progress = {
        let state = state.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            state.borrow_mut().handle(TransportEvent::Progress {
                loaded: event.loaded(),
                total: event.total(),
                length_computable: event.length_computable(),
            });
        })
    };
    let on_load = {
        let state = state.clone();
        let xhr = xhr.clone();
        Closure::<dyn FnMut()>::new(move || {
            let status = xhr.status().unwrap_or(0);
            let body = xhr.response_text().ok().flatten().unwrap_or_default();
            state.borrow_mut().handle(TransportEvent::Load { status, body });
        })
    };
    let on_error = {
        let state = state.clone();
        Closure::<dyn FnMut()>::new(move || state.borrow_mut().handle(TransportEvent::Error))
    };
    let on_abort = {
        let state = state.clone();
        Closure::<dyn FnMut()>::new(move || state.borrow_mut().handle(TransportEvent::Abort))
    };

    xhr.upload()?
        .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));
    xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));

    xhr.send_with_opt_form_data(Some(form))?;

    Ok(UploadTask {
        progress,
        outcome: Some(outcome),
        handle: UploadAbortHandle { xhr, state },
        _handlers: XhrHandlers {
            _progress: on_progress,
            _load: on_load,
            _error: on_error,
            _abort: on_abort,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn progress(loaded: f64, total: f64) -> TransportEvent {
        TransportEvent::Progress {
            loaded,
            total,
            length_computable: true,
        }
    }

    fn upload(project_id: Option<&str>) -> ProjectUpload {
        ProjectUpload {
            project_id: project_id.map(|s| s.to_string()),
            project_name: "Night traffic".to_string(),
            scale: "1600:-1".to_string(),
            fps: 2,
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0.0, 1000.0, true), Some(0));
        assert_eq!(progress_percent(333.0, 1000.0, true), Some(33));
        assert_eq!(progress_percent(335.0, 1000.0, true), Some(34));
        assert_eq!(progress_percent(1000.0, 1000.0, true), Some(100));
        assert_eq!(progress_percent(500.0, 1000.0, false), None);
        assert_eq!(progress_percent(0.0, 0.0, true), None);
    }

    #[tokio::test]
    async fn test_progress_stream_is_non_decreasing_and_ends_at_100() {
        let (mut state, progress_rx, outcome_rx) = UploadState::channel();

        for loaded in [0.0, 250.0, 500.0, 750.0, 1000.0] {
            state.handle(progress(loaded, 1000.0));
        }
        state.handle(TransportEvent::Load {
            status: 200,
            body: r#"{"message":"Video uploaded","project_id":"p-1"}"#.to_string(),
        });

        let seen: Vec<u8> = progress_rx.collect().await;
        assert_eq!(seen, vec![0, 25, 50, 75, 100]);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));

        let response = outcome_rx.await.unwrap().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.data.project_id, "p-1");
    }

    #[tokio::test]
    async fn test_uncomputable_progress_is_skipped() {
        let (mut state, progress_rx, _outcome_rx) = UploadState::channel();
        state.handle(TransportEvent::Progress {
            loaded: 10.0,
            total: 0.0,
            length_computable: false,
        });
        state.handle(TransportEvent::Error);

        let seen: Vec<u8> = progress_rx.collect().await;
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_rejects_with_status_code() {
        let (mut state, _progress_rx, outcome_rx) = UploadState::channel();
        state.handle(TransportEvent::Load {
            status: 413,
            body: "Payload too large".to_string(),
        });

        let err = outcome_rx.await.unwrap().unwrap_err();
        assert_eq!(err.status(), Some(413));
        assert!(err.to_string().contains("413"));
    }

    #[tokio::test]
    async fn test_network_error_rejects_without_status() {
        let (mut state, _progress_rx, outcome_rx) = UploadState::channel();
        state.handle(TransportEvent::Error);

        let err = outcome_rx.await.unwrap().unwrap_err();
        assert_eq!(err, ApiError::Network("Network error".to_string()));
    }

    #[tokio::test]
    async fn test_outcome_resolves_only_once() {
        let (mut state, progress_rx, outcome_rx) = UploadState::channel();
        state.handle(TransportEvent::Abort);
        assert!(state.is_resolved());

        state.handle(progress(500.0, 1000.0));
        state.handle(TransportEvent::Load {
            status: 200,
            body: r#"{"message":"ok","project_id":"late"}"#.to_string(),
        });

        assert_eq!(outcome_rx.await.unwrap(), Err(ApiError::Aborted));
        let seen: Vec<u8> = progress_rx.collect().await;
        assert!(seen.is_empty());
    }

    #[test]
    fn test_malformed_success_body_is_parse_error() {
        let err = complete_upload(200, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_text_fields_put_project_id_first() {
        let fields = upload(Some("abc")).text_fields();
        let names: Vec<&str> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["project_id", "project_name", "scale", "fps"]);
        assert_eq!(fields[3].1, "2");

        let fields = upload(None).text_fields();
        assert_eq!(fields[0].0, "project_name");
    }

    #[test]
    fn test_parse_fps() {
        assert_eq!(parse_fps(" 24 ").unwrap(), 24);
        assert!(matches!(parse_fps("0"), Err(ApiError::Invalid(_))));
        assert!(parse_fps("2.5").is_err());
        assert!(parse_fps("").is_err());
    }

    #[test]
    fn test_project_name_from_file() {
        assert_eq!(project_name_from_file("fireworks.final.mp4"), "fireworks.final");
        assert_eq!(project_name_from_file("clip"), "clip");
        assert_eq!(project_name_from_file(".mov"), ".mov");
    }

    #[test]
    fn test_validate() {
        assert!(matches!(upload(None).validate(false), Err(ApiError::Invalid(_))));
        assert!(upload(None).validate(true).is_ok());
        assert!(upload(Some("abc")).validate(false).is_ok());

        let mut zero_fps = upload(Some("abc"));
        zero_fps.fps = 0;
        assert!(zero_fps.validate(false).is_err());
    }
}
