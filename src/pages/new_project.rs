use futures::StreamExt;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::endpoints;
use crate::api::upload::{
    parse_fps, project_name_from_file, upload_file, ProjectUpload, UploadAbortHandle, DEFAULT_FPS,
    DEFAULT_SCALE,
};
use crate::app::use_client_config;
use crate::components::upload_progress::UploadProgress;
use crate::routes::AppRoute;

#[component]
pub fn NewProjectPage() -> impl IntoView {
    let config = use_client_config();
    let navigate = use_navigate();
    let file_input = NodeRef::<leptos::html::Input>::new();

    let (project_name, set_project_name) = signal(String::new());
    let (fps, set_fps) = signal(DEFAULT_FPS.to_string());
    let (scale, set_scale) = signal(DEFAULT_SCALE.to_string());
    let (file_name, set_file_name) = signal::<Option<String>>(None);
    let (progress, set_progress) = signal::<Option<u8>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let active_upload = StoredValue::new_local(None::<UploadAbortHandle>);

    let selected_file = move || {
        file_input
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
    };

    let on_file_change = move |_| {
        let name = selected_file().map(|file| file.name());
        if let Some(name) = &name {
            if project_name.get_untracked().trim().is_empty() {
                set_project_name.set(project_name_from_file(name));
            }
        }
        set_file_name.set(name);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if progress.get_untracked().is_some() {
            return;
        }
        set_error.set(None);

        let frames_per_second = match parse_fps(&fps.get_untracked()) {
            Ok(value) => value,
            Err(e) => {
                set_error.set(Some(e.into()));
                return;
            }
        };
        let upload = ProjectUpload {
            project_id: None,
            project_name: project_name.get_untracked().trim().to_string(),
            scale: scale.get_untracked().trim().to_string(),
            fps: frames_per_second,
        };
        let mut task = match upload
            .to_form_data(selected_file().as_ref())
            .and_then(|form| upload_file(&config.get_value(), endpoints::projects(), &form))
        {
            Ok(task) => task,
            Err(e) => {
                set_error.set(Some(e.into()));
                return;
            }
        };

        active_upload.set_value(Some(task.abort_handle()));
        set_progress.set(Some(0));

        let navigate = navigate.clone();
        spawn_local(async move {
            while let Some(percent) = task.progress().next().await {
                set_progress.set(Some(percent));
            }
            let outcome = task.finish().await;
            active_upload.set_value(None);
            set_progress.set(None);

            match outcome {
                Ok(response) => {
                    let href = AppRoute::ProjectEditor(response.data.project_id).href();
                    navigate(&href, Default::default());
                }
                Err(e) => set_error.set(Some(e.into())),
            }
        });
    };

    let cancel_upload = move |_: ()| {
        active_upload.with_value(|handle| {
            if let Some(handle) = handle {
                handle.abort();
            }
        });
    };

    view! {
        <div class="page new-project-page">
            <h2>"New Project"</h2>
            <p class="page-description">
                "Upload a video. The server extracts its frames so you can blend them into a long exposure image."
            </p>

            <form class="upload-form" on:submit=on_submit>
                <label class="file-picker">
                    <span class="btn btn-secondary">"Choose Video"</span>
                    <input
                        type="file"
                        accept="video/*"
                        style="display: none"
                        node_ref=file_input
                        on:change=on_file_change
                    />
                    <span class="file-name">
                        {move || file_name.get().unwrap_or_else(|| "No file selected".to_string())}
                    </span>
                </label>

                <label>
                    "Project name"
                    <input
                        type="text"
                        prop:value=move || project_name.get()
                        on:input=move |ev| set_project_name.set(event_target_value(&ev))
                    />
                </label>

                <label>
                    "Frames per second"
                    <input
                        type="number"
                        min="1"
                        prop:value=move || fps.get()
                        on:input=move |ev| set_fps.set(event_target_value(&ev))
                    />
                </label>

                <label>
                    "Scale"
                    <input
                        type="text"
                        prop:value=move || scale.get()
                        on:input=move |ev| set_scale.set(event_target_value(&ev))
                    />
                </label>

                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled=move || progress.get().is_some()
                >
                    {move || if progress.get().is_some() { "Uploading..." } else { "Upload" }}
                </button>
            </form>

            <Show when=move || progress.get().is_some()>
                <UploadProgress
                    percent=Signal::derive(move || progress.get().unwrap_or(0))
                    on_cancel=cancel_upload
                />
            </Show>

            {move || error.get().map(|err| view! {
                <div class="error-state">
                    <p class="error-message">{err}</p>
                </div>
            })}
        </div>
    }
}
