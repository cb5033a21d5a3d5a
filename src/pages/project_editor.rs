use std::collections::{BTreeMap, BTreeSet};

use futures::StreamExt;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use tracing::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlVideoElement;

use crate::api::endpoints;
use crate::api::upload::{parse_fps, upload_file, ProjectUpload};
use crate::app::{api_client, use_client_config};
use crate::components::frame_tile::FrameTile;
use crate::components::upload_progress::UploadProgress;
use crate::frames::{apply_weights, build_frames, selection_request};
use crate::routes::AppRoute;
use crate::types::{Frame, ProjectDataResponse};

#[component]
pub fn ProjectEditorPage() -> impl IntoView {
    let config = use_client_config();
    let params = use_params_map();
    let project_id = Memo::new(move |_| params.read().get("project_id").unwrap_or_default());

    // Project state
    let (project, set_project) = signal::<Option<ProjectDataResponse>>(None);
    let (load_error, set_load_error) = signal::<Option<String>>(None);
    let (reload, set_reload) = signal(0u32);

    // Frame selection state
    let (duration, set_duration) = signal::<Option<f64>>(None);
    let frames = RwSignal::new(Vec::<Frame>::new());
    let selected = RwSignal::new(BTreeSet::<u32>::new());
    let weights = RwSignal::new(BTreeMap::<u32, f32>::new());

    // Long exposure state
    let (latest_image, set_latest_image) = signal::<Option<String>>(None);
    let (creating, set_creating) = signal(false);
    let (create_error, set_create_error) = signal::<Option<String>>(None);

    // Reprocessing state
    let (fps_input, set_fps_input) = signal(String::new());
    let (scale_input, set_scale_input) = signal(String::new());
    let (reprocess_progress, set_reprocess_progress) = signal::<Option<u8>>(None);
    let (reprocess_message, set_reprocess_message) = signal::<Option<String>>(None);

    // Load metadata on mount, on navigation to another project and after reprocessing
    Effect::new(move |_| {
        let id = project_id.get();
        reload.track();

        set_project.set(None);
        set_load_error.set(None);
        set_duration.set(None);
        frames.set(vec![]);
        selected.set(BTreeSet::new());
        weights.set(BTreeMap::new());

        let client = api_client(config);
        spawn_local(async move {
            match client.project_data(&id).await {
                Ok(response) => {
                    let data = response.data;
                    set_fps_input.set(data.fps.to_string());
                    set_scale_input.set(data.scale.clone());
                    set_latest_image.set(data.latest_long_exposure_image_name.clone());
                    set_project.set(Some(data));
                }
                Err(e) => set_load_error.set(Some(e.into())),
            }
        });
    });

    // Frames can only be listed once the video reports its duration
    Effect::new(move |_| {
        let (Some(data), Some(secs)) = (project.get(), duration.get()) else {
            return;
        };
        let list = build_frames(&config.get_value(), &project_id.get_untracked(), data.fps, secs);
        info!("Project {} has {} frames", data.project_name, list.len());
        frames.set(list);
    });

    let on_video_metadata = move |ev: web_sys::Event| {
        let secs = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlVideoElement>().ok())
            .map(|video| video.duration());
        set_duration.set(secs);
    };

    let toggle_frame = move |number: u32| {
        selected.update(|s| {
            if !s.remove(&number) {
                s.insert(number);
            }
        });
    };

    let set_weight = move |(number, weight): (u32, f32)| {
        weights.update(|w| {
            w.insert(number, weight);
        });
    };

    let select_all = move |_| {
        selected.set(frames.with(|fs| fs.iter().map(|f| f.frame_number).collect()));
    };

    let clear_selection = move |_| selected.set(BTreeSet::new());

    let create_image = move |_| {
        let current = frames.with_untracked(|fs| weights.with_untracked(|ws| apply_weights(fs, ws)));
        let request = selected.with_untracked(|s| selection_request(&current, s));
        if request.frames_to_include.is_empty() {
            set_create_error.set(Some("Select at least one frame with a weight above 0.".to_string()));
            return;
        }

        set_creating.set(true);
        set_create_error.set(None);
        let id = project_id.get_untracked();
        let client = api_client(config);
        spawn_local(async move {
            match client.create_long_exposure_image(&id, &request).await {
                Ok(response) => set_latest_image.set(Some(response.data)),
                Err(e) => set_create_error.set(Some(e.into())),
            }
            set_creating.set(false);
        });
    };

    let reprocess = move |_| {
        let Some(data) = project.get_untracked() else {
            return;
        };
        set_reprocess_message.set(None);

        let fps = match parse_fps(&fps_input.get_untracked()) {
            Ok(fps) => fps,
            Err(e) => {
                set_reprocess_message.set(Some(e.into()));
                return;
            }
        };
        let upload = ProjectUpload {
            project_id: Some(project_id.get_untracked()),
            project_name: data.project_name,
            scale: scale_input.get_untracked(),
            fps,
        };
        let mut task = match upload
            .to_form_data(None)
            .and_then(|form| upload_file(&config.get_value(), endpoints::projects(), &form))
        {
            Ok(task) => task,
            Err(e) => {
                set_reprocess_message.set(Some(e.into()));
                return;
            }
        };

        set_reprocess_progress.set(Some(0));
        spawn_local(async move {
            while let Some(percent) = task.progress().next().await {
                set_reprocess_progress.set(Some(percent));
            }
            match task.finish().await {
                Ok(response) => {
                    set_reprocess_message.set(Some(response.data.message));
                    set_reload.update(|n| *n += 1);
                }
                Err(e) => set_reprocess_message.set(Some(e.into())),
            }
            set_reprocess_progress.set(None);
        });
    };

    view! {
        <div class="page project-editor-page">
            <a href=AppRoute::Projects.href() class="back-link">"Back to projects"</a>

            {move || load_error.get().map(|err| view! {
                <div class="error-state">
                    <h3>"Could not load project"</h3>
                    <p class="error-message">{err}</p>
                </div>
            })}

            {move || project.get().map(|data| {
                let video_src = config
                    .get_value()
                    .resolve(&endpoints::video_file(&project_id.get_untracked(), &data.video_file_extension));
                view! {
                    <div class="page-header">
                        <h2>{data.project_name.clone()}</h2>
                        <span class="project-meta">
                            {format!("{} fps, scale {}", data.fps, data.scale)}
                        </span>
                    </div>

                    <video
                        class="source-video"
                        src=video_src
                        controls=true
                        preload="metadata"
                        on:loadedmetadata=on_video_metadata
                    ></video>

                    <section class="reprocess-panel">
                        <h3>"Frame extraction"</h3>
                        <label>
                            "FPS"
                            <input
                                type="number"
                                min="1"
                                prop:value=move || fps_input.get()
                                on:input=move |ev| set_fps_input.set(event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Scale"
                            <input
                                type="text"
                                prop:value=move || scale_input.get()
                                on:input=move |ev| set_scale_input.set(event_target_value(&ev))
                            />
                        </label>
                        <button
                            class="btn btn-secondary"
                            on:click=reprocess
                            disabled=move || reprocess_progress.get().is_some()
                        >
                            "Re-extract Frames"
                        </button>
                        <Show when=move || reprocess_progress.get().is_some()>
                            <UploadProgress percent=Signal::derive(move || reprocess_progress.get().unwrap_or(0)) />
                        </Show>
                        {move || reprocess_message.get().map(|msg| view! {
                            <p class="action-message">{msg}</p>
                        })}
                    </section>
                }
            })}

            <section class="frames-panel">
                <div class="frames-toolbar">
                    <span class="selection-count">
                        {move || format!("{} of {} frames selected", selected.with(|s| s.len()), frames.with(|f| f.len()))}
                    </span>
                    <button class="btn btn-small btn-secondary" on:click=select_all>"Select All"</button>
                    <button class="btn btn-small btn-secondary" on:click=clear_selection>"Clear"</button>
                    <button
                        class="btn btn-primary"
                        on:click=create_image
                        disabled=move || creating.get() || selected.with(|s| s.is_empty())
                    >
                        {move || if creating.get() { "Creating..." } else { "Create Long Exposure" }}
                    </button>
                </div>

                {move || create_error.get().map(|err| view! { <p class="error-message">{err}</p> })}

                {move || {
                    let list = frames.get();
                    if list.is_empty() {
                        if project.with(|p| p.is_some()) {
                            view! { <p class="hint">"Waiting for the video to load..."</p> }.into_any()
                        } else {
                            view! { <p class="hint">"Loading project..."</p> }.into_any()
                        }
                    } else {
                        view! {
                            <div class="frame-grid">
                                {list
                                    .into_iter()
                                    .map(|frame| {
                                        let number = frame.frame_number;
                                        view! {
                                            <FrameTile
                                                frame=frame
                                                selected=Signal::derive(move || selected.with(|s| s.contains(&number)))
                                                on_toggle=toggle_frame
                                                on_weight=set_weight
                                            />
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                        }
                        .into_any()
                    }
                }}
            </section>

            {move || latest_image.get().map(|url| {
                let src = config.get_value().resolve(&url);
                let href = src.clone();
                view! {
                    <section class="latest-image">
                        <h3>"Latest long exposure"</h3>
                        <a href=href target="_blank">
                            <img src=src alt="Long exposure image" />
                        </a>
                    </section>
                }
            })}
        </div>
    }
}
