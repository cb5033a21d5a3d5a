use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::{api_client, use_client_config};
use crate::components::project_card::ProjectCard;
use crate::routes::AppRoute;
use crate::types::ProjectDetails;

#[component]
pub fn ProjectPickerPage() -> impl IntoView {
    let config = use_client_config();

    let (projects, set_projects) = signal::<Vec<ProjectDetails>>(vec![]);
    let (is_loading, set_is_loading) = signal(true);
    let (list_error, set_list_error) = signal::<Option<String>>(None);
    let (deleting, set_deleting) = signal::<Option<String>>(None);
    let (action_message, set_action_message) = signal::<Option<String>>(None);

    let load_projects = move || {
        set_is_loading.set(true);
        let client = api_client(config);
        spawn_local(async move {
            match client.list_projects().await {
                Ok(response) => {
                    set_projects.set(response.data.projects);
                    set_list_error.set(None);
                }
                Err(e) => set_list_error.set(Some(e.into())),
            }
            set_is_loading.set(false);
        });
    };

    Effect::new(move |_| {
        load_projects();
    });

    let delete_project = move |id: String| {
        set_deleting.set(Some(id.clone()));
        set_action_message.set(None);
        let client = api_client(config);
        spawn_local(async move {
            match client.delete_project(&id).await {
                Ok(response) => {
                    set_action_message.set(Some(response.data));
                    set_projects.update(|list| list.retain(|p| p.id != id));
                }
                Err(e) => set_action_message.set(Some(format!("Delete failed: {}", e))),
            }
            set_deleting.set(None);
        });
    };

    view! {
        <div class="page project-picker-page">
            <div class="page-header">
                <h2>"Projects"</h2>
                <a href=AppRoute::NewProject.href() class="btn btn-primary">"New Project"</a>
            </div>

            {move || action_message.get().map(|msg| view! { <p class="action-message">{msg}</p> })}

            {move || {
                if is_loading.get() {
                    view! { <p class="loading">"Loading projects..."</p> }.into_any()
                } else if let Some(err) = list_error.get() {
                    view! {
                        <div class="error-state">
                            <p class="error-message">{err}</p>
                            <button class="btn btn-secondary" on:click=move |_| load_projects()>
                                "Retry"
                            </button>
                        </div>
                    }
                    .into_any()
                } else {
                    let list = projects.get();
                    if list.is_empty() {
                        view! {
                            <p class="empty-state">"No projects yet. Upload a video to get started."</p>
                        }
                        .into_any()
                    } else {
                        let busy = deleting.get();
                        view! {
                            <div class="project-grid">
                                {list
                                    .into_iter()
                                    .map(|project| {
                                        let is_deleting = busy.as_deref() == Some(project.id.as_str());
                                        view! {
                                            <ProjectCard
                                                project=project
                                                on_delete=move |id: String| delete_project(id)
                                                deleting=is_deleting
                                            />
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                        }
                        .into_any()
                    }
                }
            }}
        </div>
    }
}
