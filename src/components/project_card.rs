use leptos::prelude::*;

use crate::app::use_client_config;
use crate::routes::AppRoute;
use crate::types::ProjectDetails;

/// Picker entry: thumbnail (latest composite or first frame), name and actions.
#[component]
pub fn ProjectCard(
    project: ProjectDetails,
    /// Invoked with the project id once the user confirms deletion.
    #[prop(into)]
    on_delete: Callback<String>,
    #[prop(default = false)] deleting: bool,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);
    let href = AppRoute::ProjectEditor(project.id.clone()).href();
    let thumbnail = use_client_config().get_value().resolve(&project.thumbnail_path);
    let id = project.id.clone();
    let name = if project.project_name.is_empty() {
        project.id.clone()
    } else {
        project.project_name.clone()
    };

    view! {
        <div class="project-card">
            <a href=href.clone() class="project-card-thumbnail">
                <img src=thumbnail alt=name.clone() loading="lazy" />
            </a>
            <div class="project-card-footer">
                <a href=href class="project-card-name">{name}</a>
                {move || {
                    let id = id.clone();
                    if confirming.get() {
                        view! {
                            <div class="project-card-confirm">
                                <span>"Delete project?"</span>
                                <button
                                    class="btn btn-small btn-danger"
                                    disabled=deleting
                                    on:click=move |_| {
                                        set_confirming.set(false);
                                        on_delete.run(id.clone());
                                    }
                                >
                                    "Delete"
                                </button>
                                <button
                                    class="btn btn-small btn-secondary"
                                    on:click=move |_| set_confirming.set(false)
                                >
                                    "Cancel"
                                </button>
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <button
                                class="btn btn-small btn-secondary"
                                disabled=deleting
                                on:click=move |_| set_confirming.set(true)
                            >
                                {if deleting { "Deleting..." } else { "Delete" }}
                            </button>
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}
