use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::routes::AppRoute;

#[component]
pub fn Sidebar() -> impl IntoView {
    let pathname = use_location().pathname;
    let is_active = move |route: AppRoute| AppRoute::from_path(&pathname.get()) == Some(route);

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"Long Exposure"</h1>
                <p class="sidebar-subtitle">"Blend video frames into one image"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a
                        href=AppRoute::Projects.href()
                        class="nav-link"
                        class:nav-link-active=move || is_active(AppRoute::Projects)
                    >
                        "Projects"
                    </a>
                </li>
                <li class="nav-item">
                    <a
                        href=AppRoute::NewProject.href()
                        class="nav-link"
                        class:nav-link-active=move || is_active(AppRoute::NewProject)
                    >
                        "New Project"
                    </a>
                </li>
            </ul>
        </nav>
    }
}
