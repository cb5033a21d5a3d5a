use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use tracing::error;

use crate::api::ApiClient;
use crate::components::sidebar::Sidebar;
use crate::config::ClientConfig;
use crate::pages::new_project::NewProjectPage;
use crate::pages::project_editor::ProjectEditorPage;
use crate::pages::project_picker::ProjectPickerPage;
use crate::routes::ROOT_REDIRECT;

/// Backend configuration provided by [`App`], as a `Copy` handle for event closures.
pub fn use_client_config() -> StoredValue<ClientConfig> {
    StoredValue::new(expect_context::<ClientConfig>())
}

/// A fresh client for one call; each request opens its own connection.
pub fn api_client(config: StoredValue<ClientConfig>) -> ApiClient {
    ApiClient::new(config.get_value())
}

#[component]
pub fn App() -> impl IntoView {
    let config = match ClientConfig::from_build_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot start: {}", e);
            return view! {
                <div class="page config-error">
                    <h2>"Configuration error"</h2>
                    <p>{e.to_string()}</p>
                </div>
            }
            .into_any();
        }
    };
    provide_context(config);

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=|| view! { <Redirect path=ROOT_REDIRECT /> } />
                        <Route path=path!("/projects") view=ProjectPickerPage />
                        <Route path=path!("/projects/new") view=NewProjectPage />
                        <Route path=path!("/projects/:project_id") view=ProjectEditorPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
    .into_any()
}
