use leptos::prelude::*;

#[component]
pub fn UploadProgress(
    #[prop(into)] percent: Signal<u8>,
    /// Shown when set; cancels the running upload.
    #[prop(optional, into)]
    on_cancel: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="upload-progress">
            <div class="progress-track">
                <div
                    class="progress-bar"
                    style=move || format!("width: {}%", percent.get())
                ></div>
            </div>
            <span class="progress-label">{move || format!("{}%", percent.get())}</span>
            {on_cancel.map(|cancel| view! {
                <button class="btn btn-small btn-secondary" on:click=move |_| cancel.run(())>
                    "Cancel"
                </button>
            })}
        </div>
    }
}
