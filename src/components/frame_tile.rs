use leptos::prelude::*;

use crate::frames::parse_weight;
use crate::types::Frame;

#[component]
pub fn FrameTile(
    frame: Frame,
    #[prop(into)] selected: Signal<bool>,
    /// Toggles selection of this frame number.
    #[prop(into)]
    on_toggle: Callback<u32>,
    /// Receives `(frame_number, weight)` for every valid weight edit.
    #[prop(into)]
    on_weight: Callback<(u32, f32)>,
) -> impl IntoView {
    let number = frame.frame_number;
    let (invalid, set_invalid) = signal(false);

    let on_weight_input = move |ev: web_sys::Event| match parse_weight(&event_target_value(&ev)) {
        Some(weight) => {
            set_invalid.set(false);
            on_weight.run((number, weight));
        }
        None => set_invalid.set(true),
    };

    view! {
        <div class="frame-tile" class:frame-tile-selected=move || selected.get()>
            <img
                src=frame.src.clone()
                alt=format!("Frame {}", number)
                loading="lazy"
                on:click=move |_| on_toggle.run(number)
            />
            <div class="frame-tile-info">
                <label class="frame-tile-select">
                    <input
                        type="checkbox"
                        prop:checked=move || selected.get()
                        on:change=move |_| on_toggle.run(number)
                    />
                    <span class="frame-number">{format!("#{}", number)}</span>
                </label>
                <span class="frame-time">{frame.time.clone()}</span>
            </div>
            <input
                type="number"
                class="frame-weight"
                class:input-invalid=move || invalid.get()
                min="0"
                step="0.1"
                value=frame.weight.to_string()
                on:input=on_weight_input
            />
        </div>
    }
}
