//! Neon mark.

use leptos::prelude::*;

#[component]
pub fn NeonLogo(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <svg class=format!("neon-logo {class}") viewBox="0 0 36 36" fill="none" xmlns="http://www.w3.org/2000/svg">
            <path
                class="neon-logo__ring"
                d="M18 36C27.9411 36 36 27.9411 36 18C36 8.05887 27.9411 0 18 0C8.05887 0 0 8.05887 0 18C0 27.9411 8.05887 36 18 36Z"
            />
            <path
                class="neon-logo__core"
                d="M18 28C23.5228 28 28 23.5228 28 18C28 12.4772 23.5228 8 18 8C12.4772 8 8 12.4772 8 18C8 23.5228 12.4772 28 18 28Z"
            />
        </svg>
    }
}
