//! Sticky top bar: home link, GitHub link, theme toggle, user button.

use leptos::prelude::*;

use crate::components::logo::NeonLogo;
use crate::components::user_button::UserButton;
use crate::state::ui::UiState;

const REPOSITORY_URL: &str = "https://github.com/neondatabase-labs/neon-js";

#[component]
pub fn Header() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();

    view! {
        <header class="site-header">
            <a href="/" class="site-header__home">
                <NeonLogo class="site-header__logo"/>
                <span class="site-header__title">"NEON AUTH DEMO"</span>
            </a>

            <nav class="site-header__nav">
                <a href=REPOSITORY_URL target="_blank" rel="noopener noreferrer" class="site-header__link" title="GitHub">
                    "GitHub"
                </a>
                <button
                    class="btn btn--icon site-header__theme"
                    title="Toggle theme"
                    on:click=move |_| {
                        let next = crate::util::theme::toggle(ui.get_untracked().theme);
                        ui.update(|u| u.theme = next);
                    }
                >
                    {move || ui.get().theme.toggle_icon()}
                </button>
                <UserButton/>
            </nav>
        </header>
    }
}
