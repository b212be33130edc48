//! Avatar button with a small account menu, or a sign-in link when signed out.

use authflow::SessionSnapshot;
use authflow::home::DEFAULT_USER_LABEL;
use leptos::prelude::*;

use crate::components::user_avatar::UserAvatar;
use crate::state::shell::AuthShell;
use crate::state::ui::UiState;

#[component]
pub fn UserButton() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionSnapshot>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let shell = expect_context::<AuthShell>();

    let user = move || session.get().session.map(|s| s.user);
    let go = move |path: &'static str| {
        ui.update(UiState::close_user_menu);
        shell.navigate(path);
    };

    view! {
        <Show
            when=move || user().is_some()
            fallback=move || {
                view! {
                    <Show when=move || !session.get().loading>
                        <a href="/auth/sign-in" class="btn btn--small">"Sign In"</a>
                    </Show>
                }
            }
        >
            <div class="user-button">
                <button
                    class="user-button__trigger"
                    title="Account"
                    on:click=move |_| ui.update(UiState::toggle_user_menu)
                >
                    {move || user().map(|u| view! { <UserAvatar user=u class="user-avatar--small"/> })}
                </button>
                <Show when=move || ui.get().user_menu_open>
                    <div class="user-button__menu">
                        <div class="user-button__identity">
                            <span class="user-button__name">
                                {move || user().map(|u| u.display_name(DEFAULT_USER_LABEL).to_owned())}
                            </span>
                            <span class="user-button__email">{move || user().and_then(|u| u.email)}</span>
                        </div>
                        <button class="user-button__item" on:click=move |_| go("/account/settings")>
                            "Settings"
                        </button>
                        <button
                            class="user-button__item"
                            disabled=move || !ui.get().sign_out_enabled()
                            on:click=move |_| go("/auth/sign-out")
                        >
                            "Sign Out"
                        </button>
                    </div>
                </Show>
            </div>
        </Show>
    }
}
