//! Anonymous sign-in page: start, retry or end an anonymous session, and link
//! it to an email + password account.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page state is an `AnonymousPanel` signal. Each button calls `run`, which
//! asks the panel to `begin` the command (busy guard, state check, form
//! validation), awaits the single client call, folds the outcome back in with
//! `complete`, and lets the session helpers publish and refresh.

use authflow::anonymous::SessionCard;
use authflow::{AnonymousPanel, Command, SessionPhase, SessionSnapshot};
use leptos::prelude::*;

use crate::components::user_avatar::UserAvatar;
use crate::net::api::BrowserClient;
use crate::state::shell::AuthShell;
use crate::state::ui::UiState;

#[component]
pub fn AnonymousPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionSnapshot>>();
    let shell = expect_context::<AuthShell>();
    let client = StoredValue::new(expect_context::<BrowserClient>());
    let ui = expect_context::<RwSignal<UiState>>();
    let panel = RwSignal::new(AnonymousPanel::default());

    // Mirror the busy guard so the header cannot sign out mid-command.
    Effect::new(move || {
        let busy = panel.get().is_busy();
        ui.update(|u| u.set_page_busy(busy));
    });
    on_cleanup(move || ui.update(|u| u.set_page_busy(false)));

    let run = move |command: Command| {
        let phase = session.get_untracked().phase();
        let Some(Ok(pending)) = panel.try_update(|p| p.begin(command, phase)) else {
            return;
        };

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let client = client.get_value();
            let completion = pending.execute(&client).await;
            if let Some(settled) = panel.try_update(|p| p.complete(completion)) {
                crate::state::session::settle(session, shell, &client, settled.change, settled.refresh).await;
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (pending, client, shell);
    };

    let phase = move || session.get().phase();
    let signed_in = move || !session.get().loading && phase() != SessionPhase::Unauthenticated;
    let signed_out = move || !session.get().loading && phase() == SessionPhase::Unauthenticated;
    let busy = move || panel.get().is_busy();

    let on_link = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        run(Command::LinkAccount);
    };

    view! {
        <div class="anonymous">
            <div class="anonymous__intro">
                <span class="anonymous__ghost">"👻"</span>
                <h1>"Anonymous Sign In"</h1>
                <p class="muted small">
                    "Try out the app without creating an account. You can link your session to a permanent account later."
                </p>
            </div>

            <div class="card">
                <h2 class="card__heading">"Current Session"</h2>
                <Show when=signed_out>
                    <div class="session-status">
                        <span class="session-status__dot"></span>
                        "Not authenticated"
                    </div>
                </Show>
                {move || {
                    session
                        .get()
                        .session
                        .filter(|_| signed_in())
                        .map(|s| {
                            let card = SessionCard::of(&s);
                            view! {
                                <div class="session-card">
                                    <UserAvatar user=s.user class="user-avatar--medium"/>
                                    <div class="session-card__text">
                                        <p class="muted small">"Signed in as"</p>
                                        <p class="session-card__name">{card.signed_in_as.clone()}</p>
                                        <p class="muted small mono">"ID: " {card.user_id.clone()}</p>
                                        {card.badge().map(|badge| view! { <span class="badge">{badge}</span> })}
                                    </div>
                                </div>
                            }
                        })
                }}
            </div>

            <div class="anonymous__actions">
                <Show when=signed_out>
                    <button
                        class="btn btn--primary btn--block btn--tall"
                        disabled=busy
                        on:click=move |_| run(Command::SignInAnonymous)
                    >
                        {move || panel.get().sign_in_label(phase())}
                    </button>
                </Show>
                <Show when=signed_in>
                    <Show when=move || AnonymousPanel::shows_retry(phase())>
                        <button
                            class="btn btn--outline btn--block"
                            disabled=busy
                            on:click=move |_| run(Command::SignInAnonymous)
                        >
                            {move || panel.get().sign_in_label(phase())}
                        </button>
                    </Show>
                    <button class="btn btn--danger btn--block" disabled=busy on:click=move |_| run(Command::SignOut)>
                        "Sign Out"
                    </button>
                </Show>
            </div>

            <Show when=move || AnonymousPanel::shows_link_form(phase())>
                <div class="card">
                    <h2 class="card__heading">"Link Account"</h2>
                    <p class="muted small">"Convert your anonymous session to a permanent account."</p>
                    <form class="form" on:submit=on_link>
                        <label class="form__field">
                            <span>"Email"</span>
                            <input
                                type="email"
                                placeholder="your@email.com"
                                required
                                prop:value=move || panel.get().link.email
                                on:input=move |ev| panel.update(|p| p.link.email = event_target_value(&ev))
                            />
                        </label>
                        <label class="form__field">
                            <span>"Password"</span>
                            <input
                                type="password"
                                placeholder="Choose a password"
                                required
                                minlength="8"
                                prop:value=move || panel.get().link.password
                                on:input=move |ev| panel.update(|p| p.link.password = event_target_value(&ev))
                            />
                        </label>
                        <button
                            type="submit"
                            class="btn btn--primary btn--block"
                            disabled=move || !panel.get().can_submit_link()
                        >
                            {move || panel.get().link_label()}
                        </button>
                    </form>
                </div>
            </Show>

            {move || {
                panel
                    .get()
                    .error
                    .map(|message| {
                        view! {
                            <div class="alert alert--error">
                                <p class="alert__title">"Error"</p>
                                <p>{message}</p>
                            </div>
                        }
                    })
            }}

            {move || {
                panel
                    .get()
                    .last_result
                    .map(|result| {
                        view! {
                            <div class="card card--muted">
                                <h2 class="card__heading">"Last Response"</h2>
                                <pre class="last-response">{result.to_pretty_json()}</pre>
                            </div>
                        }
                    })
            }}

            <div class="anonymous__back">
                <a href="/" class="muted small">"← Back to Home"</a>
            </div>
        </div>
    }
}
