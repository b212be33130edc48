//! Credential auth pages under `/auth/{view}`.
//!
//! SYSTEM CONTEXT
//! ==============
//! One component renders every view the config enables. Form state is an
//! `AuthFormState` signal reset whenever the view segment changes; submits go
//! through `begin` / `execute` / `complete` like the anonymous page, and the
//! returned follow-up is handed to the session helpers and the shell.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use authflow::auth_view::{AuthFormState, AuthRequest, AuthView};
use authflow::config::TextKey;
use authflow::types::SocialProvider;
use authflow::{AuthUiConfig, SessionSnapshot};
use leptos::prelude::*;
use leptos_router::hooks::{use_params_map, use_query_map};

use crate::net::api::BrowserClient;
use crate::state::shell::AuthShell;

/// Input fields a view can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Field {
    Name,
    Email,
    Password,
    NewPassword,
}

pub(crate) fn fields(view: AuthView) -> &'static [Field] {
    match view {
        AuthView::SignIn => &[Field::Email, Field::Password],
        AuthView::SignUp => &[Field::Name, Field::Email, Field::Password],
        AuthView::ForgotPassword => &[Field::Email],
        AuthView::ResetPassword => &[Field::NewPassword],
        AuthView::SignOut => &[],
    }
}

/// Link under the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FooterLink {
    pub prompt: Option<TextKey>,
    pub target: AuthView,
    pub label: &'static str,
}

pub(crate) fn footer_link(view: AuthView, config: &AuthUiConfig) -> Option<FooterLink> {
    let link = match view {
        AuthView::SignIn => {
            FooterLink { prompt: Some(TextKey::DontHaveAnAccount), target: AuthView::SignUp, label: "Sign Up" }
        }
        AuthView::SignUp => {
            FooterLink { prompt: Some(TextKey::AlreadyHaveAnAccount), target: AuthView::SignIn, label: "Sign In" }
        }
        AuthView::ForgotPassword | AuthView::ResetPassword => {
            FooterLink { prompt: None, target: AuthView::SignIn, label: "Back to Sign In" }
        }
        AuthView::SignOut => return None,
    };
    link.target.enabled(config).then_some(link)
}

/// Resolve the route segment to a view this config serves.
pub(crate) fn resolve_view(segment: Option<&str>, config: &AuthUiConfig) -> Option<AuthView> {
    segment.and_then(AuthView::from_segment).filter(|view| view.enabled(config))
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let config = StoredValue::new(expect_context::<AuthUiConfig>());
    let params = use_params_map();
    let view = Memo::new(move |_| config.with_value(|c| resolve_view(params.read().get("view").as_deref(), c)));

    move || match view.get() {
        Some(view) => view! { <AuthCard view=view/> }.into_any(),
        None => view! { <p class="not-found">"Page not found."</p> }.into_any(),
    }
}

#[component]
fn AuthCard(view: AuthView) -> impl IntoView {
    let config = StoredValue::new(expect_context::<AuthUiConfig>());
    let session = expect_context::<RwSignal<SessionSnapshot>>();
    let shell = expect_context::<AuthShell>();
    let client = StoredValue::new(expect_context::<BrowserClient>());
    let query = use_query_map();
    let state = RwSignal::new(AuthFormState::default());

    let text = move |key: TextKey| config.with_value(|c| c.text(key).to_owned());
    let busy = move || state.get().is_busy();

    let execute = move |request: AuthRequest| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let client = client.get_value();
            let result = request.execute(&client).await;
            let Some(follow_up) = state.try_update(|s| config.with_value(|c| s.complete(result, c))) else {
                return;
            };
            crate::state::session::settle(session, shell, &client, follow_up.change, follow_up.refresh).await;
            if let Some(target) = follow_up.navigate {
                shell.go(target);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (request, client, session, shell);
    };

    let submit = move || {
        if view == AuthView::ResetPassword {
            let token = query.read_untracked().get("token").unwrap_or_default();
            state.update(|s| s.form.token = token);
        }
        let origin = crate::util::location::origin();
        if let Some(Ok(request)) = state.try_update(|s| config.with_value(|c| s.begin(view, c, &origin))) {
            execute(request);
        }
    };

    let social = move |provider: SocialProvider| {
        if let Some(Ok(request)) = state.try_update(|s| config.with_value(|c| s.begin_social(provider, c))) {
            execute(request);
        }
    };

    // Sign-out has no form: it runs as soon as the page mounts in the browser.
    if view == AuthView::SignOut {
        Effect::new(submit);
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submit();
    };

    let field_input = move |field: Field| {
        let (label, kind, placeholder) = match field {
            Field::Name => (text(TextKey::Name), "text", text(TextKey::Name)),
            Field::Email => (text(TextKey::Email), "email", text(TextKey::EmailPlaceholder)),
            Field::Password => (text(TextKey::Password), "password", text(TextKey::PasswordPlaceholder)),
            Field::NewPassword => (text(TextKey::NewPassword), "password", text(TextKey::PasswordPlaceholder)),
        };
        let value = move || {
            let form = state.get().form;
            match field {
                Field::Name => form.name,
                Field::Email => form.email,
                Field::Password | Field::NewPassword => form.password,
            }
        };
        let on_input = move |ev: leptos::ev::Event| {
            let input = event_target_value(&ev);
            state.update(|s| match field {
                Field::Name => s.form.name = input,
                Field::Email => s.form.email = input,
                Field::Password | Field::NewPassword => s.form.password = input,
            });
        };
        view! {
            <label class="form__field">
                <span>{label}</span>
                <input type=kind placeholder=placeholder prop:value=value on:input=on_input disabled=busy/>
            </label>
        }
    };

    let show_forgot_link = view == AuthView::SignIn && config.with_value(|c| c.credentials.forgot_password);
    let providers = config.with_value(|c| if view.shows_social() { c.social_providers.clone() } else { Vec::new() });

    view! {
        <div class="auth">
            <div class="card auth-card">
                <h1 class="auth-card__title">{text(view.title_key())}</h1>
                {view.description_key().map(|key| view! { <p class="muted small">{text(key)}</p> })}

                {if view == AuthView::SignOut {
                    view! { <p class="auth-card__status"><span class="spinner"></span>"Signing out..."</p> }.into_any()
                } else {
                    view! {
                        <form class="form" on:submit=on_submit>
                            {fields(view).iter().map(|field| field_input(*field)).collect_view()}
                            {show_forgot_link.then(|| view! {
                                <a href=AuthView::ForgotPassword.path() class="auth-card__forgot small">
                                    {text(TextKey::ForgotPasswordLink)}
                                </a>
                            })}
                            <button type="submit" class="btn btn--primary btn--block" disabled=busy>
                                {text(view.action_key())}
                            </button>
                        </form>
                    }
                    .into_any()
                }}

                {(!providers.is_empty()).then(|| view! {
                    <div class="auth-card__divider"><span>{text(TextKey::OrContinueWith)}</span></div>
                    <div class="auth-card__social">
                        {providers
                            .iter()
                            .map(|provider| {
                                let provider = *provider;
                                view! {
                                    <button
                                        class="btn btn--outline btn--block"
                                        disabled=busy
                                        on:click=move |_| social(provider)
                                    >
                                        {provider.label()}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                })}

                {move || state.get().error.map(|message| view! { <div class="alert alert--error">{message}</div> })}
                {move || state.get().notice.map(|message| view! { <div class="alert alert--info">{message}</div> })}
            </div>

            {config.with_value(|c| footer_link(view, c)).map(|link| view! {
                <p class="auth__footer small muted">
                    {link.prompt.map(|key| format!("{} ", text(key)))}
                    <a href=link.target.path()>{link.label}</a>
                </p>
            })}
        </div>
    }
}
