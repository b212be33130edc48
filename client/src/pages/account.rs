//! Account pages under `/account/{view}`: a settings summary and the list of
//! active sessions.
//!
//! Signed-out visitors are sent to the sign-in page once the first session
//! load resolves. The session list is a local resource keyed on the route
//! epoch, so it re-fetches after every session change.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use authflow::auth_view::AuthView;
use authflow::home::DEFAULT_USER_LABEL;
use authflow::types::SessionRecord;
use authflow::{AuthClient, AuthFailure, SessionSnapshot};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::user_avatar::UserAvatar;
use crate::net::api::BrowserClient;
use crate::state::shell::AuthShell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AccountView {
    Settings,
    Security,
}

impl AccountView {
    pub(crate) fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "settings" => Some(Self::Settings),
            "security" => Some(Self::Security),
            _ => None,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Settings => "Account Settings",
            Self::Security => "Security",
        }
    }
}

/// One row of the sessions table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionRow {
    pub device: String,
    pub ip_address: String,
    pub expires_at: String,
    pub current: bool,
}

pub(crate) fn session_rows(records: &[SessionRecord], current_id: Option<&str>) -> Vec<SessionRow> {
    records
        .iter()
        .map(|record| SessionRow {
            device: record
                .user_agent
                .clone()
                .filter(|ua| !ua.is_empty())
                .unwrap_or_else(|| "Unknown device".to_owned()),
            ip_address: record.ip_address.clone().unwrap_or_default(),
            expires_at: record.expires_at.clone().unwrap_or_default(),
            current: current_id == Some(record.id.as_str()),
        })
        .collect()
}

#[component]
pub fn AccountPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionSnapshot>>();
    let shell = expect_context::<AuthShell>();
    let params = use_params_map();
    let view = Memo::new(move |_| params.read().get("view").as_deref().and_then(AccountView::from_segment));

    Effect::new(move || {
        let snapshot = session.get();
        if !snapshot.loading && snapshot.session.is_none() {
            shell.replace(AuthView::SignIn.path());
        }
    });

    move || match view.get() {
        None => view! { <p class="not-found">"Page not found."</p> }.into_any(),
        Some(view) => view! {
            <div class="account">
                <nav class="account__tabs">
                    <a href="/account/settings" class:active=move || view == AccountView::Settings>"Settings"</a>
                    <a href="/account/security" class:active=move || view == AccountView::Security>"Security"</a>
                </nav>
                <h1>{view.title()}</h1>
                <AccountSummary/>
                {(view == AccountView::Security).then(|| view! { <SessionList/> })}
            </div>
        }
        .into_any(),
    }
}

#[component]
fn AccountSummary() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionSnapshot>>();

    move || {
        session.get().session.map(|s| {
            let name = s.user.display_name(DEFAULT_USER_LABEL).to_owned();
            let email = s.user.email.clone();
            let anonymous = s.is_anonymous();
            view! {
                <div class="card profile-card">
                    <UserAvatar user=s.user class="user-avatar--large"/>
                    <div class="profile-card__text">
                        <p class="profile-card__name">{name}</p>
                        <p class="muted small">{email}</p>
                        {anonymous.then(|| view! { <span class="badge">"Anonymous"</span> })}
                    </div>
                </div>
            }
        })
    }
}

#[component]
fn SessionList() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionSnapshot>>();
    let shell = expect_context::<AuthShell>();
    let client = StoredValue::new(expect_context::<BrowserClient>());

    let sessions = LocalResource::new(move || {
        let _epoch = shell.route_epoch();
        let client = client.get_value();
        async move { client.list_sessions().await }
    });

    let current_id = move || session.get().session.and_then(|s| s.record).map(|r| r.id);

    view! {
        <div class="card">
            <h2 class="card__heading">"Active Sessions"</h2>
            <Transition fallback=|| view! { <p class="muted small">"Loading..."</p> }>
                {move || {
                    sessions
                        .get()
                        .map(|result: Result<Vec<SessionRecord>, AuthFailure>| match result {
                            Ok(records) => {
                                let rows = session_rows(&records, current_id().as_deref());
                                view! { <SessionTable rows=rows/> }.into_any()
                            }
                            Err(e) => view! {
                                <div class="alert alert--error">{e.display_message("Could not load sessions")}</div>
                            }
                            .into_any(),
                        })
                }}
            </Transition>
        </div>
    }
}

#[component]
fn SessionTable(rows: Vec<SessionRow>) -> impl IntoView {
    if rows.is_empty() {
        return view! { <p class="muted small">"No active sessions."</p> }.into_any();
    }
    view! {
        <ul class="session-list">
            {rows
                .into_iter()
                .map(|row| view! {
                    <li class="session-list__item">
                        <span class="session-list__device">{row.device}</span>
                        <span class="muted small mono">{row.ip_address}</span>
                        <span class="muted small">"Expires " {row.expires_at}</span>
                        {row.current.then(|| view! { <span class="badge">"This device"</span> })}
                    </li>
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}
