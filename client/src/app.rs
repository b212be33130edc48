//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the App Shell. It builds the auth UI configuration and the browser
//! auth client once, provides them with the session signal and the shell
//! handle through context, starts the first session load, and mounts the
//! routes.

use authflow::auth_view::Navigation;
use authflow::{AuthUiConfig, SessionSnapshot};
use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::hooks::use_navigate;
use leptos_router::{
    NavigateOptions, ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::header::Header;
use crate::net::api::{BrowserClient, BrowserTransport};
use crate::pages::{account::AccountPage, anonymous::AnonymousPage, auth::AuthPage, home::HomePage};
use crate::state::shell::AuthShell;
use crate::state::ui::UiState;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth configuration, client, session and shell contexts and
/// sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AuthUiConfig::demo();
    let client = BrowserClient::new(BrowserTransport::new(&config.base_path));
    let session = RwSignal::new(SessionSnapshot::default());
    let ui = RwSignal::new(UiState::default());
    let shell = AuthShell::new();

    #[cfg(feature = "hydrate")]
    {
        let theme = crate::util::theme::read_preference();
        crate::util::theme::apply(theme);
        ui.update(|u| u.theme = theme);

        let client = client.clone();
        leptos::task::spawn_local(async move {
            crate::state::session::refresh(session, shell, &client).await;
        });
    }

    provide_context(config);
    provide_context(client);
    provide_context(session);
    provide_context(ui);
    provide_context(shell);

    view! {
        <Stylesheet id="leptos" href="/pkg/neon-auth-demo.css"/>
        <Title text="Neon Auth Demo"/>

        <Router>
            <ShellNavigator/>
            <Header/>
            <main class="page">
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("anonymous") view=AnonymousPage/>
                    <Route path=(StaticSegment("auth"), ParamSegment("view")) view=AuthPage/>
                    <Route path=(StaticSegment("account"), ParamSegment("view")) view=AccountPage/>
                </Routes>
            </main>
        </Router>
    }
}

/// Carries out navigation requested through [`AuthShell`].
#[component]
fn ShellNavigator() -> impl IntoView {
    let shell = expect_context::<AuthShell>();
    let navigate = use_navigate();

    Effect::new(move || {
        let Some(target) = shell.take_navigation() else {
            return;
        };
        match target {
            Navigation::Push(path) => navigate(&path, NavigateOptions::default()),
            Navigation::Replace(path) => {
                navigate(&path, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
            Navigation::External(url) => crate::util::location::assign(&url),
        }
    });
}
