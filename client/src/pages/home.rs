//! Landing page: hero, auth state section, features grid, footer links.

use authflow::SessionSnapshot;
use authflow::home::{FEATURES, FOOTER_LINKS, HomeView, NavLink, ProfileSummary};
use leptos::prelude::*;

use crate::components::feature_card::FeatureCard;
use crate::components::logo::NeonLogo;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionSnapshot>>();
    let home = Memo::new(move |_| HomeView::from_snapshot(&session.get()));

    view! {
        <div class="home">
            <section class="home__hero">
                <NeonLogo class="home__logo"/>
                <h1>"Neon Auth Demo"</h1>
                <p class="muted">
                    "Explore authentication features powered by Neon Auth. Sign in with social providers, and more."
                </p>
            </section>

            <section class="home__auth">
                {move || match home.get() {
                    HomeView::Loading => view! {
                        <div class="home__loading">
                            <span class="spinner"></span>
                            "Loading..."
                        </div>
                    }
                    .into_any(),
                    HomeView::SignedOut { links } => view! { <LinkRow links=links/> }.into_any(),
                    HomeView::SignedIn { profile, links } => view! {
                        <ProfileCard profile=profile/>
                        <LinkRow links=links/>
                    }
                    .into_any(),
                }}
            </section>

            <section class="home__features">
                <h2>"Authentication Features"</h2>
                <div class="feature-grid">
                    {FEATURES.iter().map(|feature| view! { <FeatureCard feature=*feature/> }).collect_view()}
                </div>
            </section>

            <footer class="home__footer">
                {FOOTER_LINKS
                    .iter()
                    .map(|(label, href)| view! {
                        <a href=*href target="_blank" rel="noopener noreferrer">{*label}</a>
                    })
                    .collect_view()}
            </footer>
        </div>
    }
}

#[component]
fn LinkRow(links: &'static [NavLink]) -> impl IntoView {
    view! {
        <div class="link-row">
            {links
                .iter()
                .map(|link| {
                    let class = if link.primary { "btn btn--primary" } else { "btn btn--outline" };
                    view! { <a href=link.href class=class>{link.label}</a> }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn ProfileCard(profile: ProfileSummary) -> impl IntoView {
    let ProfileSummary { display_name, email, image, initials } = profile;
    let avatar = match image {
        Some(src) => view! { <img class="user-avatar user-avatar--large" src=src alt=display_name.clone()/> }.into_any(),
        None => view! { <span class="user-avatar user-avatar--large user-avatar--initials">{initials}</span> }.into_any(),
    };

    view! {
        <div class="card profile-card">
            {avatar}
            <div class="profile-card__text">
                <p class="muted small">"Signed in as"</p>
                <p class="profile-card__name">{display_name}</p>
                <p class="muted small">{email}</p>
            </div>
        </div>
    }
}
