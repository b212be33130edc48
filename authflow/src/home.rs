//! Home View model: a pure branch on the observed session.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use crate::observer::SessionSnapshot;

/// Fallback label when a signed-in user has neither name nor email.
pub const DEFAULT_USER_LABEL: &str = "User";

/// A navigation entry rendered as a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub primary: bool,
}

/// Entry points for visitors without a session.
pub const SIGNED_OUT_LINKS: [NavLink; 2] = [
    NavLink { label: "Sign In", href: "/auth/sign-in", primary: true },
    NavLink { label: "Create Account", href: "/auth/sign-up", primary: false },
];

/// Account links for signed-in users.
pub const SIGNED_IN_LINKS: [NavLink; 3] = [
    NavLink { label: "Account Settings", href: "/account/settings", primary: true },
    NavLink { label: "Security", href: "/account/security", primary: false },
    NavLink { label: "Sessions", href: "/account/security", primary: false },
];

/// Profile summary shown on the home page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileSummary {
    pub display_name: String,
    pub email: Option<String>,
    pub image: Option<String>,
    pub initials: String,
}

/// What the home page renders in its auth section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HomeView {
    Loading,
    SignedOut { links: &'static [NavLink] },
    SignedIn { profile: ProfileSummary, links: &'static [NavLink] },
}

impl HomeView {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        if snapshot.loading {
            return Self::Loading;
        }
        match &snapshot.session {
            None => Self::SignedOut { links: &SIGNED_OUT_LINKS },
            Some(session) => Self::SignedIn {
                profile: ProfileSummary {
                    display_name: session.user.display_name(DEFAULT_USER_LABEL).to_owned(),
                    email: session.user.email.clone(),
                    image: session.user.image.clone(),
                    initials: session.user.initials(),
                },
                links: &SIGNED_IN_LINKS,
            },
        }
    }
}

/// A card in the features grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 5] = [
    Feature {
        icon: "🔐",
        title: "Email & Password",
        description: "Traditional email/password authentication with secure password hashing.",
    },
    Feature { icon: "🌐", title: "Social Login", description: "Sign in with GitHub or Google OAuth providers." },
    Feature { icon: "🔑", title: "Password Recovery", description: "Secure password reset via email verification." },
    Feature {
        icon: "📱",
        title: "Session Management",
        description: "View and manage active sessions across devices.",
    },
    Feature {
        icon: "⚡",
        title: "Powered by Neon",
        description: "Built on Neon's serverless Postgres with instant scaling.",
    },
];

/// External footer links.
pub const FOOTER_LINKS: [(&str, &str); 3] = [
    ("Documentation", "https://neon.com/docs/neon-auth"),
    ("GitHub", "https://github.com/neondatabase/neon-js"),
    ("Neon", "https://neon.com"),
];
