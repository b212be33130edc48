//! Avatar image, or initials when the user has no image.

#[cfg(test)]
#[path = "user_avatar_test.rs"]
mod user_avatar_test;

use authflow::User;
use leptos::prelude::*;

/// What the avatar shows for `user`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AvatarContent {
    Image { src: String, alt: String },
    Initials(String),
}

impl AvatarContent {
    pub(crate) fn of(user: &User) -> Self {
        match user.image.as_deref().map(str::trim).filter(|src| !src.is_empty()) {
            Some(src) => Self::Image { src: src.to_owned(), alt: user.display_name("User").to_owned() },
            None => Self::Initials(user.initials()),
        }
    }
}

#[component]
pub fn UserAvatar(user: User, #[prop(into, optional)] class: String) -> impl IntoView {
    let class = format!("user-avatar {class}");
    match AvatarContent::of(&user) {
        AvatarContent::Image { src, alt } => view! { <img class=class src=src alt=alt/> }.into_any(),
        AvatarContent::Initials(initials) => view! {
            <span class=format!("{class} user-avatar--initials") aria-hidden="true">{initials}</span>
        }
        .into_any(),
    }
}
