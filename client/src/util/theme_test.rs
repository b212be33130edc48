use super::*;

#[test]
fn parse_accepts_stored_values() {
    assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
    assert_eq!(Theme::parse(" light "), Some(Theme::Light));
    assert_eq!(Theme::parse("system"), None);
}

#[test]
fn toggled_flips_and_icon_points_at_next() {
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
    assert_eq!(Theme::Light.toggle_icon(), "☾");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn read_preference_is_light_outside_browser() {
    assert_eq!(read_preference(), Theme::Light);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn toggle_returns_next_theme() {
    assert_eq!(toggle(Theme::Light), Theme::Dark);
    assert_eq!(toggle(Theme::Dark), Theme::Light);
}
