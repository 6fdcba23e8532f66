//! Name rules shared by rooms, agents and simulations.

use rand::seq::SliceRandom;

const ADJECTIVES: &[&str] = &[
    "Amber", "Bold", "Brisk", "Calm", "Clever", "Cosmic", "Crimson", "Daring", "Eager", "Gentle",
    "Golden", "Hidden", "Lively", "Lucky", "Mellow", "Misty", "Nimble", "Quiet", "Rapid", "Silver",
    "Solar", "Sunny", "Swift", "Velvet", "Vivid", "Wise",
];

const NOUNS: &[&str] = &[
    "Atlas", "Beacon", "Canyon", "Comet", "Delta", "Ember", "Falcon", "Forest", "Harbor", "Horizon",
    "Island", "Lagoon", "Meadow", "Nebula", "Orbit", "Otter", "Prairie", "Quartz", "Raven", "Ridge",
    "River", "Summit", "Tundra", "Valley", "Willow", "Zephyr",
];

/// True when `name` contains only ASCII letters, digits and spaces.
pub fn is_alphanumeric(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ')
}

/// Non-blank, ASCII letters, digits, spaces and dots.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '.')
}

/// Two-word name such as "Misty Harbor".
pub fn random_name() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("Quiet");
    let noun = NOUNS.choose(&mut rng).copied().unwrap_or("Harbor");
    format!("{adjective} {noun}")
}
