//! Synthetic masked email addresses for the notification feed

use crate::random::RandomSource;

pub const FIRST_NAMES: [&str; 11] = [
    "jack", "emma", "liam", "sophia", "noah", "olivia", "mason", "mia", "ethan", "ava", "lucas",
];

pub const DOMAINS: [&str; 6] = [
    "proton.me",
    "gmail.com",
    "outlook.com",
    "hotmail.com",
    "yahoo.com",
    "yahoo.co.uk",
];

const MASK: &str = "****";

/// Hide the middle of a local part, keeping a short prefix and the last char
pub fn mask_local_part(local: &str) -> String {
    let chars: Vec<char> = local.chars().collect();
    let n = chars.len();
    let prefix: String = match n {
        0 => return MASK.to_string(),
        1..=4 => return format!("{}{}", chars[0], MASK),
        5..=7 => chars[..2].iter().collect(),
        _ => chars[..4].iter().collect(),
    };
    format!("{}{}{}", prefix, MASK, chars[n - 1])
}

/// `name[NN]@domain` with the local part masked
pub fn synthetic_address<R: RandomSource>(rng: &mut R) -> String {
    let name = FIRST_NAMES[rng.index(FIRST_NAMES.len())];
    let local = if rng.next_unit() > 0.6 {
        format!("{}{}", name, (rng.next_unit() * 99.0).floor() as u32)
    } else {
        name.to_string()
    };
    let domain = DOMAINS[rng.index(DOMAINS.len())];
    format!("{}@{}", mask_local_part(&local), domain)
}
