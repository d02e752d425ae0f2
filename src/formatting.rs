//! Document and plate formatting
//!
//! Brazilian driver documents are stored masked: a CPF (11 digits) as
//! `XXX.XXX.XXX-XX` and a CNPJ (14 digits) as `XX.XXX.XXX/XXXX-XX`. Plates come
//! in the legacy `AAA-9999` layout or the Mercosul `AAA9A99` layout. This module
//! also holds the random generators the simulation feed uses for demo traffic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const CPF_GROUPS: [(usize, Option<char>); 4] = [(3, None), (3, Some('.')), (3, Some('.')), (2, Some('-'))];
const CNPJ_GROUPS: [(usize, Option<char>); 5] =
    [(2, None), (3, Some('.')), (3, Some('.')), (4, Some('/')), (2, Some('-'))];

/// Number of digits in a complete CPF
pub const CPF_DIGITS: usize = 11;

/// Number of digits in a complete CNPJ
pub const CNPJ_DIGITS: usize = 14;

const FIRST_NAMES: [&str; 8] =
    ["João", "Maria", "Pedro", "Ana", "Carlos", "Mariana", "Lucas", "Julia"];
const LAST_NAMES: [&str; 8] =
    ["Silva", "Souza", "Oliveira", "Santos", "Pereira", "Costa", "Martins", "Almeida"];

/// Keep only the ASCII digits of a value
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mask a CPF or CNPJ as it is typed
///
/// Up to 11 digits are masked as a CPF, anything longer as a CNPJ (extra
/// digits past 14 are dropped). Partial input gets a partial mask, so
/// `"1234"` becomes `"123.4"`.
pub fn format_document(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() <= CPF_DIGITS {
        apply_mask(&digits, &CPF_GROUPS)
    } else {
        apply_mask(&digits, &CNPJ_GROUPS)
    }
}

fn apply_mask(digits: &str, groups: &[(usize, Option<char>)]) -> String {
    let mut out = String::with_capacity(digits.len() + groups.len());
    let mut rest = digits;
    for (width, separator) in groups {
        if rest.is_empty() {
            break;
        }
        let take = (*width).min(rest.len());
        if let Some(sep) = separator {
            out.push(*sep);
        }
        out.push_str(&rest[..take]);
        rest = &rest[take..];
    }
    out
}

/// Whether a document holds a complete CPF or CNPJ
pub fn is_complete_document(value: &str) -> bool {
    matches!(digits_only(value).len(), CPF_DIGITS | CNPJ_DIGITS)
}

/// Recognized plate layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateFormat {
    /// Three letters, a dash and four digits (`ABC-1234`)
    Legacy,
    /// Three letters, a digit, a letter and two digits (`ABC1D23`)
    Mercosul,
    /// Anything else; plates are free-form
    Unrecognized,
}

impl fmt::Display for PlateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlateFormat::Legacy => write!(f, "legacy"),
            PlateFormat::Mercosul => write!(f, "Mercosul"),
            PlateFormat::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Trim and uppercase a plate
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Detect the layout of a plate (case-insensitive)
pub fn detect_plate_format(plate: &str) -> PlateFormat {
    let chars: Vec<char> = normalize_plate(plate).chars().collect();
    let letter = |c: &char| c.is_ascii_uppercase();
    let digit = |c: &char| c.is_ascii_digit();

    match chars.as_slice() {
        [a, b, c, '-', d1, d2, d3, d4]
            if [a, b, c].into_iter().all(letter) && [d1, d2, d3, d4].into_iter().all(digit) =>
        {
            PlateFormat::Legacy
        }
        [a, b, c, d1, l, d2, d3]
            if [a, b, c, l].into_iter().all(letter) && [d1, d2, d3].into_iter().all(digit) =>
        {
            PlateFormat::Mercosul
        }
        _ => PlateFormat::Unrecognized,
    }
}

fn random_letter<R: Rng>(rng: &mut R) -> char {
    char::from(b'A' + rng.gen_range(0..26u8))
}

fn random_digit<R: Rng>(rng: &mut R) -> char {
    char::from(b'0' + rng.gen_range(0..10u8))
}

/// Random Mercosul plate (`AAA9A99`)
pub fn random_mercosul_plate<R: Rng>(rng: &mut R) -> String {
    let mut plate = String::with_capacity(7);
    for _ in 0..3 {
        plate.push(random_letter(rng));
    }
    plate.push(random_digit(rng));
    plate.push(random_letter(rng));
    for _ in 0..2 {
        plate.push(random_digit(rng));
    }
    plate
}

/// Random legacy plate (`AAA-9999`)
pub fn random_legacy_plate<R: Rng>(rng: &mut R) -> String {
    let mut plate = String::with_capacity(8);
    for _ in 0..3 {
        plate.push(random_letter(rng));
    }
    plate.push('-');
    for _ in 0..4 {
        plate.push(random_digit(rng));
    }
    plate
}

/// Random plate, Mercosul or legacy with equal odds
pub fn random_plate<R: Rng>(rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        random_mercosul_plate(rng)
    } else {
        random_legacy_plate(rng)
    }
}

/// Random driver name from a small pool of common names
pub fn random_driver_name<R: Rng>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{} {}", first, last)
}

/// Random, formatted 11-digit CPF (check digits are not computed)
pub fn random_cpf<R: Rng>(rng: &mut R) -> String {
    let digits: String = (0..CPF_DIGITS).map(|_| random_digit(rng)).collect();
    format_document(&digits)
}
