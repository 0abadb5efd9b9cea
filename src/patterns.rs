use lazy_static::lazy_static;
use regex::Regex;

/// NATO reporting names, in scan order.
pub const NATO_CODENAMES: &[&str] = &[
    "Flanker", "Fulcrum", "Fishbed", "Frogfoot", "Bear", "Backfire", "Blackjack", "Hind", "Hip",
    "Havoc", "Hokum", "Flogger", "Foxbat", "Fishcan", "Finback", "Grumble", "Guideline", "Gimlet",
    "Grail", "Sovremenny", "Udaloy", "Krivak", "Akula", "Oscar", "Typhoon", "Yankee", "Delta",
    "Kilo", "Victor", "Charlie", "Echo",
];

/// Manufacturer name fragments, in scan order.
pub const MANUFACTURERS: &[&str] = &[
    "Boeing", "Lockheed", "Northrop", "General", "Raytheon", "McDonnell", "Sikorsky", "Bell",
    "Airbus", "Dassault", "Sukhoi", "MiG", "Tupolev", "Antonov", "Kamov", "Mil", "MTU",
    "Rolls-Royce", "Pratt", "Whitney", "Waukesha",
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("constant pattern should compile")
}

lazy_static! {
    /// A calibre followed by a barrel length, like `127mm/54`
    pub static ref CALIBRE_SLASH: Regex = compile(r"\d+mm/");

    pub static ref CHINESE_PREFIX: Regex = compile(r"^(J|JH|H|Y|Z|Q|K|JZ)-\d+");
    pub static ref CHINESE_TYPE: Regex = compile(r"Type \d+");
    pub static ref CHINESE_FAMILY: Regex = compile(r"(HQ|PL|YJ|CJ|DF|CSS)-");

    pub static ref RUSSIAN_PREFIX: Regex = compile(r"^(Su|MiG|Tu|Il|An|Mi|Ka)-\d+");
    pub static ref RUSSIAN_PROJECT: Regex = compile(r"Pr\.\d+");
    pub static ref RUSSIAN_FAMILY: Regex = compile(r"(PLA|SS|SA|AT)-");

    /// A hull designation, like `DDG 51 `
    pub static ref HULL_NUMBER: Regex = compile(r"^[A-Z]+\s+\d+\s+");

    pub static ref YEAR: Regex = compile(r"\b(19|20)\d{2}\b");
    pub static ref QUANTITY: Regex = compile(r"\d+x");
}

/// Find the first entry of `needles` that occurs in `haystack`.
pub fn first_contained(needles: &'static [&'static str], haystack: &str) -> Option<&'static str> {
    needles.iter().copied().find(|n| haystack.contains(n))
}
