//! Plant type classification from file names.
//!
//! Users name their photos after the crop being grown, so a keyword match on
//! the lower-cased file name is enough to label the species. Entries are
//! checked in table order and the first match wins.

/// Label returned when no keyword matches.
pub const UNKNOWN_PLANT: &str = "Не определено";

/// Ordered `(label, keywords)` table. Append new species at the end.
const PLANT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Руккола", &["arugula", "руккола", "rucola", "rocket"]),
    ("Пшеница", &["wheat", "пшеница", "пшено"]),
];

/// Map a file name to a plant type label.
pub fn classify(file_name: &str) -> &'static str {
    let name = file_name.to_lowercase();

    PLANT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map(|(label, _)| *label)
        .unwrap_or(UNKNOWN_PLANT)
}
