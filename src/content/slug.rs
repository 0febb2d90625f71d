//! Title to URL slug conversion

/// Punctuation removed outright before any other substitution
const STRIPPED: [char; 9] = ['.', ',', ':', ';', '!', '?', '^', '\'', '"'];

/// Accented Latin letters and their ASCII replacement
const ACCENTS: [(char, char); 16] = [
    ('ç', 'c'),
    ('à', 'a'),
    ('â', 'a'),
    ('é', 'e'),
    ('è', 'e'),
    ('ê', 'e'),
    ('ë', 'e'),
    ('î', 'i'),
    ('ï', 'i'),
    ('ô', 'o'),
    ('ö', 'o'),
    ('ù', 'u'),
    ('û', 'u'),
    ('ü', 'u'),
    ('ÿ', 'y'),
    (' ', '-'),
];

/// Build the slug of a post title
///
/// Characters that survive punctuation stripping and accent folding but are
/// still outside `[a-z0-9-]` become `0` rather than being dropped.
///
/// # Examples
/// ```ignore
/// make_slug("Ça c'est pas bien") // -> "ca-cest-pas-bien"
/// ```
pub fn make_slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .map(fold)
        .collect()
}

fn fold(c: char) -> char {
    if let Some((_, ascii)) = ACCENTS.iter().find(|(accented, _)| *accented == c) {
        return *ascii;
    }

    match c {
        'a'..='z' | '0'..='9' | '-' => c,
        _ => '0',
    }
}
