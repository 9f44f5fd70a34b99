/// Trailing name tokens dropped before building a name key
const GENERATIONAL_SUFFIXES: [&str; 6] = ["jr", "sr", "ii", "iii", "iv", "v"];

/// Normalize an optional player name
///
/// Missing names normalize to the empty string.
pub fn normalize(name: Option<&str>) -> String {
    name.map(normalize_str).unwrap_or_default()
}

/// Normalize a player name into a lookup key
///
/// Keeps only ASCII letters and digits, lowercased. Trailing generational
/// suffixes ("Jr.", "III") are dropped as long as another token remains.
/// Accented letters are dropped rather than folded, so "José" becomes "jos".
///
/// The result is always a single `[a-z0-9]*` token, which makes the
/// function idempotent.
pub fn normalize_str(name: &str) -> String {
    let mut tokens: Vec<String> =
        name.split_whitespace().map(strip_token).filter(|token| !token.is_empty()).collect();

    while tokens.len() > 1
        && tokens.last().is_some_and(|token| GENERATIONAL_SUFFIXES.contains(&token.as_str()))
    {
        tokens.pop();
    }

    tokens.concat()
}

/// Normalized name, or `None` when nothing usable is left
///
/// The empty string is never a valid key.
pub fn name_key(name: Option<&str>) -> Option<String> {
    let key = normalize(name);
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

fn strip_token(token: &str) -> String {
    token.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_lowercase()).collect()
}
