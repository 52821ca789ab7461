//! Column references in free-text business rules.

/// Names from `candidates` mentioned as whole words in `rule` (case-insensitive).
///
/// `own_name` is never reported. Order follows `candidates`.
pub fn referenced_columns<'a, I>(rule: &str, candidates: I, own_name: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let rule = rule.to_lowercase();
    candidates
        .into_iter()
        .filter(|name| *name != own_name && !name.trim().is_empty())
        .filter(|name| mentions(&rule, &name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Whether `name` occurs in `rule` with no word character on either side.
/// Both are already lowercase.
fn mentions(rule: &str, name: &str) -> bool {
    // Boundaries are checked by hand so names with punctuation still match
    rule.char_indices()
        .filter(|(start, _)| rule[*start..].starts_with(name))
        .any(|(start, _)| {
            let before = rule[..start].chars().next_back();
            let after = rule[start + name.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
