//! Name normalization shared by every keyword enum.

/// Lowercase and drop everything that is not a letter or digit.
///
/// `claimHex`, `claim-hex`, and `Claim Hex` all normalize to `claimhex`.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Turn a camelCase or kebab-case wire name into a title-cased label.
pub fn unslugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut start_word = true;
    for c in s.chars() {
        if c == '-' || c == '_' || c == ' ' {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
            start_word = true;
            continue;
        }
        if c.is_ascii_uppercase() && !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
        if start_word {
            out.push(c.to_ascii_uppercase());
            start_word = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Lowercase kebab-case slug, used to derive stable modifier ids.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ignores_case_and_separators() {
        assert_eq!(normalize("claimHex"), "claimhex");
        assert_eq!(normalize("claim-hex"), "claimhex");
        assert_eq!(normalize("Claim Hex"), "claimhex");
    }

    #[test]
    fn unslugify_camel_and_kebab() {
        assert_eq!(unslugify("claimHex"), "Claim Hex");
        assert_eq!(unslugify("trade-agreement"), "Trade Agreement");
        assert_eq!(unslugify("culture"), "Culture");
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Vacancy: Ruler"), "vacancy-ruler");
        assert_eq!(slugify("  Custom  "), "custom");
        assert_eq!(slugify("Ruin (Corruption)"), "ruin-corruption");
    }
}
