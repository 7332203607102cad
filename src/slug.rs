//! URL slugs for products and categories.

use std::collections::HashSet;

const FALLBACK: &str = "item";

fn fold(c: char) -> Option<char> {
    let folded = match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        c if c.is_ascii_alphanumeric() => c,
        _ => return None,
    };
    Some(folded)
}

pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        match fold(c) {
            Some(c) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            }
            None => pending_dash = true,
        }
    }
    if slug.is_empty() {
        FALLBACK.to_string()
    } else {
        slug
    }
}

/// First of `base`, `base-2`, `base-3`, ... not present in `taken`.
pub fn unique_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_accents_and_separators() {
        assert_eq!(slugify("Balón de fútbol"), "balon-de-futbol");
        assert_eq!(slugify("  Guantes  de BOX!! "), "guantes-de-box");
        assert_eq!(slugify("Niño/Niña 2024"), "nino-nina-2024");
        assert_eq!(slugify("***"), "item");
    }

    #[test]
    fn colliding_names_get_numeric_suffix() {
        let mut taken = HashSet::new();
        assert_eq!(unique_slug("balon", &taken), "balon");

        taken.insert("balon".to_string());
        assert_eq!(unique_slug("balon", &taken), "balon-2");

        taken.insert("balon-2".to_string());
        taken.insert("balon-3".to_string());
        assert_eq!(unique_slug("balon", &taken), "balon-4");
    }
}
