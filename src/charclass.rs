//! Character classification shared by several operations: the fixed
//! "special character" set (spec.md §4.4), and the `min`/`max`/`has`
//! counting categories.

pub const SPECIAL_CHARS: &[char] = &[
    '<', '>', '|', ',', ';', '.', ':', '_', '#', '\'', '+', '*', '~', '@', '€', '²', '³', '`',
    '^', '°', '!', '"', '§', '$', '%', '&', '/', '(', ')', '[', ']', '{', '}', '\\', '-',
];

pub fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

pub fn all_special(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_special)
}

/// The category argument shared by `min`, `max`, and `has`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    Length,
    Lower,
    Upper,
    Numeric,
    Letter,
    Symbol,
    NonLetter,
    Unique,
}

impl CountKind {
    pub fn parse(s: &str) -> Option<CountKind> {
        Some(match s {
            "length" => CountKind::Length,
            "lower" => CountKind::Lower,
            "upper" => CountKind::Upper,
            "numeric" => CountKind::Numeric,
            "letter" => CountKind::Letter,
            "symbol" => CountKind::Symbol,
            "non_letter" => CountKind::NonLetter,
            "unique" => CountKind::Unique,
            _ => return None,
        })
    }

    pub fn count(&self, s: &str) -> usize {
        match self {
            CountKind::Length => s.chars().count(),
            CountKind::Lower => s.chars().filter(|c| c.is_lowercase()).count(),
            CountKind::Upper => s.chars().filter(|c| c.is_uppercase()).count(),
            CountKind::Numeric => s.chars().filter(|c| is_digit(*c)).count(),
            CountKind::Letter => s.chars().filter(|c| is_letter(*c)).count(),
            CountKind::Symbol => s.chars().filter(|c| is_special(*c)).count(),
            CountKind::NonLetter => s.chars().filter(|c| !is_letter(*c)).count(),
            CountKind::Unique => {
                use fnv::FnvHashSet;
                let set: FnvHashSet<char> = s.chars().collect();
                set.len()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_categories() {
        assert_eq!(CountKind::Letter.count("a1b2"), 2);
        assert_eq!(CountKind::Numeric.count("a1b2"), 2);
        assert_eq!(CountKind::Unique.count("aabbcc"), 3);
    }
}
