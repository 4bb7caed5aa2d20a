//! Identifier casing and collision helpers shared by fragments, variables and
//! operation names.

/// Lower-cases the first character, leaving the rest untouched.
pub(crate) fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Upper-cases the first character, leaving the rest untouched.
pub(crate) fn uppercase_first(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Returns `base` if it is free, otherwise `base2`, `base3`, ...
pub(crate) fn with_numeric_suffix(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    (2usize..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_default()
}

pub(crate) fn indent(level: usize) -> String {
    "  ".repeat(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_character_casing() {
        assert_eq!(lowercase_first("UserProfile"), "userProfile");
        assert_eq!(lowercase_first("ID"), "iD");
        assert_eq!(uppercase_first("friendId"), "FriendId");
        assert_eq!(uppercase_first(""), "");
        assert_eq!(lowercase_first("Élan"), "élan");
    }

    #[test]
    fn test_numeric_suffix_starts_at_two() {
        let taken = ["id", "id2"];
        assert_eq!(with_numeric_suffix("id", |c| taken.contains(&c)), "id3");
        assert_eq!(with_numeric_suffix("name", |c| taken.contains(&c)), "name");
    }
}
