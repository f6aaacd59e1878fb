//! Turning table names into Rust names.
use itertools::Itertools;

/// Words which can't be used as plain identifiers.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct",
    "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// The singular of an English plural, for the plurals which show up in table names.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let strip = |n: usize, add: &str| format!("{}{}", &word[..word.len() - n], add);

    if lower.ends_with("ies") && word.len() > 3 {
        strip(3, "y")
    } else if ["sses", "xes", "zes", "ches", "shes"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        strip(2, "")
    } else if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") && word.len() > 1 {
        strip(1, "")
    } else {
        word.to_string()
    }
}

/// Split on spaces, underscores and hyphens, dropping empty words.
fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c| c == ' ' || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
}

/// `user_edited_histories` becomes `user_edited_history`.  Only the last word is singularised.
pub fn singular_snake_case(table: &str) -> String {
    let words = words(table).map(|w| w.to_ascii_lowercase()).collect::<Vec<_>>();
    match words.split_last() {
        Some((last, rest)) => rest
            .iter()
            .cloned()
            .chain(std::iter::once(singularize(last)))
            .join("_"),
        None => String::new(),
    }
}

pub fn to_pascal_case(name: &str) -> String {
    words(name)
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `user_edited_histories` becomes `UserEditedHistory`.
pub fn struct_name(table: &str) -> String {
    to_pascal_case(&singular_snake_case(table))
}

/// Name of the module holding the model for `table`, which is also the stem of its file.
pub fn module_name(table: &str) -> String {
    singular_snake_case(table)
}

/// Words which can't be identifiers at all, not even raw ones.
const RESERVED: &[&str] = &["_", "self", "Self", "super", "crate"];

/// Whether `name` can name a field or module, possibly as a raw identifier.  Only ASCII names are accepted.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() || c == '_',
        None => false,
    };
    starts_well && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !RESERVED.contains(&name)
}

/// A usable identifier for `name`, as a raw identifier if it is a keyword.
pub fn escape_identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}
