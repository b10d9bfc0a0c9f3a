//! Name normalisation helpers used by repositories and code generation.
//!
//! Every normaliser here is idempotent: applying it to its own output returns
//! the output unchanged.

/// Joins the alphanumeric words of `raw`, upper-casing the first letter of
/// each word and keeping the rest as written.
///
/// # Examples
/// ```
/// use graph_miner_core::naming::camel_words;
///
/// assert_eq!(camel_words("veillonella parvula"), "VeillonellaParvula");
/// assert_eq!(camel_words("Paenibacillus_sp._MAEPY2"), "PaenibacillusSpMAEPY2");
/// ```
#[must_use]
pub fn camel_words(raw: &str) -> String {
    raw.split(|character: char| !character.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(capitalise)
        .collect()
}

/// Keeps only ASCII alphanumerics of `raw`, lower-cased.
///
/// # Examples
/// ```
/// use graph_miner_core::naming::lower_alphanumeric;
///
/// assert_eq!(lower_alphanumeric("soc-Karate"), "sockarate");
/// ```
#[must_use]
pub fn lower_alphanumeric(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|character| character.to_ascii_lowercase())
        .collect()
}

/// Keeps only ASCII alphanumerics of `raw`, upper-cased.
///
/// # Examples
/// ```
/// use graph_miner_core::naming::upper_alphanumeric;
///
/// assert_eq!(upper_alphanumeric("ctd-dda"), "CTDDDA");
/// ```
#[must_use]
pub fn upper_alphanumeric(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|character| character.to_ascii_uppercase())
        .collect()
}

/// Converts a stored graph name into a `snake_case` identifier.
///
/// Word boundaries are inserted at runs of non-alphanumerics, before an
/// upper-case letter that follows a lower-case letter, and before the last
/// capital of an acronym that starts a new word (`"PPIGraph"` becomes
/// `ppi_graph`). Identifiers that would start with a digit are prefixed with
/// `graph_`.
///
/// # Examples
/// ```
/// use graph_miner_core::naming::snake_case;
///
/// assert_eq!(snake_case("VeillonellaParvula"), "veillonella_parvula");
/// assert_eq!(snake_case("KGCOVID19"), "kgcovid19");
/// assert_eq!(snake_case("CTD-DDA"), "ctd_dda");
/// assert_eq!(snake_case("3DGraph"), "graph_3d_graph");
/// ```
#[must_use]
pub fn snake_case(raw: &str) -> String {
    let characters: Vec<char> = raw.chars().collect();
    let mut snake = String::with_capacity(raw.len() + 4);
    let mut pending_separator = false;
    for (position, &character) in characters.iter().enumerate() {
        if !character.is_ascii_alphanumeric() {
            pending_separator = !snake.is_empty();
            continue;
        }
        let previous = position
            .checked_sub(1)
            .and_then(|before| characters.get(before))
            .copied();
        let next = characters.get(position + 1).copied();
        if character.is_ascii_uppercase() && !snake.is_empty() {
            let after_lower = previous.is_some_and(|before| before.is_ascii_lowercase());
            let acronym_end = previous.is_some_and(|before| before.is_ascii_uppercase())
                && next.is_some_and(|after| after.is_ascii_lowercase());
            pending_separator |= after_lower || acronym_end;
        }
        if pending_separator {
            snake.push('_');
            pending_separator = false;
        }
        snake.push(character.to_ascii_lowercase());
    }
    if snake.starts_with(|character: char| character.is_ascii_digit()) {
        snake.insert_str(0, "graph_");
    }
    snake
}

fn capitalise(word: &str) -> String {
    let mut characters = word.chars();
    characters.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + characters.as_str()
    })
}
