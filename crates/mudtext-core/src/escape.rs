//! `$NAME` placeholder substitution for locale strings.

use regex::{Captures, Regex};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::BuildHasher;

fn placeholder_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\$|\$[0-9_A-Z]+").expect("valid regex"))
}

/// Replaces `$NAME` placeholders with entries of `values` (keys include the leading `$`).
///
/// `$$` always becomes a literal `$`. Placeholders without an entry are left as they are.
pub fn parse<K, V, S>(html: &str, values: &HashMap<K, V, S>) -> String
where
    K: Borrow<str> + std::hash::Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    placeholder_regex()
        .replace_all(html, |caps: &Captures<'_>| {
            let matched = &caps[0];
            if matched == "$$" {
                return "$".to_string();
            }
            match values.get(matched) {
                Some(value) => value.as_ref().to_string(),
                None => matched.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn substitutes_known_names_and_collapses_dollar_pairs() {
        let values = HashMap::from([("$NAME".to_string(), "Bob".to_string())]);
        assert_eq!(
            parse("Hi $NAME, cost is $$5", &values),
            "Hi Bob, cost is $5"
        );
    }

    #[test]
    fn unknown_names_and_lowercase_are_left_alone() {
        let values: HashMap<&str, &str> = HashMap::new();
        assert_eq!(parse("$GOLD $gold $ $", &values), "$GOLD $gold $ $");
    }

    #[test]
    fn matches_are_maximal_runs() {
        let values = HashMap::from([("$A", "x"), ("$AB", "y"), ("$A_1", "z")]);
        assert_eq!(parse("$AB $A $A_1 $A-", &values), "y x z x-");
    }

    #[test]
    fn dollar_pair_wins_over_a_following_name() {
        let values = HashMap::from([("$NAME", "Bob")]);
        assert_eq!(parse("$$NAME $$$NAME", &values), "$NAME $Bob");
    }

    #[test]
    fn replacement_values_are_not_rescanned() {
        let values = HashMap::from([("$A", "$B"), ("$B", "oops")]);
        assert_eq!(parse("$A", &values), "$B");
    }

    #[test]
    fn accepts_fx_hash_maps() {
        let mut values: FxHashMap<String, String> = FxHashMap::default();
        values.insert("$HP".to_string(), "42".to_string());
        assert_eq!(parse("HP: $HP", &values), "HP: 42");
    }

    #[test]
    fn empty_mapping_only_collapses_dollar_pairs() {
        let values: HashMap<String, String> = HashMap::new();
        let inputs = ["", "plain", "$$", "a$$b$$$c", "$X$$Y", "<span>$$</span>"];
        for s in inputs {
            assert_eq!(parse(s, &values), s.replace("$$", "$"), "{s:?}");
        }
    }
}
