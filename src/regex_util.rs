use fancy_regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

use crate::language::Language;

static NOISE_AT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[:\|] ?").expect("Invalid noise_at_start pattern"));
static DOUBLE_BRACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[(?:[\w#]+\|)?([\w ]+)\]\]").expect("Invalid double_brackets pattern")
});
static BOLD_AND_ITALICS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'{2,3}").expect("Invalid bold_and_italics pattern"));
static BRACES_NOCAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|(?:\d+ )?\{\{.*nocat=1").expect("Invalid braces_nocat pattern")
});
static BRACES_NOT_CLOSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^}]+").expect("Invalid braces_not_closed pattern"));

static FR_DUMMY_SENSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:traductions|sens)?.* )?[àa] (?:trier|classer)")
        .expect("Invalid fr_dummy_sense pattern")
});

static DE_PRONOUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(er/sie/es|ich|du|er|sie|es|wir|ihr|sie)\s+").expect("Invalid de_pronouns pattern")
});
static DE_ARTICLES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(der|die|das|den|dem|des)\s+").expect("Invalid de_articles pattern")
});
static IMPERATIVE_EXCLAMATION_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!$").expect("Invalid imperative_exclamation_mark pattern"));

fn replace_all<'t>(pattern: &Regex, text: Cow<'t, str>, rep: &str) -> Cow<'t, str> {
    let replaced = match pattern.replace_all(&text, rep) {
        Cow::Owned(replaced) => Some(replaced),
        Cow::Borrowed(_) => None,
    };
    match replaced {
        Some(replaced) => Cow::Owned(replaced),
        None => text,
    }
}

/// Strips the wiki markup that leaks into senses and translations.
pub fn clean_wiki_syntax(text: &str) -> String {
    let text = Cow::Borrowed(text);
    let text = replace_all(&NOISE_AT_START, text, "");
    let text = replace_all(&DOUBLE_BRACKETS, text, "$1");
    let text = replace_all(&BOLD_AND_ITALICS, text, "");
    let text = replace_all(&BRACES_NOCAT, text, "");
    let text = replace_all(&BRACES_NOT_CLOSED, text, "");
    text.trim().to_string()
}

/// Placeholder senses like "Traductions à trier" that group unsorted translations.
pub fn is_dummy_sense(sense: &str, lang: Language) -> bool {
    match lang {
        Language::Fr => FR_DUMMY_SENSE.is_match(sense).unwrap_or(false),
        _ => false,
    }
}

/// Removes the words around an inflected form that are not part of it
/// (`er/sie/es geht` -> `geht`).
pub fn clean_inflection(form: &str, lang: Language) -> String {
    match lang {
        Language::De => {
            let form = Cow::Borrowed(form);
            let form = replace_all(&DE_PRONOUNS, form, "");
            let form = replace_all(&DE_ARTICLES, form, "");
            replace_all(&IMPERATIVE_EXCLAMATION_MARK, form, "").into_owned()
        }
        _ => form.to_string(),
    }
}

#[cfg(test)]
mod regex_util {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bold_and_italics() {
        assert_eq!(
            clean_wiki_syntax("Brunnen mit ''Spring''fontänen"),
            "Brunnen mit Springfontänen"
        );
        assert_eq!(
            clean_wiki_syntax("'''V'''ereinte '''N'''ationen"),
            "Vereinte Nationen"
        );
        // single ticks are apostrophes
        assert_eq!(clean_wiki_syntax("Karl's test case"), "Karl's test case");
    }

    #[test]
    fn noise_at_start() {
        assert_eq!(clean_wiki_syntax(": Gesamtheit, alle "), "Gesamtheit, alle");
        assert_eq!(clean_wiki_syntax("|Gesamtheit"), "Gesamtheit");
    }

    #[test]
    fn double_brackets() {
        assert_eq!(
            clean_wiki_syntax("Qui est en [[âge]] de se [[marier]]"),
            "Qui est en âge de se marier"
        );
        assert_eq!(clean_wiki_syntax("Voir [[sauter#fr|sauter]]"), "Voir sauter");
        assert_eq!(clean_wiki_syntax("[[bloc de béton]]"), "bloc de béton");
    }

    #[test]
    fn braces() {
        assert_eq!(
            clean_wiki_syntax("Saillir une femelle (la féconder).|9 {{trans|nocat=1"),
            "Saillir une femelle (la féconder)."
        );
        assert_eq!(clean_wiki_syntax("laufen {{unvollständig"), "laufen");
    }

    #[test]
    fn dummy_sense() {
        let dummies = [
            "Traductions à trier suivant le sens",
            "Traductions à trier suivant le sens.",
            "Traductions à trier",
            "À trier",
            "à trier",
            "Traduction à trier",
            "Traductions à vérifier et à trier",
            "À trier selon le sens",
            "Traductions à classer d’après le sens",
            "traduction à classer",
            "A trier",
            "Autres sens à trier",
        ];
        for d in dummies {
            assert!(is_dummy_sense(d, Language::Fr), "{d}");
        }
        assert!(!is_dummy_sense("Le sense", Language::Fr));
    }

    #[test]
    fn inflection_de() {
        assert_eq!(clean_inflection("er/sie/es geht", Language::De), "geht");
        assert_eq!(clean_inflection("wirf!", Language::De), "wirf");
        assert_eq!(clean_inflection("die Bäume", Language::De), "Bäume");
        assert_eq!(clean_inflection("die Bäume", Language::En), "die Bäume");
    }
}
