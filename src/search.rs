use tracing::trace;

use crate::fold;

/// Normalize search text without changing case.
///
/// Folds katakana to hiragana, full-width letters and digits to ASCII and the
/// ideographic space to a regular space, then collapses whitespace runs and
/// trims (e.g., "ＡＢＣ　ツール" -> "ABC つーる").
pub fn normalize_query(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(fold::katakana_to_hiragana)
        .map(fold::fullwidth_to_ascii)
        .map(|c| if c == fold::IDEOGRAPHIC_SPACE { ' ' } else { c })
        .collect();
    fold::collapse_whitespace(&folded)
}

/// Normalize corpus text: lowercase first, then [`normalize_query`].
///
/// Lowercasing runs before the width fold so "Ｔｏｏｌ" ends up as "tool".
pub fn normalize_target(text: &str) -> String {
    normalize_query(&text.to_lowercase())
}

/// Normalize a user query for matching.
/// Returns None when the query is blank, meaning "no filter".
pub fn prepare_query(query: &str) -> Option<String> {
    let trimmed = query.trim_matches(fold::is_search_whitespace);
    if trimmed.is_empty() {
        None
    } else {
        Some(normalize_query(&trimmed.to_lowercase()))
    }
}

/// Check whether `target` contains `query` after normalizing both sides.
/// A blank query matches everything.
pub fn is_match(target: &str, query: &str) -> bool {
    match prepare_query(query) {
        Some(prepared) => is_match_prepared(target, &prepared),
        None => true,
    }
}

/// Like [`is_match`], treating an absent query as a blank one.
pub fn is_match_opt(target: &str, query: Option<&str>) -> bool {
    query.map_or(true, |q| is_match(target, q))
}

/// Match against a query already passed through [`prepare_query`].
pub fn is_match_prepared(target: &str, prepared: &str) -> bool {
    normalize_target(target).contains(prepared)
}

/// Keep the items where any of the text fields returned by `fields` matches
/// `query`. Input order is preserved; a blank query keeps every item.
pub fn filter<'a, T, F, I>(items: impl IntoIterator<Item = &'a T>, query: &str, fields: F) -> Vec<&'a T>
where
    T: 'a + ?Sized,
    F: Fn(&'a T) -> I,
    I: IntoIterator<Item = &'a str>,
{
    let Some(prepared) = prepare_query(query) else {
        return items.into_iter().collect();
    };

    let matched: Vec<&T> = items
        .into_iter()
        .filter(|item| {
            fields(*item)
                .into_iter()
                .any(|text| is_match_prepared(text, &prepared))
        })
        .collect();

    trace!(query = %prepared, matched = matched.len(), "filtered candidates");
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_query_katakana() {
        assert_eq!(normalize_query("カタカナ"), "かたかな");
        assert_eq!(normalize_query("ア"), "あ");
        assert_eq!(normalize_query("サイコロゲーム"), "さいころげーむ");
    }

    #[test]
    fn test_normalize_query_fullwidth() {
        assert_eq!(normalize_query("ＡＢＣ１２３"), "ABC123");
        assert_eq!(normalize_query("ａｂｃ"), "abc");
        // Case is preserved
        assert_eq!(normalize_query("Tool"), "Tool");
        // Full-width punctuation is left alone
        assert_eq!(normalize_query("ＯＧＰ！"), "OGP！");
    }

    #[test]
    fn test_normalize_query_whitespace() {
        assert_eq!(normalize_query("foo\u{3000}bar"), "foo bar");
        assert_eq!(normalize_query("foo   bar"), "foo bar");
        assert_eq!(normalize_query("  foo \u{3000} bar\t"), "foo bar");
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query("\u{3000}\u{3000}"), "");
    }

    #[test]
    fn test_normalize_target_lowercases_before_width_fold() {
        assert_eq!(normalize_target("ABC Tool"), "abc tool");
        assert_eq!(normalize_target("ＡＢＣ"), "abc");
        assert_eq!(normalize_target("ＯＧＰチェッカー"), "ogpちぇっかー");
    }

    #[test]
    fn test_prepare_query() {
        assert_eq!(prepare_query(""), None);
        assert_eq!(prepare_query(" \t "), None);
        assert_eq!(prepare_query("\u{3000}"), None);
        assert_eq!(prepare_query("\u{FEFF}"), None);
        assert_eq!(prepare_query("\u{FEFF}ダイス\u{FEFF}"), Some("だいす".to_string()));
        assert_eq!(prepare_query(" ＡＢＣ "), Some("abc".to_string()));
        assert_eq!(prepare_query("ワリカン"), Some("わりかん".to_string()));
    }

    #[test]
    fn test_is_match() {
        assert!(is_match("サイコロゲーム", "さいころ"));
        assert!(is_match("さいころゲーム", "サイコロ"));
        assert!(is_match("ABC Tool", "abc"));
        assert!(is_match("ABC Tool", "ＡＢＣ"));
        assert!(is_match("abc tool", "ABC"));
        assert!(!is_match("ABC Tool", "xyz"));
        assert!(is_match("ﾊﾟｽﾜｰﾄﾞ変換ツール", "ツール"));
        assert!(is_match("割り勘 計算", "割り勘\u{3000}計算"));
        assert!(!is_match("割り勘計算", "割り勘 計算"));
    }

    #[test]
    fn test_blank_query_matches_everything() {
        assert!(is_match("anything", ""));
        assert!(is_match("anything", "   "));
        assert!(is_match("", ""));
        assert!(is_match("dice", "\u{FEFF}"));
        assert!(is_match("dice", " \u{FEFF}\u{3000}"));
        assert!(is_match_opt("anything", None));
        assert!(is_match_opt("ABC", Some("abc")));
        assert!(!is_match_opt("ABC", Some("d")));
    }

    #[test]
    fn test_filter_preserves_order() {
        let titles = ["サイコロゲーム", "割り勘計算", "さいころ占い", "OGPチェッカー"];
        let matched = filter(titles.iter(), "サイコロ", |t| [*t]);
        assert_eq!(matched, vec![&"サイコロゲーム", &"さいころ占い"]);

        let all = filter(titles.iter(), " ", |t| [*t]);
        assert_eq!(all.len(), titles.len());

        let none = filter(titles.iter(), "zzz", |t| [*t]);
        assert!(none.is_empty());
    }

    #[test]
    fn test_filter_any_field() {
        let rows = [("Dice", "サイコロ"), ("Split", "割り勘")];
        let matched = filter(rows.iter(), "わりかん", |(a, b)| [*a, *b]);
        assert!(matched.is_empty());
        let matched = filter(rows.iter(), "割り", |(a, b)| [*a, *b]);
        assert_eq!(matched, vec![&("Split", "割り勘")]);
        let matched = filter(rows.iter(), "dice", |(a, b)| [*a, *b]);
        assert_eq!(matched, vec![&("Dice", "サイコロ")]);
    }

    proptest! {
        #[test]
        fn prop_normalize_query_idempotent(s in "\\PC*") {
            let once = normalize_query(&s);
            prop_assert_eq!(normalize_query(&once), once);
        }

        #[test]
        fn prop_normalize_query_kana_and_width_idempotent(
            s in "[\u{30A0}-\u{30FF}\u{3040}-\u{309F}\u{FF01}-\u{FF5E}\u{3000} a-zA-Z0-9]*"
        ) {
            let once = normalize_query(&s);
            prop_assert_eq!(normalize_query(&once), once);
        }

        #[test]
        fn prop_normalize_target_idempotent(
            s in "[\u{30A0}-\u{30FF}\u{FF01}-\u{FF5E}\u{3000} a-zA-Z0-9\u{C0}-\u{FF}]*"
        ) {
            let once = normalize_target(&s);
            prop_assert_eq!(normalize_target(&once), once);
        }

        #[test]
        fn prop_blank_query_matches(s in "\\PC*", blanks in "[ \t\u{3000}]*") {
            prop_assert!(is_match(&s, ""));
            prop_assert!(is_match(&s, &blanks));
        }

        #[test]
        fn prop_target_matches_itself(s in "[\u{30A1}-\u{30F6}\u{FF21}-\u{FF3A}a-z ]{1,20}") {
            prop_assert!(is_match(&s, &s));
        }

        #[test]
        fn prop_ascii_alphanumerics_untouched(s in "[a-zA-Z0-9]*") {
            prop_assert_eq!(normalize_query(&s), s);
        }
    }
}
