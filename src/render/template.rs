// ABOUTME: Flat placeholder substitution for manifest text.
// ABOUTME: Supports $NAME and ${NAME}; unknown placeholders are left untouched.

use std::collections::BTreeMap;

/// Substitute `$NAME` and `${NAME}` tokens with values from `placeholders`.
///
/// Names consist of ASCII letters, digits and underscores; `$NAME` takes the
/// longest such run. Tokens without a mapping are copied exactly as written so
/// a later stage can substitute them, and a `$` that does not start a token is
/// kept as-is. Substituted values are not rescanned.
pub fn render(text: &str, placeholders: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match Token::parse(after) {
            Some(token) => {
                match placeholders.get(token.name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[pos..pos + 1 + token.len]),
                }
                rest = &after[token.len..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// A placeholder reference following a `$`.
struct Token<'a> {
    name: &'a str,
    /// Bytes consumed after the `$`, braces included.
    len: usize,
}

impl<'a> Token<'a> {
    fn parse(s: &'a str) -> Option<Self> {
        if let Some(inner) = s.strip_prefix('{') {
            let end = inner.find('}')?;
            let name = &inner[..end];
            if name.is_empty() || !name.bytes().all(is_name_byte) {
                return None;
            }
            return Some(Token { name, len: end + 2 });
        }

        let len = s.bytes().take_while(|b| is_name_byte(*b)).count();
        (len > 0).then(|| Token {
            name: &s[..len],
            len,
        })
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_both_forms() {
        let p = map(&[("APP", "api"), ("TAG", "v1")]);
        assert_eq!(render("name: $APP\nimage: ${APP}:${TAG}", &p), "name: api\nimage: api:v1");
    }

    #[test]
    fn unknown_tokens_are_kept_verbatim() {
        let p = map(&[("APP", "api")]);
        assert_eq!(render("$OTHER ${OTHER} ${APP}", &p), "$OTHER ${OTHER} api");
    }

    #[test]
    fn bare_name_is_greedy() {
        let p = map(&[("APP", "api")]);
        assert_eq!(render("$APP_NAME", &p), "$APP_NAME");
        assert_eq!(render("${APP}_NAME", &p), "api_NAME");
    }

    #[test]
    fn stray_dollars_survive() {
        let p = map(&[("A", "x")]);
        assert_eq!(render("cost: $5 and $ and ${ and ${} and ${a-b}", &p), "cost: $5 and $ and ${ and ${} and ${a-b}");
        assert_eq!(render("trailing $", &p), "trailing $");
    }

    #[test]
    fn values_are_not_rescanned() {
        let p = map(&[("A", "$B"), ("B", "nope")]);
        assert_eq!(render("${A}", &p), "$B");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let text = "apiVersion: apps/v1\nkind: Deployment\n";
        assert_eq!(render(text, &map(&[("A", "x")])), text);
    }

    #[test]
    fn handles_multibyte_text() {
        let p = map(&[("GREETING", "héllo")]);
        assert_eq!(render("ünïcode ${GREETING} ✓", &p), "ünïcode héllo ✓");
    }
}
