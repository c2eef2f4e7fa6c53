//! Line tokenizer.
//!
//! Splits an input line on runs of whitespace. A pair of double quotes whose
//! content is made only of letters, digits, `_`, `-` and spaces is kept as
//! part of a single token with the quotes removed. Any other quote is an
//! ordinary character.

/// Whether `ch` may appear inside a quoted span.
fn is_quotable(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == ' '
}

/// Length of the quoted content starting right after an opening quote, if
/// the span is well formed.
fn quoted_span_len(rest: &[char]) -> Option<usize> {
    let end = rest.iter().position(|&c| c == '"')?;
    rest[..end].iter().all(|&c| is_quotable(c)).then_some(end)
}

/// Tokenize a command line.
///
/// `say "hello world" now` yields `["say", "hello world", "now"]`. A quoted
/// span glued to surrounding text joins that token, and `""` on its own
/// yields one empty token. Unbalanced or malformed quotes are left in place.
pub fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Tracks an open token separately from `current` so `""` survives.
    let mut in_token = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch == '"'
            && let Some(len) = quoted_span_len(&chars[i + 1..])
        {
            current.extend(&chars[i + 1..i + 1 + len]);
            in_token = true;
            i += len + 2;
            continue;
        }

        if ch.is_whitespace() {
            if in_token {
                tokens.push(std::mem::take(&mut current));
                in_token = false;
            }
        } else {
            current.push(ch);
            in_token = true;
        }
        i += 1;
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn plain_words() {
        assert_eq!(toks("add 1 2"), vec!["add", "1", "2"]);
    }

    #[test]
    fn quoted_span_is_one_token() {
        assert_eq!(
            toks(r#"say "hello world" now"#),
            vec!["say", "hello world", "now"]
        );
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(toks("").is_empty());
        assert!(toks("   \t  ").is_empty());
    }

    #[test]
    fn runs_of_whitespace_collapse() {
        assert_eq!(toks("  add \t 1    2 "), vec!["add", "1", "2"]);
    }

    #[test]
    fn internal_spaces_preserved() {
        assert_eq!(toks(r#"echo "a   b""#), vec!["echo", "a   b"]);
    }

    #[test]
    fn unicode_letters_and_hyphens_allowed() {
        assert_eq!(
            toks(r#"greet "Привет мир" "x-y_z 9""#),
            vec!["greet", "Привет мир", "x-y_z 9"]
        );
    }

    #[test]
    fn unmatched_quote_left_untouched() {
        assert_eq!(toks(r#"say "hello world"#), vec!["say", "\"hello", "world"]);
    }

    #[test]
    fn disallowed_character_leaves_quotes() {
        assert_eq!(toks(r#"say "a.b c""#), vec!["say", "\"a.b", "c\""]);
    }

    #[test]
    fn failed_opener_does_not_hide_later_span() {
        // The first quote cannot pair with the second (a `!` sits between),
        // so the second quote opens a valid span.
        assert_eq!(toks(r#"x "a! "b c""#), vec!["x", "\"a!", "b c"]);
    }

    #[test]
    fn span_glued_to_text_joins_token() {
        assert_eq!(toks(r#"--name="John Smith" rest"#), vec!["--name=John Smith", "rest"]);
        assert_eq!(toks(r#"a"b c"d"#), vec!["ab cd"]);
    }

    #[test]
    fn empty_quotes_yield_empty_token() {
        assert_eq!(toks(r#"set "" x"#), vec!["set", "", "x"]);
    }

    #[test]
    fn multiple_spans_in_order() {
        assert_eq!(
            toks(r#"mv "old name" "new name""#),
            vec!["mv", "old name", "new name"]
        );
    }

    #[test]
    fn input_is_not_mutated_and_calls_are_independent() {
        let line = String::from(r#"say "one two""#);
        let first = tokenize(&line);
        let second = tokenize(&line);
        assert_eq!(first, second);
        assert_eq!(line, r#"say "one two""#);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Piece {
            Word(String),
            Quoted(String),
        }

        fn arb_piece() -> impl Strategy<Value = Piece> {
            prop_oneof![
                "[a-zA-Z0-9_=-]{1,8}".prop_map(Piece::Word),
                "[a-zA-Z0-9_ -]{0,12}".prop_map(Piece::Quoted),
            ]
        }

        fn render(pieces: &[Piece]) -> String {
            pieces
                .iter()
                .map(|p| match p {
                    Piece::Word(w) => w.clone(),
                    Piece::Quoted(q) => format!("\"{q}\""),
                })
                .collect::<Vec<_>>()
                .join(" ")
        }

        proptest! {
            #[test]
            fn token_count_matches_words_plus_spans(
                pieces in proptest::collection::vec(arb_piece(), 0..10)
            ) {
                let tokens = tokenize(&render(&pieces));
                prop_assert_eq!(tokens.len(), pieces.len());
                for (token, piece) in tokens.iter().zip(&pieces) {
                    match piece {
                        Piece::Word(w) => prop_assert_eq!(token, w),
                        Piece::Quoted(q) => prop_assert_eq!(token, q),
                    }
                }
            }

            #[test]
            fn rejoining_unquoted_tokens_is_stable(line in "[a-z0-9 \t-]{0,40}") {
                let tokens = tokenize(&line);
                prop_assert_eq!(tokenize(&tokens.join(" ")), tokens);
            }

            #[test]
            fn tokens_never_contain_whitespace_outside_quotes(line in "[a-z \t]{0,40}") {
                for token in tokenize(&line) {
                    prop_assert!(!token.is_empty());
                    prop_assert!(!token.contains(char::is_whitespace));
                }
            }
        }
    }
}
