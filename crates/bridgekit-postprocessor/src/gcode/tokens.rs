//! Word-level tokenization of a single G-code line
//!
//! A line is split into parameter words (`letter` + number), opaque text
//! (whitespace and anything unrecognised) and an optional trailing `;`
//! comment. Rendering an untouched tokenization gives back the input exactly,
//! so substituting one word never disturbs the rest of the line.

use std::fmt;

/// One lexical piece of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Parameter word such as `F1200` or `E-0.5`
    Word { letter: char, number: String },
    /// Whitespace or text that is not a parameter word
    Other(String),
}

/// A tokenized G-code line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    tokens: Vec<Token>,
    comment: Option<String>,
}

/// Length in bytes of a number at the start of `s`, if one is present
fn number_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(pos) {
        if b.is_ascii_digit() {
            digits += 1;
        } else if b == b'.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
        pos += 1;
    }

    (digits > 0).then_some(pos)
}

impl LineTokens {
    /// Tokenize a line
    pub fn parse(line: &str) -> Self {
        let mut tokens = Vec::new();
        let mut other = String::new();
        let mut comment = None;
        let mut rest = line;

        while let Some(ch) = rest.chars().next() {
            if ch == ';' {
                comment = Some(rest.to_string());
                break;
            }

            let after = &rest[ch.len_utf8()..];
            if ch.is_ascii_alphabetic() {
                if let Some(len) = number_len(after) {
                    if !other.is_empty() {
                        tokens.push(Token::Other(std::mem::take(&mut other)));
                    }
                    tokens.push(Token::Word {
                        letter: ch,
                        number: after[..len].to_string(),
                    });
                    rest = &after[len..];
                    continue;
                }
            }

            other.push(ch);
            rest = after;
        }

        if !other.is_empty() {
            tokens.push(Token::Other(other));
        }

        Self { tokens, comment }
    }

    /// Numeric text of the first parameter word with this letter
    pub fn find(&self, letter: char) -> Option<&str> {
        self.tokens.iter().find_map(|token| match token {
            Token::Word { letter: l, number } if *l == letter => Some(number.as_str()),
            _ => None,
        })
    }

    /// Unsigned value of the first parameter word with this letter
    ///
    /// A signed first word yields `None` rather than falling through to a
    /// later word with the same letter.
    pub fn value(&self, letter: char) -> Option<f64> {
        let number = self.find(letter)?;
        if number.starts_with(['+', '-']) {
            return None;
        }
        number.parse().ok()
    }

    /// Replace the number of the first parameter word with this letter
    ///
    /// Returns `false` when the line has no such word.
    pub fn replace(&mut self, letter: char, new_number: &str) -> bool {
        for token in &mut self.tokens {
            if let Token::Word { letter: l, number } = token {
                if *l == letter {
                    *number = new_number.to_string();
                    return true;
                }
            }
        }
        false
    }

    /// Trailing comment including its `;`
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl fmt::Display for LineTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Token::Word { letter, number } => write!(f, "{}{}", letter, number)?,
                Token::Other(text) => f.write_str(text)?,
            }
        }
        if let Some(comment) = &self.comment {
            f.write_str(comment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_words_and_comment() {
        let tokens = LineTokens::parse("G1 F1200 X10 Y10 E2.0 ; outer wall");
        assert_eq!(tokens.find('G'), Some("1"));
        assert_eq!(tokens.find('F'), Some("1200"));
        assert_eq!(tokens.find('E'), Some("2.0"));
        assert_eq!(tokens.comment(), Some("; outer wall"));
    }

    #[test]
    fn test_replace_keeps_everything_else() {
        let mut tokens = LineTokens::parse("G1  F1200 X10 Y10 E2.0 ;keep F9 E9");
        assert!(tokens.replace('F', "500"));
        assert!(tokens.replace('E', "1.00000"));
        assert_eq!(tokens.to_string(), "G1  F500 X10 Y10 E1.00000 ;keep F9 E9");
    }

    #[test]
    fn test_replace_first_word_only() {
        let mut tokens = LineTokens::parse("G1 E1 E2");
        assert!(tokens.replace('E', "7"));
        assert_eq!(tokens.to_string(), "G1 E7 E2");
        assert!(!tokens.replace('Z', "1"));
    }

    #[test]
    fn test_value_reads_first_unsigned_word() {
        let tokens = LineTokens::parse("G1 F1200 X1 Y1 E2.5 ; F900 E7");
        assert_eq!(tokens.value('F'), Some(1200.0));
        assert_eq!(tokens.value('E'), Some(2.5));

        let signed = LineTokens::parse("G1 X1 Y1 E-0.8 E3");
        assert_eq!(signed.value('E'), None);

        let commented = LineTokens::parse("G1 X10 Y10 E2.0 ; F1200");
        assert_eq!(commented.value('F'), None);
    }

    #[test]
    fn test_compact_words() {
        let mut tokens = LineTokens::parse("G1X10Y-2.5F900E.5");
        assert_eq!(tokens.find('Y'), Some("-2.5"));
        assert_eq!(tokens.find('E'), Some(".5"));
        tokens.replace('F', "450");
        assert_eq!(tokens.to_string(), "G1X10Y-2.5F450E.5");
    }

    #[test]
    fn test_non_words_are_opaque() {
        let tokens = LineTokens::parse("M117 Hello E world");
        assert_eq!(tokens.find('E'), None);
        assert_eq!(tokens.to_string(), "M117 Hello E world");
    }

    #[test]
    fn test_empty_and_comment_only() {
        assert_eq!(LineTokens::parse("").to_string(), "");
        let tokens = LineTokens::parse(";TYPE:WALL-OUTER");
        assert!(tokens.tokens().is_empty());
        assert_eq!(tokens.to_string(), ";TYPE:WALL-OUTER");
    }
}
