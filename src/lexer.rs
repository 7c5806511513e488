//! Splits an input line into words following POSIX-like quoting rules.
//!
//! Only word splitting is performed here: there are no operators, substitutions
//! or comments. Quoted text (single or double) is kept inside one word, and a
//! backslash escapes the next character outside quotes.

use thiserror::Error;

/// Errors that can occur during the lexical analysis process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexingError {
    /// A closing quote (single or double) was not found.
    #[error("no closing quotation ({0})")]
    UnfinishedQuote(char),
    /// The line ended right after a backslash.
    #[error("no escaped character")]
    UnfinishedEscape,
}

/// Word delimiters. Other Unicode whitespace is ordinary word text.
fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    buffer: String,
}

impl LexingFSM {
    /// Creates a new instance of the lexical analysis Finite State Machine.
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Start,
            buffer: String::new(),
        }
    }

    /// Performs lexical analysis on the input string and returns the words.
    ///
    /// A word is emitted whenever unquoted whitespace follows it, so an empty
    /// pair of quotes still produces an (empty) word.
    fn make_words(&mut self) -> Result<Vec<String>, LexingError> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Start => self.handle_start(ch)?,
                LexingState::ReadingWord => self.handle_word(ch, &mut out)?,
                LexingState::ReadingSingleQuote => self.handle_single_quote(ch),
                LexingState::ReadingDoubleQuote => self.handle_double_quote(ch),
            }
        }

        match self.state {
            LexingState::ReadingSingleQuote => return Err(LexingError::UnfinishedQuote('\'')),
            LexingState::ReadingDoubleQuote => return Err(LexingError::UnfinishedQuote('"')),
            LexingState::ReadingWord => out.push(std::mem::take(&mut self.buffer)),
            LexingState::Start => {}
        }

        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn handle_start(&mut self, ch: char) -> Result<(), LexingError> {
        match ch {
            c if is_blank(c) => {}
            '\'' => self.state = LexingState::ReadingSingleQuote,
            '"' => self.state = LexingState::ReadingDoubleQuote,
            '\\' => {
                self.push_escaped()?;
                self.state = LexingState::ReadingWord;
            }
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
        Ok(())
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<String>) -> Result<(), LexingError> {
        match ch {
            c if is_blank(c) => {
                out.push(std::mem::take(&mut self.buffer));
                self.state = LexingState::Start;
            }
            '\'' => self.state = LexingState::ReadingSingleQuote,
            '"' => self.state = LexingState::ReadingDoubleQuote,
            '\\' => self.push_escaped()?,
            c => self.buffer.push(c),
        }
        Ok(())
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::ReadingWord,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::ReadingWord,
            // Inside double quotes a backslash only escapes `"` and itself.
            '\\' if matches!(self.peek_char(), Some('"') | Some('\\')) => {
                if let Some(next) = self.read_char() {
                    self.buffer.push(next);
                }
            }
            c => self.buffer.push(c),
        }
    }

    fn push_escaped(&mut self) -> Result<(), LexingError> {
        let next = self.read_char().ok_or(LexingError::UnfinishedEscape)?;
        self.buffer.push(next);
        Ok(())
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Returns an empty vector for blank input, or a `LexingError` if a quote is
/// left open or the line ends with a dangling backslash.
pub fn split_into_words(line: &str) -> Result<Vec<String>, LexingError> {
    LexingFSM::new(line).make_words()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        split_into_words(line).unwrap()
    }

    #[test]
    fn test_double_quotes_group_words() {
        assert_eq!(words(r#"echo "hello world" foo"#), vec!["echo", "hello world", "foo"]);
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(words(r#"echo 'a "b" \c'"#), vec!["echo", r#"a "b" \c"#]);
    }

    #[test]
    fn test_blank_line_has_no_words() {
        assert!(words("").is_empty());
        assert!(words("   \t  ").is_empty());
    }

    #[test]
    fn test_runs_of_whitespace_collapse() {
        assert_eq!(words("  ls   -l\t/tmp  "), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn test_only_ascii_blanks_split_words() {
        assert_eq!(words("echo a\u{a0}b\r\nc"), vec!["echo", "a\u{a0}b", "c"]);
        assert_eq!(words("echo\u{2003}x"), vec!["echo\u{2003}x"]);
    }

    #[test]
    fn test_quotes_join_adjacent_text() {
        assert_eq!(words(r#"touch pre"fix mid"dle'.txt'"#), vec!["touch", "prefix middle.txt"]);
    }

    #[test]
    fn test_empty_quotes_make_an_empty_word() {
        assert_eq!(words(r#"echo "" x"#), vec!["echo", "", "x"]);
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(words(r"cat my\ file.txt"), vec!["cat", "my file.txt"]);
        assert_eq!(words(r#"echo "say \"hi\"" "a\b""#), vec!["echo", r#"say "hi""#, r"a\b"]);
    }

    #[test]
    fn test_unfinished_quote_is_an_error() {
        assert_eq!(
            split_into_words(r#"echo "oops"#),
            Err(LexingError::UnfinishedQuote('"'))
        );
        assert_eq!(
            split_into_words("echo 'oops"),
            Err(LexingError::UnfinishedQuote('\''))
        );
    }

    #[test]
    fn test_trailing_backslash_is_an_error() {
        assert_eq!(split_into_words("echo \\"), Err(LexingError::UnfinishedEscape));
    }
}
