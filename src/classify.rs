//! Line classification for C-family comment syntax.
//!
//! Each line is scanned once, character by character, with a small lexer that
//! tracks block comments, double-quoted strings and single-quoted character
//! literals. Only the block-comment state survives the end of a line.

/// Classification of a single physical line.
///
/// The flags are independent: a line can be code and comment at once
/// (`x = 1; // note`) and a blank line inside an open block comment is both
/// blank and comment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineResult {
    pub is_code: bool,
    pub is_comment: bool,
    pub is_blank: bool,
    /// Whether the next line starts inside a block comment.
    pub in_block_comment: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    BlockComment,
    Literal { quote: char, escape: bool },
}

/// Classify `line` (without its terminator), entering the scan inside a block
/// comment when `in_block_comment` is set.
///
/// Total and pure: every input produces a result.
pub fn classify(line: &str, in_block_comment: bool) -> LineResult {
    let blank = line.trim().is_empty();
    let mut result = LineResult {
        is_blank: blank,
        ..LineResult::default()
    };
    let mut mode = if in_block_comment {
        Mode::BlockComment
    } else {
        Mode::Code
    };

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match mode {
            Mode::BlockComment => {
                result.is_comment = true;
                if c == '*' && chars.peek().copied() == Some('/') {
                    chars.next();
                    mode = Mode::Code;
                }
            }
            Mode::Literal { quote, escape } => {
                mode = if c == '\\' && !escape {
                    Mode::Literal {
                        quote,
                        escape: true,
                    }
                } else if c == quote && !escape {
                    Mode::Code
                } else {
                    Mode::Literal {
                        quote,
                        escape: false,
                    }
                };
            }
            Mode::Code => match (c, chars.peek().copied()) {
                ('/', Some('/')) => {
                    // Rest of the line belongs to the line comment.
                    result.is_comment = true;
                    break;
                }
                ('/', Some('*')) => {
                    chars.next();
                    result.is_comment = true;
                    mode = Mode::BlockComment;
                }
                ('"' | '\'', _) => {
                    result.is_code = true;
                    mode = Mode::Literal {
                        quote: c,
                        escape: false,
                    };
                }
                (c, _) if c.is_whitespace() => {}
                _ => result.is_code = true,
            },
        }
    }

    // An unterminated literal is dropped here; only block comments carry over.
    result.in_block_comment = mode == Mode::BlockComment;
    if blank && result.in_block_comment {
        result.is_comment = true;
    }
    result
}

/// Threads block-comment state through the lines of one file.
///
/// Create a fresh classifier per file; state never crosses file boundaries.
#[derive(Debug, Default)]
pub struct FileClassifier {
    in_block_comment: bool,
}

impl FileClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &str) -> LineResult {
        let result = classify(line, self.in_block_comment);
        self.in_block_comment = result.in_block_comment;
        result
    }
}
