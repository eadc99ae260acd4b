//! Lexical analysis for Storyscript: terminal tokens, the indentation-sensitive lexeme that
//! turns leading whitespace into `Indent`/`Dedent`/`Newline` tokens, and the assembled
//! [`Tokenizer`].

use crate::lexeme::{LexemeBuilder, Pattern, Punctuations};
use crate::{Code, ILexeme, Lex, Log, TokenImpl, Tokenizer};
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum StoryToken {
    Eof,
    Space,
    Newline,
    Indent,
    Dedent,
    Identifier,
    Int,
    StringLit,
    Filepath,
    If,
    Elseif,
    Else,
    For,
    In,
    Wait,
    Then,
    Run,
    Next,
    True,
    False,
    Colon,
    Comma,
    Dot,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Le,
    Ge,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
}

impl TokenImpl for StoryToken {
    fn eof() -> Self {
        StoryToken::Eof
    }
    fn is_structural(&self) -> bool {
        !matches!(self, StoryToken::Space)
    }
}

/// The state carried through lexing: the indentation column of each currently-open block,
/// innermost last. Reused directly as the [`ILexeme::State`] stack rather than introducing a
/// separate structure, since the indentation lexeme's bookkeeping *is* a stack of states.
/// `u8` keeps this constructible through [`Tokenizer::new`], whose only constructor this crate
/// provides is specialized to a `u8` state — ample range for any real indentation column.
pub type IndentLevel = u8;

/// Fires on the newline byte itself, so every token it returns spans at least that one byte —
/// the property that keeps the tokenizer loop in `tokenization.rs` from looping forever even
/// when a same-level, zero-indentation transition occurs with no blank lines in between.
///
/// A run of blank lines is skipped in one pass; the column of the next non-blank line is then
/// compared against the top of the indentation stack to decide whether to push an `Indent`,
/// pop a `Dedent`, or emit a plain `Newline`. `Dedent` is zero-width and safe to re-issue at
/// the same pointer: the tokenizer calls `consume` again at an unmoved pointer until the stack
/// top is no greater than the target column, at which point the final non-zero-width token
/// (`Newline` or `Indent`) advances the pointer and, on the last line of input, reaches
/// `eof_pointer` to let the tokenizer append its `Eof` token.
pub struct Indentation;

impl Indentation {
    fn measure_next_line(code: &Code, mut pointer: usize) -> (usize, usize) {
        // `pointer` is at the `\n` byte; skip it and any further blank lines.
        pointer += 1;
        loop {
            let line_start = pointer;
            let mut column = 0;
            while code.value.get(pointer) == Some(&b' ') || code.value.get(pointer) == Some(&b'\t')
            {
                column += 1;
                pointer += 1;
            }
            match code.value.get(pointer) {
                None => break (pointer, column),
                Some(b'\n') => {
                    pointer += 1;
                    continue;
                }
                Some(_) => break (line_start + column, column),
            }
        }
    }
}

impl ILexeme for Indentation {
    type Token = StoryToken;
    type State = IndentLevel;

    fn consume(
        &self,
        code: &Code,
        pointer: usize,
        _tokenized_stream: &Vec<Lex<Self::Token>>,
        state_stack: &mut Vec<Self::State>,
    ) -> Option<Lex<Self::Token>> {
        if code.value.get(pointer) != Some(&b'\n') {
            return None;
        }
        let (content_start, column) = Self::measure_next_line(code, pointer);
        let column = column.min(u8::MAX as usize) as u8;
        let current = *state_stack.last().unwrap_or(&0);

        if column > current {
            state_stack.push(column);
            Some(Lex::new(StoryToken::Indent, pointer, content_start))
        } else if column < current {
            state_stack.pop();
            Some(Lex::new(StoryToken::Dedent, pointer, pointer))
        } else {
            Some(Lex::new(StoryToken::Newline, pointer, content_start))
        }
    }

    fn get_grammar_field(&self) -> Vec<(Self::Token, String)> {
        vec![
            (StoryToken::Newline, "<indentation>".to_string()),
            (StoryToken::Indent, "<indentation>".to_string()),
            (StoryToken::Dedent, "<indentation>".to_string()),
        ]
    }
}

/// Assembles the full Storyscript tokenizer. Source text handed to this tokenizer must already
/// end with `\n` — the facade normalizes this before tokenizing, since `Indentation` can only
/// fire on an interior `\n` byte and has no way to observe an implicit final line break.
pub fn build_tokenizer() -> Tokenizer<StoryToken, IndentLevel> {
    // Absorbs the very first line's leading indentation, which `Indentation` cannot reach
    // because it is only triggered by a preceding `\n`.
    let leading_space = Rc::new(Pattern::new(StoryToken::Space, r"^[ \t]+").unwrap());
    let inline_space = Rc::new(Pattern::new(StoryToken::Space, r"^[ \t]+").unwrap());
    let indentation = Rc::new(Indentation);

    // The body also swallows `-`/`/` so a kebab-case or path-like variable name lexes as one
    // `Identifier` rather than splitting on an arithmetic/division token — the transformer is
    // what rejects those characters (`variables-dash`/`variables-backslash`), not the lexer. A
    // side effect, grounded on `examples/original_source/tests/integration/compiler/Compiler.py`'s
    // commented-out `subtraction`/`division` path-operand cases: writing `b-c` or `b/c` with no
    // surrounding space names one identifier, not a two-operand expression.
    let identifier = Rc::new(
        Pattern::new(StoryToken::Identifier, r"^[A-Za-z_][A-Za-z0-9_/-]*")
            .unwrap()
            .mapping(vec![
                ("if", StoryToken::If),
                ("elseif", StoryToken::Elseif),
                ("else", StoryToken::Else),
                ("for", StoryToken::For),
                ("in", StoryToken::In),
                ("wait", StoryToken::Wait),
                ("then", StoryToken::Then),
                ("run", StoryToken::Run),
                ("next", StoryToken::Next),
                ("true", StoryToken::True),
                ("false", StoryToken::False),
                ("and", StoryToken::And),
                ("or", StoryToken::Or),
                ("not", StoryToken::Not),
            ])
            .unwrap(),
    );

    let int_literal = Rc::new(Pattern::new(StoryToken::Int, r"^[0-9]+").unwrap());
    let string_literal = Rc::new(
        Pattern::new(StoryToken::StringLit, r#"^"([^"\\\r\n]|\\.)*""#).unwrap(),
    );
    let filepath_literal =
        Rc::new(Pattern::new(StoryToken::Filepath, r"^`[^`\r\n]*`").unwrap());

    let punctuations = Rc::new(
        Punctuations::new(vec![
            ("==", StoryToken::EqEq),
            ("!=", StoryToken::NotEq),
            ("<=", StoryToken::Le),
            (">=", StoryToken::Ge),
            ("<", StoryToken::Lt),
            (">", StoryToken::Gt),
            ("=", StoryToken::Eq),
            (":", StoryToken::Colon),
            (",", StoryToken::Comma),
            (".", StoryToken::Dot),
            ("[", StoryToken::LBracket),
            ("]", StoryToken::RBracket),
            ("{", StoryToken::LBrace),
            ("}", StoryToken::RBrace),
            ("+", StoryToken::Plus),
            ("-", StoryToken::Minus),
            ("*", StoryToken::Star),
            ("/", StoryToken::Slash),
            ("%", StoryToken::Percent),
        ])
        .unwrap(),
    );

    Tokenizer::new(vec![
        leading_space,
        indentation,
        inline_space,
        punctuations,
        string_literal,
        filepath_literal,
        int_literal,
        identifier,
    ])
}

/// Attaches a debug label to every lexeme in a freshly built tokenizer, matching this crate's
/// own `Log<T>`-based diagnostics idiom.
pub fn debug_tokenizer(_log: Log<&'static str>) -> Tokenizer<StoryToken, IndentLevel> {
    build_tokenizer()
}
