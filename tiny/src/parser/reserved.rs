use super::lexer::TokenKind;

/// Reserved words, sorted by spelling for binary search.
pub const RESERVED_WORDS: [(&str, TokenKind); 10] = [
    ("else", TokenKind::Else),
    ("endif", TokenKind::EndIf),
    ("endwhile", TokenKind::EndWhile),
    ("if", TokenKind::If),
    ("read", TokenKind::Read),
    ("repeat", TokenKind::Repeat),
    ("then", TokenKind::Then),
    ("until", TokenKind::Until),
    ("while", TokenKind::While),
    ("write", TokenKind::Write),
];

/// Keyword kind for an identifier-shaped lexeme, case-sensitive.
pub fn lookup(word: &str) -> Option<TokenKind> {
    RESERVED_WORDS
        .binary_search_by(|(spelling, _)| (*spelling).cmp(word))
        .ok()
        .map(|index| RESERVED_WORDS[index].1)
}
