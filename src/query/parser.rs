//! Parser for the query dialect
//!
//! ```text
//! query      := "SELECT" select_list "FROM" from_list ["WHERE" predicate]
//! select_list:= "*" | attr ("," attr)*
//! from_list  := "*" | kind ("," kind)*
//! predicate  := term (("AND"|"OR") term)*
//! term       := "(" predicate ")" | attr op literal
//! op         := "=" | "<>" | "<" | ">" | "<=" | ">="
//! ```
//!
//! Keywords are case-insensitive. AND and OR share one precedence level and
//! fold left to right; only parentheses regroup.

use crate::error::QuerySyntaxError;

use super::{Clause, Literal, Operator, Predicate, Query, Selection, Source};

/// Parse a query string
pub fn parse(query_string: &str) -> Result<Query, QuerySyntaxError> {
    let text = query_string.trim().trim_end_matches(';').trim_end();

    let after_select = strip_keyword_prefix(text, "SELECT")
        .ok_or_else(|| QuerySyntaxError::MissingSelect(text.to_string()))?;

    let (select_end, from_start) = find_keyword(after_select, "FROM")
        .ok_or_else(|| QuerySyntaxError::MissingFrom(text.to_string()))?;
    let select_text = &after_select[..select_end];
    let rest = &after_select[from_start..];

    let (from_text, where_text) = match find_keyword(rest, "WHERE") {
        Some((from_end, where_start)) => (&rest[..from_end], Some(&rest[where_start..])),
        None => (rest, None),
    };

    let select = match split_list(select_text, "SELECT", text)? {
        list if list.len() == 1 && list[0] == "*" => Selection::All,
        list => Selection::Attributes(list),
    };
    let from = match split_list(from_text, "FROM", text)? {
        list if list.len() == 1 && list[0] == "*" => Source::All,
        list => Source::Kinds(list),
    };
    let predicate = match where_text {
        Some("") => return Err(QuerySyntaxError::ExpectedAttribute(text.to_string())),
        Some(w) => Some(parse_predicate(w)?),
        None => None,
    };

    Ok(Query {
        select,
        from,
        predicate,
    })
}

/// `text` without a leading keyword and the whitespace after it
fn strip_keyword_prefix<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let bytes = text.as_bytes();
    let n = keyword.len();
    if bytes.len() > n
        && bytes[..n].eq_ignore_ascii_case(keyword.as_bytes())
        && bytes[n].is_ascii_whitespace()
    {
        Some(text[n..].trim_start())
    } else {
        None
    }
}

/// First whitespace-delimited occurrence of `keyword`, possibly ending the text:
/// (end of text before it, start of text after it)
fn find_keyword(text: &str, keyword: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let n = keyword.len();
    for i in 1..bytes.len() {
        if i + n > bytes.len() {
            break;
        }
        if bytes[i - 1].is_ascii_whitespace()
            && bytes[i..i + n].eq_ignore_ascii_case(keyword.as_bytes())
            && (i + n == bytes.len() || bytes[i + n].is_ascii_whitespace())
        {
            let before = text[..i].trim_end().len();
            let after = i + n + (text[i + n..].len() - text[i + n..].trim_start().len());
            return Some((before, after));
        }
    }
    None
}

fn split_list(
    text: &str,
    clause: &'static str,
    query: &str,
) -> Result<Vec<String>, QuerySyntaxError> {
    let items: Vec<String> = text.split(',').map(|s| s.trim().to_string()).collect();
    if items.iter().any(|s| s.is_empty()) {
        return Err(QuerySyntaxError::EmptyList {
            clause,
            query: query.to_string(),
        });
    }
    Ok(items)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Word(String),
    Quoted(String),
    Op(String),
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    start: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '+')
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, QuerySyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            '\'' | '"' => {
                let quote = c;
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    if ch == quote {
                        // A doubled quote is an escaped quote
                        if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                            chars.next();
                            value.push(quote);
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    value.push(ch);
                }
                if !closed {
                    return Err(QuerySyntaxError::UnterminatedString(text[start..].to_string()));
                }
                Token::Quoted(value)
            }
            '=' | '<' | '>' | '!' => {
                let mut op = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if matches!(ch, '=' | '<' | '>' | '!') {
                        op.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Op(op)
            }
            c if is_word_char(c) => {
                let mut word = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if is_word_char(ch) {
                        word.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Word(word)
            }
            other => return Err(QuerySyntaxError::UnexpectedToken(other.to_string())),
        };
        tokens.push(Spanned { token, start });
    }

    Ok(tokens)
}

fn is_keyword(word: &str) -> bool {
    word.eq_ignore_ascii_case("AND") || word.eq_ignore_ascii_case("OR")
}

/// `Some(true)` for AND, `Some(false)` for OR
fn is_connective(token: &Token) -> Option<bool> {
    match token {
        Token::Word(w) if is_keyword(w) => Some(w.eq_ignore_ascii_case("AND")),
        _ => None,
    }
}

struct PredicateParser<'a> {
    text: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'a> PredicateParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        self.pos += 1;
        token
    }

    /// Source text from token `index` up to the next connective
    fn fragment(&self, index: usize) -> String {
        let Some(start) = self.tokens.get(index).map(|s| s.start) else {
            return self.text.trim().to_string();
        };
        let end = self.tokens[index + 1..]
            .iter()
            .find(|s| is_connective(&s.token).is_some())
            .map(|s| s.start)
            .unwrap_or(self.text.len());
        self.text[start..end].trim().to_string()
    }

    fn parse_expr(&mut self) -> Result<Predicate, QuerySyntaxError> {
        let mut left = self.parse_term()?;
        while let Some(token) = self.peek() {
            let Some(is_and) = is_connective(token) else {
                break;
            };
            self.next();
            let right = self.parse_term()?;
            left = if is_and {
                Predicate::And(Box::new(left), Box::new(right))
            } else {
                Predicate::Or(Box::new(left), Box::new(right))
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Predicate, QuerySyntaxError> {
        if self.peek() == Some(&Token::LParen) {
            self.next();
            let inner = self.parse_expr()?;
            if self.next() != Some(Token::RParen) {
                return Err(QuerySyntaxError::UnbalancedParens(self.text.trim().to_string()));
            }
            return Ok(inner);
        }
        self.parse_clause().map(Predicate::Clause)
    }

    fn parse_clause(&mut self) -> Result<Clause, QuerySyntaxError> {
        let start = self.pos;
        let attribute = match self.next() {
            Some(Token::Word(w)) if !is_keyword(&w) => w,
            Some(Token::RParen) => {
                return Err(QuerySyntaxError::UnbalancedParens(self.text.trim().to_string()))
            }
            _ => return Err(QuerySyntaxError::ExpectedAttribute(self.fragment(start))),
        };

        let op = match self.next() {
            Some(Token::Op(op)) => Operator::from_symbol(&op)
                .ok_or_else(|| QuerySyntaxError::UnknownOperator(self.fragment(start)))?,
            _ => return Err(QuerySyntaxError::UnknownOperator(self.fragment(start))),
        };

        let literal = match self.next() {
            Some(Token::Quoted(s)) => Literal::Quoted(s),
            Some(Token::Word(w)) if !is_keyword(&w) => Literal::Bare(w),
            _ => return Err(QuerySyntaxError::ExpectedLiteral(self.fragment(start))),
        };

        Ok(Clause {
            attribute,
            op,
            literal,
        })
    }
}

/// Parse the text after WHERE into a predicate tree
pub fn parse_predicate(text: &str) -> Result<Predicate, QuerySyntaxError> {
    let tokens = tokenize(text)?;
    let mut parser = PredicateParser {
        text,
        tokens,
        pos: 0,
    };
    let predicate = parser.parse_expr()?;

    match parser.peek() {
        None => Ok(predicate),
        Some(Token::RParen) => Err(QuerySyntaxError::UnbalancedParens(text.trim().to_string())),
        Some(_) => Err(QuerySyntaxError::UnexpectedToken(parser.fragment(parser.pos))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(attribute: &str, op: Operator, literal: Literal) -> Predicate {
        Predicate::Clause(Clause {
            attribute: attribute.to_string(),
            op,
            literal,
        })
    }

    #[test]
    fn test_parse_projection() {
        let q = parse("SELECT name,version FROM Application").unwrap();
        assert_eq!(
            q.select,
            Selection::Attributes(vec!["name".to_string(), "version".to_string()])
        );
        assert_eq!(q.from, Source::Kinds(vec!["Application".to_string()]));
        assert!(q.predicate.is_none());
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let q = parse("select * from * where name = 'Firefox';").unwrap();
        assert_eq!(q.select, Selection::All);
        assert_eq!(q.from, Source::All);
        assert_eq!(
            q.predicate,
            Some(clause("name", Operator::Eq, Literal::Quoted("Firefox".to_string())))
        );
    }

    #[test]
    fn test_missing_select_and_from() {
        assert!(matches!(
            parse("DELETE FROM Device"),
            Err(QuerySyntaxError::MissingSelect(_))
        ));
        assert!(matches!(
            parse("SELECT id Device"),
            Err(QuerySyntaxError::MissingFrom(_))
        ));
        assert!(matches!(
            parse("SELECT id, FROM Device"),
            Err(QuerySyntaxError::EmptyList { clause: "SELECT", .. })
        ));
    }

    #[test]
    fn test_trailing_keyword_without_operand() {
        match parse("SELECT id FROM Application WHERE") {
            Err(QuerySyntaxError::ExpectedAttribute(fragment)) => {
                assert!(fragment.ends_with("WHERE"));
            }
            other => panic!("Expected ExpectedAttribute, got {:?}", other),
        }
        assert!(matches!(
            parse("select id from Application where ;"),
            Err(QuerySyntaxError::ExpectedAttribute(_))
        ));
        assert!(matches!(
            parse("SELECT id FROM"),
            Err(QuerySyntaxError::EmptyList { clause: "FROM", .. })
        ));
    }

    #[test]
    fn test_where_inside_quotes_is_literal() {
        let q = parse("SELECT id FROM Data WHERE description='from where it came'").unwrap();
        assert_eq!(
            q.predicate,
            Some(clause(
                "description",
                Operator::Eq,
                Literal::Quoted("from where it came".to_string())
            ))
        );
    }

    #[test]
    fn test_left_to_right_folding() {
        let p = parse_predicate("a=1 OR b=2 AND c=3").unwrap();
        let expected = Predicate::And(
            Box::new(Predicate::Or(
                Box::new(clause("a", Operator::Eq, Literal::Bare("1".to_string()))),
                Box::new(clause("b", Operator::Eq, Literal::Bare("2".to_string()))),
            )),
            Box::new(clause("c", Operator::Eq, Literal::Bare("3".to_string()))),
        );
        assert_eq!(p, expected);
    }

    #[test]
    fn test_parentheses_regroup() {
        let p = parse_predicate("(role='gateway' AND is_virtual=false) OR role='firewall'").unwrap();
        match p {
            Predicate::Or(left, right) => {
                assert!(matches!(*left, Predicate::And(_, _)));
                assert!(matches!(*right, Predicate::Clause(_)));
            }
            other => panic!("Expected Or, got {:?}", other),
        }
    }

    #[test]
    fn test_all_operators() {
        for (symbol, op) in [
            ("=", Operator::Eq),
            ("<>", Operator::Ne),
            ("<", Operator::Lt),
            (">", Operator::Gt),
            ("<=", Operator::Le),
            (">=", Operator::Ge),
        ] {
            let p = parse_predicate(&format!("bandwidth {} 100", symbol)).unwrap();
            assert_eq!(p, clause("bandwidth", op, Literal::Bare("100".to_string())));
        }
    }

    #[test]
    fn test_unknown_operator_names_fragment() {
        match parse_predicate("name='a' AND version == '2'") {
            Err(QuerySyntaxError::UnknownOperator(fragment)) => {
                assert_eq!(fragment, "version == '2'");
            }
            other => panic!("Expected UnknownOperator, got {:?}", other),
        }
        assert!(matches!(
            parse_predicate("name 'a'"),
            Err(QuerySyntaxError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_malformed_predicates() {
        assert!(matches!(
            parse_predicate("(name='a'"),
            Err(QuerySyntaxError::UnbalancedParens(_))
        ));
        assert!(matches!(
            parse_predicate("name='a')"),
            Err(QuerySyntaxError::UnbalancedParens(_))
        ));
        assert!(matches!(
            parse_predicate("name='a"),
            Err(QuerySyntaxError::UnterminatedString(_))
        ));
        assert!(matches!(
            parse_predicate("name="),
            Err(QuerySyntaxError::ExpectedLiteral(_))
        ));
        assert!(matches!(
            parse_predicate("role=OR OR x=1"),
            Err(QuerySyntaxError::ExpectedLiteral(_))
        ));
        assert!(matches!(
            parse_predicate("role=and"),
            Err(QuerySyntaxError::ExpectedLiteral(_))
        ));
        assert!(matches!(
            parse_predicate("name='a' name='b'"),
            Err(QuerySyntaxError::UnexpectedToken(_))
        ));
        assert!(matches!(
            parse_predicate("name=$x"),
            Err(QuerySyntaxError::UnexpectedToken(_))
        ));
    }

    #[test]
    fn test_escaped_quote() {
        let p = parse_predicate("name='O''Brien'").unwrap();
        assert_eq!(p, clause("name", Operator::Eq, Literal::Quoted("O'Brien".to_string())));
    }
}
