//! Parsed configuration tree
//!
//! A small, loosely-typed model of a parsed HCL file: an object list of items,
//! each with key tokens and a value node. Values are kept as raw token text;
//! nothing here evaluates expressions.

use serde::{Deserialize, Serialize};

/// Lexical class of a key or literal token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Ident,
    String,
    Number,
    Bool,
    Heredoc,
    Null,
}

/// A token with its raw source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text exactly as written, quotes included
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn ident(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Ident, text)
    }

    /// String token; `text` must already carry its quotes.
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(TokenKind::String, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectKey {
    pub token: Token,
}

/// A single `//`, `#` or `/* */` comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

/// Adjacent comments with no blank line between them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            list: lines
                .into_iter()
                .map(|text| Comment { text: text.into() })
                .collect(),
        }
    }
}

/// A scalar value, kept as source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralType {
    pub token: Token,
}

/// A braced body: `{ ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    pub list: ObjectList,
}

/// A bracketed list: `[ ... ]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListType {
    pub list: Vec<Node>,
}

/// Ordered sequence of items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectList {
    pub items: Vec<ObjectItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    ObjectList(ObjectList),
    Object(ObjectType),
    Literal(LiteralType),
    List(ListType),
    /// Any expression that is not a plain literal (references, calls, operators)
    Expression { text: String },
}

impl Node {
    pub fn literal(token: Token) -> Self {
        Node::Literal(LiteralType { token })
    }

    pub fn object(items: Vec<ObjectItem>) -> Self {
        Node::Object(ObjectType {
            list: ObjectList { items },
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::ObjectList(_) => "object list",
            Node::Object(_) => "object",
            Node::Literal(_) => "literal",
            Node::List(_) => "list",
            Node::Expression { .. } => "expression",
        }
    }
}

/// One `keys... = value` or `keys... { ... }` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectItem {
    pub keys: Vec<ObjectKey>,
    #[serde(rename = "val")]
    pub value: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_comment: Option<CommentGroup>,
}

impl ObjectItem {
    pub fn new(keys: Vec<Token>, value: Node) -> Self {
        Self {
            keys: keys.into_iter().map(|token| ObjectKey { token }).collect(),
            value,
            lead_comment: None,
        }
    }

    /// `key = value` attribute
    pub fn attribute(key: &str, value: Node) -> Self {
        Self::new(vec![Token::ident(key)], value)
    }

    /// `kind "label" { items }` block
    pub fn block(kind: &str, label: &str, items: Vec<ObjectItem>) -> Self {
        Self::new(
            vec![Token::ident(kind), Token::string(format!("\"{}\"", label))],
            Node::object(items),
        )
    }

    pub fn with_lead_comment(mut self, comment: CommentGroup) -> Self {
        self.lead_comment = Some(comment);
        self
    }

    /// Raw text of the key at `index`
    pub fn key_text(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(|k| k.token.text.as_str())
    }
}

/// A parsed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub node: Node,
    /// Every comment group in the file, in source order
    #[serde(default)]
    pub comments: Vec<CommentGroup>,
}

impl File {
    pub fn new(items: Vec<ObjectItem>) -> Self {
        Self {
            node: Node::ObjectList(ObjectList { items }),
            comments: Vec::new(),
        }
    }

    pub fn with_comments(mut self, comments: Vec<CommentGroup>) -> Self {
        self.comments = comments;
        self
    }

    pub fn object_list(&self) -> Option<&ObjectList> {
        match &self.node {
            Node::ObjectList(list) => Some(list),
            _ => None,
        }
    }
}
