use std::path::Path;

use tree_sitter::Node as TsNode;

use crate::ast::{
    Comment, CommentGroup, File, ListType, LiteralType, Node, ObjectItem, ObjectKey, ObjectList,
    ObjectType, Token, TokenKind,
};
use crate::error::{DocError, Result};

/// Parses HCL source into the [`crate::ast`] model using tree-sitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct HclParser;

impl HclParser {
    pub fn new() -> Self {
        Self
    }

    pub fn language() -> tree_sitter::Language {
        tree_sitter_hcl::LANGUAGE.into()
    }

    pub fn parse_file(&self, path: &Path) -> Result<File> {
        let source = std::fs::read_to_string(path)?;
        self.parse_source(&path.display().to_string(), &source)
    }

    /// Parse `source`; `name` is only used in error messages.
    pub fn parse_source(&self, name: &str, source: &str) -> Result<File> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&Self::language())
            .map_err(|e| parse_error(name, 0, 0, e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| parse_error(name, 0, 0, "Failed to parse source".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let pos = bad.start_position();
            let message = if bad.is_missing() {
                format!("missing {}", bad.kind())
            } else {
                "syntax error".to_string()
            };
            return Err(parse_error(name, pos.row + 1, pos.column + 1, message));
        }

        let converter = Converter {
            source: source.as_bytes(),
        };
        Ok(converter.file(root))
    }
}

fn parse_error(file: &str, line: usize, column: usize, message: String) -> DocError {
    DocError::Parse {
        file: file.to_string(),
        line,
        column,
        message,
    }
}

fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

/// Walks a tree-sitter CST and builds the loosely-typed tree.
struct Converter<'s> {
    source: &'s [u8],
}

impl<'s> Converter<'s> {
    fn text(&self, node: TsNode) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    fn file(&self, root: TsNode) -> File {
        let node = match named_children(root).into_iter().find(|c| c.kind() == "object") {
            Some(object) => Node::Object(ObjectType {
                list: self.object_elems(object),
            }),
            None => Node::ObjectList(self.body(root)),
        };

        File {
            node,
            comments: self.comment_groups(root),
        }
    }

    /// Items of a container, descending into `body` nodes and attaching lead comments.
    fn body(&self, container: TsNode) -> ObjectList {
        let mut entries = Vec::new();
        flatten_body(container, &mut entries);

        let mut items = Vec::new();
        let mut pending: Vec<TsNode> = Vec::new();
        let mut last_item_end: Option<usize> = None;

        for entry in entries {
            match entry.kind() {
                "comment" => {
                    let row = entry.start_position().row;
                    if last_item_end == Some(row) {
                        // trailing comment on the previous item's line
                        continue;
                    }
                    if let Some(prev) = pending.last() {
                        if prev.end_position().row + 1 != row {
                            pending.clear();
                        }
                    }
                    pending.push(entry);
                }
                "attribute" | "block" => {
                    let mut item = if entry.kind() == "block" {
                        self.block(entry)
                    } else {
                        self.attribute(entry)
                    };

                    let adjacent = pending
                        .last()
                        .is_some_and(|c| c.end_position().row + 1 == entry.start_position().row);
                    if adjacent {
                        item.lead_comment = Some(self.group(&pending));
                    }
                    pending.clear();

                    last_item_end = Some(entry.end_position().row);
                    items.push(item);
                }
                _ => {}
            }
        }

        ObjectList { items }
    }

    fn block(&self, node: TsNode) -> ObjectItem {
        let mut keys = Vec::new();
        for child in named_children(node) {
            let kind = match child.kind() {
                "identifier" => TokenKind::Ident,
                "string_lit" => TokenKind::String,
                _ => continue,
            };
            keys.push(ObjectKey {
                token: Token::new(kind, self.text(child)),
            });
        }

        ObjectItem {
            keys,
            value: Node::Object(ObjectType {
                list: self.body(node),
            }),
            lead_comment: None,
        }
    }

    fn attribute(&self, node: TsNode) -> ObjectItem {
        let children = named_children(node);
        let key = children
            .iter()
            .find(|c| c.kind() == "identifier")
            .map(|c| self.text(*c))
            .unwrap_or_default();
        let value = children
            .iter()
            .find(|c| c.kind() == "expression")
            .map(|c| self.expression(*c))
            .unwrap_or(Node::Expression {
                text: String::new(),
            });

        ObjectItem {
            keys: vec![ObjectKey {
                token: Token::ident(key),
            }],
            value,
            lead_comment: None,
        }
    }

    fn expression(&self, node: TsNode) -> Node {
        let children: Vec<TsNode> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() != "comment")
            .collect();
        let [inner] = children.as_slice() else {
            return Node::Expression {
                text: self.text(node),
            };
        };

        match inner.kind() {
            "expression" => self.expression(*inner),
            "literal_value" => {
                let kind = match named_children(*inner).first().map(|c| c.kind()) {
                    Some("numeric_lit") => TokenKind::Number,
                    Some("bool_lit") => TokenKind::Bool,
                    Some("null_lit") => TokenKind::Null,
                    _ => TokenKind::String,
                };
                self.literal(kind, *inner)
            }
            "string_lit" => self.literal(TokenKind::String, *inner),
            "template_expr" => match named_children(*inner).first().map(|c| c.kind()) {
                Some("heredoc_template") => self.literal(TokenKind::Heredoc, *inner),
                _ => self.literal(TokenKind::String, *inner),
            },
            "collection_value" => match named_children(*inner).first() {
                Some(c) if c.kind() == "object" => Node::Object(ObjectType {
                    list: self.object_elems(*c),
                }),
                Some(c) if c.kind() == "tuple" => Node::List(ListType {
                    list: named_children(*c)
                        .into_iter()
                        .filter(|e| e.kind() == "expression")
                        .map(|e| self.expression(e))
                        .collect(),
                }),
                _ => Node::Expression {
                    text: self.text(node),
                },
            },
            "operation" | "unary_operation" => {
                self.negative_number(*inner).unwrap_or_else(|| Node::Expression {
                    text: self.text(node),
                })
            }
            _ => Node::Expression {
                text: self.text(node),
            },
        }
    }

    /// `-` directly followed by a numeric literal reads as one number token.
    fn negative_number(&self, node: TsNode) -> Option<Node> {
        let unary = if node.kind() == "unary_operation" {
            node
        } else {
            named_children(node)
                .into_iter()
                .find(|c| c.kind() == "unary_operation")?
        };

        let operands = named_children(unary);
        let [operand] = operands.as_slice() else {
            return None;
        };
        let is_numeric = operand.kind() == "literal_value"
            && named_children(*operand)
                .first()
                .is_some_and(|c| c.kind() == "numeric_lit");

        let text = self.text(unary);
        let rest = text.strip_prefix('-')?;
        if !is_numeric || !rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        Some(Node::Literal(LiteralType {
            token: Token::new(TokenKind::Number, text),
        }))
    }

    fn literal(&self, kind: TokenKind, node: TsNode) -> Node {
        Node::Literal(LiteralType {
            token: Token::new(kind, self.text(node)),
        })
    }

    fn object_elems(&self, object: TsNode) -> ObjectList {
        let mut items = Vec::new();
        for elem in named_children(object) {
            if elem.kind() != "object_elem" {
                continue;
            }
            let exprs: Vec<TsNode> = named_children(elem)
                .into_iter()
                .filter(|c| c.kind() == "expression")
                .collect();
            let key = elem.child_by_field_name("key").or(exprs.first().copied());
            let val = elem.child_by_field_name("val").or(exprs.last().copied());
            let (Some(key), Some(val)) = (key, val) else {
                continue;
            };

            let token = match self.expression(key) {
                Node::Literal(lit) => lit.token,
                _ => Token::ident(self.text(key)),
            };
            items.push(ObjectItem {
                keys: vec![ObjectKey { token }],
                value: self.expression(val),
                lead_comment: None,
            });
        }
        ObjectList { items }
    }

    fn group(&self, nodes: &[TsNode]) -> CommentGroup {
        CommentGroup {
            list: nodes
                .iter()
                .map(|n| Comment {
                    text: self.text(*n).trim_end().to_string(),
                })
                .collect(),
        }
    }

    /// All comments in the file, grouped by line adjacency.
    fn comment_groups(&self, root: TsNode) -> Vec<CommentGroup> {
        let mut comments = Vec::new();
        collect_comments(root, &mut comments);

        let mut groups = Vec::new();
        let mut current: Vec<TsNode> = Vec::new();
        for c in comments {
            if let Some(prev) = current.last() {
                if prev.end_position().row + 1 != c.start_position().row {
                    groups.push(self.group(&current));
                    current.clear();
                }
            }
            current.push(c);
        }
        if !current.is_empty() {
            groups.push(self.group(&current));
        }
        groups
    }
}

fn named_children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn flatten_body<'t>(node: TsNode<'t>, out: &mut Vec<TsNode<'t>>) {
    for child in named_children(node) {
        match child.kind() {
            "body" => flatten_body(child, out),
            "comment" | "attribute" | "block" => out.push(child),
            _ => {}
        }
    }
}

fn collect_comments<'t>(node: TsNode<'t>, out: &mut Vec<TsNode<'t>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "comment" {
            out.push(child);
        } else {
            collect_comments(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> File {
        HclParser::new().parse_source("test.tf", source).unwrap()
    }

    fn items(file: &File) -> &[ObjectItem] {
        &file.object_list().expect("object list root").items
    }

    fn body(item: &ObjectItem) -> &[ObjectItem] {
        match &item.value {
            Node::Object(obj) => &obj.list.items,
            other => panic!("expected block body, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_parse_empty() {
        let file = parse("");
        assert!(items(&file).is_empty());
        assert!(file.comments.is_empty());
    }

    #[test]
    fn test_parse_block_keys_keep_quotes() {
        let file = parse("variable \"region\" {}\n");
        let item = &items(&file)[0];
        assert_eq!(item.keys[0].token, Token::ident("variable"));
        assert_eq!(item.keys[1].token, Token::string("\"region\""));
        assert!(body(item).is_empty());
    }

    #[test]
    fn test_parse_bare_label() {
        let file = parse("variable region {}\n");
        assert_eq!(items(&file)[0].keys[1].token, Token::ident("region"));
    }

    #[test]
    fn test_parse_attribute_literals() {
        let file = parse(
            r#"
variable "x" {
  description = "Some text"
  default     = 42
  sensitive   = true
  nothing     = null
}
"#,
        );
        let attrs = body(&items(&file)[0]);
        let lit = |i: usize| match &attrs[i].value {
            Node::Literal(lit) => lit.token.clone(),
            other => panic!("expected literal, got {}", other.kind_name()),
        };

        assert_eq!(attrs[0].key_text(0), Some("description"));
        assert_eq!(lit(0), Token::string("\"Some text\""));
        assert_eq!(lit(1), Token::new(TokenKind::Number, "42"));
        assert_eq!(lit(2), Token::new(TokenKind::Bool, "true"));
        assert_eq!(lit(3), Token::new(TokenKind::Null, "null"));
    }

    #[test]
    fn test_parse_negative_numbers() {
        let file = parse(
            r#"
variable "x" {
  a = -1
  b = -0.5
  c = !true
  d = - 1
}
"#,
        );
        let attrs = body(&items(&file)[0]);

        assert_eq!(
            attrs[0].value,
            Node::literal(Token::new(TokenKind::Number, "-1"))
        );
        assert_eq!(
            attrs[1].value,
            Node::literal(Token::new(TokenKind::Number, "-0.5"))
        );
        assert!(matches!(&attrs[2].value, Node::Expression { text } if text == "!true"));
        assert!(matches!(&attrs[3].value, Node::Expression { .. }));
    }

    #[test]
    fn test_parse_collections_and_expressions() {
        let file = parse(
            r#"
variable "x" {
  type    = string
  default = { a = 1 }
  list    = ["a", "b"]
}
"#,
        );
        let attrs = body(&items(&file)[0]);
        assert!(matches!(&attrs[0].value, Node::Expression { text } if text == "string"));
        match &attrs[1].value {
            Node::Object(obj) => {
                assert_eq!(obj.list.items.len(), 1);
                assert_eq!(obj.list.items[0].key_text(0), Some("a"));
            }
            other => panic!("expected object, got {}", other.kind_name()),
        }
        match &attrs[2].value {
            Node::List(list) => assert_eq!(list.list.len(), 2),
            other => panic!("expected list, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_parse_lead_comment() {
        let file = parse(
            r#"
// The resource ARN
// second line
output "arn" {
  value = aws_s3_bucket.b.arn
}

// detached

output "id" {
  value = aws_s3_bucket.b.id
}
"#,
        );
        let outs = items(&file);
        let lead = outs[0].lead_comment.as_ref().expect("lead comment");
        let texts: Vec<&str> = lead.list.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["// The resource ARN", "// second line"]);
        assert!(outs[1].lead_comment.is_none());
    }

    #[test]
    fn test_parse_trailing_comment_is_not_lead() {
        let file = parse("a = 1 // about a\nb = 2\n");
        assert!(items(&file)[1].lead_comment.is_none());
    }

    #[test]
    fn test_parse_file_comments_grouped() {
        let file = parse("/**\n * Header\n */\n\n// one\n// two\nx = 1\n");
        assert_eq!(file.comments.len(), 2);
        assert!(file.comments[0].list[0].text.starts_with("/**"));
        assert_eq!(file.comments[1].list.len(), 2);
    }

    #[test]
    fn test_parse_syntax_error() {
        let err = HclParser::new()
            .parse_source("broken.tf", "variable \"x\" {\n  default = \n")
            .unwrap_err();
        match err {
            DocError::Parse { file, .. } => assert_eq!(file, "broken.tf"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
