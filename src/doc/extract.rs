//! Declaration classification and field extraction

use tracing::{debug, trace};

use super::normalize::{comment, unquote_or_empty};
use super::{Input, Output};
use crate::ast::{Node, ObjectItem, ObjectList, TokenKind};
use crate::error::{DocError, Result};

/// Kind of top-level declaration this crate documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Input,
    Output,
}

impl DeclKind {
    /// Classify an item by its first key. Unknown kinds and keyless items yield `None`.
    pub fn classify(item: &ObjectItem) -> Option<Self> {
        match item.key_text(0)? {
            "variable" => Some(DeclKind::Input),
            "output" => Some(DeclKind::Output),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            DeclKind::Input => "variable",
            DeclKind::Output => "output",
        }
    }
}

/// All `variable` declarations in `list`.
pub fn inputs(file: &str, list: &ObjectList) -> Result<Vec<Input>> {
    let mut ret = Vec::new();

    for item in &list.items {
        if DeclKind::classify(item) != Some(DeclKind::Input) {
            trace!("{}: skipping {:?}", file, item.key_text(0));
            continue;
        }

        let name = name(file, item, DeclKind::Input)?;
        let items = match &item.value {
            Node::Object(obj) => &obj.list.items,
            other => {
                return Err(DocError::MalformedDeclaration {
                    file: file.to_string(),
                    kind: DeclKind::Input.keyword(),
                    reason: format!(
                        "{} has a {} body, expected a block",
                        name,
                        other.kind_name()
                    ),
                })
            }
        };

        let description = unquote_or_empty(&get(items, "description"));
        let default = get(items, "default");

        debug!("{}: input {}", file, name);
        ret.push(Input {
            name,
            description,
            default,
        });
    }

    Ok(ret)
}

/// All `output` declarations in `list`.
pub fn outputs(file: &str, list: &ObjectList) -> Result<Vec<Output>> {
    let mut ret = Vec::new();

    for item in &list.items {
        if DeclKind::classify(item) != Some(DeclKind::Output) {
            continue;
        }

        let name = name(file, item, DeclKind::Output)?;
        let description = item
            .lead_comment
            .as_ref()
            .map(|c| comment(&c.list))
            .unwrap_or_default();

        debug!("{}: output {}", file, name);
        ret.push(Output { name, description });
    }

    Ok(ret)
}

/// Literal text of the first item keyed `key`, or an empty string.
///
/// Nested blocks, lists and expressions are not descended into.
pub fn get(items: &[ObjectItem], key: &str) -> String {
    match items.iter().find(|item| item.key_text(0) == Some(key)) {
        Some(ObjectItem {
            value: Node::Literal(lit),
            ..
        }) => lit.token.text.clone(),
        _ => String::new(),
    }
}

/// Declared name: the second key, unquoted. Bare identifiers are taken as-is.
fn name(file: &str, item: &ObjectItem, kind: DeclKind) -> Result<String> {
    let malformed = |reason: String| DocError::MalformedDeclaration {
        file: file.to_string(),
        kind: kind.keyword(),
        reason,
    };

    let key = item
        .keys
        .get(1)
        .ok_or_else(|| malformed("missing name label".to_string()))?;

    let name = match key.token.kind {
        TokenKind::Ident => key.token.text.clone(),
        _ => unquote_or_empty(&key.token.text),
    };

    if name.is_empty() {
        return Err(malformed(format!("invalid name label {}", key.token.text)));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CommentGroup, ListType, Token};

    fn lit(kind: TokenKind, text: &str) -> Node {
        Node::literal(Token::new(kind, text))
    }

    fn list(items: Vec<ObjectItem>) -> ObjectList {
        ObjectList { items }
    }

    #[test]
    fn test_classify() {
        let var = ObjectItem::block("variable", "x", vec![]);
        let out = ObjectItem::block("output", "x", vec![]);
        let res = ObjectItem::new(
            vec![
                Token::ident("resource"),
                Token::string("\"aws_s3_bucket\""),
                Token::string("\"b\""),
            ],
            Node::object(vec![]),
        );
        let keyless = ObjectItem::new(vec![], Node::object(vec![]));

        assert_eq!(DeclKind::classify(&var), Some(DeclKind::Input));
        assert_eq!(DeclKind::classify(&out), Some(DeclKind::Output));
        assert_eq!(DeclKind::classify(&res), None);
        assert_eq!(DeclKind::classify(&keyless), None);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let item = ObjectItem::block("Variable", "x", vec![]);
        assert_eq!(DeclKind::classify(&item), None);
    }

    #[test]
    fn test_get_literal_verbatim() {
        let items = vec![
            ObjectItem::attribute("default", lit(TokenKind::Number, "42")),
            ObjectItem::attribute("description", lit(TokenKind::String, "\"x\"")),
        ];
        assert_eq!(get(&items, "default"), "42");
        assert_eq!(get(&items, "description"), "\"x\"");
        assert_eq!(get(&items, "type"), "");
    }

    #[test]
    fn test_get_ignores_non_literals() {
        let items = vec![
            ObjectItem::attribute(
                "default",
                Node::object(vec![ObjectItem::attribute("a", lit(TokenKind::Number, "1"))]),
            ),
            ObjectItem::attribute("tags", Node::List(ListType::default())),
            ObjectItem::attribute("type", Node::Expression { text: "string".into() }),
        ];
        assert_eq!(get(&items, "default"), "");
        assert_eq!(get(&items, "tags"), "");
        assert_eq!(get(&items, "type"), "");
    }

    #[test]
    fn test_get_first_match_wins() {
        let items = vec![
            ObjectItem::attribute("default", Node::object(vec![])),
            ObjectItem::attribute("default", lit(TokenKind::Number, "1")),
        ];
        assert_eq!(get(&items, "default"), "");
    }

    #[test]
    fn test_inputs() {
        let l = list(vec![
            ObjectItem::block(
                "variable",
                "region",
                vec![
                    ObjectItem::attribute("description", lit(TokenKind::String, "\"AWS region\"")),
                    ObjectItem::attribute("default", lit(TokenKind::String, "\"us-east-1\"")),
                ],
            ),
            ObjectItem::block(
                "variable",
                "count",
                vec![ObjectItem::attribute("default", lit(TokenKind::Number, "3"))],
            ),
            ObjectItem::block("output", "arn", vec![]),
        ]);

        let got = inputs("main.tf", &l).unwrap();
        assert_eq!(
            got,
            vec![
                Input {
                    name: "region".into(),
                    description: "AWS region".into(),
                    default: "\"us-east-1\"".into(),
                },
                Input {
                    name: "count".into(),
                    description: String::new(),
                    default: "3".into(),
                },
            ]
        );
    }

    #[test]
    fn test_inputs_bad_description_degrades_to_empty() {
        let l = list(vec![ObjectItem::block(
            "variable",
            "x",
            vec![ObjectItem::attribute("description", lit(TokenKind::Heredoc, "<<EOT\nhi\nEOT"))],
        )]);
        assert_eq!(inputs("main.tf", &l).unwrap()[0].description, "");
    }

    #[test]
    fn test_inputs_bare_identifier_name() {
        let item = ObjectItem::new(
            vec![Token::ident("variable"), Token::ident("zone")],
            Node::object(vec![]),
        );
        assert_eq!(inputs("main.tf", &list(vec![item])).unwrap()[0].name, "zone");
    }

    #[test]
    fn test_inputs_missing_name_is_error() {
        let item = ObjectItem::new(vec![Token::ident("variable")], Node::object(vec![]));
        let err = inputs("main.tf", &list(vec![item])).unwrap_err();
        assert!(matches!(err, DocError::MalformedDeclaration { kind: "variable", .. }));
    }

    #[test]
    fn test_inputs_empty_name_is_error() {
        let item = ObjectItem::new(
            vec![Token::ident("variable"), Token::string("\"\"")],
            Node::object(vec![]),
        );
        assert!(inputs("main.tf", &list(vec![item])).is_err());
    }

    #[test]
    fn test_inputs_non_block_body_is_error() {
        let item = ObjectItem::new(
            vec![Token::ident("variable"), Token::string("\"x\"")],
            lit(TokenKind::Number, "1"),
        );
        let err = inputs("vars.tf", &list(vec![item])).unwrap_err();
        assert!(err.to_string().contains("vars.tf"));
    }

    #[test]
    fn test_outputs_lead_comment() {
        let l = list(vec![
            ObjectItem::block("output", "arn", vec![])
                .with_lead_comment(CommentGroup::from_lines(["// The resource ARN"])),
            ObjectItem::block("output", "id", vec![]),
            ObjectItem::block("variable", "x", vec![]),
        ]);

        let got = outputs("outputs.tf", &l).unwrap();
        assert_eq!(
            got,
            vec![
                Output {
                    name: "arn".into(),
                    description: "The resource ARN\n".into(),
                },
                Output {
                    name: "id".into(),
                    description: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_outputs_ignore_description_field() {
        let l = list(vec![ObjectItem::block(
            "output",
            "arn",
            vec![ObjectItem::attribute("description", lit(TokenKind::String, "\"field\""))],
        )]);
        assert_eq!(outputs("o.tf", &l).unwrap()[0].description, "");
    }

    #[test]
    fn test_outputs_missing_name_is_error() {
        let item = ObjectItem::new(vec![Token::ident("output")], Node::object(vec![]));
        assert!(outputs("o.tf", &list(vec![item])).is_err());
    }

    #[test]
    fn test_no_declarations_yield_empty() {
        let l = list(vec![ObjectItem::block("provider", "aws", vec![])]);
        assert!(inputs("m.tf", &l).unwrap().is_empty());
        assert!(outputs("m.tf", &l).unwrap().is_empty());
    }
}
