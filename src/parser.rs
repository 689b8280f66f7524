use crate::error::{Error, Result};
use crate::extractor::{select_all, Extractor, HEADING_TAG, TYPE_NAME};
use crate::types::{SchemaSet, Type};
use kuchiki::parse_html;
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;
use tracing::{debug, warn};

pub struct Parser {
    html: String,
}

impl Parser {
    pub fn new(html: String) -> Self {
        Self { html }
    }

    pub fn parse(&self) -> Result<SchemaSet> {
        let document = parse_html().one(self.html.clone());

        build(&document)
    }
}

/// Extracts every type heading of the document and checks that all
/// references between them resolve.
pub fn build(document: &NodeRef) -> Result<SchemaSet> {
    let mut types = SchemaSet::new();

    for heading in select_all(document, HEADING_TAG)? {
        let extractor = Extractor::new(&heading);
        let name = extractor.name();

        if !TYPE_NAME.is_match(&name) {
            continue;
        }

        let ty = extractor
            .extract()
            .map_err(|error| Error::in_schema(&name, error))?;

        debug!(
            "Parsed '{}' ({} comments)",
            name,
            ty.comments().len()
        );

        if types.insert(name.clone(), ty).is_some() {
            warn!("Type '{}' defined more than once, keeping the last one", name);
        }
    }

    check_types(&types)?;

    Ok(types)
}

pub fn check_types(types: &SchemaSet) -> Result<()> {
    for (name, ty) in types {
        check_type(types, name, ty)?;
    }

    Ok(())
}

fn check_type(types: &SchemaSet, owner: &str, ty: &Type) -> Result<()> {
    match ty {
        Type::Scalar(_) | Type::Any { .. } => Ok(()),
        Type::Name { name, .. } => {
            if types.contains(name) {
                Ok(())
            } else {
                Err(Error::UnresolvedReference {
                    name: name.clone(),
                    referenced_by: owner.to_string(),
                })
            }
        }
        Type::Variants { types: members, .. } => members
            .iter()
            .try_for_each(|member| check_type(types, owner, member)),
        Type::Array { item, .. } => check_type(types, owner, item),
        Type::Structure { properties, .. } => properties
            .iter()
            .try_for_each(|property| check_type(types, owner, &property.ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Property, Scalar};
    use std::fs;

    #[test]
    fn it_parses_types_page() {
        let html = fs::read_to_string("./test/support/types_example.html").unwrap();

        let types = Parser::new(html).parse().unwrap();

        assert_eq!(
            vec![
                "Update",
                "Message",
                "PhotoSize",
                "MaybeInaccessibleMessage",
                "InaccessibleMessage",
                "CallbackGame",
                "InputFile"
            ],
            types.names().collect::<Vec<_>>()
        );

        let update = types.get("Update").unwrap();
        assert_eq!(
            "This object represents an incoming update.",
            update.comments()[0].text
        );

        match update {
            Type::Structure { properties, .. } => {
                assert_eq!(
                    vec![
                        Property::new("update_id", Type::Scalar(Scalar::Integer)),
                        Property::new("message", Type::name("Message")).optional()
                    ],
                    properties
                        .iter()
                        .map(|p| Property {
                            description: None,
                            ..p.clone()
                        })
                        .collect::<Vec<_>>()
                );
            }
            other => panic!("expected structure, got {:?}", other),
        }

        assert!(types.get("MaybeInaccessibleMessage").unwrap().is_variants());

        let callback_game = types.get("CallbackGame").unwrap();
        assert!(matches!(callback_game, Type::Any { .. }));
        assert_eq!(1, callback_game.comments().len());
        assert_eq!(&Type::any(), types.get("InputFile").unwrap());
    }

    #[test]
    fn it_skips_method_and_section_headings() {
        let html = fs::read_to_string("./test/support/types_example.html").unwrap();

        let types = Parser::new(html).parse().unwrap();

        assert!(!types.contains("getMe"));
        assert!(!types.contains("Formatting options"));
    }

    #[test]
    fn it_fails_on_dangling_reference() {
        let html = fs::read_to_string("./test/support/dangling_reference_example.html").unwrap();

        let result = Parser::new(html).parse();

        match result {
            Err(Error::UnresolvedReference {
                name,
                referenced_by,
            }) => {
                assert_eq!("Chat", name);
                assert_eq!("Message", referenced_by);
            }
            other => panic!("expected unresolved reference, got {:?}", other),
        }
    }

    #[test]
    fn it_names_the_heading_of_a_bad_table() {
        let html = r#"<h4>Poll</h4><table><thead><tr><th>Field</th><th>Type</th><th>Default</th></tr></thead><tbody></tbody></table>"#;

        let error = Parser::new(html.to_string()).parse().unwrap_err();

        assert_eq!(
            "In type 'Poll': Unrecognized column 'Default'",
            error.to_string()
        );
    }

    #[test]
    fn it_finds_references_nested_in_arrays_and_variants() {
        let mut types = SchemaSet::new();

        types.insert("PhotoSize", Type::any());
        types.insert(
            "Message",
            Type::structure(vec![Property::new(
                "photo",
                Type::array(Type::variants(vec![
                    Type::name("PhotoSize"),
                    Type::name("Video"),
                ])),
            )]),
        );

        assert!(matches!(
            check_types(&types),
            Err(Error::UnresolvedReference { name, .. }) if name == "Video"
        ));

        types.insert("Video", Type::any());
        assert!(check_types(&types).is_ok());
    }

    // Duplicate headings are never produced by the live page; this pins the
    // current last-write-wins behaviour so a change to it is deliberate.
    #[test]
    fn it_keeps_the_last_definition_of_a_duplicate_heading() {
        let html = r#"<h4>User</h4><p>First</p><h4>Chat</h4><h4>User</h4><p>Second</p>"#;

        let types = Parser::new(html.to_string()).parse().unwrap();

        assert_eq!(vec!["User", "Chat"], types.names().collect::<Vec<_>>());
        assert_eq!("Second", types.get("User").unwrap().comments()[0].text);
    }
}
