use crate::config::{BOT_API_URL, TELEGRAM_URL};
use indexmap::map::Iter;
use indexmap::IndexMap;
use kuchiki::parse_html;
use kuchiki::traits::TendrilSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Boolean,
    Integer,
    Float,
    String,
}

impl Scalar {
    /// Maps the names used in the type column of the API page.
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "Boolean" | "True" => Some(Scalar::Boolean),
            "Integer" => Some(Scalar::Integer),
            "Float" | "Float number" => Some(Scalar::Float),
            "String" => Some(Scalar::String),
            _ => None,
        }
    }
}

/// A documentation block as found in the page: raw markup and visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    pub html: String,
    pub text: String,
}

impl DocComment {
    pub fn new(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            text: text.into(),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();

        Self {
            html: text.clone(),
            text,
        }
    }

    /// Hyperlink targets of the markup in document order, without duplicates.
    /// Anchors and site paths are resolved against the API page.
    pub fn links(&self) -> Vec<String> {
        let document = parse_html().one(self.html.as_str());
        let mut links: Vec<String> = vec![];

        let anchors = match document.select("a") {
            Ok(anchors) => anchors,
            Err(()) => return links,
        };

        for anchor in anchors {
            let attributes = anchor.attributes.borrow();

            let link = match attributes.get("href") {
                Some(href) if href.starts_with("http") => href.to_string(),
                Some(href) if href.starts_with('/') => format!("{}{}", TELEGRAM_URL, href),
                Some(href) if !href.is_empty() => format!("{}{}", BOT_API_URL, href),
                _ => continue,
            };

            if !links.contains(&link) {
                links.push(link);
            }
        }

        links
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    pub description: Option<DocComment>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            description: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn described(mut self, description: DocComment) -> Self {
        self.description = Some(description);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Scalar(Scalar),
    Any {
        comments: Vec<DocComment>,
    },
    Name {
        name: String,
        comments: Vec<DocComment>,
    },
    Variants {
        types: Vec<Type>,
        comments: Vec<DocComment>,
    },
    Array {
        item: Box<Type>,
        comments: Vec<DocComment>,
    },
    Structure {
        properties: Vec<Property>,
        comments: Vec<DocComment>,
    },
}

impl Type {
    pub fn name(name: impl Into<String>) -> Self {
        Type::Name {
            name: name.into(),
            comments: vec![],
        }
    }

    pub fn array(item: Type) -> Self {
        Type::Array {
            item: Box::new(item),
            comments: vec![],
        }
    }

    pub fn variants(types: Vec<Type>) -> Self {
        Type::Variants {
            types,
            comments: vec![],
        }
    }

    pub fn structure(properties: Vec<Property>) -> Self {
        Type::Structure {
            properties,
            comments: vec![],
        }
    }

    pub fn any() -> Self {
        Type::Any { comments: vec![] }
    }

    pub fn with_comments(mut self, new_comments: Vec<DocComment>) -> Self {
        match &mut self {
            Type::Scalar(_) => (),
            Type::Any { comments }
            | Type::Name { comments, .. }
            | Type::Variants { comments, .. }
            | Type::Array { comments, .. }
            | Type::Structure { comments, .. } => *comments = new_comments,
        }

        self
    }

    /// Scalars carry no documentation, so they always report an empty list.
    pub fn comments(&self) -> &[DocComment] {
        match self {
            Type::Scalar(_) => &[],
            Type::Any { comments }
            | Type::Name { comments, .. }
            | Type::Variants { comments, .. }
            | Type::Array { comments, .. }
            | Type::Structure { comments, .. } => comments,
        }
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, Type::Structure { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_variants(&self) -> bool {
        matches!(self, Type::Variants { .. })
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Scalar(_))
    }
}

/// Every schema entry of the page keyed by heading text, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    types: IndexMap<String, Type>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value of an existing entry in place and returns the old one.
    pub fn insert(&mut self, name: impl Into<String>, ty: Type) -> Option<Type> {
        self.types.insert(name.into(), ty)
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Type> {
        self.types.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a SchemaSet {
    type Item = (&'a String, &'a Type);
    type IntoIter = Iter<'a, String, Type>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_api_scalar_names() {
        assert_eq!(Some(Scalar::Boolean), Scalar::from_api_name("True"));
        assert_eq!(Some(Scalar::Float), Scalar::from_api_name("Float number"));
        assert_eq!(Some(Scalar::Integer), Scalar::from_api_name("Integer"));
        assert_eq!(None, Scalar::from_api_name("Int"));
    }

    #[test]
    fn it_resolves_description_links() {
        let comment = DocComment::new(
            r##"See <a href="#setwebhook">setWebhook</a>, <a href="/bots/webapps">Web Apps</a>, <a href="https://t.me/botfather">BotFather</a> and <a href="#setwebhook">again</a>"##,
            "See setWebhook, Web Apps, BotFather and again",
        );

        assert_eq!(
            vec![
                "https://core.telegram.org/bots/api#setwebhook",
                "https://core.telegram.org/bots/webapps",
                "https://t.me/botfather",
            ],
            comment.links()
        );
        assert!(DocComment::from_text("No links").links().is_empty());
    }

    #[test]
    fn it_attaches_comments_to_documented_nodes_only() {
        let comment = DocComment::from_text("Some doc");

        let any = Type::any().with_comments(vec![comment.clone()]);
        let scalar = Type::Scalar(Scalar::String).with_comments(vec![comment.clone()]);

        assert_eq!(&[comment], any.comments());
        assert!(scalar.comments().is_empty());
        assert!(scalar.is_scalar());
    }

    #[test]
    fn it_keeps_first_position_on_duplicate_insert() {
        let mut set = SchemaSet::new();

        set.insert("Update", Type::any());
        set.insert("User", Type::any());
        let replaced = set.insert("Update", Type::structure(vec![]));

        assert_eq!(Some(Type::any()), replaced);
        assert_eq!(vec!["Update", "User"], set.names().collect::<Vec<_>>());
        assert!(set.get("Update").map_or(false, Type::is_structure));
    }
}
