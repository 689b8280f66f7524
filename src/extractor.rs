use crate::error::{Error, Result};
use crate::types::{DocComment, Property, Scalar, Type};
use kuchiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

pub(crate) const HEADING_TAG: &str = "h4";
const SECTION_TAG: &str = "h3";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("identifier pattern"));
pub(crate) static TYPE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9_]*$").expect("type name pattern"));
static SCALAR_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\s]+$").expect("scalar pattern"));
static ARRAY_OF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Array of\s*").expect("array prefix pattern"));

/// Builds the schema node described by the siblings of one heading.
pub struct Extractor<'a> {
    heading: &'a NodeRef,
}

impl<'a> Extractor<'a> {
    pub fn new(heading: &'a NodeRef) -> Self {
        Self { heading }
    }

    pub fn name(&self) -> String {
        self.heading.text_contents().trim().to_string()
    }

    pub fn extract(&self) -> Result<Type> {
        let comments = self.comments();

        if let Some(table) = self.find_next("table") {
            let properties = TableParser::new(&table).parse()?;

            return Ok(Type::structure(properties).with_comments(comments));
        }

        if let Some(list) = self.find_next("ul") {
            let names = ListParser::new(&list).parse()?;

            return Ok(Type::variants(names).with_comments(comments));
        }

        warn!("Type '{}' set any", self.name());

        Ok(Type::any().with_comments(comments))
    }

    fn comments(&self) -> Vec<DocComment> {
        self.following_elements()
            .take_while(|node| is_tag(node, "p"))
            .map(|node| doc_comment(&node))
            .collect()
    }

    /// First sibling with the given tag that comes before the next heading
    /// or section title.
    fn find_next(&self, tag: &str) -> Option<NodeRef> {
        self.following_elements()
            .take_while(|node| !is_tag(node, HEADING_TAG) && !is_tag(node, SECTION_TAG))
            .find(|node| is_tag(node, tag))
    }

    fn following_elements(&self) -> impl Iterator<Item = NodeRef> {
        self.heading
            .following_siblings()
            .filter(|node| node.as_element().is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Parameter,
    Field,
    Type,
    Required,
    Description,
}

impl Column {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "Parameter" => Ok(Column::Parameter),
            "Field" => Ok(Column::Field),
            "Type" => Ok(Column::Type),
            "Required" => Ok(Column::Required),
            "Description" => Ok(Column::Description),
            other => Err(Error::UnrecognizedColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Link { href: String, text: String },
}

pub struct TableParser<'a> {
    table: &'a NodeRef,
}

impl<'a> TableParser<'a> {
    pub fn new(table: &'a NodeRef) -> Self {
        Self { table }
    }

    pub fn parse(&self) -> Result<Vec<Property>> {
        let columns = self.parse_columns()?;

        select_all(self.table, "tbody > tr")?
            .iter()
            .map(|row| self.parse_row(&columns, row))
            .collect()
    }

    fn parse_columns(&self) -> Result<Vec<Column>> {
        let columns = select_all(self.table, "thead > tr > th")?
            .iter()
            .map(|th| Column::parse(th.text_contents().trim()))
            .collect::<Result<Vec<Column>>>()?;

        if !columns
            .iter()
            .any(|column| matches!(column, Column::Field | Column::Parameter))
        {
            return Err(Error::MissingColumn("Field"));
        }

        if !columns.contains(&Column::Type) {
            return Err(Error::MissingColumn("Type"));
        }

        Ok(columns)
    }

    fn parse_row(&self, columns: &[Column], row: &NodeRef) -> Result<Property> {
        let cells = select_all(row, "td")?;

        if cells.len() < columns.len() {
            return Err(Error::MalformedRow {
                expected: columns.len(),
                found: cells.len(),
            });
        }

        let mut name = None;
        let mut ty = None;
        let mut required = None;
        let mut description = None;

        for (column, cell) in columns.iter().zip(cells.iter()) {
            match column {
                Column::Parameter | Column::Field => name = Some(self.parse_identifier(cell)?),
                Column::Type => ty = Some(self.parse_type(cell)?),
                Column::Required => required = Some(self.parse_required(cell)?),
                Column::Description => description = Some(doc_comment(cell)),
            }
        }

        let optional = match (required, &description) {
            (Some(required), _) => !required,
            (None, Some(description)) => description.text.trim_start().starts_with("Optional."),
            (None, None) => false,
        };

        // both are present once the header validated
        let name = name.ok_or(Error::MissingColumn("Field"))?;
        let ty = ty.ok_or(Error::MissingColumn("Type"))?;

        Ok(Property {
            name,
            ty,
            optional,
            description,
        })
    }

    fn parse_identifier(&self, cell: &NodeRef) -> Result<String> {
        let name = cell.text_contents().trim().to_string();

        if !IDENTIFIER.is_match(&name) {
            return Err(Error::InvalidIdentifier(name));
        }

        Ok(name)
    }

    fn parse_required(&self, cell: &NodeRef) -> Result<bool> {
        match cell.text_contents().trim() {
            "Yes" => Ok(true),
            "Optional" => Ok(false),
            other => Err(Error::InvalidRequired(other.to_string())),
        }
    }

    fn parse_type(&self, cell: &NodeRef) -> Result<Type> {
        let source = cell.text_contents();
        let (depth, segments) = strip_arrays(segments(cell)?);

        let mut types = split_variants(segments)
            .into_iter()
            .map(|token| resolve_token(token, &source))
            .collect::<Result<Vec<Type>>>()?;

        let mut ty = if types.len() == 1 {
            types.remove(0)
        } else {
            Type::variants(types)
        };

        for _ in 0..depth {
            ty = Type::array(ty);
        }

        Ok(ty)
    }
}

pub struct ListParser<'a> {
    list: &'a NodeRef,
}

impl<'a> ListParser<'a> {
    pub fn new(list: &'a NodeRef) -> Self {
        Self { list }
    }

    pub fn parse(&self) -> Result<Vec<Type>> {
        select_all(self.list, "li")?
            .iter()
            .map(|li| {
                let name = li.text_contents().trim().to_string();

                if TYPE_NAME.is_match(&name) {
                    Ok(Type::name(name))
                } else {
                    Err(Error::InvalidListItem(name))
                }
            })
            .collect()
    }
}

pub(crate) fn select_all(node: &NodeRef, selector: &str) -> Result<Vec<NodeRef>> {
    let selected = node
        .select(selector)
        .map_err(|()| Error::Selector(selector.to_string()))?;

    Ok(selected.map(|element| element.as_node().clone()).collect())
}

pub(crate) fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.as_element()
        .map_or(false, |element| &*element.name.local == tag)
}

fn doc_comment(node: &NodeRef) -> DocComment {
    let html: String = node.children().map(|child| child.to_string()).collect();

    DocComment::new(html, node.text_contents())
}

/// Splits a type cell into plain text runs and hyperlinks.
fn segments(cell: &NodeRef) -> Result<Vec<Segment>> {
    let mut segments: Vec<Segment> = vec![];

    for child in cell.children() {
        if let Some(text) = child.as_text() {
            let text = text.borrow();

            match segments.last_mut() {
                Some(Segment::Text(previous)) => previous.push_str(&text),
                _ => segments.push(Segment::Text(text.clone())),
            }
        } else if let Some(element) = child.as_element() {
            if &*element.name.local != "a" {
                return Err(Error::InvalidType(cell.text_contents()));
            }

            let href = element
                .attributes
                .borrow()
                .get("href")
                .unwrap_or_default()
                .to_string();

            segments.push(Segment::Link {
                href,
                text: child.text_contents(),
            });
        }
    }

    Ok(segments)
}

fn strip_arrays(mut segments: Vec<Segment>) -> (usize, Vec<Segment>) {
    let mut depth = 0;

    if let Some(Segment::Text(text)) = segments.first_mut() {
        let mut rest = text.trim_start();

        while let Some(prefix) = ARRAY_OF.find(rest) {
            rest = &rest[prefix.end()..];
            depth += 1;
        }

        *text = rest.to_string();
    }

    (depth, segments)
}

fn split_variants(segments: Vec<Segment>) -> Vec<Vec<Segment>> {
    let mut tokens: Vec<Vec<Segment>> = vec![vec![]];

    for segment in segments {
        match segment {
            Segment::Text(text) => {
                for (i, part) in text.split(" or ").enumerate() {
                    if i > 0 {
                        tokens.push(vec![]);
                    }

                    let part = part.trim();

                    if !part.is_empty() {
                        if let Some(token) = tokens.last_mut() {
                            token.push(Segment::Text(part.to_string()));
                        }
                    }
                }
            }
            link => {
                if let Some(token) = tokens.last_mut() {
                    token.push(link);
                }
            }
        }
    }

    tokens
}

fn resolve_token(token: Vec<Segment>, source: &str) -> Result<Type> {
    match token.as_slice() {
        [Segment::Text(text)] if SCALAR_WORDS.is_match(text) => Scalar::from_api_name(text)
            .map(Type::Scalar)
            .ok_or_else(|| Error::UnknownScalar(text.clone())),
        [Segment::Link { href, text }] if href.starts_with('#') && IDENTIFIER.is_match(text) => {
            Ok(Type::name(text.clone()))
        }
        _ => Err(Error::InvalidType(source.trim().to_string())),
    }
}
