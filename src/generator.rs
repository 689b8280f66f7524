use crate::printer::wrap;
use crate::types::{DocComment, Property, Scalar, SchemaSet, Type};
use codegen::{Enum, Field, Formatter, Scope, Variant};
use heck::CamelCase;
use std::collections::HashSet;
use std::fmt;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

const DERIVES: &[&str] = &["Serialize", "Deserialize", "Debug", "Clone"];

// "/// " in front of every doc line
const DOC_PREFIX_WIDTH: usize = 4;
// codegen indents fields by four spaces
const FIELD_INDENT: usize = 4;

/// Types that only exist inline in a field and get a declaration of their own.
enum Inline<'a> {
    Enum {
        name: String,
        members: &'a [Type],
    },
    Struct {
        name: String,
        properties: &'a [Property],
    },
}

pub struct Generator<'a> {
    types: &'a SchemaSet,
    scope: Scope,
    taken: HashSet<String>,
    comment_line_max_length: usize,
}

impl<'a> Generator<'a> {
    pub fn new(types: &'a SchemaSet, comment_line_max_length: usize) -> Self {
        let mut scope = Scope::new();

        scope.import("serde", "Deserialize");
        scope.import("serde", "Serialize");

        Self {
            types,
            scope,
            taken: types.names().map(String::from).collect(),
            comment_line_max_length,
        }
    }

    pub fn generate(&mut self) {
        let types = self.types;

        for (name, ty) in types {
            self.generate_entry(name, ty);
        }
    }

    fn generate_entry(&mut self, name: &str, ty: &'a Type) {
        let docs = self.docs(ty.comments(), 0);

        match ty {
            Type::Structure { properties, .. } => self.generate_struct(name, properties, &docs),
            Type::Variants { types, .. } => self.generate_enum(name, types, &docs),
            Type::Any { .. } => self.generate_placeholder(name, &docs),
            Type::Scalar(_) | Type::Name { .. } | Type::Array { .. } => {
                let mut inline = vec![];
                let target = self.rust_type(name, "item", ty, false, &mut inline);

                self.scope.raw(&format!("pub type {} = {};", name, target));
                self.generate_inline(inline);
            }
        }
    }

    fn generate_struct(&mut self, name: &str, properties: &'a [Property], docs: &[String]) {
        if properties.is_empty() {
            return self.generate_placeholder(name, docs);
        }

        let mut inline = vec![];

        let fields: Vec<Field> = properties
            .iter()
            .map(|property| self.field(name, property, &mut inline))
            .collect();

        let strct = self.scope.new_struct(name);

        strct.vis("pub");

        if !docs.is_empty() {
            strct.doc(&docs.join("\n"));
        }

        for derive in DERIVES {
            strct.derive(derive);
        }

        for field in fields {
            strct.push_field(field);
        }

        self.generate_inline(inline);
    }

    fn field(
        &mut self,
        owner: &str,
        property: &'a Property,
        inline: &mut Vec<Inline<'a>>,
    ) -> Field {
        let ty = self.rust_type(owner, &property.name, &property.ty, true, inline);
        let ty = if property.optional {
            format!("Option<{}>", ty)
        } else {
            ty
        };

        let name = field_name(&property.name);
        let docs = match &property.description {
            Some(description) => self.docs(std::slice::from_ref(description), FIELD_INDENT),
            None => vec![],
        };

        let mut field = Field::new(&format!("pub {}", name), ty);

        field.doc(docs.iter().map(String::as_str).collect());

        // raw identifiers keep their name on the wire, suffixed ones do not
        if name != property.name && !name.starts_with("r#") {
            let rename = format!("#[serde(rename = \"{}\")]", property.name);

            field.annotation(vec![rename.as_str()]);
        }

        field
    }

    /// Unions are untagged and always box their named members, so unions that
    /// refer to each other still have a known size.
    fn generate_enum(&mut self, name: &str, members: &'a [Type], docs: &[String]) {
        let mut inline = vec![];

        let variants: Vec<Variant> = members
            .iter()
            .map(|member| {
                let variant_name = variant_name(member);
                let ty = self.rust_type(name, &variant_name, member, true, &mut inline);
                let mut variant = Variant::new(&variant_name);

                variant.tuple(&ty);
                variant
            })
            .collect();

        let mut new_enum = Enum::new(name);

        new_enum.vis("pub");

        if !docs.is_empty() {
            new_enum.doc(&docs.join("\n"));
        }

        for derive in DERIVES {
            new_enum.derive(derive);
        }

        for variant in variants {
            new_enum.push_variant(variant);
        }

        // codegen has no attribute hook on enums, the serde one goes after derives
        let mut code = String::new();
        let _ = new_enum.fmt(&mut Formatter::new(&mut code));

        let derive = derive_line();
        let code = code.replacen(&derive, &format!("{}#[serde(untagged)]\n", derive), 1);

        self.scope.raw(code.trim_end());
        self.generate_inline(inline);
    }

    /// Empty braced struct, so an empty JSON object still deserializes into it.
    fn generate_placeholder(&mut self, name: &str, docs: &[String]) {
        let mut code: Vec<String> = docs.iter().map(|line| format!("/// {}", line)).collect();

        code.push(derive_line().trim_end().to_string());
        code.push(format!("pub struct {} {{}}", name));

        self.scope.raw(&code.join("\n"));
    }

    fn generate_inline(&mut self, inline: Vec<Inline<'a>>) {
        for item in inline {
            match item {
                Inline::Enum { name, members } => self.generate_enum(&name, members, &[]),
                Inline::Struct { name, properties } => self.generate_struct(&name, properties, &[]),
            }
        }
    }

    /// Wrapped doc lines, a blank line between blocks, then one `See` line per link.
    fn docs(&self, comments: &[DocComment], indent: usize) -> Vec<String> {
        let width = self
            .comment_line_max_length
            .saturating_sub(indent + DOC_PREFIX_WIDTH)
            .max(1);

        let mut lines = vec![];

        for (i, comment) in comments.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }

            lines.extend(wrap(&comment.text, width));
            lines.extend(comment.links().into_iter().map(|link| format!("See {}", link)));
        }

        lines
    }

    fn rust_type(
        &mut self,
        owner: &str,
        field: &str,
        ty: &'a Type,
        boxed: bool,
        inline: &mut Vec<Inline<'a>>,
    ) -> String {
        match ty {
            Type::Scalar(Scalar::Boolean) => "bool".to_string(),
            Type::Scalar(Scalar::Integer) => "i64".to_string(),
            Type::Scalar(Scalar::Float) => "f64".to_string(),
            Type::Scalar(Scalar::String) => "String".to_string(),
            Type::Name { name, .. } => boxed_if(name.clone(), boxed),
            Type::Array { item, .. } => {
                format!("Vec<{}>", self.rust_type(owner, field, item, false, inline))
            }
            Type::Variants { types, .. } => {
                let name = self.inline_name(owner, field);

                inline.push(Inline::Enum {
                    name: name.clone(),
                    members: types,
                });

                name
            }
            Type::Structure { properties, .. } => {
                let name = self.inline_name(owner, field);

                inline.push(Inline::Struct {
                    name: name.clone(),
                    properties,
                });

                boxed_if(name, boxed)
            }
            Type::Any { .. } => {
                let name = self.inline_name(owner, field);

                inline.push(Inline::Struct {
                    name: name.clone(),
                    properties: &[],
                });

                boxed_if(name, boxed)
            }
        }
    }

    /// `{Owner}{Field}`, with a numeric suffix when the name is already taken by
    /// an entry of the set or an earlier inline type.
    fn inline_name(&mut self, owner: &str, field: &str) -> String {
        let base = format!("{}{}", owner, field.to_camel_case());
        let mut name = base.clone();
        let mut suffix = 2;

        while self.taken.contains(&name) {
            name = format!("{}{}", base, suffix);
            suffix += 1;
        }

        self.taken.insert(name.clone());

        name
    }
}

impl<'a> fmt::Display for Generator<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scope.to_string())
    }
}

fn derive_line() -> String {
    format!("#[derive({})]\n", DERIVES.join(", "))
}

fn boxed_if(name: String, boxed: bool) -> String {
    if boxed {
        format!("Box<{}>", name)
    } else {
        name
    }
}

fn variant_name(ty: &Type) -> String {
    match ty {
        Type::Scalar(Scalar::Boolean) => "Boolean".to_string(),
        Type::Scalar(Scalar::Integer) => "Integer".to_string(),
        Type::Scalar(Scalar::Float) => "Float".to_string(),
        Type::Scalar(Scalar::String) => "String".to_string(),
        Type::Any { .. } => "Any".to_string(),
        Type::Name { name, .. } => name.clone(),
        Type::Array { item, .. } => format!("ArrayOf{}", variant_name(item)),
        Type::Variants { .. } => "Variants".to_string(),
        Type::Structure { .. } => "Structure".to_string(),
    }
}

fn field_name(name: &str) -> String {
    match name {
        "self" | "super" | "crate" | "Self" => format!("{}_", name),
        name if KEYWORDS.contains(&name) => format!("r#{}", name),
        name => name.to_string(),
    }
}
