//! Declaration printers for JavaScript type systems.
//!
//! A single traversal renders every node kind; a [`Notation`] decides how an
//! entry is declared and whether the output is wrapped in a module.

mod flow;
mod typescript;

pub use flow::Flow;
pub use typescript::TypeScript;

use crate::types::{DocComment, Scalar, SchemaSet, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct PrinterOptions {
    pub comment_line_max_length: usize,
    pub indent: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            comment_line_max_length: 72,
            indent: "  ".to_string(),
        }
    }
}

/// The opening and closing text around a rendered type expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub head: String,
    pub tail: &'static str,
}

pub trait Notation {
    fn declaration(&self, name: &str, ty: &Type) -> Declaration;

    fn begin(&self, _ctx: &mut RenderContext) {}

    fn end(&self, _ctx: &mut RenderContext) {}

    fn scalar(&self, scalar: Scalar) -> &'static str {
        match scalar {
            Scalar::Integer | Scalar::Float => "number",
            Scalar::String => "string",
            Scalar::Boolean => "boolean",
        }
    }

    fn any(&self) -> &'static str {
        "any"
    }

    fn union_separator(&self) -> &'static str {
        " | "
    }
}

/// Output buffer and indentation state of one printing run.
pub struct RenderContext<'a> {
    options: &'a PrinterOptions,
    code: String,
    depth: usize,
    line_start: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: &'a PrinterOptions) -> Self {
        Self {
            options,
            code: String::new(),
            depth: 0,
            line_start: true,
        }
    }

    /// Appends code; every `\n` starts a new line that is indented lazily,
    /// so blank lines carry no trailing whitespace.
    pub fn push(&mut self, code: &str) {
        for (i, line) in code.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }

            if line.is_empty() {
                continue;
            }

            if self.line_start {
                for _ in 0..self.depth {
                    self.code.push_str(&self.options.indent);
                }

                self.line_start = false;
            }

            self.code.push_str(line);
        }
    }

    pub fn newline(&mut self) {
        self.code.push('\n');
        self.line_start = true;
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn indent_width(&self) -> usize {
        self.options.indent.chars().count() * self.depth
    }

    pub fn finish(self) -> String {
        self.code
    }
}

pub struct Printer<N> {
    notation: N,
    options: PrinterOptions,
}

impl<N: Notation> Printer<N> {
    pub fn new(notation: N, options: PrinterOptions) -> Self {
        Self { notation, options }
    }

    pub fn print(&self, types: &SchemaSet) -> String {
        let mut ctx = RenderContext::new(&self.options);

        self.notation.begin(&mut ctx);

        for (i, (name, ty)) in types.iter().enumerate() {
            if i > 0 {
                ctx.newline();
            }

            self.print_entry(&mut ctx, name, ty);
        }

        self.notation.end(&mut ctx);

        ctx.finish()
    }

    fn print_entry(&self, ctx: &mut RenderContext, name: &str, ty: &Type) {
        let declaration = self.notation.declaration(name, ty);

        print_comments(ctx, ty.comments());
        ctx.push(&declaration.head);
        self.print_type(ctx, ty);
        ctx.push(declaration.tail);
        ctx.newline();
    }

    pub fn print_type(&self, ctx: &mut RenderContext, ty: &Type) {
        match ty {
            Type::Scalar(scalar) => ctx.push(self.notation.scalar(*scalar)),
            Type::Any { .. } => ctx.push(self.notation.any()),
            Type::Name { name, .. } => ctx.push(name),
            Type::Array { item, .. } => {
                ctx.push("Array<");
                self.print_type(ctx, item);
                ctx.push(">");
            }
            Type::Variants { types, .. } => {
                for (i, member) in types.iter().enumerate() {
                    if i > 0 {
                        ctx.push(self.notation.union_separator());
                    }

                    self.print_type(ctx, member);
                }
            }
            Type::Structure { properties, .. } => {
                if properties.is_empty() {
                    ctx.push("{}");
                    return;
                }

                ctx.push("{");
                ctx.indent();
                ctx.newline();

                for property in properties {
                    if let Some(description) = &property.description {
                        print_comments(ctx, std::slice::from_ref(description));
                    }

                    ctx.push(&property.name);
                    ctx.push(if property.optional { "?: " } else { ": " });
                    self.print_type(ctx, &property.ty);
                    ctx.push(",");
                    ctx.newline();
                }

                ctx.dedent();
                ctx.push("}");
            }
        }
    }
}

pub fn print_comments(ctx: &mut RenderContext, comments: &[DocComment]) {
    if comments.is_empty() {
        return;
    }

    let blocks: Vec<(String, Vec<String>)> = comments
        .iter()
        .map(|c| (comment_text(&c.text), c.links()))
        .collect();
    let width = ctx.options.comment_line_max_length;
    let indent = ctx.indent_width();

    if let [(text, links)] = blocks.as_slice() {
        // "/** " + text + " */"
        if links.is_empty() && indent + text.chars().count() + 7 <= width {
            ctx.push(&format!("/** {} */", text));
            ctx.newline();
            return;
        }
    }

    // " * " prefix on every continuation line
    let available = width.saturating_sub(indent + 3).max(1);

    ctx.push("/**");
    ctx.newline();

    for (i, (text, links)) in blocks.iter().enumerate() {
        if i > 0 {
            ctx.push(" *");
            ctx.newline();
        }

        for line in wrap(text, available) {
            ctx.push(&format!(" * {}", line));
            ctx.newline();
        }

        for link in links {
            ctx.push(&format!(" * @see {}", comment_text(link)));
            ctx.newline();
        }
    }

    ctx.push(" */");
    ctx.newline();
}

fn comment_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "*\\/")
}

/// Greedy word wrap. A word longer than `width` gets a line of its own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();

    for word in text.split_whitespace() {
        let fits = line.chars().count() + 1 + word.chars().count() <= width;

        if !line.is_empty() && !fits {
            lines.push(std::mem::take(&mut line));
        }

        if !line.is_empty() {
            line.push(' ');
        }

        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Property;
    use pretty_assertions::assert_eq;

    const LONG_TEXT: &str = "The update's unique identifier. Update identifiers start from a certain positive number and increase sequentially. This ID becomes especially handy if you're using webhooks.";

    fn render_comments(comments: &[DocComment], options: &PrinterOptions) -> String {
        let mut ctx = RenderContext::new(options);

        print_comments(&mut ctx, comments);

        ctx.finish()
    }

    #[test]
    fn it_wraps_words_greedily() {
        assert_eq!(
            vec!["one two", "three", "four five"],
            wrap("one two three four five", 9)
        );
        assert_eq!(vec!["incomprehensibilities"], wrap("incomprehensibilities", 5));
    }

    #[test]
    fn it_renders_short_comment_inline() {
        let output = render_comments(
            &[DocComment::from_text("Photo width")],
            &PrinterOptions::default(),
        );

        assert_eq!("/** Photo width */\n", output);
    }

    #[test]
    fn it_wraps_long_comment_into_block() {
        let options = PrinterOptions::default();
        let output = render_comments(&[DocComment::from_text(LONG_TEXT)], &options);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines.len() > 3);
        assert_eq!("/**", lines[0]);
        assert_eq!(" */", lines[lines.len() - 1]);
        assert!(lines[1..lines.len() - 1]
            .iter()
            .all(|line| line.starts_with(" * ")));
        assert!(lines
            .iter()
            .all(|line| line.chars().count() <= options.comment_line_max_length));
    }

    #[test]
    fn it_counts_indentation_against_the_width() {
        let options = PrinterOptions {
            comment_line_max_length: 30,
            indent: "    ".to_string(),
        };
        let mut ctx = RenderContext::new(&options);

        ctx.indent();
        ctx.indent();
        print_comments(&mut ctx, &[DocComment::from_text("Twenty chars of text")]);

        let output = ctx.finish();

        assert!(output.starts_with("        /**\n"));
        assert!(output.lines().all(|line| line.chars().count() <= 30));
    }

    #[test]
    fn it_separates_multiple_blocks() {
        let output = render_comments(
            &[
                DocComment::from_text("This object represents an incoming update."),
                DocComment::from_text("At most one of the optional parameters can be present."),
            ],
            &PrinterOptions::default(),
        );

        assert_eq!(
            "/**\n * This object represents an incoming update.\n *\n * At most one of the optional parameters can be present.\n */\n",
            output
        );
    }

    #[test]
    fn it_escapes_comment_terminators() {
        let output = render_comments(
            &[DocComment::from_text("Matches */ literally")],
            &PrinterOptions::default(),
        );

        assert_eq!("/** Matches *\\/ literally */\n", output);
    }

    #[test]
    fn it_adds_see_lines_for_description_links() {
        let output = render_comments(
            &[
                DocComment::new(
                    r##"Use <a href="#setwebhook">setWebhook</a> or <a href="#getupdates">getUpdates</a>."##,
                    "Use setWebhook or getUpdates.",
                ),
                DocComment::from_text("Plain paragraph."),
            ],
            &PrinterOptions::default(),
        );

        assert_eq!(
            "/**\n * Use setWebhook or getUpdates.\n * @see https://core.telegram.org/bots/api#setwebhook\n * @see https://core.telegram.org/bots/api#getupdates\n *\n * Plain paragraph.\n */\n",
            output
        );
    }

    #[test]
    fn it_uses_block_form_for_short_comment_with_link() {
        let output = render_comments(
            &[DocComment::new(
                r##"Sent <a href="#message">Message</a>"##,
                "Sent Message",
            )],
            &PrinterOptions::default(),
        );

        assert_eq!(
            "/**\n * Sent Message\n * @see https://core.telegram.org/bots/api#message\n */\n",
            output
        );
    }

    #[test]
    fn it_prints_one_line_per_property_in_order() {
        let names = ["update_id", "message", "edited_message", "poll"];
        let properties = names
            .iter()
            .map(|name| Property::new(*name, Type::Scalar(Scalar::Integer)))
            .collect();
        let mut types = SchemaSet::new();

        types.insert("Update", Type::structure(properties));

        let output = Printer::new(TypeScript, PrinterOptions::default()).print(&types);
        let property_lines: Vec<&str> = output
            .lines()
            .filter(|line| line.ends_with("number,"))
            .map(str::trim)
            .collect();

        assert_eq!(
            vec![
                "update_id: number,",
                "message: number,",
                "edited_message: number,",
                "poll: number,"
            ],
            property_lines
        );
    }

    #[test]
    fn it_prints_nested_arrays_and_unions() {
        let printer = Printer::new(TypeScript, PrinterOptions::default());
        let options = PrinterOptions::default();

        let mut ctx = RenderContext::new(&options);
        printer.print_type(
            &mut ctx,
            &Type::array(Type::array(Type::Scalar(Scalar::Integer))),
        );
        assert_eq!("Array<Array<number>>", ctx.finish());

        let mut ctx = RenderContext::new(&options);
        printer.print_type(
            &mut ctx,
            &Type::variants(vec![Type::name("TypeA"), Type::name("TypeB")]),
        );
        assert_eq!("TypeA | TypeB", ctx.finish());
    }
}
