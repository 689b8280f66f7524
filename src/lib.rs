//! Scrapes the Telegram Bot API reference page and writes typings for it.
//!
//! The page is reduced to a [`SchemaSet`], one entry per object heading,
//! which is then printed as TypeScript declarations, a Flow module or Rust
//! structs.

pub mod checker;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod generator;
pub mod parser;
pub mod printer;
pub mod types;

pub use config::{Config, Lang, Target};
pub use error::{Error, Result};
pub use parser::Parser;
pub use types::{DocComment, Property, Scalar, SchemaSet, Type};

use generator::Generator;
use printer::{Flow, Printer, TypeScript};

/// Renders the whole set in the target's notation.
pub fn render(target: &Target, types: &SchemaSet) -> String {
    let options = target.printer.options();

    match target.lang {
        Lang::TypeScript => Printer::new(TypeScript, options).print(types),
        Lang::Flow => Printer::new(Flow::new(target.printer.module()), options).print(types),
        Lang::Rust => {
            let mut generator = Generator::new(types, options.comment_line_max_length);

            generator.generate();
            generator.to_string()
        }
    }
}
