use std::fmt;

use colored::Colorize;

use crate::remarks::{RemarkTag, TagCategory};

/// Disables ANSI styling, e.g. for script mode where output is parsed.
pub fn set_plain(plain: bool) {
    if plain {
        colored::control::set_override(false);
    } else {
        colored::control::unset_override();
    }
}

pub fn section(title: impl fmt::Display) {
    println!("{}", format!("=== {} ===", title).bold());
}

pub fn info(message: impl fmt::Display) {
    println!("{}", message);
}

pub fn success(message: impl fmt::Display) {
    println!("{} {}", "[ok]".green(), message);
}

pub fn warning(message: impl fmt::Display) {
    println!("{} {}", "[!]".yellow(), message);
}

pub fn error(message: impl fmt::Display) {
    eprintln!("{} {}", "[x]".red(), message);
}

pub fn hint(message: impl fmt::Display) {
    println!("{}", message.to_string().dimmed());
}

/// Colours an already formatted amount by its sign.
pub fn signed(amount: f64, rendered: String) -> String {
    if amount > 0.0 {
        rendered.green().to_string()
    } else if amount < 0.0 {
        rendered.red().to_string()
    } else {
        rendered
    }
}

pub fn tag_chip(tag: &RemarkTag) -> String {
    let text = format!("[{}]", tag);
    match tag.category {
        TagCategory::ReceiptId => text.cyan().to_string(),
        TagCategory::Student => text.blue().to_string(),
        TagCategory::Month => text.magenta().to_string(),
        TagCategory::Group => text.yellow().to_string(),
        TagCategory::Unclassified => text,
    }
}

pub fn tag_line(tags: &[RemarkTag]) -> String {
    tags.iter().map(tag_chip).collect::<Vec<_>>().join(" ")
}
