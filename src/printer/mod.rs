//! Printers for decoded results.

use blockrun::decode::Decoded;
use owo_colors::OwoColorize;

pub struct ResultPrinter {
    pub color: Option<&'static str>,
}

impl ResultPrinter {
    /// Red for failed runs when stdout is a terminal, plain otherwise.
    pub fn new(success: bool, is_tty: bool) -> Self {
        let color = if !success && is_tty { Some("red") } else { None };
        Self { color }
    }

    pub fn print(&self, decoded: &Decoded) {
        match decoded {
            Decoded::Structured(value) => {
                let json = serde_json::Value::from(value);
                let text = serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string());
                self.print_text(&text);
            }
            Decoded::Raw(text) => self.print_text(text.trim_end_matches('\n')),
        }
    }

    pub fn print_text(&self, text: &str) {
        match self.color {
            Some("red") => println!("{}", text.red()),
            _ => println!("{}", text),
        }
    }
}
