//! Composition of the final script text.

use crate::error::Result;

use super::split::return_tail_expression;

const WRAPPER_HEAD: &str = "await Deno.stdout.write(
  new TextEncoder().encode(
    Deno.inspect(
      await (async () => {
";

const WRAPPER_TAIL: &str = "
      })(),
      { depth: Infinity, iterableLimit: Infinity, breakLength: Infinity, strAbbreviateSize: Infinity },
    ),
  ),
);
";

/// The pieces of one runnable script, in emission order.
#[derive(Debug, Clone, Default)]
pub struct Script<'a> {
    pub imports: &'a str,
    pub declarations: Vec<String>,
    pub prologue: Option<&'a str>,
    pub body: &'a str,
    pub epilogue: Option<&'a str>,
    /// Capture the body's value and print it, instead of running it as-is.
    pub wrap_value: bool,
}

impl Script<'_> {
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        if !self.imports.is_empty() {
            out.push_str(self.imports);
            out.push('\n');
        }
        out.push('\n');
        for decl in &self.declarations {
            out.push_str(decl);
            out.push('\n');
        }
        if let Some(prologue) = self.prologue {
            out.push_str(prologue);
            out.push('\n');
        }
        if self.wrap_value {
            out.push_str(WRAPPER_HEAD);
            out.push_str(&return_tail_expression(self.body)?);
            out.push_str(WRAPPER_TAIL);
        } else {
            out.push_str(self.body);
        }
        if let Some(epilogue) = self.epilogue {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(epilogue);
        }
        Ok(out)
    }
}

/// Join imports, declarations and body into one script.
pub fn assemble(
    imports: &str,
    declarations: &[String],
    body: &str,
    wrap_value: bool,
) -> Result<String> {
    Script {
        imports,
        declarations: declarations.to_vec(),
        body,
        wrap_value,
        ..Default::default()
    }
    .render()
}
