//! Grammar-aware segmentation of a snippet into imports and body.
//!
//! Imports have to stay at module top level, ahead of the declarations that
//! get injected, so they are lifted out of the snippet before assembly. The
//! snippet is parsed with the tree-sitter TypeScript grammar and only
//! top-level `import_statement` nodes are considered; dynamic `import()`
//! calls and re-exports are ordinary code.

use std::ops::Range;

use tree_sitter::{Node, Parser, Tree};

use crate::error::{Error, Result};

/// A snippet cut at the end of its last top-level import.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Split {
    /// Source text of each import statement, one per line.
    pub imports: String,
    /// Everything after the last import, untouched.
    pub rest: String,
}

fn parse(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        .map_err(|e| Error::Grammar(e.to_string()))?;
    parser.parse(source, None).ok_or(Error::Parse)
}

fn is_import(node: &Node) -> bool {
    node.kind() == "import_statement"
}

fn is_trivia(node: &Node) -> bool {
    matches!(node.kind(), "comment" | "hash_bang_line")
}

fn top_level(tree: &Tree) -> Vec<Node<'_>> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    root.named_children(&mut cursor).collect()
}

/// Split `source` into its import region and the remaining body.
///
/// Imports that are interleaved with code are still hoisted, in the order
/// they appear. Statements caught between them are moved to the head of
/// `rest` so nothing is dropped; comments in that span are not kept.
pub fn split(source: &str) -> Result<Split> {
    let tree = parse(source)?;
    let nodes = top_level(&tree);

    let Some(boundary) = nodes.iter().filter(|n| is_import(n)).map(|n| n.end_byte()).last()
    else {
        return Ok(Split {
            imports: String::new(),
            rest: source.to_string(),
        });
    };

    let mut imports: Vec<&str> = Vec::new();
    let mut stranded: Vec<Range<usize>> = Vec::new();
    for node in nodes.iter().take_while(|n| n.end_byte() <= boundary) {
        if is_import(node) {
            imports.push(&source[node.byte_range()]);
        } else if !is_trivia(node) {
            stranded.push(node.byte_range());
        }
    }
    tracing::debug!(
        imports = imports.len(),
        stranded = stranded.len(),
        boundary,
        "split snippet"
    );

    let mut rest = String::with_capacity(source.len() - boundary);
    for range in stranded {
        rest.push_str(&source[range]);
        rest.push('\n');
    }
    rest.push_str(&source[boundary..]);

    Ok(Split {
        imports: imports.join("\n"),
        rest,
    })
}

/// Turn the last top-level expression statement of `body` into a `return`.
///
/// Used when the body runs inside a function whose result is captured, so
/// that `1 + 1` yields `2`. Bodies that end in anything else (including an
/// explicit `return`) are left alone.
pub fn return_tail_expression(body: &str) -> Result<String> {
    let tree = parse(body)?;
    let nodes = top_level(&tree);
    let Some(last) = nodes.iter().filter(|n| !is_trivia(n)).last() else {
        return Ok(body.to_string());
    };
    if last.kind() != "expression_statement" || last.has_error() {
        return Ok(body.to_string());
    }
    let Some(expr) = last.named_child(0) else {
        return Ok(body.to_string());
    };

    // The statement can run past its expression: a `;`, or a comment on
    // the same line when there is no `;`. Only the `;` is replaced.
    let tail = &body[expr.end_byte()..last.end_byte()];
    let tail = tail.trim_start().strip_prefix(';').unwrap_or(tail);

    let mut out = String::with_capacity(body.len() + 12);
    out.push_str(&body[..last.start_byte()]);
    out.push_str("return (");
    out.push_str(&body[expr.byte_range()]);
    out.push_str(");");
    out.push_str(tail);
    out.push_str(&body[last.end_byte()..]);
    Ok(out)
}
