//! Turn provider results into displayable tooltips.

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Range};

use crate::provider::{CompletionOption, DocumentationResult};

/// Where and for what name a tooltip is built.
#[derive(Debug, Clone, Copy)]
pub struct TooltipOptions<'a> {
    /// Character offset the tooltip is anchored at.
    pub position: usize,
    /// The full word under the cursor; only an option with this name is shown.
    pub exact_name: &'a str,
    /// Completion kinds that never produce a tooltip.
    pub exclude_types: &'a [String],
}

/// Rendered documentation anchored at a character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub position: usize,
    pub html: String,
}

impl Tooltip {
    /// Convert into an LSP hover covering `range`.
    ///
    /// LSP has no HTML markup kind; markdown renderers pass inline HTML through.
    pub fn into_hover(self, range: Option<Range>) -> Hover {
        Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: self.html,
            }),
            range,
        }
    }
}

/// Build a tooltip from a provider result, or None when there is nothing to show.
pub fn as_hover_tooltip(
    result: &DocumentationResult,
    options: TooltipOptions<'_>,
) -> Option<Tooltip> {
    let option = result
        .options
        .iter()
        .find(|o| o.name == options.exact_name)?;

    if options.exclude_types.iter().any(|t| *t == option.kind) {
        return None;
    }

    Some(Tooltip {
        position: options.position,
        html: render_option(option)?,
    })
}

fn render_option(option: &CompletionOption) -> Option<String> {
    if let Some(info) = option.completion_info.as_deref().filter(|s| !s.trim().is_empty()) {
        return Some(info.to_string());
    }
    let signature = option.signature.as_deref().filter(|s| !s.trim().is_empty())?;
    Some(format!("<pre><code>{}</code></pre>", escape_html(signature)))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
