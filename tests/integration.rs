use std::sync::{Arc, Mutex};
use std::time::Duration;

use expect_test::expect;
use nbhint::{
    hint_tooltip, load_settings, word_bounds_at, CellDocument, CellId, CompletionOption,
    DebounceState, DocumentStore, DocumentationProvider, DocumentationRequest,
    DocumentationResult, ProviderError, ProviderResult, Settings, Text,
};
use tower_lsp::lsp_types::{Hover, HoverContents, Position, Url};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A fake kernel that knows documentation for a fixed set of names.
///
/// The completion options it returns are the known names starting with the
/// last identifier in the request prefix, like a real completer would.
struct FakeKernel {
    known: Vec<(&'static str, &'static str, &'static str)>,
    requests: Mutex<Vec<DocumentationRequest>>,
    latency: Duration,
    fail: bool,
}

impl FakeKernel {
    fn new() -> Self {
        Self {
            known: vec![
                ("print", "function", "<p>Prints the values to a stream.</p>"),
                ("print_function", "statement", "<p>Future feature.</p>"),
                ("DataFrame", "class", "<p>Two-dimensional tabular data.</p>"),
                ("len", "tooltip", "<p>Return the number of items.</p>"),
            ],
            requests: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            fail: false,
        }
    }

    fn requests(&self) -> Vec<DocumentationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[tower_lsp::async_trait]
impl DocumentationProvider for FakeKernel {
    async fn request(
        &self,
        request: DocumentationRequest,
    ) -> ProviderResult<Option<DocumentationResult>> {
        let prefix: String = request
            .document
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        self.requests.lock().unwrap().push(request);

        tokio::time::sleep(self.latency).await;
        if self.fail {
            return Err(ProviderError::Unavailable("kernel not running".into()));
        }

        let options: Vec<CompletionOption> = self
            .known
            .iter()
            .filter(|(name, _, _)| !prefix.is_empty() && name.starts_with(prefix.as_str()))
            .map(|(name, kind, info)| CompletionOption {
                name: name.to_string(),
                kind: kind.to_string(),
                completion_info: Some(info.to_string()),
                signature: None,
            })
            .collect();

        if options.is_empty() {
            return Ok(None);
        }
        Ok(Some(DocumentationResult {
            prefix_length: prefix.len(),
            options,
        }))
    }
}

fn cell_uri(id: &str) -> Url {
    Url::parse(&format!("file:///notebooks/app.py#cell-{id}")).unwrap()
}

/// Format a hover into a deterministic one-line string.
fn format_hover(hover: Option<Hover>) -> String {
    let Some(hover) = hover else {
        return "no hover".to_string();
    };
    let range = hover
        .range
        .map(|r| {
            format!(
                "{}:{}-{}:{}",
                r.start.line, r.start.character, r.end.line, r.end.character
            )
        })
        .unwrap_or_else(|| "-".to_string());
    let value = match hover.contents {
        HoverContents::Markup(m) => m.value,
        other => format!("{:?}", other),
    };
    format!("{} {}", range, value)
}

async fn hover_in_cell(kernel: Arc<FakeKernel>, source: &str, position: Position) -> String {
    let store = DocumentStore::default();
    let doc = store.open(cell_uri("Hbol"), source.to_string(), 1);
    let hints = hint_tooltip(kernel, &Settings::default());
    format_hover(hints.hover.hover(&doc, position).await)
}

// ---------------------------------------------------------------------------
// Tests — word bounds
// ---------------------------------------------------------------------------

#[test]
fn word_bounds_examples() {
    let cases = [
        ("hello world", 2),
        ("a, b", 1),
        ("a, b", 2),
        ("x", 0),
        ("x", 1),
        ("df.head(n_rows)", 12),
    ];
    let actual: Vec<String> = cases
        .iter()
        .map(|(source, p)| {
            let span = word_bounds_at(&Text::from(*source), *p);
            format!("{source:?}@{p} -> {}..{}", span.start, span.end)
        })
        .collect();

    let expected = expect![[r#"
        "hello world"@2 -> 0..5
        "a, b"@1 -> 0..1
        "a, b"@2 -> 2..2
        "x"@0 -> 0..1
        "x"@1 -> 0..1
        "df.head(n_rows)"@12 -> 8..14"#]];
    expected.assert_eq(&actual.join("\n"));
}

// ---------------------------------------------------------------------------
// Tests — hover
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hover_over_function_name() {
    let kernel = Arc::new(FakeKernel::new());
    let actual = hover_in_cell(Arc::clone(&kernel), "x = 1\nprint(x)", Position::new(1, 2)).await;

    let expected = expect![[r#"1:0-1:5 <p>Prints the values to a stream.</p>"#]];
    expected.assert_eq(&actual);
    assert_eq!(kernel.requests()[0].document, "x = 1\nprint");
    assert_eq!(kernel.requests()[0].cell_id, CellId::new("Hbol"));
}

#[tokio::test]
async fn hover_only_shows_exact_name() {
    // "print_function" is offered too, but "print" is the word under the mouse.
    let actual = hover_in_cell(Arc::new(FakeKernel::new()), "print", Position::new(0, 5)).await;
    let expected = expect![[r#"0:0-0:5 <p>Prints the values to a stream.</p>"#]];
    expected.assert_eq(&actual);

    let actual = hover_in_cell(Arc::new(FakeKernel::new()), "prin", Position::new(0, 1)).await;
    let expected = expect![[r#"no hover"#]];
    expected.assert_eq(&actual);
}

#[tokio::test]
async fn hover_excludes_tooltip_kind() {
    let actual = hover_in_cell(Arc::new(FakeKernel::new()), "len(x)", Position::new(0, 1)).await;
    let expected = expect![[r#"no hover"#]];
    expected.assert_eq(&actual);
}

#[tokio::test]
async fn hover_on_whitespace_has_no_documentation() {
    let kernel = Arc::new(FakeKernel::new());
    let actual = hover_in_cell(Arc::clone(&kernel), "x =  1", Position::new(0, 4)).await;
    let expected = expect![[r#"no hover"#]];
    expected.assert_eq(&actual);
}

#[tokio::test]
async fn hover_outside_cell_issues_no_request() {
    let kernel = Arc::new(FakeKernel::new());
    let store = DocumentStore::default();
    let doc = store.open(
        Url::parse("file:///notebooks/app.py").unwrap(),
        "print".into(),
        1,
    );
    let hints = hint_tooltip(Arc::clone(&kernel), &Settings::default());

    let actual = format_hover(hints.hover.hover(&doc, Position::new(0, 2)).await);
    expect![[r#"no hover"#]].assert_eq(&actual);
    assert!(kernel.requests().is_empty());
}

#[tokio::test]
async fn hover_swallows_provider_failure() {
    let kernel = Arc::new(FakeKernel {
        fail: true,
        ..FakeKernel::new()
    });
    let actual = hover_in_cell(Arc::clone(&kernel), "print", Position::new(0, 2)).await;
    expect![[r#"no hover"#]].assert_eq(&actual);
    assert_eq!(kernel.requests().len(), 1);
}

// ---------------------------------------------------------------------------
// Tests — cursor tracking
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn cursor_burst_is_coalesced() {
    let kernel = Arc::new(FakeKernel::new());
    let hints = hint_tooltip(Arc::clone(&kernel), &Settings::default());
    let doc = Arc::new(CellDocument::new(
        "import pandas as pd\npd.DataFrame".into(),
        1,
        Some(CellId::new("Hbol")),
    ));

    // Typing "DataFrame" one character at a time, 40ms apart.
    for head in 24..=32 {
        assert!(hints.cursor.cursor_moved(Arc::clone(&doc), head));
        tokio::time::sleep(Duration::from_millis(40)).await;
    }
    assert_eq!(hints.cursor.state(), DebounceState::Pending);

    tokio::time::sleep(Duration::from_millis(200)).await;

    let requests = kernel.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].document, "import pandas as pd\npd.DataFrame");
    assert_eq!(
        hints.cursor.current().as_deref(),
        Some("<p>Two-dimensional tabular data.</p>")
    );
}

#[tokio::test(start_paused = true)]
async fn cursor_outside_word_schedules_nothing() {
    let kernel = Arc::new(FakeKernel::new());
    let hints = hint_tooltip(Arc::clone(&kernel), &Settings::default());
    let doc = Arc::new(CellDocument::new(
        "print( )".into(),
        1,
        Some(CellId::new("Hbol")),
    ));

    assert!(!hints.cursor.cursor_moved(Arc::clone(&doc), 0));
    assert!(!hints.cursor.cursor_moved(Arc::clone(&doc), 6));
    assert!(!hints.cursor.cursor_moved(doc, 7));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(kernel.requests().is_empty());
    assert_eq!(hints.cursor.state(), DebounceState::Idle);
}

#[tokio::test(start_paused = true)]
async fn cursor_tracking_does_not_exclude_tooltip_kind() {
    let kernel = Arc::new(FakeKernel::new());
    let hints = hint_tooltip(Arc::clone(&kernel), &Settings::default());
    let doc = Arc::new(CellDocument::new("len".into(), 1, Some(CellId::new("a"))));

    hints.cursor.cursor_moved(doc, 3);
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(
        hints.cursor.current().as_deref(),
        Some("<p>Return the number of items.</p>")
    );
}

#[tokio::test(start_paused = true)]
async fn configured_debounce_is_used() {
    let dir = std::env::temp_dir()
        .join("nbhint-integration")
        .join(format!("{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("hints.toml");
    std::fs::write(&path, "[hints]\ndebounce_ms = 500\n").unwrap();
    let settings = load_settings(&path);
    let _ = std::fs::remove_dir_all(&dir);

    let kernel = Arc::new(FakeKernel::new());
    let hints = hint_tooltip(Arc::clone(&kernel), &settings);
    let doc = Arc::new(CellDocument::new("print".into(), 1, Some(CellId::new("a"))));

    hints.cursor.cursor_moved(doc, 5);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(kernel.requests().is_empty());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(kernel.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn cleared_when_word_has_no_documentation() {
    let kernel = Arc::new(FakeKernel::new());
    let hints = hint_tooltip(Arc::clone(&kernel), &Settings::default());
    let doc = Arc::new(CellDocument::new(
        "print(value)".into(),
        1,
        Some(CellId::new("a")),
    ));

    hints.cursor.cursor_moved(Arc::clone(&doc), 5);
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(hints.cursor.current().is_some());

    hints.cursor.cursor_moved(doc, 11);
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(hints.cursor.current(), None);
}
