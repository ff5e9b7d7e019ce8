//! Markup flattening: HTML-bearing text to plain text.
//!
//! The pipeline is repair → normalize → parse → rewrite → extract →
//! normalize. Input with neither `<` nor `&` never reaches the backend.
//!
//! The rewrite turns block structure into line breaks:
//! - `style` and `script` subtrees are dropped,
//! - `br` becomes a line break,
//! - `p` and `div` are surrounded by line breaks,
//! - `ul`/`ol` are surrounded by line breaks and each direct `li` child is
//!   prefixed with `* ` or with its number (`3. `).

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

#[cfg(feature = "markup")]
use crate::backend::KuchikiBackend;
use crate::{
    backend::MarkupBackend, error::FlattenError, normalize::normalize, options::FlattenOptions,
    repair::repair, table::windows_1252,
};

// Decimal or hexadecimal numeric character reference.
static NUMERIC_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:([0-9]+)|[xX]([0-9A-Fa-f]+));")
        .expect("NUMERIC_REFERENCE: hardcoded regex is valid")
});

/// Rewrites numeric character references to code points 128–159 as
/// references to the Windows-1252 characters they were meant to be.
///
/// Unassigned Windows-1252 slots and every other reference are left alone.
///
/// ```rust
/// use textmend::fix_windows_1252_references;
///
/// assert_eq!(fix_windows_1252_references("that&#146;s"), "that&#8217;s");
/// assert_eq!(fix_windows_1252_references("&#x96;"), "&#8211;");
/// assert_eq!(fix_windows_1252_references("&#129; &#160;"), "&#129; &#160;");
/// ```
#[must_use]
pub fn fix_windows_1252_references(text: &str) -> Cow<'_, str> {
    if !text.contains("&#") {
        return Cow::Borrowed(text);
    }
    NUMERIC_REFERENCE.replace_all(text, |caps: &Captures<'_>| {
        let value = match (caps.get(1), caps.get(2)) {
            (Some(decimal), _) => decimal.as_str().parse::<u32>().ok(),
            (None, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, None) => None,
        };
        value
            .and_then(|v| u8::try_from(v).ok())
            .filter(|byte| (0x80..=0x9F).contains(byte))
            .and_then(windows_1252)
            .map_or_else(|| caps[0].to_owned(), |c| format!("&#{};", u32::from(c)))
    })
}

/// Converts markup-bearing text to plain text through a [`MarkupBackend`].
#[derive(Debug, Clone, Default)]
pub struct Flattener<B> {
    backend: B,
    options: FlattenOptions,
}

#[cfg(feature = "markup")]
impl Flattener<KuchikiBackend> {
    /// Creates a flattener over the default [`KuchikiBackend`].
    #[must_use]
    pub fn new(options: FlattenOptions) -> Self {
        Self::with_backend(KuchikiBackend, options)
    }
}

impl<B: MarkupBackend> Flattener<B> {
    /// Creates a flattener over `backend`.
    #[must_use]
    pub fn with_backend(backend: B, options: FlattenOptions) -> Self {
        Self { backend, options }
    }

    /// Flattens `input` to plain text.
    ///
    /// Bytes are repaired first, so `input` may be in any mix of UTF-8,
    /// Windows-1252 and Latin-1.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports; no partial text is produced.
    pub fn flatten(&self, input: impl AsRef<[u8]>) -> Result<String, FlattenError> {
        let text = repair(input.as_ref());
        let keep_newlines = !self.options.collapse_newlines;
        if !text.contains(['<', '&']) {
            return Ok(normalize(&text, keep_newlines));
        }

        // Line breaks in the source are not structure; only elements are.
        let collapsed = normalize(&text, false);
        let markup = fix_windows_1252_references(&collapsed).replace("-<-", "-&lt;-");

        let root = self.backend.parse(&markup)?;
        self.rewrite(&root)?;
        Ok(normalize(&self.backend.text_contents(&root), keep_newlines))
    }

    fn rewrite(&self, root: &B::Node) -> Result<(), FlattenError> {
        let backend = &self.backend;

        let hidden = backend.select(root, &["style", "script"])?;
        for node in &hidden {
            backend.remove(node);
        }

        let breaks = backend.select(root, &["br"])?;
        for node in &breaks {
            backend.insert_text_before(node, "\n");
            backend.remove(node);
        }

        let blocks = backend.select(root, &["p", "div"])?;
        for node in &blocks {
            backend.insert_text_before(node, "\n");
            backend.insert_text_after(node, "\n");
        }

        let lists = backend.select(root, &["ul", "ol"])?;
        for list in &lists {
            self.rewrite_list(list);
        }

        log::debug!(
            "flattened markup: {} hidden, {} breaks, {} blocks, {} lists",
            hidden.len(),
            breaks.len(),
            blocks.len(),
            lists.len()
        );
        Ok(())
    }

    fn rewrite_list(&self, list: &B::Node) {
        let backend = &self.backend;
        let ordered = backend.tag_name(list).as_deref() == Some("ol");
        let mut number = backend
            .attribute(list, "start")
            .and_then(|start| parse_start(&start))
            .unwrap_or(1);

        backend.insert_text_before(list, "\n");
        backend.insert_text_after(list, "\n");

        for item in backend.children(list) {
            if backend.tag_name(&item).as_deref() != Some("li") {
                continue;
            }
            if ordered {
                backend.insert_text_before(&item, &format!("\n{number}. "));
                number = number.saturating_add(1);
            } else {
                backend.insert_text_before(&item, "\n* ");
            }
        }
    }
}

/// Digits-only `start` attribute; anything else (signs, spaces, overflow)
/// falls back to the default.
fn parse_start(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Flattens `input` with the default backend and options.
///
/// ```rust
/// assert_eq!(textmend::flatten("<p>Foo</p><p>Bar</p>").unwrap(), "Foo\nBar");
/// assert_eq!(
///     textmend::flatten("<ol start=3><li>three</li><li>four</li></ol>").unwrap(),
///     "3. three\n4. four"
/// );
/// ```
///
/// # Errors
///
/// See [`Flattener::flatten`].
#[cfg(feature = "markup")]
pub fn flatten(input: impl AsRef<[u8]>) -> Result<String, FlattenError> {
    flatten_with_options(input, FlattenOptions::default())
}

/// Flattens `input` with the default backend.
///
/// # Errors
///
/// See [`Flattener::flatten`].
#[cfg(feature = "markup")]
pub fn flatten_with_options(
    input: impl AsRef<[u8]>,
    options: FlattenOptions,
) -> Result<String, FlattenError> {
    Flattener::new(options).flatten(input)
}
