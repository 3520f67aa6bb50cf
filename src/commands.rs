//! The two user-invoked document commands.

use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use thiserror::Error;

use crate::host::{Clipboard, Editor, MetadataSource, Notifier};
use crate::{Provider, citation, embed, provider, timestamp};

/// Class of the `<div>` wrapping an embedded player
pub const CONTAINER_CLASS: &str = "vls-video-container";

/// Class of the embedded player `<iframe>`
pub const IFRAME_CLASS: &str = "vls-video-iframe";

/// Class of an inline timestamp marker
pub const MARKER_CLASS: &str = "vls-ts";

/// Attribute carrying a marker's offset in seconds
pub const SECONDS_ATTR: &str = "data-vls-seconds";

const IFRAME_ALLOW: &str = "autoplay; encrypted-media; picture-in-picture; fullscreen";

static CLIPBOARD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("link pattern is valid"));

static SELECTION_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s*(.*)$").expect("selection pattern is valid"));

/// Identifier of a registered command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    InsertFromClipboard,
    SelectionToTimestamp,
}

impl CommandId {
    pub const ALL: [CommandId; 2] = [CommandId::InsertFromClipboard, CommandId::SelectionToTimestamp];

    pub fn id(&self) -> &'static str {
        match self {
            CommandId::InsertFromClipboard => "insert-video-iframe-from-clipboard",
            CommandId::SelectionToTimestamp => "selection-to-video-timestamp",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CommandId::InsertFromClipboard => "Insert video + metadata (YouTube/Bilibili link from clipboard)",
            CommandId::SelectionToTimestamp => "Selected text → video timestamp (controls player on page)",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Reasons a command aborts without touching the document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("No markdown document is open.")]
    NoActiveDocument,
    #[error("No link found in the clipboard. Copy a YouTube or Bilibili video link first.")]
    NoClipboardLink,
    #[error("This link is not a YouTube or Bilibili video link.")]
    UnsupportedLink,
    #[error("Could not extract a video ID from the YouTube link.")]
    MissingVideoId,
    #[error("Could not extract a BVID from the link (expected https://www.bilibili.com/video/BV...).")]
    MissingBvid,
    #[error("Select a line of text first, for example: 1:23 some sentence")]
    EmptySelection,
    #[error("The selected text is not in the expected format, for example: 1:23 I'm afraid I can't do that.")]
    MalformedSelection,
    #[error("Invalid time format, for example: 1:23 or 00:01:23")]
    InvalidTimestamp,
}

/// What a successful command did, for the confirmation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted { provider: Provider, src: String },
    Timestamped { seconds: u64 },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Inserted { provider, .. } => {
                write!(f, "Inserted {} video player and metadata.", provider.display_name())
            }
            Outcome::Timestamped { seconds } => {
                write!(f, "Inserted timestamp {}.", timestamp::format(*seconds))
            }
        }
    }
}

/// Command runner bound to the host's clipboard, metadata source and notifier
pub struct Commands<C, M, N> {
    clipboard: C,
    meta: M,
    notifier: N,
}

impl<C, M, N> Commands<C, M, N>
where
    C: Clipboard,
    M: MetadataSource,
    N: Notifier,
{
    pub fn new(clipboard: C, meta: M, notifier: N) -> Self {
        Self {
            clipboard,
            meta,
            notifier,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run a command against the active editor, reporting the result.
    ///
    /// Timestamp confirmations are not announced; only failures are.
    pub async fn run(&self, command: CommandId, editor: Option<&mut dyn Editor>) -> Result<Outcome, CommandError> {
        debug!("Running command {}", command.id());
        let result = match command {
            CommandId::InsertFromClipboard => self.insert_from_clipboard(editor).await,
            CommandId::SelectionToTimestamp => self.selection_to_timestamp(editor),
        };
        match &result {
            Ok(outcome @ Outcome::Inserted { .. }) => self.notifier.notify(&outcome.to_string()),
            Ok(outcome) => info!("{outcome}"),
            Err(e) => {
                warn!("Command {} failed: {e}", command.id());
                self.notifier.notify(&e.to_string());
            }
        }
        result
    }

    /// Insert an embedded player for the link on the clipboard, followed by
    /// its citation block, at the cursor
    pub async fn insert_from_clipboard(&self, editor: Option<&mut dyn Editor>) -> Result<Outcome, CommandError> {
        let editor = editor.ok_or(CommandError::NoActiveDocument)?;

        let url = self.clipboard_link().await.ok_or(CommandError::NoClipboardLink)?;
        let site = provider::classify(&url).ok_or(CommandError::UnsupportedLink)?;
        debug!("Clipboard link {url} classified as {site}");

        let meta = self.meta.fetch(site, &url).await;
        if meta.is_none() {
            debug!("No metadata for {url}, inserting the player alone");
        }

        let src = match site {
            Provider::YouTube => {
                let id = provider::youtube_id(&url).ok_or(CommandError::MissingVideoId)?;
                embed::build_from_id(site, &id)
            }
            Provider::Bilibili if provider::is_bilibili_player(&url) => url.clone(),
            Provider::Bilibili => {
                let bvid = provider::bilibili_id(&url).ok_or(CommandError::MissingBvid)?;
                embed::build_from_id(site, &bvid)
            }
        };

        let block = format!("{}\n\n{}", player_html(&src), citation::render(meta.as_ref()));
        let cursor = editor.cursor();
        editor.replace_range(&block, cursor);
        info!("Inserted {site} player at line {}", cursor.line + 1);

        Ok(Outcome::Inserted { provider: site, src })
    }

    /// Replace a selection like `1:23 some caption` with a timestamp marker line
    pub fn selection_to_timestamp(&self, editor: Option<&mut dyn Editor>) -> Result<Outcome, CommandError> {
        let editor = editor.ok_or(CommandError::NoActiveDocument)?;

        let selection = editor.selection();
        let selection = selection.trim();
        if selection.is_empty() {
            return Err(CommandError::EmptySelection);
        }

        let caps = SELECTION_PARTS.captures(selection).ok_or(CommandError::MalformedSelection)?;
        let seconds = timestamp::parse(&caps[1]).ok_or(CommandError::InvalidTimestamp)?;
        let caption = caps.get(2).map_or("", |m| m.as_str());

        editor.replace_selection(&format!("{}\n", marker_line(seconds, caption)));
        Ok(Outcome::Timestamped { seconds })
    }

    async fn clipboard_link(&self) -> Option<String> {
        let text = match self.clipboard.read_text().await {
            Ok(text) => text?,
            Err(e) => {
                debug!("Reading clipboard failed: {e}");
                return None;
            }
        };
        find_link(&text)
    }
}

/// First `http(s)://` token in `text`
pub fn find_link(text: &str) -> Option<String> {
    CLIPBOARD_LINK.find(text).map(|m| m.as_str().to_string())
}

/// Container and iframe markup for an embedded player
pub fn player_html(src: &str) -> String {
    format!(
        r#"<div class="{CONTAINER_CLASS}"><iframe class="{IFRAME_CLASS}" src="{src}" allow="{IFRAME_ALLOW}" allowfullscreen frameborder="0"></iframe></div>"#
    )
}

/// A list item holding a clickable marker for `seconds`, plus its caption
pub fn marker_line(seconds: u64, caption: &str) -> String {
    let label = timestamp::format(seconds);
    let mut line = format!(r#"- <span class="{MARKER_CLASS}" {SECONDS_ATTR}="{seconds}">[{label}]</span>"#);
    if !caption.is_empty() {
        line.push(' ');
        line.push_str(caption);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VideoMeta;
    use crate::host::{NoMetadata, Position, RecordingNotifier, StaticClipboard, TextBuffer};
    use async_trait::async_trait;

    struct FixedMetadata(VideoMeta);

    #[async_trait]
    impl MetadataSource for FixedMetadata {
        async fn fetch(&self, _provider: Provider, _url: &str) -> Option<VideoMeta> {
            Some(self.0.clone())
        }
    }

    struct BrokenClipboard;

    #[async_trait]
    impl Clipboard for BrokenClipboard {
        async fn read_text(&self) -> eyre::Result<Option<String>> {
            eyre::bail!("clipboard access denied")
        }
    }

    fn commands(clipboard: &str) -> Commands<StaticClipboard, NoMetadata, RecordingNotifier> {
        Commands::new(StaticClipboard::new(clipboard), NoMetadata, RecordingNotifier::default())
    }

    #[test]
    fn test_command_ids() {
        assert_eq!(
            CommandId::from_id("insert-video-iframe-from-clipboard"),
            Some(CommandId::InsertFromClipboard)
        );
        assert_eq!(
            CommandId::from_id("selection-to-video-timestamp"),
            Some(CommandId::SelectionToTimestamp)
        );
        assert_eq!(CommandId::from_id("nope"), None);
    }

    #[test]
    fn test_find_link() {
        assert_eq!(
            find_link("watch this: https://youtu.be/abc123 later"),
            Some("https://youtu.be/abc123".to_string())
        );
        assert_eq!(find_link("HTTP://example.com"), None);
        assert_eq!(find_link("no links here"), None);
    }

    #[test]
    fn test_player_html() {
        assert_eq!(
            player_html("https://www.youtube.com/embed/abc123?rel=0&controls=1"),
            r#"<div class="vls-video-container"><iframe class="vls-video-iframe" src="https://www.youtube.com/embed/abc123?rel=0&controls=1" allow="autoplay; encrypted-media; picture-in-picture; fullscreen" allowfullscreen frameborder="0"></iframe></div>"#
        );
    }

    #[test]
    fn test_marker_line_without_caption() {
        assert_eq!(
            marker_line(3661, ""),
            r#"- <span class="vls-ts" data-vls-seconds="3661">[01:01:01]</span>"#
        );
    }

    #[tokio::test]
    async fn test_insert_youtube_short_link() {
        let commands = commands("check https://youtu.be/abc123");
        let mut buf = TextBuffer::new("# Notes\n");
        buf.set_cursor(Position::new(1, 0));

        let outcome = commands
            .run(CommandId::InsertFromClipboard, Some(&mut buf))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Inserted {
                provider: Provider::YouTube,
                src: "https://www.youtube.com/embed/abc123?rel=0&controls=1".to_string(),
            }
        );
        assert_eq!(
            buf.text(),
            format!(
                "# Notes\n{}\n\n",
                player_html("https://www.youtube.com/embed/abc123?rel=0&controls=1")
            )
        );
        assert_eq!(
            commands.notifier().last().as_deref(),
            Some("Inserted YouTube video player and metadata.")
        );
    }

    #[tokio::test]
    async fn test_insert_with_metadata_appends_citation() {
        let meta = VideoMeta {
            title: "Demo".to_string(),
            author: "Uploader".to_string(),
            description: String::new(),
            canonical_url: "https://www.bilibili.com/video/BV1xy".to_string(),
            provider: Provider::Bilibili,
        };
        let commands = Commands::new(
            StaticClipboard::new("https://www.bilibili.com/video/BV1xy/?p=1"),
            FixedMetadata(meta.clone()),
            RecordingNotifier::default(),
        );
        let mut buf = TextBuffer::new("");

        commands.insert_from_clipboard(Some(&mut buf)).await.unwrap();

        let src = "https://player.bilibili.com/player.html?bvid=BV1xy&page=1&high_quality=1";
        assert_eq!(
            buf.text(),
            format!("{}\n\n{}", player_html(src), citation::render(Some(&meta)))
        );
    }

    #[tokio::test]
    async fn test_insert_bilibili_player_link_verbatim() {
        let link = "https://player.bilibili.com/player.html?bvid=BV1xy&page=2";
        let commands = commands(link);
        let mut buf = TextBuffer::new("");

        let outcome = commands.insert_from_clipboard(Some(&mut buf)).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Inserted {
                provider: Provider::Bilibili,
                src: link.to_string()
            }
        );
        assert!(buf.text().contains(&format!(r#"src="{link}""#)));
    }

    #[tokio::test]
    async fn test_insert_bilibili_without_bvid_fails() {
        let commands = commands("https://space.bilibili.com/12345");
        let mut buf = TextBuffer::new("unchanged");

        let err = commands
            .run(CommandId::InsertFromClipboard, Some(&mut buf))
            .await
            .unwrap_err();

        assert_eq!(err, CommandError::MissingBvid);
        assert_eq!(buf.text(), "unchanged");
        assert_eq!(commands.notifier().last(), Some(CommandError::MissingBvid.to_string()));
    }

    #[tokio::test]
    async fn test_insert_youtube_without_id_fails() {
        let commands = commands("https://www.youtube.com/channel/UC123");
        let mut buf = TextBuffer::new("unchanged");

        let err = commands.insert_from_clipboard(Some(&mut buf)).await.unwrap_err();

        assert_eq!(err, CommandError::MissingVideoId);
        assert_eq!(buf.text(), "unchanged");
    }

    #[tokio::test]
    async fn test_insert_unsupported_link() {
        let commands = commands("https://vimeo.com/123");
        let mut buf = TextBuffer::new("unchanged");

        let err = commands
            .run(CommandId::InsertFromClipboard, Some(&mut buf))
            .await
            .unwrap_err();

        assert_eq!(err, CommandError::UnsupportedLink);
        assert_eq!(buf.text(), "unchanged");
        assert_eq!(
            commands.notifier().messages(),
            vec!["This link is not a YouTube or Bilibili video link.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_insert_without_clipboard_link() {
        let mut buf = TextBuffer::new("unchanged");

        let err = commands("just words").insert_from_clipboard(Some(&mut buf)).await.unwrap_err();
        assert_eq!(err, CommandError::NoClipboardLink);

        let empty = Commands::new(StaticClipboard::empty(), NoMetadata, RecordingNotifier::default());
        let err = empty.insert_from_clipboard(Some(&mut buf)).await.unwrap_err();
        assert_eq!(err, CommandError::NoClipboardLink);

        let broken = Commands::new(BrokenClipboard, NoMetadata, RecordingNotifier::default());
        let err = broken.insert_from_clipboard(Some(&mut buf)).await.unwrap_err();
        assert_eq!(err, CommandError::NoClipboardLink);

        assert_eq!(buf.text(), "unchanged");
    }

    #[tokio::test]
    async fn test_commands_require_active_document() {
        let commands = commands("https://youtu.be/abc123");

        let err = commands.run(CommandId::InsertFromClipboard, None).await.unwrap_err();
        assert_eq!(err, CommandError::NoActiveDocument);

        let err = commands.run(CommandId::SelectionToTimestamp, None).await.unwrap_err();
        assert_eq!(err, CommandError::NoActiveDocument);

        assert_eq!(commands.notifier().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_selection_to_timestamp() {
        let commands = commands("");
        let mut buf = TextBuffer::new("1:23 hello world");
        buf.select_line(0);

        let outcome = commands
            .run(CommandId::SelectionToTimestamp, Some(&mut buf))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Timestamped { seconds: 83 });
        assert_eq!(
            buf.text(),
            "- <span class=\"vls-ts\" data-vls-seconds=\"83\">[01:23]</span> hello world\n"
        );
        assert!(commands.notifier().messages().is_empty());
    }

    #[test]
    fn test_selection_to_timestamp_without_caption() {
        let commands = commands("");
        let mut buf = TextBuffer::new("before\n  01:02:03  \nafter");
        buf.select_line(1);

        commands.selection_to_timestamp(Some(&mut buf)).unwrap();

        assert_eq!(
            buf.text(),
            "before\n- <span class=\"vls-ts\" data-vls-seconds=\"3723\">[01:02:03]</span>\n\nafter"
        );
    }

    #[test]
    fn test_selection_empty() {
        let commands = commands("");
        let mut buf = TextBuffer::new("   \nx");
        buf.select_line(0);

        let err = commands.selection_to_timestamp(Some(&mut buf)).unwrap_err();
        assert_eq!(err, CommandError::EmptySelection);

        let mut buf = TextBuffer::new("no selection");
        let err = commands.selection_to_timestamp(Some(&mut buf)).unwrap_err();
        assert_eq!(err, CommandError::EmptySelection);
        assert_eq!(buf.text(), "no selection");
    }

    #[test]
    fn test_selection_invalid_timestamp() {
        let commands = commands("");
        let mut buf = TextBuffer::new("hello 1:23");
        buf.select_line(0);

        let err = commands.selection_to_timestamp(Some(&mut buf)).unwrap_err();
        assert_eq!(err, CommandError::InvalidTimestamp);
        assert_eq!(buf.text(), "hello 1:23");
    }

    #[test]
    fn test_selection_spanning_lines_is_malformed() {
        let commands = commands("");
        let mut buf = TextBuffer::new("1:23 first\nsecond");
        buf.select(Position::new(0, 0), Position::new(1, 6));

        let err = commands.selection_to_timestamp(Some(&mut buf)).unwrap_err();
        assert_eq!(err, CommandError::MalformedSelection);
        assert_eq!(buf.text(), "1:23 first\nsecond");
    }
}
