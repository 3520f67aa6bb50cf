use crate::VideoMeta;

const NO_DESCRIPTION: &str = "> (no description)";

/// Render video metadata as a block-quoted citation.
///
/// Returns an empty string when there is no metadata; otherwise the block
/// ends with a blank line so following content starts a new paragraph.
pub fn render(meta: Option<&VideoMeta>) -> String {
    let Some(meta) = meta else {
        return String::new();
    };

    let mut lines = vec![format!("> **Title:** {}", meta.title)];
    if !meta.author.is_empty() {
        lines.push(format!("> **Author:** {}", meta.author));
    }
    if !meta.canonical_url.is_empty() {
        lines.push(format!("> **URL:** {}", meta.canonical_url));
    }
    lines.push(format!("> **Source:** {}", meta.provider));
    lines.push(">".to_string());

    if meta.description.is_empty() {
        lines.push(NO_DESCRIPTION.to_string());
    } else {
        lines.push("> **Description:**".to_string());
        lines.push(">".to_string());
        lines.extend(
            meta.description
                .split('\n')
                .map(|l| format!("> {}", l.strip_suffix('\r').unwrap_or(l))),
        );
    }

    lines.join("\n") + "\n\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Provider;

    fn sample_meta() -> VideoMeta {
        VideoMeta {
            title: "Never Gonna Give You Up".to_string(),
            author: "Rick Astley".to_string(),
            description: String::new(),
            canonical_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            provider: Provider::YouTube,
        }
    }

    #[test]
    fn test_render_none() {
        assert_eq!(render(None), "");
    }

    #[test]
    fn test_render_without_description() {
        let output = render(Some(&sample_meta()));
        assert_eq!(
            output,
            "> **Title:** Never Gonna Give You Up\n\
             > **Author:** Rick Astley\n\
             > **URL:** https://youtu.be/dQw4w9WgXcQ\n\
             > **Source:** youtube\n\
             >\n\
             > (no description)\n\n"
        );
    }

    #[test]
    fn test_render_multiline_description() {
        let meta = VideoMeta {
            title: "Demo".to_string(),
            author: "Uploader".to_string(),
            description: "first line\r\nsecond line\n\nfourth".to_string(),
            canonical_url: "https://www.bilibili.com/video/BV1xy".to_string(),
            provider: Provider::Bilibili,
        };
        let output = render(Some(&meta));
        assert_eq!(
            output,
            "> **Title:** Demo\n\
             > **Author:** Uploader\n\
             > **URL:** https://www.bilibili.com/video/BV1xy\n\
             > **Source:** bilibili\n\
             >\n\
             > **Description:**\n\
             >\n\
             > first line\n\
             > second line\n\
             > \n\
             > fourth\n\n"
        );
    }

    #[test]
    fn test_render_skips_empty_author_and_url() {
        let meta = VideoMeta {
            title: String::new(),
            author: String::new(),
            description: String::new(),
            canonical_url: String::new(),
            provider: Provider::YouTube,
        };
        assert_eq!(
            render(Some(&meta)),
            "> **Title:** \n> **Source:** youtube\n>\n> (no description)\n\n"
        );
    }
}
