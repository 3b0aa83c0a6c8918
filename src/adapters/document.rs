use crate::core::sitemap::escape_xml;
use crate::core::{ScriptHost, ScriptTag};

/// 收集要放進 `<head>` 的 script，之後可輸出成 HTML
#[derive(Debug, Clone, Default)]
pub struct DocumentHead {
    scripts: Vec<ScriptTag>,
}

impl DocumentHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> &[ScriptTag] {
        &self.scripts
    }

    pub fn count(&self, id: &str) -> usize {
        self.scripts.iter().filter(|s| s.id == id).count()
    }

    pub fn render(&self) -> String {
        self.scripts
            .iter()
            .map(|script| {
                let mut tag = format!("<script id=\"{}\"", escape_xml(&script.id));
                if script.is_async {
                    tag.push_str(" async");
                }
                if let Some(src) = &script.src {
                    tag.push_str(&format!(" src=\"{}\"", escape_xml(src)));
                }
                tag.push('>');
                if let Some(inline) = &script.inline {
                    tag.push_str(inline);
                }
                tag.push_str("</script>");
                tag
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ScriptHost for DocumentHead {
    fn contains_script(&self, id: &str) -> bool {
        self.scripts.iter().any(|s| s.id == id)
    }

    fn append_script(&mut self, script: ScriptTag) {
        self.scripts.push(script);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_async_src() {
        let mut head = DocumentHead::new();
        head.append_script(ScriptTag {
            id: "ga4-gtag".to_string(),
            src: Some("https://www.googletagmanager.com/gtag/js?id=G-1&x=1".to_string()),
            is_async: true,
            inline: None,
        });
        assert_eq!(
            head.render(),
            "<script id=\"ga4-gtag\" async src=\"https://www.googletagmanager.com/gtag/js?id=G-1&amp;x=1\"></script>"
        );
    }
}
