//! Property bag XML blobs.
//!
//! Publishing sites keep their available page layouts, default page layout
//! and available web templates as small XML documents stashed in the web's
//! property bag. This module owns those documents: well-known keys, the
//! encoders, and the matching decoders.

use anyhow::{Context, Result, anyhow};
use uuid::Uuid;

use crate::xmlutil::XmlWriter;

/// Property bag keys used by the publishing infrastructure.
pub mod keys {
    pub const AVAILABLE_PAGE_LAYOUTS: &str = "__PageLayouts";
    pub const DEFAULT_PAGE_LAYOUT: &str = "__DefaultPageLayout";
    pub const AVAILABLE_WEB_TEMPLATES: &str = "__WebTemplates";
    pub const INHERIT_WEB_TEMPLATES: &str = "__InheritWebTemplates";
}

/// Sentinel value meaning "inherit page layouts from the parent web".
pub const INHERIT_SENTINEL: &str = "__inherit";

/// Language key used for web templates without a language code.
pub const ALL_LANGUAGES: &str = "all";

/// A page layout in the master page gallery, addressed by unique id and
/// site-relative URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayoutRef {
    pub unique_id: Uuid,
    pub url: String,
}

/// A web template made available to a site, optionally scoped to a language.
#[derive(Debug, Clone, PartialEq)]
pub struct WebTemplateEntity {
    /// Language code such as `1033` or `en-us`; empty means all languages.
    pub language_code: String,
    pub template_name: String,
}

/// Encode the available page layouts document:
/// `<pagelayouts><layout guid="…" url="…"/>…</pagelayouts>`.
pub fn encode_page_layouts(layouts: &[PageLayoutRef]) -> String {
    let mut writer = XmlWriter::new();
    writer.add_opening_tag("pagelayouts", &[]);
    for layout in layouts {
        add_layout_node(&mut writer, layout);
    }
    writer.add_closing_tag("pagelayouts");
    writer.finish()
}

/// Encode the default page layout as a single bare `<layout/>` node.
pub fn encode_default_page_layout(layout: &PageLayoutRef) -> String {
    let mut writer = XmlWriter::new();
    add_layout_node(&mut writer, layout);
    writer.finish()
}

fn add_layout_node(writer: &mut XmlWriter, layout: &PageLayoutRef) {
    let guid = layout.unique_id.to_string();
    writer.add_self_closing_tag("layout", &[("guid", &guid), ("url", &layout.url)]);
}

/// Decode a `<pagelayouts>` document back to the ordered layout sequence.
pub fn decode_page_layouts(xml: &str) -> Result<Vec<PageLayoutRef>> {
    let doc = roxmltree::Document::parse(xml).context("invalid page layouts XML")?;
    doc.descendants()
        .filter(|node| node.has_tag_name("layout"))
        .map(decode_layout_node)
        .collect()
}

/// Decode a single `<layout/>` node (the default page layout entry).
pub fn decode_default_page_layout(xml: &str) -> Result<PageLayoutRef> {
    let doc = roxmltree::Document::parse(xml).context("invalid page layout XML")?;
    let node = doc
        .descendants()
        .find(|node| node.has_tag_name("layout"))
        .ok_or_else(|| anyhow!("no <layout> element in document"))?;
    decode_layout_node(node)
}

fn decode_layout_node(node: roxmltree::Node<'_, '_>) -> Result<PageLayoutRef> {
    let guid = node
        .attribute("guid")
        .ok_or_else(|| anyhow!("<layout> missing guid attribute"))?;
    let url = node
        .attribute("url")
        .ok_or_else(|| anyhow!("<layout> missing url attribute"))?;
    Ok(PageLayoutRef {
        unique_id: Uuid::parse_str(guid).context("invalid layout guid")?,
        url: url.to_string(),
    })
}

/// Encode the available web templates document, grouping template names under
/// their language code. Entries without a language code group under `all`.
/// Group order is first-appearance order, so the output is deterministic.
///
/// An empty template list encodes as the empty string, which clears the
/// filter on the server side.
pub fn encode_web_templates(templates: &[WebTemplateEntity]) -> String {
    if templates.is_empty() {
        return String::new();
    }

    let mut languages: Vec<(String, Vec<&str>)> = Vec::new();
    for template in templates {
        let key = if template.language_code.is_empty() {
            ALL_LANGUAGES
        } else {
            template.language_code.as_str()
        };
        match languages.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, names)) => names.push(&template.template_name),
            None => languages.push((key.to_string(), vec![&template.template_name])),
        }
    }

    let mut writer = XmlWriter::new();
    writer.add_opening_tag("webtemplates", &[]);
    for (language, names) in &languages {
        writer.add_opening_tag("lcid", &[("id", language)]);
        for name in names {
            writer.add_self_closing_tag("webtemplate", &[("name", name)]);
        }
        writer.add_closing_tag("lcid");
    }
    writer.add_closing_tag("webtemplates");
    writer.finish()
}

/// Decode a `<webtemplates>` document back to the flat entity list, in
/// document order. The `all` language key maps back to an empty code.
pub fn decode_web_templates(xml: &str) -> Result<Vec<WebTemplateEntity>> {
    if xml.is_empty() {
        return Ok(Vec::new());
    }
    let doc = roxmltree::Document::parse(xml).context("invalid web templates XML")?;
    let mut templates = Vec::new();
    for lcid in doc.descendants().filter(|node| node.has_tag_name("lcid")) {
        let id = lcid
            .attribute("id")
            .ok_or_else(|| anyhow!("<lcid> missing id attribute"))?;
        let language_code = if id == ALL_LANGUAGES { "" } else { id };
        for template in lcid.children().filter(|node| node.has_tag_name("webtemplate")) {
            let name = template
                .attribute("name")
                .ok_or_else(|| anyhow!("<webtemplate> missing name attribute"))?;
            templates.push(WebTemplateEntity {
                language_code: language_code.to_string(),
                template_name: name.to_string(),
            });
        }
    }
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(guid: &str, url: &str) -> PageLayoutRef {
        PageLayoutRef {
            unique_id: Uuid::parse_str(guid).unwrap(),
            url: url.to_string(),
        }
    }

    fn template(language: &str, name: &str) -> WebTemplateEntity {
        WebTemplateEntity {
            language_code: language.to_string(),
            template_name: name.to_string(),
        }
    }

    #[test]
    fn test_page_layouts_round_trip_preserves_order() {
        let layouts = vec![
            layout(
                "944ea6be-f287-42c6-aa11-3fd75ab1ee9e",
                "_catalogs/masterpage/ArticleLeft.aspx",
            ),
            layout(
                "12f7fe60-1d9a-4b74-91b4-7f2ba85fd16a",
                "_catalogs/masterpage/ArticleRight.aspx",
            ),
        ];
        let xml = encode_page_layouts(&layouts);
        assert_eq!(decode_page_layouts(&xml).unwrap(), layouts);
    }

    #[test]
    fn test_default_page_layout_is_bare_layout_node() {
        let reference = layout(
            "944ea6be-f287-42c6-aa11-3fd75ab1ee9e",
            "_catalogs/masterpage/ArticleLeft.aspx",
        );
        let xml = encode_default_page_layout(&reference);
        assert!(xml.trim_start().starts_with("<layout"));
        assert!(!xml.contains("pagelayouts"));
        assert_eq!(decode_default_page_layout(&xml).unwrap(), reference);
    }

    #[test]
    fn test_web_templates_group_by_language() {
        let templates = vec![
            template("en", "T1"),
            template("en", "T2"),
            template("", "T3"),
        ];
        let xml = encode_web_templates(&templates);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let lcids: Vec<_> = doc
            .descendants()
            .filter(|node| node.has_tag_name("lcid"))
            .collect();
        assert_eq!(lcids.len(), 2);
        assert_eq!(lcids[0].attribute("id"), Some("en"));
        assert_eq!(lcids[1].attribute("id"), Some("all"));
        let en_names: Vec<_> = lcids[0]
            .children()
            .filter(|node| node.has_tag_name("webtemplate"))
            .filter_map(|node| node.attribute("name"))
            .collect();
        assert_eq!(en_names, vec!["T1", "T2"]);
    }

    #[test]
    fn test_web_templates_round_trip() {
        let templates = vec![
            template("1033", "STS#0"),
            template("", "BLANKINTERNET#0"),
            template("1033", "STS#1"),
        ];
        let decoded = decode_web_templates(&encode_web_templates(&templates)).unwrap();
        // grouping reorders across languages but keeps names per language
        assert_eq!(decoded.len(), 3);
        assert!(decoded.contains(&template("1033", "STS#0")));
        assert!(decoded.contains(&template("1033", "STS#1")));
        assert!(decoded.contains(&template("", "BLANKINTERNET#0")));
    }

    #[test]
    fn test_empty_template_list_encodes_empty_string() {
        assert_eq!(encode_web_templates(&[]), "");
        assert!(decode_web_templates("").unwrap().is_empty());
    }

    #[test]
    fn test_layout_url_with_metacharacters() {
        let reference = layout(
            "944ea6be-f287-42c6-aa11-3fd75ab1ee9e",
            "_catalogs/masterpage/News & Events.aspx",
        );
        let xml = encode_page_layouts(std::slice::from_ref(&reference));
        assert_eq!(decode_page_layouts(&xml).unwrap(), vec![reference]);
    }
}
