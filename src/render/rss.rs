use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::domain::{ComicFeed, Strip};
use crate::errors::{StripError, StripResult};

/// Render a normalized feed back out as RSS 2.0.
///
/// Item descriptions carry the strip image as an escaped `<img>` fragment,
/// with the alt text as its `title` attribute when one was extracted.
pub fn render(feed: &ComicFeed) -> StripResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    for (name, value) in [
        ("title", &feed.channel.title),
        ("link", &feed.channel.link),
        ("description", &feed.channel.description),
        ("language", &feed.channel.language),
    ] {
        if let Some(value) = value {
            write_text_element(&mut writer, name, value)?;
        }
    }

    for strip in &feed.strips {
        write_item(&mut writer, strip)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| StripError::Parse(e.to_string()))
}

fn write_item<W: std::io::Write>(writer: &mut Writer<W>, strip: &Strip) -> StripResult<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    if let Some(title) = &strip.title {
        write_text_element(writer, "title", title)?;
    }
    write_text_element(writer, "link", &strip.url)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(&strip.guid)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    write_text_element(writer, "pubDate", &strip.publish_date.to_rfc2822())?;
    write_text_element(writer, "description", &image_fragment(strip))?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn image_fragment(strip: &Strip) -> String {
    match &strip.alt_text {
        Some(alt) => format!(
            r#"<img src="{}" title="{}" />"#,
            escape(&strip.image_url),
            escape(alt)
        ),
        None => format!(r#"<img src="{}" />"#, escape(&strip.image_url)),
    }
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> StripResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
