//! RSS rendering

use crate::error::Result;
use crate::types::{FeedMetadata, NormalizedPublication};
use rss::{Category, Channel, Guid, Item};

const INDENT_SIZE: usize = 2;

/// Render the publications as a pretty-printed RSS 2.0 document
///
/// The output depends only on its inputs, so identical publications render
/// to identical bytes.
pub fn render_feed(metadata: &FeedMetadata, publications: &[NormalizedPublication]) -> Result<Vec<u8>> {
    let channel = Channel {
        title: metadata.title.clone(),
        link: metadata.link.clone(),
        description: metadata.description.clone(),
        items: publications.iter().map(to_item).collect(),
        ..Default::default()
    };

    Ok(channel.pretty_write_to(Vec::new(), b' ', INDENT_SIZE)?)
}

fn to_item(publication: &NormalizedPublication) -> Item {
    Item {
        title: Some(publication.title.clone()),
        link: Some(publication.url.clone()),
        guid: Some(Guid {
            value: publication.guid.clone(),
            permalink: false,
        }),
        description: publication.description.clone(),
        categories: publication
            .categories
            .iter()
            .map(|name| Category {
                name: name.clone(),
                domain: None,
            })
            .collect(),
        ..Default::default()
    }
}

/// Byte length in binary units, e.g. `12.3 KiB`
pub fn humanize_len(len: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = len as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", len)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
