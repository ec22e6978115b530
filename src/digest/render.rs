//! HTML body of the digest email.

use super::models::{Digest, DigestAlbum, DigestSingle, DigestTrack};

pub const DIGEST_TITLE: &str = "New Releases on Spotify";

/// Escape text for use in HTML content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_digest_html(digest: &Digest) -> String {
    let mut html = String::new();
    html.push_str("<html>\n<head></head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", DIGEST_TITLE));

    if digest.has_new_albums {
        html.push_str("<h2 style=\"margin-bottom:25px;\"><u>Albums</u></h2>\n");
        for album in &digest.albums {
            render_album(&mut html, album);
        }
    }

    if digest.has_new_singles {
        html.push_str("<h2 style=\"margin-bottom:25px;\"><u>Singles</u></h2>\n");
        for single in &digest.singles {
            render_single(&mut html, single);
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_album(html: &mut String, album: &DigestAlbum) {
    html.push_str("<table style=\"margin-bottom:25px\"><tr>");
    render_cover(html, album.image_url.as_deref(), 300);
    html.push_str(&format!(
        "<td valign=\"top\"><h2 style=\"line-height:15px;margin-left:40px;\">{}</h2>",
        escape_html(&album.name)
    ));
    render_artists(html, album.artists.iter().map(|a| a.name.as_str()));

    for track in &album.tracks {
        render_track(html, track);
    }

    render_genres(html, &album.genres);
    render_release_date(html, Some(&album.release_date));
    html.push_str("</td></tr></table>\n");
}

fn render_track(html: &mut String, track: &DigestTrack) {
    html.push_str(&format!("<h4 style=\"margin-left:80px;\">{}. ", track.track_number));
    render_linked_name(html, &track.name, track.preview_url.as_deref());
    if !track.featured_artists.is_empty() {
        html.push_str(" ft. ");
        html.push_str(&escape_html(&track.featured_artists.join(", ")));
    }
    html.push_str("</h4>");
}

fn render_single(html: &mut String, single: &DigestSingle) {
    html.push_str("<table style=\"margin-bottom:25px\"><tr>");
    render_cover(html, single.image_url.as_deref(), 200);
    html.push_str("<td valign=\"top\"><h2 style=\"line-height:15px;margin-left:40px;\">");
    render_linked_name(html, &single.name, single.preview_url.as_deref());
    html.push_str("</h2>");
    render_artists(html, single.artists.iter().map(|a| a.name.as_str()));
    render_genres(html, &single.genres);
    render_release_date(html, single.release_date.as_deref());
    html.push_str("</td></tr></table>\n");
}

fn render_cover(html: &mut String, image_url: Option<&str>, size: u32) {
    html.push_str("<td valign=\"top\">");
    if let Some(url) = image_url {
        html.push_str(&format!(
            "<img src=\"{}\" style=\"width:{size}px;height:{size}px;\">",
            escape_html(url)
        ));
    }
    html.push_str("</td>");
}

fn render_linked_name(html: &mut String, name: &str, link: Option<&str>) {
    match link {
        Some(url) => html.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            escape_html(url),
            escape_html(name)
        )),
        None => html.push_str(&escape_html(name)),
    }
}

fn render_artists<'a>(html: &mut String, names: impl Iterator<Item = &'a str>) {
    let names: Vec<&str> = names.collect();
    if names.is_empty() {
        return;
    }
    html.push_str(&format!(
        "<h3 style=\"margin-left:40px;\">by {}</h3>",
        escape_html(&names.join(", "))
    ));
}

fn render_genres(html: &mut String, genres: &[String]) {
    if genres.is_empty() {
        return;
    }
    html.push_str(&format!(
        "<h3 style=\"margin-left:40px;\">Genres: {}</h3>",
        escape_html(&genres.join(", "))
    ));
}

fn render_release_date(html: &mut String, release_date: Option<&str>) {
    if let Some(date) = release_date {
        html.push_str(&format!(
            "<h3 style=\"margin-left:40px;\">Released: {}</h3>",
            escape_html(date)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::models::DigestArtist;
    use chrono::NaiveDate;

    fn artist(name: &str) -> DigestArtist {
        DigestArtist {
            artist_id: name.to_lowercase(),
            name: name.to_string(),
            popularity: 50,
        }
    }

    fn album() -> DigestAlbum {
        DigestAlbum {
            album_id: "AL1".to_string(),
            name: "Rock & Roll <Live>".to_string(),
            release_date: "2024-01-01".to_string(),
            image_url: Some("https://img/al1".to_string()),
            artists: vec![artist("Main"), artist("Second")],
            tracks: vec![
                DigestTrack {
                    track_id: "T1".to_string(),
                    name: "Opener".to_string(),
                    track_number: 1,
                    preview_url: Some("https://preview/t1".to_string()),
                    featured_artists: vec![],
                },
                DigestTrack {
                    track_id: "T2".to_string(),
                    name: "Duet".to_string(),
                    track_number: 2,
                    preview_url: None,
                    featured_artists: vec!["Guest".to_string()],
                },
            ],
            genres: vec!["rock".to_string(), "live".to_string()],
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom's & Jerry</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#39;s &amp; Jerry&lt;/a&gt;"
        );
    }

    #[test]
    fn test_album_section() {
        let html = render_digest_html(&Digest::new(date(), vec![album()], vec![]));

        assert!(html.contains("<h1>New Releases on Spotify</h1>"));
        assert!(html.contains("<u>Albums</u>"));
        assert!(!html.contains("<u>Singles</u>"));
        assert!(html.contains("Rock &amp; Roll &lt;Live&gt;"));
        assert!(html.contains("by Main, Second"));
        assert!(html.contains("1. <a href=\"https://preview/t1\">Opener</a></h4>"));
        assert!(html.contains("2. Duet ft. Guest</h4>"));
        assert!(html.contains("Genres: rock, live"));
        assert!(html.contains("Released: 2024-01-01"));
        assert!(html.contains("width:300px;height:300px;"));
    }

    #[test]
    fn test_single_section_without_image() {
        let single = DigestSingle {
            track_id: "S1".to_string(),
            name: "Hit".to_string(),
            preview_url: None,
            release_date: Some("2024-01-01".to_string()),
            image_url: None,
            artists: vec![artist("Solo")],
            genres: vec![],
        };

        let html = render_digest_html(&Digest::new(date(), vec![], vec![single]));

        assert!(!html.contains("<u>Albums</u>"));
        assert!(html.contains("<u>Singles</u>"));
        assert!(html.contains(">Hit</h2>"));
        assert!(html.contains("by Solo"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("Genres:"));
    }

    #[test]
    fn test_document_frame_and_escaped_attributes() {
        let mut album = album();
        album.image_url = Some("https://img/al1?a=1&b=2".to_string());

        let html = render_digest_html(&Digest::new(date(), vec![album], vec![]));

        assert!(html.starts_with("<html>\n<head></head>\n<body>\n<h1>New Releases on Spotify</h1>\n"));
        assert!(html.ends_with("</body>\n</html>\n"));
        assert!(html.contains("<img src=\"https://img/al1?a=1&amp;b=2\""));
    }
}
