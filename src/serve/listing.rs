use crate::body::{self, ResponseBody};
use crate::serve::path;
use crate::serve::routes::status;
use headers::{ContentLength, ContentType, HeaderMapExt};
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use std::io;
use std::path::Path;

struct Entry {
    name: String,
    is_dir: bool,
}

pub async fn respond(
    req: &Request<Incoming>,
    url_path: &str,
    dir: &Path,
) -> Response<ResponseBody> {
    let mut entries = match read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!(
                "{} {} -> [listing error] {} : {}",
                req.method(),
                req.uri(),
                dir.display(),
                e
            );
            return status(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    log::info!(
        "{} {} -> [listing {} entries]",
        req.method(),
        req.uri(),
        entries.len()
    );

    let html = render(url_path, &entries);
    let len = html.len() as u64;
    let body = if *req.method() == Method::HEAD {
        body::empty()
    } else {
        body::full(html)
    };

    let mut resp = Response::new(body);
    resp.headers_mut().typed_insert(ContentType::html());
    resp.headers_mut().typed_insert(ContentLength(len));
    resp
}

async fn read_entries(dir: &Path) -> Result<Vec<Entry>, io::Error> {
    let mut dirents = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(dirent) = dirents.next_entry().await? {
        let is_dir = dirent
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        entries.push(Entry {
            name: dirent.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }
    Ok(entries)
}

fn render(url_path: &str, entries: &[Entry]) -> String {
    let rows = entries
        .iter()
        .map(|entry| {
            let trailer = if entry.is_dir { "/" } else { "" };
            format!(
                "<li><a href=\"{href}{trailer}\">{name}{trailer}</a></li>",
                href = path::encode(&entry.name),
                trailer = trailer,
                name = escape_html(&entry.name),
            )
        })
        .collect::<Vec<_>>()
        .join("");
    format!(
        concat!(
            "<!DOCTYPE html>",
            "<html>",
            "<head><meta charset=\"utf-8\"><title>Directory listing for {title}</title></head>",
            "<body>",
            "<h1>Directory listing for {title}</h1>",
            "<hr>",
            "<ul>{rows}</ul>",
            "<hr>",
            "</body>",
            "</html>",
        ),
        title = escape_html(url_path),
        rows = rows
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("it's \"x\""), "it&#x27;s &quot;x&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn renders_entries() {
        let entries = [
            Entry {
                name: "app.js".to_string(),
                is_dir: false,
            },
            Entry {
                name: "sub dir".to_string(),
                is_dir: true,
            },
        ];
        let html = render("/assets/", &entries);
        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains("<li><a href=\"app.js\">app.js</a></li>"));
        assert!(html.contains("<li><a href=\"sub%20dir/\">sub dir/</a></li>"));
    }

    #[test]
    fn escapes_hostile_names() {
        let entries = [Entry {
            name: "<img src=x>".to_string(),
            is_dir: false,
        }];
        let html = render("/", &entries);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x&gt;"));
    }
}
