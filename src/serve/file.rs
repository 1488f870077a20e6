use crate::body::{self, ResponseBody};
use crate::serve::routes::status;
use headers::{
    AcceptRanges, ContentLength, ContentRange, ContentType, HeaderMapExt, IfModifiedSince,
    LastModified, Range,
};
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use std::collections::Bound;
use std::fs::Metadata;
use std::io::{self, SeekFrom};
use std::path::Path;
use std::time::SystemTime;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

pub async fn respond(
    req: &Request<Incoming>,
    fs_path: &Path,
    meta: &Metadata,
) -> Response<ResponseBody> {
    let len = meta.len();
    let modified = meta.modified().ok();

    if let (Some(since), Some(modified)) = (req.headers().typed_get::<IfModifiedSince>(), modified)
    {
        if !since.is_modified(modified) {
            log::info!("{} {} -> [not modified]", req.method(), req.uri());
            let mut resp = status(StatusCode::NOT_MODIFIED);
            resp.headers_mut().typed_insert(LastModified::from(modified));
            return resp;
        }
    }

    let content_type = ContentType::from(mime_guess::from_path(fs_path).first_or_octet_stream());

    match req
        .headers()
        .typed_get::<Range>()
        .and_then(|r| r.satisfiable_ranges(len).next())
    {
        Some(bounds) => match span(bounds, len) {
            Some((start, end)) => {
                log::info!(
                    "{} {} -> [found range {}..{} bytes of {}]",
                    req.method(),
                    req.uri(),
                    start,
                    end,
                    len
                );
                let body = match open(req.method(), fs_path, start, end).await {
                    Ok(body) => body,
                    Err(e) => return open_error(req, fs_path, e),
                };
                let mut resp = Response::new(body);
                *resp.status_mut() = StatusCode::PARTIAL_CONTENT;
                let headers = resp.headers_mut();
                headers.typed_insert(ContentRange::bytes(start..end, len).unwrap());
                headers.typed_insert(ContentLength(end - start));
                file_headers(headers, content_type, modified);
                resp
            }
            None => {
                log::info!("{} {} -> [bad range]", req.method(), req.uri());
                let mut resp = status(StatusCode::RANGE_NOT_SATISFIABLE);
                resp.headers_mut()
                    .typed_insert(ContentRange::unsatisfied_bytes(len));
                resp
            }
        },
        None => {
            log::info!("{} {} -> [found {} bytes]", req.method(), req.uri(), len);
            let body = match open(req.method(), fs_path, 0, len).await {
                Ok(body) => body,
                Err(e) => return open_error(req, fs_path, e),
            };
            let mut resp = Response::new(body);
            let headers = resp.headers_mut();
            headers.typed_insert(ContentLength(len));
            file_headers(headers, content_type, modified);
            resp
        }
    }
}

fn file_headers(
    headers: &mut hyper::HeaderMap,
    content_type: ContentType,
    modified: Option<SystemTime>,
) {
    headers.typed_insert(content_type);
    headers.typed_insert(AcceptRanges::bytes());
    if let Some(modified) = modified {
        headers.typed_insert(LastModified::from(modified));
    }
}

/// Open `fs_path` and produce a body for the byte span `start..end`. HEAD
/// requests get the same headers with no body, so the file is never opened.
async fn open(method: &Method, fs_path: &Path, start: u64, end: u64) -> io::Result<ResponseBody> {
    if *method == Method::HEAD {
        return Ok(body::empty());
    }
    let mut file = File::open(fs_path).await?;
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }
    Ok(body::from_reader(file.take(end - start)))
}

fn open_error(req: &Request<Incoming>, fs_path: &Path, e: io::Error) -> Response<ResponseBody> {
    log::warn!(
        "{} {} -> [file error] {} : {}",
        req.method(),
        req.uri(),
        fs_path.display(),
        e
    );
    status(match e.kind() {
        io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    })
}

/// Convert the bounds reported by `Range::satisfiable_ranges` into a
/// start-inclusive, end-exclusive span. `None` if the span is empty or runs
/// past the end of the file.
fn span(bounds: (Bound<u64>, Bound<u64>), len: u64) -> Option<(u64, u64)> {
    let start = match bounds.0 {
        Bound::Included(start) => start,
        Bound::Excluded(start) => start.checked_add(1)?,
        Bound::Unbounded => 0,
    };
    let end = match bounds.1 {
        Bound::Included(end) => end.checked_add(1)?,
        Bound::Excluded(end) => end,
        Bound::Unbounded => len,
    };
    (start < end && end <= len).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_range(header: Range, len: u64) -> Option<(u64, u64)> {
        header
            .satisfiable_ranges(len)
            .next()
            .and_then(|bounds| span(bounds, len))
    }

    #[test]
    fn bounded_range() {
        let header = Range::bytes(0..5).unwrap();
        assert_eq!(first_range(header, 10), Some((0, 5)));
    }

    #[test]
    fn open_ended_range() {
        let header = Range::bytes(3..).unwrap();
        assert_eq!(first_range(header, 10), Some((3, 10)));
    }

    #[test]
    fn range_past_the_end() {
        assert_eq!(span((Bound::Included(4), Bound::Included(20)), 10), None);
    }

    #[test]
    fn empty_span() {
        assert_eq!(span((Bound::Included(5), Bound::Excluded(5)), 10), None);
    }
}
