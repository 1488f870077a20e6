use crate::body::{self, ResponseBody};
use crate::serve::{cache, file, listing, path};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, LOCATION};
use hyper::{Method, Request, Response, StatusCode};
use std::path::PathBuf;

pub struct State {
    root: PathBuf,
}

impl State {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

pub async fn respond_to_request(req: Request<Incoming>, state: &State) -> Response<ResponseBody> {
    let mut resp = match *req.method() {
        Method::GET | Method::HEAD => resolve(&req, state).await,
        _ => {
            log::warn!("{} {} -> [method not allowed]", req.method(), req.uri());
            status(StatusCode::METHOD_NOT_ALLOWED)
        }
    };
    cache::disable(resp.headers_mut());
    resp
}

async fn resolve(req: &Request<Incoming>, state: &State) -> Response<ResponseBody> {
    let decoded = match path::decode(req.uri().path()) {
        Some(decoded) => decoded,
        None => {
            log::warn!("{} {} -> [undecodable path]", req.method(), req.uri());
            return status(StatusCode::NOT_FOUND);
        }
    };
    let fs_path = match path::sanitize(&state.root, &decoded) {
        Some(fs_path) => fs_path,
        None => {
            log::warn!("{} {} -> [rejected path]", req.method(), req.uri());
            return status(StatusCode::NOT_FOUND);
        }
    };

    let meta = match tokio::fs::metadata(&fs_path).await {
        Ok(meta) => meta,
        Err(e) => {
            log::info!("{} {} -> [not found] {}", req.method(), req.uri(), e);
            return status(StatusCode::NOT_FOUND);
        }
    };

    if !meta.is_dir() {
        return file::respond(req, &fs_path, &meta).await;
    }

    // Relative hrefs inside a directory page only resolve correctly against a
    // slash-terminated URL.
    if !req.uri().path().ends_with('/') {
        return redirect_to_slash(req);
    }

    let index = fs_path.join("index.html");
    if let Ok(index_meta) = tokio::fs::metadata(&index).await {
        if index_meta.is_file() {
            return file::respond(req, &index, &index_meta).await;
        }
    }

    listing::respond(req, &decoded, &fs_path).await
}

fn redirect_to_slash(req: &Request<Incoming>) -> Response<ResponseBody> {
    let location = match req.uri().query() {
        Some(query) => format!("{}/?{}", req.uri().path(), query),
        None => format!("{}/", req.uri().path()),
    };
    log::info!("{} {} -> [redirect {}]", req.method(), req.uri(), location);
    let mut resp = status(StatusCode::MOVED_PERMANENTLY);
    if let Ok(value) = HeaderValue::from_str(&location) {
        resp.headers_mut().insert(LOCATION, value);
    }
    resp
}

pub fn status(code: StatusCode) -> Response<ResponseBody> {
    let mut resp = Response::new(body::empty());
    *resp.status_mut() = code;
    resp
}
