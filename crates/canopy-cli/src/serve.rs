//! Read-only HTTP server for one loaded inventory.
//!
//! Requests are answered sequentially on one thread. Every layout request
//! starts from a clone of the tree loaded at startup.

use crate::render::LayoutRequest;
use crate::CliError;
use canopy::{to_csv_string, Diagnostic, Hierarchy, ViewerConfig, ViewerError};
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Response, Server};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Canopy</title></head>
<body>
<h1>Canopy</h1>
<ul>
<li><a href="/data">/data</a> inventory CSV</li>
<li><a href="/layout/collapsible-tree">/layout/collapsible-tree</a></li>
<li><a href="/layout/force-graph">/layout/force-graph</a></li>
<li><a href="/layout/sunburst">/layout/sunburst</a></li>
<li><a href="/layout/circle-pack">/layout/circle-pack</a></li>
<li><a href="/layout/circle-pack-colored">/layout/circle-pack-colored</a></li>
<li><a href="/layout/treemap">/layout/treemap</a></li>
</ul>
</body>
</html>
"#;

/// A response before it is handed to `tiny_http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub(crate) status: u16,
    pub(crate) content_type: &'static str,
    pub(crate) body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(404, "text/plain", "404 Not Found")
    }
}

/// Everything the server needs to answer a request.
pub(crate) struct Site {
    config: ViewerConfig,
    tree: Hierarchy,
    csv: String,
    icons: PathBuf,
}

impl Site {
    pub(crate) fn new(config: ViewerConfig, tree: Hierarchy, icons: PathBuf) -> Result<Self, CliError> {
        let csv = to_csv_string(tree.records())?;
        Ok(Self {
            config,
            tree,
            csv,
            icons,
        })
    }

    pub(crate) fn route(&self, url: &str) -> Reply {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        match path {
            "/" => Reply::new(200, "text/html", INDEX_HTML),
            "/data" => Reply::new(200, "text/plain", self.csv.as_bytes()),
            "/healthz" => Reply::new(200, "text/plain", "ok"),
            _ => {
                if let Some(id) = path.strip_prefix("/layout/") {
                    self.layout(id, query)
                } else if let Some(rest) = path.strip_prefix("/icons/") {
                    self.icon(rest)
                } else {
                    Reply::not_found()
                }
            }
        }
    }

    fn layout(&self, id: &str, query: &str) -> Reply {
        let request = LayoutRequest::new(id).with_query(query);
        match request.render(&self.config, self.tree.clone()) {
            Ok(frame) => match serde_json::to_vec(&frame) {
                Ok(body) => Reply::new(200, "application/json", body),
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode frame");
                    Reply::new(500, "text/plain", "500 Internal Server Error")
                }
            },
            Err(e) => bad_request(&e),
        }
    }

    fn icon(&self, rest: &str) -> Reply {
        let relative = Path::new(rest);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Reply::not_found();
        }
        let path = self.icons.join(relative);
        match std::fs::read(&path) {
            Ok(content) => Reply::new(200, content_type(&path), content),
            Err(_) => Reply::not_found(),
        }
    }
}

fn bad_request(err: &ViewerError) -> Reply {
    let diagnostic = Diagnostic::new(err.stage(), err.to_string());
    match serde_json::to_vec(&diagnostic) {
        Ok(body) => Reply::new(400, "application/json", body),
        Err(_) => Reply::new(400, "text/plain", diagnostic.to_string()),
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Serve until the process is stopped.
pub(crate) fn run(site: &Site, port: u16) -> Result<(), CliError> {
    let addr = format!("0.0.0.0:{port}");
    let server = Server::http(&addr).map_err(|e| CliError::Server(e.to_string()))?;
    tracing::info!(%addr, nodes = site.tree.len(), "serving inventory");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let reply = site.route(&url);
        tracing::info!(method = %request.method(), %url, status = reply.status, "request");

        let mut response = Response::from_data(reply.body).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
            response = response.with_header(header);
        }
        if let Err(e) = request.respond(response) {
            tracing::warn!(error = %e, "failed to send response");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_test::acme_inventory;

    fn site() -> Site {
        let icons = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        Site::new(ViewerConfig::default(), acme_inventory(), icons).unwrap()
    }

    fn json(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn test_static_routes() {
        let site = site();
        let index = site.route("/");
        assert_eq!(index.status, 200);
        assert_eq!(index.content_type, "text/html");

        let health = site.route("/healthz");
        assert_eq!(health.body, b"ok");

        let data = site.route("/data");
        assert_eq!(data.content_type, "text/plain");
        let text = String::from_utf8(data.body).unwrap();
        assert_eq!(text.lines().count(), 12);
        assert!(text.starts_with("1,organization,resource,organizations/1,,AcmeCo,"));
    }

    #[test]
    fn test_layout_route() {
        let reply = site().route("/layout/treemap");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "application/json");
        let value = json(&reply);
        assert_eq!(value["kind"], "treemap");
        assert_eq!(value["geometry"]["cells"].as_array().unwrap().len(), 4);

        let expanded = json(&site().route("/layout/treemap?expand=all"));
        assert_eq!(expanded["geometry"]["cells"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_unknown_layout_is_bad_request() {
        let reply = site().route("/layout/pie");
        assert_eq!(reply.status, 400);
        let value = json(&reply);
        assert_eq!(value["stage"], "layout");
        assert_eq!(value["message"], "unknown layout: pie");
    }

    #[test]
    fn test_unknown_routes_and_icons() {
        let site = site();
        assert_eq!(site.route("/nope").status, 404);
        assert_eq!(site.route("/icons/missing.png").status, 404);
        assert_eq!(site.route("/icons/../Cargo.toml").status, 404);

        let csv = site.route("/icons/acme.csv");
        assert_eq!(csv.status, 200);
        assert_eq!(csv.content_type, "application/octet-stream");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("a/b.png")), "image/png");
        assert_eq!(content_type(Path::new("a/b.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("a/b")), "application/octet-stream");
    }
}
