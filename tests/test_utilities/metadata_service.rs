use httpmock::{Mock, MockServer};
use regex::Regex;
use serde_json::json;
use std::net::TcpListener;

/// Mounts a deps.dev-shaped answer for `coordinate` listing `children` as
/// its direct dependencies
pub fn mock_package<'a>(server: &'a MockServer, coordinate: &str, children: &[&str]) -> Mock<'a> {
    mock_raw(server, coordinate, 200, &graph_body(coordinate, children))
}

/// Mounts a verbatim `status`/`body` answer for `coordinate`
pub fn mock_raw<'a>(server: &'a MockServer, coordinate: &str, status: u16, body: &str) -> Mock<'a> {
    let path = dependencies_path(coordinate);
    server.mock(|when, then| {
        when.method("GET").path_matches(path);
        then.status(status)
            .header("content-type", "application/json")
            .body(body);
    })
}

/// Path regex of the `:dependencies` endpoint for `ecosystem:name:version`
///
/// Characters the client percent-encodes match in either form.
pub fn dependencies_path(coordinate: &str) -> Regex {
    let (ecosystem, name, version) = split(coordinate);
    let pattern = format!(
        "^/{}/packages/{}/versions/{}:dependencies$",
        ecosystem,
        segment(name),
        segment(version)
    );
    Regex::new(&pattern).unwrap()
}

fn segment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            let plain = c.to_string();
            let encoded = urlencoding::encode(&plain).into_owned();
            if encoded == plain {
                regex::escape(&plain)
            } else {
                format!("(?:{}|{})", regex::escape(&encoded), regex::escape(&plain))
            }
        })
        .collect()
}

fn split(coordinate: &str) -> (&str, &str, &str) {
    let (ecosystem, rest) = coordinate.split_once(':').unwrap();
    let (name, version) = rest.rsplit_once(':').unwrap();
    (ecosystem, name, version)
}

/// A base URL nothing listens on
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// deps.dev-shaped body: SELF node first, one DIRECT node and edge per child
pub fn graph_body(coordinate: &str, children: &[&str]) -> String {
    let node = |coordinate: &str, relation: &str| {
        let (ecosystem, name, version) = split(coordinate);
        json!({
            "versionKey": {
                "system": ecosystem.to_uppercase(),
                "name": name,
                "version": version,
            },
            "relation": relation,
            "bundled": false,
            "errors": [],
        })
    };

    let mut nodes = vec![node(coordinate, "SELF")];
    let mut edges = Vec::new();
    for (i, child) in children.iter().enumerate() {
        nodes.push(node(child, "DIRECT"));
        edges.push(json!({"fromNode": 0, "toNode": i + 1, "requirement": "*"}));
    }

    json!({"nodes": nodes, "edges": edges}).to_string()
}
