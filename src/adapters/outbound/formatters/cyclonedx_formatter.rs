use crate::graph_resolution::domain::{
    DependencyGraph, DependencyNode, Ecosystem, PackageIdentity, SbomMetadata,
};
use crate::ports::outbound::GraphFormatter;
use crate::shared::Result;
use serde::Serialize;

/// Property namespace for tool-specific component properties
const PROPERTY_PREFIX: &str = "depgraph";

#[derive(Debug, Serialize)]
struct Bom {
    #[serde(rename = "bomFormat")]
    bom_format: String,
    #[serde(rename = "specVersion")]
    spec_version: String,
    version: u32,
    #[serde(rename = "serialNumber")]
    serial_number: String,
    metadata: Metadata,
    components: Vec<Component>,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
struct Dependency {
    #[serde(rename = "ref")]
    bom_ref: String,
    #[serde(rename = "dependsOn", skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Component {
    #[serde(rename = "type")]
    component_type: String,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
    version: String,
    purl: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
struct Property {
    name: String,
    value: String,
}

impl Property {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            name: format!("{}:{}", PROPERTY_PREFIX, key),
            value: value.into(),
        }
    }
}

/// CycloneDxFormatter adapter for generating CycloneDX 1.6 JSON format
///
/// Components carry the report version; vendor metadata and the root flag
/// are emitted as `depgraph:*` properties. `dependencies` mirrors the graph
/// edges, with an entry for every component.
pub struct CycloneDxFormatter {
    metadata: Option<SbomMetadata>,
}

impl CycloneDxFormatter {
    /// Formatter that stamps fresh metadata on every document
    pub fn new() -> Self {
        Self { metadata: None }
    }

    /// Formatter with fixed metadata (reproducible output)
    pub fn with_metadata(metadata: SbomMetadata) -> Self {
        Self {
            metadata: Some(metadata),
        }
    }
}

impl Default for CycloneDxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphFormatter for CycloneDxFormatter {
    fn format(&self, graph: &DependencyGraph) -> Result<String> {
        let metadata = self
            .metadata
            .clone()
            .unwrap_or_else(SbomMetadata::for_this_tool);

        let bom = Bom {
            bom_format: "CycloneDX".to_string(),
            spec_version: "1.6".to_string(),
            version: 1,
            serial_number: metadata.serial_number().to_string(),
            metadata: build_metadata(&metadata, graph),
            components: graph.nodes().map(build_component).collect(),
            dependencies: build_dependencies(graph),
        };

        serde_json::to_string_pretty(&bom).map_err(Into::into)
    }
}

fn build_metadata(metadata: &SbomMetadata, graph: &DependencyGraph) -> Metadata {
    let summary = graph.summary();
    let mut properties = Vec::new();
    if summary.is_partial() {
        properties.push(Property::new("partial", "true"));
        properties.push(Property::new(
            "unresolved",
            summary.unresolved_count().to_string(),
        ));
    }
    for root in &summary.excluded_roots {
        properties.push(Property::new("excluded_root", root.to_string()));
    }

    Metadata {
        timestamp: metadata.timestamp().to_string(),
        tools: vec![Tool {
            name: metadata.tool_name().to_string(),
            version: metadata.tool_version().to_string(),
        }],
        properties,
    }
}

/// Identity strings are unique per node, unlike purls of report versions
fn bom_ref(identity: &PackageIdentity) -> String {
    identity.to_string()
}

fn build_component(node: &DependencyNode) -> Component {
    let identity = node.identity();
    let version = node.version_info().report_version().to_string();

    let (group, name) = match identity.ecosystem() {
        Ecosystem::Maven => match identity.name().split_once(':') {
            Some((group, artifact)) => (Some(group.to_string()), artifact.to_string()),
            None => (None, identity.name().to_string()),
        },
        _ => (None, identity.name().to_string()),
    };

    let mut properties = Vec::new();
    if node.is_root() {
        properties.push(Property::new("root", "true"));
    }
    for (key, value) in node.version_info().metadata() {
        properties.push(Property::new(key, value.clone()));
    }

    Component {
        component_type: "library".to_string(),
        bom_ref: bom_ref(identity),
        group,
        name,
        purl: purl(identity.ecosystem(), identity.name(), &version),
        version,
        properties,
    }
}

fn build_dependencies(graph: &DependencyGraph) -> Vec<Dependency> {
    graph
        .nodes()
        .map(|node| Dependency {
            bom_ref: bom_ref(node.identity()),
            depends_on: node.children().iter().map(bom_ref).collect(),
        })
        .collect()
}

/// Package URL for a component (https://github.com/package-url/purl-spec)
pub fn purl(ecosystem: Ecosystem, name: &str, version: &str) -> String {
    let path = match ecosystem {
        Ecosystem::Maven => name
            .split(':')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        Ecosystem::PyPI => urlencoding::encode(&name.to_lowercase().replace('_', "-")).into_owned(),
        Ecosystem::Npm | Ecosystem::Go => name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        Ecosystem::Cargo | Ecosystem::NuGet => urlencoding::encode(name).into_owned(),
    };

    format!(
        "pkg:{}/{}@{}",
        ecosystem.purl_type(),
        path,
        urlencoding::encode(version)
    )
}
