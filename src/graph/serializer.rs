use std::collections::BTreeMap;
use std::fmt::Write;

use crate::error::DiagramError;
use crate::graph::GraphDescription;
use crate::graph::description::{Endpoint, Member};
use crate::graph::types::{Attributes, EdgeDirection, EdgeStyle, Label};

const INDENT: &str = "    ";

// Helper macro for write operations that converts formatting errors
macro_rules! writeln_out {
    ($dst:expr) => {
        writeln!($dst).map_err(DiagramError::from)
    };
    ($dst:expr, $($arg:tt)*) => {
        writeln!($dst, $($arg)*).map_err(DiagramError::from)
    };
}

/// Serializes a [`GraphDescription`] into Graphviz DOT text.
///
/// Output order is fixed: graph settings, top-level nodes, clusters (each
/// wrapping its members in declaration order), then edges. Attribute lists are
/// written `label` first and the rest sorted by key, so the same description
/// always produces the same bytes.
pub struct DotSerializer;

impl Default for DotSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl DotSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Validate the description and serialize it to a string
    pub fn serialize(&self, graph: &GraphDescription) -> Result<String, DiagramError> {
        graph.validate()?;

        let mut output = String::new();
        self.write_dot(graph, &mut output)?;
        Ok(output)
    }

    fn write_dot(&self, graph: &GraphDescription, output: &mut String) -> Result<(), DiagramError> {
        if let Some(title) = graph.title() {
            for line in title.lines() {
                writeln_out!(output, "// {}", line)?;
            }
        }

        writeln_out!(output, "digraph {} {{", quote(graph.name()))?;
        writeln_out!(output, "{INDENT}rankdir={};", graph.direction().rankdir())?;

        let compound = graph.resolved_edges().any(|(_, source, target)| {
            matches!(source, Endpoint::Cluster(_)) || matches!(target, Endpoint::Cluster(_))
        });
        if compound && !graph.graph_attributes().contains_key("compound") {
            writeln_out!(output, "{INDENT}compound=true;")?;
        }

        for (key, value) in graph.graph_attributes() {
            writeln_out!(output, "{INDENT}{}={};", key, quote(value))?;
        }
        if !graph.node_defaults().is_empty() {
            writeln_out!(
                output,
                "{INDENT}node [{}];",
                attribute_list(quoted_attributes(graph.node_defaults()))
            )?;
        }
        if !graph.edge_defaults().is_empty() {
            writeln_out!(
                output,
                "{INDENT}edge [{}];",
                attribute_list(quoted_attributes(graph.edge_defaults()))
            )?;
        }

        let top_level_nodes: Vec<usize> = graph.top_level_nodes().collect();
        if !top_level_nodes.is_empty() {
            writeln_out!(output)?;
            for index in top_level_nodes {
                self.write_node(graph, index, 1, output)?;
            }
        }

        for cluster in graph.top_level_clusters() {
            writeln_out!(output)?;
            self.write_cluster(graph, cluster, 1, output)?;
        }

        if graph.edge_count() > 0 {
            writeln_out!(output)?;
            for (edge, source, target) in graph.resolved_edges() {
                let mut attributes = BTreeMap::new();
                if let Some(label) = &edge.label {
                    attributes.insert("label".to_string(), format_label(label));
                }
                if edge.style == EdgeStyle::Dashed {
                    attributes.insert("style".to_string(), "dashed".to_string());
                }
                if edge.direction == EdgeDirection::Reversed {
                    attributes.insert("dir".to_string(), "back".to_string());
                }

                let (source_id, tail) = self.endpoint_id(graph, source)?;
                let (target_id, head) = self.endpoint_id(graph, target)?;
                if let Some(cluster) = tail {
                    attributes.insert("ltail".to_string(), quote(&cluster));
                }
                if let Some(cluster) = head {
                    attributes.insert("lhead".to_string(), quote(&cluster));
                }
                attributes.extend(quoted_attributes(&edge.attributes));

                if attributes.is_empty() {
                    writeln_out!(
                        output,
                        "{INDENT}{} -> {};",
                        quote(&source_id),
                        quote(&target_id)
                    )?;
                } else {
                    writeln_out!(
                        output,
                        "{INDENT}{} -> {} [{}];",
                        quote(&source_id),
                        quote(&target_id),
                        attribute_list(attributes)
                    )?;
                }
            }
        }

        writeln_out!(output, "}}")?;
        Ok(())
    }

    fn write_node(
        &self,
        graph: &GraphDescription,
        index: usize,
        depth: usize,
        output: &mut String,
    ) -> Result<(), DiagramError> {
        let node = graph.node_at(index);
        let mut attributes = BTreeMap::new();
        attributes.insert("label".to_string(), format_label(&node.label));
        if let Some(shape) = node.shape {
            attributes.insert("shape".to_string(), shape.as_str().to_string());
        }
        attributes.extend(quoted_attributes(&node.attributes));

        writeln_out!(
            output,
            "{}{} [{}];",
            INDENT.repeat(depth),
            quote(&graph.emitted_node_id(index)),
            attribute_list(attributes)
        )
    }

    fn write_cluster(
        &self,
        graph: &GraphDescription,
        index: usize,
        depth: usize,
        output: &mut String,
    ) -> Result<(), DiagramError> {
        let cluster = graph.cluster_at(index);
        let indent = INDENT.repeat(depth);
        let inner = INDENT.repeat(depth + 1);

        writeln_out!(
            output,
            "{indent}subgraph {} {{",
            quote(&cluster_name(&cluster.id))
        )?;
        if let Some(label) = &cluster.label
            && !cluster.attributes.contains_key("label")
        {
            writeln_out!(output, "{inner}label={};", format_label(label))?;
        }
        for (key, value) in &cluster.attributes {
            writeln_out!(output, "{inner}{}={};", key, quote(value))?;
        }

        for member in graph.members(index) {
            match member {
                Member::Node(node) => self.write_node(graph, node, depth + 1, output)?,
                Member::Cluster(nested) => self.write_cluster(graph, nested, depth + 1, output)?,
            }
        }

        writeln_out!(output, "{indent}}}")
    }

    /// Emitted id of an edge endpoint, plus the cluster name to clip against
    /// when the endpoint is a cluster
    fn endpoint_id(
        &self,
        graph: &GraphDescription,
        endpoint: Endpoint,
    ) -> Result<(String, Option<String>), DiagramError> {
        match endpoint {
            Endpoint::Node(index) => Ok((graph.emitted_node_id(index), None)),
            Endpoint::Cluster(index) => {
                let cluster = graph.cluster_at(index);
                let anchor = graph.anchor_node(index).ok_or_else(|| {
                    crate::error::GraphError::EmptyClusterEndpoint {
                        cluster: cluster.id.clone(),
                    }
                })?;
                Ok((
                    graph.emitted_node_id(anchor),
                    Some(cluster_name(&cluster.id)),
                ))
            }
        }
    }
}

/// Graphviz only draws subgraphs as boxes when their name starts with
/// `cluster`
fn cluster_name(id: &str) -> String {
    format!("cluster_{id}")
}

fn format_label(label: &Label) -> String {
    match label {
        Label::Text(text) => quote(text),
        Label::Html { html } => format!("<{html}>"),
    }
}

fn quoted_attributes(attributes: &Attributes) -> impl Iterator<Item = (String, String)> + '_ {
    attributes
        .iter()
        .map(|(key, value)| (key.clone(), quote(value)))
}

/// Join attributes as `key=value`, `label` first and the rest by key
fn attribute_list(attributes: impl IntoIterator<Item = (String, String)>) -> String {
    let attributes: BTreeMap<String, String> = attributes.into_iter().collect();
    let label = attributes.get("label").map(|value| format!("label={value}"));

    label
        .into_iter()
        .chain(
            attributes
                .iter()
                .filter(|(key, _)| key.as_str() != "label")
                .map(|(key, value)| format!("{key}={value}")),
        )
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quote a string for DOT.
///
/// Existing backslash escapes are kept so Graphviz sequences such as `\n` or
/// `\<` survive; bare quotes are escaped, newlines become `\n`, and a
/// dangling trailing backslash is doubled so it cannot swallow the closing
/// quote.
pub(crate) fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');

    let mut escaping = false;
    for ch in text.chars() {
        match ch {
            '\\' => {
                quoted.push(ch);
                escaping = !escaping;
            }
            '"' if !escaping => quoted.push_str("\\\""),
            '\n' => {
                if escaping {
                    quoted.push('\\');
                }
                quoted.push_str("\\n");
                escaping = false;
            }
            '\r' => {}
            _ => {
                quoted.push(ch);
                escaping = false;
            }
        }
    }
    if escaping {
        quoted.push('\\');
    }

    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::types::{Cluster, Direction, Edge, Node, Shape};

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), r#""plain""#);
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote("two\nlines"), r#""two\nlines""#);
        assert_eq!(quote(r"\<\<include\>\>"), r#""\<\<include\>\>""#);
        assert_eq!(quote(r#"already \"escaped\""#), r#""already \"escaped\"""#);
        assert_eq!(quote(r"trailing\"), r#""trailing\\""#);
    }

    #[test]
    fn test_serialize_simple_graph() {
        let mut graph = GraphDescription::new("demo").with_direction(Direction::LeftToRight);
        graph.add_node(Node::new("A")).unwrap();
        graph
            .add_node(Node::new("B").with_shape(Shape::Box))
            .unwrap();
        graph
            .add_edge(Edge::new("A", "B").with_label("uses"))
            .unwrap();

        let dot = DotSerializer::new().serialize(&graph).unwrap();
        assert_eq!(
            dot,
            concat!(
                "digraph \"demo\" {\n",
                "    rankdir=LR;\n",
                "\n",
                "    \"A\" [label=\"A\"];\n",
                "    \"B\" [label=\"B\", shape=box];\n",
                "\n",
                "    \"A\" -> \"B\" [label=\"uses\"];\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_serialize_nested_clusters_and_edge_styles() {
        let mut graph = GraphDescription::new("deployment").with_title("Deployment view");
        graph
            .set_attribute(crate::graph::Element::NodeDefaults, "fontname", "Helvetica")
            .unwrap();
        graph
            .add_cluster(
                Cluster::new("pc")
                    .with_label("PC")
                    .with_child("jre"),
            )
            .unwrap();
        graph
            .add_cluster(
                Cluster::new("jre")
                    .with_label("JRE")
                    .with_attribute("style", "filled"),
            )
            .unwrap();
        graph
            .add_node_in("pc", Node::new("OS").with_shape(Shape::Box3d))
            .unwrap();
        graph
            .add_node_in("jre", Node::new("App").with_shape(Shape::Component))
            .unwrap();
        graph
            .add_edge(
                Edge::new("App", "OS")
                    .dashed()
                    .reversed()
                    .with_attribute("arrowtail", "onormal"),
            )
            .unwrap();

        let dot = DotSerializer::new().serialize(&graph).unwrap();
        assert_eq!(
            dot,
            concat!(
                "// Deployment view\n",
                "digraph \"deployment\" {\n",
                "    rankdir=TB;\n",
                "    node [fontname=\"Helvetica\"];\n",
                "\n",
                "    subgraph \"cluster_pc\" {\n",
                "        label=\"PC\";\n",
                "        subgraph \"cluster_jre\" {\n",
                "            label=\"JRE\";\n",
                "            style=\"filled\";\n",
                "            \"App\" [label=\"App\", shape=component];\n",
                "        }\n",
                "        \"OS\" [label=\"OS\", shape=box3d];\n",
                "    }\n",
                "\n",
                "    \"App\" -> \"OS\" [arrowtail=\"onormal\", dir=back, style=dashed];\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_edge_to_cluster_is_compound() {
        let mut graph = GraphDescription::new("packages");
        graph.add_node(Node::new("App")).unwrap();
        graph.add_cluster(Cluster::new("util")).unwrap();
        graph.add_node_in("util", Node::new("Validador")).unwrap();
        graph.add_edge(Edge::new("App", "util")).unwrap();

        let dot = DotSerializer::new().serialize(&graph).unwrap();
        assert!(dot.contains("    compound=true;\n"));
        assert!(dot.contains(r#""App" -> "Validador" [lhead="cluster_util"];"#));
    }

    #[test]
    fn test_shared_ids_are_qualified() {
        let mut graph = GraphDescription::new("dup");
        graph.add_cluster(Cluster::new("left")).unwrap();
        graph.add_cluster(Cluster::new("right")).unwrap();
        graph.add_node_in("left", Node::new("Util")).unwrap();
        graph.add_node_in("right", Node::new("Util")).unwrap();
        graph
            .add_edge(Edge::new("left::Util", "right::Util"))
            .unwrap();

        let dot = DotSerializer::new().serialize(&graph).unwrap();
        assert!(dot.contains(r#""left::Util" [label="Util"];"#));
        assert!(dot.contains(r#""left::Util" -> "right::Util";"#));
    }

    #[test]
    fn test_html_label_and_attribute_override() {
        let mut graph = GraphDescription::new("labels");
        let node = graph
            .add_node(Node::new("A").with_label(Label::html("<b>A</b>")))
            .unwrap();
        let edge_target = graph.add_node(Node::new("B")).unwrap();
        graph
            .set_attribute(crate::graph::Element::Node(edge_target), "label", "Bee")
            .unwrap();
        graph
            .set_attribute(crate::graph::Element::Node(node), "color", "red")
            .unwrap();

        let dot = DotSerializer::new().serialize(&graph).unwrap();
        assert!(dot.contains(r#""A" [label=<<b>A</b>>, color="red"];"#));
        assert!(dot.contains(r#""B" [label="Bee"];"#));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let build = || {
            let mut graph = GraphDescription::new("det");
            for id in ["z", "a", "m"] {
                graph
                    .add_node(
                        Node::new(id)
                            .with_attribute("color", "blue")
                            .with_attribute("fillcolor", "white")
                            .with_attribute("style", "filled"),
                    )
                    .unwrap();
            }
            graph.add_edge(Edge::new("z", "a")).unwrap();
            graph.add_edge(Edge::new("a", "m")).unwrap();
            graph
        };

        let serializer = DotSerializer::new();
        let graph = build();
        let first = serializer.serialize(&graph).unwrap();
        let second = serializer.serialize(&graph).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, serializer.serialize(&build()).unwrap());

        let z = first.find("\"z\" [").unwrap();
        let a = first.find("\"a\" [").unwrap();
        assert!(z < a, "nodes keep insertion order");
    }
}
