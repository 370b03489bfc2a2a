use crate::{
    host::{Host, HostError, ResultLine},
    path_util,
    style::Style,
    transform,
};
use lyon_path::math::{Point, Transform};
use roxmltree::{Document, ParsingOptions};
use std::{
    collections::{HashMap, HashSet},
    fmt::{Display, Error, Formatter},
    ops::Range,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";

const LINE_ID: &str = "furthest-line";

#[derive(Debug, Clone)]
struct Element {
    name: String,
    qualified_name: String,
    in_svg_namespace: bool,
    id: Option<String>,
    parent: Option<usize>,
    range: Range<usize>,
    transform: Option<String>,
    path_data: Option<String>,
    style: Option<String>,
}

impl Element {
    fn is_path(&self) -> bool {
        self.in_svg_namespace && self.name == "path"
    }

    fn is_container(&self) -> bool {
        self.in_svg_namespace && (self.name == "g" || self.name == "svg")
    }

    fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("<{}>", self.qualified_name),
        }
    }
}

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    replacement: String,
}

/// An SVG document that records edits against its source text, so the output
/// keeps every byte that was not touched.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    source: String,
    elements: Vec<Element>,
    ids: HashMap<String, usize>,
    selection: Vec<String>,
    layer: usize,
    edits: Vec<Edit>,
    removed: HashSet<usize>,
    inserted_ids: Vec<String>,
}

impl SvgDocument {
    /// Parses a document. `selection` holds the ids of the selected elements
    /// and `layer` optionally names the group new shapes go into.
    pub fn parse(
        source: String,
        selection: Vec<String>,
        layer: Option<&str>,
    ) -> Result<SvgDocument, LoadDocumentError> {
        let (elements, current_layer) = {
            let options = ParsingOptions {
                allow_dtd: true,
                ..ParsingOptions::default()
            };
            let document = Document::parse_with_options(&source, options)?;

            let mut indices = HashMap::new();
            let mut elements = vec![];
            let mut current_layer = None;

            for node in document.root().descendants().filter(|n| n.is_element()) {
                let range = node.range();
                let tag = node.tag_name();

                if tag.namespace() == Some(SODIPODI_NS) && tag.name() == "namedview" {
                    current_layer = node
                        .attribute((INKSCAPE_NS, "current-layer"))
                        .map(|id| id.to_owned());
                }

                elements.push(Element {
                    name: tag.name().to_owned(),
                    qualified_name: qualified_name(&source[range.clone()]),
                    in_svg_namespace: tag.namespace().map_or(true, |ns| ns == SVG_NS),
                    id: node.attribute("id").map(|id| id.to_owned()),
                    parent: node
                        .parent_element()
                        .and_then(|parent| indices.get(&parent.id()).copied()),
                    range,
                    transform: node.attribute("transform").map(|t| t.to_owned()),
                    path_data: node.attribute("d").map(|d| d.to_owned()),
                    style: node.attribute("style").map(|s| s.to_owned()),
                });
                indices.insert(node.id(), elements.len() - 1);
            }

            (elements, current_layer)
        };

        match elements.first() {
            Some(root) if root.in_svg_namespace && root.name == "svg" => {}
            Some(root) => return Err(LoadDocumentError::NotAnSvgDocument(root.name.clone())),
            None => return Err(LoadDocumentError::NotAnSvgDocument(String::new())),
        }

        let mut ids = HashMap::new();
        for (index, element) in elements.iter().enumerate() {
            if let Some(id) = &element.id {
                ids.entry(id.clone()).or_insert(index);
            }
        }

        let mut document = SvgDocument {
            source,
            elements,
            ids,
            selection,
            layer: 0,
            edits: vec![],
            removed: HashSet::new(),
            inserted_ids: vec![],
        };

        let layer = layer
            .and_then(|id| document.find_layer(id, "--layer"))
            .or_else(|| {
                current_layer
                    .as_ref()
                    .and_then(|id| document.find_layer(id, "inkscape:current-layer"))
            })
            .unwrap_or(0);
        document.layer = layer;

        log::debug!(
            "Inserting into layer '{}'",
            document.elements[document.layer].label()
        );

        Ok(document)
    }

    fn find_layer(&self, id: &str, source: &str) -> Option<usize> {
        match self.ids.get(id) {
            Some(&index) if self.elements[index].is_container() => Some(index),
            Some(_) => {
                log::warn!("{} '{}' is not a group, ignoring it", source, id);
                None
            }
            None => {
                log::warn!("{} '{}' does not exist, ignoring it", source, id);
                None
            }
        }
    }

    fn element(&self, index: usize) -> Result<&Element, HostError> {
        if self.removed.contains(&index) {
            return Err(HostError::UnknownShape);
        }
        self.elements.get(index).ok_or(HostError::UnknownShape)
    }

    fn transform_of(&self, index: usize) -> Result<Transform, HostError> {
        let mut composed = Transform::identity();
        let mut current = Some(index);

        while let Some(i) = current {
            let element = self.element(i)?;
            if let Some(attribute) = &element.transform {
                let own = transform::parse_transform(attribute).map_err(|cause| {
                    HostError::InvalidTransform {
                        element: element.label(),
                        cause,
                    }
                })?;
                composed = composed.post_transform(&own);
            }
            current = element.parent;
        }

        Ok(composed)
    }

    fn unused_id(&self) -> String {
        let taken = |id: &str| self.ids.contains_key(id) || self.inserted_ids.iter().any(|i| i == id);

        if !taken(LINE_ID) {
            return LINE_ID.to_owned();
        }

        (1..)
            .map(|n| format!("{}-{}", LINE_ID, n))
            .find(|id| !taken(id.as_str()))
            .unwrap_or_else(|| LINE_ID.to_owned())
    }

    /// Whether any edit has been recorded.
    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }

    /// The document text with all recorded edits applied.
    pub fn to_svg(&self) -> String {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));

        let mut output = self.source.clone();
        for edit in edits {
            output.replace_range(edit.range.clone(), &edit.replacement);
        }

        output
    }
}

impl Host for SvgDocument {
    type Shape = usize;

    fn selected_paths(&self) -> Vec<usize> {
        let mut paths: Vec<usize> = vec![];

        for id in self.selection.iter() {
            match self.ids.get(id) {
                Some(&index) if self.elements[index].is_path() => {
                    if !paths.contains(&index) && !self.removed.contains(&index) {
                        paths.push(index);
                    }
                }
                Some(_) => log::warn!("Skipping '{}': not a path", id),
                None => log::warn!("Skipping '{}': no such element", id),
            }
        }

        paths
    }

    fn composed_transform(&self, shape: &usize) -> Result<Transform, HostError> {
        self.transform_of(*shape)
    }

    fn nodes(&self, shape: &usize, transform: &Transform) -> Result<Vec<Point>, HostError> {
        let element = self.element(*shape)?;

        match &element.path_data {
            Some(path_data) => path_util::transformed_nodes(path_data, transform).map_err(
                |cause| HostError::InvalidPathData {
                    element: element.label(),
                    cause,
                },
            ),
            None => Ok(vec![]),
        }
    }

    fn style(&self, shape: &usize) -> Style {
        self.element(*shape)
            .ok()
            .and_then(|element| element.style.as_ref())
            .map(|style| Style::parse(style))
            .unwrap_or_default()
    }

    fn insert_line(&mut self, line: &ResultLine) -> Result<(), HostError> {
        let layer = self.element(self.layer)?;
        let to_layer = self
            .transform_of(self.layer)?
            .inverse()
            .ok_or_else(|| HostError::NonInvertibleLayer(layer.label()))?;

        let from = to_layer.transform_point(line.from);
        let to = to_layer.transform_point(line.to);

        let id = self.unused_id();
        let mut markup = format!("<path id=\"{}\"", escape_attribute(&id));
        if !line.style.is_empty() {
            markup.push_str(&format!(
                " style=\"{}\"",
                escape_attribute(&line.style.to_string())
            ));
        }
        markup.push_str(&format!(
            " d=\"{}\"/>",
            path_util::line_path_data(from, to)
        ));

        let range = layer.range.clone();
        let text = &self.source[range.clone()];
        let edit = if text.ends_with("/>") {
            Edit {
                range: (range.end - 2)..range.end,
                replacement: format!(">{}</{}>", markup, layer.qualified_name),
            }
        } else {
            let close = text
                .rfind("</")
                .map_or(range.end, |offset| range.start + offset);
            Edit {
                range: close..close,
                replacement: markup,
            }
        };

        log::debug!("Inserting line '{}' into '{}'", id, layer.label());

        self.edits.push(edit);
        self.inserted_ids.push(id);

        Ok(())
    }

    fn remove(&mut self, shape: &usize) -> Result<(), HostError> {
        let range = self.element(*shape)?.range.clone();

        self.edits.push(Edit {
            range,
            replacement: String::new(),
        });
        self.removed.insert(*shape);

        Ok(())
    }
}

/// The tag name as written in the source, including any prefix.
fn qualified_name(element_text: &str) -> String {
    element_text
        .trim_start_matches('<')
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .collect()
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Debug)]
pub enum LoadDocumentError {
    XmlError(roxmltree::Error),
    NotAnSvgDocument(String),
}

impl From<roxmltree::Error> for LoadDocumentError {
    fn from(e: roxmltree::Error) -> Self {
        LoadDocumentError::XmlError(e)
    }
}

impl Display for LoadDocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            LoadDocumentError::XmlError(e) => {
                f.write_fmt(format_args!("Unable to parse document: {}", e))
            }
            LoadDocumentError::NotAnSvgDocument(root) => f.write_fmt(format_args!(
                "Expected an <svg> root element, found <{}>",
                root
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::replace_with_line;
    use lyon_path::math::point;

    const LAYERED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd">
  <sodipodi:namedview id="base" inkscape:current-layer="layer2"/>
  <g id="layer1" transform="translate(100,0)">
    <path id="a" style="stroke:red;stroke-dasharray:2,2" d="M 0,0 L 3,4"/>
  </g>
  <g id="layer2" transform="scale(2)">
    <rect id="box" width="5" height="5"/>
  </g>
</svg>"#;

    fn load(source: &str, selection: &[&str], layer: Option<&str>) -> SvgDocument {
        SvgDocument::parse(
            source.to_owned(),
            selection.iter().map(|s| s.to_string()).collect(),
            layer,
        )
        .unwrap()
    }

    #[test]
    fn only_paths_are_selected() {
        let document = load(LAYERED, &["box", "missing", "a", "a"], None);

        let paths = document.selected_paths();

        assert_eq!(paths.len(), 1);
        assert_eq!(document.elements[paths[0]].id.as_deref(), Some("a"));
    }

    #[test]
    fn nodes_are_in_document_coordinates() {
        let document = load(LAYERED, &["a"], None);
        let shape = document.selected_paths()[0];

        let transform = document.composed_transform(&shape).unwrap();
        let nodes = document.nodes(&shape, &transform).unwrap();

        assert_eq!(nodes, vec![point(100.0, 0.0), point(103.0, 4.0)]);
    }

    #[test]
    fn line_goes_into_current_layer_in_its_coordinates() {
        let mut document = load(LAYERED, &["a"], None);

        let line = replace_with_line(&mut document).unwrap();
        let output = document.to_svg();

        assert_eq!(line.from, point(100.0, 0.0));
        assert_eq!(line.to, point(103.0, 4.0));
        assert!(!output.contains("id=\"a\""));
        assert!(output.contains(
            "<rect id=\"box\" width=\"5\" height=\"5\"/>\n  \
             <path id=\"furthest-line\" style=\"stroke:red;stroke-dasharray:2,2\" d=\"M 50,0 L 51.5,2\"/></g>"
        ));
    }

    #[test]
    fn layer_override_and_self_closing_layer() {
        let source = r#"<svg xmlns="http://www.w3.org/2000/svg"><svg:g xmlns:svg="http://www.w3.org/2000/svg" id="empty"/><path id="p" d="M 0 0 L 1 0"/></svg>"#;
        let mut document = load(source, &["p"], Some("empty"));

        replace_with_line(&mut document).unwrap();

        assert_eq!(
            document.to_svg(),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><svg:g xmlns:svg="http://www.w3.org/2000/svg" id="empty"><path id="furthest-line" d="M 0,0 L 1,0"/></svg:g></svg>"#
        );
    }

    #[test]
    fn falls_back_to_root() {
        let source = r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="p" d="M 0 0 L 1 0"/></svg>"#;
        let mut document = load(source, &["p"], Some("p"));

        replace_with_line(&mut document).unwrap();

        assert_eq!(
            document.to_svg(),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="furthest-line" d="M 0,0 L 1,0"/></svg>"#
        );
    }

    #[test]
    fn new_id_does_not_clash() {
        let source = r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="furthest-line" d="M 0 0 L 1 0"/></svg>"#;
        let mut document = load(source, &["furthest-line"], None);

        replace_with_line(&mut document).unwrap();

        assert!(document.to_svg().contains("id=\"furthest-line-1\""));
    }

    #[test]
    fn singular_layer_leaves_document_alone() {
        let source = r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="flat" transform="scale(0)"/><path id="p" d="M 0 0 L 1 0"/></svg>"#;
        let mut document = load(source, &["p"], Some("flat"));

        let result = replace_with_line(&mut document);

        assert!(matches!(result, Err(crate::host::ReplaceError::Host(HostError::NonInvertibleLayer(_)))));
        assert!(!document.is_modified());
        assert_eq!(document.to_svg(), source);
    }

    #[test]
    fn rejects_non_svg_root() {
        let result = SvgDocument::parse("<html/>".to_owned(), vec![], None);

        assert!(matches!(result, Err(LoadDocumentError::NotAnSvgDocument(_))));
    }

    #[test]
    fn style_is_escaped() {
        assert_eq!(
            escape_attribute("font-family:\"A&B\""),
            "font-family:&quot;A&amp;B&quot;"
        );
    }
}
