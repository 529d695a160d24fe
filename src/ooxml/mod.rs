/*!
 * OOXML plumbing shared by all three document backends: the ZIP package
 * container and the mutable XML tree.
 */

pub mod dom;
pub mod package;

pub use dom::{XmlDecl, XmlDocument, XmlElement, XmlNode};
pub use package::Package;

/// Parse a package part into an XML tree.
pub fn parse_part(
    package: &Package,
    name: &str,
) -> Result<XmlDocument, crate::errors::DocumentError> {
    XmlDocument::parse(package.part_text(name)?, name)
}

/// Relationship entries from a `_rels/*.rels` part: (id, target).
///
/// Targets are returned as written; callers resolve them against the
/// source part's directory.
pub fn parse_relationships(
    package: &Package,
    name: &str,
) -> Result<Vec<(String, String)>, crate::errors::DocumentError> {
    let doc = parse_part(package, name)?;
    let mut relationships = Vec::new();
    for element in doc.root.children_named("Relationship") {
        if let (Some(id), Some(target)) = (element.attr("Id"), element.attr("Target")) {
            relationships.push((id.to_string(), target.to_string()));
        }
    }
    Ok(relationships)
}

/// Resolve a relationship target against a base directory inside the package.
///
/// `resolve_target("ppt", "slides/slide1.xml")` -> `ppt/slides/slide1.xml`;
/// absolute targets (`/xl/worksheets/sheet1.xml`) are taken from the
/// package root.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if base_dir.is_empty() {
        target.to_string()
    } else {
        format!("{base_dir}/{target}")
    }
}
