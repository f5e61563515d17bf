//! Class diagram synthesis.
//!
//! Produces the PlantUML lines for the inheritance neighbourhood of one
//! declaration: its own box, one box per related declaration, and one
//! connector per relationship. Styling directives come first.

use documl_config::{ClassDiagramOptions, MemberVisibilityStyle};
use documl_model::{Declaration, DeclarationKind, Member, MemberKind, Project, Visibility};

use crate::relations::Relations;

const EXTENDS_ARROW: &str = "<|--";
const IMPLEMENTS_ARROW: &str = "<|..";

/// Build the class diagram lines for `declaration`.
///
/// Returns an empty list when the declaration has no resolvable
/// supertypes, interfaces, subtypes or implementors.
pub fn synthesize(
    project: &Project,
    declaration: &Declaration,
    options: &ClassDiagramOptions,
) -> Vec<String> {
    let relations = Relations::of(project, declaration);
    if relations.is_empty() {
        return Vec::new();
    }

    let with_members = options.diagram_type.includes_members();
    let name = &declaration.name;
    let mut body = declaration_box(declaration, with_members);

    for supertype in &relations.supertypes {
        body.extend(declaration_box(supertype, with_members));
        body.push(format!("{} {EXTENDS_ARROW} {name}", supertype.name));
    }
    for interface in &relations.interfaces {
        body.extend(declaration_box(interface, with_members));
        body.push(format!("{} {IMPLEMENTS_ARROW} {name}", interface.name));
    }
    for subtype in &relations.subtypes {
        body.extend(declaration_box(subtype, with_members));
        body.push(format!("{name} {EXTENDS_ARROW} {}", subtype.name));
    }
    for implementor in &relations.implementors {
        body.extend(declaration_box(implementor, with_members));
        body.push(format!("{name} {IMPLEMENTS_ARROW} {}", implementor.name));
    }

    let mut lines = directives(options, &relations);
    lines.extend(body);
    lines
}

/// Styling directives in the order they appear at the top of the diagram.
fn directives(options: &ClassDiagramOptions, relations: &Relations<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut skinparam = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            lines.push(format!("skinparam {name} {value}"));
        }
    };

    skinparam("ClassAttributeFontColor", options.class_attribute_font_color.clone());
    skinparam(
        "ClassAttributeFontStyle",
        options.class_attribute_font_style.map(|s| s.to_string()),
    );
    skinparam(
        "ClassAttributeFontSize",
        options.class_attribute_font_size.map(|s| s.to_string()),
    );
    skinparam("ClassAttributeFontName", options.class_attribute_font_name.clone());
    skinparam("ClassFontColor", options.class_font_color.clone());
    skinparam("ClassFontStyle", options.class_font_style.map(|s| s.to_string()));
    skinparam("ClassFontSize", options.class_font_size.map(|s| s.to_string()));
    skinparam("ClassFontName", options.class_font_name.clone());
    skinparam("ClassArrowColor", options.arrow_color.clone());
    skinparam(
        "ClassBorderThickness",
        options.box_border_width.map(|w| w.to_string()),
    );
    skinparam("ClassBorderColor", options.box_border_color.clone());
    skinparam("ClassBackgroundColor", options.box_background_color.clone());
    skinparam("RoundCorner", options.box_border_radius.map(|r| r.to_string()));
    skinparam("Shadowing", options.hide_shadow.then(|| "false".to_owned()));
    skinparam(
        "ClassAttributeIconSize",
        (options.member_visibility_style == MemberVisibilityStyle::Text).then(|| "0".to_owned()),
    );

    let max_siblings = options.top_down_layout_max_siblings as usize;
    if relations.siblings_above() > max_siblings || relations.siblings_below() > max_siblings {
        lines.push("left to right direction".to_owned());
    }
    if options.hide_circled_char {
        lines.push("hide circle".to_owned());
    }
    if options.hide_empty_members {
        lines.push("hide empty methods".to_owned());
        lines.push("hide empty fields".to_owned());
    }
    lines
}

/// Box lines for a class or interface; empty for any other kind.
pub fn declaration_box(declaration: &Declaration, with_members: bool) -> Vec<String> {
    let keyword = match declaration.kind {
        DeclarationKind::Class => "class",
        DeclarationKind::Interface => "interface",
        DeclarationKind::Other => return Vec::new(),
    };

    let mut header = String::new();
    if declaration.flags.is_static {
        header.push_str("static ");
    }
    if declaration.flags.is_abstract {
        header.push_str("abstract ");
    }

    let mut lines = vec![format!("{header}{keyword} {} {{", declaration.name)];
    if with_members {
        lines.extend(declaration.children.iter().filter_map(member_line));
    }
    lines.push("}".to_owned());
    lines
}

/// One box body line for a property or method.
fn member_line(member: &Member) -> Option<String> {
    let mut line = String::new();
    if member.flags.is_static {
        line.push_str("{static} ");
    }

    match member.kind {
        MemberKind::Property => {
            line.push(visibility_sigil(member.visibility));
            line.push_str(&member.name);
            if let Some(name) = member.type_ref.as_ref().and_then(|t| t.printable_name()) {
                line.push_str(" : ");
                line.push_str(name);
            }
        }
        MemberKind::Method => {
            if member.flags.is_abstract {
                line.push_str("{abstract} ");
            }
            line.push(visibility_sigil(member.visibility));
            line.push_str(&member.name);
            line.push_str("()");
            match &member.type_ref {
                Some(type_ref) => {
                    if let Some(name) = type_ref.printable_name() {
                        line.push_str(" : ");
                        line.push_str(name);
                    }
                }
                None => line.push_str(" : void"),
            }
        }
        MemberKind::Other => return None,
    }
    Some(line)
}

fn visibility_sigil(visibility: Visibility) -> char {
    match visibility {
        Visibility::Private => '-',
        Visibility::Protected => '#',
        Visibility::Public => '+',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::tests::{find, graph};
    use documl_config::{ClassDiagramType, FontStyle};
    use documl_model::{Flags, TypeRef};
    use pretty_assertions::assert_eq;

    use DeclarationKind::{Class, Interface};

    fn simple() -> ClassDiagramOptions {
        ClassDiagramOptions {
            diagram_type: ClassDiagramType::Simple,
            ..Default::default()
        }
    }

    fn named(name: &str) -> Option<TypeRef> {
        Some(TypeRef::Named {
            name: name.to_owned(),
        })
    }

    #[test]
    fn test_dog_extends_animal() {
        let project = graph(&[("Animal", Class), ("Dog", Class)], &[("Dog", "Animal")], &[]);
        let lines = synthesize(&project, find(&project, "Dog"), &simple());

        assert_eq!(
            lines,
            [
                "hide empty methods",
                "hide empty fields",
                "class Dog {",
                "}",
                "class Animal {",
                "}",
                "Animal <|-- Dog",
            ]
        );
    }

    #[test]
    fn test_isolated_declaration_has_no_diagram() {
        let project = graph(&[("Lonely", Class)], &[], &[]);
        let lonely = find(&project, "Lonely");

        assert!(synthesize(&project, lonely, &simple()).is_empty());
        let detailed = ClassDiagramOptions {
            diagram_type: ClassDiagramType::Detailed,
            ..Default::default()
        };
        assert!(synthesize(&project, lonely, &detailed).is_empty());
    }

    #[test]
    fn test_relationship_order_and_arrows() {
        let project = graph(
            &[
                ("Base", Class),
                ("Shape", Interface),
                ("Node", Class),
                ("Leaf", Class),
                ("Marker", Interface),
                ("Tagged", Class),
            ],
            &[("Node", "Base"), ("Leaf", "Node")],
            &[("Node", "Shape"), ("Tagged", "Node")],
        );
        let options = ClassDiagramOptions {
            hide_empty_members: false,
            ..simple()
        };
        let lines = synthesize(&project, find(&project, "Node"), &options);

        assert_eq!(
            lines,
            [
                "class Node {",
                "}",
                "class Base {",
                "}",
                "Base <|-- Node",
                "interface Shape {",
                "}",
                "Shape <|.. Node",
                "class Leaf {",
                "}",
                "Node <|-- Leaf",
                "class Tagged {",
                "}",
                "Node <|.. Tagged",
            ]
        );
    }

    #[test]
    fn test_left_to_right_when_too_many_siblings() {
        let project = graph(
            &[("Base", Class), ("A", Class), ("B", Class), ("C", Class)],
            &[("A", "Base"), ("B", "Base"), ("C", "Base")],
            &[],
        );
        let base = find(&project, "Base");

        let options = ClassDiagramOptions {
            top_down_layout_max_siblings: 2,
            ..simple()
        };
        let lines = synthesize(&project, base, &options);
        assert_eq!(lines[0], "left to right direction");

        let lines = synthesize(&project, base, &simple());
        assert!(!lines.contains(&"left to right direction".to_owned()));
    }

    #[test]
    fn test_all_directives_in_order() {
        let project = graph(&[("Animal", Class), ("Dog", Class)], &[("Dog", "Animal")], &[]);
        let options = ClassDiagramOptions {
            diagram_type: ClassDiagramType::Simple,
            hide_empty_members: true,
            top_down_layout_max_siblings: 0,
            member_visibility_style: MemberVisibilityStyle::Text,
            hide_circled_char: true,
            hide_shadow: true,
            box_background_color: Some("#FEFECE".to_owned()),
            box_border_color: Some("Black".to_owned()),
            box_border_radius: Some(5),
            box_border_width: Some(0),
            arrow_color: Some("Red".to_owned()),
            class_font_name: Some("Arial".to_owned()),
            class_font_size: Some(12),
            class_font_style: Some(FontStyle::Bold),
            class_font_color: Some("Blue".to_owned()),
            class_attribute_font_name: Some("Courier".to_owned()),
            class_attribute_font_size: Some(10),
            class_attribute_font_style: Some(FontStyle::Italic),
            class_attribute_font_color: Some("Gray".to_owned()),
            ..Default::default()
        };
        let lines = synthesize(&project, find(&project, "Dog"), &options);

        assert_eq!(
            &lines[..19],
            [
                "skinparam ClassAttributeFontColor Gray",
                "skinparam ClassAttributeFontStyle italic",
                "skinparam ClassAttributeFontSize 10",
                "skinparam ClassAttributeFontName Courier",
                "skinparam ClassFontColor Blue",
                "skinparam ClassFontStyle bold",
                "skinparam ClassFontSize 12",
                "skinparam ClassFontName Arial",
                "skinparam ClassArrowColor Red",
                "skinparam ClassBorderThickness 0",
                "skinparam ClassBorderColor Black",
                "skinparam ClassBackgroundColor #FEFECE",
                "skinparam RoundCorner 5",
                "skinparam Shadowing false",
                "skinparam ClassAttributeIconSize 0",
                "left to right direction",
                "hide circle",
                "hide empty methods",
                "hide empty fields",
            ]
        );
        assert_eq!(lines[19], "class Dog {");
    }

    #[test]
    fn test_detailed_box_members() {
        let mut shape = Declaration::new(documl_model::DeclarationId(1), "Shape", Class);
        shape.flags = Flags {
            is_static: false,
            is_abstract: true,
        };
        shape.children = vec![
            Member::property("name", named("string")),
            Member::property("cache", Some(TypeRef::Other)).with_visibility(Visibility::Private),
            Member::property("count", named("number")).with_flags(Flags {
                is_static: true,
                is_abstract: false,
            }),
            Member::method("area", named("number")).with_flags(Flags {
                is_static: false,
                is_abstract: true,
            }),
            Member::method("reset", None).with_visibility(Visibility::Protected),
            Member::method(
                "clone",
                Some(TypeRef::TypeParameter {
                    name: "T".to_owned(),
                }),
            ),
            Member::method("union", Some(TypeRef::Other)),
            Member {
                kind: MemberKind::Other,
                ..Member::method("constructor", None)
            },
        ];

        assert_eq!(
            declaration_box(&shape, true),
            [
                "abstract class Shape {",
                "+name : string",
                "-cache",
                "{static} +count : number",
                "{abstract} +area() : number",
                "#reset() : void",
                "+clone() : T",
                "+union()",
                "}",
            ]
        );
        assert_eq!(declaration_box(&shape, false), ["abstract class Shape {", "}"]);
    }

    #[test]
    fn test_box_for_other_kinds_is_empty() {
        let mut module = Declaration::new(documl_model::DeclarationId(1), "utils", DeclarationKind::Other);
        module.flags.is_static = true;
        assert!(declaration_box(&module, true).is_empty());

        let mut interface = Declaration::new(documl_model::DeclarationId(2), "Api", Interface);
        interface.flags.is_static = true;
        assert_eq!(declaration_box(&interface, false), ["static interface Api {", "}"]);
    }
}
