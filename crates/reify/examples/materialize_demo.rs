//! End-to-end demo: a canned engine evaluation materialized into an
//! in-memory repository, run twice to show reconcile idempotence.

use reify::{
    materialize, AttributeValue, Container, Evaluated, GeometryEngine, Mat4, MemoryRepository,
    MeshPayload, ObjectId, PathError, PayloadHandle, PayloadKind, RootInstance, Slot, Tag,
};

/// An engine that always produces the same two placed trees.
struct CannedEngine;

impl GeometryEngine for CannedEngine {
    fn evaluate(&self, _anchor: ObjectId) -> Result<Evaluated, PathError> {
        Ok(Evaluated {
            roots: vec![
                placed("Oak", 0.0, PayloadHandle(1)),
                placed("Birch", 4.0, PayloadHandle(2)),
            ],
        })
    }
}

fn scalar(v: f64) -> AttributeValue {
    AttributeValue::Scalar(v)
}

fn text(s: &str) -> AttributeValue {
    AttributeValue::Text(s.to_string())
}

/// One encoded root: ATTRIBUTES + a mesh DATA payload.
fn placed(name: &str, x: f32, handle: PayloadHandle) -> RootInstance {
    let data = Container::new()
        .with_attribute("type", vec![scalar(Tag::Geometry as u8 as f64)])
        .with_attribute("subtype", vec![scalar(PayloadKind::Mesh as u8 as f64)])
        .push_slot(Slot::leaf("mesh").with_mesh(MeshPayload::new(handle)));
    let container = Container::new()
        .with_attribute(
            "type",
            vec![
                scalar(Tag::Attributes as u8 as f64),
                scalar(Tag::Data as u8 as f64),
            ],
        )
        .with_attribute("name", vec![text(name), text("d")])
        .push_slot(Slot::leaf("props"))
        .push_slot(Slot::composite("data", data));

    let mut transform = Mat4::IDENTITY;
    transform.0[0][3] = x;
    RootInstance { name: name.to_lowercase(), transform, container }
}

fn print_tree(repo: &MemoryRepository, handle: ObjectId, depth: usize) {
    let Some(object) = repo.get(handle) else { return };
    println!("{}{}", "  ".repeat(depth), object.name);
    for child in repo.children(handle) {
        print_tree(repo, *child, depth + 1);
    }
}

fn main() {
    let mut repo = MemoryRepository::new();
    let anchor = repo.insert_anchor("demo-anchor");

    println!("=== First pass ===");
    match materialize(&CannedEngine, &mut repo, anchor, "demo-anchor") {
        Ok(()) => println!("materialized cleanly"),
        Err(report) => println!("{report}"),
    }
    print_tree(&repo, anchor, 0);

    // Second pass finds everything already in place.
    println!("\n=== Second pass ===");
    match materialize(&CannedEngine, &mut repo, anchor, "demo-anchor") {
        Ok(()) => println!("materialized cleanly"),
        Err(report) => println!("{report}"),
    }
    print_tree(&repo, anchor, 0);
    println!("\nobjects stored: {}", repo.len());
}
