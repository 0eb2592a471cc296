//! The end-to-end pass: evaluate an anchor, flatten every root it
//! produced, and reconcile each flattened array against the repository.

use crate::decode::flatten_root;
use crate::engine::GeometryEngine;
use crate::error::Report;
use crate::ident::ObjectId;
use crate::reconcile::{reconcile, ObjectRepository};

/// Runs one materialization pass for `anchor`.
///
/// Errors accumulate across every root into one report; a root that
/// fails to flatten is skipped, the rest still reconcile. The anchor is
/// flagged as materialized even when the report is non-empty, so a
/// partially failed pass is not retried indefinitely by callers that
/// poll the flag. Overlapping passes for the same anchor are not
/// coordinated here; callers serialize them.
pub fn materialize(
    engine: &dyn GeometryEngine,
    repo: &mut dyn ObjectRepository,
    anchor: ObjectId,
    anchor_name: &str,
) -> Result<(), Report> {
    let mut report = Report::new(anchor_name);

    match engine.evaluate(anchor) {
        Ok(evaluated) => {
            tracing::info!(
                anchor = anchor_name,
                roots = evaluated.roots.len(),
                "materializing"
            );
            for root in &evaluated.roots {
                let flat = match flatten_root(root.transform, &root.name, &root.container) {
                    Ok(flat) => flat,
                    Err(err) => {
                        report.push(err.push_segment(&root.name));
                        continue;
                    }
                };
                if let Err(root_report) = reconcile(repo, anchor, anchor_name, &flat.objects) {
                    report.extend(root_report.errors);
                }
            }
        }
        Err(err) => report.push(err),
    }

    if !report.is_empty() {
        tracing::warn!(anchor = anchor_name, errors = report.len(), "materialized with errors");
    }
    // The flag means "a pass ran", not "a pass succeeded".
    repo.mark_materialized(anchor);
    report.into_result()
}
