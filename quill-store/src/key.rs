/// Derive the storage key for a report artifact.
///
/// Pure function of (owner, job): both the worker that writes the
/// artifact and the status probe that checks for it compute the same key
/// independently, which is what lets artifact existence stand in for a
/// job-status table.
pub fn artifact_key(owner_id: &str, job_id: &str) -> String {
    format!("reports/{}/{}.pdf", owner_id, job_id)
}
