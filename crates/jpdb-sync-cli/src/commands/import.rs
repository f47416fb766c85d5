use anyhow::{Result, bail};
use jpdb_sync::{
    Collection, Feedback, ImportPipeline, ImportReport, ImportRequest, VocabularyService,
};

/// Print feedback items to stderr.
pub fn print_feedback(feedback: &[Feedback]) {
    for item in feedback {
        eprintln!("{item}");
    }
}

/// Run an import and print the status log, then the summary.
pub async fn run(
    service: &dyn VocabularyService,
    collection: &dyn Collection,
    request: &ImportRequest,
) -> Result<ImportReport> {
    println!(
        "Importing JPDB deck {} into '{}' as '{}'...",
        request.deck_id, request.target_deck, request.note_type
    );

    match ImportPipeline::new(service, collection)
        .run_import(request)
        .await
    {
        Ok(report) => {
            print_feedback(&report.feedback);
            println!("{}", report.summary());
            Ok(report)
        }
        Err(aborted) => {
            print_feedback(&aborted.report.feedback);
            bail!(
                "import stopped while {} ({} imported, {} skipped before the failure)",
                aborted.stage,
                aborted.report.imported,
                aborted.report.skipped
            );
        }
    }
}
