use std::sync::Arc;

use pipeline::{
    build_creation_template, ContentBackend, IconResourceRequest, IconStore, InboundMessage,
    IntegrationError, PipelineError, PipelineOutcome, PipelineRunId, Record, ResolvedReferences,
    Submission, TaxonomyKind,
};
use tracing::{error, info, instrument};

/// Runs the micro-app pipeline for one record at a time.
///
/// Holds only shared, immutable collaborator handles; every run builds its
/// own session and template, so one executor serves concurrent requests.
pub struct PipelineExecutor {
    icons: Arc<dyn IconStore>,
    cms: Arc<dyn ContentBackend>,
}

impl PipelineExecutor {
    pub fn new(icons: Arc<dyn IconStore>, cms: Arc<dyn ContentBackend>) -> Self {
        Self { icons, cms }
    }

    /// Processes one record and reports its terminal outcome.
    ///
    /// A body without `Body`, `Icon`, or icon image data fails before any
    /// collaborator is contacted.
    #[instrument(
        name = "pipeline_run",
        skip_all,
        fields(message_id = %record.message_id, run_id = %PipelineRunId::new_random())
    )]
    pub async fn handle(&self, record: &Record) -> PipelineOutcome {
        info!("Processing message");

        let result = match InboundMessage::from_record_body(&record.body) {
            Ok(message) => self.run(&message).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(submission) => {
                info!(status = submission.status, "Micro app submitted");
                submission.into()
            }
            Err(e) => {
                let cause = std::error::Error::source(&e).map(|c| c.to_string());
                error!(error = %e, cause = ?cause, "Pipeline run failed");
                e.into()
            }
        }
    }

    /// Runs the pipeline steps in order, stopping at the first failure.
    pub async fn run(&self, message: &InboundMessage) -> Result<Submission, PipelineError> {
        info!(icon = %message.icon.name, "Fetching icon");
        let bytes = self
            .icons
            .fetch_icon(&message.icon)
            .await
            .map_err(PipelineError::IconFetch)?;
        if bytes.is_empty() {
            return Err(PipelineError::IconFetch(IntegrationError::Empty {
                what: "icon bytes",
            }));
        }

        info!("Authenticating");
        let session = self
            .cms
            .open_session()
            .await
            .map_err(PipelineError::Authentication)?;

        info!(bytes = bytes.len(), "Uploading icon");
        let file_id = session
            .upload_image(&message.icon.name, bytes)
            .await
            .map_err(PipelineError::ImageUpload)?;

        info!(%file_id, "Confirming icon resource");
        let icon = session
            .create_icon_resource(&IconResourceRequest::new(message.icon.name.clone(), file_id))
            .await
            .map_err(PipelineError::IconResource)?;

        info!("Loading permissions");
        let permissions = session
            .list_permissions()
            .await
            .map_err(PipelineError::Permissions)?;

        info!("Loading languages");
        let languages = session
            .list_terms(TaxonomyKind::Languages)
            .await
            .map_err(PipelineError::Languages)?;

        info!("Loading countries");
        let countries = session
            .list_terms(TaxonomyKind::Countries)
            .await
            .map_err(PipelineError::Countries)?;

        info!("Loading categories");
        let categories = session
            .list_terms(TaxonomyKind::Categories)
            .await
            .map_err(PipelineError::Categories)?;

        let resolved = ResolvedReferences {
            icon,
            permissions,
            languages,
            countries,
            categories,
        };
        let template =
            build_creation_template(message, &resolved).map_err(PipelineError::Template)?;

        info!("Creating micro app");
        session
            .create_micro_app(&template)
            .await
            .map_err(PipelineError::Submission)
    }
}
