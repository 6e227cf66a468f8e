//! ProcessCancellationHandler - classify then compose for a single record.

use std::sync::Arc;

use super::classify_reason::{ClassifyReasonCommand, ClassifyReasonHandler};
use super::compose_email::{ComposeEmailCommand, ComposeEmailHandler};
use crate::domain::retention::{
    BatchRowResult, CancellationRequest, ClassificationError, OfferCatalog,
};
use crate::ports::AIProvider;

/// Command to run one record through the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessCancellationCommand {
    /// 1-based position in the batch (1 for single records).
    pub row: usize,
    pub request: CancellationRequest,
}

/// Runs the classifier and, on a match, the composer.
///
/// Never fails: every stage error is recorded on the returned row.
pub struct ProcessCancellationHandler {
    classifier: ClassifyReasonHandler,
    composer: ComposeEmailHandler,
    catalog: Arc<OfferCatalog>,
}

impl ProcessCancellationHandler {
    pub fn new(ai_provider: Arc<dyn AIProvider>, catalog: Arc<OfferCatalog>) -> Self {
        Self {
            classifier: ClassifyReasonHandler::new(ai_provider.clone(), catalog.clone()),
            composer: ComposeEmailHandler::new(ai_provider),
            catalog,
        }
    }

    pub async fn handle(&self, cmd: ProcessCancellationCommand) -> BatchRowResult {
        let ProcessCancellationCommand { row, request } = cmd;

        let matched = match self
            .classifier
            .handle(ClassifyReasonCommand {
                request: request.clone(),
            })
            .await
        {
            Ok(matched) => matched,
            Err(err) => return BatchRowResult::unclassified(row, request, err),
        };

        let Some(offer) = self.catalog.get(&matched.offer_id).cloned() else {
            let err = ClassificationError::UnknownOffer {
                offer_id: matched.offer_id,
            };
            return BatchRowResult::unclassified(row, request, err);
        };

        let composition = self
            .composer
            .handle(ComposeEmailCommand {
                request: request.clone(),
                offer,
            })
            .await;

        BatchRowResult::classified(row, request, matched, composition)
    }
}
